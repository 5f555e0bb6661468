//! GraphSink trait definition.
//!
//! The loader drives every backend through this one interface, so the
//! per-table load sequence exists once. Backends differ only in how they
//! store vertices and edges and in the property naming they ask the row
//! mapper for.

use anyhow::Result;
use tpch_schema::{EdgeKind, EdgeRecord, PropertyNaming, Table, VertexRecord};

/// Write semantics of a backend for repeated vertex keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// A repeated key fails the batch.
    InsertOnly,
    /// A repeated key updates the existing vertex or edge in place.
    Upsert,
}

/// Trait for writing a TPC-H graph to a backend.
///
/// # Usage Pattern
///
/// The loader is generic over the sink:
///
/// ```ignore
/// pub async fn load_all<S: GraphSink>(sink: &S, source: &TblDirectory) -> Result<LoadReport> {
///     sink.write_vertices(Table::Region, &batch).await?;
/// }
/// ```
///
/// Binaries choose the backend once; everything below is monomorphized.
#[async_trait::async_trait]
pub trait GraphSink: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    /// Attribute naming the row mapper should produce for this backend.
    fn naming(&self) -> PropertyNaming;

    fn write_mode(&self) -> WriteMode;

    /// Remove all graph data. Destructive; distinct from [`GraphSink::setup`].
    async fn clear(&self) -> Result<()>;

    /// Idempotently create containers and indexes. Index failures are
    /// logged by the implementation, not returned.
    async fn setup(&self) -> Result<()>;

    /// Write one batch of vertices of `table`.
    async fn write_vertices(&self, table: Table, batch: &[VertexRecord]) -> Result<()>;

    /// Write one batch of edges of `kind`. Endpoints are already loaded.
    async fn write_edges(&self, kind: EdgeKind, batch: &[EdgeRecord]) -> Result<()>;

    /// Declare the edge definitions of the loaded graph.
    async fn declare_graph(&self) -> Result<()>;

    async fn count_vertices(&self, table: Table) -> Result<u64>;

    async fn count_edges(&self, kind: EdgeKind) -> Result<u64>;

    /// Release the connection. Called once per run, on success or failure.
    async fn close(&self) -> Result<()>;
}
