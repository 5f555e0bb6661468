use crate::connect::{surreal_connect, SurrealOpts};
use crate::query;
use anyhow::{Context, Result};
use graph_sink::{GraphSink, WriteMode};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tpch_schema::{EdgeKind, EdgeRecord, PropertyNaming, Table, VertexRecord};
use tracing::{debug, info, trace, warn};

/// Document/edge-collection backend on SurrealDB.
///
/// Writes are insert-only: a batch that repeats an existing record id fails
/// and is not retried.
pub struct SurrealGraphSink {
    surreal: Surreal<Any>,
}

impl SurrealGraphSink {
    pub async fn connect(opts: &SurrealOpts) -> Result<Self> {
        let surreal = surreal_connect(opts).await?;
        info!(
            "Connected to SurrealDB at {} ({}/{})",
            opts.endpoint, opts.namespace, opts.database
        );
        Ok(Self { surreal })
    }

    /// Wrap a client that already selected its namespace and database.
    pub fn from_client(surreal: Surreal<Any>) -> Self {
        Self { surreal }
    }

    pub fn client(&self) -> &Surreal<Any> {
        &self.surreal
    }

    /// Whether `INFO FOR DB` lists a table named `name`.
    pub async fn has_table(&self, name: &str) -> Result<bool> {
        let mut response = self.surreal.query("INFO FOR DB;").await?;
        let info: Option<serde_json::Value> = response.take(0)?;

        Ok(info
            .as_ref()
            .and_then(|info| info.get("tables"))
            .and_then(|tables| tables.as_object())
            .is_some_and(|tables| tables.contains_key(name)))
    }

    async fn execute(&self, sql: &str) -> Result<()> {
        trace!("Executing SurrealDB query: {sql}");
        self.surreal.query(sql).await?.check()?;
        Ok(())
    }

    async fn insert(&self, sql: String, rows: surrealdb::sql::Value) -> Result<()> {
        trace!("Executing SurrealDB query: {sql}");
        self.surreal
            .query(sql)
            .bind(("rows", rows))
            .await?
            .check()?;
        Ok(())
    }

    async fn count(&self, name: &str) -> Result<u64> {
        let mut response = self.surreal.query(query::count(name)).await?;
        let count: Option<i64> = response.take((0, "count"))?;
        Ok(count.unwrap_or(0).max(0) as u64)
    }

    /// Run a setup statement; failures are reported, not returned.
    async fn setup_statement(&self, sql: &str) {
        if let Err(e) = self.execute(sql).await {
            warn!("SurrealDB setup statement failed ({sql}): {e}");
        }
    }
}

#[async_trait::async_trait]
impl GraphSink for SurrealGraphSink {
    fn name(&self) -> &'static str {
        "surrealdb"
    }

    fn naming(&self) -> PropertyNaming {
        PropertyNaming::Prefixed
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::InsertOnly
    }

    async fn clear(&self) -> Result<()> {
        let edges = EdgeKind::ALL.map(|kind| kind.container());
        let vertices = Table::LOAD_ORDER.map(|table| table.name());
        for name in edges.into_iter().chain(vertices) {
            self.execute(&query::remove_table(name))
                .await
                .with_context(|| format!("Failed to remove table '{name}'"))?;
        }
        info!("Cleared graph tables");
        Ok(())
    }

    async fn setup(&self) -> Result<()> {
        for table in Table::LOAD_ORDER {
            self.setup_statement(&query::define_vertex_table(table)).await;
            for index in table.indexes() {
                self.setup_statement(&query::define_index(&index)).await;
            }
        }
        for kind in EdgeKind::ALL {
            self.setup_statement(&query::define_edge_table(kind)).await;
        }
        info!("Defined vertex tables, edge tables and indexes");
        Ok(())
    }

    async fn write_vertices(&self, table: Table, batch: &[VertexRecord]) -> Result<()> {
        self.insert(query::insert_vertices(table), query::vertex_rows(table, batch))
            .await
            .with_context(|| format!("Failed to insert {} records into '{table}'", batch.len()))
    }

    async fn write_edges(&self, kind: EdgeKind, batch: &[EdgeRecord]) -> Result<()> {
        self.insert(query::insert_edges(kind), query::edge_rows(kind, batch))
            .await
            .with_context(|| {
                format!(
                    "Failed to insert {} relations into '{}'",
                    batch.len(),
                    kind.container()
                )
            })
    }

    async fn declare_graph(&self) -> Result<()> {
        for kind in EdgeKind::ALL {
            self.execute(&query::declare_edge_table(kind))
                .await
                .with_context(|| format!("Failed to declare edge table '{}'", kind.container()))?;
        }
        info!("Declared {} edge definitions", EdgeKind::ALL.len());
        Ok(())
    }

    async fn count_vertices(&self, table: Table) -> Result<u64> {
        self.count(table.name()).await
    }

    async fn count_edges(&self, kind: EdgeKind) -> Result<u64> {
        self.count(kind.container()).await
    }

    async fn close(&self) -> Result<()> {
        // The WebSocket session ends when the client is dropped.
        debug!("Closing SurrealDB session");
        Ok(())
    }
}
