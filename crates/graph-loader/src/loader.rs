//! Dependency-Ordered Loader.
//!
//! Tables load in [`Table::LOAD_ORDER`], so every edge is written after both
//! of its endpoint vertices. Within a table, rows stream in chunks of the
//! batch size; each chunk writes its vertex batch first and then one batch
//! per edge kind the table produces. The first error aborts the run.

use crate::batch::{BatchCommitter, BatchProgress, DEFAULT_BATCH_SIZE};
use crate::error::LoadError;
use crate::guard::ReferentialGuard;
use graph_sink::GraphSink;
use std::time::{Duration, Instant};
use tbl_source::{SourceError, TblDirectory};
use tpch_schema::{
    map_row, CustomerRow, EdgeKind, EdgeRecord, LineItemRow, NationRow, OrdersRow, PartRow,
    PartSuppRow, RegionRow, SupplierRow, Table, TableRow, VertexRecord,
};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    pub batch_size: usize,
    /// Read, map and check everything but skip all sink writes.
    pub dry_run: bool,
    /// Compare sink counts with the written counts after the load.
    pub verify: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            verify: true,
        }
    }
}

/// What one table load wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct TableReport {
    pub table: Table,
    pub vertices: u64,
    /// Edge counts in the order of `table.edge_kinds()`.
    pub edges: Vec<(EdgeKind, u64)>,
    pub batches: usize,
    pub duration: Duration,
}

impl TableReport {
    fn new(table: Table) -> Self {
        Self {
            table,
            vertices: 0,
            edges: table.edge_kinds().iter().map(|kind| (*kind, 0)).collect(),
            batches: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn edge_total(&self) -> u64 {
        self.edges.iter().map(|(_, count)| count).sum()
    }

    pub fn records_per_second(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.vertices as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub tables: Vec<TableReport>,
    pub total_duration: Duration,
}

impl LoadReport {
    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|report| report.table == table)
    }

    pub fn vertices(&self, table: Table) -> u64 {
        self.table(table).map_or(0, |report| report.vertices)
    }

    pub fn edges(&self, kind: EdgeKind) -> u64 {
        self.table(kind.spec().produced_by)
            .and_then(|report| report.edges.iter().find(|(k, _)| *k == kind))
            .map_or(0, |(_, count)| *count)
    }

    pub fn total_vertices(&self) -> u64 {
        self.tables.iter().map(|report| report.vertices).sum()
    }

    pub fn total_edges(&self) -> u64 {
        self.tables.iter().map(TableReport::edge_total).sum()
    }
}

pub struct Loader<'a, S: GraphSink> {
    sink: &'a S,
    committer: BatchCommitter,
    guard: ReferentialGuard,
    dry_run: bool,
}

impl<'a, S: GraphSink> Loader<'a, S> {
    pub fn new(sink: &'a S, options: &LoadOptions) -> Result<Self, LoadError> {
        Ok(Self {
            sink,
            committer: BatchCommitter::new(options.batch_size)?,
            guard: ReferentialGuard::for_mode(sink.write_mode()),
            dry_run: options.dry_run,
        })
    }

    /// Load every table of `source` in dependency order.
    pub async fn load_all(&mut self, source: &TblDirectory) -> Result<LoadReport, LoadError> {
        let start = Instant::now();
        let mut report = LoadReport::default();

        for table in Table::LOAD_ORDER {
            let table_report = match table {
                Table::Region => self.load_table::<RegionRow>(source).await?,
                Table::Nation => self.load_table::<NationRow>(source).await?,
                Table::Supplier => self.load_table::<SupplierRow>(source).await?,
                Table::Customer => self.load_table::<CustomerRow>(source).await?,
                Table::Part => self.load_table::<PartRow>(source).await?,
                Table::PartSupp => self.load_table::<PartSuppRow>(source).await?,
                Table::Orders => self.load_table::<OrdersRow>(source).await?,
                Table::LineItem => self.load_table::<LineItemRow>(source).await?,
            };
            report.tables.push(table_report);
        }

        report.total_duration = start.elapsed();
        info!(
            "Loaded {} vertices and {} edges in {:?}",
            report.total_vertices(),
            report.total_edges(),
            report.total_duration
        );
        Ok(report)
    }

    /// Load the `.tbl` file of `R::TABLE`.
    pub async fn load_table<R: TableRow>(
        &mut self,
        source: &TblDirectory,
    ) -> Result<TableReport, LoadError> {
        let total = source.record_count(R::TABLE)?;
        let rows = source.rows::<R>()?;
        self.load_rows(rows, total).await
    }

    /// Load already-decoded rows of `R::TABLE`. `total_records` only feeds
    /// the progress total.
    pub async fn load_rows<R, I>(
        &mut self,
        rows: I,
        total_records: usize,
    ) -> Result<TableReport, LoadError>
    where
        R: TableRow,
        I: IntoIterator<Item = Result<R, SourceError>>,
    {
        let table = R::TABLE;
        let naming = self.sink.naming();
        let kinds = table.edge_kinds();
        let start = Instant::now();
        let mut report = TableReport::new(table);

        info!(
            "Loading {table} into {} ({total_records} records, {} batches)",
            self.sink.name(),
            self.committer.total_batches(total_records)
        );

        for (progress, chunk) in self.committer.batches(rows, total_records) {
            let mut vertices = Vec::with_capacity(chunk.len());
            let mut edges: Vec<Vec<EdgeRecord>> =
                kinds.iter().map(|_| Vec::with_capacity(chunk.len())).collect();

            for row in chunk {
                let mapped = map_row(&row?, naming)?;
                vertices.push(mapped.vertex);
                for (batch, edge) in edges.iter_mut().zip(mapped.edges) {
                    batch.push(edge);
                }
            }

            self.guard.record_vertices(table, &vertices)?;
            for batch in &edges {
                self.guard.check_edges(table, batch)?;
            }

            self.write_vertices(table, progress, &vertices).await?;
            for (kind, batch) in kinds.iter().zip(&edges) {
                self.write_edges(*kind, progress, batch).await?;
            }

            report.vertices += vertices.len() as u64;
            for ((_, count), batch) in report.edges.iter_mut().zip(&edges) {
                *count += batch.len() as u64;
            }
            report.batches = progress.index;
            info!(
                "{table}: completed batch {progress} ({} records)",
                vertices.len()
            );
        }

        report.duration = start.elapsed();
        info!(
            "Loaded {table}: {} vertices, {} edges in {:?} ({:.0} records/sec)",
            report.vertices,
            report.edge_total(),
            report.duration,
            report.records_per_second()
        );
        Ok(report)
    }

    async fn write_vertices(
        &self,
        table: Table,
        progress: BatchProgress,
        batch: &[VertexRecord],
    ) -> Result<(), LoadError> {
        if self.dry_run {
            debug!(
                "Dry run: skipping {} {table} vertices (batch {progress})",
                batch.len()
            );
            return Ok(());
        }
        self.committer
            .commit(
                table.name(),
                progress,
                batch.len(),
                self.sink.write_vertices(table, batch),
            )
            .await
    }

    async fn write_edges(
        &self,
        kind: EdgeKind,
        progress: BatchProgress,
        batch: &[EdgeRecord],
    ) -> Result<(), LoadError> {
        if self.dry_run {
            debug!(
                "Dry run: skipping {} {kind} edges (batch {progress})",
                batch.len()
            );
            return Ok(());
        }
        self.committer
            .commit(
                kind.container(),
                progress,
                batch.len(),
                self.sink.write_edges(kind, batch),
            )
            .await
    }
}

/// Compare the sink's counts with what `report` says was written.
pub async fn verify<S: GraphSink>(sink: &S, report: &LoadReport) -> Result<(), LoadError> {
    for table_report in &report.tables {
        let table = table_report.table;
        let found = sink
            .count_vertices(table)
            .await
            .map_err(LoadError::backend("count"))?;
        if found != table_report.vertices {
            return Err(LoadError::Verification {
                container: table.name().to_string(),
                expected: table_report.vertices,
                found,
            });
        }

        for (kind, expected) in &table_report.edges {
            let found = sink
                .count_edges(*kind)
                .await
                .map_err(LoadError::backend("count"))?;
            if found != *expected {
                return Err(LoadError::Verification {
                    container: kind.container().to_string(),
                    expected: *expected,
                    found,
                });
            }
        }
        debug!("Verified {table}: {} vertices", table_report.vertices);
    }

    info!(
        "Verified {} vertices and {} edges in {}",
        report.total_vertices(),
        report.total_edges(),
        sink.name()
    );
    Ok(())
}
