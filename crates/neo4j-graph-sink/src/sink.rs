use crate::cypher::{self, CypherFlavor};
use anyhow::{Context, Result};
use graph_sink::{GraphSink, WriteMode};
use neo4rs::{query, BoltType, ConfigBuilder, Graph, Neo4jErrorKind, Query};
use std::borrow::Borrow;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tpch_schema::{EdgeKind, EdgeRecord, PropertyNaming, Table, VertexRecord};
use tracing::{debug, info, trace, warn};

/// Base delay between retries, doubled per attempt
const RETRY_BASE_DELAY_MS: u64 = 100;
/// Upper bound of a single retry delay
const RETRY_MAX_DELAY_MS: u64 = 5_000;

/// Neo4j connection options
#[derive(Clone, Debug)]
pub struct Neo4jOpts {
    pub uri: String,
    pub username: String,
    pub password: String,
    /// Server default database when `None`.
    pub database: Option<String>,
    /// How long a batch hitting transient errors keeps being retried.
    pub transaction_retry: Duration,
    pub flavor: CypherFlavor,
}

/// Whether a server error is worth retrying: the server classified it as
/// `Neo.TransientError.*` (deadlocks, lock timeouts, leader switches).
fn is_transient(error: &neo4rs::Error) -> bool {
    match error {
        neo4rs::Error::Neo4j(e) => is_transient_kind(e.kind()),
        _ => false,
    }
}

fn is_transient_kind(kind: impl Borrow<Neo4jErrorKind>) -> bool {
    matches!(kind.borrow(), Neo4jErrorKind::Transient)
}

fn retry_delay(attempt: u32) -> Duration {
    let delay = RETRY_BASE_DELAY_MS.saturating_mul(1 << attempt.saturating_sub(1).min(16));
    Duration::from_millis(delay.min(RETRY_MAX_DELAY_MS))
}

/// Relationship-pattern backend on Neo4j or Memgraph.
///
/// Every vertex kind is merged on its natural key and every relationship is
/// merged between matched endpoints, so loading the same rows again leaves
/// the graph unchanged.
pub struct Neo4jGraphSink {
    graph: Graph,
    flavor: CypherFlavor,
    transaction_retry: Duration,
}

impl Neo4jGraphSink {
    pub async fn connect(opts: &Neo4jOpts) -> Result<Self> {
        debug!("Connecting to Neo4j at: {}", opts.uri);
        let mut builder = ConfigBuilder::default()
            .uri(&opts.uri)
            .user(opts.username.clone())
            .password(opts.password.clone());
        if let Some(database) = &opts.database {
            builder = builder.db(database.clone());
        }
        let config = builder
            .build()
            .with_context(|| format!("Invalid Neo4j configuration for '{}'", opts.uri))?;
        let graph = Graph::connect(config)
            .with_context(|| format!("Failed to connect to Neo4j at '{}'", opts.uri))?;

        graph
            .run(query("RETURN 1"))
            .await
            .with_context(|| format!("Neo4j at '{}' is not reachable", opts.uri))?;
        info!("Connected to {:?} at {}", opts.flavor, opts.uri);

        Ok(Self {
            graph,
            flavor: opts.flavor,
            transaction_retry: opts.transaction_retry,
        })
    }

    /// Run a statement, retrying transient failures until the retry window
    /// is used up.
    async fn run_with_retry(&self, cypher: &str, rows: Option<&BoltType>) -> Result<()> {
        let build = || -> Query {
            let q = query(cypher);
            match rows {
                Some(rows) => q.param("rows", rows.clone()),
                None => q,
            }
        };

        let deadline = Instant::now() + self.transaction_retry;
        let mut attempt = 0u32;
        loop {
            trace!("Executing Cypher: {cypher}");
            match self.graph.run(build()).await {
                Ok(_) => {
                    if attempt > 0 {
                        debug!("Cypher succeeded after {attempt} retries");
                    }
                    return Ok(());
                }
                Err(e) if is_transient(&e) && Instant::now() < deadline => {
                    attempt += 1;
                    let delay = retry_delay(attempt);
                    warn!("Transient Neo4j error (retry {attempt}, waiting {delay:?}): {e}");
                    sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn count(&self, cypher: &str) -> Result<u64> {
        let mut result = self.graph.execute(query(cypher)).await?;
        if let Some(row) = result.next().await? {
            let count: i64 = row
                .get("count")
                .with_context(|| format!("Failed to get count from '{cypher}'"))?;
            Ok(count.max(0) as u64)
        } else {
            Ok(0)
        }
    }
}

#[async_trait::async_trait]
impl GraphSink for Neo4jGraphSink {
    fn name(&self) -> &'static str {
        match self.flavor {
            CypherFlavor::Neo4j => "neo4j",
            CypherFlavor::Memgraph => "memgraph",
        }
    }

    fn naming(&self) -> PropertyNaming {
        PropertyNaming::Bare
    }

    fn write_mode(&self) -> WriteMode {
        WriteMode::Upsert
    }

    async fn clear(&self) -> Result<()> {
        self.run_with_retry(cypher::DETACH_DELETE_ALL, None)
            .await
            .context("Failed to delete all nodes")?;
        info!("Deleted all nodes and relationships");
        Ok(())
    }

    async fn setup(&self) -> Result<()> {
        let mut created = 0;
        for table in Table::LOAD_ORDER {
            for index in table.indexes() {
                for statement in cypher::index_statements(&index, self.flavor) {
                    match self.graph.run(query(&statement)).await {
                        Ok(_) => created += 1,
                        Err(e) => warn!("Index creation failed ({statement}): {e}"),
                    }
                }
            }
        }
        info!("Ensured {created} indexes and constraints");
        Ok(())
    }

    async fn write_vertices(&self, table: Table, batch: &[VertexRecord]) -> Result<()> {
        let rows = cypher::vertex_rows(batch);
        self.run_with_retry(&cypher::merge_vertices(table), Some(&rows))
            .await
            .with_context(|| format!("Failed to merge {} {} nodes", batch.len(), table.label()))
    }

    async fn write_edges(&self, kind: EdgeKind, batch: &[EdgeRecord]) -> Result<()> {
        let rows = cypher::edge_rows(kind, batch);
        self.run_with_retry(&cypher::merge_edges(kind), Some(&rows))
            .await
            .with_context(|| {
                format!(
                    "Failed to merge {} {} relationships",
                    batch.len(),
                    kind.spec().rel_type
                )
            })
    }

    async fn declare_graph(&self) -> Result<()> {
        // Relationship types exist as soon as a relationship is created.
        Ok(())
    }

    async fn count_vertices(&self, table: Table) -> Result<u64> {
        self.count(&cypher::count_vertices(table)).await
    }

    async fn count_edges(&self, kind: EdgeKind) -> Result<u64> {
        self.count(&cypher::count_edges(kind)).await
    }

    async fn close(&self) -> Result<()> {
        // Pooled connections are released when the Graph is dropped.
        debug!("Closing Neo4j connection pool");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_kind_is_retried() {
        assert!(is_transient_kind(Neo4jErrorKind::Transient));
        assert!(!is_transient_kind(Neo4jErrorKind::Database));
        assert!(!is_transient_kind(Neo4jErrorKind::Unknown));
    }

    #[test]
    fn test_retry_delay_doubles_then_caps() {
        assert_eq!(retry_delay(1), Duration::from_millis(100));
        assert_eq!(retry_delay(2), Duration::from_millis(200));
        assert_eq!(retry_delay(4), Duration::from_millis(800));
        assert_eq!(retry_delay(30), Duration::from_millis(RETRY_MAX_DELAY_MS));
    }
}
