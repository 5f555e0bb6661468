//! Against a running Neo4j (or Memgraph with `NEO4J_FLAVOR=memgraph`):
//!
//! ```text
//! NEO4J_URI=bolt://localhost:7687 cargo test -p neo4j-graph-sink -- --ignored
//! ```

use graph_loader::testing::{write_tbl_fixture, FixtureScale};
use graph_loader::{LoadContext, LoadOptions, Loader};
use graph_sink::GraphSink;
use neo4j_graph_sink::{CypherFlavor, Neo4jGraphSink, Neo4jOpts};
use std::time::Duration;
use tbl_source::TblDirectory;
use tpch_schema::{EdgeKind, Table};

fn opts() -> Neo4jOpts {
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    Neo4jOpts {
        uri: env("NEO4J_URI", "bolt://localhost:7687"),
        username: env("NEO4J_USERNAME", "neo4j"),
        password: env("NEO4J_PASSWORD", "password"),
        database: std::env::var("NEO4J_DATABASE").ok(),
        transaction_retry: Duration::from_secs(60),
        flavor: env("NEO4J_FLAVOR", "neo4j").parse().unwrap_or(CypherFlavor::Neo4j),
    }
}

#[tokio::test]
#[ignore]
async fn test_load_and_reload_is_idempotent() {
    let scale = FixtureScale::default();
    let dir = tempfile::tempdir().unwrap();
    write_tbl_fixture(dir.path(), &scale).unwrap();
    let source = TblDirectory::new(dir.path());

    let sink = Neo4jGraphSink::connect(&opts()).await.unwrap();
    let context = LoadContext::new(sink, source.clone(), LoadOptions::default());
    context.run().await.unwrap();
    let sink = context.into_sink();

    // A second pass without clearing must not add anything.
    Loader::new(&sink, &LoadOptions::default())
        .unwrap()
        .load_all(&source)
        .await
        .unwrap();

    for table in Table::LOAD_ORDER {
        assert_eq!(
            sink.count_vertices(table).await.unwrap(),
            scale.rows(table) as u64,
            "{table}"
        );
    }
    assert_eq!(
        sink.count_edges(EdgeKind::NationRegion).await.unwrap(),
        scale.nations as u64
    );
}
