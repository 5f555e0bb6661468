//! Against a running SurrealDB server:
//!
//! ```text
//! SURREAL_ENDPOINT=ws://localhost:8000 cargo test -p surreal-graph-sink -- --ignored
//! ```

use graph_loader::testing::{write_tbl_fixture, FixtureScale};
use graph_loader::{LoadContext, LoadOptions};
use graph_sink::GraphSink;
use surreal_graph_sink::{SurrealGraphSink, SurrealOpts};
use tbl_source::TblDirectory;
use tpch_schema::Table;

fn opts() -> SurrealOpts {
    let env = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
    SurrealOpts {
        endpoint: env("SURREAL_ENDPOINT", "ws://localhost:8000"),
        username: env("SURREAL_USERNAME", "root"),
        password: env("SURREAL_PASSWORD", "root"),
        namespace: "tpch_test".to_string(),
        database: "tpch_test".to_string(),
    }
}

#[tokio::test]
#[ignore]
async fn test_load_into_running_server() {
    let scale = FixtureScale::default();
    let dir = tempfile::tempdir().unwrap();
    write_tbl_fixture(dir.path(), &scale).unwrap();

    let sink = SurrealGraphSink::connect(&opts()).await.unwrap();
    let context = LoadContext::new(sink, TblDirectory::new(dir.path()), LoadOptions::default());
    context.run().await.unwrap();

    assert_eq!(
        context.sink().count_vertices(Table::LineItem).await.unwrap(),
        scale.rows(Table::LineItem) as u64
    );
}
