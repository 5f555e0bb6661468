//! Loads against an in-memory SurrealDB engine.

use graph_loader::testing::{write_tbl_fixture, FixtureScale};
use graph_loader::{LoadContext, LoadError, LoadOptions, Loader};
use graph_sink::GraphSink;
use surreal_graph_sink::SurrealGraphSink;
use tbl_source::TblDirectory;
use tpch_schema::{EdgeKind, RegionRow, Table};

async fn memory_sink() -> SurrealGraphSink {
    let surreal = surrealdb::engine::any::connect("mem://").await.unwrap();
    surreal.use_ns("tpch").use_db("tpch").await.unwrap();
    SurrealGraphSink::from_client(surreal)
}

#[tokio::test]
async fn test_full_load_into_memory_engine() {
    let scale = FixtureScale::default();
    let dir = tempfile::tempdir().unwrap();
    write_tbl_fixture(dir.path(), &scale).unwrap();

    let context = LoadContext::new(
        memory_sink().await,
        TblDirectory::new(dir.path()),
        LoadOptions {
            batch_size: 50,
            ..LoadOptions::default()
        },
    );
    // Verification inside the run compares every table and edge count.
    let report = context.run().await.unwrap();

    let sink = context.sink();
    for table in Table::LOAD_ORDER {
        assert_eq!(
            sink.count_vertices(table).await.unwrap(),
            scale.rows(table) as u64,
            "{table}"
        );
        assert!(sink.has_table(table.name()).await.unwrap());
    }
    assert_eq!(
        sink.count_edges(EdgeKind::SupplierPart).await.unwrap(),
        report.vertices(Table::PartSupp)
    );
}

#[tokio::test]
async fn test_repeated_insert_fails() {
    let dir = tempfile::tempdir().unwrap();
    write_tbl_fixture(dir.path(), &FixtureScale::default()).unwrap();
    let source = TblDirectory::new(dir.path());
    let sink = memory_sink().await;
    sink.setup().await.unwrap();

    Loader::new(&sink, &LoadOptions::default())
        .unwrap()
        .load_table::<RegionRow>(&source)
        .await
        .unwrap();
    let err = Loader::new(&sink, &LoadOptions::default())
        .unwrap()
        .load_table::<RegionRow>(&source)
        .await
        .unwrap_err();

    assert!(matches!(err, LoadError::Write { .. }));
    assert_eq!(sink.count_vertices(Table::Region).await.unwrap(), 5);
}

#[tokio::test]
async fn test_clear_removes_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_tbl_fixture(dir.path(), &FixtureScale::default()).unwrap();
    let source = TblDirectory::new(dir.path());
    let sink = memory_sink().await;
    sink.setup().await.unwrap();
    Loader::new(&sink, &LoadOptions::default())
        .unwrap()
        .load_table::<RegionRow>(&source)
        .await
        .unwrap();

    sink.clear().await.unwrap();

    assert!(!sink.has_table("region").await.unwrap());
    assert_eq!(sink.count_vertices(Table::Region).await.unwrap(), 0);
}

#[tokio::test]
async fn test_setup_is_idempotent() {
    let sink = memory_sink().await;
    sink.setup().await.unwrap();
    sink.setup().await.unwrap();

    for table in Table::LOAD_ORDER {
        assert!(sink.has_table(table.name()).await.unwrap(), "{table}");
    }
}
