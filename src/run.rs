use crate::config::LoadConfig;
use anyhow::{Context, Result};
use graph_loader::{LoadContext, LoadReport};
use graph_sink::GraphSink;
use neo4j_graph_sink::Neo4jGraphSink;
use surreal_graph_sink::SurrealGraphSink;
use tbl_source::TblDirectory;
use tracing::info;

/// Install the fmt subscriber. `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run_surreal(config: &LoadConfig) -> Result<LoadReport> {
    config.validate()?;
    info!(
        "Connecting to SurrealDB at {} ({}/{})",
        config.surreal.endpoint, config.surreal.namespace, config.surreal.database
    );
    let sink = SurrealGraphSink::connect(&config.surreal.to_opts())
        .await
        .context("Failed to connect to SurrealDB")?;
    run_with_sink(sink, config).await
}

pub async fn run_neo4j(config: &LoadConfig) -> Result<LoadReport> {
    config.validate()?;
    info!(
        "Connecting to {:?} at {}",
        config.neo4j.flavor, config.neo4j.uri
    );
    let sink = Neo4jGraphSink::connect(&config.neo4j.to_opts())
        .await
        .context("Failed to connect to Neo4j")?;
    run_with_sink(sink, config).await
}

/// Full load of `config.data_dir` into an already connected sink.
pub async fn run_with_sink<S: GraphSink>(sink: S, config: &LoadConfig) -> Result<LoadReport> {
    config.validate()?;
    let source = TblDirectory::new(&config.data_dir);
    let context = LoadContext::new(sink, source, config.load_options());
    Ok(context.run().await?)
}
