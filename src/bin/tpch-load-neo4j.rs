//! Load a TPC-H data set into Neo4j or Memgraph.

use clap::Parser;
use tpch_graph::{LoadArgs, Neo4jArgs};

#[derive(Parser)]
#[command(name = "tpch-load-neo4j")]
#[command(about = "Load TPC-H .tbl files into Neo4j or Memgraph as labeled nodes and relationships")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    load: LoadArgs,

    #[command(flatten)]
    neo4j: Neo4jArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    tpch_graph::init_tracing();

    let cli = Cli::parse();
    let mut config = cli.load.load_config()?;
    cli.neo4j.apply(&mut config.neo4j);

    tpch_graph::run_neo4j(&config).await?;
    Ok(())
}
