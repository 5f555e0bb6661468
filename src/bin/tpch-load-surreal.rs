//! Load a TPC-H data set into SurrealDB as a graph.

use clap::Parser;
use tpch_graph::{LoadArgs, SurrealArgs};

#[derive(Parser)]
#[command(name = "tpch-load-surreal")]
#[command(about = "Load TPC-H .tbl files into SurrealDB as vertex and relation tables")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    load: LoadArgs,

    #[command(flatten)]
    surreal: SurrealArgs,
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
    cli.surreal.apply(&mut config.surreal);

    tpch_graph::run_surreal(&config).await?;
    Ok(())
}
