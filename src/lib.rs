//! TPC-H relational-to-graph loader.
//!
//! Reads the eight pipe-delimited `.tbl` files of a TPC-H data set and loads
//! them as a property graph into SurrealDB or Neo4j / Memgraph.
//!
//! # Usage
//! ```bash
//! # SurrealDB, flags only
//! tpch-load-surreal --data-dir ./sf1 \
//!   --surreal-endpoint ws://localhost:8000 \
//!   --surreal-namespace tpch --surreal-database tpch
//!
//! # Memgraph, settings from a file, larger batches
//! tpch-load-neo4j --config tpch.toml --flavor memgraph --batch-size 5000
//!
//! # Check a data set without touching any database
//! tpch-load-neo4j --data-dir ./sf1 --dry-run
//! ```

pub mod cli;
pub mod config;
mod run;

pub use cli::{LoadArgs, Neo4jArgs, SurrealArgs};
pub use config::{LoadConfig, Neo4jConfig, SurrealConfig};
pub use run::{init_tracing, run_neo4j, run_surreal, run_with_sink};
