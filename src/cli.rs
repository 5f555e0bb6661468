//! Command-line flags shared by the loader binaries.
//!
//! Every flag is optional and overrides the value from the `--config` file,
//! which in turn overrides the built-in defaults.

use crate::config::{LoadConfig, Neo4jConfig, SurrealConfig};
use clap::Parser;
use neo4j_graph_sink::CypherFlavor;
use std::path::PathBuf;

#[derive(Parser, Clone, Debug, Default)]
pub struct LoadArgs {
    /// TOML configuration file
    #[arg(long, env = "TPCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory holding the `<table>.tbl` files
    #[arg(long, env = "TPCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Records per write batch
    #[arg(long, env = "TPCH_BATCH_SIZE")]
    pub batch_size: Option<usize>,

    /// Read, map and check all rows without writing to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the count comparison after the load
    #[arg(long)]
    pub no_verify: bool,
}

impl LoadArgs {
    /// Configuration file (or defaults) with these flags applied on top.
    pub fn load_config(&self) -> anyhow::Result<LoadConfig> {
        let mut config = match &self.config {
            Some(path) => LoadConfig::from_file(path)?,
            None => LoadConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    pub fn apply(&self, config: &mut LoadConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.data_dir = data_dir.clone();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.no_verify {
            config.verify = false;
        }
    }
}

#[derive(Parser, Clone, Debug, Default)]
pub struct SurrealArgs {
    /// SurrealDB endpoint URL
    #[arg(long, env = "SURREAL_ENDPOINT")]
    pub surreal_endpoint: Option<String>,

    /// SurrealDB username
    #[arg(long, env = "SURREAL_USERNAME")]
    pub surreal_username: Option<String>,

    /// SurrealDB password
    #[arg(long, env = "SURREAL_PASSWORD")]
    pub surreal_password: Option<String>,

    /// SurrealDB namespace
    #[arg(long, env = "SURREAL_NAMESPACE")]
    pub surreal_namespace: Option<String>,

    /// SurrealDB database
    #[arg(long, env = "SURREAL_DATABASE")]
    pub surreal_database: Option<String>,
}

impl SurrealArgs {
    pub fn apply(&self, config: &mut SurrealConfig) {
        override_with(&mut config.endpoint, &self.surreal_endpoint);
        override_with(&mut config.username, &self.surreal_username);
        override_with(&mut config.password, &self.surreal_password);
        override_with(&mut config.namespace, &self.surreal_namespace);
        override_with(&mut config.database, &self.surreal_database);
    }
}

#[derive(Parser, Clone, Debug, Default)]
pub struct Neo4jArgs {
    /// Bolt URI of the Neo4j or Memgraph server
    #[arg(long, env = "NEO4J_URI")]
    pub neo4j_uri: Option<String>,

    /// Neo4j username
    #[arg(long, env = "NEO4J_USERNAME")]
    pub neo4j_username: Option<String>,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD")]
    pub neo4j_password: Option<String>,

    /// Neo4j database (server default when unset)
    #[arg(long, env = "NEO4J_DATABASE")]
    pub neo4j_database: Option<String>,

    /// Seconds to keep retrying a batch that failed with a transient error
    #[arg(long, env = "NEO4J_TRANSACTION_RETRY_SECS")]
    pub transaction_retry_secs: Option<u64>,

    /// Server family: neo4j or memgraph
    #[arg(long, env = "NEO4J_FLAVOR")]
    pub flavor: Option<CypherFlavor>,
}

impl Neo4jArgs {
    pub fn apply(&self, config: &mut Neo4jConfig) {
        override_with(&mut config.uri, &self.neo4j_uri);
        override_with(&mut config.username, &self.neo4j_username);
        override_with(&mut config.password, &self.neo4j_password);
        if let Some(database) = &self.neo4j_database {
            config.database = Some(database.clone());
        }
        if let Some(secs) = self.transaction_retry_secs {
            config.transaction_retry_secs = secs;
        }
        if let Some(flavor) = self.flavor {
            config.flavor = flavor;
        }
    }
}

fn override_with(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}
