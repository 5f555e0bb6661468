//! Load configuration.
//!
//! Built-in defaults, then an optional TOML file, then command-line flags
//! and environment variables. Every field may be omitted from the file:
//!
//! ```toml
//! data_dir = "/data/tpch/sf1"
//! batch_size = 5000
//!
//! [surreal]
//! endpoint = "ws://surrealdb:8000"
//!
//! [neo4j]
//! uri = "bolt://memgraph:7687"
//! flavor = "memgraph"
//! ```

use anyhow::Context;
use graph_loader::{LoadError, LoadOptions, DEFAULT_BATCH_SIZE};
use neo4j_graph_sink::{CypherFlavor, Neo4jOpts};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use surreal_graph_sink::SurrealOpts;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadConfig {
    /// Directory holding `<table>.tbl` files.
    pub data_dir: PathBuf,
    pub batch_size: usize,
    pub dry_run: bool,
    pub verify: bool,
    pub surreal: SurrealConfig,
    pub neo4j: Neo4jConfig,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
            verify: true,
            surreal: SurrealConfig::default(),
            neo4j: Neo4jConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurrealConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub database: String,
}

impl Default for SurrealConfig {
    fn default() -> Self {
        Self {
            endpoint: "ws://localhost:8000".to_string(),
            username: "root".to_string(),
            password: "root".to_string(),
            namespace: "tpch".to_string(),
            database: "tpch".to_string(),
        }
    }
}

impl SurrealConfig {
    pub fn to_opts(&self) -> SurrealOpts {
        SurrealOpts {
            endpoint: self.endpoint.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            namespace: self.namespace.clone(),
            database: self.database.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub transaction_retry_secs: u64,
    pub flavor: CypherFlavor,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: "password".to_string(),
            database: None,
            transaction_retry_secs: 60,
            flavor: CypherFlavor::Neo4j,
        }
    }
}

impl Neo4jConfig {
    pub fn to_opts(&self) -> Neo4jOpts {
        Neo4jOpts {
            uri: self.uri.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            transaction_retry: Duration::from_secs(self.transaction_retry_secs),
            flavor: self.flavor,
        }
    }
}

impl LoadConfig {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if self.batch_size == 0 {
            return Err(LoadError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }
        if self.surreal.endpoint.is_empty() {
            return Err(LoadError::Config("surreal.endpoint is empty".to_string()));
        }
        if self.neo4j.uri.is_empty() {
            return Err(LoadError::Config("neo4j.uri is empty".to_string()));
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            batch_size: self.batch_size,
            dry_run: self.dry_run,
            verify: self.verify,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = LoadConfig::from_toml("").unwrap();
        assert_eq!(config, LoadConfig::default());
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.neo4j.transaction_retry_secs, 60);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = LoadConfig::from_toml(
            r#"
            batch_size = 250
            dry_run = true

            [neo4j]
            uri = "bolt://memgraph:7687"
            flavor = "memgraph"
            "#,
        )
        .unwrap();
        assert_eq!(config.batch_size, 250);
        assert!(config.dry_run);
        assert_eq!(config.neo4j.flavor, CypherFlavor::Memgraph);
        assert_eq!(config.neo4j.username, "neo4j");
        assert_eq!(config.surreal, SurrealConfig::default());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(LoadConfig::from_toml("batchsize = 10").is_err());
        assert!(LoadConfig::from_toml("[surreal]\nhost = \"x\"").is_err());
    }

    #[test]
    fn test_zero_batch_size_fails_validation() {
        let config = LoadConfig {
            batch_size: 0,
            ..LoadConfig::default()
        };
        assert!(matches!(config.validate(), Err(LoadError::Config(_))));
        assert!(LoadConfig::default().validate().is_ok());
    }

    #[test]
    fn test_retry_window_reaches_neo4j_opts() {
        let config = Neo4jConfig {
            transaction_retry_secs: 5,
            database: Some("tpch".to_string()),
            ..Neo4jConfig::default()
        };
        let opts = config.to_opts();
        assert_eq!(opts.transaction_retry, Duration::from_secs(5));
        assert_eq!(opts.database.as_deref(), Some("tpch"));
    }
}
