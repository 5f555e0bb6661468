use tbl_source::SourceError;
use thiserror::Error;
use tpch_schema::{EdgeKind, KeyError, Table};

/// Errors in the rows handed to the loader.
#[derive(Error, Debug)]
pub enum InputError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Duplicate key '{key}' in table '{table}'")]
    DuplicateKey { table: Table, key: String },
}

/// Errors that abort a load run.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Table '{table}' produced a {kind} edge to missing {target} vertex '{key}'")]
    Referential {
        table: Table,
        kind: EdgeKind,
        target: Table,
        key: String,
    },

    #[error("Write to '{container}' failed at batch {batch}/{total}: {cause:#}")]
    Write {
        container: String,
        batch: usize,
        total: usize,
        cause: anyhow::Error,
    },

    #[error("Backend {operation} failed: {cause:#}")]
    Backend {
        operation: &'static str,
        cause: anyhow::Error,
    },

    #[error("Verification failed for '{container}': expected {expected}, found {found}")]
    Verification {
        container: String,
        expected: u64,
        found: u64,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<SourceError> for LoadError {
    fn from(err: SourceError) -> Self {
        LoadError::Input(InputError::Source(err))
    }
}

impl From<KeyError> for LoadError {
    fn from(err: KeyError) -> Self {
        LoadError::Input(InputError::Key(err))
    }
}

impl LoadError {
    pub(crate) fn backend(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |cause| LoadError::Backend { operation, cause }
    }
}
