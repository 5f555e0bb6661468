//! Input errors. All of them are fatal for the table being loaded.

use std::path::PathBuf;
use thiserror::Error;
use tpch_schema::Table;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {table} line {line}: {source}")]
    Read {
        table: Table,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("{table} line {line}: expected {expected} columns, found {found}")]
    MissingColumns {
        table: Table,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{table} line {line}: malformed row: {source}")]
    Malformed {
        table: Table,
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("Reader was opened for {expected} but rows of {requested} were requested")]
    TableMismatch { expected: Table, requested: Table },
}
