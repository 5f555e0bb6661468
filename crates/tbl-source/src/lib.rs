//! Tabular source reader for TPC-H `.tbl` files.
//!
//! The data generator writes one pipe-delimited file per table with no
//! header row and a trailing empty field on every line. Only the first
//! `column_count` fields of each line are read; the rest is ignored.
//!
//! Rows come out as the statically typed records of [`tpch_schema`], so
//! everything downstream works on checked fields instead of string lookups.

mod error;
mod reader;

pub use error::SourceError;
pub use reader::{count_records, TblDirectory, TblReader, TblRows};
