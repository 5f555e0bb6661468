//! Loading TPC-H rows into a graph backend.
//!
//! The loader reads `.tbl` files through `tbl-source`, maps rows with
//! `tpch-schema`, and writes batches through any [`graph_sink::GraphSink`]:
//!
//! ```text
//! TblDirectory ──rows──> Loader ──map_row──> ReferentialGuard
//!                          │
//!                          └──BatchCommitter──> GraphSink
//! ```
//!
//! [`LoadContext`] wraps one complete run.

mod batch;
mod context;
mod error;
mod guard;
mod loader;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use batch::{BatchCommitter, BatchProgress, Batches, DEFAULT_BATCH_SIZE};
pub use context::LoadContext;
pub use error::{InputError, LoadError};
pub use guard::ReferentialGuard;
pub use loader::{verify, LoadOptions, LoadReport, Loader, TableReport};
