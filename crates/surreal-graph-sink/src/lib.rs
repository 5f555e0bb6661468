//! SurrealDB backend for TPC-H graph loads.
//!
//! Every table becomes a normal table keyed by its identity key
//! (`nation:⟨7⟩`), every edge kind a `TYPE RELATION` table
//! (`nation_region`) whose records point `in` → `out`.

mod connect;
pub mod query;
mod sink;

pub use connect::{surreal_connect, surreal_connect_with_retries, ws_endpoint, SurrealOpts};
pub use sink::SurrealGraphSink;
