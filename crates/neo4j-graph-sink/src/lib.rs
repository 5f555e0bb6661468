//! Neo4j / Memgraph backend for TPC-H graph loads.
//!
//! Tables become node labels (`orders` → `Order`), edge kinds become
//! relationship types, and attribute names drop the TPC-H column prefix so
//! the standard graph query catalog (`c.mktsegment`, `l.shipdate`) runs
//! unchanged.

pub mod cypher;
mod sink;

pub use cypher::CypherFlavor;
pub use sink::{Neo4jGraphSink, Neo4jOpts};
