//! TPC-H schema catalog and relational-to-graph mapping.
//!
//! This crate is the pure core of the loader. It knows nothing about files
//! or databases:
//!
//! - [`Table`] - the eight TPC-H tables, their columns, keys and indexes
//! - [`EdgeKind`] / [`EdgeSpec`] - every foreign key expressed as a directed edge
//! - [`TableRow`] - one statically typed record per table
//! - [`IdentityKey`] - stable vertex identity derived from natural keys
//! - [`map_row`] - one row in, one vertex plus its edges out
//!
//! # Architecture
//!
//! ```text
//! tpch-schema (this crate)
//!    │
//!    ├─── tbl-source          (parses .tbl files into TableRow types)
//!    ├─── graph-sink          (backend trait over VertexRecord / EdgeRecord)
//!    └─── graph-loader        (orders tables, batches and commits records)
//! ```

mod edge;
mod key;
mod mapper;
mod rows;
mod table;
mod value;

pub use edge::{EdgeKind, EdgeSpec};
pub use key::{IdentityKey, KeyError, KEY_SEPARATOR};
pub use mapper::{map_row, EdgeRecord, MappedRow, Properties, PropertyNaming, VertexRecord};
pub use rows::{
    CustomerRow, EdgeEndpoints, LineItemRow, NationRow, OrdersRow, PartRow, PartSuppRow, RegionRow, SupplierRow,
    TableRow,
};
pub use table::{IndexDef, Table, VertexSpec};
pub use value::PropertyValue;
