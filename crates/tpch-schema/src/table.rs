//! The TPC-H table catalog.

use crate::edge::EdgeKind;

/// Strip the TPC-H table prefix from a column name.
pub(crate) fn bare_name(column: &'static str) -> &'static str {
    column
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(column)
}

/// A secondary index declared before bulk loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDef {
    pub table: Table,
    pub field: &'static str,
    pub unique: bool,
}

impl IndexDef {
    /// Index name, stable across runs so re-creation is detectable.
    pub fn name(&self) -> String {
        format!("{}_{}_idx", self.table.name(), self.field)
    }
}

/// Vertex definition for a table: which fields form the identity key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexSpec {
    pub table: Table,
    pub key_fields: &'static [&'static str],
}

/// The eight TPC-H tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Region,
    Nation,
    Supplier,
    Customer,
    Part,
    PartSupp,
    Orders,
    LineItem,
}

const REGION_COLUMNS: &[&str] = &["r_regionkey", "r_name", "r_comment"];

const NATION_COLUMNS: &[&str] = &["n_nationkey", "n_name", "n_regionkey", "n_comment"];

const SUPPLIER_COLUMNS: &[&str] = &[
    "s_suppkey",
    "s_name",
    "s_address",
    "s_nationkey",
    "s_phone",
    "s_acctbal",
    "s_comment",
];

const CUSTOMER_COLUMNS: &[&str] = &[
    "c_custkey",
    "c_name",
    "c_address",
    "c_nationkey",
    "c_phone",
    "c_acctbal",
    "c_mktsegment",
    "c_comment",
];

const PART_COLUMNS: &[&str] = &[
    "p_partkey",
    "p_name",
    "p_mfgr",
    "p_brand",
    "p_type",
    "p_size",
    "p_container",
    "p_retailprice",
    "p_comment",
];

const PARTSUPP_COLUMNS: &[&str] = &[
    "ps_partkey",
    "ps_suppkey",
    "ps_availqty",
    "ps_supplycost",
    "ps_comment",
];

const ORDERS_COLUMNS: &[&str] = &[
    "o_orderkey",
    "o_custkey",
    "o_orderstatus",
    "o_totalprice",
    "o_orderdate",
    "o_orderpriority",
    "o_clerk",
    "o_shippriority",
    "o_comment",
];

const LINEITEM_COLUMNS: &[&str] = &[
    "l_orderkey",
    "l_partkey",
    "l_suppkey",
    "l_linenumber",
    "l_quantity",
    "l_extendedprice",
    "l_discount",
    "l_tax",
    "l_returnflag",
    "l_linestatus",
    "l_shipdate",
    "l_commitdate",
    "l_receiptdate",
    "l_shipinstruct",
    "l_shipmode",
    "l_comment",
];

impl Table {
    /// All tables in dependency order: every table appears after each table
    /// its edges point into.
    pub const LOAD_ORDER: [Table; 8] = [
        Table::Region,
        Table::Nation,
        Table::Supplier,
        Table::Customer,
        Table::Part,
        Table::PartSupp,
        Table::Orders,
        Table::LineItem,
    ];

    /// Container (collection / table) name.
    pub fn name(&self) -> &'static str {
        match self {
            Table::Region => "region",
            Table::Nation => "nation",
            Table::Supplier => "supplier",
            Table::Customer => "customer",
            Table::Part => "part",
            Table::PartSupp => "partsupp",
            Table::Orders => "orders",
            Table::LineItem => "lineitem",
        }
    }

    /// Node label used by label-based graph stores.
    pub fn label(&self) -> &'static str {
        match self {
            Table::Region => "Region",
            Table::Nation => "Nation",
            Table::Supplier => "Supplier",
            Table::Customer => "Customer",
            Table::Part => "Part",
            Table::PartSupp => "PartSupp",
            Table::Orders => "Order",
            Table::LineItem => "LineItem",
        }
    }

    /// File name produced by the TPC-H data generator.
    pub fn file_name(&self) -> String {
        format!("{}.tbl", self.name())
    }

    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Region => REGION_COLUMNS,
            Table::Nation => NATION_COLUMNS,
            Table::Supplier => SUPPLIER_COLUMNS,
            Table::Customer => CUSTOMER_COLUMNS,
            Table::Part => PART_COLUMNS,
            Table::PartSupp => PARTSUPP_COLUMNS,
            Table::Orders => ORDERS_COLUMNS,
            Table::LineItem => LINEITEM_COLUMNS,
        }
    }

    /// Number of leading columns read from each source line.
    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    pub fn key_fields(&self) -> &'static [&'static str] {
        match self {
            Table::Region => &["r_regionkey"],
            Table::Nation => &["n_nationkey"],
            Table::Supplier => &["s_suppkey"],
            Table::Customer => &["c_custkey"],
            Table::Part => &["p_partkey"],
            Table::PartSupp => &["ps_partkey", "ps_suppkey"],
            Table::Orders => &["o_orderkey"],
            Table::LineItem => &["l_orderkey", "l_linenumber"],
        }
    }

    pub fn vertex_spec(&self) -> VertexSpec {
        VertexSpec {
            table: *self,
            key_fields: self.key_fields(),
        }
    }

    /// Edge kinds whose records are produced while loading this table.
    pub fn edge_kinds(&self) -> &'static [EdgeKind] {
        match self {
            Table::Region | Table::Part => &[],
            Table::Nation => &[EdgeKind::NationRegion],
            Table::Supplier => &[EdgeKind::SupplierNation],
            Table::Customer => &[EdgeKind::CustomerNation],
            Table::PartSupp => &[
                EdgeKind::PartSuppPart,
                EdgeKind::PartSuppSupplier,
                EdgeKind::SupplierPart,
            ],
            Table::Orders => &[EdgeKind::CustomerOrders],
            Table::LineItem => &[
                EdgeKind::OrderLineItems,
                EdgeKind::LineItemPart,
                EdgeKind::LineItemSupplier,
            ],
        }
    }

    /// Indexes on key and foreign-key fields.
    pub fn indexes(&self) -> Vec<IndexDef> {
        let fields: &[(&'static str, bool)] = match self {
            Table::Region => &[("r_regionkey", true)],
            Table::Nation => &[("n_nationkey", true), ("n_regionkey", false)],
            Table::Supplier => &[("s_suppkey", true), ("s_nationkey", false)],
            Table::Customer => &[("c_custkey", true), ("c_nationkey", false)],
            Table::Part => &[("p_partkey", true)],
            Table::PartSupp => &[("ps_partkey", false), ("ps_suppkey", false)],
            Table::Orders => &[("o_orderkey", true), ("o_custkey", false)],
            Table::LineItem => &[
                ("l_orderkey", false),
                ("l_linenumber", false),
                ("l_partkey", false),
                ("l_suppkey", false),
            ],
        };
        fields
            .iter()
            .map(|&(field, unique)| IndexDef {
                table: *self,
                field,
                unique,
            })
            .collect()
    }

    /// Whether some table loaded later has edges pointing into this one.
    pub fn is_referenced(&self) -> bool {
        EdgeKind::ALL.iter().any(|kind| {
            let spec = kind.spec();
            spec.produced_by != *self && (spec.from == *self || spec.to == *self)
        })
    }

    /// Position in [`Table::LOAD_ORDER`].
    pub fn load_rank(&self) -> usize {
        Table::LOAD_ORDER
            .iter()
            .position(|t| t == self)
            .unwrap_or(Table::LOAD_ORDER.len())
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Table {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::LOAD_ORDER
            .iter()
            .copied()
            .find(|t| t.name() == s.to_lowercase())
            .ok_or_else(|| format!("Unknown TPC-H table: '{s}'"))
    }
}
