//! Foreign keys expressed as directed graph edges.

use crate::table::Table;

/// Every relationship the loader materialises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    NationRegion,
    SupplierNation,
    CustomerNation,
    PartSuppPart,
    PartSuppSupplier,
    SupplierPart,
    CustomerOrders,
    OrderLineItems,
    LineItemPart,
    LineItemSupplier,
}

/// Static description of one edge kind.
///
/// Direction is fixed per relationship: dimension references point from
/// child to parent (`nation -> region`), fact relationships follow their verb
/// (`customer -PLACED-> orders`, `orders -CONTAINS-> lineitem`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeSpec {
    pub kind: EdgeKind,
    pub from: Table,
    pub to: Table,
    /// Edge container name for document stores.
    pub container: &'static str,
    /// Relationship type for label-based stores.
    pub rel_type: &'static str,
    /// Source columns copied onto the edge.
    pub copied: &'static [&'static str],
    /// The table whose rows produce this edge.
    pub produced_by: Table,
}

impl EdgeKind {
    /// All edge kinds in load order of the table producing them.
    pub const ALL: [EdgeKind; 10] = [
        EdgeKind::NationRegion,
        EdgeKind::SupplierNation,
        EdgeKind::CustomerNation,
        EdgeKind::PartSuppPart,
        EdgeKind::PartSuppSupplier,
        EdgeKind::SupplierPart,
        EdgeKind::CustomerOrders,
        EdgeKind::OrderLineItems,
        EdgeKind::LineItemPart,
        EdgeKind::LineItemSupplier,
    ];

    pub fn spec(&self) -> EdgeSpec {
        let (from, to, container, rel_type, copied, produced_by): (
            Table,
            Table,
            &'static str,
            &'static str,
            &'static [&'static str],
            Table,
        ) = match self {
            EdgeKind::NationRegion => (
                Table::Nation,
                Table::Region,
                "nation_region",
                "BELONGS_TO",
                &["n_regionkey"],
                Table::Nation,
            ),
            EdgeKind::SupplierNation => (
                Table::Supplier,
                Table::Nation,
                "supplier_nation",
                "LOCATED_IN",
                &["s_nationkey"],
                Table::Supplier,
            ),
            EdgeKind::CustomerNation => (
                Table::Customer,
                Table::Nation,
                "customer_nation",
                "LOCATED_IN",
                &["c_nationkey"],
                Table::Customer,
            ),
            EdgeKind::PartSuppPart => (
                Table::PartSupp,
                Table::Part,
                "partsupp_part",
                "OF_PART",
                &["ps_partkey"],
                Table::PartSupp,
            ),
            EdgeKind::PartSuppSupplier => (
                Table::PartSupp,
                Table::Supplier,
                "partsupp_supplier",
                "SUPPLIED_BY",
                &["ps_suppkey"],
                Table::PartSupp,
            ),
            EdgeKind::SupplierPart => (
                Table::Supplier,
                Table::Part,
                "supplies",
                "SUPPLIES",
                &["ps_availqty", "ps_supplycost"],
                Table::PartSupp,
            ),
            EdgeKind::CustomerOrders => (
                Table::Customer,
                Table::Orders,
                "customer_orders",
                "PLACED",
                &["o_custkey"],
                Table::Orders,
            ),
            EdgeKind::OrderLineItems => (
                Table::Orders,
                Table::LineItem,
                "order_lineitems",
                "CONTAINS",
                &["l_orderkey"],
                Table::LineItem,
            ),
            EdgeKind::LineItemPart => (
                Table::LineItem,
                Table::Part,
                "lineitem_part",
                "OF_PART",
                &["l_partkey"],
                Table::LineItem,
            ),
            EdgeKind::LineItemSupplier => (
                Table::LineItem,
                Table::Supplier,
                "lineitem_supplier",
                "SUPPLIED_BY",
                &["l_suppkey"],
                Table::LineItem,
            ),
        };
        EdgeSpec {
            kind: *self,
            from,
            to,
            container,
            rel_type,
            copied,
            produced_by,
        }
    }

    pub fn container(&self) -> &'static str {
        self.spec().container
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.container())
    }
}
