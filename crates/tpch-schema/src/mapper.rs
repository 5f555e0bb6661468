//! Row mapping: one typed source row into one vertex record and the edge
//! records of every foreign key its table declares.
//!
//! Mapping is a pure function of the row and the static catalog, so it is
//! shared by every backend. Backends only choose how attributes are named.

use crate::edge::EdgeKind;
use crate::key::{IdentityKey, KeyError};
use crate::rows::TableRow;
use crate::table::{bare_name, Table};
use crate::value::PropertyValue;

/// How attribute names appear on mapped records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PropertyNaming {
    /// TPC-H column names (`c_custkey`).
    #[default]
    Prefixed,
    /// Column names without the table prefix (`custkey`).
    Bare,
}

impl PropertyNaming {
    pub fn apply(&self, column: &'static str) -> &'static str {
        match self {
            PropertyNaming::Prefixed => column,
            PropertyNaming::Bare => bare_name(column),
        }
    }
}

pub type Properties = Vec<(&'static str, PropertyValue)>;

#[derive(Debug, Clone, PartialEq)]
pub struct VertexRecord {
    pub table: Table,
    pub key: IdentityKey,
    pub properties: Properties,
}

impl VertexRecord {
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        lookup(&self.properties, name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub kind: EdgeKind,
    pub from: IdentityKey,
    pub to: IdentityKey,
    pub properties: Properties,
}

impl EdgeRecord {
    pub fn from_table(&self) -> Table {
        self.kind.spec().from
    }

    pub fn to_table(&self) -> Table {
        self.kind.spec().to
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        lookup(&self.properties, name)
    }
}

fn lookup<'a>(properties: &'a Properties, name: &str) -> Option<&'a PropertyValue> {
    properties.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
}

/// Records derived from a single source row.
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub vertex: VertexRecord,
    pub edges: Vec<EdgeRecord>,
}

/// Map one row of `R::TABLE`.
pub fn map_row<R: TableRow>(row: &R, naming: PropertyNaming) -> Result<MappedRow, KeyError> {
    let key = row.identity_key()?;

    let columns = R::TABLE.columns();
    let values = row.attributes();
    debug_assert_eq!(columns.len(), values.len());
    let properties = columns
        .iter()
        .zip(values)
        .map(|(column, value)| (naming.apply(column), value))
        .collect();

    let edges = row
        .edge_endpoints(&key)?
        .into_iter()
        .map(|endpoints| {
            let spec = endpoints.kind.spec();
            debug_assert_eq!(spec.copied.len(), endpoints.values.len());
            EdgeRecord {
                kind: endpoints.kind,
                from: endpoints.from,
                to: endpoints.to,
                properties: spec
                    .copied
                    .iter()
                    .zip(endpoints.values)
                    .map(|(column, value)| (naming.apply(column), value))
                    .collect(),
            }
        })
        .collect();

    Ok(MappedRow {
        vertex: VertexRecord {
            table: R::TABLE,
            key,
            properties,
        },
        edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rows::{LineItemRow, NationRow, OrdersRow, PartSuppRow, RegionRow};
    use chrono::NaiveDate;

    fn nation() -> NationRow {
        NationRow {
            nationkey: 7,
            name: "GERMANY".to_string(),
            regionkey: 3,
            comment: "l platelets".to_string(),
        }
    }

    #[test]
    fn test_region_has_no_edges() {
        let row = RegionRow {
            regionkey: 0,
            name: "AFRICA".to_string(),
            comment: "lar deposits".to_string(),
        };
        let mapped = map_row(&row, PropertyNaming::Prefixed).unwrap();
        assert_eq!(mapped.vertex.key.as_str(), "0");
        assert!(mapped.edges.is_empty());
        assert_eq!(
            mapped.vertex.property("r_name"),
            Some(&PropertyValue::Text("AFRICA".to_string()))
        );
    }

    #[test]
    fn test_nation_points_at_region() {
        let mapped = map_row(&nation(), PropertyNaming::Prefixed).unwrap();
        assert_eq!(mapped.edges.len(), 1);
        let edge = &mapped.edges[0];
        assert_eq!(edge.kind, EdgeKind::NationRegion);
        assert_eq!(edge.from.as_str(), "7");
        assert_eq!(edge.to.as_str(), "3");
        assert_eq!(edge.property("n_regionkey"), Some(&PropertyValue::Integer(3)));
        // The foreign key stays on the vertex too.
        assert_eq!(
            mapped.vertex.property("n_regionkey"),
            Some(&PropertyValue::Integer(3))
        );
    }

    #[test]
    fn test_bare_naming() {
        let mapped = map_row(&nation(), PropertyNaming::Bare).unwrap();
        let names: Vec<&str> = mapped.vertex.properties.iter().map(|(k, _)| *k).collect();
        assert_eq!(names, vec!["nationkey", "name", "regionkey", "comment"]);
        assert!(mapped.edges[0].property("regionkey").is_some());
    }

    #[test]
    fn test_order_edge_points_from_customer() {
        let row = OrdersRow {
            orderkey: 1,
            custkey: 370,
            orderstatus: "O".to_string(),
            totalprice: 172799.49,
            orderdate: NaiveDate::from_ymd_opt(1996, 1, 2).unwrap(),
            orderpriority: "5-LOW".to_string(),
            clerk: "Clerk#000000951".to_string(),
            shippriority: 0,
            comment: "nstructions sleep".to_string(),
        };
        let mapped = map_row(&row, PropertyNaming::Prefixed).unwrap();
        let edge = &mapped.edges[0];
        assert_eq!(edge.kind, EdgeKind::CustomerOrders);
        assert_eq!(edge.from.as_str(), "370");
        assert_eq!(edge.to.as_str(), "1");
        assert_eq!(edge.from_table(), Table::Customer);
        assert_eq!(edge.to_table(), Table::Orders);
    }

    #[test]
    fn test_partsupp_produces_three_edges() {
        let row = PartSuppRow {
            partkey: 1,
            suppkey: 2,
            availqty: 3325,
            supplycost: 771.64,
            comment: "final theodolites".to_string(),
        };
        let mapped = map_row(&row, PropertyNaming::Bare).unwrap();
        assert_eq!(mapped.vertex.key.as_str(), "1_2");
        let kinds: Vec<EdgeKind> = mapped.edges.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, Table::PartSupp.edge_kinds().to_vec());

        let supplies = &mapped.edges[2];
        assert_eq!(supplies.from.as_str(), "2");
        assert_eq!(supplies.to.as_str(), "1");
        assert_eq!(supplies.property("availqty"), Some(&PropertyValue::Integer(3325)));
        assert_eq!(
            supplies.property("supplycost"),
            Some(&PropertyValue::Decimal(771.64))
        );
    }

    #[test]
    fn test_lineitem_edges() {
        let date = NaiveDate::from_ymd_opt(1996, 3, 13).unwrap();
        let row = LineItemRow {
            orderkey: 1,
            partkey: 155190,
            suppkey: 7706,
            linenumber: 1,
            quantity: 17.0,
            extendedprice: 21168.23,
            discount: 0.04,
            tax: 0.02,
            returnflag: "N".to_string(),
            linestatus: "O".to_string(),
            shipdate: date,
            commitdate: date,
            receiptdate: date,
            shipinstruct: "DELIVER IN PERSON".to_string(),
            shipmode: "TRUCK".to_string(),
            comment: "egular courts above the".to_string(),
        };
        let mapped = map_row(&row, PropertyNaming::Prefixed).unwrap();
        assert_eq!(mapped.vertex.key.as_str(), "1_1");
        assert_eq!(mapped.vertex.properties.len(), 16);
        assert_eq!(mapped.edges.len(), 3);

        let contains = &mapped.edges[0];
        assert_eq!(contains.from.as_str(), "1");
        assert_eq!(contains.to, mapped.vertex.key);
        assert_eq!(mapped.edges[1].to.as_str(), "155190");
        assert_eq!(mapped.edges[2].to.as_str(), "7706");
        assert_eq!(
            mapped.vertex.property("l_shipdate"),
            Some(&PropertyValue::Date(date))
        );
    }
}
