//! Cypher templates and `$rows` parameters.
//!
//! One template per vertex table and per edge kind. Every template unwinds a
//! list parameter, so one statement writes one batch:
//!
//! ```text
//! UNWIND $rows AS row MERGE (n:Nation {nationkey: row.nationkey}) SET n += row
//! UNWIND $rows AS row MATCH (a:Nation {nationkey: row.from_nationkey})
//!   MATCH (b:Region {regionkey: row.to_regionkey})
//!   MERGE (a)-[r:BELONGS_TO]->(b) SET r += row.props
//! ```

use neo4rs::{BoltDate, BoltFloat, BoltInteger, BoltList, BoltMap, BoltString, BoltType};
use serde::Deserialize;
use tpch_schema::{
    EdgeKind, EdgeRecord, IdentityKey, IndexDef, Properties, PropertyNaming, PropertyValue, Table,
    VertexRecord,
};

const NAMING: PropertyNaming = PropertyNaming::Bare;

/// Server family; only schema statements differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CypherFlavor {
    #[default]
    Neo4j,
    Memgraph,
}

impl std::str::FromStr for CypherFlavor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neo4j" => Ok(CypherFlavor::Neo4j),
            "memgraph" => Ok(CypherFlavor::Memgraph),
            other => Err(format!("Unknown Cypher flavor '{other}' (expected neo4j or memgraph)")),
        }
    }
}

fn key_properties(table: Table) -> impl Iterator<Item = &'static str> {
    table.key_fields().iter().map(|field| NAMING.apply(field))
}

/// `{nationkey: row.nationkey}` style pattern map.
fn key_pattern(table: Table, row_prefix: &str) -> String {
    let pairs: Vec<String> = key_properties(table)
        .map(|prop| format!("{prop}: row.{row_prefix}{prop}"))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

pub fn merge_vertices(table: Table) -> String {
    format!(
        "UNWIND $rows AS row MERGE (n:{} {}) SET n += row",
        table.label(),
        key_pattern(table, "")
    )
}

pub fn merge_edges(kind: EdgeKind) -> String {
    let spec = kind.spec();
    format!(
        "UNWIND $rows AS row \
         MATCH (a:{} {}) \
         MATCH (b:{} {}) \
         MERGE (a)-[r:{}]->(b) SET r += row.props",
        spec.from.label(),
        key_pattern(spec.from, "from_"),
        spec.to.label(),
        key_pattern(spec.to, "to_"),
        spec.rel_type
    )
}

/// Schema statements for one index, run in order. Memgraph uniqueness
/// constraints do not create a label-property index, so a unique field gets
/// the index first and the constraint second.
pub fn index_statements(index: &IndexDef, flavor: CypherFlavor) -> Vec<String> {
    let label = index.table.label();
    let prop = NAMING.apply(index.field);
    match (flavor, index.unique) {
        (CypherFlavor::Neo4j, true) => vec![format!(
            "CREATE CONSTRAINT {} IF NOT EXISTS FOR (n:{label}) REQUIRE n.{prop} IS UNIQUE",
            index.name()
        )],
        (CypherFlavor::Neo4j, false) => vec![format!(
            "CREATE INDEX {} IF NOT EXISTS FOR (n:{label}) ON (n.{prop})",
            index.name()
        )],
        (CypherFlavor::Memgraph, unique) => {
            let mut statements = vec![format!("CREATE INDEX ON :{label}({prop})")];
            if unique {
                statements.push(format!(
                    "CREATE CONSTRAINT ON (n:{label}) ASSERT n.{prop} IS UNIQUE"
                ));
            }
            statements
        }
    }
}

pub const DETACH_DELETE_ALL: &str = "MATCH (n) DETACH DELETE n";

pub fn count_vertices(table: Table) -> String {
    format!("MATCH (n:{}) RETURN count(n) AS count", table.label())
}

pub fn count_edges(kind: EdgeKind) -> String {
    // Relationship types are shared between kinds (OF_PART, LOCATED_IN, ...),
    // so both endpoint labels are part of the pattern.
    let spec = kind.spec();
    format!(
        "MATCH (:{})-[r:{}]->(:{}) RETURN count(r) AS count",
        spec.from.label(),
        spec.rel_type,
        spec.to.label()
    )
}

pub(crate) fn to_bolt(value: &PropertyValue) -> BoltType {
    match value {
        PropertyValue::Integer(i) => BoltType::Integer(BoltInteger::new(*i)),
        PropertyValue::Decimal(d) => BoltType::Float(BoltFloat::new(*d)),
        PropertyValue::Text(s) => BoltType::String(BoltString::new(s)),
        PropertyValue::Date(d) => BoltType::Date(BoltDate::from(*d)),
    }
}

fn properties_map(properties: &Properties) -> BoltMap {
    let mut map = BoltMap::new();
    for (name, value) in properties {
        map.put((*name).into(), to_bolt(value));
    }
    map
}

fn put_key(map: &mut BoltMap, table: Table, prefix: &str, key: &IdentityKey) {
    for (prop, part) in key_properties(table).zip(key.parts()) {
        map.put(
            format!("{prefix}{prop}").as_str().into(),
            BoltType::Integer(BoltInteger::new(*part)),
        );
    }
}

/// `$rows` of [`merge_vertices`]: one property map per vertex.
pub fn vertex_rows(batch: &[VertexRecord]) -> BoltType {
    let mut rows = BoltList::new();
    for vertex in batch {
        rows.push(BoltType::Map(properties_map(&vertex.properties)));
    }
    BoltType::List(rows)
}

/// `$rows` of [`merge_edges`]: endpoint keys plus a `props` map.
pub fn edge_rows(kind: EdgeKind, batch: &[EdgeRecord]) -> BoltType {
    let spec = kind.spec();
    let mut rows = BoltList::new();
    for edge in batch {
        let mut row = BoltMap::new();
        put_key(&mut row, spec.from, "from_", &edge.from);
        put_key(&mut row, spec.to, "to_", &edge.to);
        row.put("props".into(), BoltType::Map(properties_map(&edge.properties)));
        rows.push(BoltType::Map(row));
    }
    BoltType::List(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tpch_schema::{map_row, LineItemRow, PartSuppRow};

    fn lineitem() -> LineItemRow {
        let date = NaiveDate::from_ymd_opt(1996, 3, 13).unwrap();
        LineItemRow {
            orderkey: 1,
            partkey: 155190,
            suppkey: 7706,
            linenumber: 2,
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
            comment: "egular courts".to_string(),
        }
    }

    fn entry<'a>(map: &'a BoltMap, key: &str) -> Option<&'a BoltType> {
        map.value.get(&BoltString::from(key))
    }

    #[test]
    fn test_vertex_templates_merge_on_natural_key() {
        assert_eq!(
            merge_vertices(Table::Customer),
            "UNWIND $rows AS row MERGE (n:Customer {custkey: row.custkey}) SET n += row"
        );
        assert_eq!(
            merge_vertices(Table::LineItem),
            "UNWIND $rows AS row MERGE (n:LineItem {orderkey: row.orderkey, linenumber: row.linenumber}) SET n += row"
        );
        assert_eq!(
            merge_vertices(Table::Orders),
            "UNWIND $rows AS row MERGE (n:Order {orderkey: row.orderkey}) SET n += row"
        );
    }

    #[test]
    fn test_edge_template_matches_both_endpoints() {
        assert_eq!(
            merge_edges(EdgeKind::OrderLineItems),
            "UNWIND $rows AS row \
             MATCH (a:Order {orderkey: row.from_orderkey}) \
             MATCH (b:LineItem {orderkey: row.to_orderkey, linenumber: row.to_linenumber}) \
             MERGE (a)-[r:CONTAINS]->(b) SET r += row.props"
        );
        assert!(merge_edges(EdgeKind::SupplierPart)
            .contains("MATCH (a:Supplier {suppkey: row.from_suppkey})"));
    }

    #[test]
    fn test_edge_rows_carry_key_components() {
        let mapped = map_row(&lineitem(), PropertyNaming::Bare).unwrap();
        let rows = edge_rows(EdgeKind::OrderLineItems, &mapped.edges[..1]);
        let BoltType::List(rows) = rows else {
            panic!("expected list");
        };
        let BoltType::Map(row) = &rows.value[0] else {
            panic!("expected map");
        };
        assert_eq!(
            entry(row, "from_orderkey"),
            Some(&BoltType::Integer(BoltInteger::new(1)))
        );
        assert_eq!(
            entry(row, "to_linenumber"),
            Some(&BoltType::Integer(BoltInteger::new(2)))
        );
        assert!(matches!(entry(row, "props"), Some(BoltType::Map(_))));
    }

    #[test]
    fn test_vertex_rows_use_bare_names_and_dates() {
        let mapped = map_row(&lineitem(), PropertyNaming::Bare).unwrap();
        let BoltType::List(rows) = vertex_rows(&[mapped.vertex]) else {
            panic!("expected list");
        };
        let BoltType::Map(row) = &rows.value[0] else {
            panic!("expected map");
        };
        assert!(entry(row, "l_orderkey").is_none());
        assert!(matches!(entry(row, "shipdate"), Some(BoltType::Date(_))));
        assert!(matches!(entry(row, "quantity"), Some(BoltType::Float(_))));
    }

    #[test]
    fn test_shortcut_edge_props() {
        let row = PartSuppRow {
            partkey: 3,
            suppkey: 4,
            availqty: 3325,
            supplycost: 771.64,
            comment: String::new(),
        };
        let mapped = map_row(&row, PropertyNaming::Bare).unwrap();
        let supplies: Vec<_> = mapped
            .edges
            .into_iter()
            .filter(|edge| edge.kind == EdgeKind::SupplierPart)
            .collect();
        let BoltType::List(rows) = edge_rows(EdgeKind::SupplierPart, &supplies) else {
            panic!("expected list");
        };
        let BoltType::Map(row) = &rows.value[0] else {
            panic!("expected map");
        };
        let Some(BoltType::Map(props)) = entry(row, "props") else {
            panic!("expected props");
        };
        assert_eq!(
            entry(props, "availqty"),
            Some(&BoltType::Integer(BoltInteger::new(3325)))
        );
        assert_eq!(
            entry(row, "to_partkey"),
            Some(&BoltType::Integer(BoltInteger::new(3)))
        );
    }

    #[test]
    fn test_index_statements_per_flavor() {
        let indexes = Table::Customer.indexes();
        assert_eq!(
            index_statements(&indexes[0], CypherFlavor::Neo4j),
            vec!["CREATE CONSTRAINT customer_c_custkey_idx IF NOT EXISTS FOR (n:Customer) REQUIRE n.custkey IS UNIQUE"]
        );
        assert_eq!(
            index_statements(&indexes[1], CypherFlavor::Neo4j),
            vec!["CREATE INDEX customer_c_nationkey_idx IF NOT EXISTS FOR (n:Customer) ON (n.nationkey)"]
        );
        assert_eq!(
            index_statements(&indexes[0], CypherFlavor::Memgraph),
            vec![
                "CREATE INDEX ON :Customer(custkey)",
                "CREATE CONSTRAINT ON (n:Customer) ASSERT n.custkey IS UNIQUE",
            ]
        );
        assert_eq!(
            index_statements(&indexes[1], CypherFlavor::Memgraph),
            vec!["CREATE INDEX ON :Customer(nationkey)"]
        );
        assert_eq!("MEMGRAPH".parse::<CypherFlavor>(), Ok(CypherFlavor::Memgraph));
    }

    #[test]
    fn test_every_key_field_gets_an_index_in_both_flavors() {
        for table in Table::LOAD_ORDER {
            let label = table.label();
            let memgraph: Vec<String> = table
                .indexes()
                .iter()
                .flat_map(|index| index_statements(index, CypherFlavor::Memgraph))
                .collect();
            let neo4j: Vec<String> = table
                .indexes()
                .iter()
                .flat_map(|index| index_statements(index, CypherFlavor::Neo4j))
                .collect();
            for prop in key_properties(table) {
                let expected = format!("CREATE INDEX ON :{label}({prop})");
                assert!(memgraph.contains(&expected), "memgraph: {expected}");
                assert!(
                    neo4j
                        .iter()
                        .any(|s| s.contains(&format!("(n:{label})")) && s.contains(&format!("n.{prop}"))),
                    "neo4j: {label}.{prop}"
                );
            }
        }
    }

    #[test]
    fn test_edge_count_pattern_includes_labels() {
        assert_eq!(
            count_edges(EdgeKind::LineItemPart),
            "MATCH (:LineItem)-[r:OF_PART]->(:Part) RETURN count(r) AS count"
        );
    }
}
