//! SurrealQL statements and record conversion.
//!
//! Vertices become records `table:⟨key⟩` of a normal table. Edges become
//! records of a `TYPE RELATION` table whose `in` and `out` fields hold the
//! endpoint record ids.

use std::collections::BTreeMap;
use surrealdb::sql::{Array, Id, Number, Object, Strand, Thing, Value};
use tpch_schema::{EdgeKind, EdgeRecord, IdentityKey, IndexDef, PropertyValue, Table, VertexRecord};

pub(crate) fn to_surreal_value(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Integer(i) => Value::Number(Number::Int(*i)),
        PropertyValue::Decimal(d) => Value::Number(Number::Float(*d)),
        PropertyValue::Text(s) => Value::Strand(Strand::from(s.as_str())),
        // Dates are stored as YYYY-MM-DD strings
        PropertyValue::Date(_) => Value::Strand(Strand::from(value.to_string())),
    }
}

pub fn record_id(table: &str, key: &IdentityKey) -> Thing {
    Thing::from((table, Id::String(key.to_string())))
}

fn properties_object(
    mut fields: BTreeMap<String, Value>,
    properties: &[(&'static str, PropertyValue)],
) -> Value {
    for (name, value) in properties {
        fields.insert((*name).to_string(), to_surreal_value(value));
    }
    Value::Object(Object::from(fields))
}

/// `$rows` parameter of a vertex insert.
pub fn vertex_rows(table: Table, batch: &[VertexRecord]) -> Value {
    let rows = batch
        .iter()
        .map(|vertex| {
            let mut fields = BTreeMap::new();
            fields.insert(
                "id".to_string(),
                Value::Thing(record_id(table.name(), &vertex.key)),
            );
            properties_object(fields, &vertex.properties)
        })
        .collect::<Vec<_>>();
    Value::Array(Array::from(rows))
}

/// `$rows` parameter of an edge insert.
pub fn edge_rows(kind: EdgeKind, batch: &[EdgeRecord]) -> Value {
    let spec = kind.spec();
    let rows = batch
        .iter()
        .map(|edge| {
            let mut fields = BTreeMap::new();
            fields.insert(
                "in".to_string(),
                Value::Thing(record_id(spec.from.name(), &edge.from)),
            );
            fields.insert(
                "out".to_string(),
                Value::Thing(record_id(spec.to.name(), &edge.to)),
            );
            properties_object(fields, &edge.properties)
        })
        .collect::<Vec<_>>();
    Value::Array(Array::from(rows))
}

pub fn insert_vertices(table: Table) -> String {
    format!("INSERT INTO {} $rows;", table.name())
}

pub fn insert_edges(kind: EdgeKind) -> String {
    format!("INSERT RELATION INTO {} $rows;", kind.container())
}

pub fn define_vertex_table(table: Table) -> String {
    format!(
        "DEFINE TABLE IF NOT EXISTS {} TYPE NORMAL SCHEMALESS;",
        table.name()
    )
}

pub fn define_edge_table(kind: EdgeKind) -> String {
    format!(
        "DEFINE TABLE IF NOT EXISTS {} TYPE RELATION SCHEMALESS;",
        kind.container()
    )
}

/// Edge table redefinition that restricts both endpoints.
pub fn declare_edge_table(kind: EdgeKind) -> String {
    let spec = kind.spec();
    format!(
        "DEFINE TABLE OVERWRITE {} TYPE RELATION IN {} OUT {} SCHEMALESS;",
        spec.container,
        spec.from.name(),
        spec.to.name()
    )
}

pub fn define_index(index: &IndexDef) -> String {
    format!(
        "DEFINE INDEX IF NOT EXISTS {} ON TABLE {} FIELDS {}{};",
        index.name(),
        index.table.name(),
        index.field,
        if index.unique { " UNIQUE" } else { "" }
    )
}

pub fn remove_table(name: &str) -> String {
    format!("REMOVE TABLE IF EXISTS {name};")
}

pub fn count(name: &str) -> String {
    format!("SELECT count() FROM {name} GROUP ALL;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tpch_schema::{map_row, NationRow, PropertyNaming};

    fn nation() -> NationRow {
        NationRow {
            nationkey: 7,
            name: "GERMANY".to_string(),
            regionkey: 3,
            comment: "quiet".to_string(),
        }
    }

    fn object(value: &Value, index: usize) -> &Object {
        match value {
            Value::Array(rows) => match &rows[index] {
                Value::Object(obj) => obj,
                other => panic!("expected object, got {other:?}"),
            },
            other => panic!("expected array, got {other:?}"),
        }
    }

    #[test]
    fn test_vertex_rows_carry_record_id_and_columns() {
        let mapped = map_row(&nation(), PropertyNaming::Prefixed).unwrap();
        let rows = vertex_rows(Table::Nation, &[mapped.vertex]);
        let obj = object(&rows, 0);

        match obj.get("id") {
            Some(Value::Thing(thing)) => {
                assert_eq!(thing.tb, "nation");
                assert_eq!(thing.id, Id::String("7".to_string()));
            }
            other => panic!("unexpected id: {other:?}"),
        }
        assert_eq!(
            obj.get("n_name"),
            Some(&Value::Strand(Strand::from("GERMANY")))
        );
        assert_eq!(obj.get("n_regionkey"), Some(&Value::Number(Number::Int(3))));
    }

    #[test]
    fn test_edge_rows_reference_both_endpoints() {
        let mapped = map_row(&nation(), PropertyNaming::Prefixed).unwrap();
        let rows = edge_rows(EdgeKind::NationRegion, &mapped.edges);
        let obj = object(&rows, 0);

        assert_eq!(
            obj.get("in"),
            Some(&Value::Thing(Thing::from(("nation", Id::String("7".to_string())))))
        );
        assert_eq!(
            obj.get("out"),
            Some(&Value::Thing(Thing::from(("region", Id::String("3".to_string())))))
        );
        assert!(obj.get("n_regionkey").is_some());
    }

    #[test]
    fn test_dates_are_plain_strings() {
        let date = NaiveDate::from_ymd_opt(1996, 3, 13).unwrap();
        assert_eq!(
            to_surreal_value(&PropertyValue::Date(date)),
            Value::Strand(Strand::from("1996-03-13"))
        );
    }

    #[test]
    fn test_statements() {
        assert_eq!(insert_vertices(Table::Orders), "INSERT INTO orders $rows;");
        assert_eq!(
            insert_edges(EdgeKind::SupplierPart),
            "INSERT RELATION INTO supplies $rows;"
        );
        assert_eq!(
            declare_edge_table(EdgeKind::CustomerOrders),
            "DEFINE TABLE OVERWRITE customer_orders TYPE RELATION IN customer OUT orders SCHEMALESS;"
        );
        let unique = Table::Customer
            .indexes()
            .into_iter()
            .find(|index| index.unique)
            .unwrap();
        assert_eq!(
            define_index(&unique),
            "DEFINE INDEX IF NOT EXISTS customer_c_custkey_idx ON TABLE customer FIELDS c_custkey UNIQUE;"
        );
        assert_eq!(count("lineitem"), "SELECT count() FROM lineitem GROUP ALL;");
    }
}
