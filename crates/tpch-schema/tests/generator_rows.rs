//! Rows in the exact layout produced by the TPC-H data generator.

use std::collections::HashSet;
use tpch_schema::{
    map_row, CustomerRow, EdgeKind, LineItemRow, PartSuppRow, PropertyNaming, PropertyValue,
    Table, TableRow,
};

fn decode<R: TableRow>(line: &str) -> R {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(b'|')
        .flexible(true)
        .from_reader(line.as_bytes());
    let mut record = reader.records().next().unwrap().unwrap();
    record.truncate(R::TABLE.column_count());
    record.deserialize(None).unwrap()
}

#[test]
fn test_customer_line_decodes_and_maps() {
    let row: CustomerRow = decode(
        "1|Customer#000000001|IVhzIApeRb ot,c,E|15|25-989-741-2988|711.56|BUILDING|to the even, regular platelets. regular, ironic epitaphs nag e|",
    );
    assert_eq!(row.custkey, 1);
    assert_eq!(row.mktsegment, "BUILDING");

    let mapped = map_row(&row, PropertyNaming::Bare).unwrap();
    assert_eq!(mapped.vertex.key.as_str(), "1");
    assert_eq!(
        mapped.vertex.property("acctbal"),
        Some(&PropertyValue::Decimal(711.56))
    );
    assert_eq!(mapped.edges[0].kind, EdgeKind::CustomerNation);
    assert_eq!(mapped.edges[0].to.as_str(), "15");
}

#[test]
fn test_lineitem_line_decodes_dates() {
    let row: LineItemRow = decode(
        "1|155190|7706|1|17|21168.23|0.04|0.02|N|O|1996-03-13|1996-02-12|1996-03-22|DELIVER IN PERSON|TRUCK|egular courts above the|",
    );
    assert_eq!(row.linenumber, 1);
    assert_eq!(row.shipdate.to_string(), "1996-03-13");
    assert_eq!(row.quantity, 17.0);
    assert_eq!(row.identity_key().unwrap().as_str(), "1_1");
}

#[test]
fn test_composite_keys_unique_across_generated_partsupp() {
    // dbgen assigns four suppliers per part.
    let suppliers = 100_i64;
    let mut seen = HashSet::new();
    for partkey in 1..=2000_i64 {
        for i in 0..4 {
            let suppkey = (partkey + i * (suppliers / 4 + (partkey - 1) / suppliers)) % suppliers + 1;
            let row = PartSuppRow {
                partkey,
                suppkey,
                availqty: 1,
                supplycost: 1.0,
                comment: String::new(),
            };
            let key = row.identity_key().unwrap();
            assert_eq!(key.as_str(), format!("{partkey}_{suppkey}"));
            assert!(seen.insert(key), "duplicate partsupp key {partkey}_{suppkey}");
        }
    }
    assert_eq!(seen.len(), 8000);
}

#[test]
fn test_every_edge_endpoint_names_its_declared_tables() {
    let row: PartSuppRow = decode("1|2|3325|771.64|final theodolites|");
    let mapped = map_row(&row, PropertyNaming::Prefixed).unwrap();
    for edge in &mapped.edges {
        let spec = edge.kind.spec();
        if spec.from == Table::PartSupp {
            assert_eq!(edge.from, mapped.vertex.key);
        }
        if spec.to == Table::PartSupp {
            assert_eq!(edge.to, mapped.vertex.key);
        }
    }
}
