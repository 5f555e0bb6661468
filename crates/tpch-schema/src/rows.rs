//! Statically typed records, one per TPC-H table.
//!
//! Field order matches the column order of the generator output, so rows
//! deserialize positionally from a header-less record.

use crate::edge::EdgeKind;
use crate::key::{IdentityKey, KeyError};
use crate::table::Table;
use crate::value::PropertyValue;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Endpoints and copied values of one edge, before property naming.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeEndpoints {
    pub kind: EdgeKind,
    pub from: IdentityKey,
    pub to: IdentityKey,
    /// Values of `kind.spec().copied`, in that order.
    pub values: Vec<PropertyValue>,
}

/// A typed source row of one table.
pub trait TableRow: DeserializeOwned + Send + 'static {
    const TABLE: Table;

    /// Natural key values in key-field order.
    fn key_values(&self) -> Vec<i64>;

    /// All attribute values in column order.
    fn attributes(&self) -> Vec<PropertyValue>;

    /// One entry per kind in `Self::TABLE.edge_kinds()`, in that order.
    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError>;

    fn identity_key(&self) -> Result<IdentityKey, KeyError> {
        IdentityKey::for_table(Self::TABLE, &self.key_values())
    }
}

fn edge(
    kind: EdgeKind,
    from: IdentityKey,
    to: IdentityKey,
    values: Vec<PropertyValue>,
) -> EdgeEndpoints {
    EdgeEndpoints {
        kind,
        from,
        to,
        values,
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegionRow {
    pub regionkey: i64,
    pub name: String,
    pub comment: String,
}

impl TableRow for RegionRow {
    const TABLE: Table = Table::Region;

    fn key_values(&self) -> Vec<i64> {
        vec![self.regionkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.regionkey.into(),
            self.name.as_str().into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, _own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NationRow {
    pub nationkey: i64,
    pub name: String,
    pub regionkey: i64,
    pub comment: String,
}

impl TableRow for NationRow {
    const TABLE: Table = Table::Nation;

    fn key_values(&self) -> Vec<i64> {
        vec![self.nationkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.nationkey.into(),
            self.name.as_str().into(),
            self.regionkey.into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![edge(
            EdgeKind::NationRegion,
            own.clone(),
            IdentityKey::for_table(Table::Region, &[self.regionkey])?,
            vec![self.regionkey.into()],
        )])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SupplierRow {
    pub suppkey: i64,
    pub name: String,
    pub address: String,
    pub nationkey: i64,
    pub phone: String,
    pub acctbal: f64,
    pub comment: String,
}

impl TableRow for SupplierRow {
    const TABLE: Table = Table::Supplier;

    fn key_values(&self) -> Vec<i64> {
        vec![self.suppkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.suppkey.into(),
            self.name.as_str().into(),
            self.address.as_str().into(),
            self.nationkey.into(),
            self.phone.as_str().into(),
            self.acctbal.into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![edge(
            EdgeKind::SupplierNation,
            own.clone(),
            IdentityKey::for_table(Table::Nation, &[self.nationkey])?,
            vec![self.nationkey.into()],
        )])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomerRow {
    pub custkey: i64,
    pub name: String,
    pub address: String,
    pub nationkey: i64,
    pub phone: String,
    pub acctbal: f64,
    pub mktsegment: String,
    pub comment: String,
}

impl TableRow for CustomerRow {
    const TABLE: Table = Table::Customer;

    fn key_values(&self) -> Vec<i64> {
        vec![self.custkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.custkey.into(),
            self.name.as_str().into(),
            self.address.as_str().into(),
            self.nationkey.into(),
            self.phone.as_str().into(),
            self.acctbal.into(),
            self.mktsegment.as_str().into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![edge(
            EdgeKind::CustomerNation,
            own.clone(),
            IdentityKey::for_table(Table::Nation, &[self.nationkey])?,
            vec![self.nationkey.into()],
        )])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartRow {
    pub partkey: i64,
    pub name: String,
    pub mfgr: String,
    pub brand: String,
    #[serde(rename = "type")]
    pub part_type: String,
    pub size: i64,
    pub container: String,
    pub retailprice: f64,
    pub comment: String,
}

impl TableRow for PartRow {
    const TABLE: Table = Table::Part;

    fn key_values(&self) -> Vec<i64> {
        vec![self.partkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.partkey.into(),
            self.name.as_str().into(),
            self.mfgr.as_str().into(),
            self.brand.as_str().into(),
            self.part_type.as_str().into(),
            self.size.into(),
            self.container.as_str().into(),
            self.retailprice.into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, _own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartSuppRow {
    pub partkey: i64,
    pub suppkey: i64,
    pub availqty: i64,
    pub supplycost: f64,
    pub comment: String,
}

impl TableRow for PartSuppRow {
    const TABLE: Table = Table::PartSupp;

    fn key_values(&self) -> Vec<i64> {
        vec![self.partkey, self.suppkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.partkey.into(),
            self.suppkey.into(),
            self.availqty.into(),
            self.supplycost.into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        let part = IdentityKey::for_table(Table::Part, &[self.partkey])?;
        let supplier = IdentityKey::for_table(Table::Supplier, &[self.suppkey])?;
        Ok(vec![
            edge(
                EdgeKind::PartSuppPart,
                own.clone(),
                part.clone(),
                vec![self.partkey.into()],
            ),
            edge(
                EdgeKind::PartSuppSupplier,
                own.clone(),
                supplier.clone(),
                vec![self.suppkey.into()],
            ),
            edge(
                EdgeKind::SupplierPart,
                supplier,
                part,
                vec![self.availqty.into(), self.supplycost.into()],
            ),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OrdersRow {
    pub orderkey: i64,
    pub custkey: i64,
    pub orderstatus: String,
    pub totalprice: f64,
    pub orderdate: NaiveDate,
    pub orderpriority: String,
    pub clerk: String,
    pub shippriority: i64,
    pub comment: String,
}

impl TableRow for OrdersRow {
    const TABLE: Table = Table::Orders;

    fn key_values(&self) -> Vec<i64> {
        vec![self.orderkey]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.orderkey.into(),
            self.custkey.into(),
            self.orderstatus.as_str().into(),
            self.totalprice.into(),
            self.orderdate.into(),
            self.orderpriority.as_str().into(),
            self.clerk.as_str().into(),
            self.shippriority.into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![edge(
            EdgeKind::CustomerOrders,
            IdentityKey::for_table(Table::Customer, &[self.custkey])?,
            own.clone(),
            vec![self.custkey.into()],
        )])
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItemRow {
    pub orderkey: i64,
    pub partkey: i64,
    pub suppkey: i64,
    pub linenumber: i64,
    pub quantity: f64,
    pub extendedprice: f64,
    pub discount: f64,
    pub tax: f64,
    pub returnflag: String,
    pub linestatus: String,
    pub shipdate: NaiveDate,
    pub commitdate: NaiveDate,
    pub receiptdate: NaiveDate,
    pub shipinstruct: String,
    pub shipmode: String,
    pub comment: String,
}

impl TableRow for LineItemRow {
    const TABLE: Table = Table::LineItem;

    fn key_values(&self) -> Vec<i64> {
        vec![self.orderkey, self.linenumber]
    }

    fn attributes(&self) -> Vec<PropertyValue> {
        vec![
            self.orderkey.into(),
            self.partkey.into(),
            self.suppkey.into(),
            self.linenumber.into(),
            self.quantity.into(),
            self.extendedprice.into(),
            self.discount.into(),
            self.tax.into(),
            self.returnflag.as_str().into(),
            self.linestatus.as_str().into(),
            self.shipdate.into(),
            self.commitdate.into(),
            self.receiptdate.into(),
            self.shipinstruct.as_str().into(),
            self.shipmode.as_str().into(),
            self.comment.as_str().into(),
        ]
    }

    fn edge_endpoints(&self, own: &IdentityKey) -> Result<Vec<EdgeEndpoints>, KeyError> {
        Ok(vec![
            edge(
                EdgeKind::OrderLineItems,
                IdentityKey::for_table(Table::Orders, &[self.orderkey])?,
                own.clone(),
                vec![self.orderkey.into()],
            ),
            edge(
                EdgeKind::LineItemPart,
                own.clone(),
                IdentityKey::for_table(Table::Part, &[self.partkey])?,
                vec![self.partkey.into()],
            ),
            edge(
                EdgeKind::LineItemSupplier,
                own.clone(),
                IdentityKey::for_table(Table::Supplier, &[self.suppkey])?,
                vec![self.suppkey.into()],
            ),
        ])
    }
}
