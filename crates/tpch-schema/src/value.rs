use chrono::NaiveDate;

/// A typed attribute value carried on a vertex or an edge.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Decimal(f64),
    Text(String),
    Date(NaiveDate),
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Decimal(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<NaiveDate> for PropertyValue {
    fn from(value: NaiveDate) -> Self {
        PropertyValue::Date(value)
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Integer(i) => write!(f, "{i}"),
            PropertyValue::Decimal(d) => write!(f, "{d}"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}
