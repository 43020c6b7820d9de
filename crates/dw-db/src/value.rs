//! Backend-neutral query results.

/// A single column value returned by [`crate::Database::query`].
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    Text(String),
}

/// One result row, columns in SELECT order
pub type SqlRow = Vec<SqlValue>;

impl SqlValue {
    /// Integer view of the value, if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SqlValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Text view of the value, if it is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SqlValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<duckdb::types::Value> for SqlValue {
    fn from(value: duckdb::types::Value) -> Self {
        use duckdb::types::Value;
        match value {
            Value::Null => SqlValue::Null,
            Value::Boolean(b) => SqlValue::Boolean(b),
            Value::TinyInt(v) => SqlValue::Integer(v.into()),
            Value::SmallInt(v) => SqlValue::Integer(v.into()),
            Value::Int(v) => SqlValue::Integer(v.into()),
            Value::BigInt(v) => SqlValue::Integer(v),
            Value::UTinyInt(v) => SqlValue::Integer(v.into()),
            Value::USmallInt(v) => SqlValue::Integer(v.into()),
            Value::UInt(v) => SqlValue::Integer(v.into()),
            Value::Float(v) => SqlValue::Real(v.into()),
            Value::Double(v) => SqlValue::Real(v),
            Value::Text(s) => SqlValue::Text(s),
            other => SqlValue::Text(format!("{other:?}")),
        }
    }
}
