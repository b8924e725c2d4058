use serde::{Deserialize, Serialize};

/// A scalar (or null) parameter value as the driver boundary understands it.
///
/// `Array` can be constructed (e.g. from a JSON payload) but is rejected at
/// bind time: parameter expansion is out of scope and every bound parameter
/// must be scalar or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Array(Vec<SqlValue>),
}

impl SqlValue {
    pub fn is_composite(&self) -> bool {
        matches!(self, SqlValue::Array(_))
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<serde_json::Value> for SqlValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => SqlValue::Null,
            serde_json::Value::Bool(b) => SqlValue::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SqlValue::Integer(i)
                } else {
                    SqlValue::Real(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => SqlValue::Text(s),
            serde_json::Value::Array(items) => {
                SqlValue::Array(items.into_iter().map(SqlValue::from).collect())
            }
            serde_json::Value::Object(map) => {
                SqlValue::Array(map.into_values().map(SqlValue::from).collect())
            }
        }
    }
}

/// Normalized tag telling the driver how to encode a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingType {
    Text,
    Integer,
    Boolean,
    Null,
    LargeObject,
}

/// The recognized shapes of a per-parameter type descriptor.
///
/// Absence of a descriptor is expressed by absence in [`crate::TypeHints`],
/// not by a variant here; absent descriptors default to [`BindingType::Text`]
/// with the raw value passed through unconverted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    /// Legacy small-integer tag from older driver APIs. Known tags map to
    /// Null/Integer/LargeObject/Boolean; any unrecognized tag means Text.
    LegacyTag(i64),
    /// Named abstract type, converted through the connection's
    /// platform-aware converter.
    Abstract(String),
    /// Already-normalized binding type, passed through unchanged.
    Binding(BindingType),
}

impl TypeDescriptor {
    pub fn abstract_type<T: Into<String>>(name: T) -> Self {
        TypeDescriptor::Abstract(name.into())
    }
}
