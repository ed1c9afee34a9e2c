use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core value types exchanged between records and the driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
    Uuid(Uuid),
}

/// Database parameter types understood by drivers
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    /// Variable-length string
    #[default]
    Varchar,
    /// Fixed-length string
    Char,
    Integer,
    Real,
    Boolean,
    Blob,
    /// Fixed-length binary, used for UUID columns
    Raw,
}

impl Value {
    /// Short name of the variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Integer(_) => "integer",
            Value::Real(_) => "real",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Boolean(_) => "boolean",
            Value::Uuid(_) => "uuid",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn as_i64(&self) -> Result<i64> {
        match self {
            Value::Integer(i) => Ok(*i),
            other => Err(other.mismatch("integer")),
        }
    }

    /// Integers are widened, since stores report whole-number reals as integers.
    pub fn as_f64(&self) -> Result<f64> {
        match self {
            Value::Real(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(other.mismatch("real")),
        }
    }

    /// Accepts 0/1 integers for stores without a boolean type.
    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn as_blob(&self) -> Result<&[u8]> {
        match self {
            Value::Blob(b) => Ok(b),
            other => Err(other.mismatch("blob")),
        }
    }

    /// Accepts a native UUID, its 16-byte storage form, or canonical text.
    pub fn as_uuid(&self) -> Result<Uuid> {
        match self {
            Value::Uuid(u) => Ok(*u),
            Value::Blob(b) => Uuid::from_slice(b).map_err(|_| self.mismatch("uuid")),
            Value::Text(s) => Uuid::parse_str(s).map_err(|_| self.mismatch("uuid")),
            other => Err(other.mismatch("uuid")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> Error {
        Error::Conversion {
            expected,
            found: self.type_name(),
        }
    }
}

/// Adapt a value to a form every driver can bind.
///
/// UUIDs become their 16-byte RFC 4122 representation; everything else
/// passes through unchanged.
pub fn coerce_for_storage(value: Value) -> Value {
    match value {
        Value::Uuid(u) => Value::Blob(u.as_bytes().to_vec()),
        other => other,
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Integer(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Blob(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
