use std::fmt;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Store unreachable: {message}")]
    Connection { message: String },
    #[error("Stored value not convertible: {message}")]
    Conversion { message: String },
    #[error("No recorded calls for method: {method}")]
    NotFound { method: String },
}

impl CacheError {
    pub fn error_code(&self) -> &'static str {
        match self {
            CacheError::Connection { .. } => "CONNECTION_ERROR",
            CacheError::Conversion { .. } => "CONVERSION_ERROR",
            CacheError::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(error: redis::RedisError) -> Self {
        CacheError::Connection {
            message: error.to_string(),
        }
    }
}

/// A value accepted by the cache: strings and bytes stored verbatim, numbers
/// as decimal text, the same way the backing store itself represents them.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl Value {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Str(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
            Value::Int(i) => i.to_string().into_bytes(),
            Value::Float(f) => f.to_string().into_bytes(),
        }
    }

    /// Quoted, deterministic form used when recording call inputs.
    pub fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            Value::Bytes(b) => bytes_repr(b),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
        }
    }
}

// plain form, used when recording call outputs
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "{}", bytes_repr(b)),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

fn bytes_repr(bytes: &[u8]) -> String {
    let mut out = String::from("b\"");
    for &byte in bytes {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(byte as char),
            _ => out.push_str(&format!("\\x{:02x}", byte)),
        }
    }
    out.push('"');
    out
}
