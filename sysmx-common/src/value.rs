use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Typed attribute value.
///
/// Bridges hand values from the provider to the caller without interpreting them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Counter (monotonically increasing, or an absolute unsigned quantity).
    Counter(u64),

    /// Signed integer.
    Integer(i64),

    /// Gauge (can go up or down).
    Gauge(f64),

    /// Text value.
    Text(String),

    /// Boolean value.
    Boolean(bool),

    /// Binary data.
    Binary(Vec<u8>),
}

impl AttributeValue {
    /// Short name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Counter(_) => "counter",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Gauge(_) => "gauge",
            AttributeValue::Text(_) => "text",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Binary(_) => "binary",
        }
    }

    /// Interpret the value as a non-negative integer, if it is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            AttributeValue::Counter(v) => Some(*v),
            AttributeValue::Integer(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// Interpret the value as a floating point number, if it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Counter(v) => Some(*v as f64),
            AttributeValue::Integer(v) => Some(*v as f64),
            AttributeValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<u64> for AttributeValue {
    fn from(v: u64) -> Self {
        AttributeValue::Counter(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Gauge(v)
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        AttributeValue::Text(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::Text(v.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(v: Vec<u8>) -> Self {
        AttributeValue::Binary(v)
    }
}

/// A single named attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name (case-sensitive, e.g. "Used", "LastMinute").
    pub name: String,

    /// The attribute value.
    pub value: AttributeValue,
}

impl Attribute {
    /// Create a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A timestamped bulk read of one bridge's attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    /// Unix epoch milliseconds when the snapshot was taken.
    pub timestamp: i64,

    /// Identity (canonical object name) of the bridge that was read.
    pub identity: String,

    /// Attributes that could be read, in namespace order.
    pub attributes: Vec<Attribute>,
}

impl AttributeSnapshot {
    /// Create a new snapshot with the current timestamp.
    pub fn new(identity: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            timestamp: current_timestamp_millis(),
            identity: identity.into(),
            attributes,
        }
    }

    /// Look up an attribute in the snapshot by name.
    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }
}

/// Get the current timestamp in milliseconds since Unix epoch.
///
/// Returns 0 if system time is before Unix epoch (should never happen in practice).
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
