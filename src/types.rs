//! Core types for email-sink

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a row field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// true / false
    Boolean,
    /// Signed integer of any width
    Int,
    /// Floating point number
    Float,
    /// Arbitrary precision decimal, carried as text
    Decimal,
    /// UTF-8 text
    String,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time without zone
    Timestamp,
    /// Raw bytes
    Bytes,
}

/// A named field of a [`RowType`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Schema of the rows written to a batch
///
/// The number of fields is the batch arity: every accepted row must carry
/// exactly that many values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowType {
    fields: Vec<Field>,
}

impl RowType {
    /// Create a row type from its fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Build a row type from `(name, type)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, field_type)| Field {
                    name: name.into(),
                    field_type,
                })
                .collect(),
        }
    }

    /// Number of fields
    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Name of the field at `index`, or its position if out of range
    pub fn field_name(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("#{index}"))
    }
}

/// A single scalar field value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Missing value; has no text representation
    Null,
    /// Boolean
    Boolean(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Decimal kept in its textual form
    Decimal(String),
    /// Text
    String(String),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Date and time
    Timestamp(NaiveDateTime),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Value {
    /// Canonical text of the value, `None` for [`Value::Null`]
    ///
    /// Dates render as `YYYY-MM-DD`, times as `HH:MM:SS[.f]`, timestamps as
    /// `YYYY-MM-DDTHH:MM:SS[.f]` and bytes as lowercase hex.
    pub fn to_text(&self) -> Option<String> {
        let text = match self {
            Value::Null => return None,
            Value::Boolean(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Decimal(d) => d.clone(),
            Value::String(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
            Value::Time(t) => t.format("%H:%M:%S%.f").to_string(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Value::Bytes(bytes) => bytes.iter().map(|b| format!("{b:02x}")).collect(),
        };
        Some(text)
    }

    /// Whether this is [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Converts JSON scalars; arrays and objects are kept as their compact JSON text.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => match n.as_f64() {
                    Some(f) if n.is_f64() => Value::Float(f),
                    _ => Value::Decimal(n.to_string()),
                },
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

/// One record: an ordered sequence of field values
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: Vec<Value>,
}

impl Row {
    /// Create a row from its values
    pub fn new(fields: Vec<Value>) -> Self {
        Self { fields }
    }

    /// Field values in order
    pub fn fields(&self) -> &[Value] {
        &self.fields
    }

    /// Number of fields
    pub fn arity(&self) -> usize {
        self.fields.len()
    }
}

impl<V: Into<Value>> FromIterator<V> for Row {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Lifecycle state of one batch
///
/// `Open → Materializing → Sending → Closed`, with any failure moving to
/// `Failed`. `Closed` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    /// Accepting records
    Open,
    /// Writing the artifact
    Materializing,
    /// Talking to the relay
    Sending,
    /// Email handed to the relay
    Closed,
    /// A fatal error occurred
    Failed,
}

impl BatchState {
    /// Whether no further operations are permitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Closed | BatchState::Failed)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchState::Open => "open",
            BatchState::Materializing => "materializing",
            BatchState::Sending => "sending",
            BatchState::Closed => "closed",
            BatchState::Failed => "failed",
        };
        f.write_str(s)
    }
}
