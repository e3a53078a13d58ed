//! Field value types used by binding, validation and rendering

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A bound (or rejected) field value
///
/// `Text` also carries the raw submitted text of a field whose conversion
/// failed, so a re-rendered form can show exactly what the user typed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Text(String),
    Uuid(Uuid),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// True for null, empty and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Uuid(u) => write!(f, "{}", u),
            FieldValue::Null => f.write_str("null"),
        }
    }
}

impl From<Option<String>> for FieldValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

impl From<Option<i32>> for FieldValue {
    fn from(value: Option<i32>) -> Self {
        value.map_or(FieldValue::Null, |v| FieldValue::Integer(i64::from(v)))
    }
}

impl From<Option<Uuid>> for FieldValue {
    fn from(value: Option<Uuid>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Uuid)
    }
}

/// Declared type of a bindable field
///
/// The type name is the third step of the field-scope message code chain
/// (`typeMismatch.Integer`), so these names are part of the catalog format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    Integer,
    Uuid,
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "String",
            FieldType::Integer => "Integer",
            FieldType::Uuid => "Uuid",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Format an integer with `,` thousands separators (`1000000` -> `"1,000,000"`)
pub fn format_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
