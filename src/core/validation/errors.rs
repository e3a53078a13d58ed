//! Field and object validation errors
//!
//! Errors carry codes and arguments, not messages. Messages are produced
//! later, at render time, by walking the codes through a message catalog.

use crate::core::field::FieldValue;
use serde::Serialize;
use std::fmt;

/// A positional argument for a message template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageArg {
    Integer(i64),
    Text(String),
}

impl fmt::Display for MessageArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageArg::Integer(i) => write!(f, "{}", i),
            MessageArg::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MessageArg {
    fn from(value: i64) -> Self {
        MessageArg::Integer(value)
    }
}

impl From<i32> for MessageArg {
    fn from(value: i32) -> Self {
        MessageArg::Integer(i64::from(value))
    }
}

impl From<&str> for MessageArg {
    fn from(value: &str) -> Self {
        MessageArg::Text(value.to_string())
    }
}

impl From<String> for MessageArg {
    fn from(value: String) -> Self {
        MessageArg::Text(value)
    }
}

/// Something a message catalog can turn into text
pub trait Resolvable {
    /// Candidate codes, most specific first
    fn codes(&self) -> &[String];

    /// Positional arguments for the message template
    fn arguments(&self) -> &[MessageArg];

    /// Literal message used when no code resolves
    fn default_message(&self) -> Option<&str>;
}

/// A rejection scoped to a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub object_name: String,
    pub field: String,
    pub rejected_value: FieldValue,
    pub binding_failure: bool,
    pub codes: Vec<String>,
    pub arguments: Vec<MessageArg>,
    pub default_message: Option<String>,
}

impl Resolvable for FieldError {
    fn codes(&self) -> &[String] {
        &self.codes
    }

    fn arguments(&self) -> &[MessageArg] {
        &self.arguments
    }

    fn default_message(&self) -> Option<&str> {
        self.default_message.as_deref()
    }
}

/// A rejection of the record as a whole (cross-field rules)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectError {
    pub object_name: String,
    pub codes: Vec<String>,
    pub arguments: Vec<MessageArg>,
    pub default_message: Option<String>,
}

impl Resolvable for ObjectError {
    fn codes(&self) -> &[String] {
        &self.codes
    }

    fn arguments(&self) -> &[MessageArg] {
        &self.arguments
    }

    fn default_message(&self) -> Option<&str> {
        self.default_message.as_deref()
    }
}

/// Classification of an accumulated failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Conversion of the raw value failed before any rule ran
    BindingFailure,
    /// A single-field rule failed
    FieldViolation,
    /// A cross-field rule failed
    ObjectViolation,
}

/// One entry of a validation result, in the order it was recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum ValidationFailure {
    Field(FieldError),
    Object(ObjectError),
}

impl ValidationFailure {
    pub fn kind(&self) -> ViolationKind {
        match self {
            ValidationFailure::Field(e) if e.binding_failure => ViolationKind::BindingFailure,
            ValidationFailure::Field(_) => ViolationKind::FieldViolation,
            ValidationFailure::Object(_) => ViolationKind::ObjectViolation,
        }
    }

    pub fn as_field(&self) -> Option<&FieldError> {
        match self {
            ValidationFailure::Field(e) => Some(e),
            ValidationFailure::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectError> {
        match self {
            ValidationFailure::Object(e) => Some(e),
            ValidationFailure::Field(_) => None,
        }
    }

    /// The most specific code, if any
    pub fn code(&self) -> Option<&str> {
        self.codes().first().map(String::as_str)
    }
}

impl Resolvable for ValidationFailure {
    fn codes(&self) -> &[String] {
        match self {
            ValidationFailure::Field(e) => e.codes(),
            ValidationFailure::Object(e) => e.codes(),
        }
    }

    fn arguments(&self) -> &[MessageArg] {
        match self {
            ValidationFailure::Field(e) => e.arguments(),
            ValidationFailure::Object(e) => e.arguments(),
        }
    }

    fn default_message(&self) -> Option<&str> {
        match self {
            ValidationFailure::Field(e) => e.default_message(),
            ValidationFailure::Object(e) => e.default_message(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationFailure::Field(e) => write!(
                f,
                "Field error in object '{}' on field '{}': rejected value [{}]; codes [{}]",
                e.object_name,
                e.field,
                e.rejected_value,
                e.codes.join(",")
            ),
            ValidationFailure::Object(e) => write!(
                f,
                "Error in object '{}': codes [{}]",
                e.object_name,
                e.codes.join(",")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_error(binding_failure: bool) -> FieldError {
        FieldError {
            object_name: "item".to_string(),
            field: "price".to_string(),
            rejected_value: FieldValue::Text("abc".to_string()),
            binding_failure,
            codes: vec!["typeMismatch.item.price".to_string(), "typeMismatch".to_string()],
            arguments: vec![MessageArg::from("price")],
            default_message: None,
        }
    }

    #[test]
    fn test_violation_kinds() {
        assert_eq!(
            ValidationFailure::Field(field_error(true)).kind(),
            ViolationKind::BindingFailure
        );
        assert_eq!(
            ValidationFailure::Field(field_error(false)).kind(),
            ViolationKind::FieldViolation
        );

        let object = ObjectError {
            object_name: "item".to_string(),
            codes: vec!["totalPriceMin".to_string()],
            arguments: vec![],
            default_message: None,
        };
        assert_eq!(
            ValidationFailure::Object(object).kind(),
            ViolationKind::ObjectViolation
        );
    }

    #[test]
    fn test_most_specific_code() {
        let failure = ValidationFailure::Field(field_error(true));
        assert_eq!(failure.code(), Some("typeMismatch.item.price"));
    }

    #[test]
    fn test_message_arg_display() {
        assert_eq!(MessageArg::from(9000_i64).to_string(), "9000");
        assert_eq!(MessageArg::from("10,000").to_string(), "10,000");
    }

    #[test]
    fn test_display_mentions_field_and_value() {
        let display = ValidationFailure::Field(field_error(true)).to_string();
        assert!(display.contains("price"));
        assert!(display.contains("abc"));
    }

    #[test]
    fn test_serialized_scope_tag() {
        let json = serde_json::to_value(ValidationFailure::Field(field_error(false))).unwrap();
        assert_eq!(json["scope"], "field");
        assert_eq!(json["bindingFailure"], false);
        assert_eq!(json["rejectedValue"], "abc");
    }
}
