//! Form binding
//!
//! Converts raw submitted text into a typed record. A value that fails to
//! convert leaves the field unset and records a `typeMismatch` field error
//! flagged as a binding failure, carrying the raw text so the form can be
//! re-rendered exactly as submitted.

use crate::core::entity::Bindable;
use crate::core::field::{FieldType, FieldValue};
use crate::core::validation::codes::{DefaultMessageCodesResolver, MessageCodesResolver};
use crate::core::validation::errors::{FieldError, MessageArg};
use indexmap::IndexMap;
use uuid::Uuid;

/// Error code recorded for a value that could not be converted
pub const TYPE_MISMATCH: &str = "typeMismatch";

/// Raw submitted values, in submission order
pub type FormValues = IndexMap<String, String>;

/// Reads typed values out of a [`FormValues`] map
pub struct DataBinder<'f> {
    object_name: &'static str,
    form: &'f FormValues,
    resolver: DefaultMessageCodesResolver,
    errors: Vec<FieldError>,
}

impl<'f> DataBinder<'f> {
    pub fn new(object_name: &'static str, form: &'f FormValues) -> Self {
        Self {
            object_name,
            form,
            resolver: DefaultMessageCodesResolver,
            errors: Vec::new(),
        }
    }

    /// The raw text submitted for `field`
    pub fn raw(&self, field: &str) -> Option<&'f str> {
        self.form.get(field).map(String::as_str)
    }

    /// Bind a text field. Text is taken verbatim, including blank input.
    pub fn text(&mut self, field: &str) -> Option<String> {
        self.raw(field).map(str::to_string)
    }

    /// Bind an integer field. Blank input binds to `None`.
    pub fn integer(&mut self, field: &str) -> Option<i32> {
        self.convert(field, FieldType::Integer, |raw| raw.parse::<i32>().ok())
    }

    /// Bind an identifier field. Blank input binds to `None`.
    pub fn uuid(&mut self, field: &str) -> Option<Uuid> {
        self.convert(field, FieldType::Uuid, |raw| Uuid::parse_str(raw).ok())
    }

    /// Binding errors recorded so far
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn finish(self) -> Vec<FieldError> {
        self.errors
    }

    fn convert<V>(
        &mut self,
        field: &str,
        field_type: FieldType,
        parse: impl FnOnce(&str) -> Option<V>,
    ) -> Option<V> {
        let raw = self.raw(field)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let parsed = parse(trimmed);
        if parsed.is_none() {
            tracing::debug!(object = self.object_name, field, raw, "type mismatch");
            self.errors.push(self.type_mismatch(field, raw, field_type));
        }
        parsed
    }

    fn type_mismatch(&self, field: &str, raw: &str, field_type: FieldType) -> FieldError {
        FieldError {
            object_name: self.object_name.to_string(),
            field: field.to_string(),
            rejected_value: FieldValue::Text(raw.to_string()),
            binding_failure: true,
            codes: self.resolver.resolve_field(
                TYPE_MISMATCH,
                self.object_name,
                field,
                Some(field_type.type_name()),
            ),
            arguments: vec![MessageArg::from(field)],
            default_message: Some(format!(
                "Failed to convert value '{}' to required type '{}' for field '{}'",
                raw, field_type, field
            )),
        }
    }
}

/// A record plus the errors raised while binding it
#[derive(Debug, Clone, PartialEq)]
pub struct BoundForm<T> {
    pub target: T,
    pub errors: Vec<FieldError>,
}

impl<T> BoundForm<T> {
    pub fn has_binding_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Records that can be built from submitted form values
pub trait FromForm: Bindable + Sized {
    /// Read every field through `binder`
    fn bind(binder: &mut DataBinder<'_>) -> Self;

    fn from_form(form: &FormValues) -> BoundForm<Self> {
        let object_name = Self::form_object_name();
        let mut binder = DataBinder::new(object_name, form);
        let target = Self::bind(&mut binder);
        BoundForm {
            target,
            errors: binder.finish(),
        }
    }

    /// Object name used for codes raised during binding
    fn form_object_name() -> &'static str;
}
