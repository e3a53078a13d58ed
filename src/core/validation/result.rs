//! Validation result accumulator
//!
//! A `ValidationResult` is created for one submission, filled by the binding
//! step and then by validators, and read when the response is rendered. It
//! borrows the record it describes so that `reject_value` can capture the
//! current bound value and declared type of a field.

use crate::core::entity::Bindable;
use crate::core::field::FieldValue;
use crate::core::validation::codes::{DefaultMessageCodesResolver, MessageCodesResolver};
use crate::core::validation::errors::{FieldError, MessageArg, ObjectError, ValidationFailure};
use std::fmt;
use std::sync::Arc;

/// Ordered collection of the field and object errors of one record
pub struct ValidationResult<'a> {
    target: &'a dyn Bindable,
    object_name: String,
    errors: Vec<ValidationFailure>,
    resolver: Arc<dyn MessageCodesResolver>,
}

impl<'a> ValidationResult<'a> {
    /// Create an empty result bound to `target`
    pub fn new(target: &'a dyn Bindable) -> Self {
        Self {
            target,
            object_name: target.object_name().to_string(),
            errors: Vec::new(),
            resolver: Arc::new(DefaultMessageCodesResolver),
        }
    }

    /// Create a result that already holds errors from the binding step
    pub fn with_binding_errors(target: &'a dyn Bindable, errors: Vec<FieldError>) -> Self {
        let mut result = Self::new(target);
        for error in errors {
            result.add_error(ValidationFailure::Field(error));
        }
        result
    }

    /// Use a different message code resolution strategy
    pub fn with_resolver(mut self, resolver: Arc<dyn MessageCodesResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn target(&self) -> &'a dyn Bindable {
        self.target
    }

    /// Append an already-built failure
    pub fn add_error(&mut self, error: ValidationFailure) {
        self.errors.push(error);
    }

    /// Append a field error with explicit codes
    pub fn add_field_error(
        &mut self,
        field: &str,
        rejected_value: FieldValue,
        binding_failure: bool,
        codes: Vec<String>,
        arguments: Vec<MessageArg>,
        default_message: Option<String>,
    ) {
        self.add_error(ValidationFailure::Field(FieldError {
            object_name: self.object_name.clone(),
            field: field.to_string(),
            rejected_value,
            binding_failure,
            codes,
            arguments,
            default_message,
        }));
    }

    /// Append an object error with explicit codes
    pub fn add_object_error(
        &mut self,
        codes: Vec<String>,
        arguments: Vec<MessageArg>,
        default_message: Option<String>,
    ) {
        self.add_error(ValidationFailure::Object(ObjectError {
            object_name: self.object_name.clone(),
            codes,
            arguments,
            default_message,
        }));
    }

    /// Reject a field by short code
    ///
    /// Codes are derived from the object name, the field name and the
    /// field's declared type. The rejected value is read from the target.
    pub fn reject_value(
        &mut self,
        field: &str,
        code: &str,
        arguments: Vec<MessageArg>,
        default_message: Option<String>,
    ) {
        let rejected_value = self.target.field_value(field).unwrap_or_else(|| {
            tracing::warn!(
                object = %self.object_name,
                field,
                "rejecting a field the target does not declare"
            );
            FieldValue::Null
        });
        let field_type = self.target.field_type(field);
        let codes = self.resolver.resolve_field(
            code,
            &self.object_name,
            field,
            field_type.as_ref().map(|t| t.type_name()),
        );

        self.add_field_error(field, rejected_value, false, codes, arguments, default_message);
    }

    /// Reject the whole object by short code
    pub fn reject(&mut self, code: &str, arguments: Vec<MessageArg>, default_message: Option<String>) {
        let codes = self.resolver.resolve_object(code, &self.object_name);
        self.add_object_error(codes, arguments, default_message);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// All failures in the order they were recorded
    pub fn all_errors(&self) -> &[ValidationFailure] {
        &self.errors
    }

    pub fn field_errors(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter().filter_map(ValidationFailure::as_field)
    }

    pub fn field_errors_for<'s>(&'s self, field: &'s str) -> impl Iterator<Item = &'s FieldError> {
        self.field_errors().filter(move |e| e.field == field)
    }

    /// Object-level errors
    pub fn global_errors(&self) -> impl Iterator<Item = &ObjectError> {
        self.errors.iter().filter_map(ValidationFailure::as_object)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.field_errors_for(field).next().is_some()
    }

    pub fn has_global_errors(&self) -> bool {
        self.global_errors().next().is_some()
    }

    /// Whether binding already failed for `field`
    pub fn has_binding_failure(&self, field: &str) -> bool {
        self.field_errors_for(field).any(|e| e.binding_failure)
    }

    /// Give up the target borrow and keep the failures
    pub fn into_errors(self) -> Vec<ValidationFailure> {
        self.errors
    }
}

impl fmt::Debug for ValidationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationResult")
            .field("object_name", &self.object_name)
            .field("errors", &self.errors)
            .finish()
    }
}

impl fmt::Display for ValidationResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n{}", error)?;
        }
        Ok(())
    }
}
