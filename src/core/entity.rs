//! The bindable record abstraction shared by binding, validation and rendering

use crate::core::field::{FieldType, FieldValue};

/// A record that form values are bound onto and that validators inspect.
///
/// Implementations expose their fields by name so that the accumulator can
/// read the current bound value of a rejected field and its declared type
/// when deriving message codes.
pub trait Bindable: Send + Sync {
    /// The object name used in message codes (e.g. `"item"`)
    fn object_name(&self) -> &'static str;

    /// Names of all bindable fields, in declaration order
    fn field_names(&self) -> &'static [&'static str];

    /// Get the current bound value of a field
    ///
    /// Returns `None` if the record has no such field. A field that exists
    /// but holds no value yields `Some(FieldValue::Null)`.
    fn field_value(&self, field: &str) -> Option<FieldValue>;

    /// Get the declared type of a field
    fn field_type(&self, field: &str) -> Option<FieldType>;

    /// Check whether the record declares the given field
    fn has_field(&self, field: &str) -> bool {
        self.field_names().contains(&field)
    }
}
