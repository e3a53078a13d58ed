//! Message code resolution
//!
//! A short error code such as `required` is expanded into an ordered list of
//! catalog keys, most specific first. The message catalog walks the list and
//! uses the first key it knows, so a catalog can carry a precise override
//! (`required.item.itemName`) next to a generic fallback (`required`).
//!
//! Object scope:
//!
//! 1. `code.objectName`
//! 2. `code`
//!
//! Field scope:
//!
//! 1. `code.objectName.field`
//! 2. `code.field`
//! 3. `code.fieldType`
//! 4. `code`

/// Separator between the parts of a message code
pub const CODE_SEPARATOR: &str = ".";

/// A code plus the scope it was raised in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCodeTemplate {
    pub code: String,
    pub object_name: String,
    pub field: Option<String>,
    pub field_type: Option<String>,
}

impl MessageCodeTemplate {
    /// Template for an error on the whole object
    pub fn object(code: impl Into<String>, object_name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            object_name: object_name.into(),
            field: None,
            field_type: None,
        }
    }

    /// Template for an error on a single field
    pub fn field(
        code: impl Into<String>,
        object_name: impl Into<String>,
        field: impl Into<String>,
        field_type: Option<&str>,
    ) -> Self {
        Self {
            code: code.into(),
            object_name: object_name.into(),
            field: Some(field.into()),
            field_type: field_type.map(str::to_string),
        }
    }
}

/// Expands a template into its fallback chain of message codes
pub trait MessageCodesResolver: Send + Sync {
    /// Resolve a template into catalog keys, most specific first
    fn resolve(&self, template: &MessageCodeTemplate) -> Vec<String>;

    /// Resolve codes for an object-level error
    fn resolve_object(&self, code: &str, object_name: &str) -> Vec<String> {
        self.resolve(&MessageCodeTemplate::object(code, object_name))
    }

    /// Resolve codes for a field-level error
    fn resolve_field(
        &self,
        code: &str,
        object_name: &str,
        field: &str,
        field_type: Option<&str>,
    ) -> Vec<String> {
        self.resolve(&MessageCodeTemplate::field(
            code,
            object_name,
            field,
            field_type,
        ))
    }
}

/// The standard `code.object.field` resolution strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessageCodesResolver;

impl DefaultMessageCodesResolver {
    pub fn new() -> Self {
        Self
    }
}

fn join(parts: &[&str]) -> String {
    parts.join(CODE_SEPARATOR)
}

impl MessageCodesResolver for DefaultMessageCodesResolver {
    fn resolve(&self, template: &MessageCodeTemplate) -> Vec<String> {
        let code = template.code.as_str();

        let Some(field) = template.field.as_deref() else {
            return vec![join(&[code, template.object_name.as_str()]), code.to_string()];
        };

        let mut codes = Vec::with_capacity(4);
        codes.push(join(&[code, template.object_name.as_str(), field]));
        codes.push(join(&[code, field]));
        if let Some(field_type) = template.field_type.as_deref() {
            codes.push(join(&[code, field_type]));
        }
        codes.push(code.to_string());
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_codes() {
        let resolver = DefaultMessageCodesResolver::new();
        let codes = resolver.resolve_object("required", "item");

        assert_eq!(codes, vec!["required.item", "required"]);
    }

    #[test]
    fn test_field_codes() {
        let resolver = DefaultMessageCodesResolver::new();
        let codes = resolver.resolve_field("required", "item", "itemName", Some("String"));

        assert_eq!(
            codes,
            vec![
                "required.item.itemName",
                "required.itemName",
                "required.String",
                "required",
            ]
        );
    }

    #[test]
    fn test_field_codes_without_type() {
        let resolver = DefaultMessageCodesResolver::new();
        let codes = resolver.resolve_field("max", "item", "quantity", None);

        assert_eq!(codes, vec!["max.item.quantity", "max.quantity", "max"]);
    }

    #[test]
    fn test_type_mismatch_codes() {
        let resolver = DefaultMessageCodesResolver::new();
        let codes = resolver.resolve_field("typeMismatch", "user", "age", Some("int"));

        assert_eq!(
            codes,
            vec![
                "typeMismatch.user.age",
                "typeMismatch.age",
                "typeMismatch.int",
                "typeMismatch",
            ]
        );
    }

    #[test]
    fn test_resolve_from_template() {
        let resolver = DefaultMessageCodesResolver::new();
        let template = MessageCodeTemplate::object("totalPriceMin", "item");

        assert_eq!(
            resolver.resolve(&template),
            vec!["totalPriceMin.item", "totalPriceMin"]
        );
    }

    #[test]
    fn test_resolver_is_object_safe() {
        let resolver: Box<dyn MessageCodesResolver> = Box::new(DefaultMessageCodesResolver);
        assert_eq!(resolver.resolve_object("range", "order").len(), 2);
    }
}
