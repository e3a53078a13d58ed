//! Declarative rule tables
//!
//! A `RuleSet` is an ordered list of rule descriptors. Each descriptor names
//! the field it guards (or the whole object), the constraint to check, the
//! short error code to raise and the rule groups it belongs to. Rules are
//! evaluated in table order; arguments for the message template are derived
//! from the constraint itself.

use crate::core::entity::Bindable;
use crate::core::field::{FieldValue, format_thousands};
use crate::core::validation::errors::MessageArg;
use crate::core::validation::result::ValidationResult;
use crate::core::validation::validators::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named subset of rules applicable to one operation
///
/// `Save` is the default group: it holds the base rules of a record that
/// has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleGroup {
    #[default]
    Save,
    Update,
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleGroup::Save => f.write_str("save"),
            RuleGroup::Update => f.write_str("update"),
        }
    }
}

/// Every group; the default for shared rules
pub const ALL_GROUPS: &[RuleGroup] = &[RuleGroup::Save, RuleGroup::Update];

/// Constraint on a single field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConstraint {
    /// Not null, not empty, not whitespace only
    NotBlank,
    NotNull,
    /// Inclusive bounds
    Range { min: i64, max: i64 },
    Min(i64),
    Max(i64),
}

impl FieldConstraint {
    /// Value-comparing constraints say nothing about a null value
    pub fn skips_null(&self) -> bool {
        matches!(
            self,
            FieldConstraint::Range { .. } | FieldConstraint::Min(_) | FieldConstraint::Max(_)
        )
    }

    pub fn is_satisfied(&self, value: &FieldValue) -> bool {
        match self {
            FieldConstraint::NotBlank => !value.is_blank(),
            FieldConstraint::NotNull => !value.is_null(),
            FieldConstraint::Range { min, max } => {
                value.as_integer().is_none_or(|v| (*min..=*max).contains(&v))
            }
            FieldConstraint::Min(min) => value.as_integer().is_none_or(|v| v >= *min),
            FieldConstraint::Max(max) => value.as_integer().is_none_or(|v| v <= *max),
        }
    }

    /// Humanized bounds passed to the message template
    pub fn arguments(&self) -> Vec<MessageArg> {
        match self {
            FieldConstraint::NotBlank | FieldConstraint::NotNull => Vec::new(),
            FieldConstraint::Range { min, max } => {
                vec![format_thousands(*min).into(), format_thousands(*max).into()]
            }
            FieldConstraint::Min(bound) | FieldConstraint::Max(bound) => {
                vec![format_thousands(*bound).into()]
            }
        }
    }
}

/// Constraint spanning several fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectConstraint {
    /// `left * right >= min`
    MinProduct {
        left: &'static str,
        right: &'static str,
        min: i64,
    },
}

impl ObjectConstraint {
    /// Fields that must be bound and non-null for the check to run
    pub fn dependencies(&self) -> [&'static str; 2] {
        match self {
            ObjectConstraint::MinProduct { left, right, .. } => [*left, *right],
        }
    }

    /// Returns the message arguments when the constraint is violated
    ///
    /// `None` means either satisfied or not evaluable because a dependency
    /// has no integer value.
    pub fn violation(&self, target: &dyn Bindable) -> Option<Vec<MessageArg>> {
        match self {
            ObjectConstraint::MinProduct { left, right, min } => {
                let left = target.field_value(left)?.as_integer()?;
                let right = target.field_value(right)?.as_integer()?;
                let product = left.saturating_mul(right);
                (product < *min).then(|| vec![format_thousands(*min).into(), product.into()])
            }
        }
    }
}

/// One entry of a rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Field {
        field: &'static str,
        constraint: FieldConstraint,
        code: &'static str,
        groups: &'static [RuleGroup],
    },
    Object {
        constraint: ObjectConstraint,
        code: &'static str,
        groups: &'static [RuleGroup],
    },
}

impl Rule {
    /// A field rule that applies under every group
    pub fn field(field: &'static str, constraint: FieldConstraint, code: &'static str) -> Self {
        Rule::Field {
            field,
            constraint,
            code,
            groups: ALL_GROUPS,
        }
    }

    /// An object rule that applies under every group
    pub fn object(constraint: ObjectConstraint, code: &'static str) -> Self {
        Rule::Object {
            constraint,
            code,
            groups: ALL_GROUPS,
        }
    }

    /// Restrict the rule to the given groups
    pub fn in_groups(self, only: &'static [RuleGroup]) -> Self {
        match self {
            Rule::Field {
                field,
                constraint,
                code,
                ..
            } => Rule::Field {
                field,
                constraint,
                code,
                groups: only,
            },
            Rule::Object {
                constraint, code, ..
            } => Rule::Object {
                constraint,
                code,
                groups: only,
            },
        }
    }

    pub fn groups(&self) -> &'static [RuleGroup] {
        match self {
            Rule::Field { groups, .. } | Rule::Object { groups, .. } => *groups,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Rule::Field { code, .. } | Rule::Object { code, .. } => *code,
        }
    }

    /// Without an active group the rule applies if it is in the default group
    pub fn applies_to(&self, group: Option<RuleGroup>) -> bool {
        self.groups().contains(&group.unwrap_or_default())
    }
}

/// An ordered rule table for one object type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    object_name: &'static str,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(object_name: &'static str) -> Self {
        Self {
            object_name,
            rules: Vec::new(),
        }
    }

    /// Append a rule to the end of the table
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn object_name(&self) -> &'static str {
        self.object_name
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Evaluate every applicable field rule
    ///
    /// A field whose binding failed is skipped entirely, and value-comparing
    /// constraints are skipped when the value is null.
    pub fn check_fields(
        &self,
        target: &dyn Bindable,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    ) {
        for rule in self.rules.iter().filter(|r| r.applies_to(group)) {
            let Rule::Field {
                field,
                constraint,
                code,
                ..
            } = rule
            else {
                continue;
            };

            if errors.has_binding_failure(field) {
                tracing::trace!(field, code, "skipping rule on field with binding failure");
                continue;
            }

            let value = target.field_value(field).unwrap_or(FieldValue::Null);
            if value.is_null() && constraint.skips_null() {
                continue;
            }

            if !constraint.is_satisfied(&value) {
                errors.reject_value(field, code, constraint.arguments(), None);
            }
        }
    }

    /// Evaluate every applicable object rule whose dependencies bound cleanly
    pub fn check_object(
        &self,
        target: &dyn Bindable,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    ) {
        for rule in self.rules.iter().filter(|r| r.applies_to(group)) {
            let Rule::Object {
                constraint, code, ..
            } = rule
            else {
                continue;
            };

            let blocked = constraint
                .dependencies()
                .iter()
                .any(|field| errors.has_binding_failure(field));
            if blocked {
                tracing::trace!(code, "skipping object rule with unbound dependencies");
                continue;
            }

            if let Some(arguments) = constraint.violation(target) {
                errors.reject(code, arguments, None);
            }
        }
    }
}

impl<T: Bindable> Validator<T> for RuleSet {
    fn supports(&self, object_name: &str) -> bool {
        self.object_name == object_name
    }

    fn validate_fields(
        &self,
        target: &T,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    ) {
        self.check_fields(target, errors, group);
    }

    fn validate_object(
        &self,
        target: &T,
        errors: &mut ValidationResult<'_>,
        group: Option<RuleGroup>,
    ) {
        self.check_object(target, errors, group);
    }
}
