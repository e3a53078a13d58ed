//! Validation pipeline
//!
//! Drives one validator through the states of a single submission:
//!
//! ```text
//! Unvalidated -> FieldChecking -> ObjectChecking -> Accepted | Rejected
//! ```
//!
//! The accumulator handed to [`ValidationPipeline::run`] may already hold
//! binding failures. The verdict depends only on whether the accumulator
//! holds any error once the checks are done. A target the validator does not
//! support is rejected with an `unsupportedTarget` object error.

use crate::core::entity::Bindable;
use crate::core::validation::errors::FieldError;
use crate::core::validation::result::ValidationResult;
use crate::core::validation::rules::RuleGroup;
use crate::core::validation::validators::Validator;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Object error raised when the validator does not handle the target
pub const UNSUPPORTED_TARGET: &str = "unsupportedTarget";

/// Where a submission currently is in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Unvalidated,
    FieldChecking,
    ObjectChecking,
    Accepted,
    Rejected,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineState::Unvalidated => "unvalidated",
            PipelineState::FieldChecking => "field_checking",
            PipelineState::ObjectChecking => "object_checking",
            PipelineState::Accepted => "accepted",
            PipelineState::Rejected => "rejected",
        };
        f.write_str(name)
    }
}

/// Terminal outcome of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// The caller may persist the record
    Accepted,
    /// The caller re-renders the form with the errors
    Rejected,
}

impl From<Verdict> for PipelineState {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Accepted => PipelineState::Accepted,
            Verdict::Rejected => PipelineState::Rejected,
        }
    }
}

/// What to do when binding already recorded errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingFailurePolicy {
    /// Run every rule but skip the fields whose binding failed
    #[default]
    SkipFailedFields,
    /// Reject without evaluating any rule
    ShortCircuit,
}

/// Outcome of [`ValidationPipeline::evaluate`]
#[derive(Debug)]
pub struct Validation<'a> {
    pub verdict: Verdict,
    pub errors: ValidationResult<'a>,
}

impl Validation<'_> {
    pub fn is_rejected(&self) -> bool {
        self.verdict == Verdict::Rejected
    }
}

/// Runs a single validator with an optional rule group
pub struct ValidationPipeline<T: ?Sized> {
    validator: Arc<dyn Validator<T>>,
    group: Option<RuleGroup>,
    policy: BindingFailurePolicy,
}

impl<T: ?Sized> Clone for ValidationPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            group: self.group,
            policy: self.policy,
        }
    }
}

impl<T: ?Sized> fmt::Debug for ValidationPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("group", &self.group)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<T: Bindable> ValidationPipeline<T> {
    pub fn new(validator: impl Validator<T> + 'static) -> Self {
        Self::from_arc(Arc::new(validator))
    }

    pub fn from_arc(validator: Arc<dyn Validator<T>>) -> Self {
        Self {
            validator,
            group: None,
            policy: BindingFailurePolicy::default(),
        }
    }

    /// Only run rules declared for `group`
    pub fn with_group(mut self, group: RuleGroup) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_binding_failure_policy(mut self, policy: BindingFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn group(&self) -> Option<RuleGroup> {
        self.group
    }

    pub fn policy(&self) -> BindingFailurePolicy {
        self.policy
    }

    /// Run the checks against `target`, writing into `errors`
    pub fn run(&self, target: &T, errors: &mut ValidationResult<'_>) -> Verdict {
        let object = target.object_name();
        tracing::debug!(
            object,
            state = %PipelineState::Unvalidated,
            binding_errors = errors.error_count(),
            "validation started"
        );

        let skip_rules = self.policy == BindingFailurePolicy::ShortCircuit && errors.has_errors();
        if skip_rules {
            tracing::debug!(object, "binding failed, short-circuiting rules");
        } else if !self.validator.supports(object) {
            tracing::error!(object, "validator does not support target");
            errors.reject(
                UNSUPPORTED_TARGET,
                vec![object.into()],
                Some("Invalid target for validator: {0}".to_string()),
            );
        } else {
            tracing::debug!(object, state = %PipelineState::FieldChecking, group = ?self.group);
            self.validator.validate_fields(target, errors, self.group);

            tracing::debug!(object, state = %PipelineState::ObjectChecking, group = ?self.group);
            self.validator.validate_object(target, errors, self.group);
        }

        let verdict = if errors.has_errors() {
            Verdict::Rejected
        } else {
            Verdict::Accepted
        };
        tracing::debug!(
            object,
            state = %PipelineState::from(verdict),
            errors = errors.error_count(),
            "validation finished"
        );
        verdict
    }

    /// Build an accumulator from binding errors and run the checks
    pub fn evaluate<'a>(&self, target: &'a T, binding_errors: Vec<FieldError>) -> Validation<'a> {
        let mut errors = ValidationResult::with_binding_errors(target, binding_errors);
        let verdict = self.run(target, &mut errors);
        Validation { verdict, errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldValue;
    use crate::core::validation::errors::MessageArg;
    use crate::core::validation::validators::ItemValidator;
    use crate::entities::Item;

    fn type_mismatch(field: &str, raw: &str) -> FieldError {
        FieldError {
            object_name: "item".to_string(),
            field: field.to_string(),
            rejected_value: FieldValue::Text(raw.to_string()),
            binding_failure: true,
            codes: vec!["typeMismatch".to_string()],
            arguments: vec![],
            default_message: None,
        }
    }

    struct OrderValidator;

    impl Validator<Item> for OrderValidator {
        fn supports(&self, object_name: &str) -> bool {
            object_name == "order"
        }

        fn validate_fields(&self, _: &Item, errors: &mut ValidationResult<'_>, _: Option<RuleGroup>) {
            errors.reject_value("itemName", "required", vec![], None);
        }

        fn validate_object(&self, _: &Item, _: &mut ValidationResult<'_>, _: Option<RuleGroup>) {}
    }

    #[test]
    fn test_valid_item_is_accepted() {
        let pipeline = ValidationPipeline::new(Item::rule_set()).with_group(RuleGroup::Save);
        let item = Item::new("pen", 10_000, 10);

        let outcome = pipeline.evaluate(&item, vec![]);

        assert_eq!(outcome.verdict, Verdict::Accepted);
        assert!(!outcome.is_rejected());
    }

    #[test]
    fn test_invalid_item_is_rejected() {
        let pipeline = ValidationPipeline::new(ItemValidator);
        let item = Item::new("pen", 1000, 9);

        let outcome = pipeline.evaluate(&item, vec![]);

        assert!(outcome.is_rejected());
        assert!(outcome.errors.has_global_errors());
    }

    #[test]
    fn test_binding_errors_alone_reject() {
        let pipeline = ValidationPipeline::new(Item::rule_set());
        let item = Item {
            item_name: Some("pen".to_string()),
            quantity: Some(10),
            ..Item::default()
        };

        let outcome = pipeline.evaluate(&item, vec![type_mismatch("price", "abc")]);

        assert!(outcome.is_rejected());
        assert_eq!(outcome.errors.error_count(), 1);
        assert!(outcome.errors.has_binding_failure("price"));
        assert!(!outcome.errors.has_field_errors("id"));
    }

    #[test]
    fn test_no_group_accepts_new_item() {
        let pipeline = ValidationPipeline::new(Item::rule_set());
        let item = Item::new("pen", 1000, 10);

        let outcome = pipeline.evaluate(&item, vec![]);

        assert_eq!(outcome.verdict, Verdict::Accepted);
    }

    #[test]
    fn test_skip_failed_fields_still_checks_other_fields() {
        let pipeline = ValidationPipeline::new(Item::rule_set()).with_group(RuleGroup::Save);
        let item = Item {
            item_name: Some(" ".to_string()),
            quantity: Some(10),
            ..Item::default()
        };

        let outcome = pipeline.evaluate(&item, vec![type_mismatch("price", "abc")]);

        assert_eq!(outcome.errors.error_count(), 2);
        assert!(outcome.errors.has_field_errors("itemName"));
        assert!(!outcome.errors.has_global_errors());
    }

    #[test]
    fn test_short_circuit_skips_rules() {
        let pipeline = ValidationPipeline::new(Item::rule_set())
            .with_group(RuleGroup::Save)
            .with_binding_failure_policy(BindingFailurePolicy::ShortCircuit);
        let item = Item {
            item_name: Some(" ".to_string()),
            quantity: Some(10),
            ..Item::default()
        };

        let outcome = pipeline.evaluate(&item, vec![type_mismatch("price", "abc")]);

        assert!(outcome.is_rejected());
        assert_eq!(outcome.errors.error_count(), 1);
        assert!(!outcome.errors.has_field_errors("itemName"));
    }

    #[test]
    fn test_short_circuit_without_binding_errors_runs_rules() {
        let pipeline = ValidationPipeline::new(ItemValidator)
            .with_binding_failure_policy(BindingFailurePolicy::ShortCircuit);
        let item = Item::new("", 10_000, 10);

        let outcome = pipeline.evaluate(&item, vec![]);

        assert!(outcome.errors.has_field_errors("itemName"));
    }

    #[test]
    fn test_unsupported_validator_rejects() {
        let pipeline = ValidationPipeline::new(OrderValidator);
        let item = Item::new("", 1, 99_999);

        let outcome = pipeline.evaluate(&item, vec![]);

        assert_eq!(outcome.verdict, Verdict::Rejected);
        assert_eq!(outcome.errors.error_count(), 1);
        assert!(!outcome.errors.has_field_errors("itemName"));
        let error = outcome.errors.global_errors().next().unwrap();
        assert_eq!(error.codes.last().map(String::as_str), Some(UNSUPPORTED_TARGET));
        assert_eq!(error.arguments, vec![MessageArg::from("item")]);
    }

    #[test]
    fn test_run_with_existing_accumulator() {
        let pipeline = ValidationPipeline::new(Item::rule_set()).with_group(RuleGroup::Update);
        let item = Item::new("pen", 2000, 10_000);
        let mut errors = ValidationResult::new(&item);

        let verdict = pipeline.run(&item, &mut errors);

        assert_eq!(verdict, Verdict::Rejected);
        assert!(errors.has_field_errors("id"));
        assert!(!errors.has_field_errors("quantity"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(PipelineState::FieldChecking.to_string(), "field_checking");
        assert_eq!(PipelineState::from(Verdict::Rejected), PipelineState::Rejected);
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: BindingFailurePolicy = serde_yaml::from_str("short_circuit").unwrap();
        assert_eq!(policy, BindingFailurePolicy::ShortCircuit);
        assert_eq!(BindingFailurePolicy::default(), BindingFailurePolicy::SkipFailedFields);
    }
}
