//! Validation pipeline
//!
//! Errors are accumulated per submission in a [`ValidationResult`], written
//! either by the declarative [`RuleSet`] or the imperative [`ItemValidator`],
//! and driven through its states by a [`ValidationPipeline`].

pub mod codes;
pub mod errors;
pub mod pipeline;
pub mod result;
pub mod rules;
pub mod validators;

pub use codes::{DefaultMessageCodesResolver, MessageCodeTemplate, MessageCodesResolver};
pub use errors::{FieldError, MessageArg, ObjectError, Resolvable, ValidationFailure, ViolationKind};
pub use pipeline::{
    BindingFailurePolicy, PipelineState, UNSUPPORTED_TARGET, Validation, ValidationPipeline, Verdict,
};
pub use result::ValidationResult;
pub use rules::{FieldConstraint, ObjectConstraint, Rule, RuleGroup, RuleSet};
pub use validators::{ItemValidator, Validator};
