//! # item-validation
//!
//! Server-side validation for an item form: binding of raw submitted text,
//! field and object rules, message code resolution and message rendering.
//!
//! ## Features
//!
//! - **Error accumulation**: field and object errors are collected as data
//!   in a `ValidationResult`, never raised
//! - **Message code fallback**: `required.item.itemName` → `required.itemName`
//!   → `required.String` → `required`
//! - **Two validator strategies**: a declarative rule table with rule groups
//!   and a hand-written validator
//! - **Binding failures**: unparsable values become `typeMismatch` errors and
//!   suppress further rules on their field
//! - **YAML configuration and message catalogs**
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use item_validation::prelude::*;
//!
//! let form: FormValues = [("itemName", "pen"), ("price", "1000"), ("quantity", "9")]
//!     .into_iter()
//!     .map(|(k, v)| (k.to_string(), v.to_string()))
//!     .collect();
//!
//! let BoundForm { target, errors } = Item::from_form(&form);
//! let pipeline = ValidationPipeline::new(Item::rule_set()).with_group(RuleGroup::Save);
//! let outcome = pipeline.evaluate(&target, errors);
//!
//! let rendered = MessageCatalog::default_catalog().render(&outcome.errors);
//! assert_eq!(rendered.global_errors.len(), 1); // price * quantity < 10,000
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        binding::{BoundForm, DataBinder, FormValues, FromForm},
        entity::Bindable,
        error::{ItemServiceError, ItemServiceResult},
        field::{FieldType, FieldValue},
        messages::{MessageCatalog, MessageSource, RenderedErrors},
        service::ItemRepository,
    };

    // === Validation ===
    pub use crate::core::validation::{
        BindingFailurePolicy, FieldError, ItemValidator, MessageArg, MessageCodesResolver,
        ObjectError, Resolvable, RuleGroup, RuleSet, ValidationFailure, ValidationPipeline,
        ValidationResult, Validator, Verdict, ViolationKind,
    };

    // === Entities ===
    pub use crate::entities::Item;

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryItemRepository;

    // === Config ===
    pub use crate::config::{AppConfig, ValidationStrategy};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
