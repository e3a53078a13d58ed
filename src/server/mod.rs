//! HTTP exposure of the item forms
//!
//! `ServerBuilder` wires a repository, a message catalog and a validation
//! strategy into an axum router with:
//! - the item form routes under `/validation/items`
//! - health check routes

pub mod builder;
pub mod extractor;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use extractor::SubmittedForm;
pub use handlers::AppState;
