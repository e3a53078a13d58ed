//! Core module containing the binding, validation and message types

pub mod binding;
pub mod entity;
pub mod error;
pub mod field;
pub mod messages;
pub mod service;
pub mod validation;

pub use binding::{BoundForm, DataBinder, FormValues, FromForm};
pub use entity::Bindable;
pub use error::{ItemServiceError, ItemServiceResult};
pub use field::{FieldType, FieldValue};
pub use messages::{MessageCatalog, MessageSource, RenderedErrors};
pub use service::ItemRepository;
