//! Repository trait for item persistence

use crate::entities::Item;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Storage for accepted items
///
/// Only records that passed validation reach the repository. The framework
/// is agnostic to the underlying storage mechanism.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Store a new item and return it with its assigned identifier
    async fn save(&self, item: Item) -> Result<Item>;

    /// Get an item by ID
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Item>>;

    /// List all items in insertion order
    async fn find_all(&self) -> Result<Vec<Item>>;

    /// Replace name, price and quantity of an existing item
    ///
    /// Fails with [`EntityError::NotFound`](crate::core::error::EntityError)
    /// when no item has the given ID.
    async fn update(&self, id: &Uuid, item: Item) -> Result<()>;

    /// Remove every item
    async fn clear_store(&self) -> Result<()>;
}
