//! In-memory implementation of ItemRepository for testing and development

use crate::core::error::{EntityError, StorageError};
use crate::core::service::ItemRepository;
use crate::entities::Item;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::LockPoisoned {
        message: e.to_string(),
    }
}

/// In-memory item repository
///
/// Items are kept in insertion order. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryItemRepository {
    items: Arc<RwLock<IndexMap<Uuid, Item>>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn save(&self, mut item: Item) -> Result<Item> {
        let mut items = self.items.write().map_err(poisoned)?;

        let id = Uuid::new_v4();
        item.id = Some(id);
        items.insert(id, item.clone());

        tracing::info!(%id, "item saved");
        Ok(item)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Item>> {
        let items = self.items.read().map_err(poisoned)?;

        Ok(items.get(id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Item>> {
        let items = self.items.read().map_err(poisoned)?;

        Ok(items.values().cloned().collect())
    }

    async fn update(&self, id: &Uuid, item: Item) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;

        let stored = items
            .get_mut(id)
            .ok_or(EntityError::NotFound { id: *id })?;
        stored.item_name = item.item_name;
        stored.price = item.price;
        stored.quantity = item.quantity;

        tracing::info!(%id, "item updated");
        Ok(())
    }

    async fn clear_store(&self) -> Result<()> {
        let mut items = self.items.write().map_err(poisoned)?;

        items.clear();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_id() {
        let repository = InMemoryItemRepository::new();

        let saved = repository.save(Item::new("pen", 1000, 10)).await.unwrap();

        let id = saved.id.unwrap();
        let found = repository.find_by_id(&id).await.unwrap();
        assert_eq!(found, Some(saved));
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repository = InMemoryItemRepository::new();
        repository.save(Item::new("a", 1000, 10)).await.unwrap();
        repository.save(Item::new("b", 2000, 10)).await.unwrap();
        repository.save(Item::new("c", 3000, 10)).await.unwrap();

        let names: Vec<_> = repository
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .filter_map(|i| i.item_name)
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let repository = InMemoryItemRepository::new();
        let saved = repository.save(Item::new("pen", 1000, 10)).await.unwrap();
        let id = saved.id.unwrap();

        let mut changed = Item::new("pencil", 2000, 20);
        changed.id = Some(Uuid::new_v4());
        repository.update(&id, changed).await.unwrap();

        let found = repository.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.item_name.as_deref(), Some("pencil"));
        assert_eq!(found.price, Some(2000));
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails() {
        let repository = InMemoryItemRepository::new();

        let err = repository
            .update(&Uuid::new_v4(), Item::new("pen", 1000, 10))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<EntityError>().is_some());
    }

    #[tokio::test]
    async fn test_clear_store() {
        let repository = InMemoryItemRepository::new();
        repository.save(Item::new("pen", 1000, 10)).await.unwrap();

        repository.clear_store().await.unwrap();

        assert!(repository.find_all().await.unwrap().is_empty());
    }
}
