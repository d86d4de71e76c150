//! In-memory storage backend
//!
//! Used for development without a database and for integration tests.
//! Reservation atomicity holds because the assigned-companion set and the
//! mapping table live behind a single lock.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use shared::{Coffee, CoffeeCompanion, Companion, FlavorCategory};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::storage::{CoffeeStore, CompanionStore, ReserveOutcome};

/// In-memory coffee store
#[derive(Default)]
pub struct MemoryCoffeeStore {
    coffees: RwLock<HashMap<Uuid, Coffee>>,
}

impl MemoryCoffeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err() -> AppError {
        AppError::StorageError("coffee store lock poisoned".to_string())
    }
}

#[async_trait]
impl CoffeeStore for MemoryCoffeeStore {
    async fn save(&self, coffee: &Coffee) -> AppResult<()> {
        let mut coffees = self.coffees.write().map_err(|_| Self::lock_err())?;
        coffees.insert(coffee.id, coffee.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Coffee> {
        let coffees = self.coffees.read().map_err(|_| Self::lock_err())?;
        coffees
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Coffee".to_string()))
    }

    async fn get_all(&self) -> AppResult<Vec<Coffee>> {
        let coffees = self.coffees.read().map_err(|_| Self::lock_err())?;
        let mut all: Vec<Coffee> = coffees.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update(&self, coffee: &Coffee) -> AppResult<()> {
        let mut coffees = self.coffees.write().map_err(|_| Self::lock_err())?;
        if !coffees.contains_key(&coffee.id) {
            return Err(AppError::NotFound("Coffee".to_string()));
        }
        coffees.insert(coffee.id, coffee.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut coffees = self.coffees.write().map_err(|_| Self::lock_err())?;
        coffees
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Coffee".to_string()))
    }
}

#[derive(Default)]
struct MappingTable {
    by_coffee: HashMap<Uuid, CoffeeCompanion>,
    /// Companion ids with a persisted mapping; the in-memory stand-in for
    /// the database unique index
    assigned: HashMap<i32, Uuid>,
}

/// In-memory companion store, seeded with an immutable roster
pub struct MemoryCompanionStore {
    companions: Vec<Companion>,
    mappings: RwLock<MappingTable>,
}

impl MemoryCompanionStore {
    pub fn new(companions: Vec<Companion>) -> Self {
        Self {
            companions,
            mappings: RwLock::new(MappingTable::default()),
        }
    }

    fn lock_err() -> AppError {
        AppError::StorageError("companion store lock poisoned".to_string())
    }
}

#[async_trait]
impl CompanionStore for MemoryCompanionStore {
    async fn get_all(&self) -> AppResult<Vec<Companion>> {
        Ok(self.companions.clone())
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Companion> {
        self.companions
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Companion".to_string()))
    }

    async fn get_by_category(&self, category: FlavorCategory) -> AppResult<Vec<Companion>> {
        Ok(self
            .companions
            .iter()
            .filter(|c| c.category == category)
            .cloned()
            .collect())
    }

    async fn is_assigned(&self, companion_id: i32) -> AppResult<bool> {
        let mappings = self.mappings.read().map_err(|_| Self::lock_err())?;
        Ok(mappings.assigned.contains_key(&companion_id))
    }

    async fn reserve_and_create(&self, mapping: &CoffeeCompanion) -> AppResult<ReserveOutcome> {
        let mut mappings = self.mappings.write().map_err(|_| Self::lock_err())?;
        if mappings.assigned.contains_key(&mapping.companion_id) {
            return Ok(ReserveOutcome::AlreadyAssigned);
        }
        mappings.assigned.insert(mapping.companion_id, mapping.id);
        mappings.by_coffee.insert(mapping.coffee_id, mapping.clone());
        Ok(ReserveOutcome::Reserved)
    }

    async fn get_for_coffee(&self, coffee_id: Uuid) -> AppResult<Option<CoffeeCompanion>> {
        let mappings = self.mappings.read().map_err(|_| Self::lock_err())?;
        Ok(mappings.by_coffee.get(&coffee_id).cloned())
    }

    async fn get_all_mappings(&self) -> AppResult<Vec<CoffeeCompanion>> {
        let mappings = self.mappings.read().map_err(|_| Self::lock_err())?;
        let mut all: Vec<CoffeeCompanion> = mappings.by_coffee.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    async fn update_nickname(&self, coffee_id: Uuid, nickname: &str) -> AppResult<()> {
        let mut mappings = self.mappings.write().map_err(|_| Self::lock_err())?;
        match mappings.by_coffee.get_mut(&coffee_id) {
            Some(mapping) => {
                mapping.nickname = nickname.to_string();
                Ok(())
            }
            None => Err(AppError::NotFound("Companion mapping".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn companion(id: i32, category: FlavorCategory) -> Companion {
        Companion {
            id,
            name: format!("companion-{}", id),
            category,
            sprite_path: format!("/sprites/{:03}.png", id),
            base_stats: Default::default(),
            description: String::new(),
        }
    }

    fn mapping(companion_id: i32) -> CoffeeCompanion {
        CoffeeCompanion {
            id: Uuid::new_v4(),
            coffee_id: Uuid::new_v4(),
            companion_id,
            companion_name: format!("companion-{}", companion_id),
            nickname: String::new(),
            level: 35,
            confidence: 0.8,
            description: "test".to_string(),
            trait_mapping: vec![],
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_reserve_is_exclusive() {
        let store = MemoryCompanionStore::new(vec![companion(1, FlavorCategory::Floral)]);

        let first = store.reserve_and_create(&mapping(1)).await.unwrap();
        assert_eq!(first, ReserveOutcome::Reserved);

        let second = store.reserve_and_create(&mapping(1)).await.unwrap();
        assert_eq!(second, ReserveOutcome::AlreadyAssigned);

        // The losing attempt must leave nothing behind
        assert_eq!(store.get_all_mappings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_is_assigned_tracks_reservations() {
        let store = MemoryCompanionStore::new(vec![companion(7, FlavorCategory::Cocoa)]);
        assert!(!store.is_assigned(7).await.unwrap());

        store.reserve_and_create(&mapping(7)).await.unwrap();
        assert!(store.is_assigned(7).await.unwrap());
    }

    #[tokio::test]
    async fn test_nickname_requires_existing_mapping() {
        let store = MemoryCompanionStore::new(vec![companion(3, FlavorCategory::Crisp)]);
        let err = store.update_nickname(Uuid::new_v4(), "Pebbles").await;
        assert!(matches!(err, Err(AppError::NotFound(_))));
    }
}
