//! Persistence layer for coffees, companions, and their mappings
//!
//! Two interchangeable backends: Postgres for deployments and an in-memory
//! store for development and tests. The companion store owns the one piece
//! of shared mutable state in the system, the assigned-companion registry,
//! and exposes reservation as a single atomic operation.

pub mod memory;
pub mod postgres;
pub mod roster;

use async_trait::async_trait;
use shared::{Coffee, CoffeeCompanion, Companion, FlavorCategory};
use uuid::Uuid;

use crate::error::AppResult;

/// Result of an atomic reservation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The companion was free; the mapping is now persisted
    Reserved,
    /// Another mapping already holds this companion
    AlreadyAssigned,
}

/// Coffee tasting record persistence
#[async_trait]
pub trait CoffeeStore: Send + Sync {
    async fn save(&self, coffee: &Coffee) -> AppResult<()>;
    async fn get_by_id(&self, id: Uuid) -> AppResult<Coffee>;
    async fn get_all(&self) -> AppResult<Vec<Coffee>>;
    async fn update(&self, coffee: &Coffee) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// Companion roster and mapping persistence
#[async_trait]
pub trait CompanionStore: Send + Sync {
    async fn get_all(&self) -> AppResult<Vec<Companion>>;
    async fn get_by_id(&self, id: i32) -> AppResult<Companion>;
    async fn get_by_category(&self, category: FlavorCategory) -> AppResult<Vec<Companion>>;
    async fn is_assigned(&self, companion_id: i32) -> AppResult<bool>;

    /// Atomically reserve `mapping.companion_id` and persist the mapping.
    ///
    /// This must be a single operation at the persistence boundary; a
    /// check-then-insert sequence is not safe under concurrent requests.
    /// Returns [`ReserveOutcome::AlreadyAssigned`] when the companion is
    /// taken, leaving nothing persisted.
    async fn reserve_and_create(&self, mapping: &CoffeeCompanion) -> AppResult<ReserveOutcome>;

    async fn get_for_coffee(&self, coffee_id: Uuid) -> AppResult<Option<CoffeeCompanion>>;
    async fn get_all_mappings(&self) -> AppResult<Vec<CoffeeCompanion>>;
    async fn update_nickname(&self, coffee_id: Uuid, nickname: &str) -> AppResult<()>;
}
