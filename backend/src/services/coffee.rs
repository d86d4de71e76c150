//! Coffee tasting record service

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use shared::{
    validate_draw_down, validate_rating, validate_tasting_notes, validate_tasting_traits, Coffee,
    DrawDownTime, ProcessingMethod, RoastLevel, TastingTraits,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::storage::CoffeeStore;

/// Input for creating or updating a coffee entry
#[derive(Debug, Deserialize)]
pub struct CoffeeInput {
    pub name: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub roaster: String,
    #[serde(default)]
    pub variety: String,
    #[serde(default)]
    pub roast_level: RoastLevel,
    #[serde(default)]
    pub processing_method: ProcessingMethod,
    #[serde(default)]
    pub tasting_notes: Vec<String>,
    #[serde(default)]
    pub tasting_traits: TastingTraits,
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub recipe: Vec<String>,
    #[serde(default)]
    pub dripper: String,
    #[serde(default)]
    pub end_time: DrawDownTime,
}

/// Coffee service for managing tasting records
#[derive(Clone)]
pub struct CoffeeService {
    store: Arc<dyn CoffeeStore>,
}

impl CoffeeService {
    /// Create a new CoffeeService instance
    pub fn new(store: Arc<dyn CoffeeStore>) -> Self {
        Self { store }
    }

    /// Create a new coffee entry
    pub async fn create(&self, input: CoffeeInput) -> AppResult<Coffee> {
        Self::validate(&input)?;

        let now = Utc::now();
        let coffee = Coffee {
            id: Uuid::new_v4(),
            name: input.name,
            origin: input.origin,
            roaster: input.roaster,
            variety: input.variety,
            roast_level: input.roast_level,
            processing_method: input.processing_method,
            tasting_notes: input.tasting_notes,
            tasting_traits: input.tasting_traits,
            rating: input.rating,
            recipe: input.recipe,
            dripper: input.dripper,
            end_time: input.end_time,
            created_at: now,
            updated_at: now,
        };

        self.store.save(&coffee).await?;
        Ok(coffee)
    }

    /// Get a coffee by id
    pub async fn get(&self, id: Uuid) -> AppResult<Coffee> {
        self.store.get_by_id(id).await
    }

    /// List all coffees, newest first
    pub async fn list(&self) -> AppResult<Vec<Coffee>> {
        self.store.get_all().await
    }

    /// Update an existing coffee entry
    pub async fn update(&self, id: Uuid, input: CoffeeInput) -> AppResult<Coffee> {
        Self::validate(&input)?;

        let existing = self.store.get_by_id(id).await?;
        let coffee = Coffee {
            id,
            name: input.name,
            origin: input.origin,
            roaster: input.roaster,
            variety: input.variety,
            roast_level: input.roast_level,
            processing_method: input.processing_method,
            tasting_notes: input.tasting_notes,
            tasting_traits: input.tasting_traits,
            rating: input.rating,
            recipe: input.recipe,
            dripper: input.dripper,
            end_time: input.end_time,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        self.store.update(&coffee).await?;
        Ok(coffee)
    }

    /// Delete a coffee entry
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.store.delete(id).await
    }

    /// Reject malformed input before it reaches storage or the classifier
    fn validate(input: &CoffeeInput) -> AppResult<()> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Name is required".to_string(),
            });
        }

        validate_rating(input.rating).map_err(|message| AppError::Validation {
            field: "rating".to_string(),
            message,
        })?;

        validate_tasting_notes(&input.tasting_notes).map_err(|message| AppError::Validation {
            field: "tasting_notes".to_string(),
            message,
        })?;

        validate_tasting_traits(&input.tasting_traits).map_err(|message| AppError::Validation {
            field: "tasting_traits".to_string(),
            message,
        })?;

        validate_draw_down(&input.end_time).map_err(|message| AppError::Validation {
            field: "end_time".to_string(),
            message,
        })?;

        Ok(())
    }
}
