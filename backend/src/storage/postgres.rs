//! PostgreSQL storage backend
//!
//! The `coffee_companions` table carries a unique index on `companion_id`;
//! [`PgCompanionStore::reserve_and_create`] rides that index with a single
//! `INSERT ... ON CONFLICT DO NOTHING`, which is what makes concurrent
//! reservation attempts safe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{
    Coffee, CoffeeCompanion, Companion, CompanionStats, DrawDownTime, FlavorCategory,
    TastingTraits, TraitMapping,
};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::storage::{CoffeeStore, CompanionStore, ReserveOutcome};

/// Coffee store over PostgreSQL
#[derive(Clone)]
pub struct PgCoffeeStore {
    db: PgPool,
}

/// Database row for a coffee entry
#[derive(Debug, sqlx::FromRow)]
struct CoffeeRow {
    id: Uuid,
    name: String,
    origin: String,
    roaster: String,
    variety: String,
    roast_level: String,
    processing_method: String,
    tasting_notes: Json<Vec<String>>,
    tasting_traits: Json<TastingTraits>,
    rating: i32,
    recipe: Json<Vec<String>>,
    dripper: String,
    end_minutes: i32,
    end_seconds: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn row_to_coffee(row: CoffeeRow) -> AppResult<Coffee> {
    Ok(Coffee {
        id: row.id,
        name: row.name,
        origin: row.origin,
        roaster: row.roaster,
        variety: row.variety,
        roast_level: row.roast_level.parse().map_err(AppError::StorageError)?,
        processing_method: row
            .processing_method
            .parse()
            .map_err(AppError::StorageError)?,
        tasting_notes: row.tasting_notes.0,
        tasting_traits: row.tasting_traits.0,
        rating: row.rating,
        recipe: row.recipe.0,
        dripper: row.dripper,
        end_time: DrawDownTime {
            minutes: row.end_minutes,
            seconds: row.end_seconds,
        },
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

impl PgCoffeeStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CoffeeStore for PgCoffeeStore {
    async fn save(&self, coffee: &Coffee) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO coffees (
                id, name, origin, roaster, variety, roast_level, processing_method,
                tasting_notes, tasting_traits, rating, recipe, dripper,
                end_minutes, end_seconds, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(coffee.id)
        .bind(&coffee.name)
        .bind(&coffee.origin)
        .bind(&coffee.roaster)
        .bind(&coffee.variety)
        .bind(coffee.roast_level.as_str())
        .bind(coffee.processing_method.as_str())
        .bind(Json(&coffee.tasting_notes))
        .bind(Json(&coffee.tasting_traits))
        .bind(coffee.rating)
        .bind(Json(&coffee.recipe))
        .bind(&coffee.dripper)
        .bind(coffee.end_time.minutes)
        .bind(coffee.end_time.seconds)
        .bind(coffee.created_at)
        .bind(coffee.updated_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Coffee> {
        let row = sqlx::query_as::<_, CoffeeRow>(
            r#"
            SELECT id, name, origin, roaster, variety, roast_level, processing_method,
                   tasting_notes, tasting_traits, rating, recipe, dripper,
                   end_minutes, end_seconds, created_at, updated_at
            FROM coffees
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Coffee".to_string()))?;

        row_to_coffee(row)
    }

    async fn get_all(&self) -> AppResult<Vec<Coffee>> {
        let rows = sqlx::query_as::<_, CoffeeRow>(
            r#"
            SELECT id, name, origin, roaster, variety, roast_level, processing_method,
                   tasting_notes, tasting_traits, rating, recipe, dripper,
                   end_minutes, end_seconds, created_at, updated_at
            FROM coffees
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_coffee).collect()
    }

    async fn update(&self, coffee: &Coffee) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE coffees
            SET name = $2, origin = $3, roaster = $4, variety = $5, roast_level = $6,
                processing_method = $7, tasting_notes = $8, tasting_traits = $9,
                rating = $10, recipe = $11, dripper = $12, end_minutes = $13,
                end_seconds = $14, updated_at = $15
            WHERE id = $1
            "#,
        )
        .bind(coffee.id)
        .bind(&coffee.name)
        .bind(&coffee.origin)
        .bind(&coffee.roaster)
        .bind(&coffee.variety)
        .bind(coffee.roast_level.as_str())
        .bind(coffee.processing_method.as_str())
        .bind(Json(&coffee.tasting_notes))
        .bind(Json(&coffee.tasting_traits))
        .bind(coffee.rating)
        .bind(Json(&coffee.recipe))
        .bind(&coffee.dripper)
        .bind(coffee.end_time.minutes)
        .bind(coffee.end_time.seconds)
        .bind(coffee.updated_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Coffee".to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM coffees WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Coffee".to_string()));
        }
        Ok(())
    }
}

/// Companion store over PostgreSQL
#[derive(Clone)]
pub struct PgCompanionStore {
    db: PgPool,
}

/// Database row for a companion
#[derive(Debug, sqlx::FromRow)]
struct CompanionRow {
    id: i32,
    name: String,
    category: String,
    sprite_path: String,
    base_stats: Json<CompanionStats>,
    description: String,
}

fn row_to_companion(row: CompanionRow) -> AppResult<Companion> {
    Ok(Companion {
        id: row.id,
        name: row.name,
        category: row.category.parse().map_err(AppError::StorageError)?,
        sprite_path: row.sprite_path,
        base_stats: row.base_stats.0,
        description: row.description,
    })
}

/// Database row for a coffee-companion mapping
#[derive(Debug, sqlx::FromRow)]
struct MappingRow {
    id: Uuid,
    coffee_id: Uuid,
    companion_id: i32,
    companion_name: String,
    nickname: String,
    level: i32,
    confidence: f64,
    description: String,
    trait_mapping: Json<Vec<TraitMapping>>,
    created_at: DateTime<Utc>,
}

fn row_to_mapping(row: MappingRow) -> CoffeeCompanion {
    CoffeeCompanion {
        id: row.id,
        coffee_id: row.coffee_id,
        companion_id: row.companion_id,
        companion_name: row.companion_name,
        nickname: row.nickname,
        level: row.level,
        confidence: row.confidence,
        description: row.description,
        trait_mapping: row.trait_mapping.0,
        created_at: row.created_at,
    }
}

impl PgCompanionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Idempotently load the companion roster into the reference table
    pub async fn seed(&self, roster: &[Companion]) -> AppResult<()> {
        for companion in roster {
            sqlx::query(
                r#"
                INSERT INTO companions (id, name, category, sprite_path, base_stats, description)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(companion.id)
            .bind(&companion.name)
            .bind(companion.category.as_str())
            .bind(&companion.sprite_path)
            .bind(Json(&companion.base_stats))
            .bind(&companion.description)
            .execute(&self.db)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CompanionStore for PgCompanionStore {
    async fn get_all(&self) -> AppResult<Vec<Companion>> {
        let rows = sqlx::query_as::<_, CompanionRow>(
            "SELECT id, name, category, sprite_path, base_stats, description FROM companions ORDER BY id",
        )
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_companion).collect()
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Companion> {
        let row = sqlx::query_as::<_, CompanionRow>(
            "SELECT id, name, category, sprite_path, base_stats, description FROM companions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Companion".to_string()))?;

        row_to_companion(row)
    }

    async fn get_by_category(&self, category: FlavorCategory) -> AppResult<Vec<Companion>> {
        let rows = sqlx::query_as::<_, CompanionRow>(
            r#"
            SELECT id, name, category, sprite_path, base_stats, description
            FROM companions
            WHERE category = $1
            ORDER BY id
            "#,
        )
        .bind(category.as_str())
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(row_to_companion).collect()
    }

    async fn is_assigned(&self, companion_id: i32) -> AppResult<bool> {
        let assigned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM coffee_companions WHERE companion_id = $1)",
        )
        .bind(companion_id)
        .fetch_one(&self.db)
        .await?;

        Ok(assigned)
    }

    async fn reserve_and_create(&self, mapping: &CoffeeCompanion) -> AppResult<ReserveOutcome> {
        // The unique index on companion_id decides the race; losing inserts
        // affect zero rows and leave nothing persisted
        let result = sqlx::query(
            r#"
            INSERT INTO coffee_companions (
                id, coffee_id, companion_id, companion_name, nickname,
                level, confidence, description, trait_mapping, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (companion_id) DO NOTHING
            "#,
        )
        .bind(mapping.id)
        .bind(mapping.coffee_id)
        .bind(mapping.companion_id)
        .bind(&mapping.companion_name)
        .bind(&mapping.nickname)
        .bind(mapping.level)
        .bind(mapping.confidence)
        .bind(&mapping.description)
        .bind(Json(&mapping.trait_mapping))
        .bind(mapping.created_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 1 {
            Ok(ReserveOutcome::Reserved)
        } else {
            Ok(ReserveOutcome::AlreadyAssigned)
        }
    }

    async fn get_for_coffee(&self, coffee_id: Uuid) -> AppResult<Option<CoffeeCompanion>> {
        let row = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, coffee_id, companion_id, companion_name, nickname,
                   level, confidence, description, trait_mapping, created_at
            FROM coffee_companions
            WHERE coffee_id = $1
            "#,
        )
        .bind(coffee_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(row_to_mapping))
    }

    async fn get_all_mappings(&self) -> AppResult<Vec<CoffeeCompanion>> {
        let rows = sqlx::query_as::<_, MappingRow>(
            r#"
            SELECT id, coffee_id, companion_id, companion_name, nickname,
                   level, confidence, description, trait_mapping, created_at
            FROM coffee_companions
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(row_to_mapping).collect())
    }

    async fn update_nickname(&self, coffee_id: Uuid, nickname: &str) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE coffee_companions SET nickname = $2 WHERE coffee_id = $1")
                .bind(coffee_id)
                .bind(nickname)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Companion mapping".to_string()));
        }
        Ok(())
    }
}
