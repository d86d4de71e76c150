//! Companion assignment pipeline
//!
//! Classify the coffee, build a bounded candidate shortlist, let the
//! generative refiner pick (or fall back to rule-based selection), then
//! atomically reserve the companion so no two coffees ever share one.

use std::sync::Arc;

use chrono::Utc;
use shared::{Coffee, CoffeeCompanion, Companion, FlavorCategory, TastingTraits, TraitMapping};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::external::Refiner;
use crate::services::classifier::{Classification, FlavorClassifier};
use crate::storage::{CompanionStore, ReserveOutcome};

/// Candidate shortlists are capped to bound the refiner payload
const MAX_CANDIDATES: usize = 10;

/// What a selector (refiner or fallback) produced for a coffee
#[derive(Debug, Clone)]
struct Selection {
    companion: Companion,
    confidence: f64,
    description: String,
    trait_mapping: Vec<TraitMapping>,
}

/// Companion service orchestrating the mapping pipeline
#[derive(Clone)]
pub struct CompanionService {
    store: Arc<dyn CompanionStore>,
    classifier: Arc<FlavorClassifier>,
    refiner: Option<Arc<dyn Refiner>>,
}

impl CompanionService {
    /// Create a new CompanionService instance
    pub fn new(
        store: Arc<dyn CompanionStore>,
        classifier: Arc<FlavorClassifier>,
        refiner: Option<Arc<dyn Refiner>>,
    ) -> Self {
        Self {
            store,
            classifier,
            refiner,
        }
    }

    /// Assign a unique companion to a coffee and persist the mapping.
    ///
    /// Idempotent per coffee: if a mapping already exists it is returned
    /// unchanged.
    pub async fn assign_companion(&self, coffee: &Coffee) -> AppResult<CoffeeCompanion> {
        if let Some(existing) = self.store.get_for_coffee(coffee.id).await? {
            tracing::debug!(coffee_id = %coffee.id, "companion already assigned");
            return Ok(existing);
        }

        // 1. Score the coffee against every category rule
        let classification = self.classifier.classify(coffee);
        tracing::info!(
            coffee_id = %coffee.id,
            primary = %classification.primary,
            secondary = ?classification.secondary,
            score = classification.primary_score(),
            "classified coffee"
        );

        // 2. Bounded candidate shortlist for the chosen categories
        let shortlist = self
            .shortlist(classification.primary, classification.secondary)
            .await?;

        // 3. Refiner selection, or rule-based fallback on any refiner failure
        let selection = match &self.refiner {
            Some(refiner) => match refiner.select(coffee, &shortlist).await {
                Ok(outcome) => Selection {
                    companion: outcome.companion,
                    confidence: outcome.confidence,
                    description: outcome.description,
                    trait_mapping: outcome.trait_mapping,
                },
                Err(err) => {
                    tracing::warn!(error = %err, "refiner unavailable, using rule-based selection");
                    self.fallback_selection(coffee, &classification, &shortlist)
                }
            },
            None => self.fallback_selection(coffee, &classification, &shortlist),
        };

        // 4. Assemble the final mapping record
        let mapping = self.assemble(coffee, &classification, selection);

        // 5. Reserve the companion atomically, searching the category for an
        //    unused alternative if the first choice is taken
        self.reserve(mapping).await
    }

    /// Get the companion mapping for a coffee
    pub async fn get_for_coffee(&self, coffee_id: Uuid) -> AppResult<CoffeeCompanion> {
        self.store
            .get_for_coffee(coffee_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Companion mapping".to_string()))
    }

    /// All coffee-companion mappings, oldest first
    pub async fn dex(&self) -> AppResult<Vec<CoffeeCompanion>> {
        self.store.get_all_mappings().await
    }

    /// Set the display nickname on an existing mapping
    pub async fn update_nickname(&self, coffee_id: Uuid, nickname: &str) -> AppResult<()> {
        self.store.update_nickname(coffee_id, nickname).await
    }

    /// Collect candidates for the primary then secondary category, capped at
    /// [`MAX_CANDIDATES`]. Falls back to the baseline category when both are
    /// empty; an empty baseline roster is a configuration error.
    async fn shortlist(
        &self,
        primary: FlavorCategory,
        secondary: Option<FlavorCategory>,
    ) -> AppResult<Vec<Companion>> {
        let mut candidates = self.store.get_by_category(primary).await?;

        if let Some(secondary) = secondary {
            candidates.extend(self.store.get_by_category(secondary).await?);
        }

        if candidates.is_empty() {
            candidates = self.store.get_by_category(FlavorCategory::BASELINE).await?;
        }

        if candidates.is_empty() {
            return Err(AppError::Configuration(format!(
                "no companions seeded for category {} or the baseline",
                primary
            )));
        }

        candidates.truncate(MAX_CANDIDATES);
        Ok(candidates)
    }

    /// Deterministic selection used whenever the refiner is disabled or
    /// unavailable: first shortlist entry, confidence derived from the
    /// primary category score
    fn fallback_selection(
        &self,
        coffee: &Coffee,
        classification: &Classification,
        shortlist: &[Companion],
    ) -> Selection {
        let companion = shortlist[0].clone();
        let confidence = classification.primary_score() * 0.9;
        let description = format!(
            "Profile-based match: {} ({}-class) reflects this coffee's {} character with {:.0}% confidence",
            companion.name,
            companion.category,
            classification.primary,
            confidence * 100.0
        );
        let trait_mapping = build_trait_mapping(&coffee.tasting_traits);

        Selection {
            companion,
            confidence,
            description,
            trait_mapping,
        }
    }

    /// Compose the final mapping record from the selection and the
    /// classification rationale
    fn assemble(
        &self,
        coffee: &Coffee,
        classification: &Classification,
        selection: Selection,
    ) -> CoffeeCompanion {
        let mut rationale = self.classifier.describe(classification.primary, coffee);
        if let Some(secondary) = classification.secondary {
            rationale.push_str(" and ");
            rationale.push_str(&self.classifier.describe(secondary, coffee));
        }

        CoffeeCompanion {
            id: Uuid::new_v4(),
            coffee_id: coffee.id,
            companion_id: selection.companion.id,
            companion_name: selection.companion.name,
            nickname: String::new(),
            level: level_for_rating(coffee.rating),
            confidence: selection.confidence,
            description: format!("{}\n\nFlavor analysis: {}", selection.description, rationale),
            trait_mapping: selection.trait_mapping,
            created_at: Utc::now(),
        }
    }

    /// Persist the mapping behind the atomic reservation. When the chosen
    /// companion is already taken, make one pass over unassigned companions
    /// of the same category; each attempt is itself atomic, so losing a race
    /// just moves on to the next alternative.
    async fn reserve(&self, mapping: CoffeeCompanion) -> AppResult<CoffeeCompanion> {
        if self.store.reserve_and_create(&mapping).await? == ReserveOutcome::Reserved {
            return Ok(mapping);
        }

        let chosen = self.store.get_by_id(mapping.companion_id).await?;
        tracing::info!(
            companion = %chosen.name,
            category = %chosen.category,
            "companion already assigned, searching category for an alternative"
        );

        let alternatives = self.store.get_by_category(chosen.category).await?;
        for alternative in alternatives {
            if alternative.id == chosen.id || self.store.is_assigned(alternative.id).await? {
                continue;
            }

            let retry = CoffeeCompanion {
                companion_id: alternative.id,
                companion_name: alternative.name.clone(),
                ..mapping.clone()
            };
            if self.store.reserve_and_create(&retry).await? == ReserveOutcome::Reserved {
                return Ok(retry);
            }
        }

        Err(AppError::CollectionExhausted {
            category: chosen.category.to_string(),
        })
    }
}

/// Rating 0-10 maps onto companion level 0-50
fn level_for_rating(rating: i32) -> i32 {
    rating * 5
}

/// Fixed annotations for the fallback path: each strongly-present trait maps
/// onto one companion stat
fn build_trait_mapping(traits: &TastingTraits) -> Vec<TraitMapping> {
    let mut mappings = Vec::new();

    if traits.sweetness >= 7 {
        mappings.push(TraitMapping {
            trait_name: "sweetness".to_string(),
            companion_stat: "energy".to_string(),
            reasoning: "High sweetness provides sustained energy".to_string(),
        });
    }
    if traits.bitterness >= 7 {
        mappings.push(TraitMapping {
            trait_name: "bitterness".to_string(),
            companion_stat: "boldness".to_string(),
            reasoning: "Bold bitterness reads as assertive flavor".to_string(),
        });
    }
    if traits.body >= 7 {
        mappings.push(TraitMapping {
            trait_name: "body".to_string(),
            companion_stat: "depth".to_string(),
            reasoning: "Full body gives grounded depth".to_string(),
        });
    }
    if traits.citrus_fruits_intensity >= 7 {
        mappings.push(TraitMapping {
            trait_name: "citrus".to_string(),
            companion_stat: "brightness".to_string(),
            reasoning: "Bright citrus notes bring quick, lively energy".to_string(),
        });
    }
    if traits.aromatic_intensity >= 7 {
        mappings.push(TraitMapping {
            trait_name: "aroma".to_string(),
            companion_stat: "finesse".to_string(),
            reasoning: "Complex aroma shows refined finesse".to_string(),
        });
    }

    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_scales_with_rating() {
        assert_eq!(level_for_rating(0), 0);
        assert_eq!(level_for_rating(7), 35);
        assert_eq!(level_for_rating(10), 50);
    }

    #[test]
    fn test_trait_mapping_only_includes_strong_traits() {
        let traits = TastingTraits {
            sweetness: 9,
            bitterness: 6,
            body: 7,
            citrus_fruits_intensity: 2,
            aromatic_intensity: 8,
            ..Default::default()
        };

        let mappings = build_trait_mapping(&traits);
        let names: Vec<&str> = mappings.iter().map(|m| m.trait_name.as_str()).collect();
        assert_eq!(names, vec!["sweetness", "body", "aroma"]);

        let stats: Vec<&str> = mappings.iter().map(|m| m.companion_stat.as_str()).collect();
        assert_eq!(stats, vec!["energy", "depth", "finesse"]);
    }

    #[test]
    fn test_trait_mapping_empty_for_muted_profile() {
        assert!(build_trait_mapping(&TastingTraits::default()).is_empty());
    }
}
