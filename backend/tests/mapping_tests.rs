//! Companion mapping pipeline tests
//!
//! Exercises the full assignment pipeline over the in-memory store with
//! controllable refiners: fallback totality, refiner trust, the uniqueness
//! invariant, alternative search, and category exhaustion.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use brewdex_backend::error::AppError;
use brewdex_backend::external::{Refiner, RefinerError, RefinerOutcome};
use brewdex_backend::services::{CompanionService, FlavorClassifier};
use brewdex_backend::storage::memory::MemoryCompanionStore;
use brewdex_backend::storage::{roster, CompanionStore};
use chrono::Utc;
use shared::{
    Coffee, CoffeeCompanion, Companion, DrawDownTime, FlavorCategory, ProcessingMethod,
    RoastLevel, TastingTraits, TraitMapping,
};
use uuid::Uuid;

/// Refiner stub that fails the way a non-JSON body does
struct BrokenRefiner;

#[async_trait]
impl Refiner for BrokenRefiner {
    async fn select(
        &self,
        _coffee: &Coffee,
        _candidates: &[Companion],
    ) -> Result<RefinerOutcome, RefinerError> {
        Err(RefinerError::MalformedPayload(
            "expected value at line 1 column 1".to_string(),
        ))
    }
}

/// Refiner stub that always names one companion, like a model with a
/// favorite; selections outside the shortlist signal failure just as the
/// real client does
struct FavoriteRefiner {
    name: String,
    confidence: f64,
}

#[async_trait]
impl Refiner for FavoriteRefiner {
    async fn select(
        &self,
        _coffee: &Coffee,
        candidates: &[Companion],
    ) -> Result<RefinerOutcome, RefinerError> {
        let companion = candidates
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(&self.name))
            .ok_or_else(|| RefinerError::UnknownSelection(self.name.clone()))?;

        Ok(RefinerOutcome {
            companion: companion.clone(),
            confidence: self.confidence,
            description: format!("{} is the obvious match.", companion.name),
            trait_mapping: vec![TraitMapping {
                trait_name: "sweetness".to_string(),
                companion_stat: "energy".to_string(),
                reasoning: "model-provided".to_string(),
            }],
        })
    }
}

fn sweet_coffee() -> Coffee {
    Coffee {
        id: Uuid::new_v4(),
        name: "Dessert Lot".to_string(),
        origin: "Gedeb".to_string(),
        roaster: "Test Roastery".to_string(),
        variety: "Heirloom".to_string(),
        roast_level: RoastLevel::Light,
        processing_method: ProcessingMethod::Washed,
        tasting_notes: vec![
            "sweet".to_string(),
            "honey".to_string(),
            "vanilla".to_string(),
            "candy".to_string(),
            "sugar".to_string(),
        ],
        tasting_traits: TastingTraits {
            sweetness: 9,
            bitterness: 1,
            aromatic_intensity: 8,
            florality: 6,
            berry_intensity: 6,
            ..Default::default()
        },
        rating: 8,
        recipe: vec!["30g bloom".to_string()],
        dripper: "V60".to_string(),
        end_time: DrawDownTime {
            minutes: 2,
            seconds: 45,
        },
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn setup(refiner: Option<Arc<dyn Refiner>>) -> (CompanionService, Arc<MemoryCompanionStore>) {
    let store = Arc::new(MemoryCompanionStore::new(roster::default_roster()));
    let service = CompanionService::new(
        store.clone(),
        Arc::new(FlavorClassifier::new()),
        refiner,
    );
    (service, store)
}

/// Reserve a companion directly, simulating an earlier mapping
async fn occupy(store: &MemoryCompanionStore, companion: &Companion) {
    let mapping = CoffeeCompanion {
        id: Uuid::new_v4(),
        coffee_id: Uuid::new_v4(),
        companion_id: companion.id,
        companion_name: companion.name.clone(),
        nickname: String::new(),
        level: 25,
        confidence: 0.5,
        description: "pre-existing".to_string(),
        trait_mapping: vec![],
        created_at: Utc::now(),
    };
    let outcome = store.reserve_and_create(&mapping).await.unwrap();
    assert_eq!(outcome, brewdex_backend::storage::ReserveOutcome::Reserved);
}

#[tokio::test]
async fn test_broken_refiner_still_produces_mapping_with_fallback_confidence() {
    let (service, _store) = setup(Some(Arc::new(BrokenRefiner)));
    let coffee = sweet_coffee();

    let mapping = service.assign_companion(&coffee).await.unwrap();

    // Fallback confidence is the primary category score scaled by 0.9
    let classification = FlavorClassifier::new().classify(&coffee);
    let expected = classification.primary_score() * 0.9;
    assert!((mapping.confidence - expected).abs() < 1e-12);

    assert!(mapping.description.contains("Profile-based match"));
    assert!(mapping.description.contains("Flavor analysis:"));
    assert_eq!(mapping.level, coffee.rating * 5);
    assert_eq!(mapping.coffee_id, coffee.id);
}

#[tokio::test]
async fn test_disabled_refiner_uses_first_shortlist_entry() {
    let (service, store) = setup(None);
    let coffee = sweet_coffee();

    let mapping = service.assign_companion(&coffee).await.unwrap();

    // The sweet profile classifies as Confection; the fallback picks the
    // first companion of that category in roster order
    let assigned = store.get_by_id(mapping.companion_id).await.unwrap();
    assert_eq!(assigned.category, FlavorCategory::Confection);

    let confection = store
        .get_by_category(FlavorCategory::Confection)
        .await
        .unwrap();
    assert_eq!(mapping.companion_id, confection[0].id);

    // Fallback annotations come from the strong traits
    let traits: Vec<&str> = mapping
        .trait_mapping
        .iter()
        .map(|m| m.trait_name.as_str())
        .collect();
    assert_eq!(traits, vec!["sweetness", "aroma"]);
}

#[tokio::test]
async fn test_refiner_selection_is_trusted_verbatim() {
    let (service, _store) = setup(Some(Arc::new(FavoriteRefiner {
        name: "vanillit".to_string(),
        confidence: 0.97,
    })));

    let mapping = service.assign_companion(&sweet_coffee()).await.unwrap();

    // Case-insensitive match against the shortlist, confidence and
    // annotations passed through untouched
    assert_eq!(mapping.companion_name, "Vanillit");
    assert_eq!(mapping.confidence, 0.97);
    assert!(mapping.description.starts_with("Vanillit is the obvious match."));
    assert_eq!(mapping.trait_mapping.len(), 1);
    assert_eq!(mapping.trait_mapping[0].reasoning, "model-provided");
}

#[tokio::test]
async fn test_refiner_selecting_outside_shortlist_falls_back() {
    // Boldbrew is a Cocoa companion; it is never in a Confection shortlist
    let (service, _store) = setup(Some(Arc::new(FavoriteRefiner {
        name: "Boldbrew".to_string(),
        confidence: 0.99,
    })));
    let coffee = sweet_coffee();

    let mapping = service.assign_companion(&coffee).await.unwrap();

    let classification = FlavorClassifier::new().classify(&coffee);
    let expected = classification.primary_score() * 0.9;
    assert!((mapping.confidence - expected).abs() < 1e-12);
    assert_ne!(mapping.companion_name, "Boldbrew");
}

#[tokio::test]
async fn test_no_two_coffees_share_a_companion() {
    let (service, _store) = setup(None);

    let mut seen = HashSet::new();
    for _ in 0..3 {
        let mapping = service.assign_companion(&sweet_coffee()).await.unwrap();
        assert!(
            seen.insert(mapping.companion_id),
            "companion {} assigned twice",
            mapping.companion_id
        );
    }
}

#[tokio::test]
async fn test_conflicting_choice_gets_alternative_from_same_category() {
    let (service, store) = setup(Some(Arc::new(FavoriteRefiner {
        name: "Sugarpuff".to_string(),
        confidence: 0.9,
    })));

    let first = service.assign_companion(&sweet_coffee()).await.unwrap();
    assert_eq!(first.companion_name, "Sugarpuff");

    // The refiner names Sugarpuff again; the enforcer must swap in an
    // unused companion of the same category
    let second = service.assign_companion(&sweet_coffee()).await.unwrap();
    assert_ne!(second.companion_id, first.companion_id);

    let replacement = store.get_by_id(second.companion_id).await.unwrap();
    assert_eq!(replacement.category, FlavorCategory::Confection);
}

#[tokio::test]
async fn test_last_candidate_contention_never_duplicates() {
    let (service, store) = setup(None);

    // Leave exactly one Confection companion free
    let confection = store
        .get_by_category(FlavorCategory::Confection)
        .await
        .unwrap();
    occupy(&store, &confection[0]).await;
    occupy(&store, &confection[1]).await;

    let first = service.assign_companion(&sweet_coffee()).await;
    let second = service.assign_companion(&sweet_coffee()).await;

    match (first, second) {
        (Ok(a), Ok(b)) => assert_ne!(a.companion_id, b.companion_id),
        (Ok(a), Err(err)) => {
            assert_eq!(a.companion_id, confection[2].id);
            assert!(matches!(err, AppError::CollectionExhausted { .. }));
        }
        other => panic!(
            "unexpected outcome: {:?}",
            (other.0.err(), other.1.err())
        ),
    }
}

#[tokio::test]
async fn test_exhausted_category_reports_collection_complete() {
    let (service, store) = setup(None);

    for companion in store
        .get_by_category(FlavorCategory::Confection)
        .await
        .unwrap()
    {
        occupy(&store, &companion).await;
    }

    let err = service.assign_companion(&sweet_coffee()).await.unwrap_err();
    match err {
        AppError::CollectionExhausted { category } => assert_eq!(category, "confection"),
        other => panic!("expected CollectionExhausted, got {:?}", other),
    }

    // Terminal: retrying yields the same outcome, never a duplicate
    let retry = service.assign_companion(&sweet_coffee()).await;
    assert!(matches!(
        retry,
        Err(AppError::CollectionExhausted { .. })
    ));
}

#[tokio::test]
async fn test_concurrent_requests_for_one_free_companion() {
    let (service, store) = setup(None);

    let confection = store
        .get_by_category(FlavorCategory::Confection)
        .await
        .unwrap();
    occupy(&store, &confection[0]).await;
    occupy(&store, &confection[1]).await;

    let coffee_a = sweet_coffee();
    let coffee_b = sweet_coffee();
    let (a, b) = tokio::join!(
        service.assign_companion(&coffee_a),
        service.assign_companion(&coffee_b)
    );

    // Exactly one of the racing requests may hold the last companion; the
    // other either lost the race outright or found no alternative
    let winners: Vec<i32> = [&a, &b]
        .iter()
        .filter_map(|r| r.as_ref().ok().map(|m| m.companion_id))
        .collect();
    let unique: HashSet<&i32> = winners.iter().collect();
    assert_eq!(winners.len(), unique.len());

    for result in [a, b] {
        if let Err(err) = result {
            assert!(matches!(err, AppError::CollectionExhausted { .. }));
        }
    }
}

#[tokio::test]
async fn test_assignment_is_idempotent_per_coffee() {
    let (service, store) = setup(None);
    let coffee = sweet_coffee();

    let first = service.assign_companion(&coffee).await.unwrap();
    let second = service.assign_companion(&coffee).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.companion_id, second.companion_id);
    assert_eq!(store.get_all_mappings().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_nickname_updates_only_existing_mappings() {
    let (service, _store) = setup(None);
    let coffee = sweet_coffee();

    let err = service.update_nickname(coffee.id, "Pebbles").await;
    assert!(matches!(err, Err(AppError::NotFound(_))));

    service.assign_companion(&coffee).await.unwrap();
    service.update_nickname(coffee.id, "Pebbles").await.unwrap();

    let mapping = service.get_for_coffee(coffee.id).await.unwrap();
    assert_eq!(mapping.nickname, "Pebbles");
}
