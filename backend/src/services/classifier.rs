//! Flavor classification engine
//!
//! Scores a coffee against the static category rule table and picks the
//! primary and secondary flavor categories. Scoring is pure: identical
//! input and rule table always produce identical output.

use shared::{Coffee, FlavorCategory, ProcessingMethod, RoastLevel, TastingTrait};

/// A trait's contribution to one category
#[derive(Debug, Clone)]
pub struct TraitWeight {
    pub trait_kind: TastingTrait,
    pub weight: f64,
    /// Minimum value needed to count
    pub min: i32,
    /// Maximum value for optimal score
    pub max: i32,
}

fn tw(trait_kind: TastingTrait, weight: f64, min: i32, max: i32) -> TraitWeight {
    TraitWeight {
        trait_kind,
        weight,
        min,
        max,
    }
}

/// How one flavor category is scored
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category: FlavorCategory,
    pub primary_traits: Vec<TraitWeight>,
    pub secondary_traits: Vec<TraitWeight>,
    pub keywords: &'static [&'static str],
    pub processing_bonus: &'static [(ProcessingMethod, f64)],
    pub roast_bonus: &'static [(RoastLevel, f64)],
    pub minimum_threshold: f64,
}

/// Score of a single category, 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryScore {
    pub category: FlavorCategory,
    pub score: f64,
}

/// Outcome of classifying one coffee
#[derive(Debug, Clone)]
pub struct Classification {
    pub primary: FlavorCategory,
    pub secondary: Option<FlavorCategory>,
    /// Every category's score, in rule-table order
    pub scores: Vec<CategoryScore>,
}

impl Classification {
    /// Score of a given category in this classification
    pub fn score_of(&self, category: FlavorCategory) -> f64 {
        self.scores
            .iter()
            .find(|s| s.category == category)
            .map(|s| s.score)
            .unwrap_or(0.0)
    }

    /// Score of the selected primary category
    pub fn primary_score(&self) -> f64 {
        self.score_of(self.primary)
    }
}

/// Classifies coffees into flavor categories using the weighted rule table
pub struct FlavorClassifier {
    rules: Vec<CategoryRule>,
}

impl Default for FlavorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl FlavorClassifier {
    /// Build the classifier with the full 13-category rule table
    pub fn new() -> Self {
        Self {
            rules: build_rules(),
        }
    }

    /// The rule for a category
    pub fn rule(&self, category: FlavorCategory) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.category == category)
    }

    /// Determine primary and secondary categories for a coffee.
    ///
    /// The rule table is ordered and the sort is stable, so category ties
    /// resolve the same way on every call.
    pub fn classify(&self, coffee: &Coffee) -> Classification {
        let scores: Vec<CategoryScore> = self
            .rules
            .iter()
            .map(|rule| CategoryScore {
                category: rule.category,
                score: self.score_category(coffee, rule),
            })
            .collect();

        let mut ranked = scores.clone();
        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let top = ranked[0];
        let primary = if top.score >= self.threshold_of(top.category) {
            top.category
        } else {
            FlavorCategory::BASELINE
        };

        let secondary = ranked.get(1).and_then(|runner_up| {
            let qualifies = runner_up.score >= self.threshold_of(runner_up.category) * 0.8;
            (qualifies && runner_up.category != primary).then_some(runner_up.category)
        });

        Classification {
            primary,
            secondary,
            scores,
        }
    }

    /// Human-readable explanation of why a category fits a coffee
    pub fn describe(&self, category: FlavorCategory, coffee: &Coffee) -> String {
        let Some(rule) = self.rule(category) else {
            return format!("This coffee shows {} character", category);
        };

        let strong: Vec<&str> = rule
            .primary_traits
            .iter()
            .filter(|tw| coffee.tasting_traits.value_of(tw.trait_kind) >= tw.min)
            .map(|tw| tw.trait_kind.as_str())
            .collect();

        let mut description = format!("This coffee shows {} character", category);
        if !strong.is_empty() {
            description.push_str(" with strong ");
            description.push_str(&strong.join(", "));
        }
        description
    }

    fn threshold_of(&self, category: FlavorCategory) -> f64 {
        self.rule(category).map(|r| r.minimum_threshold).unwrap_or(1.0)
    }

    /// Score one coffee against one category rule, normalized to 0.0-1.0
    fn score_category(&self, coffee: &Coffee, rule: &CategoryRule) -> f64 {
        let mut raw = 0.0;
        let mut max_possible = 0.0;

        for weights in [&rule.primary_traits, &rule.secondary_traits] {
            for tw in weights.iter() {
                let value = coffee.tasting_traits.value_of(tw.trait_kind);
                max_possible += tw.weight * 10.0;

                if value >= tw.min {
                    let clamped = value.min(tw.max) as f64;
                    raw += (clamped / 10.0) * tw.weight * 10.0;
                }
            }
        }

        // Keyword matches are valuable; categories without keywords skip
        // this step so their ceiling is not inflated
        if !rule.keywords.is_empty() {
            raw += keyword_score(&coffee.tasting_notes, rule.keywords) * 20.0;
            max_possible += 20.0;
        }

        raw *= bonus_for(rule.processing_bonus, &coffee.processing_method);
        raw *= bonus_for(rule.roast_bonus, &coffee.roast_level);

        if max_possible > 0.0 {
            (raw / max_possible).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn bonus_for<K: PartialEq>(table: &[(K, f64)], key: &K) -> f64 {
    table
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(1.0)
}

/// Fraction of the five note slots matching a keyword list.
/// Each note counts at most once even if it matches several keywords.
fn keyword_score(notes: &[String], keywords: &[&str]) -> f64 {
    let matches = notes
        .iter()
        .filter(|note| !note.is_empty())
        .filter(|note| {
            let lowered = note.to_lowercase();
            keywords.iter().any(|keyword| lowered.contains(keyword))
        })
        .count();
    matches as f64 / 5.0
}

/// The static category rule table.
///
/// Order matters: the baseline category comes first and stable sorting
/// resolves score ties toward earlier entries.
fn build_rules() -> Vec<CategoryRule> {
    use FlavorCategory::*;
    use TastingTrait::*;

    vec![
        // Balanced: generic coffee taste, no strong characteristics
        CategoryRule {
            category: Balanced,
            primary_traits: vec![tw(Cleanliness, 2.0, 6, 9), tw(Body, 1.5, 4, 7)],
            secondary_traits: vec![tw(Sweetness, 1.0, 4, 6), tw(Bitterness, 1.0, 3, 6)],
            keywords: &[],
            processing_bonus: &[(ProcessingMethod::Washed, 1.3)],
            roast_bonus: &[(RoastLevel::Medium, 1.4), (RoastLevel::LightMedium, 1.2)],
            minimum_threshold: 0.4,
        },
        // Roasted: roasty, savory or peppery cups
        CategoryRule {
            category: Roasted,
            primary_traits: vec![
                tw(RoastIntensity, 2.5, 7, 10),
                tw(Savory, 2.0, 6, 10),
                tw(Spice, 2.2, 7, 10),
            ],
            secondary_traits: vec![tw(Bitterness, 1.2, 6, 9), tw(Body, 1.0, 7, 10)],
            keywords: &["pepper", "roast", "smoke", "char", "burnt", "toast", "caramel"],
            processing_bonus: &[],
            roast_bonus: &[(RoastLevel::Dark, 1.8), (RoastLevel::MediumDark, 1.5)],
            minimum_threshold: 0.6,
        },
        // Crisp: clean, light-bodied, almost mineral cups
        CategoryRule {
            category: Crisp,
            primary_traits: vec![tw(Cleanliness, 2.0, 8, 10), tw(Body, 1.5, 2, 5)],
            secondary_traits: vec![tw(Sweetness, 1.0, 3, 6)],
            keywords: &["water", "clean", "crisp", "mineral", "seaweed", "ocean"],
            processing_bonus: &[(ProcessingMethod::Washed, 1.5)],
            roast_bonus: &[],
            minimum_threshold: 0.5,
        },
        // Floral: florals, aromatics, tea-like cups
        CategoryRule {
            category: Floral,
            primary_traits: vec![tw(Florality, 2.5, 7, 10), tw(AromaticIntensity, 2.0, 6, 10)],
            secondary_traits: vec![tw(Cleanliness, 1.3, 6, 9), tw(Sweetness, 1.0, 5, 8)],
            keywords: &[
                "floral", "jasmine", "rose", "grass", "vegetal", "green", "herbal", "tea",
            ],
            processing_bonus: &[(ProcessingMethod::Washed, 1.3), (ProcessingMethod::Honey, 1.2)],
            roast_bonus: &[(RoastLevel::Light, 1.5), (RoastLevel::LightMedium, 1.3)],
            minimum_threshold: 0.55,
        },
        // Citrus: sharp acidity; light body scores against it
        CategoryRule {
            category: Citrus,
            primary_traits: vec![
                tw(CitrusFruitsIntensity, 2.5, 7, 10),
                tw(AromaticIntensity, 2.0, 7, 10),
            ],
            secondary_traits: vec![tw(Cleanliness, 1.5, 7, 10), tw(Body, -1.0, 2, 5)],
            keywords: &[
                "citrus", "lemon", "lime", "orange", "grapefruit", "bright", "zesty", "tangy",
                "acidic",
            ],
            processing_bonus: &[(ProcessingMethod::Washed, 1.4)],
            roast_bonus: &[(RoastLevel::Light, 1.6), (RoastLevel::LightMedium, 1.3)],
            minimum_threshold: 0.6,
        },
        // Cooling: menthol-clean cups
        CategoryRule {
            category: Cooling,
            primary_traits: vec![tw(Cleanliness, 2.5, 8, 10), tw(AromaticIntensity, 2.0, 7, 10)],
            secondary_traits: vec![tw(Florality, 1.5, 6, 9)],
            keywords: &["mint", "menthol", "eucalyptus", "cooling", "fresh", "crisp"],
            processing_bonus: &[(ProcessingMethod::Washed, 1.4)],
            roast_bonus: &[],
            minimum_threshold: 0.65,
        },
        // Funky: ferment-forward, wild cups
        CategoryRule {
            category: Funky,
            primary_traits: vec![tw(Spice, 2.5, 7, 10), tw(Savory, 2.0, 7, 10)],
            secondary_traits: vec![tw(AromaticIntensity, 1.5, 7, 10), tw(Bitterness, 1.0, 5, 8)],
            keywords: &["spice", "funky", "ferment", "wild", "unusual", "complex", "intense"],
            processing_bonus: &[
                (ProcessingMethod::Natural, 1.5),
                (ProcessingMethod::Experimental, 1.8),
                (ProcessingMethod::Coferment, 1.7),
            ],
            roast_bonus: &[],
            minimum_threshold: 0.6,
        },
        // Earthy: grain, soil, nut-driven cups
        CategoryRule {
            category: Earthy,
            primary_traits: vec![tw(Body, 2.5, 7, 10), tw(Savory, 2.0, 6, 10)],
            secondary_traits: vec![tw(RoastIntensity, 1.5, 5, 8), tw(Bitterness, 1.0, 4, 7)],
            keywords: &[
                "earth", "soil", "grain", "wheat", "cereal", "nutty", "almond", "hazelnut",
            ],
            processing_bonus: &[(ProcessingMethod::Natural, 1.3), (ProcessingMethod::Honey, 1.2)],
            roast_bonus: &[],
            minimum_threshold: 0.55,
        },
        // Stonefruit: peach and apricot sweetness
        CategoryRule {
            category: Stonefruit,
            primary_traits: vec![tw(StonefruitIntensity, 3.0, 7, 10), tw(Sweetness, 2.0, 6, 9)],
            secondary_traits: vec![tw(Body, 1.5, 6, 9), tw(AromaticIntensity, 1.0, 5, 8)],
            keywords: &["peach", "apricot", "plum", "cherry", "nectarine", "stonefruit"],
            processing_bonus: &[(ProcessingMethod::Natural, 1.4), (ProcessingMethod::Honey, 1.3)],
            roast_bonus: &[],
            minimum_threshold: 0.6,
        },
        // Cocoa: roasty-bitter chocolate cups, low sweetness
        CategoryRule {
            category: Cocoa,
            primary_traits: vec![tw(RoastIntensity, 2.5, 7, 10), tw(Bitterness, 2.0, 6, 9)],
            secondary_traits: vec![tw(Body, 1.5, 7, 10), tw(Sweetness, -1.0, 2, 5)],
            keywords: &["dark", "chocolate", "cocoa", "roast", "bold", "intense"],
            processing_bonus: &[],
            roast_bonus: &[(RoastLevel::Dark, 2.0), (RoastLevel::MediumDark, 1.6)],
            minimum_threshold: 0.6,
        },
        // Confection: sugary-sweet dessert cups
        CategoryRule {
            category: Confection,
            primary_traits: vec![tw(Sweetness, 3.0, 8, 10), tw(AromaticIntensity, 2.0, 7, 10)],
            secondary_traits: vec![tw(Florality, 1.5, 6, 9), tw(BerryIntensity, 1.5, 6, 9)],
            keywords: &[
                "sweet", "candy", "sugar", "honey", "vanilla", "caramel", "syrup", "dessert",
            ],
            processing_bonus: &[(ProcessingMethod::Natural, 1.4), (ProcessingMethod::Honey, 1.5)],
            roast_bonus: &[],
            minimum_threshold: 0.65,
        },
        // Enigmatic: hyper-specific aromatic cups; high threshold on purpose
        CategoryRule {
            category: Enigmatic,
            primary_traits: vec![tw(AromaticIntensity, 2.5, 8, 10), tw(Cleanliness, 2.0, 7, 10)],
            secondary_traits: vec![tw(Florality, 1.5, 6, 9), tw(BerryIntensity, 1.0, 6, 9)],
            keywords: &[],
            processing_bonus: &[
                (ProcessingMethod::Experimental, 1.8),
                (ProcessingMethod::Coferment, 1.6),
            ],
            roast_bonus: &[],
            minimum_threshold: 0.7,
        },
        // Spiced: baking-spice cups, gentler than Funky
        CategoryRule {
            category: Spiced,
            primary_traits: vec![tw(Spice, 2.0, 5, 9), tw(AromaticIntensity, 1.5, 5, 9)],
            secondary_traits: vec![tw(Body, 1.0, 4, 7)],
            keywords: &["spice", "cinnamon", "cardamom", "clove", "chai", "gingerbread"],
            processing_bonus: &[
                (ProcessingMethod::Natural, 1.2),
                (ProcessingMethod::Experimental, 1.3),
            ],
            roast_bonus: &[],
            minimum_threshold: 0.45,
        },
    ]
}
