//! Companion roster and coffee-companion mapping models
//!
//! Companions are a fixed roster of collectible creatures; each logged
//! coffee is assigned exactly one, and no companion is ever assigned twice.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flavor category a coffee is classified into
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FlavorCategory {
    /// Baseline category for coffees without a dominant character
    Balanced,
    Roasted,
    Crisp,
    Floral,
    Citrus,
    Cooling,
    Funky,
    Earthy,
    Stonefruit,
    Cocoa,
    Confection,
    Enigmatic,
    Spiced,
}

impl FlavorCategory {
    /// The fallback category when no score clears its threshold
    pub const BASELINE: FlavorCategory = FlavorCategory::Balanced;

    pub fn as_str(&self) -> &'static str {
        match self {
            FlavorCategory::Balanced => "balanced",
            FlavorCategory::Roasted => "roasted",
            FlavorCategory::Crisp => "crisp",
            FlavorCategory::Floral => "floral",
            FlavorCategory::Citrus => "citrus",
            FlavorCategory::Cooling => "cooling",
            FlavorCategory::Funky => "funky",
            FlavorCategory::Earthy => "earthy",
            FlavorCategory::Stonefruit => "stonefruit",
            FlavorCategory::Cocoa => "cocoa",
            FlavorCategory::Confection => "confection",
            FlavorCategory::Enigmatic => "enigmatic",
            FlavorCategory::Spiced => "spiced",
        }
    }
}

impl std::str::FromStr for FlavorCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(FlavorCategory::Balanced),
            "roasted" => Ok(FlavorCategory::Roasted),
            "crisp" => Ok(FlavorCategory::Crisp),
            "floral" => Ok(FlavorCategory::Floral),
            "citrus" => Ok(FlavorCategory::Citrus),
            "cooling" => Ok(FlavorCategory::Cooling),
            "funky" => Ok(FlavorCategory::Funky),
            "earthy" => Ok(FlavorCategory::Earthy),
            "stonefruit" => Ok(FlavorCategory::Stonefruit),
            "cocoa" => Ok(FlavorCategory::Cocoa),
            "confection" => Ok(FlavorCategory::Confection),
            "enigmatic" => Ok(FlavorCategory::Enigmatic),
            "spiced" => Ok(FlavorCategory::Spiced),
            other => Err(format!("invalid flavor category: {}", other)),
        }
    }
}

impl std::fmt::Display for FlavorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base statistics of a companion creature
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CompanionStats {
    pub energy: i32,
    pub boldness: i32,
    pub depth: i32,
    pub brightness: i32,
    pub finesse: i32,
}

/// A collectible companion creature from the fixed roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: i32,
    pub name: String,
    pub category: FlavorCategory,
    pub sprite_path: String,
    pub base_stats: CompanionStats,
    pub description: String,
}

/// How one coffee trait maps onto a companion stat
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraitMapping {
    #[serde(rename = "trait")]
    pub trait_name: String,
    pub companion_stat: String,
    pub reasoning: String,
}

/// The persisted, unique association between a coffee and its companion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoffeeCompanion {
    pub id: Uuid,
    pub coffee_id: Uuid,
    pub companion_id: i32,
    pub companion_name: String,
    pub nickname: String,
    pub level: i32,
    /// Selection confidence, 0.0-1.0
    pub confidence: f64,
    pub description: String,
    pub trait_mapping: Vec<TraitMapping>,
    pub created_at: DateTime<Utc>,
}
