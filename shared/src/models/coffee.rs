//! Coffee tasting record models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of free-text tasting notes per coffee
pub const MAX_TASTING_NOTES: usize = 5;

/// Roast level of a coffee
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoastLevel {
    Light,
    Medium,
    Dark,
    LightMedium,
    MediumDark,
    #[default]
    Unclear,
}

impl RoastLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoastLevel::Light => "light",
            RoastLevel::Medium => "medium",
            RoastLevel::Dark => "dark",
            RoastLevel::LightMedium => "light_medium",
            RoastLevel::MediumDark => "medium_dark",
            RoastLevel::Unclear => "unclear",
        }
    }
}

impl std::str::FromStr for RoastLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(RoastLevel::Light),
            "medium" => Ok(RoastLevel::Medium),
            "dark" => Ok(RoastLevel::Dark),
            "light_medium" => Ok(RoastLevel::LightMedium),
            "medium_dark" => Ok(RoastLevel::MediumDark),
            "unclear" => Ok(RoastLevel::Unclear),
            other => Err(format!("invalid roast level: {}", other)),
        }
    }
}

impl std::fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Processing method applied to the green coffee
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMethod {
    #[default]
    Washed,
    Natural,
    Honey,
    Coferment,
    Experimental,
}

impl ProcessingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMethod::Washed => "washed",
            ProcessingMethod::Natural => "natural",
            ProcessingMethod::Honey => "honey",
            ProcessingMethod::Coferment => "coferment",
            ProcessingMethod::Experimental => "experimental",
        }
    }
}

impl std::str::FromStr for ProcessingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "washed" => Ok(ProcessingMethod::Washed),
            "natural" => Ok(ProcessingMethod::Natural),
            "honey" => Ok(ProcessingMethod::Honey),
            "coferment" => Ok(ProcessingMethod::Coferment),
            "experimental" => Ok(ProcessingMethod::Experimental),
            other => Err(format!("invalid processing method: {}", other)),
        }
    }
}

impl std::fmt::Display for ProcessingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One of the twelve named tasting traits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TastingTrait {
    BerryIntensity,
    StonefruitIntensity,
    RoastIntensity,
    CitrusFruitsIntensity,
    Bitterness,
    Florality,
    Spice,
    Sweetness,
    AromaticIntensity,
    Savory,
    Body,
    Cleanliness,
}

impl TastingTrait {
    pub fn as_str(&self) -> &'static str {
        match self {
            TastingTrait::BerryIntensity => "berry_intensity",
            TastingTrait::StonefruitIntensity => "stonefruit_intensity",
            TastingTrait::RoastIntensity => "roast_intensity",
            TastingTrait::CitrusFruitsIntensity => "citrus_fruits_intensity",
            TastingTrait::Bitterness => "bitterness",
            TastingTrait::Florality => "florality",
            TastingTrait::Spice => "spice",
            TastingTrait::Sweetness => "sweetness",
            TastingTrait::AromaticIntensity => "aromatic_intensity",
            TastingTrait::Savory => "savory",
            TastingTrait::Body => "body",
            TastingTrait::Cleanliness => "cleanliness",
        }
    }
}

/// Intensity scores for the twelve tasting traits, each 0-10
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TastingTraits {
    pub berry_intensity: i32,
    pub stonefruit_intensity: i32,
    pub roast_intensity: i32,
    pub citrus_fruits_intensity: i32,
    pub bitterness: i32,
    pub florality: i32,
    pub spice: i32,
    pub sweetness: i32,
    pub aromatic_intensity: i32,
    pub savory: i32,
    pub body: i32,
    pub cleanliness: i32,
}

impl TastingTraits {
    /// Value of a single named trait
    pub fn value_of(&self, trait_kind: TastingTrait) -> i32 {
        match trait_kind {
            TastingTrait::BerryIntensity => self.berry_intensity,
            TastingTrait::StonefruitIntensity => self.stonefruit_intensity,
            TastingTrait::RoastIntensity => self.roast_intensity,
            TastingTrait::CitrusFruitsIntensity => self.citrus_fruits_intensity,
            TastingTrait::Bitterness => self.bitterness,
            TastingTrait::Florality => self.florality,
            TastingTrait::Spice => self.spice,
            TastingTrait::Sweetness => self.sweetness,
            TastingTrait::AromaticIntensity => self.aromatic_intensity,
            TastingTrait::Savory => self.savory,
            TastingTrait::Body => self.body,
            TastingTrait::Cleanliness => self.cleanliness,
        }
    }

    /// All traits with their wire names, for validation and display
    pub fn named_values(&self) -> [(&'static str, i32); 12] {
        [
            ("berry_intensity", self.berry_intensity),
            ("stonefruit_intensity", self.stonefruit_intensity),
            ("roast_intensity", self.roast_intensity),
            ("citrus_fruits_intensity", self.citrus_fruits_intensity),
            ("bitterness", self.bitterness),
            ("florality", self.florality),
            ("spice", self.spice),
            ("sweetness", self.sweetness),
            ("aromatic_intensity", self.aromatic_intensity),
            ("savory", self.savory),
            ("body", self.body),
            ("cleanliness", self.cleanliness),
        ]
    }
}

/// Drip draw-down time recorded for a brew
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DrawDownTime {
    pub minutes: i32,
    pub seconds: i32,
}

/// A logged coffee tasting entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coffee {
    pub id: Uuid,
    pub name: String,
    pub origin: String,
    pub roaster: String,
    pub variety: String,
    pub roast_level: RoastLevel,
    pub processing_method: ProcessingMethod,
    pub tasting_notes: Vec<String>,
    pub tasting_traits: TastingTraits,
    /// Overall quality rating, 0-10
    pub rating: i32,
    pub recipe: Vec<String>,
    pub dripper: String,
    pub end_time: DrawDownTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
