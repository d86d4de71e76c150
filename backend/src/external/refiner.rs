//! Generative refiner client
//!
//! Talks to an Ollama-compatible endpoint to pick the best companion from a
//! bounded shortlist. Every failure mode, transport, timeout, bad status,
//! malformed payload, or a selection outside the shortlist, surfaces as a
//! [`RefinerError`] and the caller falls back to rule-based selection; the
//! refiner can never fail a mapping request.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::{Coffee, Companion, TraitMapping};
use thiserror::Error;

/// Refiner failure; uniformly recoverable via the fallback selector
#[derive(Error, Debug)]
pub enum RefinerError {
    #[error("refiner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("refiner returned status {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    #[error("refiner payload invalid: {0}")]
    MalformedPayload(String),

    #[error("refiner selected a companion outside the shortlist: {0}")]
    UnknownSelection(String),
}

/// A validated selection from the refiner
#[derive(Debug, Clone)]
pub struct RefinerOutcome {
    pub companion: Companion,
    pub confidence: f64,
    pub description: String,
    pub trait_mapping: Vec<TraitMapping>,
}

/// Companion selection via an external generative service
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn select(
        &self,
        coffee: &Coffee,
        candidates: &[Companion],
    ) -> Result<RefinerOutcome, RefinerError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
    format: &'a str,
}

/// Ollama wraps the model output as a string-encoded body
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// The strict payload the model is asked to produce
#[derive(Debug, Deserialize)]
struct RefinerPayload {
    selected_companion: String,
    confidence: f64,
    description: String,
    trait_mapping: Vec<TraitMapping>,
}

/// Client for an Ollama-compatible generate endpoint
#[derive(Clone)]
pub struct OllamaRefiner {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaRefiner {
    /// Create a new refiner client with a bounded request timeout
    pub fn new(base_url: String, model: String, timeout: Duration) -> Self {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            base_url,
            model,
        }
    }

    /// Check that the endpoint is reachable; used at startup for logging only
    pub async fn probe(&self) -> Result<(), RefinerError> {
        let response = self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RefinerError::UpstreamStatus {
                status: response.status(),
                body: String::new(),
            });
        }
        Ok(())
    }

    fn build_prompt(&self, coffee: &Coffee, candidates: &[Companion]) -> String {
        let candidate_names: Vec<&str> = candidates.iter().map(|c| c.name.as_str()).collect();

        format!(
            r#"You are a flavor archivist pairing coffees with companion creatures.
Given a coffee's characteristics, select the best companion match from the roster and write a field-guide style description.

Coffee: {} from {}
Tasting Notes: {}
Dominant Traits: {}

Available Companions: {}

Respond with ONLY valid JSON:
{{
  "selected_companion": "exact_companion_name",
  "confidence": 0.95,
  "description": "Field-guide description connecting coffee traits to the companion's character",
  "trait_mapping": [
    {{"trait": "sweetness", "companion_stat": "energy", "reasoning": "sweet coffee provides sustained energy"}},
    {{"trait": "bitterness", "companion_stat": "boldness", "reasoning": "bitterness reads as bold, assertive flavor"}}
  ]
}}"#,
            coffee.name,
            coffee.origin,
            coffee.tasting_notes.join(", "),
            format_dominant_traits(coffee),
            candidate_names.join(", "),
        )
    }
}

#[async_trait]
impl Refiner for OllamaRefiner {
    async fn select(
        &self,
        coffee: &Coffee,
        candidates: &[Companion],
    ) -> Result<RefinerOutcome, RefinerError> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt: self.build_prompt(coffee, candidates),
            stream: false,
            format: "json",
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RefinerError::UpstreamStatus { status, body });
        }

        let wrapper: GenerateResponse = response.json().await?;
        let parsed = parse_payload(&wrapper.response)?;

        let companion = match_candidate(&parsed.selected_companion, candidates)
            .ok_or(RefinerError::UnknownSelection(parsed.selected_companion))?;

        Ok(RefinerOutcome {
            companion: companion.clone(),
            confidence: parsed.confidence,
            description: parsed.description,
            trait_mapping: parsed.trait_mapping,
        })
    }
}

/// Parse the string-encoded model output into the strict payload shape
fn parse_payload(raw: &str) -> Result<RefinerPayload, RefinerError> {
    // Models occasionally wrap the JSON in markdown fences despite the
    // format hint
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let payload: RefinerPayload = serde_json::from_str(cleaned)
        .map_err(|e| RefinerError::MalformedPayload(e.to_string()))?;

    if !(0.0..=1.0).contains(&payload.confidence) {
        return Err(RefinerError::MalformedPayload(format!(
            "confidence {} outside 0.0-1.0",
            payload.confidence
        )));
    }

    Ok(payload)
}

/// Case-insensitive exact match of the selected name against the shortlist
fn match_candidate<'a>(selected: &str, candidates: &'a [Companion]) -> Option<&'a Companion> {
    candidates
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(selected))
}

/// Trait summary embedded in the prompt, mirroring what tasters highlight
fn format_dominant_traits(coffee: &Coffee) -> String {
    let traits = &coffee.tasting_traits;
    let mut dominant = Vec::new();

    if traits.sweetness >= 7 {
        dominant.push(format!("high sweetness ({})", traits.sweetness));
    }
    if traits.bitterness >= 7 {
        dominant.push(format!("high bitterness ({})", traits.bitterness));
    }
    if traits.citrus_fruits_intensity >= 7 {
        dominant.push(format!("high citrus ({})", traits.citrus_fruits_intensity));
    }
    if traits.florality >= 7 {
        dominant.push(format!("high florality ({})", traits.florality));
    }
    if traits.body >= 7 {
        dominant.push(format!("full body ({})", traits.body));
    }
    if traits.aromatic_intensity >= 7 {
        dominant.push(format!("high aroma ({})", traits.aromatic_intensity));
    }

    if dominant.is_empty() {
        return "balanced traits".to_string();
    }
    dominant.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CompanionStats, FlavorCategory, TastingTraits};

    fn candidates() -> Vec<Companion> {
        vec![
            Companion {
                id: 10,
                name: "Jasmira".to_string(),
                category: FlavorCategory::Floral,
                sprite_path: "/sprites/010.png".to_string(),
                base_stats: CompanionStats::default(),
                description: String::new(),
            },
            Companion {
                id: 13,
                name: "Zestrix".to_string(),
                category: FlavorCategory::Citrus,
                sprite_path: "/sprites/013.png".to_string(),
                base_stats: CompanionStats::default(),
                description: String::new(),
            },
        ]
    }

    #[test]
    fn test_parse_payload_valid() {
        let raw = r#"{
            "selected_companion": "Jasmira",
            "confidence": 0.92,
            "description": "A floral match.",
            "trait_mapping": [
                {"trait": "florality", "companion_stat": "finesse", "reasoning": "floral lift"}
            ]
        }"#;

        let payload = parse_payload(raw).unwrap();
        assert_eq!(payload.selected_companion, "Jasmira");
        assert_eq!(payload.confidence, 0.92);
        assert_eq!(payload.trait_mapping.len(), 1);
        assert_eq!(payload.trait_mapping[0].trait_name, "florality");
    }

    #[test]
    fn test_parse_payload_strips_markdown_fences() {
        let raw = "```json\n{\"selected_companion\": \"Zestrix\", \"confidence\": 0.8, \"description\": \"zesty\", \"trait_mapping\": []}\n```";
        let payload = parse_payload(raw).unwrap();
        assert_eq!(payload.selected_companion, "Zestrix");
    }

    #[test]
    fn test_parse_payload_rejects_non_json() {
        let result = parse_payload("I think Jasmira would be a great fit!");
        assert!(matches!(result, Err(RefinerError::MalformedPayload(_))));
    }

    #[test]
    fn test_parse_payload_rejects_missing_fields() {
        let result = parse_payload(r#"{"selected_companion": "Jasmira"}"#);
        assert!(matches!(result, Err(RefinerError::MalformedPayload(_))));
    }

    #[test]
    fn test_parse_payload_rejects_out_of_range_confidence() {
        let raw = r#"{"selected_companion": "Jasmira", "confidence": 1.4, "description": "x", "trait_mapping": []}"#;
        assert!(matches!(
            parse_payload(raw),
            Err(RefinerError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_match_candidate_is_case_insensitive() {
        let list = candidates();
        assert_eq!(match_candidate("jasmira", &list).unwrap().id, 10);
        assert_eq!(match_candidate("ZESTRIX", &list).unwrap().id, 13);
        assert!(match_candidate("Mystiq", &list).is_none());
    }

    #[test]
    fn test_format_dominant_traits_balanced_fallback() {
        let coffee = Coffee {
            id: uuid::Uuid::new_v4(),
            name: "House".to_string(),
            origin: "Brazil".to_string(),
            roaster: "Local".to_string(),
            variety: "Catuai".to_string(),
            roast_level: Default::default(),
            processing_method: Default::default(),
            tasting_notes: vec![],
            tasting_traits: TastingTraits::default(),
            rating: 6,
            recipe: vec![],
            dripper: String::new(),
            end_time: Default::default(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(format_dominant_traits(&coffee), "balanced traits");

        let mut sweet = coffee;
        sweet.tasting_traits.sweetness = 9;
        sweet.tasting_traits.body = 7;
        let formatted = format_dominant_traits(&sweet);
        assert!(formatted.contains("high sweetness (9)"));
        assert!(formatted.contains("full body (7)"));
    }
}
