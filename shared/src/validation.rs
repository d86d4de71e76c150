//! Validation utilities for Brewdex
//!
//! Range and shape checks for tasting records, applied before any record
//! reaches the classifier.

use crate::models::{DrawDownTime, TastingTraits, MAX_TASTING_NOTES};

/// Validate that every tasting trait is within 0-10
pub fn validate_tasting_traits(traits: &TastingTraits) -> Result<(), String> {
    for (name, value) in traits.named_values() {
        if !(0..=10).contains(&value) {
            return Err(format!("{} must be between 0 and 10, got {}", name, value));
        }
    }
    Ok(())
}

/// Validate the overall quality rating is within 0-10
pub fn validate_rating(rating: i32) -> Result<(), String> {
    if !(0..=10).contains(&rating) {
        return Err(format!("rating must be between 0 and 10, got {}", rating));
    }
    Ok(())
}

/// Validate the tasting note list length
pub fn validate_tasting_notes(notes: &[String]) -> Result<(), String> {
    if notes.len() > MAX_TASTING_NOTES {
        return Err(format!(
            "at most {} tasting notes are allowed, got {}",
            MAX_TASTING_NOTES,
            notes.len()
        ));
    }
    Ok(())
}

/// Validate a recorded draw-down time
pub fn validate_draw_down(end_time: &DrawDownTime) -> Result<(), String> {
    if end_time.minutes < 0 || end_time.seconds < 0 || end_time.seconds >= 60 {
        return Err("invalid draw down time".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_traits_are_valid() {
        assert!(validate_tasting_traits(&TastingTraits::default()).is_ok());
    }

    #[test]
    fn test_trait_out_of_range_rejected() {
        let traits = TastingTraits {
            sweetness: 11,
            ..Default::default()
        };
        let err = validate_tasting_traits(&traits).unwrap_err();
        assert!(err.contains("sweetness"));

        let traits = TastingTraits {
            bitterness: -1,
            ..Default::default()
        };
        assert!(validate_tasting_traits(&traits).is_err());
    }

    #[test]
    fn test_rating_bounds() {
        assert!(validate_rating(0).is_ok());
        assert!(validate_rating(10).is_ok());
        assert!(validate_rating(11).is_err());
        assert!(validate_rating(-1).is_err());
    }

    #[test]
    fn test_tasting_notes_capped_at_five() {
        let five: Vec<String> = (0..5).map(|i| format!("note {}", i)).collect();
        assert!(validate_tasting_notes(&five).is_ok());

        let six: Vec<String> = (0..6).map(|i| format!("note {}", i)).collect();
        assert!(validate_tasting_notes(&six).is_err());
    }

    #[test]
    fn test_draw_down_time() {
        assert!(validate_draw_down(&DrawDownTime {
            minutes: 2,
            seconds: 45
        })
        .is_ok());
        assert!(validate_draw_down(&DrawDownTime {
            minutes: 2,
            seconds: 60
        })
        .is_err());
        assert!(validate_draw_down(&DrawDownTime {
            minutes: -1,
            seconds: 0
        })
        .is_err());
    }
}
