//! Shared types and models for Brewdex
//!
//! This crate contains the domain types shared between the backend service
//! and any future consumers of the coffee log and companion dex.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::*;
