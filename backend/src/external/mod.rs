//! External service integrations

pub mod refiner;

pub use refiner::{OllamaRefiner, Refiner, RefinerError, RefinerOutcome};
