//! Domain models for Brewdex

mod coffee;
mod companion;

pub use coffee::*;
pub use companion::*;
