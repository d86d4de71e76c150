//! HTTP handlers for the Brewdex backend

pub mod coffee;
pub mod companion;
pub mod health;

pub use coffee::*;
pub use companion::*;
pub use health::*;
