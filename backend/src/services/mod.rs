//! Business logic services for the Brewdex backend

pub mod classifier;
pub mod coffee;
pub mod companion;

pub use classifier::FlavorClassifier;
pub use coffee::CoffeeService;
pub use companion::CompanionService;
