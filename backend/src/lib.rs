//! Brewdex backend
//!
//! A coffee tasting log where every logged brew is assigned a unique
//! collectible companion: traits are scored against a static category rule
//! table, a bounded candidate shortlist goes to an optional generative
//! refiner (with a deterministic rule-based fallback), and an atomic
//! reservation guarantees no two coffees ever share a companion.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod external;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod storage;

pub use config::Config;

use external::Refiner;
use services::FlavorClassifier;
use storage::{CoffeeStore, CompanionStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub coffee_store: Arc<dyn CoffeeStore>,
    pub companion_store: Arc<dyn CompanionStore>,
    pub classifier: Arc<FlavorClassifier>,
    pub refiner: Option<Arc<dyn Refiner>>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Brewdex API v1.0"
}
