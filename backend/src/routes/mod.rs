//! Route definitions for the Brewdex backend

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Coffee tasting records
        .route(
            "/coffees",
            get(handlers::list_coffees).post(handlers::create_coffee),
        )
        .route(
            "/coffees/:coffee_id",
            get(handlers::get_coffee)
                .put(handlers::update_coffee)
                .delete(handlers::delete_coffee),
        )
        // Companion mapping
        .route(
            "/coffees/:coffee_id/companion",
            post(handlers::generate_companion).get(handlers::get_coffee_companion),
        )
        .route(
            "/coffees/:coffee_id/companion/nickname",
            put(handlers::update_companion_nickname),
        )
        // The dex of all mappings
        .route("/dex", get(handlers::get_dex))
}
