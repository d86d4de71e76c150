//! Brewdex backend server
//!
//! A coffee tasting log that pairs every logged brew with a unique
//! collectible companion.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brewdex_backend::{
    config::{Config, StorageBackend},
    create_app,
    external::{OllamaRefiner, Refiner},
    services::FlavorClassifier,
    storage::{
        memory::{MemoryCoffeeStore, MemoryCompanionStore},
        postgres::{PgCoffeeStore, PgCompanionStore},
        roster, CoffeeStore, CompanionStore,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brewdex_backend=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Brewdex Server");
    tracing::info!("Environment: {}", config.environment);

    // Set up the storage backend
    let (coffee_store, companion_store): (Arc<dyn CoffeeStore>, Arc<dyn CompanionStore>) =
        match config.storage.backend {
            StorageBackend::Postgres => {
                tracing::info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(config.database.max_connections)
                    .min_connections(config.database.min_connections)
                    .acquire_timeout(Duration::from_secs(30))
                    .connect(&config.database.url)
                    .await?;

                tracing::info!("Database connection established");

                // Run migrations in development
                if config.environment == "development" {
                    tracing::info!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&db_pool).await?;
                    tracing::info!("Migrations completed");
                }

                let companion_store = PgCompanionStore::new(db_pool.clone());
                companion_store.seed(&roster::default_roster()).await?;
                tracing::info!("Companion roster seeded");

                (
                    Arc::new(PgCoffeeStore::new(db_pool)) as Arc<dyn CoffeeStore>,
                    Arc::new(companion_store) as Arc<dyn CompanionStore>,
                )
            }
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                (
                    Arc::new(MemoryCoffeeStore::new()) as Arc<dyn CoffeeStore>,
                    Arc::new(MemoryCompanionStore::new(roster::default_roster()))
                        as Arc<dyn CompanionStore>,
                )
            }
        };

    // Set up the generative refiner; mapping works without it
    let refiner: Option<Arc<dyn Refiner>> = if config.refiner.enabled {
        let refiner = OllamaRefiner::new(
            config.refiner.base_url.clone(),
            config.refiner.model.clone(),
            Duration::from_secs(config.refiner.timeout_secs),
        );
        match refiner.probe().await {
            Ok(()) => tracing::info!("Refiner reachable at {}", config.refiner.base_url),
            Err(err) => tracing::warn!(
                "Refiner unreachable ({}); mappings will use rule-based selection",
                err
            ),
        }
        Some(Arc::new(refiner) as Arc<dyn Refiner>)
    } else {
        tracing::info!("Refiner disabled; mappings will use rule-based selection");
        None
    };

    // Create application state
    let state = AppState {
        coffee_store,
        companion_store,
        classifier: Arc::new(FlavorClassifier::new()),
        refiner,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
