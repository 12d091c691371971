//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, MemoryStore, OpenAiRecipeAdapter},
    config::Config,
    error::ApiError,
    web::{build_router, AppState},
};
use async_openai::{config::OpenAIConfig, Client};
use recipe_catalog_core::{
    catalog::RecipeCatalog,
    ports::{AuthSessionStore, RecipeGenerationService, RecipeStore},
};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Choose the Storage Backend ---
    let (recipe_store, session_store): (Arc<dyn RecipeStore>, Arc<dyn AuthSessionStore>) =
        match &config.database_url {
            Some(database_url) => {
                info!("Connecting to database...");
                let db_pool = PgPoolOptions::new()
                    .max_connections(5)
                    .connect(database_url)
                    .await?;
                let db_adapter = Arc::new(DbAdapter::new(db_pool));
                info!("Running database migrations...");
                db_adapter.run_migrations().await?;
                info!("Database migrations complete.");
                let recipes: Arc<dyn RecipeStore> = db_adapter.clone();
                let sessions: Arc<dyn AuthSessionStore> = db_adapter;
                (recipes, sessions)
            }
            None => {
                warn!("DATABASE_URL is not set; recipes are kept in memory only.");
                let memory = Arc::new(MemoryStore::new());
                let recipes: Arc<dyn RecipeStore> = memory.clone();
                let sessions: Arc<dyn AuthSessionStore> = memory;
                (recipes, sessions)
            }
        };

    // --- 3. Load the Catalog ---
    let catalog = RecipeCatalog::load(recipe_store).await?;
    info!("Catalog loaded with {} recipes.", catalog.len());

    // --- 4. Initialize the AI Adapter ---
    let generator: Option<Arc<dyn RecipeGenerationService>> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_client = Client::with_config(OpenAIConfig::new().with_api_key(api_key));
            let adapter: Arc<dyn RecipeGenerationService> = Arc::new(OpenAiRecipeAdapter::new(
                openai_client,
                config.recipe_model.clone(),
                config.vision_model.clone(),
            ));
            Some(adapter)
        }
        None => {
            warn!("OPENAI_API_KEY is not set; generation and import are disabled.");
            None
        }
    };

    // --- 5. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(
        catalog,
        session_store,
        generator,
        config.clone(),
    ));
    let app = build_router(app_state);

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
