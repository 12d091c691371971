//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use recipe_catalog_core::catalog::RecipeCatalog;
use recipe_catalog_core::ports::{AuthSessionStore, RecipeGenerationService};
use std::sync::Arc;
use tokio::sync::Mutex;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The one recipe collection. Every catalog operation, store write
    /// included, runs under this lock.
    pub catalog: Arc<Mutex<RecipeCatalog>>,
    pub sessions: Arc<dyn AuthSessionStore>,
    /// `None` when no AI credentials are configured.
    pub generator: Option<Arc<dyn RecipeGenerationService>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        catalog: RecipeCatalog,
        sessions: Arc<dyn AuthSessionStore>,
        generator: Option<Arc<dyn RecipeGenerationService>>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            sessions,
            generator,
            config,
        }
    }
}
