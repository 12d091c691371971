//! crates/recipe_catalog_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the catalog's core logic.
//! These traits form the boundary of the hexagonal architecture, keeping the
//! core independent of the storage backend and of the AI provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AuthSession, Recipe};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Key-value persistence of the recipe collection, keyed by recipe id.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Atomically clears the store and writes `recipes`.
    ///
    /// Each record's position in `recipes` is persisted as its rank, so an
    /// empty slice leaves the store empty.
    async fn replace_all(&self, recipes: &[Recipe]) -> PortResult<()>;

    /// Returns every stored record in rank order.
    async fn load_all(&self) -> PortResult<Vec<Recipe>>;
}

/// Back-office login sessions.
#[async_trait]
pub trait AuthSessionStore: Send + Sync {
    async fn create_auth_session(
        &self,
        session_id: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the session when it exists and has not expired.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<AuthSession>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    /// Drops every expired session and returns how many went.
    async fn delete_expired_auth_sessions(&self) -> PortResult<u64>;
}

/// The generative-AI service that drafts and extracts recipes.
#[async_trait]
pub trait RecipeGenerationService: Send + Sync {
    /// Creates recipe drafts that use the given free-text ingredients.
    async fn generate_from_ingredients(&self, ingredients: &str) -> PortResult<Vec<Recipe>>;

    /// Extracts the main recipe from an image or document payload.
    async fn extract_from_document(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
    ) -> PortResult<Option<Recipe>>;
}
