//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API server.
//!
//! Recipes travel in their domain shape (`recipe_catalog_core::domain::Recipe`),
//! so they are described as plain objects in the OpenAPI document.

use chrono::{DateTime, Utc};
use recipe_catalog_core::domain::Recipe;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Query Strings
//=========================================================================================

/// Filters and paging for the public catalog grid.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// A category label, or "Todas". Omitted means every category.
    pub category: Option<String>,
    /// Case-insensitive search over title and description.
    pub q: Option<String>,
    /// Zero-based page number.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DetailQuery {
    /// Number of servings to scale the ingredients to (1 to 20).
    pub servings: Option<u32>,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminPageQuery {
    pub page: Option<usize>,
    /// One of 10, 20 or 50.
    pub page_size: Option<usize>,
}

//=========================================================================================
// Public Responses
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// One page of the catalog plus the imports still running.
#[derive(Serialize, ToSchema)]
pub struct CatalogPageResponse {
    #[schema(value_type = Vec<Object>)]
    pub recipes: Vec<Recipe>,
    /// Set only on the first page of the unfiltered view.
    pub featured_id: Option<String>,
    #[schema(value_type = Vec<Object>)]
    pub importing: Vec<Recipe>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    #[schema(value_type = Object)]
    pub recipe: Recipe,
    pub servings: u32,
    /// Ingredient lines scaled to `servings`.
    pub ingredients: Vec<String>,
    /// schema.org `Recipe` JSON-LD.
    #[schema(value_type = Object)]
    pub structured_data: serde_json::Value,
}

//=========================================================================================
// Back-office Payloads
//=========================================================================================

/// Moves one row of a displayed back-office page onto another row.
#[derive(Deserialize, ToSchema)]
pub struct ReorderRequest {
    pub page: usize,
    pub page_size: usize,
    pub from_row: usize,
    pub to_row: usize,
    /// The filters of the displayed view, if any.
    pub category: Option<String>,
    pub q: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ReorderResponse {
    pub moved: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateRequest {
    pub ingredients: String,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateResponse {
    #[schema(value_type = Vec<Object>)]
    pub recipes: Vec<Recipe>,
}

#[derive(Serialize, ToSchema)]
pub struct ImportAccepted {
    pub placeholder_id: String,
}

//=========================================================================================
// Authentication
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub username: String,
    pub expires_at: DateTime<Utc>,
}
