//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the public catalog endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::{admin, auth, protocol::*, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use recipe_catalog_core::{
    collection::{PageRequest, RecipeQuery},
    domain::CategoryFilter,
    scaler::QuantityScaler,
    structured_data::recipe_json_ld,
};
use std::sync::Arc;
use tracing::info;
use utoipa::OpenApi;

pub const DEFAULT_PAGE_SIZE: usize = 6;
pub const MAX_PAGE_SIZE: usize = 50;
pub const MAX_SERVINGS: u32 = 20;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        categories_handler,
        list_recipes_handler,
        recipe_detail_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::session_handler,
        admin::list_admin_recipes_handler,
        admin::new_recipe_handler,
        admin::save_recipe_handler,
        admin::delete_recipe_handler,
        admin::duplicate_recipe_handler,
        admin::reorder_recipes_handler,
        admin::generate_recipes_handler,
        admin::import_recipe_handler,
    ),
    components(
        schemas(
            HealthResponse,
            CategoriesResponse,
            CatalogPageResponse,
            RecipeDetailResponse,
            ReorderRequest,
            ReorderResponse,
            GenerateRequest,
            GenerateResponse,
            ImportAccepted,
            LoginRequest,
            AuthResponse,
        )
    ),
    tags(
        (name = "Recipe Catalog API", description = "Public recipe catalog and back-office endpoints.")
    )
)]
pub struct ApiDoc;

/// Builds the catalog filter from raw query-string values.
pub fn recipe_query(
    category: Option<&str>,
    search: Option<&str>,
) -> Result<RecipeQuery, (StatusCode, String)> {
    let filter = CategoryFilter::from_label(category.unwrap_or_default()).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            format!("Unknown category '{}'", category.unwrap_or_default()),
        )
    })?;
    Ok(RecipeQuery::new(filter, search.unwrap_or_default().trim()))
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// The category tabs, "Todas" first.
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Category labels", body = CategoriesResponse))
)]
pub async fn categories_handler() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: CategoryFilter::labels()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// One page of the public catalog.
///
/// The first recipe of the first unfiltered page is the featured one.
#[utoipa::path(
    get,
    path = "/recipes",
    params(CatalogQuery),
    responses(
        (status = 200, description = "A page of recipes", body = CatalogPageResponse),
        (status = 400, description = "Unknown category")
    )
)]
pub async fn list_recipes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = recipe_query(params.category.as_deref(), params.q.as_deref())?;
    let request = PageRequest::new(
        params.page.unwrap_or(0),
        params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE),
    );

    let catalog = app_state.catalog.lock().await;
    let page = catalog.page(&query, request);
    let importing = catalog
        .collection()
        .loading_placeholders()
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(CatalogPageResponse {
        recipes: page.items,
        featured_id: page.featured_id,
        importing,
        total: page.total,
        total_pages: page.total_pages,
        page: page.page,
        page_size: page.page_size,
    }))
}

/// A recipe with its ingredients scaled to the requested servings.
#[utoipa::path(
    get,
    path = "/recipes/{id}",
    params(
        ("id" = String, Path, description = "The recipe id."),
        DetailQuery
    ),
    responses(
        (status = 200, description = "The recipe", body = RecipeDetailResponse),
        (status = 404, description = "No such recipe")
    )
)]
pub async fn recipe_detail_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let servings = params.servings.unwrap_or(1).clamp(1, MAX_SERVINGS);
    let recipe = app_state
        .catalog
        .lock()
        .await
        .get(&id)
        .filter(|r| !r.is_loading)
        .cloned()
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Recipe {} not found", id)))?;

    let ingredients = QuantityScaler::for_servings(servings).scale_all(&recipe.ingredients);
    let structured_data = recipe_json_ld(&recipe, servings);
    info!("Serving recipe {} for {} servings.", id, servings);

    Ok(Json(RecipeDetailResponse {
        recipe,
        servings,
        ingredients,
        structured_data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_catalog_core::domain::Category;

    #[test]
    fn recipe_query_accepts_known_labels() {
        let query = recipe_query(Some("Molhos"), Some("  iogurte ")).unwrap();
        assert_eq!(query.category, CategoryFilter::Only(Category::Sauces));
        assert_eq!(query.search, "iogurte");
        assert!(recipe_query(None, None).unwrap().is_unfiltered());
        assert!(recipe_query(Some("Todas"), None).unwrap().is_unfiltered());
    }

    #[test]
    fn recipe_query_rejects_unknown_category() {
        let (status, _) = recipe_query(Some("Sopas"), None).unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = [
            "/recipes",
            "/recipes/{id}",
            "/admin/recipes/import",
            "/auth/login",
            "/auth/session",
        ];
        for path in paths {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
