//! services/api/src/web/admin.rs
//!
//! Back-office handlers. Every route here sits behind `require_auth` and maps
//! one editor action onto one `RecipeCatalog` operation.

use crate::web::{
    import_task::{generate_drafts, import_process},
    protocol::*,
    rest::recipe_query,
    state::AppState,
};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use recipe_catalog_core::{
    catalog::CatalogError,
    collection::{PageRequest, RecipeQuery, SaveOutcome},
    domain::Recipe,
    ports::RecipeGenerationService,
};
use std::sync::Arc;
use tracing::{error, info};

pub const ADMIN_PAGE_SIZES: [usize; 3] = [10, 20, 50];

/// Maps a failed catalog operation to a response, logging the cause.
fn catalog_failure(action: &str, e: CatalogError) -> (StatusCode, String) {
    match e {
        CatalogError::ImportInProgress
        | CatalogError::ImportPending(_)
        | CatalogError::Collection(_) => (StatusCode::CONFLICT, e.to_string()),
        CatalogError::Store(_) => {
            error!("Failed to {}: {:?}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to {}", action),
            )
        }
    }
}

fn require_generator(
    app_state: &AppState,
) -> Result<Arc<dyn RecipeGenerationService>, (StatusCode, String)> {
    app_state.generator.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "The AI service is not configured".to_string(),
        )
    })
}

//=========================================================================================
// Listing and Editing
//=========================================================================================

/// One page of the full catalog, in display order.
#[utoipa::path(
    get,
    path = "/admin/recipes",
    params(AdminPageQuery),
    responses(
        (status = 200, description = "A page of recipes", body = CatalogPageResponse),
        (status = 400, description = "Unsupported page size"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn list_admin_recipes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<AdminPageQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let page_size = params.page_size.unwrap_or(ADMIN_PAGE_SIZES[0]);
    if !ADMIN_PAGE_SIZES.contains(&page_size) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("Page size must be one of {:?}", ADMIN_PAGE_SIZES),
        ));
    }

    let catalog = app_state.catalog.lock().await;
    let page = catalog.page(
        &RecipeQuery::default(),
        PageRequest::new(params.page.unwrap_or(0), page_size),
    );
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

/// An empty recipe with a fresh id, for the editor. Nothing is stored.
#[utoipa::path(
    get,
    path = "/admin/recipes/new",
    responses(
        (status = 200, description = "An unsaved skeleton recipe"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn new_recipe_handler() -> Json<Recipe> {
    Json(Recipe::skeleton(Recipe::new_id()))
}

/// Saves a complete recipe: updated in place when known, added first otherwise.
#[utoipa::path(
    put,
    path = "/admin/recipes/{id}",
    params(("id" = String, Path, description = "The recipe id.")),
    request_body(content_type = "application/json", description = "The complete recipe record."),
    responses(
        (status = 200, description = "Recipe updated"),
        (status = 201, description = "Recipe created"),
        (status = 400, description = "Body id does not match the path"),
        (status = 409, description = "The id belongs to an import in progress"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn save_recipe_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(mut recipe): Json<Recipe>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if recipe.id != id {
        return Err((
            StatusCode::BAD_REQUEST,
            "The recipe id does not match the path".to_string(),
        ));
    }
    recipe.macros = recipe.macros.sanitized();

    let outcome = app_state
        .catalog
        .lock()
        .await
        .save(recipe.clone())
        .await
        .map_err(|e| catalog_failure("save recipe", e))?;

    let status = match outcome {
        SaveOutcome::Updated => StatusCode::OK,
        SaveOutcome::Created => StatusCode::CREATED,
    };
    info!("Recipe {} saved ({:?}).", id, outcome);
    Ok((status, Json(recipe.without_transient_flags())))
}

/// Deletes a recipe. Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/admin/recipes/{id}",
    params(("id" = String, Path, description = "The recipe id.")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 409, description = "The id belongs to an import in progress"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn delete_recipe_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let removed = app_state
        .catalog
        .lock()
        .await
        .remove(&id)
        .await
        .map_err(|e| catalog_failure("delete recipe", e))?;
    if removed.is_some() {
        info!("Recipe {} deleted.", id);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Copies a recipe to the front of the catalog.
#[utoipa::path(
    post,
    path = "/admin/recipes/{id}/duplicate",
    params(("id" = String, Path, description = "The recipe to copy.")),
    responses(
        (status = 201, description = "The copy"),
        (status = 404, description = "No such recipe"),
        (status = 409, description = "The id belongs to an import in progress"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn duplicate_recipe_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let copy = app_state
        .catalog
        .lock()
        .await
        .duplicate(&id)
        .await
        .map_err(|e| catalog_failure("duplicate recipe", e))?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Recipe {} not found", id)))?;
    info!("Recipe {} duplicated as {}.", id, copy.id);
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Drag-and-drop within a displayed page. Rows are page-relative.
#[utoipa::path(
    post,
    path = "/admin/recipes/reorder",
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Whether anything moved", body = ReorderResponse),
        (status = 400, description = "Unknown category"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn reorder_recipes_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<ReorderRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = recipe_query(req.category.as_deref(), req.q.as_deref())?;
    let request = PageRequest::new(req.page, req.page_size);
    let moved = app_state
        .catalog
        .lock()
        .await
        .move_on_page(&query, request, req.from_row, req.to_row)
        .await
        .map_err(|e| catalog_failure("reorder recipes", e))?;
    Ok(Json(ReorderResponse { moved }))
}

//=========================================================================================
// AI-backed Actions
//=========================================================================================

/// Drafts recipes from a list of ingredients. The drafts are not stored.
#[utoipa::path(
    post,
    path = "/admin/recipes/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Drafts, possibly none", body = GenerateResponse),
        (status = 400, description = "No ingredients given"),
        (status = 503, description = "AI service not configured"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn generate_recipes_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let generator = require_generator(&app_state)?;
    let ingredients = req.ingredients.trim();
    if ingredients.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "At least one ingredient is required".to_string(),
        ));
    }

    let recipes =
        generate_drafts(generator.as_ref(), ingredients, app_state.config.import_timeout).await;
    Ok(Json(GenerateResponse { recipes }))
}

/// Starts importing a recipe from an uploaded image or text file.
///
/// A loading placeholder is shown at once; the extraction runs in the
/// background and replaces it with the recipe, or removes it on failure.
#[utoipa::path(
    post,
    path = "/admin/recipes/import",
    request_body(content_type = "multipart/form-data", description = "The document to import."),
    responses(
        (status = 202, description = "Import started", body = ImportAccepted),
        (status = 400, description = "No file in the form"),
        (status = 409, description = "Another import is running"),
        (status = 503, description = "AI service not configured"),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn import_recipe_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let generator = require_generator(&app_state)?;

    let (file, mime_type) = if let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        (data, mime_type)
    } else {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    };
    if file.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "The uploaded file is empty".to_string()));
    }

    let placeholder_id = Recipe::new_id();
    app_state
        .catalog
        .lock()
        .await
        .begin_import(&placeholder_id)
        .map_err(|e| catalog_failure("start import", e))?;

    tokio::spawn(import_process(
        app_state.clone(),
        generator,
        placeholder_id.clone(),
        file,
        mime_type,
    ));

    Ok((StatusCode::ACCEPTED, Json(ImportAccepted { placeholder_id })))
}
