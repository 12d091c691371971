//! services/api/src/web/router.rs
//!
//! Assembles the public and protected routes into the application router.

use crate::web::{admin, auth, middleware::require_auth, rest, rest::ApiDoc, state::AppState};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Uploaded recipe documents are capped at this size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(app_state.config.cors_origin.clone())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/categories", get(rest::categories_handler))
        .route("/recipes", get(rest::list_recipes_handler))
        .route("/recipes/{id}", get(rest::recipe_detail_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/session", get(auth::session_handler))
        .route("/admin/recipes", get(admin::list_admin_recipes_handler))
        .route("/admin/recipes/new", get(admin::new_recipe_handler))
        .route("/admin/recipes/reorder", post(admin::reorder_recipes_handler))
        .route("/admin/recipes/generate", post(admin::generate_recipes_handler))
        .route("/admin/recipes/import", post(admin::import_recipe_handler))
        .route(
            "/admin/recipes/{id}",
            put(admin::save_recipe_handler).delete(admin::delete_recipe_handler),
        )
        .route(
            "/admin/recipes/{id}/duplicate",
            post(admin::duplicate_recipe_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
