pub mod admin;
pub mod auth;
pub mod import_task;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod router;
pub mod state;

// Re-export what the binaries need to build and serve the application.
pub use middleware::require_auth;
pub use router::build_router;
pub use state::AppState;
