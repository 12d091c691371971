//! services/api/src/web/import_task.rs
//!
//! The AI-backed flows of the back-office. Failures of the AI service never
//! reach the client: they are logged and absorbed into an empty result.

use crate::web::state::AppState;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use recipe_catalog_core::{domain::Recipe, ports::RecipeGenerationService};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info, warn};

/// Asks the AI service for recipe drafts. Returns an empty list on any failure.
pub async fn generate_drafts(
    generator: &dyn RecipeGenerationService,
    ingredients: &str,
    limit: Duration,
) -> Vec<Recipe> {
    let start_time = Instant::now();
    match timeout(limit, generator.generate_from_ingredients(ingredients)).await {
        Ok(Ok(recipes)) => {
            info!(
                "Generated {} drafts in {:?}.",
                recipes.len(),
                start_time.elapsed()
            );
            recipes
        }
        Ok(Err(e)) => {
            error!("Recipe generation failed: {:?}", e);
            Vec::new()
        }
        Err(_) => {
            warn!("Recipe generation timed out after {:?}.", limit);
            Vec::new()
        }
    }
}

/// Asks the AI service to read one recipe out of a document. `None` on any failure.
pub async fn extract_recipe(
    generator: &dyn RecipeGenerationService,
    file: &[u8],
    mime_type: &str,
    limit: Duration,
) -> Option<Recipe> {
    match timeout(limit, generator.extract_from_document(file, mime_type)).await {
        Ok(Ok(recipe)) => recipe,
        Ok(Err(e)) => {
            error!("Recipe extraction failed: {:?}", e);
            None
        }
        Err(_) => {
            warn!("Recipe extraction timed out after {:?}.", limit);
            None
        }
    }
}

/// The background half of an import whose placeholder is already showing.
///
/// The catalog lock is not held during the AI call, only while the
/// placeholder is swapped for the result.
pub async fn import_process(
    app_state: Arc<AppState>,
    generator: Arc<dyn RecipeGenerationService>,
    placeholder_id: String,
    file: Bytes,
    mime_type: String,
) {
    info!("Import {} started ({} bytes, {}).", placeholder_id, file.len(), mime_type);
    let extracted = extract_recipe(
        generator.as_ref(),
        &file,
        &mime_type,
        app_state.config.import_timeout,
    )
    .await;

    let mut catalog = app_state.catalog.lock().await;
    let Some(mut recipe) = extracted else {
        catalog.abandon_import(&placeholder_id);
        warn!("Import {} produced no recipe; placeholder removed.", placeholder_id);
        return;
    };

    // An uploaded photo doubles as the picture of the dish.
    if recipe.image.is_empty() && mime_type.starts_with("image/") {
        recipe.image = format!("data:{};base64,{}", mime_type, STANDARD.encode(&file));
    }

    let recipe_id = recipe.id.clone();
    match catalog.complete_import(&placeholder_id, vec![recipe]).await {
        Ok(()) => info!("Import {} completed as recipe {}.", placeholder_id, recipe_id),
        Err(e) => {
            error!("Failed to store imported recipe {}: {:?}", recipe_id, e);
            catalog.abandon_import(&placeholder_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use recipe_catalog_core::ports::{PortError, PortResult};

    struct SlowGenerator;

    #[async_trait]
    impl RecipeGenerationService for SlowGenerator {
        async fn generate_from_ingredients(&self, _ingredients: &str) -> PortResult<Vec<Recipe>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![Recipe::skeleton("late")])
        }

        async fn extract_from_document(
            &self,
            _file: &[u8],
            _mime_type: &str,
        ) -> PortResult<Option<Recipe>> {
            Err(PortError::Unexpected("vision model unavailable".to_string()))
        }
    }

    #[tokio::test]
    async fn slow_generation_is_cut_off() {
        let drafts = generate_drafts(&SlowGenerator, "ovos", Duration::from_millis(10)).await;
        assert!(drafts.is_empty());
    }

    #[tokio::test]
    async fn failed_extraction_is_absorbed() {
        let recipe =
            extract_recipe(&SlowGenerator, b"receita", "text/plain", Duration::from_secs(1)).await;
        assert!(recipe.is_none());
    }
}
