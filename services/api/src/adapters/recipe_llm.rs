//! services/api/src/adapters/recipe_llm.rs
//!
//! This module contains the adapter for the recipe-drafting LLM.
//! It implements the `RecipeGenerationService` port from the `core` crate.

const RECIPE_SCHEMA_INSTRUCTIONS: &str = r#"Respond ONLY with a JSON object, no Markdown and no explanation, in exactly this shape:
{"recipes":[{"title":string,"description":string,"category":string,"time":string,"difficulty":string,
"macros":{"calories":number,"protein":number,"carbs":number,"fat":number},
"ingredients":[string],"steps":[string]}]}

Rules:
- "category" must be one of: "Pequeno-Almoço", "Snacks", "Pratos Principais", "Molhos", "Sobremesas".
- "difficulty" must be one of: "Fácil", "Médio", "Difícil".
- "time" is a short duration label such as "30 min".
- Macros are per serving, in kcal and grams.
- Ingredient quantities are for ONE serving and start the line, e.g. "200g Peito de frango" or "1/2 cebola".
- Write in European Portuguese (Português de Portugal)."#;

const GENERATION_SYSTEM_PROMPT: &str = "You are a nutritionist and chef who writes healthy, fitness-oriented recipes.";

const EXTRACTION_PROMPT: &str = "Analisa esta imagem/documento. Extrai a receita completa em formato JSON estruturado. Se houver imagem do prato, ignora a extração da imagem em si, foca-te no texto. Se o documento contiver várias, extrai apenas a primeira principal. Usa Português de Portugal.";

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartFile,
        ChatCompletionRequestMessageContentPartImageArgs,
        ChatCompletionRequestMessageContentPartTextArgs, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContentPart,
        CreateChatCompletionRequestArgs, FileObject, ImageUrlArgs,
    },
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use recipe_catalog_core::{
    domain::Recipe,
    draft::{parse_drafts, DraftDefaults},
    ports::{PortError, PortResult, RecipeGenerationService},
};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

static JSON_OBJECT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

fn unexpected(e: impl std::fmt::Display) -> PortError {
    PortError::Unexpected(e.to_string())
}

/// Isolates the outermost JSON object in a reply that may carry extra prose.
fn json_object(reply: &str) -> &str {
    JSON_OBJECT
        .as_ref()
        .and_then(|object| object.find(reply))
        .map_or(reply, |m| m.as_str())
}

/// Parses a model reply into recipes with fresh ids.
fn recipes_from_reply(reply: &str, defaults: DraftDefaults) -> PortResult<Vec<Recipe>> {
    let drafts = parse_drafts(json_object(reply)).map_err(unexpected)?;
    Ok(drafts
        .into_iter()
        .map(|draft| draft.into_recipe(Recipe::new_id(), defaults))
        .collect())
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `RecipeGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiRecipeAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    vision_model: String,
}

impl OpenAiRecipeAdapter {
    /// Creates a new `OpenAiRecipeAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String, vision_model: String) -> Self {
        Self {
            client,
            model,
            vision_model,
        }
    }

    /// Sends one chat completion and returns the text of the first choice.
    async fn complete(
        &self,
        model: &str,
        messages: Vec<ChatCompletionRequestMessage>,
    ) -> PortResult<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(messages)
            .n(1)
            .temperature(0.7)
            .build()
            .map_err(unexpected)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Recipe LLM response contained no text content.".to_string())
            })
    }

    /// Wraps an upload as a message part: images and PDFs inline as data URLs,
    /// text documents as plain text.
    fn document_part(
        file_bytes: &[u8],
        mime_type: &str,
    ) -> PortResult<ChatCompletionRequestUserMessageContentPart> {
        if mime_type.starts_with("image/") {
            let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(file_bytes));
            let image_url = ImageUrlArgs::default()
                .url(data_url)
                .build()
                .map_err(unexpected)?;
            return Ok(ChatCompletionRequestMessageContentPartImageArgs::default()
                .image_url(image_url)
                .build()
                .map_err(unexpected)?
                .into());
        }
        if mime_type == "application/pdf" {
            let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(file_bytes));
            return Ok(ChatCompletionRequestUserMessageContentPart::File(
                ChatCompletionRequestMessageContentPartFile {
                    file: FileObject {
                        file_data: Some(data_url),
                        file_id: None,
                        filename: Some("receita.pdf".to_string()),
                    },
                },
            ));
        }
        if mime_type.starts_with("text/") {
            let text = String::from_utf8_lossy(file_bytes);
            return Ok(ChatCompletionRequestMessageContentPartTextArgs::default()
                .text(format!("DOCUMENTO:\n{}", text))
                .build()
                .map_err(unexpected)?
                .into());
        }
        Err(PortError::Unexpected(format!(
            "Unsupported document type: {}",
            mime_type
        )))
    }
}

//=========================================================================================
// `RecipeGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeGenerationService for OpenAiRecipeAdapter {
    /// Creates four fit recipes from the ingredients the user has at home.
    async fn generate_from_ingredients(&self, ingredients: &str) -> PortResult<Vec<Recipe>> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(format!("{}\n\n{}", GENERATION_SYSTEM_PROMPT, RECIPE_SCHEMA_INSTRUCTIONS))
                .build()
                .map_err(unexpected)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(format!(
                    "Com base estritamente nestes ingredientes disponíveis: \"{}\" (e básicos de despensa como azeite, sal, pimenta), cria 4 receitas Fit / Saudáveis. Devem ser receitas completas e criativas.",
                    ingredients.trim()
                ))
                .build()
                .map_err(unexpected)?
                .into(),
        ];

        let reply = self.complete(&self.model, messages).await?;
        let recipes = recipes_from_reply(&reply, DraftDefaults::GENERATED)?;
        info!("Recipe LLM drafted {} recipes.", recipes.len());
        Ok(recipes)
    }

    /// Extracts the first recipe from an uploaded image or text document.
    async fn extract_from_document(
        &self,
        file_bytes: &[u8],
        mime_type: &str,
    ) -> PortResult<Option<Recipe>> {
        let document = Self::document_part(file_bytes, mime_type)?;
        let instruction = ChatCompletionRequestMessageContentPartTextArgs::default()
            .text(EXTRACTION_PROMPT)
            .build()
            .map_err(unexpected)?
            .into();

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(RECIPE_SCHEMA_INSTRUCTIONS)
                .build()
                .map_err(unexpected)?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(vec![document, instruction])
                .build()
                .map_err(unexpected)?
                .into(),
        ];

        let reply = self.complete(&self.vision_model, messages).await?;
        let recipe = recipes_from_reply(&reply, DraftDefaults::IMPORTED)?
            .into_iter()
            .next();
        if recipe.is_none() {
            warn!("Recipe LLM found no recipe in the uploaded {} document.", mime_type);
        }
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_catalog_core::domain::Category;

    #[test]
    fn json_object_ignores_surrounding_prose() {
        let reply = "Aqui está:\n{\"recipes\":[]}\nBom apetite!";
        assert_eq!(json_object(reply), "{\"recipes\":[]}");
        assert_eq!(json_object("no json"), "no json");
    }

    #[test]
    fn reply_becomes_ai_generated_recipes_with_fresh_ids() {
        let reply = r#"```json
{"recipes":[{"title":"Tosta de Abacate","category":"Snacks"},{"title":"Molho de Iogurte","category":"Molhos"}]}
```"#;
        let recipes = recipes_from_reply(reply, DraftDefaults::GENERATED).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_ne!(recipes[0].id, recipes[1].id);
        assert_eq!(recipes[1].category, Category::Sauces);
        assert!(recipes.iter().all(|r| r.is_ai_generated));
    }

    #[test]
    fn pdf_documents_are_sent_inline_as_files() {
        let part = OpenAiRecipeAdapter::document_part(b"%PDF-1.7", "application/pdf").unwrap();
        match part {
            ChatCompletionRequestUserMessageContentPart::File(part) => {
                let data = part.file.file_data.unwrap_or_default();
                assert_eq!(data, format!("data:application/pdf;base64,{}", STANDARD.encode(b"%PDF-1.7")));
            }
            _ => panic!("a PDF should become a file part"),
        }
    }

    #[test]
    fn unsupported_documents_are_rejected() {
        let err = OpenAiRecipeAdapter::document_part(b"%PDF-1.7", "application/zip").unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
        assert!(OpenAiRecipeAdapter::document_part(b"1 ovo", "text/plain").is_ok());
    }
}
