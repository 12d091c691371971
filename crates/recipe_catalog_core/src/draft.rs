//! crates/recipe_catalog_core/src/draft.rs
//!
//! Parse-and-validate step for recipe payloads produced by the AI service.
//! Nothing from an external reply reaches a `Recipe` without passing through
//! `parse_drafts` and `RecipeDraft::into_recipe`.

use serde::{Deserialize, Deserializer};

use crate::domain::{Category, Difficulty, Macros, Recipe};

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error("The reply was empty")]
    Empty,
    #[error("The reply is not valid recipe JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fallback values for fields the service left out.
#[derive(Debug, Clone, Copy)]
pub struct DraftDefaults {
    pub title: &'static str,
    pub description: &'static str,
    pub time: &'static str,
    pub difficulty: Difficulty,
}

impl DraftDefaults {
    /// Recipes invented from a list of available ingredients.
    pub const GENERATED: DraftDefaults = DraftDefaults {
        title: "Nova Receita",
        description: "Descrição indisponível",
        time: "30 min",
        difficulty: Difficulty::Easy,
    };

    /// Recipes read out of an uploaded image or document.
    pub const IMPORTED: DraftDefaults = DraftDefaults {
        title: "Receita Importada",
        description: "Importada via ficheiro",
        time: "30 min",
        difficulty: Difficulty::Medium,
    };
}

#[derive(Debug, Default, Deserialize)]
struct DraftEnvelope {
    #[serde(default)]
    recipes: Option<Vec<RecipeDraft>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DraftMacros {
    #[serde(default, deserialize_with = "lenient_number")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub fat: Option<f64>,
}

/// An untrusted recipe as described by the service. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecipeDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub macros: Option<DraftMacros>,
    #[serde(default)]
    pub ingredients: Option<Vec<String>>,
    #[serde(default)]
    pub steps: Option<Vec<String>>,
}

/// Accepts `450`, `"450"` or `"450 kcal"`; anything else becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => {
            let numeric: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
                .collect();
            numeric.replace(',', ".").parse().ok()
        }
        _ => None,
    })
}

/// Removes a Markdown code fence around a JSON reply, if present.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a `{"recipes": [...]}` reply into drafts.
///
/// A reply without a `recipes` array yields no drafts rather than an error.
pub fn parse_drafts(reply: &str) -> Result<Vec<RecipeDraft>, DraftError> {
    let json = strip_code_fence(reply);
    if json.is_empty() {
        return Err(DraftError::Empty);
    }
    let envelope: DraftEnvelope = serde_json::from_str(json)?;
    Ok(envelope.recipes.unwrap_or_default())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn clean_lines(lines: Option<Vec<String>>) -> Vec<String> {
    lines
        .unwrap_or_default()
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

impl RecipeDraft {
    /// Builds an AI-generated recipe, filling gaps from `defaults`.
    ///
    /// Unknown categories fall back to the main-course category.
    pub fn into_recipe(self, id: impl Into<String>, defaults: DraftDefaults) -> Recipe {
        let macros = self.macros.unwrap_or_default();
        Recipe {
            id: id.into(),
            title: non_empty(self.title).unwrap_or_else(|| defaults.title.to_string()),
            description: non_empty(self.description)
                .unwrap_or_else(|| defaults.description.to_string()),
            image: String::new(),
            category: self
                .category
                .as_deref()
                .and_then(Category::from_label)
                .unwrap_or_default(),
            time: non_empty(self.time).unwrap_or_else(|| defaults.time.to_string()),
            difficulty: self
                .difficulty
                .as_deref()
                .and_then(Difficulty::from_label)
                .unwrap_or(defaults.difficulty),
            macros: Macros {
                calories: macros.calories.unwrap_or_default(),
                protein: macros.protein.unwrap_or_default(),
                carbs: macros.carbs.unwrap_or_default(),
                fat: macros.fat.unwrap_or_default(),
            }
            .sanitized(),
            ingredients: clean_lines(self.ingredients),
            steps: clean_lines(self.steps),
            is_ai_generated: true,
            is_image_loading: false,
            is_loading: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_reply() {
        let reply = r#"{"recipes":[{"title":"Omelete de Espinafres","description":"Leve","category":"Pequeno-Almoço",
            "time":"10 min","difficulty":"Fácil","macros":{"calories":250,"protein":"18 g","carbs":3,"fat":17},
            "ingredients":["2 Ovos","50g Espinafres"],"steps":["Bata os ovos.","Cozinhe."]}]}"#;
        let drafts = parse_drafts(reply).unwrap();
        assert_eq!(drafts.len(), 1);

        let recipe = drafts[0].clone().into_recipe("id-1", DraftDefaults::GENERATED);
        assert_eq!(recipe.title, "Omelete de Espinafres");
        assert_eq!(recipe.category, Category::Breakfast);
        assert_eq!(recipe.macros.protein, 18.0);
        assert_eq!(recipe.ingredients, vec!["2 Ovos", "50g Espinafres"]);
        assert!(recipe.is_ai_generated);
        assert!(!recipe.is_loading);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let drafts = parse_drafts(r#"{"recipes":[{"title":"  ","category":"Todas"}]}"#).unwrap();
        let recipe = drafts[0].clone().into_recipe("id-2", DraftDefaults::IMPORTED);
        assert_eq!(recipe.title, "Receita Importada");
        assert_eq!(recipe.description, "Importada via ficheiro");
        assert_eq!(recipe.time, "30 min");
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.category, Category::MainCourses);
        assert_eq!(recipe.macros, Macros::default());
        assert!(recipe.steps.is_empty());
    }

    #[test]
    fn reply_without_recipes_array_is_empty() {
        assert!(parse_drafts(r#"{"something":"else"}"#).unwrap().is_empty());
        assert!(parse_drafts(r#"{"recipes":null}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_and_empty_replies_are_errors() {
        assert!(matches!(parse_drafts("not json"), Err(DraftError::Malformed(_))));
        assert!(matches!(parse_drafts("   "), Err(DraftError::Empty)));
        assert!(matches!(
            parse_drafts(r#"{"recipes":[{"ingredients":"2 ovos"}]}"#),
            Err(DraftError::Malformed(_))
        ));
    }

    #[test]
    fn code_fences_are_stripped() {
        let reply = "```json\n{\"recipes\":[{\"title\":\"Hummus\"}]}\n```";
        let drafts = parse_drafts(reply).unwrap();
        assert_eq!(drafts[0].title.as_deref(), Some("Hummus"));
        assert_eq!(strip_code_fence("{}"), "{}");
    }
}
