//! crates/recipe_catalog_core/src/structured_data.rs
//!
//! schema.org `Recipe` markup (JSON-LD) for a recipe detail page.

use serde_json::{json, Value};

use crate::domain::Recipe;

pub const PUBLISHER_NAME: &str = "Receitas Fit AI";

/// Builds the JSON-LD document for `recipe` as shown for `servings` portions.
///
/// Ingredients are listed as stored; the yield reflects the serving count.
pub fn recipe_json_ld(recipe: &Recipe, servings: u32) -> Value {
    let instructions: Vec<Value> = recipe
        .steps
        .iter()
        .enumerate()
        .map(|(idx, step)| {
            json!({
                "@type": "HowToStep",
                "text": step,
                "position": idx + 1,
            })
        })
        .collect();

    json!({
        "@context": "https://schema.org/",
        "@type": "Recipe",
        "name": recipe.title,
        "image": [recipe.image],
        "description": recipe.description,
        "author": {
            "@type": "Organization",
            "name": PUBLISHER_NAME,
        },
        "prepTime": "PT10M",
        "totalTime": "PT30M",
        "recipeCategory": recipe.category.label(),
        "recipeYield": format!("{} porções", servings),
        "nutrition": {
            "@type": "NutritionInformation",
            "calories": format!("{} calories", recipe.macros.calories),
            "proteinContent": format!("{}g", recipe.macros.protein),
            "carbohydrateContent": format!("{}g", recipe.macros.carbs),
            "fatContent": format!("{}g", recipe.macros.fat),
        },
        "recipeIngredient": recipe.ingredients,
        "recipeInstructions": instructions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Macros};

    #[test]
    fn describes_recipe_and_serving_count() {
        let recipe = Recipe {
            title: "Strogonoff de Frango Light".to_string(),
            category: Category::MainCourses,
            macros: Macros { calories: 380.0, protein: 45.0, carbs: 12.0, fat: 15.0 },
            ingredients: vec!["200g Peito de frango".to_string()],
            steps: vec!["Salteie o frango.".to_string(), "Sirva.".to_string()],
            ..Recipe::skeleton("seed-3")
        };

        let doc = recipe_json_ld(&recipe, 3);
        assert_eq!(doc["@type"], "Recipe");
        assert_eq!(doc["name"], "Strogonoff de Frango Light");
        assert_eq!(doc["recipeCategory"], "Pratos Principais");
        assert_eq!(doc["recipeYield"], "3 porções");
        assert_eq!(doc["nutrition"]["calories"], "380 calories");
        assert_eq!(doc["recipeInstructions"][1]["position"], 2);
        assert_eq!(doc["recipeIngredient"][0], "200g Peito de frango");
    }
}
