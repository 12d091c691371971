//! crates/recipe_catalog_core/src/seed.rs
//!
//! The built-in recipes a fresh catalog starts with.

use crate::domain::{Category, Difficulty, Macros, Recipe};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    title: &str,
    description: &str,
    image: &str,
    category: Category,
    time: &str,
    difficulty: Difficulty,
    macros: Macros,
    ingredients: &[&str],
    steps: &[&str],
) -> Recipe {
    Recipe {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        image: image.to_string(),
        category,
        time: time.to_string(),
        difficulty,
        macros,
        ingredients: lines(ingredients),
        steps: lines(steps),
        is_ai_generated: false,
        is_image_loading: false,
        is_loading: false,
    }
}

/// The seed recipes in display order.
pub fn seed_recipes() -> Vec<Recipe> {
    vec![
        seed(
            "seed-1",
            "Bowl de Quinoa e Salmão Braseado",
            "Um prato vibrante e equilibrado, rico em ómega-3 e fibras, com um toque cítrico refrescante.",
            "https://images.unsplash.com/photo-1467003909585-2f8a72700288?auto=format&fit=crop&q=80&w=1000",
            Category::MainCourses,
            "25 min",
            Difficulty::Medium,
            Macros { calories: 450.0, protein: 32.0, carbs: 40.0, fat: 18.0 },
            &[
                "150g Salmão fresco",
                "100g Quinoa cozida",
                "50g Abacate",
                "Tomate cherry",
                "Sumo de limão",
                "Azeite virgem extra",
            ],
            &[
                "Grelhe o salmão temperado com sal e limão.",
                "Monte a bowl com a quinoa na base.",
                "Adicione o abacate fatiado e o tomate.",
                "Regue com azeite e sirva.",
            ],
        ),
        seed(
            "seed-2",
            "Panquecas de Aveia e Banana",
            "Pequeno-almoço energético sem açúcares adicionados, perfeito para pré-treino.",
            "https://images.unsplash.com/photo-1506084868730-342b1f40ff0e?auto=format&fit=crop&q=80&w=1000",
            Category::Breakfast,
            "15 min",
            Difficulty::Easy,
            Macros { calories: 320.0, protein: 12.0, carbs: 55.0, fat: 6.0 },
            &[
                "1 Banana madura",
                "2 Ovos",
                "50g Flocos de aveia",
                "Canela em pó",
                "Frutos vermelhos para decorar",
            ],
            &[
                "Esmague a banana e misture com os ovos.",
                "Adicione a aveia e a canela.",
                "Cozinhe em frigideira antiaderente até dourar dos dois lados.",
            ],
        ),
        seed(
            "seed-3",
            "Strogonoff de Frango Light",
            "A versão saudável de um clássico, usando iogurte grego para cremosidade.",
            "https://images.unsplash.com/photo-1604908176997-125f25cc6f3d?auto=format&fit=crop&q=80&w=1000",
            Category::MainCourses,
            "30 min",
            Difficulty::Easy,
            Macros { calories: 380.0, protein: 45.0, carbs: 12.0, fat: 15.0 },
            &[
                "200g Peito de frango",
                "100g Cogumelos frescos",
                "1 Iogurte Grego Natural",
                "Mostarda Dijon",
                "Polpa de tomate",
            ],
            &[
                "Salteie o frango em cubos.",
                "Junte os cogumelos e deixe cozinhar.",
                "Baixe o lume, adicione o iogurte, mostarda e tomate. Não deixe ferver.",
            ],
        ),
        seed(
            "seed-4",
            "Salada de Grão e Atum",
            "Refeição rápida, fresca e cheia de proteína, ideal para dias quentes.",
            "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?auto=format&fit=crop&q=80&w=1000",
            Category::MainCourses,
            "10 min",
            Difficulty::Easy,
            Macros { calories: 350.0, protein: 28.0, carbs: 35.0, fat: 10.0 },
            &[
                "1 lata de Atum ao natural",
                "200g Grão de bico cozido",
                "Cebola roxa picada",
                "Salsa fresca",
                "Ovo cozido",
            ],
            &[
                "Misture o grão, atum e cebola.",
                "Tempere com azeite e vinagre.",
                "Adicione o ovo cozido picado e a salsa.",
            ],
        ),
    ]
}
