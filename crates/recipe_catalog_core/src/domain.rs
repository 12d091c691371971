//! crates/recipe_catalog_core/src/domain.rs
//!
//! Defines the pure, core data structures for the recipe catalog.
//! Wire and storage labels are the Portuguese strings shown in the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

//=========================================================================================
// Enumerations
//=========================================================================================

/// The fixed set of categories a recipe can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Pequeno-Almoço")]
    Breakfast,
    #[serde(rename = "Snacks")]
    Snacks,
    #[default]
    #[serde(rename = "Pratos Principais")]
    MainCourses,
    #[serde(rename = "Molhos")]
    Sauces,
    #[serde(rename = "Sobremesas")]
    Desserts,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Breakfast,
        Category::Snacks,
        Category::MainCourses,
        Category::Sauces,
        Category::Desserts,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Breakfast => "Pequeno-Almoço",
            Category::Snacks => "Snacks",
            Category::MainCourses => "Pratos Principais",
            Category::Sauces => "Molhos",
            Category::Desserts => "Sobremesas",
        }
    }

    /// Looks a category up by its label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A category selection in the catalog view. `All` is the "Todas" tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "Todas";

    pub fn matches(self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }

    /// Parses a query-string value. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.trim().is_empty() || label.trim().eq_ignore_ascii_case(Self::ALL_LABEL) {
            return Some(CategoryFilter::All);
        }
        Category::from_label(label).map(CategoryFilter::Only)
    }

    /// Every selectable tab label, "Todas" first.
    pub fn labels() -> Vec<&'static str> {
        std::iter::once(Self::ALL_LABEL)
            .chain(Category::ALL.iter().map(|c| c.label()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Fácil")]
    Easy,
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Difícil")]
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Fácil",
            Difficulty::Medium => "Médio",
            Difficulty::Hard => "Difícil",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            .into_iter()
            .find(|d| d.label().to_lowercase() == wanted)
    }
}

//=========================================================================================
// Recipe
//=========================================================================================

/// Nutritional values per serving.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Macros {
    /// Replaces negative or non-finite values with zero.
    pub fn sanitized(self) -> Self {
        let clean = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self {
            calories: clean(self.calories),
            protein: clean(self.protein),
            carbs: clean(self.carbs),
            fat: clean(self.fat),
        }
    }
}

/// Represents a single dish in the catalog.
///
/// Ingredient quantities are stored for one serving. The `is_loading` and
/// `is_image_loading` flags describe presentation state and are never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    /// A URL or a `data:` URL with the inline-encoded picture.
    pub image: String,
    pub category: Category,
    pub time: String,
    pub difficulty: Difficulty,
    pub macros: Macros,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    #[serde(default)]
    pub is_ai_generated: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_image_loading: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_loading: bool,
}

fn is_false(flag: &bool) -> bool {
    !*flag
}

impl Recipe {
    /// Generates a fresh, collision-free recipe id.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// The empty record a manual-entry action starts from.
    pub fn skeleton(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            image: String::new(),
            category: Category::MainCourses,
            time: String::new(),
            difficulty: Difficulty::Easy,
            macros: Macros::default(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            is_ai_generated: false,
            is_image_loading: false,
            is_loading: false,
        }
    }

    /// A transient record standing in for an import that is still running.
    pub fn loading_placeholder(id: impl Into<String>) -> Self {
        Self {
            is_loading: true,
            is_ai_generated: true,
            ..Self::skeleton(id)
        }
    }

    /// Returns a copy with the presentation-only flags cleared.
    pub fn without_transient_flags(&self) -> Self {
        Self {
            is_loading: false,
            is_image_loading: false,
            ..self.clone()
        }
    }
}

//=========================================================================================
// Back-office authentication
//=========================================================================================

/// Represents a back-office login session (auth cookie).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
