pub mod catalog;
pub mod collection;
pub mod domain;
pub mod draft;
pub mod ports;
pub mod scaler;
pub mod seed;
pub mod structured_data;

pub use catalog::{CatalogError, CatalogResult, RecipeCatalog};
pub use collection::{CollectionError, Page, PageRequest, RecipeCollection, RecipeQuery, SaveOutcome};
pub use domain::{AuthSession, Category, CategoryFilter, Difficulty, Macros, Recipe};
pub use draft::{parse_drafts, DraftDefaults, DraftError, RecipeDraft};
pub use ports::{AuthSessionStore, PortError, PortResult, RecipeGenerationService, RecipeStore};
pub use scaler::QuantityScaler;
