pub mod db;
pub mod memory;
pub mod recipe_llm;

pub use db::DbAdapter;
pub use memory::MemoryStore;
pub use recipe_llm::OpenAiRecipeAdapter;
