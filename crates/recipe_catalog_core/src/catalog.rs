//! crates/recipe_catalog_core/src/catalog.rs
//!
//! Binds a `RecipeCollection` to a `RecipeStore`. Every mutation is applied to
//! a working copy, written to the store in full, and only then committed, so
//! a failed write never leaves memory and storage out of step.

use std::sync::Arc;

use crate::collection::{CollectionError, Page, PageRequest, RecipeCollection, RecipeQuery, SaveOutcome};
use crate::domain::Recipe;
use crate::ports::{PortError, RecipeStore};
use crate::seed::seed_recipes;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error("Failed to persist the recipe collection: {0}")]
    Store(#[from] PortError),
    #[error("Another import is already running")]
    ImportInProgress,
    #[error("Recipe {0} is still being imported")]
    ImportPending(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

pub struct RecipeCatalog {
    collection: RecipeCollection,
    store: Arc<dyn RecipeStore>,
}

impl RecipeCatalog {
    /// Loads the stored collection, seeding the store when it is empty.
    pub async fn load(store: Arc<dyn RecipeStore>) -> CatalogResult<Self> {
        let stored: Vec<Recipe> = store
            .load_all()
            .await?
            .into_iter()
            .filter(|r| !r.is_loading)
            .collect();

        let mut catalog = Self {
            collection: RecipeCollection::new(),
            store,
        };
        if stored.is_empty() {
            catalog
                .commit(RecipeCollection::from_records(seed_recipes()))
                .await?;
        } else {
            catalog.collection = RecipeCollection::from_records(stored);
        }
        Ok(catalog)
    }

    pub fn collection(&self) -> &RecipeCollection {
        &self.collection
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.collection.get(id)
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    pub fn page(&self, query: &RecipeQuery, request: PageRequest) -> Page {
        self.collection.paginate(query, request)
    }

    pub fn import_in_flight(&self) -> bool {
        self.collection.iter().any(|r| r.is_loading)
    }

    /// Refuses edits aimed at the placeholder of a running import.
    fn ensure_settled(&self, id: &str) -> CatalogResult<()> {
        if self.collection.get(id).is_some_and(|r| r.is_loading) {
            return Err(CatalogError::ImportPending(id.to_string()));
        }
        Ok(())
    }

    async fn commit(&mut self, next: RecipeCollection) -> CatalogResult<()> {
        self.store.replace_all(&next.persistable()).await?;
        self.collection = next;
        Ok(())
    }

    // --- Mutations ---

    pub async fn insert(&mut self, recipe: Recipe) -> CatalogResult<()> {
        let mut next = self.collection.clone();
        next.insert(recipe.without_transient_flags())?;
        self.commit(next).await
    }

    /// Saves a complete record: updated in place when known, created at the front otherwise.
    pub async fn save(&mut self, recipe: Recipe) -> CatalogResult<SaveOutcome> {
        self.ensure_settled(&recipe.id)?;
        let mut next = self.collection.clone();
        let outcome = next.replace(recipe.without_transient_flags());
        self.commit(next).await?;
        Ok(outcome)
    }

    pub async fn remove(&mut self, id: &str) -> CatalogResult<Option<Recipe>> {
        self.ensure_settled(id)?;
        let mut next = self.collection.clone();
        let Some(removed) = next.remove(id) else {
            return Ok(None);
        };
        self.commit(next).await?;
        Ok(Some(removed))
    }

    /// Reorders by absolute collection indices.
    pub async fn move_item(&mut self, from: usize, to: usize) -> CatalogResult<bool> {
        let mut next = self.collection.clone();
        if !next.move_item(from, to) {
            return Ok(false);
        }
        self.commit(next).await?;
        Ok(true)
    }

    /// Reorders using rows of a displayed page, translated to absolute indices first.
    pub async fn move_on_page(
        &mut self,
        query: &RecipeQuery,
        request: PageRequest,
        from_row: usize,
        to_row: usize,
    ) -> CatalogResult<bool> {
        let from = self.collection.absolute_index(query, request, from_row);
        let to = self.collection.absolute_index(query, request, to_row);
        match (from, to) {
            (Some(from), Some(to)) => self.move_item(from, to).await,
            _ => Ok(false),
        }
    }

    pub async fn duplicate(&mut self, id: &str) -> CatalogResult<Option<Recipe>> {
        self.ensure_settled(id)?;
        let mut next = self.collection.clone();
        let Some(copy) = next.duplicate(id, Recipe::new_id()) else {
            return Ok(None);
        };
        self.commit(next).await?;
        Ok(Some(copy))
    }

    // --- Import lifecycle ---

    /// Shows a loading placeholder for an import that is about to start.
    pub fn begin_import(&mut self, placeholder_id: &str) -> CatalogResult<()> {
        if self.import_in_flight() {
            return Err(CatalogError::ImportInProgress);
        }
        self.collection
            .insert(Recipe::loading_placeholder(placeholder_id))?;
        Ok(())
    }

    /// Swaps the placeholder for the imported recipes, first result first.
    pub async fn complete_import(
        &mut self,
        placeholder_id: &str,
        recipes: Vec<Recipe>,
    ) -> CatalogResult<()> {
        let mut next = self.collection.clone();
        next.remove(placeholder_id);
        for recipe in recipes.into_iter().rev() {
            next.insert(recipe.without_transient_flags())?;
        }
        self.commit(next).await
    }

    /// Drops the placeholder of a failed import. Returns whether one was removed.
    pub fn abandon_import(&mut self, placeholder_id: &str) -> bool {
        let is_placeholder = self
            .collection
            .get(placeholder_id)
            .is_some_and(|r| r.is_loading);
        is_placeholder && self.collection.remove(placeholder_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PortResult;
    use async_trait::async_trait;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingStore {
        records: Mutex<Vec<Recipe>>,
        writes: Mutex<Vec<Vec<Recipe>>>,
        fail_writes: AtomicBool,
    }

    impl RecordingStore {
        fn with(records: Vec<Recipe>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                ..Self::default()
            })
        }

        fn stored_ids(&self) -> Vec<String> {
            self.records.lock().unwrap().iter().map(|r| r.id.clone()).collect()
        }

        fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RecipeStore for RecordingStore {
        async fn replace_all(&self, recipes: &[Recipe]) -> PortResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(PortError::Unexpected("disk full".to_string()));
            }
            self.writes.lock().unwrap().push(recipes.to_vec());
            *self.records.lock().unwrap() = recipes.to_vec();
            Ok(())
        }

        async fn load_all(&self) -> PortResult<Vec<Recipe>> {
            Ok(self.records.lock().unwrap().clone())
        }
    }

    fn recipe(id: &str) -> Recipe {
        Recipe {
            title: id.to_uppercase(),
            ..Recipe::skeleton(id)
        }
    }

    fn loaded(ids: &[&str]) -> (RecipeCatalog, Arc<RecordingStore>) {
        let store = RecordingStore::with(ids.iter().map(|id| recipe(id)).collect());
        let catalog = block_on(RecipeCatalog::load(store.clone())).unwrap();
        (catalog, store)
    }

    #[test]
    fn empty_store_is_seeded_and_persisted() {
        let store = RecordingStore::with(Vec::new());
        let catalog = block_on(RecipeCatalog::load(store.clone())).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(store.stored_ids(), vec!["seed-1", "seed-2", "seed-3", "seed-4"]);
    }

    #[test]
    fn load_keeps_stored_order() {
        let (catalog, store) = loaded(&["c", "a", "b"]);
        let ids: Vec<_> = catalog.collection().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn every_mutation_writes_the_full_sequence() {
        let (mut catalog, store) = loaded(&["a", "b", "c"]);

        block_on(catalog.insert(recipe("d"))).unwrap();
        assert_eq!(store.stored_ids(), vec!["d", "a", "b", "c"]);

        block_on(catalog.move_item(3, 0)).unwrap();
        assert_eq!(store.stored_ids(), vec!["c", "d", "a", "b"]);

        block_on(catalog.remove("d")).unwrap();
        assert_eq!(store.stored_ids(), vec!["c", "a", "b"]);

        let copy = block_on(catalog.duplicate("a")).unwrap().unwrap();
        assert_eq!(store.stored_ids()[0], copy.id);
        assert_eq!(store.write_count(), 4);
    }

    #[test]
    fn no_op_outcomes_skip_the_write() {
        let (mut catalog, store) = loaded(&["a", "b"]);
        assert!(block_on(catalog.remove("zzz")).unwrap().is_none());
        assert!(!block_on(catalog.move_item(0, 0)).unwrap());
        assert!(!block_on(catalog.move_item(0, 9)).unwrap());
        assert!(block_on(catalog.duplicate("zzz")).unwrap().is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn save_updates_in_place_or_creates_at_front() {
        let (mut catalog, store) = loaded(&["a", "b", "c"]);
        let mut edited = recipe("b");
        edited.title = "Editada".to_string();
        assert_eq!(block_on(catalog.save(edited)).unwrap(), SaveOutcome::Updated);
        assert_eq!(store.stored_ids(), vec!["a", "b", "c"]);
        assert_eq!(catalog.get("b").unwrap().title, "Editada");

        assert_eq!(block_on(catalog.save(recipe("n"))).unwrap(), SaveOutcome::Created);
        assert_eq!(store.stored_ids(), vec!["n", "a", "b", "c"]);
    }

    #[test]
    fn failed_write_leaves_state_unchanged() {
        let (mut catalog, store) = loaded(&["a", "b", "c"]);
        store.fail_writes.store(true, Ordering::SeqCst);

        let err = block_on(catalog.move_item(0, 2)).unwrap_err();
        assert!(matches!(err, CatalogError::Store(_)));
        let ids: Vec<_> = catalog.collection().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.stored_ids(), vec!["a", "b", "c"]);
    }

    #[test]
    fn writes_never_contain_loading_records() {
        let (mut catalog, store) = loaded(&["a", "b"]);
        catalog.begin_import("placeholder").unwrap();
        assert!(catalog.import_in_flight());

        block_on(catalog.save(recipe("c"))).unwrap();
        block_on(catalog.move_item(1, 2)).unwrap();

        for write in store.writes.lock().unwrap().iter() {
            assert!(write.iter().all(|r| !r.is_loading));
        }
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn running_import_placeholder_cannot_be_edited() {
        let (mut catalog, store) = loaded(&["a"]);
        catalog.begin_import("p1").unwrap();

        for result in [
            block_on(catalog.remove("p1")).map(|_| ()),
            block_on(catalog.duplicate("p1")).map(|_| ()),
            block_on(catalog.save(recipe("p1"))).map(|_| ()),
        ] {
            assert!(matches!(result, Err(CatalogError::ImportPending(id)) if id == "p1"));
        }
        assert!(catalog.import_in_flight());
        assert_eq!(catalog.len(), 2);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn only_one_import_at_a_time() {
        let (mut catalog, _store) = loaded(&["a"]);
        catalog.begin_import("p1").unwrap();
        assert!(matches!(catalog.begin_import("p2"), Err(CatalogError::ImportInProgress)));
    }

    #[test]
    fn completed_import_replaces_placeholder() {
        let (mut catalog, store) = loaded(&["a", "b"]);
        catalog.begin_import("p").unwrap();
        block_on(catalog.complete_import("p", vec![recipe("x"), recipe("y")])).unwrap();

        assert!(!catalog.import_in_flight());
        assert_eq!(store.stored_ids(), vec!["x", "y", "a", "b"]);
        assert!(catalog.get("p").is_none());
    }

    #[test]
    fn abandoned_import_removes_placeholder_only() {
        let (mut catalog, store) = loaded(&["a"]);
        catalog.begin_import("p").unwrap();
        assert!(catalog.abandon_import("p"));
        assert!(!catalog.abandon_import("a"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn page_relative_reorder_moves_the_right_records() {
        let ids: Vec<String> = (0..12).map(|i| format!("r{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let (mut catalog, store) = loaded(&id_refs);

        // drag row 0 of the second page (size 5) onto row 3 of the same page
        let moved = block_on(catalog.move_on_page(&RecipeQuery::default(), PageRequest::new(1, 5), 0, 3)).unwrap();
        assert!(moved);
        let stored = store.stored_ids();
        assert_eq!(&stored[5..9], &["r6", "r7", "r8", "r5"]);
        assert_eq!(&stored[0..5], &["r0", "r1", "r2", "r3", "r4"]);
    }

    #[test]
    fn page_relative_reorder_accounts_for_placeholder() {
        let (mut catalog, store) = loaded(&["a", "b", "c"]);
        catalog.begin_import("p").unwrap();
        block_on(catalog.move_on_page(&RecipeQuery::default(), PageRequest::new(0, 10), 2, 0)).unwrap();
        assert_eq!(store.stored_ids(), vec!["c", "a", "b"]);
    }
}
