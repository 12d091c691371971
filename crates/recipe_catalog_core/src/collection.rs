//! crates/recipe_catalog_core/src/collection.rs
//!
//! The ordered recipe collection behind both the public catalog and the
//! back-office. Position in the collection is the display order; index 0 is
//! the featured recipe of the unfiltered first page.

use crate::domain::{CategoryFilter, Recipe};
use serde::Serialize;

/// Appended to the title of a duplicated recipe.
pub const COPY_SUFFIX: &str = " (Cópia)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollectionError {
    #[error("A recipe with id {0} already exists")]
    DuplicateId(String),
}

/// Whether a save updated an existing record or created a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Updated,
    Created,
}

//=========================================================================================
// Queries and Pages
//=========================================================================================

/// The category tab and search box of a catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeQuery {
    pub category: CategoryFilter,
    pub search: String,
}

impl RecipeQuery {
    pub fn new(category: CategoryFilter, search: impl Into<String>) -> Self {
        Self {
            category,
            search: search.into(),
        }
    }

    /// True for the "Todas" tab with an empty search box.
    pub fn is_unfiltered(&self) -> bool {
        self.category == CategoryFilter::All && self.search.trim().is_empty()
    }

    /// Category match plus a case-insensitive search over title and description.
    pub fn matches(&self, recipe: &Recipe) -> bool {
        if !self.category.matches(recipe.category) {
            return false;
        }
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || recipe.title.to_lowercase().contains(&needle)
            || recipe.description.to_lowercase().contains(&needle)
    }
}

/// A zero-based page request. A zero page size is treated as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page,
            page_size: page_size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.page_size)
    }

    /// Page-relative row to position in the paged sequence.
    pub fn absolute_row(&self, row: usize) -> usize {
        self.offset().saturating_add(row)
    }
}

/// One page of a filtered catalog view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub items: Vec<Recipe>,
    pub page: usize,
    pub page_size: usize,
    /// Matching records, loading placeholders excluded.
    pub total: usize,
    pub total_pages: usize,
    /// Set only on the first page of the unfiltered view.
    pub featured_id: Option<String>,
}

//=========================================================================================
// RecipeCollection
//=========================================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeCollection {
    recipes: Vec<Recipe>,
}

impl RecipeCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from records already in display order, keeping
    /// the first record of any repeated id.
    pub fn from_records(records: Vec<Recipe>) -> Self {
        let mut collection = Self::new();
        for record in records {
            if !collection.contains(&record.id) {
                collection.recipes.push(record);
            }
        }
        collection
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.recipes.iter().position(|r| r.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    // --- Mutations ---

    /// Adds a recipe at the front. Ids must be unique.
    pub fn insert(&mut self, recipe: Recipe) -> Result<(), CollectionError> {
        if self.contains(&recipe.id) {
            return Err(CollectionError::DuplicateId(recipe.id));
        }
        self.recipes.insert(0, recipe);
        Ok(())
    }

    /// Replaces the record with the same id in place, or inserts it at the
    /// front when no such record exists.
    pub fn replace(&mut self, recipe: Recipe) -> SaveOutcome {
        match self.position(&recipe.id) {
            Some(index) => {
                self.recipes[index] = recipe;
                SaveOutcome::Updated
            }
            None => {
                self.recipes.insert(0, recipe);
                SaveOutcome::Created
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let index = self.position(id)?;
        Some(self.recipes.remove(index))
    }

    /// Splice reorder: the element at `from` ends up at `to`, everything in
    /// between shifts by one. Out-of-bounds or equal indices are ignored.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        let len = self.recipes.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let recipe = self.recipes.remove(from);
        self.recipes.insert(to, recipe);
        true
    }

    /// Copies a recipe under `new_id` and puts the copy at the front.
    pub fn duplicate(&mut self, id: &str, new_id: impl Into<String>) -> Option<Recipe> {
        let new_id = new_id.into();
        if self.contains(&new_id) {
            return None;
        }
        let source = self.get(id)?;
        let copy = Recipe {
            id: new_id,
            title: format!("{}{}", source.title, COPY_SUFFIX),
            ..source.without_transient_flags()
        };
        self.recipes.insert(0, copy.clone());
        Some(copy)
    }

    // --- Derived views ---

    /// Matching records in collection order. Loading placeholders are always kept.
    pub fn filter<F>(&self, predicate: F) -> Vec<&Recipe>
    where
        F: Fn(&Recipe) -> bool,
    {
        self.recipes
            .iter()
            .filter(|&r| r.is_loading || predicate(r))
            .collect()
    }

    pub fn query(&self, query: &RecipeQuery) -> Vec<&Recipe> {
        self.filter(|r| query.matches(r))
    }

    /// The in-flight import placeholders, rendered outside the paged grid.
    pub fn loading_placeholders(&self) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.is_loading).collect()
    }

    /// The filtered sequence without loading placeholders.
    fn paged_sequence(&self, query: &RecipeQuery) -> Vec<&Recipe> {
        self.query(query)
            .into_iter()
            .filter(|r| !r.is_loading)
            .collect()
    }

    pub fn paginate(&self, query: &RecipeQuery, request: PageRequest) -> Page {
        let request = PageRequest::new(request.page, request.page_size);
        let sequence = self.paged_sequence(query);
        let total = sequence.len();
        let items: Vec<Recipe> = sequence
            .into_iter()
            .skip(request.offset())
            .take(request.page_size)
            .cloned()
            .collect();
        let featured_id = if request.page == 0 && query.is_unfiltered() {
            items.first().map(|r| r.id.clone())
        } else {
            None
        };
        Page {
            items,
            page: request.page,
            page_size: request.page_size,
            total,
            total_pages: total.div_ceil(request.page_size),
            featured_id,
        }
    }

    /// Translates a row of a displayed page into a collection index.
    ///
    /// For the unfiltered view without placeholders this is
    /// `page * page_size + row`. Rows past the end of the view yield `None`.
    pub fn absolute_index(
        &self,
        query: &RecipeQuery,
        request: PageRequest,
        row: usize,
    ) -> Option<usize> {
        let request = PageRequest::new(request.page, request.page_size);
        if row >= request.page_size {
            return None;
        }
        let target = self.paged_sequence(query).get(request.absolute_row(row))?.id.clone();
        self.position(&target)
    }

    /// The sequence handed to storage: placeholders dropped, flags stripped.
    pub fn persistable(&self) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| !r.is_loading)
            .map(Recipe::without_transient_flags)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    fn recipe(id: &str, title: &str) -> Recipe {
        Recipe {
            title: title.to_string(),
            ..Recipe::skeleton(id)
        }
    }

    fn ids(collection: &RecipeCollection) -> Vec<&str> {
        collection.iter().map(|r| r.id.as_str()).collect()
    }

    fn abc() -> RecipeCollection {
        RecipeCollection::from_records(vec![recipe("a", "A"), recipe("b", "B"), recipe("c", "C")])
    }

    fn numbered(count: usize) -> RecipeCollection {
        RecipeCollection::from_records(
            (0..count)
                .map(|i| recipe(&format!("r{i}"), &format!("Receita {i}")))
                .collect(),
        )
    }

    #[test]
    fn insert_prepends_and_grows_by_one() {
        let mut collection = abc();
        collection.insert(recipe("d", "D")).unwrap();
        assert_eq!(ids(&collection), vec!["d", "a", "b", "c"]);
        assert_eq!(collection.len(), 4);
    }

    #[test]
    fn insert_rejects_existing_id() {
        let mut collection = abc();
        let err = collection.insert(recipe("b", "Outra")).unwrap_err();
        assert_eq!(err, CollectionError::DuplicateId("b".to_string()));
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn replace_keeps_position_of_existing_record() {
        let mut collection = abc();
        let outcome = collection.replace(recipe("b", "B editado"));
        assert_eq!(outcome, SaveOutcome::Updated);
        assert_eq!(ids(&collection), vec!["a", "b", "c"]);
        assert_eq!(collection.get("b").unwrap().title, "B editado");
    }

    #[test]
    fn replace_of_unknown_id_inserts_at_front() {
        let mut collection = abc();
        assert_eq!(collection.replace(recipe("z", "Z")), SaveOutcome::Created);
        assert_eq!(ids(&collection), vec!["z", "a", "b", "c"]);
    }

    #[test]
    fn remove_twice_is_a_no_op_the_second_time() {
        let mut collection = abc();
        assert!(collection.remove("b").is_some());
        assert_eq!(collection.len(), 2);
        assert!(collection.remove("b").is_none());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn move_is_a_splice_not_a_swap() {
        let mut collection = numbered(5);
        assert!(collection.move_item(0, 3));
        assert_eq!(ids(&collection), vec!["r1", "r2", "r3", "r0", "r4"]);
        assert!(collection.move_item(4, 1));
        assert_eq!(ids(&collection), vec!["r1", "r4", "r2", "r3", "r0"]);
    }

    #[test]
    fn move_preserves_ids_for_every_valid_pair() {
        let original = numbered(6);
        for from in 0..6 {
            for to in 0..6 {
                if from == to {
                    continue;
                }
                let mut collection = original.clone();
                let moved_id = collection.as_slice()[from].id.clone();
                assert!(collection.move_item(from, to));
                assert_eq!(collection.len(), 6);
                assert_eq!(collection.as_slice()[to].id, moved_id);
                let mut before: Vec<_> = ids(&original);
                let mut after: Vec<_> = ids(&collection);
                before.sort();
                after.sort();
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn move_ignores_equal_or_out_of_range_indices() {
        let mut collection = abc();
        assert!(!collection.move_item(1, 1));
        assert!(!collection.move_item(3, 0));
        assert!(!collection.move_item(0, 7));
        assert_eq!(ids(&collection), vec!["a", "b", "c"]);
    }

    #[test]
    fn duplicate_clears_flags_and_marks_title() {
        let mut collection = abc();
        let mut loading = recipe("l", "L");
        loading.is_image_loading = true;
        collection.insert(loading).unwrap();

        let copy = collection.duplicate("l", "l2").unwrap();
        assert_eq!(copy.title, "L (Cópia)");
        assert!(!copy.is_image_loading);
        assert_eq!(collection.as_slice()[0].id, "l2");
        assert!(collection.duplicate("missing", "x").is_none());
        assert!(collection.duplicate("a", "b").is_none());
    }

    #[test]
    fn move_then_duplicate_scenario() {
        let mut collection = abc();
        collection.move_item(2, 0);
        assert_eq!(ids(&collection), vec!["c", "a", "b"]);

        let copy = collection.duplicate("b", Recipe::new_id()).unwrap();
        assert_ne!(copy.id, "b");
        assert_eq!(copy.title, format!("B{COPY_SUFFIX}"));
        assert_eq!(ids(&collection), vec![copy.id.as_str(), "c", "a", "b"]);
    }

    #[test]
    fn filter_always_keeps_loading_placeholders() {
        let mut collection = abc();
        collection.insert(Recipe::loading_placeholder("p")).unwrap();
        let visible = collection.filter(|_| false);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "p");
    }

    #[test]
    fn query_matches_category_and_text_case_insensitively() {
        let mut soup = recipe("s", "Sopa de Legumes");
        soup.category = Category::MainCourses;
        let mut cake = recipe("k", "Bolo");
        cake.category = Category::Desserts;
        cake.description = "Sem açúcar, com LEGUMES escondidos".to_string();
        let collection = RecipeCollection::from_records(vec![soup, cake]);

        let all = RecipeQuery::new(CategoryFilter::All, "legumes");
        assert_eq!(collection.query(&all).len(), 2);

        let desserts = RecipeQuery::new(CategoryFilter::Only(Category::Desserts), "legumes");
        let found = collection.query(&desserts);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "k");
    }

    #[test]
    fn paginate_slices_and_excludes_placeholders() {
        let mut collection = numbered(7);
        collection.insert(Recipe::loading_placeholder("p")).unwrap();
        let query = RecipeQuery::default();

        let first = collection.paginate(&query, PageRequest::new(0, 3));
        assert_eq!(first.total, 7);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.featured_id.as_deref(), Some("r0"));
        assert!(first.items.iter().all(|r| !r.is_loading));

        let last = collection.paginate(&query, PageRequest::new(2, 3));
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].id, "r6");
        assert_eq!(last.featured_id, None);

        let beyond = collection.paginate(&query, PageRequest::new(9, 3));
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn filtered_first_page_has_no_featured_recipe() {
        let collection = numbered(3);
        let page = collection.paginate(&RecipeQuery::new(CategoryFilter::All, "receita"), PageRequest::new(0, 10));
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.featured_id, None);
    }

    #[test]
    fn page_relative_rows_translate_to_absolute_indices() {
        let mut collection = numbered(25);
        let query = RecipeQuery::default();
        let request = PageRequest::new(1, 10);

        let from = collection.absolute_index(&query, request, 2).unwrap();
        let to = collection.absolute_index(&query, request, 7).unwrap();
        assert_eq!((from, to), (12, 17));

        collection.move_item(from, to);
        assert_eq!(collection.as_slice()[17].id, "r12");
        // rows 2 and 7 of the first page were not touched
        assert_eq!(collection.as_slice()[2].id, "r2");
        assert_eq!(collection.as_slice()[7].id, "r7");
    }

    #[test]
    fn absolute_index_skips_placeholders_and_filtered_records() {
        let mut collection = numbered(4);
        collection.insert(Recipe::loading_placeholder("p")).unwrap();
        let request = PageRequest::new(0, 2);

        assert_eq!(collection.absolute_index(&RecipeQuery::default(), request, 0), Some(1));
        assert_eq!(collection.absolute_index(&RecipeQuery::default(), request, 2), None);

        let query = RecipeQuery::new(CategoryFilter::All, "receita 3");
        assert_eq!(collection.absolute_index(&query, request, 0), Some(4));
        assert_eq!(collection.absolute_index(&query, request, 1), None);
    }

    #[test]
    fn persistable_drops_placeholders_and_strips_flags() {
        let mut collection = abc();
        collection.insert(Recipe::loading_placeholder("p")).unwrap();
        let mut flagged = recipe("f", "F");
        flagged.is_image_loading = true;
        collection.insert(flagged).unwrap();

        let stored = collection.persistable();
        assert_eq!(stored.len(), 4);
        assert!(stored.iter().all(|r| !r.is_loading && !r.is_image_loading));
        assert_eq!(stored[0].id, "f");
    }

    #[test]
    fn from_records_keeps_first_of_repeated_ids() {
        let collection = RecipeCollection::from_records(vec![recipe("a", "1"), recipe("a", "2")]);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get("a").unwrap().title, "1");
    }
}
