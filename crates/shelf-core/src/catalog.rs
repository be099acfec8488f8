//! The in-memory book catalog
//!
//! A `Catalog` is an ordered, id-unique sequence of books, newest first.
//! Every operation here is pure state manipulation; persistence is handled
//! by [`crate::gateway::Gateway`].

use std::collections::HashSet;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Book, BookEdit, NewBook, Stats};

/// Errors reported by catalog operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Ambiguous book id '{prefix}': matches {}", .matches.join(", "))]
    Ambiguous { prefix: String, matches: Vec<String> },

    #[error("Duplicate book id: {0}")]
    DuplicateId(String),
}

/// Ordered collection of books with unique ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    books: Vec<Book>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from existing records, keeping their order
    ///
    /// Fails if two records share an id.
    pub fn from_books(books: Vec<Book>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(books.len());
        for book in &books {
            if !seen.insert(book.id.as_str()) {
                return Err(CatalogError::DuplicateId(book.id.clone()));
            }
        }
        Ok(Self { books })
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// All books in display order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Book> {
        self.books.iter()
    }

    /// Get a book by exact id
    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    /// Find a book by exact id or unique id prefix
    pub fn resolve_prefix(&self, prefix: &str) -> Result<&Book, CatalogError> {
        if let Some(book) = self.get(prefix) {
            return Ok(book);
        }

        let matches: Vec<&Book> = if prefix.is_empty() {
            Vec::new()
        } else {
            self.books.iter().filter(|b| b.id.starts_with(prefix)).collect()
        };

        match matches.as_slice() {
            [] => Err(CatalogError::NotFound(prefix.to_string())),
            [book] => Ok(book),
            _ => Err(CatalogError::Ambiguous {
                prefix: prefix.to_string(),
                matches: matches.iter().map(|b| b.id.clone()).collect(),
            }),
        }
    }

    /// Add a new book at the front of the catalog
    ///
    /// Returns `None` without touching the catalog when the title is blank.
    pub fn add(&mut self, draft: NewBook) -> Option<Book> {
        if !draft.is_valid() {
            return None;
        }
        let id = self.fresh_id();
        let book = draft.normalize(id, Utc::now().timestamp_millis())?;
        self.books.insert(0, book.clone());
        Some(book)
    }

    /// Replace the editable fields of a book
    pub fn edit(&mut self, id: &str, edit: BookEdit) -> Result<Book, CatalogError> {
        let book = self.get_mut(id)?;
        book.title = edit.title;
        book.author = edit.author;
        book.cover_url = edit.cover_url;
        book.summary = edit.summary;
        Ok(book.clone())
    }

    /// Remove a book, returning whether anything was removed
    pub fn remove(&mut self, id: &str) -> bool {
        match self.books.iter().position(|b| b.id == id) {
            Some(pos) => {
                self.books.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Flip the read flag of a book
    pub fn toggle_read(&mut self, id: &str) -> Result<Book, CatalogError> {
        let book = self.get_mut(id)?;
        book.is_read = !book.is_read;
        Ok(book.clone())
    }

    /// Filter by case-insensitive substring of title or author
    pub fn query(&self, needle: &str) -> BookQuery<'_> {
        BookQuery {
            books: &self.books,
            needle: needle.to_lowercase(),
        }
    }

    /// The first `limit` books matching `needle`
    pub fn recent(&self, needle: &str, limit: usize) -> Vec<&Book> {
        self.query(needle).iter().take(limit).collect()
    }

    /// Read counts for the current catalog
    pub fn stats(&self) -> Stats {
        Stats {
            total_count: self.books.len(),
            read_count: self.books.iter().filter(|b| b.is_read).count(),
            goal: None,
        }
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Book, CatalogError> {
        self.books
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Book;
    type IntoIter = std::slice::Iter<'a, Book>;

    fn into_iter(self) -> Self::IntoIter {
        self.books.iter()
    }
}

/// A filtered, read-only view over a catalog
///
/// Nothing is evaluated until iterated; each call to [`BookQuery::iter`]
/// starts from the beginning again.
#[derive(Debug, Clone)]
pub struct BookQuery<'a> {
    books: &'a [Book],
    needle: String,
}

impl<'a> BookQuery<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a Book> + '_ {
        self.books
            .iter()
            .filter(move |b| b.matches_lowercase(&self.needle))
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn to_vec(&self) -> Vec<Book> {
        self.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UNKNOWN_AUTHOR;

    fn record(id: &str, title: &str, author: &str, is_read: bool) -> Book {
        Book {
            id: id.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            cover_url: String::new(),
            summary: String::new(),
            is_read,
            progress: None,
            total_pages: None,
            read_pages: None,
            added_at: 0,
        }
    }

    fn sample() -> Catalog {
        Catalog::from_books(vec![
            record("1", "Circe", "Madeline Miller", true),
            record("2", "Atomic Habits", "James Clear", false),
        ])
        .unwrap()
    }

    fn ids(catalog: &Catalog) -> HashSet<String> {
        catalog.iter().map(|b| b.id.clone()).collect()
    }

    fn assert_unique_ids(catalog: &Catalog) {
        assert_eq!(ids(catalog).len(), catalog.len());
    }

    #[test]
    fn test_add_prepends_with_defaults() {
        let mut catalog = sample();
        let before = catalog.len();

        let book = catalog.add(NewBook::new("Dune")).unwrap();

        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert!(!book.is_read);
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.books()[0], book);
        assert!(book.added_at > 0);
    }

    #[test]
    fn test_add_blank_title_is_skipped() {
        let mut catalog = sample();
        assert!(catalog.add(NewBook::new("  ")).is_none());
        assert_eq!(catalog, sample());
    }

    #[test]
    fn test_add_then_remove_restores_ids() {
        let mut catalog = sample();
        let original = ids(&catalog);

        let book = catalog.add(NewBook::new("Dune")).unwrap();
        assert!(catalog.remove(&book.id));

        assert_eq!(ids(&catalog), original);
    }

    #[test]
    fn test_add_generates_distinct_ids() {
        let mut catalog = Catalog::new();
        for i in 0..100 {
            catalog.add(NewBook::new(format!("Book {}", i))).unwrap();
        }
        assert_eq!(catalog.len(), 100);
        assert_unique_ids(&catalog);
    }

    #[test]
    fn test_edit_replaces_fields_verbatim() {
        let mut catalog = sample();
        let edit = BookEdit {
            title: "Circe (2nd ed.)".into(),
            author: String::new(),
            cover_url: "https://covers.example/circe.jpg".into(),
            summary: "Retold.".into(),
        };

        let book = catalog.edit("1", edit).unwrap();

        assert_eq!(book.title, "Circe (2nd ed.)");
        assert_eq!(book.author, "");
        assert!(book.is_read);
        assert_eq!(book.id, "1");
        assert_eq!(catalog.get("1"), Some(&book));
    }

    #[test]
    fn test_edit_missing_id_is_not_found() {
        let mut catalog = sample();
        let err = catalog
            .edit("missing-id", BookEdit::default())
            .unwrap_err();
        assert_eq!(err, CatalogError::NotFound("missing-id".into()));
        assert_eq!(catalog, sample());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut catalog = sample();
        assert!(!catalog.remove("nope"));
        assert_eq!(catalog, sample());
    }

    #[test]
    fn test_toggle_read_is_involution() {
        let mut catalog = sample();
        assert!(!catalog.toggle_read("1").unwrap().is_read);
        assert!(catalog.toggle_read("1").unwrap().is_read);
        assert_eq!(catalog, sample());
    }

    #[test]
    fn test_toggle_read_missing_id() {
        let mut catalog = sample();
        assert!(matches!(
            catalog.toggle_read("9"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_mixed_operations_keep_ids_unique() {
        let mut catalog = sample();
        for i in 0..20 {
            let book = catalog.add(NewBook::new(format!("Book {}", i))).unwrap();
            if i % 3 == 0 {
                catalog.toggle_read(&book.id).unwrap();
            }
            if i % 4 == 0 {
                let edit = BookEdit::from_book(&book);
                catalog.edit(&book.id, edit).unwrap();
            }
            if i % 5 == 0 {
                catalog.remove(&book.id);
            }
            assert_unique_ids(&catalog);
        }
    }

    #[test]
    fn test_from_books_rejects_duplicates() {
        let err = Catalog::from_books(vec![
            record("1", "Circe", "", false),
            record("1", "Dune", "", false),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("1".into()));
    }

    #[test]
    fn test_query_matches_title_or_author_case_insensitive() {
        let catalog = sample();

        let by_title: Vec<_> = catalog.query("CIRCE").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(by_title, vec!["1"]);

        let by_author: Vec<_> = catalog.query("clear").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(by_author, vec!["2"]);

        assert_eq!(catalog.query("").count(), 2);
        assert_eq!(catalog.query("tolkien").count(), 0);
    }

    #[test]
    fn test_query_whitespace_is_part_of_the_needle() {
        let catalog = Catalog::from_books(vec![
            record("1", "Dune", "Herbert", false),
            record("2", "Atomic Habits", "Clear", false),
        ])
        .unwrap();

        let spaced: Vec<_> = catalog.query(" ").iter().map(|b| b.id.as_str()).collect();
        assert_eq!(spaced, vec!["2"]);

        assert_eq!(catalog.query("dune ").count(), 0);
        assert_eq!(catalog.query("c h").count(), 1);
    }

    #[test]
    fn test_query_is_restartable() {
        let catalog = sample();
        let query = catalog.query("i");
        let first: Vec<_> = query.iter().collect();
        let second: Vec<_> = query.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_recent_limits_results() {
        let mut catalog = sample();
        catalog.add(NewBook::new("Dune")).unwrap();
        let recent = catalog.recent("", 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].title, "Dune");
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.total_count, 2);
        assert_eq!(stats.read_count, 1);
        assert_eq!(stats.completion_percent(), 50);
    }

    #[test]
    fn test_stats_empty() {
        let stats = Catalog::new().stats();
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.completion_percent(), 0);
    }

    #[test]
    fn test_resolve_prefix() {
        let catalog = Catalog::from_books(vec![
            record("abc123", "Circe", "", false),
            record("abd456", "Dune", "", false),
        ])
        .unwrap();

        assert_eq!(catalog.resolve_prefix("abc").unwrap().title, "Circe");
        assert_eq!(catalog.resolve_prefix("abd456").unwrap().title, "Dune");
        assert!(matches!(
            catalog.resolve_prefix("ab"),
            Err(CatalogError::Ambiguous { .. })
        ));
        assert!(matches!(
            catalog.resolve_prefix("zz"),
            Err(CatalogError::NotFound(_))
        ));
    }
}
