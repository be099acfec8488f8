//! Data models for Shelf
//!
//! Defines the core data structures: Book, the drafts used to create and
//! edit books, the reader Profile, and derived Stats.
//!
//! Field names serialize as camelCase so backups written by earlier
//! versions of the app import unchanged.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder author for books added without one
pub const UNKNOWN_AUTHOR: &str = "Unknown author";

/// Placeholder summary for books added without one
pub const NO_DESCRIPTION: &str = "No description.";

/// Cover image used when a book has no cover of its own
pub const DEFAULT_COVER_URL: &str =
    "https://images.unsplash.com/photo-1543005127-837384a37b3b?auto=format&fit=crop&q=80&w=400";

/// A cataloged book
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Unique identifier (opaque, never changes)
    pub id: String,
    /// Book title
    pub title: String,
    /// Author display name
    #[serde(default)]
    pub author: String,
    /// Cover image URI, stored as given
    #[serde(default)]
    pub cover_url: String,
    /// Short description
    #[serde(default)]
    pub summary: String,
    /// Whether the book has been read
    #[serde(default)]
    pub is_read: bool,
    /// Reading progress in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    /// Page count of the book
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    /// Pages read so far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_pages: Option<u32>,
    /// When this book was added (milliseconds since the Unix epoch)
    pub added_at: i64,
}

impl Book {
    /// When this book was added, as a UTC timestamp
    ///
    /// Returns `None` for timestamps chrono cannot represent.
    pub fn added_at_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.added_at).single()
    }

    /// Cover URI to display, falling back to the default cover
    pub fn display_cover(&self) -> &str {
        if self.cover_url.trim().is_empty() {
            DEFAULT_COVER_URL
        } else {
            &self.cover_url
        }
    }

    /// Case-insensitive substring match against title or author
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.author.to_lowercase().contains(needle)
    }
}

/// Fields supplied when adding a book
///
/// Anything left empty is replaced by a placeholder in [`NewBook::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub summary: String,
}

impl NewBook {
    /// Create a draft with only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the cover URI
    pub fn cover_url(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    /// Set the summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Whether this draft may become a book
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Turn the draft into a book record, applying placeholder defaults
    ///
    /// Returns `None` when the title is blank.
    pub fn normalize(self, id: String, added_at: i64) -> Option<Book> {
        if !self.is_valid() {
            return None;
        }

        Some(Book {
            id,
            title: self.title,
            author: or_placeholder(self.author, UNKNOWN_AUTHOR),
            cover_url: or_placeholder(self.cover_url, DEFAULT_COVER_URL),
            summary: or_placeholder(self.summary, NO_DESCRIPTION),
            is_read: false,
            progress: None,
            total_pages: None,
            read_pages: None,
            added_at,
        })
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

/// Replacement values for the editable fields of a book
///
/// Applied verbatim: an empty string stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookEdit {
    pub title: String,
    pub author: String,
    pub cover_url: String,
    pub summary: String,
}

impl BookEdit {
    /// Start an edit from the current values of a book
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            cover_url: book.cover_url.clone(),
            summary: book.summary.clone(),
        }
    }
}

/// The reader's display name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Profile(pub String);

impl Profile {
    /// Create a profile
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Profile {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Profile {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Aggregate reading progress over a catalog
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total_count: usize,
    pub read_count: usize,
    /// Yearly reading goal, if one is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<u32>,
}

impl Stats {
    pub fn unread_count(&self) -> usize {
        self.total_count.saturating_sub(self.read_count)
    }

    /// Share of books read, rounded to the nearest percent (0 for an empty catalog)
    pub fn completion_percent(&self) -> u32 {
        percent(self.read_count, self.total_count)
    }

    /// Progress towards the reading goal, capped at 100
    pub fn goal_percent(&self) -> Option<u32> {
        self.goal
            .map(|goal| percent(self.read_count, goal as usize).min(100))
    }

    pub fn with_goal(mut self, goal: Option<u32>) -> Self {
        self.goal = goal;
        self
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: &str, title: &str, is_read: bool) -> Book {
        NewBook::new(title)
            .normalize(id.to_string(), 0)
            .map(|mut b| {
                b.is_read = is_read;
                b
            })
            .unwrap()
    }

    #[test]
    fn test_normalize_applies_placeholders() {
        let book = NewBook::new("Dune").normalize("x".into(), 42).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert_eq!(book.cover_url, DEFAULT_COVER_URL);
        assert_eq!(book.summary, NO_DESCRIPTION);
        assert!(!book.is_read);
        assert_eq!(book.added_at, 42);
    }

    #[test]
    fn test_normalize_keeps_supplied_fields() {
        let book = NewBook::new("Dune")
            .author("Frank Herbert")
            .cover_url("https://covers.example/dune.jpg")
            .summary("Spice.")
            .normalize("x".into(), 0)
            .unwrap();
        assert_eq!(book.author, "Frank Herbert");
        assert_eq!(book.cover_url, "https://covers.example/dune.jpg");
        assert_eq!(book.summary, "Spice.");
    }

    #[test]
    fn test_normalize_rejects_blank_title() {
        assert!(NewBook::new("").normalize("x".into(), 0).is_none());
        assert!(NewBook::new("   \t").normalize("x".into(), 0).is_none());
    }

    #[test]
    fn test_display_cover_fallback() {
        let mut b = book("1", "Circe", true);
        b.cover_url = String::new();
        assert_eq!(b.display_cover(), DEFAULT_COVER_URL);
        b.cover_url = "https://covers.example/circe.jpg".into();
        assert_eq!(b.display_cover(), "https://covers.example/circe.jpg");
    }

    #[test]
    fn test_book_wire_format_is_camel_case() {
        let b = book("1", "Circe", true);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["coverUrl"], DEFAULT_COVER_URL);
        assert_eq!(json["isRead"], true);
        assert_eq!(json["addedAt"], 0);
        assert!(json.get("progress").is_none());
    }

    #[test]
    fn test_book_deserialize_tolerates_missing_optional_fields() {
        let json = r#"{"id":"7","title":"Beloved","addedAt":1700000000000,"totalPages":324}"#;
        let b: Book = serde_json::from_str(json).unwrap();
        assert_eq!(b.id, "7");
        assert!(b.author.is_empty());
        assert!(!b.is_read);
        assert_eq!(b.total_pages, Some(324));
    }

    #[test]
    fn test_book_deserialize_requires_title() {
        let json = r#"{"id":"7","addedAt":0}"#;
        assert!(serde_json::from_str::<Book>(json).is_err());
    }

    #[test]
    fn test_added_at_utc() {
        let mut b = book("1", "Circe", false);
        b.added_at = 1_700_000_000_000;
        assert_eq!(b.added_at_utc().unwrap().timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_profile_display() {
        let profile = Profile::new("Alex");
        assert_eq!(format!("{}", profile), "Alex");
        assert_eq!(profile.name(), "Alex");
        assert_eq!(serde_json::to_string(&profile).unwrap(), "\"Alex\"");
    }

    #[test]
    fn test_stats_percentages() {
        let stats = Stats {
            total_count: 3,
            read_count: 1,
            goal: Some(24),
        };
        assert_eq!(stats.unread_count(), 2);
        assert_eq!(stats.completion_percent(), 33);
        assert_eq!(stats.goal_percent(), Some(4));
    }

    #[test]
    fn test_stats_empty_is_zero_percent() {
        let stats = Stats {
            total_count: 0,
            read_count: 0,
            goal: Some(0),
        };
        assert_eq!(stats.completion_percent(), 0);
        assert_eq!(stats.goal_percent(), Some(0));
    }

    #[test]
    fn test_stats_unread_never_underflows() {
        let stats = Stats {
            total_count: 1,
            read_count: 3,
            goal: None,
        };
        assert_eq!(stats.unread_count(), 0);
    }
}
