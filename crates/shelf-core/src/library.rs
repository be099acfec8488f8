//! Library state controller
//!
//! The `Library` owns the catalog and profile for the running process and
//! is the single place they are mutated. Every successful mutation is
//! written through the [`Gateway`] right away.
//!
//! A failed write never undoes the in-memory change: the session keeps
//! working from memory and the caller receives the storage error as a
//! warning on the returned [`Persisted`] value.
//!
//! ## Usage
//!
//! ```ignore
//! let mut library = Library::open()?;  // Loads stored state or seeds defaults
//!
//! let added = library.add_book(NewBook::new("Dune"));
//! let stats = library.stats();
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::catalog::{BookQuery, Catalog, CatalogError};
use crate::config::{Config, StorageBackend};
use crate::gateway::{Gateway, Source};
use crate::models::{Book, BookEdit, NewBook, Profile, Stats};
use crate::snapshot::{ImportError, SnapshotError};
use crate::storage::file::atomic_write;
use crate::storage::{FileStore, KeyValueStore, SqliteStore, StorageError, StorageResult};

/// Version tag written into exported snapshots
pub const APP_VERSION: &str = "v2.0.0-local";

/// Result of a mutation together with the outcome of writing it to storage
#[derive(Debug)]
#[must_use]
pub struct Persisted<T> {
    /// The result of the mutation
    pub value: T,
    /// Set when the mutation could not be written to storage
    pub warning: Option<StorageError>,
}

impl<T> Persisted<T> {
    fn new(value: T, write: StorageResult<()>) -> Self {
        let warning = write.err();
        if let Some(ref e) = warning {
            warn!("Change kept in memory but not saved: {}", e);
        }
        Self { value, warning }
    }

    fn clean(value: T) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    /// Whether the change reached durable storage
    pub fn is_saved(&self) -> bool {
        self.warning.is_none()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

/// What an import replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Number of books in the imported catalog, if the catalog was replaced
    pub books: Option<usize>,
    /// New profile, if the profile was replaced
    pub user_name: Option<Profile>,
    /// Version tag found in the payload
    pub version: Option<String>,
}

/// Open the store selected by `config`
pub fn open_store(config: &Config) -> StorageResult<Box<dyn KeyValueStore>> {
    Ok(match config.storage {
        StorageBackend::File => Box::new(FileStore::new(&config.data_dir)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&config.sqlite_path())?),
    })
}

/// The reader's library: catalog, profile and their persistence
pub struct Library<S> {
    catalog: Catalog,
    profile: Profile,
    gateway: Gateway<S>,
    reading_goal: Option<u32>,
}

impl Library<Box<dyn KeyValueStore>> {
    /// Open the library using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open the library with a specific configuration
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let store = open_store(config)
            .with_context(|| format!("Failed to open {} storage", config.storage))?;
        Ok(Self::open_with_store(store).with_reading_goal(config.reading_goal()))
    }
}

impl<S: KeyValueStore> Library<S> {
    /// Load state from `store`, seeding defaults for anything missing
    ///
    /// Defaults for entries that were never written are saved right away.
    /// Entries that exist but cannot be read are left untouched on disk
    /// until the next change overwrites them.
    pub fn open_with_store(store: S) -> Self {
        let mut gateway = Gateway::new(store);
        let loaded = gateway.load();

        if loaded.catalog_source == Source::Missing {
            if let Err(e) = gateway.persist_catalog(&loaded.catalog) {
                warn!("Failed to save seed catalog: {}", e);
            }
        }
        if loaded.profile_source == Source::Missing {
            if let Err(e) = gateway.persist_profile(&loaded.profile) {
                warn!("Failed to save default profile: {}", e);
            }
        }

        Self {
            catalog: loaded.catalog,
            profile: loaded.profile,
            gateway,
            reading_goal: None,
        }
    }

    /// Set the yearly reading goal reported by [`Library::stats`]
    pub fn with_reading_goal(mut self, goal: Option<u32>) -> Self {
        self.reading_goal = goal;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn gateway(&self) -> &Gateway<S> {
        &self.gateway
    }

    /// Reading statistics, including goal progress when a goal is set
    pub fn stats(&self) -> Stats {
        self.catalog.stats().with_goal(self.reading_goal)
    }

    /// Books whose title or author contains `needle`, ignoring case
    pub fn query(&self, needle: &str) -> BookQuery<'_> {
        self.catalog.query(needle)
    }

    /// The newest `limit` books matching `needle`
    pub fn recent(&self, needle: &str, limit: usize) -> Vec<&Book> {
        self.catalog.recent(needle, limit)
    }

    // ==================== Book Operations ====================

    /// Add a book; `None` if the title is blank
    pub fn add_book(&mut self, draft: NewBook) -> Option<Persisted<Book>> {
        let book = self.catalog.add(draft)?;
        info!("Added book {} ({})", book.id, book.title);
        Some(Persisted::new(book, self.save_catalog()))
    }

    /// Replace the editable fields of a book
    pub fn edit_book(&mut self, id: &str, edit: BookEdit) -> Result<Persisted<Book>, CatalogError> {
        let book = self.catalog.edit(id, edit)?;
        Ok(Persisted::new(book, self.save_catalog()))
    }

    /// Remove a book; removing an unknown id changes nothing
    pub fn remove_book(&mut self, id: &str) -> Persisted<bool> {
        if !self.catalog.remove(id) {
            return Persisted::clean(false);
        }
        info!("Removed book {}", id);
        Persisted::new(true, self.save_catalog())
    }

    /// Flip the read flag of a book
    pub fn toggle_read(&mut self, id: &str) -> Result<Persisted<Book>, CatalogError> {
        let book = self.catalog.toggle_read(id)?;
        Ok(Persisted::new(book, self.save_catalog()))
    }

    // ==================== Profile ====================

    /// Change the display name; `None` if the name is blank
    pub fn set_user_name(&mut self, name: impl Into<String>) -> Option<Persisted<Profile>> {
        let name = name.into();
        if name.trim().is_empty() {
            return None;
        }
        self.profile = Profile::new(name);
        let write = self.gateway.persist_profile(&self.profile);
        Some(Persisted::new(self.profile.clone(), write))
    }

    // ==================== Backup ====================

    /// Serialize a backup of the whole library
    pub fn export_snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        self.gateway
            .export_snapshot(&self.catalog, &self.profile, APP_VERSION)
    }

    /// Write a backup file into `dir`, returning its path
    ///
    /// The file is named `library_<milliseconds>.json`.
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, SnapshotError> {
        let payload = self.export_snapshot()?;
        let path = dir.join(export_file_name(Utc::now().timestamp_millis()));
        atomic_write(&path, &payload)?;
        info!("Exported {} book(s) to {:?}", self.catalog.len(), path);
        Ok(path)
    }

    /// Restore from a backup payload
    ///
    /// Replaces the catalog and/or profile wholesale; parts missing from the
    /// payload are kept. On error nothing changes.
    pub fn import_snapshot(&mut self, payload: &[u8]) -> Result<Persisted<ImportSummary>, ImportError> {
        let imported = self.gateway.import_snapshot(payload)?;

        let mut summary = ImportSummary {
            books: None,
            user_name: None,
            version: imported.version,
        };
        let mut write = Ok(());

        if let Some(catalog) = imported.library {
            summary.books = Some(catalog.len());
            self.catalog = catalog;
            write = self.gateway.persist_catalog(&self.catalog);
        }

        if let Some(profile) = imported.user_name {
            summary.user_name = Some(profile.clone());
            self.profile = profile;
            let profile_write = self.gateway.persist_profile(&self.profile);
            if write.is_ok() {
                write = profile_write;
            }
        }

        info!(
            "Imported snapshot (version {:?}): books={:?}, user_name={:?}",
            summary.version, summary.books, summary.user_name
        );
        Ok(Persisted::new(summary, write))
    }

    /// Restore from a backup file
    ///
    /// Reading the file is the only asynchronous step; parsing and
    /// replacing state happen synchronously once the content is in memory.
    pub async fn import_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Persisted<ImportSummary>, ImportError> {
        let path = path.as_ref();
        let payload = tokio::fs::read(path)
            .await
            .map_err(|source| ImportError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        self.import_snapshot(&payload)
    }

    // ==================== Internal ====================

    fn save_catalog(&mut self) -> StorageResult<()> {
        self.gateway.persist_catalog(&self.catalog)
    }
}

/// Advisory backup file name for a given creation time
pub fn export_file_name(timestamp_millis: i64) -> String {
    format!("library_{}.json", timestamp_millis)
}
