//! Persistence gateway
//!
//! Moves catalog and profile state between memory and a [`KeyValueStore`],
//! and between memory and backup snapshots.
//!
//! The store holds two entries, each always a complete snapshot of its value:
//!
//! - `library` - JSON array of books
//! - `user_name` - the profile name as plain text
//!
//! A missing or unreadable entry is never fatal: loading falls back to the
//! seed catalog or the default profile.

use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::models::{Book, Profile};
use crate::seed;
use crate::snapshot::{self, ImportError, ImportedSnapshot, SnapshotError};
use crate::storage::{KeyValueStore, StorageError, StorageResult};

/// Store key for the catalog entry
pub const LIBRARY_KEY: &str = "library";

/// Store key for the profile entry
pub const USER_NAME_KEY: &str = "user_name";

/// Where a loaded value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Read from the store
    Stored,
    /// Default substituted because the entry was never written
    Missing,
    /// Default substituted because the stored entry was unusable
    Recovered,
}

/// State read at startup
#[derive(Debug, Clone)]
pub struct Loaded {
    pub catalog: Catalog,
    pub profile: Profile,
    pub catalog_source: Source,
    pub profile_source: Source,
}

/// Persistence gateway over a key-value store
pub struct Gateway<S> {
    store: S,
}

impl<S: KeyValueStore> Gateway<S> {
    /// Create a gateway writing to `store`
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read catalog and profile, substituting defaults where needed
    pub fn load(&self) -> Loaded {
        let (catalog, catalog_source) = match self.load_catalog() {
            Ok(Some(catalog)) => (catalog, Source::Stored),
            Ok(None) => {
                debug!("No stored library, using seed catalog");
                (seed::default_catalog(), Source::Missing)
            }
            Err(e) => {
                warn!("Stored library is unusable, using seed catalog: {}", e);
                (seed::default_catalog(), Source::Recovered)
            }
        };

        let (profile, profile_source) = match self.load_profile() {
            Ok(Some(profile)) => (profile, Source::Stored),
            Ok(None) => (seed::default_profile(), Source::Missing),
            Err(e) => {
                warn!("Stored profile is unusable, using default: {}", e);
                (seed::default_profile(), Source::Recovered)
            }
        };

        info!(
            "Loaded {} book(s) ({:?}) for '{}' ({:?})",
            catalog.len(),
            catalog_source,
            profile,
            profile_source
        );

        Loaded {
            catalog,
            profile,
            catalog_source,
            profile_source,
        }
    }

    fn load_catalog(&self) -> Result<Option<Catalog>, LoadError> {
        let Some(raw) = self.store.get(LIBRARY_KEY)? else {
            return Ok(None);
        };
        let books: Vec<Book> = serde_json::from_str(&raw)?;
        Ok(Some(Catalog::from_books(books)?))
    }

    fn load_profile(&self) -> Result<Option<Profile>, LoadError> {
        let name = self.store.get(USER_NAME_KEY)?;
        Ok(name
            .filter(|n| !n.trim().is_empty())
            .map(Profile::new))
    }

    /// Overwrite the stored catalog with `catalog`
    pub fn persist_catalog(&mut self, catalog: &Catalog) -> StorageResult<()> {
        let json = serde_json::to_string(catalog.books()).map_err(|source| StorageError::Encode {
            key: LIBRARY_KEY.to_string(),
            source,
        })?;
        self.store.put(LIBRARY_KEY, &json)?;
        debug!("Persisted {} book(s)", catalog.len());
        Ok(())
    }

    /// Overwrite the stored profile with `profile`
    pub fn persist_profile(&mut self, profile: &Profile) -> StorageResult<()> {
        self.store.put(USER_NAME_KEY, profile.name())
    }

    /// Serialize a backup of catalog and profile
    pub fn export_snapshot(
        &self,
        catalog: &Catalog,
        profile: &Profile,
        version: &str,
    ) -> Result<Vec<u8>, SnapshotError> {
        snapshot::encode(catalog, profile, version)
    }

    /// Parse and validate a backup
    ///
    /// Nothing is written; the caller decides what to replace.
    pub fn import_snapshot(&self, payload: &[u8]) -> Result<ImportedSnapshot, ImportError> {
        snapshot::decode(payload)
    }
}

/// Reasons a stored entry could not be used
#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Catalog(#[from] crate::catalog::CatalogError),
}
