//! Backup snapshots
//!
//! A snapshot is a self-describing JSON document holding the whole library
//! and profile:
//!
//! ```text
//! {
//!   "library": [ { "id": "...", "title": "...", ... } ],
//!   "userName": "Alex",
//!   "version": "v2.0.0-local"
//! }
//! ```
//!
//! Import is tolerant of partial payloads: a missing (or `null`) field
//! leaves the corresponding state untouched.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError};
use crate::models::{Book, Profile};
use crate::storage::StorageError;

/// Top-level snapshot field names
mod keys {
    pub const LIBRARY: &str = "library";
    pub const USER_NAME: &str = "userName";
    pub const VERSION: &str = "version";
}

/// Errors that can occur while exporting a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write snapshot: {0}")]
    Write(#[from] StorageError),
}

/// Errors that can occur while importing a snapshot
///
/// An import that fails never changes any state.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Import file is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Import file must contain a JSON object")]
    NotAnObject,

    #[error("Invalid 'library' in import file: {0}")]
    InvalidLibrary(#[source] serde_json::Error),

    #[error("Invalid 'userName' in import file: expected a string")]
    InvalidUserName,

    #[error("Invalid library in import file: {0}")]
    Library(#[from] CatalogError),

    #[error("Failed to read import file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Borrowed view used when writing a snapshot
#[derive(Serialize)]
struct SnapshotRef<'a> {
    library: &'a [Book],
    #[serde(rename = "userName")]
    user_name: &'a Profile,
    version: &'a str,
}

/// Serialize the full state as pretty-printed JSON
pub fn encode(
    catalog: &Catalog,
    profile: &Profile,
    version: &str,
) -> Result<Vec<u8>, SnapshotError> {
    let snapshot = SnapshotRef {
        library: catalog.books(),
        user_name: profile,
        version,
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}

/// The validated contents of an import payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedSnapshot {
    /// Replacement catalog, if the payload carried one
    pub library: Option<Catalog>,
    /// Replacement profile, if the payload carried a non-blank name
    pub user_name: Option<Profile>,
    /// Version tag of the producing application
    pub version: Option<String>,
}

impl ImportedSnapshot {
    /// Produce the state that results from importing over `catalog` and `profile`
    ///
    /// Each part is replaced wholesale when present and kept otherwise.
    pub fn apply(self, catalog: Catalog, profile: Profile) -> (Catalog, Profile) {
        (
            self.library.unwrap_or(catalog),
            self.user_name.unwrap_or(profile),
        )
    }

    /// Whether importing this snapshot changes nothing
    pub fn is_empty(&self) -> bool {
        self.library.is_none() && self.user_name.is_none()
    }
}

/// Parse and validate an import payload
pub fn decode(payload: &[u8]) -> Result<ImportedSnapshot, ImportError> {
    let value: Value = serde_json::from_slice(payload).map_err(ImportError::Malformed)?;
    let Value::Object(mut fields) = value else {
        return Err(ImportError::NotAnObject);
    };

    let library = match fields.remove(keys::LIBRARY) {
        None | Some(Value::Null) => None,
        Some(raw) => {
            let books: Vec<Book> =
                serde_json::from_value(raw).map_err(ImportError::InvalidLibrary)?;
            Some(Catalog::from_books(books)?)
        }
    };

    let user_name = match fields.remove(keys::USER_NAME) {
        None | Some(Value::Null) => None,
        // Whitespace-only names are kept out of the profile like empty ones
        Some(Value::String(name)) if name.trim().is_empty() => None,
        Some(Value::String(name)) => Some(Profile::new(name)),
        Some(_) => return Err(ImportError::InvalidUserName),
    };

    let version = match fields.remove(keys::VERSION) {
        Some(Value::String(v)) => Some(v),
        _ => None,
    };

    Ok(ImportedSnapshot {
        library,
        user_name,
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewBook;
    use crate::seed;

    #[test]
    fn test_encode_has_exactly_three_fields() {
        let bytes = encode(&seed::default_catalog(), &Profile::new("Alex"), "v2.0.0-local").unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["userName"], "Alex");
        assert_eq!(obj["version"], "v2.0.0-local");
        assert_eq!(obj["library"].as_array().unwrap().len(), 3);
        assert_eq!(obj["library"][0]["isRead"], true);
    }

    #[test]
    fn test_encode_is_human_readable() {
        let bytes = encode(&Catalog::new(), &Profile::new("Alex"), "v1").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains('\n'));
    }

    #[test]
    fn test_roundtrip() {
        let mut catalog = seed::default_catalog();
        let added = catalog.add(NewBook::new("Dune").author("Frank Herbert")).unwrap();
        catalog.toggle_read(&added.id).unwrap();
        let profile = Profile::new("Alex");

        let bytes = encode(&catalog, &profile, "v2.0.0-local").unwrap();
        let imported = decode(&bytes).unwrap();

        assert_eq!(imported.library.as_ref(), Some(&catalog));
        assert_eq!(imported.user_name.as_ref(), Some(&profile));
        assert_eq!(imported.version.as_deref(), Some("v2.0.0-local"));
    }

    #[test]
    fn test_decode_empty_library_and_name() {
        let imported = decode(br#"{"library": [], "userName": "Alex"}"#).unwrap();
        let (catalog, profile) = imported.apply(seed::default_catalog(), seed::default_profile());
        assert!(catalog.is_empty());
        assert_eq!(profile.name(), "Alex");
    }

    #[test]
    fn test_decode_partial_payload_keeps_prior_state() {
        let prior = seed::default_catalog();

        let only_name = decode(br#"{"userName": "Sam"}"#).unwrap();
        assert!(only_name.library.is_none());
        let (catalog, profile) = only_name.apply(prior.clone(), seed::default_profile());
        assert_eq!(catalog, prior);
        assert_eq!(profile.name(), "Sam");

        let nothing = decode(br#"{"library": null, "userName": "  "}"#).unwrap();
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_decode_not_json() {
        assert!(matches!(decode(b"not json"), Err(ImportError::Malformed(_))));
    }

    #[test]
    fn test_decode_not_an_object() {
        assert!(matches!(decode(b"[1, 2, 3]"), Err(ImportError::NotAnObject)));
    }

    #[test]
    fn test_decode_invalid_library() {
        let err = decode(br#"{"library": [{"title": "No id"}]}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidLibrary(_)));

        let err = decode(br#"{"library": "Circe"}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidLibrary(_)));
    }

    #[test]
    fn test_decode_duplicate_ids() {
        let payload = br#"{"library": [
            {"id": "1", "title": "Circe", "addedAt": 0},
            {"id": "1", "title": "Dune", "addedAt": 0}
        ]}"#;
        assert!(matches!(
            decode(payload),
            Err(ImportError::Library(CatalogError::DuplicateId(id))) if id == "1"
        ));
    }

    #[test]
    fn test_decode_invalid_user_name() {
        assert!(matches!(
            decode(br#"{"userName": 42}"#),
            Err(ImportError::InvalidUserName)
        ));
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let imported = decode(br#"{"userName": "Alex", "theme": "dark"}"#).unwrap();
        assert_eq!(imported.user_name, Some(Profile::new("Alex")));
    }
}
