//! Shelf Core Library
//!
//! This crate provides the core functionality for Shelf, a local-first
//! personal reading tracker: a catalog of books, the reader's profile,
//! and their persistence.
//!
//! # Architecture
//!
//! - **Catalog**: in-memory source of truth for the book list
//! - **Gateway**: moves state to and from a durable key-value store
//! - **Library**: owns the state and writes through after every change
//!
//! # Quick Start
//!
//! ```text
//! let mut library = Library::open()?;
//!
//! // Add a book
//! library.add_book(NewBook::new("Dune").author("Frank Herbert"));
//!
//! // Query books
//! let matches = library.query("herbert").to_vec();
//! ```
//!
//! # Modules
//!
//! - `library`: State controller (main entry point)
//! - `catalog`: Book list operations and queries
//! - `models`: Data structures for books, profile and stats
//! - `gateway`: Load and persist state, export and import snapshots
//! - `snapshot`: Backup file format
//! - `storage`: Key-value store backends
//! - `seed`: Defaults for a first run
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod library;
pub mod models;
pub mod seed;
pub mod snapshot;
pub mod storage;

pub use catalog::{BookQuery, Catalog, CatalogError};
pub use config::{Config, ConfigKey, StorageBackend};
pub use gateway::{Gateway, Loaded, Source};
pub use library::{ImportSummary, Library, Persisted, APP_VERSION};
pub use models::{Book, BookEdit, NewBook, Profile, Stats};
pub use snapshot::{ImportError, ImportedSnapshot, SnapshotError};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StorageError, StorageResult};
