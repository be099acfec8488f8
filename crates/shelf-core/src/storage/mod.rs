//! Storage layer
//!
//! Durable key-value stores backing the persistence gateway.
//!
//! ## Backends
//!
//! - **File**: one atomically written file per entry (default)
//! - **SQLite**: a single database file with a `kv` table
//! - **Memory**: no durability, for tests

pub mod error;
pub mod file;
pub mod kv;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore};
pub use sqlite::SqliteStore;
