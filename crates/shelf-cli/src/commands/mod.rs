//! Command handlers

pub mod backup;
pub mod book;
pub mod config;
pub mod profile;
pub mod stats;

use shelf_core::{KeyValueStore, Library, Persisted};

use crate::output::Output;

/// The library as opened by the CLI, over whichever backend is configured
pub type Shelf = Library<Box<dyn KeyValueStore>>;

/// Unwrap a mutation result, reporting a failed save
fn saved<T>(persisted: Persisted<T>, output: &Output) -> T {
    if let Some(ref e) = persisted.warning {
        output.save_warning(e);
    }
    persisted.value
}
