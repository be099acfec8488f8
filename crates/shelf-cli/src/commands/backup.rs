//! Export and import command handlers
//!
//! Backups are pretty-printed JSON files holding the whole library and the
//! reader's name. They can be moved between machines and storage backends.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{saved, Shelf};
use crate::output::{Output, OutputFormat};

/// Write a backup file into `out` (the current directory by default)
pub fn export(library: &Shelf, out: Option<PathBuf>, output: &Output) -> Result<()> {
    let dir = out.unwrap_or_else(|| PathBuf::from("."));
    let path = library
        .export_to(&dir)
        .with_context(|| format!("Failed to export to {}", dir.display()))?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "path": path,
                    "books": library.catalog().len(),
                })
            );
        }
        OutputFormat::Quiet => println!("{}", path.display()),
        OutputFormat::Human => output.success(&format!(
            "Exported {} book(s) to {}",
            library.catalog().len(),
            path.display()
        )),
    }
    Ok(())
}

/// Restore from a backup file
pub async fn import(library: &mut Shelf, file: PathBuf, output: &Output) -> Result<()> {
    let imported = library
        .import_file(&file)
        .await
        .with_context(|| format!("Failed to import {}", file.display()))?;
    let summary = saved(imported, output);

    if summary.books.is_none() && summary.user_name.is_none() {
        output.message("Nothing to import; library unchanged.");
        return Ok(());
    }

    if let Some(count) = summary.books {
        output.success(&format!("Imported {} book(s)", count));
    }
    if let Some(ref name) = summary.user_name {
        output.success(&format!("Name set to {}", name));
    }
    Ok(())
}
