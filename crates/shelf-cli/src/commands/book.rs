//! Book command handlers

use anyhow::{bail, Context, Result};

use shelf_core::{Book, BookEdit, CatalogError, NewBook};

use super::{saved, Shelf};
use crate::editor::{confirm, is_interactive, prompt_with_default};
use crate::output::Output;

/// Fields given on the command line for `add` and `edit`
#[derive(Debug, Default)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub summary: Option<String>,
}

impl BookFields {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.cover.is_none()
            && self.summary.is_none()
    }

    fn apply(self, edit: &mut BookEdit) {
        if let Some(title) = self.title {
            edit.title = title;
        }
        if let Some(author) = self.author {
            edit.author = author;
        }
        if let Some(cover) = self.cover {
            edit.cover_url = cover;
        }
        if let Some(summary) = self.summary {
            edit.summary = summary;
        }
    }
}

/// Add a new book
pub fn add(library: &mut Shelf, title: String, fields: BookFields, output: &Output) -> Result<()> {
    let mut draft = NewBook::new(title);
    if let Some(author) = fields.author {
        draft = draft.author(author);
    }
    if let Some(cover) = fields.cover {
        draft = draft.cover_url(cover);
    }
    if let Some(summary) = fields.summary {
        draft = draft.summary(summary);
    }

    let Some(added) = library.add_book(draft) else {
        bail!("Book title cannot be empty");
    };
    let book = saved(added, output);

    if output.should_prompt() {
        output.success(&format!("Added book: {} ({})", book.title, book.id));
    } else {
        output.print_book(&book);
    }
    Ok(())
}

/// List books, optionally filtered by title or author
pub fn list(library: &Shelf, query: Option<String>, output: &Output) -> Result<()> {
    let books: Vec<&Book> = library.query(query.as_deref().unwrap_or("")).iter().collect();
    output.print_books(&books);
    Ok(())
}

/// List the most recently added books
pub fn recent(library: &Shelf, query: Option<String>, limit: usize, output: &Output) -> Result<()> {
    let books = library.recent(query.as_deref().unwrap_or(""), limit);
    output.print_books(&books);
    Ok(())
}

/// Show book details
pub fn show(library: &Shelf, id: String, output: &Output) -> Result<()> {
    let book = resolve(library, &id)?;
    output.print_book(book);
    Ok(())
}

/// Edit a book
///
/// Fields given as flags are applied directly. With no flags, each field
/// is prompted for interactively.
pub fn edit(library: &mut Shelf, id: String, fields: BookFields, output: &Output) -> Result<()> {
    let book = resolve(library, &id)?;
    let id = book.id.clone();
    let mut edit = BookEdit::from_book(book);

    if fields.is_empty() {
        if !output.should_prompt() || !is_interactive() {
            bail!("Nothing to edit. Pass --title, --author, --cover or --summary.");
        }
        prompt_edit(&id, &mut edit)?;
    } else {
        fields.apply(&mut edit);
    }

    let updated = library
        .edit_book(&id, edit)
        .context("Failed to update book")?;
    let book = saved(updated, output);

    output.success("Book updated");
    output.print_book(&book);
    Ok(())
}

fn prompt_edit(id: &str, edit: &mut BookEdit) -> Result<()> {
    println!("Editing book: {}", id);
    println!("Press Enter to keep current value, or type new value.\n");

    if let Some(title) = prompt_with_default("Title", &edit.title)? {
        edit.title = title;
    }
    if let Some(author) = prompt_with_default("Author", &edit.author)? {
        edit.author = author;
    }
    if let Some(cover) = prompt_with_default("Cover URL", &edit.cover_url)? {
        edit.cover_url = cover;
    }
    if let Some(summary) = prompt_with_default("Summary", &edit.summary)? {
        edit.summary = summary;
    }
    Ok(())
}

/// Flip the read status of a book
pub fn toggle(library: &mut Shelf, id: String, output: &Output) -> Result<()> {
    let id = resolve(library, &id)?.id.clone();
    let toggled = library.toggle_read(&id).context("Failed to update book")?;
    let book = saved(toggled, output);

    let status = if book.is_read { "read" } else { "unread" };
    output.success(&format!("Marked as {}: {}", status, book.title));
    Ok(())
}

/// Delete a book
pub fn delete(library: &mut Shelf, id: String, yes: bool, output: &Output) -> Result<()> {
    let book = resolve(library, &id)?;
    let id = book.id.clone();

    // Confirm deletion
    if !yes && output.should_prompt() {
        println!("Delete book: {} - {}", book.id, book.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    saved(library.remove_book(&id), output);
    output.success(&format!("Deleted book: {}", id));
    Ok(())
}

/// Find a book by full id or unique prefix
fn resolve<'a>(library: &'a Shelf, id: &str) -> Result<&'a Book> {
    match library.catalog().resolve_prefix(id) {
        Ok(book) => Ok(book),
        Err(CatalogError::Ambiguous { matches, .. }) => {
            eprintln!("Multiple books match '{}':", id);
            for book_id in &matches {
                if let Some(book) = library.catalog().get(book_id) {
                    eprintln!("  {} - {}", book.id, book.title);
                }
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_apply_only_given_values() {
        let mut edit = BookEdit {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            cover_url: String::new(),
            summary: "Spice".to_string(),
        };

        BookFields {
            author: Some(String::new()),
            cover: Some("file:///covers/dune.jpg".to_string()),
            ..BookFields::default()
        }
        .apply(&mut edit);

        assert_eq!(edit.title, "Dune");
        assert_eq!(edit.author, "");
        assert_eq!(edit.cover_url, "file:///covers/dune.jpg");
        assert_eq!(edit.summary, "Spice");
    }

    #[test]
    fn test_fields_is_empty() {
        assert!(BookFields::default().is_empty());
        assert!(!BookFields {
            summary: Some("x".to_string()),
            ..BookFields::default()
        }
        .is_empty());
    }
}
