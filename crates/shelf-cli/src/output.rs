//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use shelf_core::{Book, Profile, StorageError, Stats};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single book
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", book.id);
                println!("Title:    {}", book.title);
                println!("Author:   {}", book.author);
                println!("Status:   {}", if book.is_read { "read" } else { "unread" });
                if let Some(progress) = book.progress {
                    println!("Progress: {}%", progress);
                }
                if let (Some(read), Some(total)) = (book.read_pages, book.total_pages) {
                    println!("Pages:    {} / {}", read, total);
                }
                println!("Cover:    {}", book.display_cover());
                if let Some(added) = book.added_at_utc() {
                    println!("Added:    {}", added.format("%Y-%m-%d %H:%M"));
                }
                println!();
                println!("{}", book.summary);
            }
            OutputFormat::Json => print_json(book),
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[&Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    println!(
                        "{:<8} | {} {} | {}",
                        short_id(&book.id),
                        if book.is_read { "[x]" } else { "[ ]" },
                        truncate(&book.title, 35),
                        truncate(&book.author, 30)
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => print_json(&books),
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print reading statistics
    pub fn print_stats(&self, profile: &Profile, stats: &Stats) {
        match self.format {
            OutputFormat::Human => {
                println!("Reader:     {}", profile);
                println!("Books:      {}", stats.total_count);
                println!("Read:       {}", stats.read_count);
                println!("Unread:     {}", stats.unread_count());
                println!("Completion: {}%", stats.completion_percent());
                if let (Some(goal), Some(percent)) = (stats.goal, stats.goal_percent()) {
                    println!("Goal:       {} / {} ({}%)", stats.read_count, goal, percent);
                }
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "user_name": profile,
                        "total": stats.total_count,
                        "read": stats.read_count,
                        "unread": stats.unread_count(),
                        "completion_percent": stats.completion_percent(),
                        "goal": stats.goal,
                        "goal_percent": stats.goal_percent(),
                    })
                );
            }
            OutputFormat::Quiet => {
                println!("{}/{}", stats.read_count, stats.total_count);
            }
        }
    }

    /// Print the reader profile
    pub fn print_profile(&self, profile: &Profile) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::json!({ "user_name": profile }));
            }
            OutputFormat::Human | OutputFormat::Quiet => println!("{}", profile),
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Report a change that was kept in memory but not saved
    ///
    /// Always printed to stderr, even in quiet mode.
    pub fn save_warning(&self, error: &StorageError) {
        eprintln!("⚠ Change was not saved: {}", error);
        if let Some(hint) = error.recovery_suggestion() {
            eprintln!("  {}", hint);
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON: {}", e),
    }
}

/// First eight characters of an id
fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("Lecteur Passionné ici", 10), "Lecteur...");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1"), "1");
        assert_eq!(
            short_id("0b5e3c2a-6f1d-4e7b-9a8c-2d4f6e8a0b1c"),
            "0b5e3c2a"
        );
    }
}
