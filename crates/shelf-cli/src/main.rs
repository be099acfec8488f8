//! Shelf CLI
//!
//! Command-line interface for Shelf - a personal reading tracker.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use shelf_core::{Config, Library};

mod commands;
mod editor;
mod logging;
mod output;

use commands::book::BookFields;
use commands::Shelf;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - Local-first reading tracker")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a book
    Add {
        /// Book title
        title: String,
        #[arg(short, long)]
        author: Option<String>,
        /// Cover image URL
        #[arg(short, long)]
        cover: Option<String>,
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// List books, optionally matching title or author
    #[command(alias = "ls")]
    List {
        /// Text to search for in title or author
        query: Option<String>,
    },
    /// Show the most recently added books
    Recent {
        /// Text to search for in title or author
        query: Option<String>,
        /// Maximum number of books to show
        #[arg(short = 'n', long, default_value_t = 6)]
        limit: usize,
    },
    /// Show book details
    Show {
        /// Book ID (full ID or prefix)
        id: String,
    },
    /// Edit a book (prompts for each field when no flag is given)
    Edit {
        /// Book ID (full ID or prefix)
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        author: Option<String>,
        /// Cover image URL
        #[arg(short, long)]
        cover: Option<String>,
        #[arg(short, long)]
        summary: Option<String>,
    },
    /// Mark a book as read, or as unread again
    #[command(alias = "read")]
    Toggle {
        /// Book ID (full ID or prefix)
        id: String,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full ID or prefix)
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show reading statistics
    Stats,
    /// Show or change the reader's name
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Write a backup file
    Export {
        /// Directory to write the backup into
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Restore from a backup file
    Import {
        /// Backup file to read
        file: PathBuf,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the reader's name
    Show,
    /// Change the reader's name
    Set {
        /// New display name
        name: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, storage, reading_goal, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));
    let config_path = cli.config.as_ref();

    // Config commands work on the file alone
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), config_path, &output);
    }

    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;
    logging::init(&config);
    debug!("Using {} storage in {:?}", config.storage, config.data_dir);

    let mut library = Library::open_with_config(&config)?;

    match cli.command {
        None => commands::book::list(&library, None, &output),
        Some(command) => run(command, &mut library, &output).await,
    }
}

async fn run(command: Commands, library: &mut Shelf, output: &Output) -> Result<()> {
    match command {
        Commands::Add {
            title,
            author,
            cover,
            summary,
        } => {
            let fields = BookFields {
                title: None,
                author,
                cover,
                summary,
            };
            commands::book::add(library, title, fields, output)
        }
        Commands::List { query } => commands::book::list(library, query, output),
        Commands::Recent { query, limit } => commands::book::recent(library, query, limit, output),
        Commands::Show { id } => commands::book::show(library, id, output),
        Commands::Edit {
            id,
            title,
            author,
            cover,
            summary,
        } => {
            let fields = BookFields {
                title,
                author,
                cover,
                summary,
            };
            commands::book::edit(library, id, fields, output)
        }
        Commands::Toggle { id } => commands::book::toggle(library, id, output),
        Commands::Delete { id, yes } => commands::book::delete(library, id, yes, output),
        Commands::Stats => commands::stats::show(library, output),
        Commands::Profile { command } => match command {
            Some(ProfileCommands::Show) | None => commands::profile::show(library, output),
            Some(ProfileCommands::Set { name }) => commands::profile::set(library, name, output),
        },
        Commands::Export { out } => commands::backup::export(library, out, output),
        Commands::Import { file } => commands::backup::import(library, file, output).await,
        Commands::Config { .. } => unreachable!(), // Handled in main
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
