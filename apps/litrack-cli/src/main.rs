//! litrack - literature list viewer
//!
//! Unlocks the shared-password gate, activates synchronization against an
//! in-process collection and prints the projected list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use litrack_core::domain::{EntryField, LiteratureEntry};
use litrack_core::{
    status_counts, write_csv, AccessGate, Fields, LitrackConfig, MemoryCollection,
    MemorySessionStore, SortConfig, StaticIdentity, StatusFilter, SyncController,
    ViewModelStore,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// litrack - shared literature list
#[derive(Parser, Debug)]
#[command(name = "litrack")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Shared password
    #[arg(short, long, env = "LITRACK_PASSWORD", hide_env_values = true)]
    password: String,

    /// JSON file with an array of entries to seed the collection
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Case-insensitive substring matched against every field
    #[arg(short, long, default_value = "")]
    search: String,

    /// Status label to show, or "All"
    #[arg(long, default_value = "All")]
    status: String,

    /// Field name to sort by
    #[arg(long, default_value = "title")]
    sort: String,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Print per-status counts after the list
    #[arg(long)]
    counts: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    #[error("Failed to read seed file {path}: {source}")]
    SeedRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    SeedParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

const TABLE_COLUMNS: [(EntryField, usize); 6] = [
    (EntryField::Title, 40),
    (EntryField::Authors, 24),
    (EntryField::Year, 6),
    (EntryField::Status, 24),
    (EntryField::Relevance, 9),
    (EntryField::Pic, 12),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = LitrackConfig::from_env()?;

    let mut gate = AccessGate::new(
        config.shared_secret.clone(),
        Arc::new(MemorySessionStore::new()),
    );
    gate.unlock(&cli.password)?;

    let sort_key = EntryField::from_name(&cli.sort)
        .ok_or_else(|| CliError::UnknownSortField(cli.sort.clone()))?;
    let sort = if cli.desc {
        SortConfig::descending(sort_key)
    } else {
        SortConfig::ascending(sort_key)
    };

    let store = MemoryCollection::new();
    if let Some(path) = &cli.seed {
        let docs = load_seed(path)?;
        let ids = store.seed(&config.sync.collection, docs)?;
        tracing::info!("Seeded {} entries from {}", ids.len(), path.display());
    }

    let mut sync = SyncController::new(
        Arc::new(store),
        Arc::new(StaticIdentity::anonymous()),
        config.sync.clone(),
        config.team.clone(),
    );
    let mut view = ViewModelStore::new();

    sync.start(&mut view).await?;
    sync.sync_next(&mut view).await?;

    view.set_search_term(cli.search.as_str());
    view.set_status_filter(StatusFilter::parse(&cli.status));
    view.set_sort_config(sort);

    let visible = view.visible_entries();
    match cli.format {
        OutputFormat::Table => print_table(&visible),
        OutputFormat::Csv => write_csv(std::io::stdout().lock(), visible.iter().copied())?,
    }

    if cli.counts {
        for (label, count) in status_counts(view.entries()) {
            println!("{label}: {count}");
        }
    }

    sync.deactivate();
    Ok(())
}

fn load_seed(path: &Path) -> Result<Vec<Fields>, CliError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CliError::SeedRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CliError::SeedParse {
        path: path.to_path_buf(),
        source,
    })
}

fn print_table(entries: &[&LiteratureEntry]) {
    let header: Vec<String> = TABLE_COLUMNS
        .iter()
        .map(|(field, width)| format!("{:<width$}", field.name(), width = *width))
        .collect();
    println!("{}", header.join(" "));

    for entry in entries {
        let row: Vec<String> = TABLE_COLUMNS
            .iter()
            .map(|(field, width)| {
                format!("{:<width$}", truncate(&entry.field_text(*field), *width), width = *width)
            })
            .collect();
        println!("{}", row.join(" "));
    }

    println!("\n{} entries", entries.len());
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
