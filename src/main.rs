//! # Doc Harness CLI (`dh`)
//!
//! ## Usage
//!
//! ```bash
//! dh --config ./config/dh.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `dh add <path>...` | Store files in the corpus |
//! | `dh list` | List stored documents |
//! | `dh clear` | Delete every stored document |
//! | `dh search "<query>"` | Search the corpus |
//! | `dh show <name>` | Print the extracted text of one document |
//! | `dh settings show` | Print the active search settings |
//! | `dh settings get <key>` | Print one setting |
//! | `dh settings set <key> <value>` | Validate and persist one setting |
//!
//! ## Examples
//!
//! ```bash
//! # Store two documents
//! dh add ~/reports/q1.pdf ~/notes/budget.xlsx
//!
//! # Exact phrase search with a narrow context window
//! dh search "gross margin" --context 60
//!
//! # Boolean search
//! dh search "invoice not paid" --mode boolean
//!
//! # Structured output
//! dh search "revenue" --json
//! ```

use clap::{Parser, Subcommand};
use doc_harness::search::SearchOverrides;
use doc_harness::{config, documents, ingest, logging, search, settings_cmd};
use std::path::PathBuf;

/// Doc Harness CLI: store documents and search them with context.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. When the file does not exist, built-in defaults are used.
#[derive(Parser)]
#[command(
    name = "dh",
    about = "Doc Harness: a local document corpus with context-window search",
    version,
    long_about = "Doc Harness stores plain text, PDF, DOCX and XLSX/XLS files in a local \
    directory and searches them in exact, per-word (\"fuzzy\") or boolean mode, printing every \
    match with a window of surrounding context sized to fit an output budget."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/dh.toml`. Storage, settings, rendering and
    /// extraction options are read from this file.
    #[arg(long, global = true, default_value = "./config/dh.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Store files in the corpus.
    ///
    /// Each file must have a txt, pdf, docx, xlsx or xls extension and be
    /// no larger than `storage.max_file_bytes`. A file with the same name
    /// as an existing document replaces it.
    Add {
        /// Files to add.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Store a single file under a different name.
        #[arg(long)]
        name: Option<String>,
    },

    /// List stored documents.
    List,

    /// Delete every stored document.
    ///
    /// Not atomic: if some files cannot be removed the rest stay removed
    /// and the command exits with an error.
    Clear,

    /// Search every stored document.
    ///
    /// Uses the persisted settings; `--mode`, `--context` and
    /// `--max-matches` override them for this invocation only.
    Search {
        /// The search query.
        query: String,

        /// Query mode: `exact`, `fuzzy` (every word located separately), or
        /// `boolean` (`A and B`, `A or B`, `A not B`).
        #[arg(long)]
        mode: Option<String>,

        /// Characters of context on each side of a match (50-500).
        #[arg(long)]
        context: Option<String>,

        /// Maximum matches reported per document (1-50).
        #[arg(long)]
        max_matches: Option<String>,

        /// Print the structured result as JSON instead of rendered text.
        #[arg(long)]
        json: bool,
    },

    /// Print the extracted text of one stored document.
    Show {
        /// Stored document name.
        name: String,
    },

    /// Read or change search settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print every setting with its current value.
    Show,
    /// Print one setting.
    Get {
        /// `context_size`, `max_matches_per_file`, `search_type` or `show_preview`.
        key: String,
    },
    /// Validate and persist one setting.
    Set { key: String, value: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Add { paths, name } => {
            ingest::run_add(&cfg, &paths, name.as_deref()).await?;
        }
        Commands::List => {
            documents::run_list(&cfg).await?;
        }
        Commands::Clear => {
            documents::run_clear(&cfg).await?;
        }
        Commands::Search {
            query,
            mode,
            context,
            max_matches,
            json,
        } => {
            let overrides = SearchOverrides {
                mode,
                context,
                max_matches,
            };
            search::run_search(&cfg, &query, &overrides, json).await?;
        }
        Commands::Show { name } => {
            documents::run_show(&cfg, &name).await?;
        }
        Commands::Settings { action } => match action {
            SettingsAction::Show => settings_cmd::run_show(&cfg)?,
            SettingsAction::Get { key } => settings_cmd::run_get(&cfg, &key)?,
            SettingsAction::Set { key, value } => settings_cmd::run_set(&cfg, &key, &value)?,
        },
    }

    Ok(())
}
