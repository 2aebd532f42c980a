//! # bookmarker CLI
//!
//! Pick a bookmark stored in Cloud Firestore through an interactive filter
//! (`peco`, `fzf`, ...) and open it in a browser, or delete it.
//!
//! ## Usage
//!
//! | Command | Description |
//! |---------|-------------|
//! | `bookmarker` | Select a bookmark and open it in the configured browser |
//! | `bookmarker -d` | Select a bookmark and delete it after a y/N prompt |
//! | `bookmarker -l` | Print all bookmarks as a table |
//! | `bookmarker -t` | Use the built-in list view instead of `filter_cmd` |
//! | `bookmarker -c` | Edit the config file in `$EDITOR` |
//!
//! Exit status is 0 on success (including a declined delete), 1 on any
//! failure and 2 on a usage error.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};

use bookmarker::actions::{self, Action, Collaborators, RunOutcome};
use bookmarker::config;
use bookmarker::confirm::TerminalConfirmer;
use bookmarker::error::BookmarkerError;
use bookmarker::launcher::ProcessLauncher;
use bookmarker::logging;
use bookmarker::selector::{FilterCommand, Selector};
use bookmarker::store::FirestoreStore;
use bookmarker::tui::ListSelector;

/// Personal bookmark manager: select a bookmark with a fuzzy filter and open it.
#[derive(Parser)]
#[command(name = "bookmarker", version, about)]
struct Cli {
    /// Edit the config file in $EDITOR and exit.
    #[arg(short = 'c', conflicts_with_all = ["delete", "list", "tui"])]
    edit: bool,

    /// Delete the selected bookmark (asks for confirmation).
    #[arg(short = 'd')]
    delete: bool,

    /// Print all bookmarks as a table instead of selecting one.
    #[arg(short = 'l', conflicts_with = "delete")]
    list: bool,

    /// Select with the built-in list view instead of `filter_cmd`.
    #[arg(short = 't')]
    tui: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', action = ArgAction::Count)]
    verbose: u8,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Cli {
    fn action(&self) -> Action {
        if self.list {
            Action::List
        } else if self.delete {
            Action::Delete
        } else {
            Action::Open
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("bookmarker: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose)?;

    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    if cli.edit {
        return config::edit_config(&config_path, &config::editor_from_env());
    }

    config::ensure_config(&config_path)?;
    let cfg = config::load_config(&config_path)?;

    let store = FirestoreStore::connect(&cfg).await?;

    let filter = FilterCommand::new(cfg.filter_cmd.clone());
    let selector: &dyn Selector = if cli.tui {
        &ListSelector
    } else {
        if cfg.filter_cmd.trim().is_empty() {
            return Err(BookmarkerError::Config(
                "filter_cmd is empty; set it in the config or use -t".to_string(),
            )
            .into());
        }
        &filter
    };
    let launcher = ProcessLauncher::new(cfg.wait_for_browser);
    let confirmer = TerminalConfirmer;

    let deps = Collaborators {
        store: &store,
        selector,
        launcher: &launcher,
        confirmer: &confirmer,
    };

    match actions::run_action(cli.action(), &cfg, &deps).await? {
        RunOutcome::Declined(bookmark) => log::info!("kept {}", bookmark.url),
        RunOutcome::Deleted(bookmark) => println!("Deleted 「{}」.", bookmark.title),
        RunOutcome::Opened { .. } | RunOutcome::Listed(_) => {}
    }
    Ok(())
}
