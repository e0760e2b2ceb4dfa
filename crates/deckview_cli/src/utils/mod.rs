//! CLI utility functions

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tokio::runtime::Runtime;
use tracing::info;

use deckview_core::{Deck, DeckConfig};

use crate::cli::Cli;

/// Config file names looked up in the working directory.
const CONFIG_FILES: &[&str] = &[".deckview.jsonc", ".deckview.json"];

pub fn create_tokio_runtime() -> Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .into_diagnostic()
}

/// Loads the configuration named on the command line, or the first config
/// file found in the working directory, then applies command-line overrides.
pub fn load_config(cli: &Cli) -> Result<DeckConfig> {
    let mut config = match &cli.config {
        Some(path) => DeckConfig::from_file(path).into_diagnostic()?,
        None => find_config()?,
    };

    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    Ok(config)
}

fn find_config() -> Result<DeckConfig> {
    let found = CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file());

    match found {
        Some(path) => {
            info!("Using config: {}", path.display());
            DeckConfig::from_file(&path).into_diagnostic()
        }
        None => Ok(DeckConfig::new()),
    }
}

/// Builds a deck from the CLI options and loads its manifest.
pub async fn load_deck(cli: &Cli) -> Result<Deck> {
    let config = load_config(cli)?;
    let deck = Deck::builder(config).build().into_diagnostic()?;
    deck.load().await.into_diagnostic()?;
    Ok(deck)
}
