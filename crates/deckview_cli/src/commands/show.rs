//! Show command implementation

use miette::{IntoDiagnostic, Result};
use tracing::error;

use deckview_core::DeckError;

use crate::cli::Cli;
use crate::utils::{create_tokio_runtime, load_deck};

pub fn run_show(cli: &Cli, index: usize) -> Result<bool> {
    create_tokio_runtime()?.block_on(async {
        let deck = load_deck(cli).await?;
        let handle = deck.display(index).into_diagnostic()?;

        match handle.wait().await {
            Ok(body) => {
                println!("{}", body);
                Ok(false)
            }
            Err(e @ DeckError::Slide { .. }) => {
                error!("{}", e);
                Ok(true)
            }
            Err(e) => Err(e).into_diagnostic(),
        }
    })
}
