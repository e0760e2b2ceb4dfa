//! List command implementation

use miette::{IntoDiagnostic, Result};

use crate::cli::{Cli, OutputFormat};
use crate::output::output_slides;
use crate::utils::{create_tokio_runtime, load_deck};

pub fn run_list(cli: &Cli, format: OutputFormat) -> Result<bool> {
    let slides = create_tokio_runtime()?.block_on(async {
        let deck = load_deck(cli).await?;
        deck.slides().into_diagnostic()
    })?;

    output_slides(&slides, format)?;
    Ok(false)
}
