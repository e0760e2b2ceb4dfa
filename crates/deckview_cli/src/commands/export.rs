//! Export command implementation

use std::fs;
use std::path::Path;

use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::{info, warn};

use deckview_core::{DeckError, error_placeholder};

use crate::cli::Cli;
use crate::output::manifest_json;
use crate::utils::{create_tokio_runtime, load_deck};

pub fn run_export(cli: &Cli, dir: &Path) -> Result<bool> {
    fs::create_dir_all(dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;

    create_tokio_runtime()?.block_on(async {
        let deck = load_deck(cli).await?;
        let slides = deck.slides().into_diagnostic()?;

        let index_path = dir.join("index.json");
        let manifest = serde_json::to_string_pretty(&manifest_json(&slides)).into_diagnostic()?;
        fs::write(&index_path, manifest).into_diagnostic()?;

        // Each display prefetches the following slide while this one is written.
        let mut failed = 0;
        for (index, slide) in slides.iter().enumerate() {
            let html = match deck.display(index).into_diagnostic()?.wait().await {
                Ok(body) => body.to_string(),
                Err(DeckError::Slide { source, .. }) => {
                    warn!("Slide #{} ({}) failed: {}", index, slide.address, source);
                    failed += 1;
                    error_placeholder(slide, &source)
                }
                Err(e) => return Err(e).into_diagnostic(),
            };

            let path = dir.join(format!("{:03}.html", index));
            fs::write(&path, html)
                .into_diagnostic()
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        }

        info!(
            "Exported {} slides to {} ({} failed)",
            slides.len(),
            dir.display(),
            failed
        );
        Ok(failed > 0)
    })
}
