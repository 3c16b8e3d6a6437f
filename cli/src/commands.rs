//! Command handlers behind the clap surface.
//!
//! Every error is caught here or above and surfaced as a user-facing
//! message; nothing is silently swallowed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use compositor::QrRequest;

use crate::assets;
use crate::cli::{Cli, Commands, LayoutArgs};
use crate::config::AppConfig;
use crate::services::clipboard::{self, SystemClipboard};
use crate::services::export::{self, ExportError, ExportProgress};
use crate::services::output;

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { text, out, layout } => {
            apply_overrides(&mut config, &layout);
            run_generate(&config, &text, out.as_deref())
        }
        Commands::Batch { file, out, layout } => {
            apply_overrides(&mut config, &layout);
            run_batch(&config, file.as_deref(), out).await
        }
        Commands::Copy { text, layout } => {
            apply_overrides(&mut config, &layout);
            run_copy(&config, &text)
        }
    }
}

fn apply_overrides(config: &mut AppConfig, args: &LayoutArgs) {
    if let Some(v) = args.width {
        config.layout.target_width = v;
    }
    if let Some(v) = args.height {
        config.layout.target_height = v;
    }
    if let Some(v) = args.ec {
        config.ec_level = v;
    }
    if let Some(v) = args.logo_align {
        config.layout.logo_align = v;
    }
    if let Some(v) = args.qr_align {
        config.layout.qr_align = v;
    }
    if let Some(v) = args.caption_align {
        config.layout.caption_align = v;
    }
    if let Some(v) = &args.logo {
        config.logo_path = Some(v.clone());
    }
    if let Some(v) = &args.font {
        config.font_path = Some(v.clone());
    }
    if args.no_caption {
        config.layout.caption = false;
    }
}

fn run_generate(config: &AppConfig, text: &str, out: Option<&Path>) -> anyhow::Result<()> {
    let assets = assets::load(config)?;
    let request = QrRequest::new(text).with_ec_level(config.ec_level);
    let label = compositor::compose(&request, &config.layout, &assets)
        .context("failed to compose label")?;

    let path = match out {
        Some(p) => p.to_path_buf(),
        None => output::next_output_path(&config.output_dir)?,
    };
    output::save_label(&label, &path)?;
    println!("Saved {}", path.display());
    Ok(())
}

async fn run_batch(config: &AppConfig, file: Option<&Path>, out: PathBuf) -> anyhow::Result<()> {
    let payloads = read_payloads(file)?;
    anyhow::ensure!(!payloads.is_empty(), "no payloads to export");

    let assets = assets::load(config)?;
    let cancel = CancellationToken::new();
    let progress = Arc::new(ExportProgress::default());

    let mut task = tokio::spawn(export::export_to_path(
        payloads,
        config.ec_level,
        config.layout.clone(),
        assets,
        out.clone(),
        cancel.clone(),
        progress.clone(),
    ));

    let result = tokio::select! {
        res = &mut task => res.context("export task failed")?,
        _ = tokio::signal::ctrl_c() => {
            warn!("cancellation requested, stopping after the current item");
            cancel.cancel();
            (&mut task).await.context("export task failed")?
        }
    };

    match result {
        Ok(count) => {
            println!("Exported {count} labels to {}", out.display());
            Ok(())
        }
        Err(ExportError::Cancelled) => {
            anyhow::bail!(
                "export cancelled after {} of {} labels; partial archive discarded",
                progress.completed(),
                progress.total()
            )
        }
        Err(e) => Err(e).context("batch export failed"),
    }
}

fn run_copy(config: &AppConfig, text: &str) -> anyhow::Result<()> {
    let assets = assets::load(config)?;
    let request = QrRequest::new(text).with_ec_level(config.ec_level);
    let label = compositor::compose(&request, &config.layout, &assets)
        .context("failed to compose label")?;

    let mut sink = SystemClipboard::new()?;
    clipboard::copy_label(&label, &mut sink)?;
    println!("Copied {}x{} label to clipboard", label.width(), label.height());
    Ok(())
}

/// Read payloads, one per line, from a file or stdin. Blank lines are
/// skipped; interior whitespace is preserved.
fn read_payloads(file: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin")?,
    };

    Ok(raw
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}
