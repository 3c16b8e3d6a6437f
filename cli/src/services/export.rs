//! Batch export driver.
//!
//! Composes one label per payload and streams them into a ZIP archive on
//! a blocking worker. Cancellation is cooperative: a shared token polled
//! once per item, no mid-item preemption. A cancelled or failed batch
//! never leaves a partial archive behind.

use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use compositor::{Assets, ComposeError, LayoutConfig, QrRequest};
use qr_render::EcLevel;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("export cancelled")]
    Cancelled,
    #[error("failed to compose item {index}: {source}")]
    Item { index: usize, source: ComposeError },
    #[error("failed to encode item {index} as PNG: {source}")]
    Encode {
        index: usize,
        source: image::ImageError,
    },
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("export worker panicked")]
    Worker,
}

/// Progress counters, written only by the worker and read (or reset) by
/// the interactive surface.
#[derive(Debug, Default)]
pub struct ExportProgress {
    completed: AtomicUsize,
    total: AtomicUsize,
}

impl ExportProgress {
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    pub fn reset(&self, total: usize) {
        self.total.store(total, Ordering::Relaxed);
        self.completed.store(0, Ordering::Relaxed);
    }

    fn bump(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Export all payloads into `sink`, one `qr_<n>.png` entry per payload,
/// in input order. Returns the number of entries written.
///
/// The caller owns the sink's fate: on any `Err`, including
/// [`ExportError::Cancelled`], whatever was written must be discarded.
pub fn export_all<W: Write + Seek>(
    payloads: &[String],
    ec_level: EcLevel,
    layout: &LayoutConfig,
    assets: &Assets,
    sink: W,
    cancel: &CancellationToken,
    progress: &ExportProgress,
) -> Result<usize, ExportError> {
    progress.reset(payloads.len());
    let mut archive = ZipWriter::new(sink);
    let options = SimpleFileOptions::default();

    for (index, text) in payloads.iter().enumerate() {
        if cancel.is_cancelled() {
            info!(
                completed = index,
                total = payloads.len(),
                "batch export cancelled"
            );
            return Err(ExportError::Cancelled);
        }

        let request = QrRequest {
            text: text.clone(),
            ec_level,
        };
        let label = compositor::compose(&request, layout, assets)
            .map_err(|source| ExportError::Item { index, source })?;
        let png = label
            .to_png()
            .map_err(|source| ExportError::Encode { index, source })?;

        let name = format!("qr_{}.png", index + 1);
        archive.start_file(name.clone(), options)?;
        archive.write_all(&png)?;
        progress.bump();
        info!("[{}/{}] exported {name}", index + 1, payloads.len());
    }

    archive.finish()?;
    Ok(payloads.len())
}

/// Run the export against `out_path` on a blocking worker.
///
/// The archive is written to a `.part` sibling and only renamed into
/// place on success; cancel or error deletes the partial file so no
/// partial-success state is ever persisted.
pub async fn export_to_path(
    payloads: Vec<String>,
    ec_level: EcLevel,
    layout: LayoutConfig,
    assets: Assets,
    out_path: PathBuf,
    cancel: CancellationToken,
    progress: Arc<ExportProgress>,
) -> Result<usize, ExportError> {
    let part = part_path(&out_path);
    let worker_part = part.clone();

    let result = tokio::task::spawn_blocking(move || {
        let file = std::fs::File::create(&worker_part)?;
        export_all(
            &payloads, ec_level, &layout, &assets, file, &cancel, &progress,
        )
    })
    .await
    .map_err(|_| ExportError::Worker)?;

    match result {
        Ok(count) => {
            std::fs::rename(&part, &out_path)?;
            info!(count, "archive written to {}", out_path.display());
            Ok(count)
        }
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(&part) {
                warn!("failed to discard partial archive {}: {rm}", part.display());
            }
            Err(e)
        }
    }
}

fn part_path(out: &Path) -> PathBuf {
    let mut os = out.as_os_str().to_owned();
    os.push(".part");
    PathBuf::from(os)
}
