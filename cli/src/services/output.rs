//! Single-label PNG output with sequential naming.

use std::path::{Path, PathBuf};

use tracing::info;

use compositor::ComposedImage;

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Write a composed label to `path` as PNG, creating parent directories
/// on demand.
pub fn save_label(label: &ComposedImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, label.to_png()?)?;
    info!("saved {}", path.display());
    Ok(())
}

/// First free `qr_<n>.png` name in the output directory, which is
/// created if missing.
pub fn next_output_path(dir: &Path) -> Result<PathBuf, OutputError> {
    std::fs::create_dir_all(dir)?;
    let mut n = 1u64;
    loop {
        let candidate = dir.join(format!("qr_{n}.png"));
        if !candidate.exists() {
            return Ok(candidate);
        }
        n += 1;
    }
}
