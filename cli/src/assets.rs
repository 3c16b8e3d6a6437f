//! Logo and caption font loading.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use tracing::info;

use crate::config::AppConfig;
use compositor::Assets;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode logo image {path}: {source}")]
    Logo {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("not a usable TTF/OTF font: {path}")]
    Font { path: PathBuf },
}

/// Load the composition assets named by the config.
///
/// The bundled font is used when no font path is configured; a missing
/// logo path is an error, an unconfigured logo simply composes without
/// one.
pub fn load(config: &AppConfig) -> Result<Assets, AssetError> {
    let font = match &config.font_path {
        Some(path) => {
            let bytes = read(path)?;
            let font = FontArc::try_from_vec(bytes).map_err(|_| AssetError::Font {
                path: path.clone(),
            })?;
            info!("caption font loaded from {}", path.display());
            font
        }
        None => compositor::default_font(),
    };

    let logo = match &config.logo_path {
        Some(path) => {
            let logo = image::open(path).map_err(|source| AssetError::Logo {
                path: path.clone(),
                source,
            })?;
            info!(
                width = logo.width(),
                height = logo.height(),
                "logo loaded from {}",
                path.display()
            );
            Some(logo)
        }
        None => None,
    };

    let mut assets = Assets::new(font);
    if let Some(logo) = logo {
        assets = assets.with_logo(logo);
    }
    Ok(assets)
}

fn read(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    })
}
