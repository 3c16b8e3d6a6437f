//! Layered application configuration: defaults, then the config file,
//! then `QRLABEL_*` environment overrides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use compositor::LayoutConfig;
use qr_render::EcLevel;

use super::validation;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// On-disk config shape. Every field is optional so partial files work.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub logo_align: Option<String>,
    pub qr_align: Option<String>,
    pub caption_align: Option<String>,
    pub logo_width: Option<u32>,
    pub caption_font_pt: Option<f32>,
    pub dpi: Option<u32>,
    pub caption: Option<bool>,
    pub ec_level: Option<String>,
    pub logo_path: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub layout: LayoutConfig,
    pub ec_level: EcLevel,
    pub logo_path: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            ec_level: EcLevel::default(),
            logo_path: None,
            font_path: None,
            output_dir: PathBuf::from("qr_labels"),
        }
    }
}

impl AppConfig {
    /// Load configuration with the full layering.
    ///
    /// An explicitly given path must exist; the default path is skipped
    /// silently when absent.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        if let Some(path) = path {
            let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let file: ConfigFile =
                serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?;
            config.apply_file(file)?;
            info!("loaded config from {}", path.display());
        } else {
            debug!("no config file found, using defaults");
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(v) = file.target_width {
            self.layout.target_width = check("target_width", validation::dimension(v))?;
        }
        if let Some(v) = file.target_height {
            self.layout.target_height = check("target_height", validation::dimension(v))?;
        }
        if let Some(v) = &file.logo_align {
            self.layout.logo_align = check("logo_align", validation::alignment(v))?;
        }
        if let Some(v) = &file.qr_align {
            self.layout.qr_align = check("qr_align", validation::alignment(v))?;
        }
        if let Some(v) = &file.caption_align {
            self.layout.caption_align = check("caption_align", validation::alignment(v))?;
        }
        if let Some(v) = file.logo_width {
            self.layout.logo_width = check("logo_width", validation::logo_width(v))?;
        }
        if let Some(v) = file.caption_font_pt {
            self.layout.caption_font_pt = check("caption_font_pt", validation::font_pt(v))?;
        }
        if let Some(v) = file.dpi {
            self.layout.dpi = check("dpi", validation::dpi(v))?;
        }
        if let Some(v) = file.caption {
            self.layout.caption = v;
        }
        if let Some(v) = &file.ec_level {
            self.ec_level = check("ec_level", validation::ec_level(v))?;
        }
        if let Some(v) = file.logo_path {
            self.logo_path = Some(v);
        }
        if let Some(v) = file.font_path {
            self.font_path = Some(v);
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = env_u32("QRLABEL_TARGET_WIDTH")? {
            self.layout.target_width = check("QRLABEL_TARGET_WIDTH", validation::dimension(v))?;
        }
        if let Some(v) = env_u32("QRLABEL_TARGET_HEIGHT")? {
            self.layout.target_height = check("QRLABEL_TARGET_HEIGHT", validation::dimension(v))?;
        }
        if let Some(v) = env_var("QRLABEL_EC_LEVEL") {
            self.ec_level = check("QRLABEL_EC_LEVEL", validation::ec_level(&v))?;
        }
        if let Some(v) = env_var("QRLABEL_LOGO_PATH") {
            self.logo_path = Some(PathBuf::from(v));
        }
        if let Some(v) = env_var("QRLABEL_FONT_PATH") {
            self.font_path = Some(PathBuf::from(v));
        }
        if let Some(v) = env_var("QRLABEL_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        Ok(())
    }
}

fn check<T>(key: &'static str, result: Result<T, String>) -> Result<T, ConfigError> {
    result.map_err(|reason| ConfigError::Invalid { key, reason })
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_u32(key: &'static str) -> Result<Option<u32>, ConfigError> {
    match env_var(key) {
        None => Ok(None),
        Some(v) => v.parse::<u32>().map(Some).map_err(|_| ConfigError::Invalid {
            key,
            reason: "must be an integer".into(),
        }),
    }
}

/// Platform config file location: `<config dir>/qrlabel/config.json`.
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qrlabel").join("config.json"))
}
