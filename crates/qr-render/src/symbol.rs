//! Text-to-symbol encoding and module-matrix rasterization.

use image::{DynamicImage, GrayImage, Luma};
use qrcode::QrCode;
use tracing::debug;

use crate::QUIET_ZONE;

/// Error-correction level of a QR symbol, trading capacity for resilience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EcLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

impl EcLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            EcLevel::L => "L",
            EcLevel::M => "M",
            EcLevel::Q => "Q",
            EcLevel::H => "H",
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl std::str::FromStr for EcLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(EcLevel::L),
            "M" => Ok(EcLevel::M),
            "Q" => Ok(EcLevel::Q),
            "H" => Ok(EcLevel::H),
            other => Err(format!("unknown error-correction level '{other}'")),
        }
    }
}

impl std::fmt::Display for EcLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QrError {
    #[error("text exceeds QR symbol capacity")]
    Capacity,
    #[error("QR encoding failed: {0}")]
    Encode(qrcode::types::QrError),
}

/// An encoded QR symbol: a square module matrix plus its side length.
pub struct Symbol {
    modules: Vec<qrcode::Color>,
    module_count: u32,
}

impl Symbol {
    /// Encode `text` at the given error-correction level.
    ///
    /// The symbol version is chosen automatically; text that does not fit
    /// any version at the requested level yields [`QrError::Capacity`].
    pub fn encode(text: &str, ec: EcLevel) -> Result<Self, QrError> {
        let code = QrCode::with_error_correction_level(text.as_bytes(), ec.into()).map_err(
            |e| match e {
                qrcode::types::QrError::DataTooLong => QrError::Capacity,
                other => QrError::Encode(other),
            },
        )?;
        let module_count = code.width() as u32;
        debug!(module_count, ec = %ec, "encoded QR symbol");
        Ok(Self {
            modules: code.to_colors(),
            module_count,
        })
    }

    /// Modules per side, excluding the quiet zone.
    pub fn module_count(&self) -> u32 {
        self.module_count
    }

    /// Modules per side including the quiet zone on both sides.
    pub fn total_modules(&self) -> u32 {
        self.module_count + QUIET_ZONE * 2
    }

    /// Render the matrix with dark modules drawn as `module_size`-square
    /// blocks over a white ground, quiet zone included.
    pub fn render(&self, module_size: u32) -> DynamicImage {
        let module_size = module_size.max(1);
        let img_size = self.total_modules() * module_size;
        let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

        for (i, color) in self.modules.iter().enumerate() {
            if *color != qrcode::Color::Dark {
                continue;
            }
            let mx = (i as u32) % self.module_count + QUIET_ZONE;
            let my = (i as u32) / self.module_count + QUIET_ZONE;
            for dy in 0..module_size {
                for dx in 0..module_size {
                    img.put_pixel(mx * module_size + dx, my * module_size + dy, Luma([0u8]));
                }
            }
        }

        DynamicImage::ImageLuma8(img)
    }
}
