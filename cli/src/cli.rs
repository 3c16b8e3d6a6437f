//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use compositor::HAlign;
use qr_render::EcLevel;

#[derive(Parser, Debug)]
#[command(
    name = "qrlabel",
    version,
    about = "Compose QR code labels (logo + symbol + caption) and export them"
)]
pub struct Cli {
    /// Path to a JSON config file (defaults to the platform config dir).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compose a single label and save it as a PNG.
    Generate {
        text: String,
        /// Output file (defaults to the next free qr_<n>.png in the
        /// output directory).
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Compose one label per input line and export them as a ZIP archive.
    Batch {
        /// Input file with one payload per line (stdin when omitted).
        file: Option<PathBuf>,
        /// Output archive path.
        #[arg(long, default_value = "qr_labels.zip")]
        out: PathBuf,
        #[command(flatten)]
        layout: LayoutArgs,
    },
    /// Compose a label and place the bitmap on the system clipboard.
    Copy {
        text: String,
        #[command(flatten)]
        layout: LayoutArgs,
    },
}

/// Layout overrides; anything left unset falls back to the config file
/// and its defaults.
#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// Target canvas width in pixels.
    #[arg(long)]
    pub width: Option<u32>,
    /// Target canvas height in pixels.
    #[arg(long)]
    pub height: Option<u32>,
    /// Error-correction level: L, M, Q, or H.
    #[arg(long, value_parser = parse_ec)]
    pub ec: Option<EcLevel>,
    /// Logo alignment: left, center, or right.
    #[arg(long, value_parser = parse_align)]
    pub logo_align: Option<HAlign>,
    /// QR block alignment: left, center, or right.
    #[arg(long, value_parser = parse_align)]
    pub qr_align: Option<HAlign>,
    /// Caption alignment: left, center, or right.
    #[arg(long, value_parser = parse_align)]
    pub caption_align: Option<HAlign>,
    /// Logo image file to composite above the symbol.
    #[arg(long)]
    pub logo: Option<PathBuf>,
    /// Caption font file (TTF/OTF); bundled font when omitted.
    #[arg(long)]
    pub font: Option<PathBuf>,
    /// Skip the caption block.
    #[arg(long)]
    pub no_caption: bool,
}

fn parse_ec(s: &str) -> Result<EcLevel, String> {
    s.parse()
}

fn parse_align(s: &str) -> Result<HAlign, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_with_layout_flags() {
        let cli = Cli::parse_from([
            "qrlabel",
            "generate",
            "hello",
            "--width",
            "800",
            "--ec",
            "q",
            "--qr-align",
            "right",
        ]);
        match cli.command {
            Commands::Generate { text, layout, .. } => {
                assert_eq!(text, "hello");
                assert_eq!(layout.width, Some(800));
                assert_eq!(layout.ec, Some(EcLevel::Q));
                assert_eq!(layout.qr_align, Some(HAlign::Right));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_ec_level() {
        assert!(Cli::try_parse_from(["qrlabel", "generate", "x", "--ec", "Z"]).is_err());
    }
}
