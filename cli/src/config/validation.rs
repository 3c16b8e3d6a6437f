//! Configuration value validation.

use compositor::HAlign;
use qr_render::EcLevel;

/// Largest accepted canvas edge, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Largest accepted logo width, in pixels.
pub const MAX_LOGO_WIDTH: u32 = 4_096;

pub fn dimension(value: u32) -> Result<u32, String> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(format!("must be between 1 and {MAX_DIMENSION} pixels"));
    }
    Ok(value)
}

pub fn logo_width(value: u32) -> Result<u32, String> {
    if value == 0 || value > MAX_LOGO_WIDTH {
        return Err(format!("must be between 1 and {MAX_LOGO_WIDTH} pixels"));
    }
    Ok(value)
}

pub fn font_pt(value: f32) -> Result<f32, String> {
    if !value.is_finite() || !(4.0..=288.0).contains(&value) {
        return Err("must be between 4 and 288 points".into());
    }
    Ok(value)
}

pub fn dpi(value: u32) -> Result<u32, String> {
    if !(36..=1200).contains(&value) {
        return Err("must be between 36 and 1200".into());
    }
    Ok(value)
}

pub fn alignment(value: &str) -> Result<HAlign, String> {
    value
        .parse()
        .map_err(|_| "must be 'left', 'center', or 'right'".to_string())
}

pub fn ec_level(value: &str) -> Result<EcLevel, String> {
    value
        .parse()
        .map_err(|_| "must be 'L', 'M', 'Q', or 'H'".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_bounds() {
        assert!(dimension(1).is_ok());
        assert!(dimension(1200).is_ok());
        assert!(dimension(MAX_DIMENSION).is_ok());
        assert!(dimension(0).is_err());
        assert!(dimension(MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn test_font_pt_bounds() {
        assert!(font_pt(20.0).is_ok());
        assert!(font_pt(4.0).is_ok());
        assert!(font_pt(3.9).is_err());
        assert!(font_pt(300.0).is_err());
        assert!(font_pt(f32::NAN).is_err());
    }

    #[test]
    fn test_dpi_bounds() {
        assert!(dpi(96).is_ok());
        assert!(dpi(35).is_err());
        assert!(dpi(1201).is_err());
    }

    #[test]
    fn test_alignment_values() {
        assert_eq!(alignment("left").unwrap(), HAlign::Left);
        assert_eq!(alignment("Right").unwrap(), HAlign::Right);
        assert!(alignment("middle").is_err());
    }

    #[test]
    fn test_ec_level_values() {
        assert_eq!(ec_level("M").unwrap(), EcLevel::M);
        assert_eq!(ec_level("h").unwrap(), EcLevel::H);
        assert!(ec_level("X").is_err());
    }
}
