//! Optional logo shown at the top of every informe.

use std::io::Cursor;

use image::{GenericImageView, ImageOutputFormat};
use thiserror::Error;

/// File name the logo is written under, next to the Typst source.
pub const LOGO_FILE: &str = "logo.png";

#[derive(Debug, Error)]
pub enum LogoError {
    #[error("failed to decode logo image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("logo image has no pixels")]
    Empty,
}

/// A decoded logo, normalised to PNG and scaled to a fixed width.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub png: Vec<u8>,
    /// Rendered width in points.
    pub width: f64,
    /// Rendered height in points, keeping the aspect ratio.
    pub height: f64,
}

impl Logo {
    pub fn decode(bytes: &[u8], width: f64) -> Result<Self, LogoError> {
        let image = image::load_from_memory(bytes)?;
        let (pixels_w, pixels_h) = image.dimensions();
        if pixels_w == 0 || pixels_h == 0 {
            return Err(LogoError::Empty);
        }

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;

        Ok(Self {
            png,
            width,
            height: width * f64::from(pixels_h) / f64::from(pixels_w),
        })
    }
}

/// Decode the uploaded logo, if any. A broken image yields `None` so the
/// informe falls back to the text title.
pub fn load_logo(bytes: Option<&[u8]>, width: f64) -> Option<Logo> {
    let bytes = bytes.filter(|b| !b.is_empty())?;
    match Logo::decode(bytes, width) {
        Ok(logo) => Some(logo),
        Err(e) => {
            log::warn!("Ignoring logo, using text title instead: {}", e);
            None
        }
    }
}
