//! Prepared-sheet loading.
//!
//! Sheets come in as PNG (or anything else the `image` crate decodes) and are
//! normalized on load: the alpha channel is flattened to opaque, and whatever
//! color the top-left pixel holds is treated as the background and rewritten
//! to black, so the ignore list and the transparency pass see a uniform canvas.
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::compositing::SHEET_WIDTH;

/// Errors encountered when loading sprite sheets
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("sheet image not found: {path:?}")]
    Missing { path: PathBuf },

    #[error("sheet image {path:?} is {width}x{height}, expected at least {min_width} columns")]
    TooNarrow {
        path: PathBuf,
        width: u32,
        height: u32,
        min_width: u32,
    },
}

/// A loaded, normalized source sheet.
pub struct SheetSource {
    pub path: PathBuf,
    pub image: RgbaImage,
}

impl SheetSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SheetError> {
        let path = path.as_ref().to_path_buf();
        if !path.is_file() {
            return Err(SheetError::Missing { path });
        }

        let mut image = image::open(&path)?.to_rgba8();
        let (width, height) = image.dimensions();
        if width < SHEET_WIDTH {
            return Err(SheetError::TooNarrow {
                path,
                width,
                height,
                min_width: SHEET_WIDTH,
            });
        }

        flatten_alpha(&mut image);
        let background = normalize_background(&mut image);
        debug!(
            "normalized background {:?} on sheet {}",
            background,
            path.display()
        );
        info!("Loaded sheet {} ({}x{})", path.display(), width, height);

        Ok(SheetSource { path, image })
    }
}

/// Force every pixel opaque, mirroring a three-channel decode.
fn flatten_alpha(image: &mut RgbaImage) {
    for px in image.pixels_mut() {
        px.0[3] = 0xFF;
    }
}

/// Rewrite every pixel matching the top-left pixel's color to opaque black.
/// Returns the color that was treated as the background.
fn normalize_background(image: &mut RgbaImage) -> Rgba<u8> {
    let background = *image.get_pixel(0, 0);
    let black = Rgba([0, 0, 0, 0xFF]);
    if background == black {
        return background;
    }
    for px in image.pixels_mut() {
        if *px == background {
            *px = black;
        }
    }
    background
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_becomes_black() {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 0xFF]));
        img.put_pixel(2, 1, Rgba([200, 0, 0, 0xFF]));

        let bg = normalize_background(&mut img);
        assert_eq!(bg, Rgba([10, 20, 30, 0xFF]));
        assert_eq!(*img.get_pixel(0, 0), Rgba([0, 0, 0, 0xFF]));
        assert_eq!(*img.get_pixel(3, 0), Rgba([0, 0, 0, 0xFF]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([200, 0, 0, 0xFF]));
    }

    #[test]
    fn black_background_is_untouched() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0xFF]));
        img.put_pixel(1, 1, Rgba([5, 5, 5, 0xFF]));
        normalize_background(&mut img);
        assert_eq!(*img.get_pixel(1, 1), Rgba([5, 5, 5, 0xFF]));
    }

    #[test]
    fn alpha_is_flattened() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 0]));
        flatten_alpha(&mut img);
        assert!(img.pixels().all(|px| px.0[3] == 0xFF));
    }
}
