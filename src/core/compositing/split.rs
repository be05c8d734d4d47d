//! Mask-driven layer splitting.
//!
//! A source region holds colored sprites on its left half and a greyscale
//! layer mask on its right half, pixel for pixel. Each distinct grey level
//! on the mask names one layer; the level doubles as the layer's depth.
use std::collections::BTreeSet;

use image::{Rgba, RgbaImage};
use tracing::debug;

use super::imaging::{blank, crop, luma8, replace_color, replace_rgb};

/// Layers keyed by mask level, iterated in depth order.
pub type Layers = std::collections::BTreeMap<u8, RgbaImage>;

/// Mask levels that never become layers: black is the background, white is
/// reserved. White mask pixels are remapped to 252 before level extraction
/// so white-coded layers still survive the ignore list.
pub const IGNORED_LEVELS: [u8; 2] = [0x00, 0xFF];
pub const WHITE_REMAP_LEVEL: u8 = 252;

/// Split a region into per-level RGBA layers.
///
/// With `alpha` set, opaque black pixels inside every layer become fully
/// transparent; otherwise unselected pixels stay opaque black and each layer
/// completely covers the ones below it.
pub fn split_layers(region: &RgbaImage, alpha: bool) -> Layers {
    let half = region.width() / 2;
    let height = region.height();

    let base = crop(region, 0, 0, half, height);
    let mut mask = crop(region, half as i64, 0, half, height);
    replace_rgb(
        &mut mask,
        [0xFF, 0xFF, 0xFF],
        Rgba([WHITE_REMAP_LEVEL, WHITE_REMAP_LEVEL, WHITE_REMAP_LEVEL, 0xFF]),
    );

    let mut levels = BTreeSet::new();
    for px in mask.pixels() {
        let level = luma8(*px);
        if !IGNORED_LEVELS.contains(&level) {
            levels.insert(level);
        }
    }
    debug!("mask region holds {} layer level(s)", levels.len());

    let mut out = Layers::new();
    for level in levels {
        let mut layer = blank(half, height);
        for (x, y, mpx) in mask.enumerate_pixels() {
            let px = if luma8(*mpx) == level {
                let b = base.get_pixel(x, y);
                Rgba([b.0[0], b.0[1], b.0[2], 0xFF])
            } else {
                Rgba([0, 0, 0, 0xFF])
            };
            layer.put_pixel(x, y, px);
        }
        if alpha {
            replace_color(&mut layer, Rgba([0, 0, 0, 0xFF]), Rgba([0, 0, 0, 0]));
        }
        out.insert(level, layer);
    }
    out
}
