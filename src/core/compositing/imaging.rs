//! Pixel-level primitives the compositor is built from: blank canvases,
//! clipped crops and pastes, color replacement, and greyscale conversion.
//!
//! All coordinates are top-left origin. Crop and paste take signed
//! positions; anything falling outside the source or destination clips.
use image::{Rgba, RgbaImage};

/// Fully transparent canvas.
pub fn blank(width: u32, height: u32) -> RgbaImage {
    RgbaImage::new(width, height)
}

/// Opaque black canvas, used for prepared intermediate sheets.
pub fn blank_opaque(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0xFF]))
}

/// Integer BT.601 luma, the conversion the masks were authored against.
/// Exact for grey pixels: luma of (g, g, g) is g.
pub fn luma8(px: Rgba<u8>) -> u8 {
    let r = px.0[0] as u32;
    let g = px.0[1] as u32;
    let b = px.0[2] as u32;
    ((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8
}

/// Copy a `width` x `height` region starting at the signed position
/// (`x`, `y`). Areas outside the source read as transparent.
pub fn crop(src: &RgbaImage, x: i64, y: i64, width: u32, height: u32) -> RgbaImage {
    let mut out = blank(width, height);
    for oy in 0..height {
        for ox in 0..width {
            let sx = x + ox as i64;
            let sy = y + oy as i64;
            if sx < 0 || sy < 0 || sx >= src.width() as i64 || sy >= src.height() as i64 {
                continue;
            }
            out.put_pixel(ox, oy, *src.get_pixel(sx as u32, sy as u32));
        }
    }
    out
}

/// Paste `src` onto `dest` at a signed position, skipping fully transparent
/// source pixels so lower layers show through. Out-of-bounds pixels clip.
pub fn paste(dest: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for (sx, sy, px) in src.enumerate_pixels() {
        if px.0[3] == 0 {
            continue;
        }
        let dx = x + sx as i64;
        let dy = y + sy as i64;
        if dx < 0 || dy < 0 || dx >= dest.width() as i64 || dy >= dest.height() as i64 {
            continue;
        }
        dest.put_pixel(dx as u32, dy as u32, *px);
    }
}

/// Unconditional copy, transparency included. Used when stacking raw-rip
/// rectangles where the source alpha is meaningful as-is.
pub fn blit(dest: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for (sx, sy, px) in src.enumerate_pixels() {
        let dx = x + sx as i64;
        let dy = y + sy as i64;
        if dx < 0 || dy < 0 || dx >= dest.width() as i64 || dy >= dest.height() as i64 {
            continue;
        }
        dest.put_pixel(dx as u32, dy as u32, *px);
    }
}

/// Replace every exact occurrence of one color (alpha included).
pub fn replace_color(image: &mut RgbaImage, from: Rgba<u8>, to: Rgba<u8>) {
    for px in image.pixels_mut() {
        if *px == from {
            *px = to;
        }
    }
}

/// Replace RGB triples regardless of alpha, writing a full RGBA pixel.
pub fn replace_rgb(image: &mut RgbaImage, from: [u8; 3], to: Rgba<u8>) {
    for px in image.pixels_mut() {
        if px.0[0] == from[0] && px.0[1] == from[1] && px.0[2] == from[2] {
            *px = to;
        }
    }
}

/// Luma replicated into RGB, fully opaque.
pub fn to_grayscale(image: &RgbaImage) -> RgbaImage {
    let mut out = blank(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        let l = luma8(*px);
        out.put_pixel(x, y, Rgba([l, l, l, 0xFF]));
    }
    out
}
