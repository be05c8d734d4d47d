//! Intermediate-sheet preparation.
//!
//! Raw ripped sheets hold the idle and move rows for all four color blocks
//! scattered across a tall page. Preparation cuts twelve rectangles out of
//! each rip (four color blocks, three row groups) and restacks them on a
//! fixed stride, producing the compact sheets the compositor consumes:
//! heads on a 64-row stride (256x768), bodies on a 32-row stride (256x384).
use std::fs;
use std::path::Path;

use image::RgbaImage;
use tracing::{info, warn};

use crate::core::compositing::SHEET_WIDTH;
use crate::core::compositing::imaging::{blank_opaque, blit, crop};
use crate::io::data::{
    self, RawSheetRects, RawTable, default_raw_body_rects, default_raw_head_rects, raw_rects_for,
};

/// Row stride of one slot on a prepared head sheet.
pub const HEAD_SLOT_HEIGHT: u32 = 64;

/// Row stride of one slot on a prepared body sheet.
pub const BODY_SLOT_HEIGHT: u32 = 32;

/// Counts of sheets prepared per kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrepareReport {
    pub heads: usize,
    pub bodies: usize,
}

/// Cut and restack one raw sheet onto an opaque black canvas.
pub fn stack_blocks(image: &RgbaImage, rects: &RawSheetRects, slot_height: u32) -> RgbaImage {
    let mut out = blank_opaque(SHEET_WIDTH, 12 * slot_height);
    let mut slot: u32 = 0;

    for block in 0..4 {
        let Some(states) = rects.block(block) else {
            warn!("raw rect table has no block {}, leaving its slots blank", block);
            slot += 3;
            continue;
        };
        for rect in [states.idle, states.left, states.right] {
            let sub = crop(image, rect.0 as i64, rect.1 as i64, rect.2, rect.3);
            blit(&mut out, &sub, 0, (slot * slot_height) as i64);
            slot += 1;
        }
    }
    out
}

fn prepare_kind(
    root: &Path,
    src_dir: &str,
    dest_dir: &str,
    table: &RawTable,
    builtin: fn() -> RawSheetRects,
    slot_height: u32,
) -> Result<usize, Box<dyn std::error::Error>> {
    let src = root.join(src_dir);
    if !src.is_dir() {
        warn!("raw sheet directory {} not found, nothing to prepare", src.display());
        return Ok(0);
    }

    let dest = root.join(dest_dir);
    fs::create_dir_all(&dest)?;

    let mut count = 0;
    for entry in fs::read_dir(&src)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("png") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };

        info!("Generating intermediate for {}", path.display());
        let image = image::open(&path)?.to_rgba8();
        let rects = raw_rects_for(table, stem, builtin);
        let stacked = stack_blocks(&image, &rects, slot_height);

        let out = dest.join(format!("{}.png", stem));
        stacked.save(&out)?;
        count += 1;
    }
    Ok(count)
}

/// Generate intermediate sheets for every raw rip under `raw_head/` and
/// `raw_body/`, writing them into `head/` and `body/`.
pub fn prepare_directory(root: &Path) -> Result<PrepareReport, Box<dyn std::error::Error>> {
    let head_table = data::load_raw_head_rects(root)?;
    let body_table = data::load_raw_body_rects(root)?;

    info!("Now generating intermediate spritesheets under {}", root.display());
    let report = PrepareReport {
        heads: prepare_kind(
            root,
            data::RAW_HEAD_DIR,
            data::HEAD_DIR,
            &head_table,
            default_raw_head_rects,
            HEAD_SLOT_HEIGHT,
        )?,
        bodies: prepare_kind(
            root,
            data::RAW_BODY_DIR,
            data::BODY_DIR,
            &body_table,
            default_raw_body_rects,
            BODY_SLOT_HEIGHT,
        )?,
    };
    info!(
        "Intermediate spritesheets complete: {} head(s), {} body(ies)",
        report.heads, report.bodies
    );
    Ok(report)
}
