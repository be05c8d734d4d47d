//! Mask-driven sprite compositing: imaging primitives, layer splitting,
//! per-class offset resolution, and the sheet assembly pipeline.
//!
//! Geometry of the prepared intermediate sheets, in pixels. Sheets are 256
//! wide (sprites on the left half, layer masks on the right); heads stack
//! four 192-row color blocks, bodies four 96-row blocks. Composited output
//! is built from 128x32 state rows grouped into 128x96 color regions.
pub mod imaging;
pub mod offsets;
pub mod pipeline;
pub mod split;

pub use offsets::{BodyLayout, HeadLayout, resolve_body, resolve_head};
pub use pipeline::{StateLayers, compose_sheet};
pub use split::{Layers, split_layers};

/// Width of a prepared source sheet (sprite half plus mask half).
pub const SHEET_WIDTH: u32 = 256;

/// Full head region per color block (mask half included).
pub const REGION_FULL_HEAD: (u32, u32) = (256, 192);

/// Full body region per color block (mask half included).
pub const REGION_FULL_BODY: (u32, u32) = (256, 96);

/// One state row on a composited sheet.
pub const STATE_REGION: (u32, u32) = (128, 32);

/// One color region on a composited sheet (three state rows).
pub const COLOR_REGION: (u32, u32) = (128, 96);

/// Vertical stride between color blocks on head sheets.
pub const HEAD_BLOCK: u32 = 192;

/// Vertical stride between color blocks on body sheets.
pub const BODY_BLOCK: u32 = 96;

/// Width of one animation frame cell on a composited row.
pub const CELL_WIDTH: u32 = 32;
