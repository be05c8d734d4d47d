//! The compositing pipeline: slice head and body sheets into per-level
//! layers, place animation frames per state, and assemble the master sheet
//! with one region per color variant plus a greyscale region.
use image::{Rgba, RgbaImage};
use tracing::debug;

use super::imaging::{blank, crop, paste, replace_color, to_grayscale};
use super::offsets::{BodyLayout, HeadLayout};
use super::split::{Layers, split_layers};
use super::{
    BODY_BLOCK, CELL_WIDTH, COLOR_REGION, HEAD_BLOCK, REGION_FULL_BODY, REGION_FULL_HEAD,
    STATE_REGION,
};
use crate::io::data::{ColorOrder, CropRegion, CropSpec, FRAMES, FrameOffset};
use crate::types::{ColorVariant, CompositeMode, FacingState, HeadSize};

/// Per-state layer sets for one processed sprite part.
#[derive(Debug, Default)]
pub struct StateLayers {
    pub idle: Layers,
    pub left: Layers,
    pub right: Layers,
}

impl StateLayers {
    pub fn get(&self, state: FacingState) -> &Layers {
        match state {
            FacingState::Idle => &self.idle,
            FacingState::Left => &self.left,
            FacingState::Right => &self.right,
        }
    }

    fn get_mut(&mut self, state: FacingState) -> &mut Layers {
        match state {
            FacingState::Idle => &mut self.idle,
            FacingState::Left => &mut self.left,
            FacingState::Right => &mut self.right,
        }
    }
}

/// Place the four animation frames of one layer into a blank color region.
///
/// Frames land in 32-wide cells at the state's row. Small-head frames are
/// centered in their cell and rotated one cell to the right: the games store
/// small-head frames one phase ahead, like body offsets.
fn place_frames(
    layer: &RgbaImage,
    region: &CropRegion,
    state: FacingState,
    offsets: [FrameOffset; FRAMES],
    rotate_cells: bool,
) -> RgbaImage {
    let (fw, fh) = region.size;
    let (ox, oy) = region.origin.get(state);
    let base_y = (STATE_REGION.1 * state.index()) as i64;
    let centering = (CELL_WIDTH.saturating_sub(fw) / 2) as i64;

    let mut frame = blank(COLOR_REGION.0, COLOR_REGION.1);
    for n in 0..FRAMES {
        let cell = if rotate_cells { (n + FRAMES - 1) % FRAMES } else { n };
        let off = offsets[n];
        let sub = crop(layer, (ox + fw * n as u32) as i64, oy as i64, fw, fh);
        let x = CELL_WIDTH as i64 * cell as i64 + centering + off.0 as i64;
        let y = base_y - off.1 as i64;
        paste(&mut frame, &sub, x, y);
    }
    frame
}

/// Slice one color block of a head sheet into placed per-state layers.
pub fn process_head(
    sheet: &RgbaImage,
    origin: (i64, i64),
    layout: &HeadLayout,
    crop_spec: &CropSpec,
    alpha: bool,
) -> StateLayers {
    let region = crop(sheet, origin.0, origin.1, REGION_FULL_HEAD.0, REGION_FULL_HEAD.1);
    let layers = split_layers(&region, alpha);
    debug!("head block at {:?}: {} layer(s)", origin, layers.len());

    let crop_region = crop_spec.head.get(layout.size);
    let rotate_cells = layout.size == HeadSize::Small;

    let mut out = StateLayers::default();
    for state in FacingState::ALL {
        let placed = out.get_mut(state);
        for (&level, layer) in &layers {
            placed.insert(
                level,
                place_frames(layer, crop_region, state, layout.frames(state), rotate_cells),
            );
        }
    }
    out
}

/// Slice one color block of a body sheet into placed per-state layers.
pub fn process_body(
    sheet: &RgbaImage,
    origin: (i64, i64),
    layout: &BodyLayout,
    crop_spec: &CropSpec,
    alpha: bool,
) -> StateLayers {
    let region = crop(sheet, origin.0, origin.1, REGION_FULL_BODY.0, REGION_FULL_BODY.1);
    let layers = split_layers(&region, alpha);
    debug!("body block at {:?}: {} layer(s)", origin, layers.len());

    let mut out = StateLayers::default();
    for state in FacingState::ALL {
        let placed = out.get_mut(state);
        for (&level, layer) in &layers {
            placed.insert(
                level,
                place_frames(layer, &crop_spec.body, state, layout.frames(state), false),
            );
        }
    }
    out
}

/// Union of the two layer key sets in depth order, deepest first when
/// `reverse` is set.
pub fn sorted_levels(head: &Layers, body: &Layers, reverse: bool) -> Vec<u8> {
    let mut levels: Vec<u8> = head.keys().chain(body.keys()).copied().collect();
    levels.sort_unstable();
    levels.dedup();
    if reverse {
        levels.reverse();
    }
    levels
}

/// Paste head and body layers in order, head before body per level.
pub fn paste_layers(dest: &mut RgbaImage, head: &Layers, body: &Layers, levels: &[u8]) {
    for level in levels {
        if let Some(layer) = head.get(level) {
            paste(dest, layer, 0, 0);
        }
        if let Some(layer) = body.get(level) {
            paste(dest, layer, 0, 0);
        }
    }
}

/// Composite one 128x96 color region from processed head and body parts.
pub fn compose_color_region(
    head: &StateLayers,
    body: &StateLayers,
    mode: CompositeMode,
    reverse: bool,
) -> RgbaImage {
    let mut region = blank(COLOR_REGION.0, COLOR_REGION.1);

    let idle = sorted_levels(&head.idle, &body.idle, reverse);
    paste_layers(&mut region, &head.idle, &body.idle, &idle);

    if mode == CompositeMode::Full {
        let left = sorted_levels(&head.left, &body.left, false);
        paste_layers(&mut region, &head.left, &body.left, &left);

        let right = sorted_levels(&head.right, &body.right, false);
        paste_layers(&mut region, &head.right, &body.right, &right);
    }

    region
}

/// Assemble the master sheet: one region per color variant in output order,
/// then a greyscale region derived from the purple variant.
pub fn compose_sheet(
    head_sheet: &RgbaImage,
    body_sheet: &RgbaImage,
    head_layout: &HeadLayout,
    body_layout: &BodyLayout,
    color_order: &ColorOrder,
    crop_spec: &CropSpec,
    mode: CompositeMode,
    alpha: bool,
    offset: (i64, i64),
) -> RgbaImage {
    let block_height = match mode {
        CompositeMode::Idle => STATE_REGION.1,
        CompositeMode::Full => COLOR_REGION.1,
    };
    let slots = ColorVariant::ALL.len() as u32 + 1;
    let mut out = blank(COLOR_REGION.0, block_height * slots);

    for (i, color) in ColorVariant::ALL.into_iter().enumerate() {
        let block = color_order.block_index(color);
        let head_origin = (offset.0, offset.1 + (HEAD_BLOCK * block) as i64);
        let body_origin = (offset.0, offset.1 + (BODY_BLOCK * block) as i64);

        let head = process_head(head_sheet, head_origin, head_layout, crop_spec, alpha);
        let body = process_body(body_sheet, body_origin, body_layout, crop_spec, alpha);
        let region = compose_color_region(&head, &body, mode, head_layout.reverse);

        let y = (i as u32 * block_height) as i64;
        paste_region(&mut out, &region, y, mode);

        if color == ColorVariant::Purple {
            let mut grey = to_grayscale(&region);
            if alpha {
                replace_color(&mut grey, Rgba([0, 0, 0, 0xFF]), Rgba([0, 0, 0, 0]));
            }
            let y = ((i + 1) as u32 * block_height) as i64;
            paste_region(&mut out, &grey, y, mode);
        }
    }

    out
}

/// Paste a color region into the master sheet; idle mode keeps only the
/// idle strip.
fn paste_region(out: &mut RgbaImage, region: &RgbaImage, y: i64, mode: CompositeMode) {
    match mode {
        CompositeMode::Idle => {
            let strip = crop(region, 0, 0, STATE_REGION.0, STATE_REGION.1);
            paste(out, &strip, 0, y);
        }
        CompositeMode::Full => paste(out, region, 0, y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compositing::imaging::blank_opaque;
    use crate::core::compositing::offsets::{resolve_body, resolve_head};
    use crate::io::data::{
        BodyOffsetTable, BodyParams, HeadOffsetTable, HeadParams, StateOffsets,
    };

    /// Head sheet: four 192-row color blocks. Each block gets one large-head
    /// idle pixel at (10, 0) whose red channel encodes the block index, with
    /// mask level 100.
    fn head_sheet() -> RgbaImage {
        let mut img = blank_opaque(256, 768);
        for block in 0..4u32 {
            let y = 192 * block;
            img.put_pixel(10, y, Rgba([40 + 10 * block as u8, 20, 30, 0xFF]));
            img.put_pixel(128 + 10, y, Rgba([100, 100, 100, 0xFF]));
        }
        img
    }

    /// Body sheet: four 96-row color blocks, one idle pixel at (5, 1) in
    /// frame 0 with mask level 150.
    fn body_sheet() -> RgbaImage {
        let mut img = blank_opaque(256, 384);
        for block in 0..4u32 {
            let y = 96 * block;
            img.put_pixel(5, y + 1, Rgba([0, 40 + 10 * block as u8, 0, 0xFF]));
            img.put_pixel(128 + 5, y + 1, Rgba([150, 150, 150, 0xFF]));
        }
        img
    }

    fn defaults() -> (HeadLayout, BodyLayout, ColorOrder, CropSpec) {
        (
            resolve_head("test", &HeadOffsetTable::new()),
            resolve_body("test", &BodyOffsetTable::new()),
            ColorOrder::default(),
            CropSpec::default(),
        )
    }

    #[test]
    fn idle_sheet_places_variants_by_block_order() {
        let (head, body, order, spec) = defaults();
        let out = compose_sheet(
            &head_sheet(),
            &body_sheet(),
            &head,
            &body,
            &order,
            &spec,
            CompositeMode::Idle,
            true,
            (0, 0),
        );
        assert_eq!(out.dimensions(), (128, 160));

        // Blue row reads source block 3, purple row block 0.
        assert_eq!(*out.get_pixel(10, 0), Rgba([70, 20, 30, 0xFF]));
        assert_eq!(*out.get_pixel(5, 1), Rgba([0, 70, 0, 0xFF]));
        assert_eq!(*out.get_pixel(10, 96), Rgba([40, 20, 30, 0xFF]));

        // Greyscale row derives from the purple region.
        // 299*40 + 587*20 + 114*30 = 27120 -> 27
        assert_eq!(*out.get_pixel(10, 128), Rgba([27, 27, 27, 0xFF]));
        // Background stays transparent.
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn full_sheet_is_three_rows_per_variant() {
        let (head, body, order, spec) = defaults();
        let out = compose_sheet(
            &head_sheet(),
            &body_sheet(),
            &head,
            &body,
            &order,
            &spec,
            CompositeMode::Full,
            true,
            (0, 0),
        );
        assert_eq!(out.dimensions(), (128, 480));
        // Idle rows match the idle-mode output.
        assert_eq!(*out.get_pixel(10, 0), Rgba([70, 20, 30, 0xFF]));
        assert_eq!(*out.get_pixel(10, 288), Rgba([40, 20, 30, 0xFF]));
        assert_eq!(*out.get_pixel(10, 384), Rgba([27, 27, 27, 0xFF]));
    }

    #[test]
    fn head_offsets_shift_frames() {
        let mut table = HeadOffsetTable::new();
        let mut params = HeadParams::default();
        // dx +1, dy -2: the frame moves right one and down two.
        params.offset = StateOffsets {
            idle: vec![FrameOffset(1, -2); 4],
            ..Default::default()
        };
        table.insert("test".to_string(), params);
        let head_layout = resolve_head("test", &table);

        let head = process_head(&head_sheet(), (0, 576), &head_layout, &CropSpec::default(), true);
        let layer = &head.idle[&100];
        assert_eq!(*layer.get_pixel(11, 2), Rgba([70, 20, 30, 0xFF]));
        assert_eq!(*layer.get_pixel(10, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn positive_dy_clips_at_the_region_top() {
        let mut table = HeadOffsetTable::new();
        let mut params = HeadParams::default();
        params.offset = StateOffsets {
            idle: vec![FrameOffset(0, 2); 4],
            ..Default::default()
        };
        table.insert("test".to_string(), params);
        let head_layout = resolve_head("test", &table);

        let head = process_head(&head_sheet(), (0, 576), &head_layout, &CropSpec::default(), true);
        // The pixel sat at row 0 of its frame; moved up two it clips away.
        let layer = &head.idle[&100];
        assert!(layer.pixels().all(|px| px.0[3] == 0));
    }

    #[test]
    fn small_heads_center_and_rotate_cells() {
        // Small idle row lives at (0, 32) within a block; frames are 16 wide.
        let mut img = blank_opaque(256, 768);
        for block in 0..4u32 {
            let y = 192 * block + 32;
            // Frame 0, local (3, 1).
            img.put_pixel(3, y + 1, Rgba([200, 0, 0, 0xFF]));
            img.put_pixel(128 + 3, y + 1, Rgba([77, 77, 77, 0xFF]));
            // Frame 2, local (0, 0).
            img.put_pixel(32, y, Rgba([0, 200, 0, 0xFF]));
            img.put_pixel(128 + 32, y, Rgba([77, 77, 77, 0xFF]));
        }

        let mut table = HeadOffsetTable::new();
        table.insert(
            "test".to_string(),
            HeadParams {
                size: HeadSize::Small,
                ..Default::default()
            },
        );
        let head_layout = resolve_head("test", &table);

        let head = process_head(&img, (0, 0), &head_layout, &CropSpec::default(), true);
        let layer = &head.idle[&77];
        // Frame 0 lands in cell 3: x = 96 + 8 + 3, y = 1.
        assert_eq!(*layer.get_pixel(107, 1), Rgba([200, 0, 0, 0xFF]));
        // Frame 2 lands in cell 1: x = 32 + 8 + 0, y = 0.
        assert_eq!(*layer.get_pixel(40, 0), Rgba([0, 200, 0, 0xFF]));
    }

    #[test]
    fn body_rotation_applies_next_frames_offset() {
        let mut table = BodyOffsetTable::new();
        let mut params = BodyParams::default();
        params.offset.idle = vec![
            FrameOffset(0, 0),
            FrameOffset(2, 1),
            FrameOffset(0, 0),
            FrameOffset(0, 0),
        ];
        table.insert("test".to_string(), params);
        let body_layout = resolve_body("test", &table);

        let body = process_body(&body_sheet(), (0, 288), &body_layout, &CropSpec::default(), true);
        // Frame 0 uses the original frame 1 offset (2, 1): (5+2, 1-1).
        let layer = &body.idle[&150];
        assert_eq!(*layer.get_pixel(7, 0), Rgba([0, 70, 0, 0xFF]));
    }

    #[test]
    fn reverse_flips_idle_layer_order() {
        // Two overlapping layers at the same output position.
        let mut head = StateLayers::default();
        let mut low = blank(128, 96);
        low.put_pixel(0, 0, Rgba([1, 0, 0, 0xFF]));
        let mut high = blank(128, 96);
        high.put_pixel(0, 0, Rgba([2, 0, 0, 0xFF]));
        head.idle.insert(100, low);
        head.idle.insert(150, high);
        let body = StateLayers::default();

        let normal = compose_color_region(&head, &body, CompositeMode::Idle, false);
        assert_eq!(*normal.get_pixel(0, 0), Rgba([2, 0, 0, 0xFF]));

        let reversed = compose_color_region(&head, &body, CompositeMode::Idle, true);
        assert_eq!(*reversed.get_pixel(0, 0), Rgba([1, 0, 0, 0xFF]));
    }

    #[test]
    fn body_pastes_over_head_within_a_level() {
        let mut head = StateLayers::default();
        let mut head_layer = blank(128, 96);
        head_layer.put_pixel(4, 4, Rgba([1, 1, 1, 0xFF]));
        head.idle.insert(100, head_layer);

        let mut body = StateLayers::default();
        let mut body_layer = blank(128, 96);
        body_layer.put_pixel(4, 4, Rgba([2, 2, 2, 0xFF]));
        body.idle.insert(100, body_layer);

        let region = compose_color_region(&head, &body, CompositeMode::Idle, false);
        assert_eq!(*region.get_pixel(4, 4), Rgba([2, 2, 2, 0xFF]));
    }

    #[test]
    fn manual_offset_shifts_the_source_window() {
        let (head_layout, body_layout, order, spec) = defaults();
        // Shift the crop window down one row: the sprite pixel at row 0 of
        // each block now falls outside the window, except where the next
        // block's pixel slides in.
        let out = compose_sheet(
            &head_sheet(),
            &body_sheet(),
            &head_layout,
            &body_layout,
            &order,
            &spec,
            CompositeMode::Idle,
            true,
            (0, 1),
        );
        assert_eq!(*out.get_pixel(10, 0), Rgba([0, 0, 0, 0]));
    }
}
