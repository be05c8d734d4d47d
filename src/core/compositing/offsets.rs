//! Per-class compositing parameters resolved from the offset tables.
//!
//! Head parameters are keyed by the body class name: the class determines
//! where any head sits on the assembled sprite. Body offset lists are
//! rotated left by one before use; the games store body animation frames
//! one phase ahead of large-head frames.
use tracing::warn;

use crate::io::data::{
    BodyOffsetTable, FRAMES, FrameOffset, HeadOffsetTable, StateOffsets,
};
use crate::types::{FacingState, HeadSize};

/// Resolved head placement parameters for one class.
#[derive(Debug, Clone, Default)]
pub struct HeadLayout {
    pub size: HeadSize,
    pub reverse: bool,
    offsets: StateOffsets,
}

impl HeadLayout {
    pub fn frames(&self, state: FacingState) -> [FrameOffset; FRAMES] {
        self.offsets.frames(state)
    }
}

/// Resolved body placement parameters for one class (rotation applied).
#[derive(Debug, Clone, Default)]
pub struct BodyLayout {
    idle: [FrameOffset; FRAMES],
    left: [FrameOffset; FRAMES],
    right: [FrameOffset; FRAMES],
}

impl BodyLayout {
    pub fn frames(&self, state: FacingState) -> [FrameOffset; FRAMES] {
        match state {
            FacingState::Idle => self.idle,
            FacingState::Left => self.left,
            FacingState::Right => self.right,
        }
    }
}

/// `[o0, o1, o2, o3]` -> `[o1, o2, o3, o0]`
pub fn rotate_frames(frames: [FrameOffset; FRAMES]) -> [FrameOffset; FRAMES] {
    [frames[1], frames[2], frames[3], frames[0]]
}

pub fn resolve_head(class: &str, table: &HeadOffsetTable) -> HeadLayout {
    match table.get(class) {
        Some(params) => HeadLayout {
            size: params.size,
            reverse: params.reverse,
            offsets: params.offset.clone(),
        },
        None => {
            warn!("class {} has no head parameters, continuing with defaults", class);
            HeadLayout::default()
        }
    }
}

pub fn resolve_body(class: &str, table: &BodyOffsetTable) -> BodyLayout {
    let offsets = table
        .get(class)
        .map(|params| params.offset.clone())
        .unwrap_or_default();
    BodyLayout {
        idle: rotate_frames(offsets.frames(FacingState::Idle)),
        left: rotate_frames(offsets.frames(FacingState::Left)),
        right: rotate_frames(offsets.frames(FacingState::Right)),
    }
}
