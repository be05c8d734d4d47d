use serde::{Deserialize, Serialize};

use crate::types::CompositeMode;

/// Compositing parameters suitable for config files and GUI presets
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompositeParams {
    pub mode: CompositeMode,
    /// If true, opaque black becomes transparency on the output sheet
    pub alpha: bool,
    /// Manual X-Y offset applied to the source crop windows
    pub offset: (i64, i64),
    /// If true, write a JSON metadata sidecar next to each output sheet
    pub sidecar: bool,
}

impl Default for CompositeParams {
    fn default() -> Self {
        Self {
            mode: CompositeMode::Idle,
            alpha: true,
            offset: (0, 0),
            sidecar: false,
        }
    }
}
