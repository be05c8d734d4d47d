//! JSON metadata sidecars for composited sheets.
//!
//! PNG carries no structured metadata worth relying on, so provenance is
//! written to a `.json` sidecar next to the output file when requested.
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{CompositeMode, HeadSize};

/// Provenance and compositing summary for one output sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub head: String,
    pub body: String,
    pub head_name: String,
    pub body_name: String,
    pub mode: CompositeMode,
    pub head_size: HeadSize,
    pub reverse: bool,
    pub alpha: bool,
    pub width: u32,
    pub height: u32,

    // Conversion provenance
    pub conversion_tool: String,
    pub conversion_version: String,
    pub conversion_timestamp: String,
}

impl SheetMetadata {
    /// Stamp the tool name, version and current UTC timestamp.
    pub fn stamped(mut self) -> Self {
        self.conversion_tool = env!("CARGO_PKG_NAME").to_string();
        self.conversion_version = env!("CARGO_PKG_VERSION").to_string();
        self.conversion_timestamp = chrono::Utc::now().to_rfc3339();
        self
    }
}

/// Write a metadata sidecar next to `output` (same stem, `.json` extension).
pub fn create_sheet_metadata_sidecar(
    output: &Path,
    metadata: &SheetMetadata,
) -> Result<(), Box<dyn std::error::Error>> {
    let sidecar = output.with_extension("json");
    let json = serde_json::to_string_pretty(metadata)?;
    fs::write(&sidecar, json)?;
    Ok(())
}
