//! JSON data tables driving the compositor: sheet path tables, per-class
//! offset tables, source-sheet crop geometry, source color-block order, and
//! raw-rip cropping rectangles.
//!
//! Path and offset tables live as plain JSON under the input root and are
//! meant to be edited (or regenerated with [`scan_sheets`]). The geometry
//! tables (`.src_crop.json`, `.src_color.json`, `.raw_head.json`,
//! `.raw_body.json`) are optional overrides; the known per-game layout is
//! built in as the default.
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::types::{ColorVariant, FacingState, HeadSize};

/// Sheet directories under the input root.
pub const HEAD_DIR: &str = "head";
pub const BODY_DIR: &str = "body";
pub const RAW_HEAD_DIR: &str = "raw_head";
pub const RAW_BODY_DIR: &str = "raw_body";

/// Table files under the input root.
pub const HEAD_PATHS_FILE: &str = "head.json";
pub const BODY_PATHS_FILE: &str = "body.json";
pub const HEAD_OFFSETS_FILE: &str = "head_offsets.json";
pub const BODY_OFFSETS_FILE: &str = "body_offsets.json";
pub const SRC_COLOR_FILE: &str = ".src_color.json";
pub const SRC_CROP_FILE: &str = ".src_crop.json";
pub const RAW_HEAD_FILE: &str = ".raw_head.json";
pub const RAW_BODY_FILE: &str = ".raw_body.json";

/// Fallback key in the raw-rect tables.
pub const RAW_DEFAULT_KEY: &str = "?::default";

/// Animation frames per state row.
pub const FRAMES: usize = 4;

/// Errors encountered when reading or writing data tables
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing table file {file:?}; run a scan to regenerate it")]
    MissingTable { file: PathBuf },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| DataError::Json {
        file: path.display().to_string(),
        source,
    })
}

/// One entry in a sheet path table: the on-disk location (relative to the
/// input root) and a human-readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub path: Vec<String>,
    pub name: String,
}

pub type PathTable = BTreeMap<String, SheetEntry>;

/// Resolve a table entry to an absolute sheet path under `root`.
pub fn sheet_path(root: &Path, entry: &SheetEntry) -> PathBuf {
    entry.path.iter().fold(root.to_path_buf(), |p, c| p.join(c))
}

/// Per-frame X-Y shift applied before pasting. Positive Y moves the frame up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameOffset(pub i32, pub i32);

/// Offset lists per animation state. Lists shorter than four entries are
/// padded with zeros; longer lists are truncated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StateOffsets {
    pub idle: Vec<FrameOffset>,
    pub left: Vec<FrameOffset>,
    pub right: Vec<FrameOffset>,
}

impl StateOffsets {
    pub fn frames(&self, state: FacingState) -> [FrameOffset; FRAMES] {
        let list = match state {
            FacingState::Idle => &self.idle,
            FacingState::Left => &self.left,
            FacingState::Right => &self.right,
        };
        let mut out = [FrameOffset::default(); FRAMES];
        for (slot, off) in out.iter_mut().zip(list.iter()) {
            *slot = *off;
        }
        out
    }
}

/// Head compositing parameters for one character class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadParams {
    pub size: HeadSize,
    pub reverse: bool,
    pub offset: StateOffsets,
}

/// Body compositing parameters for one character class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyParams {
    pub offset: StateOffsets,
}

pub type HeadOffsetTable = BTreeMap<String, HeadParams>;
pub type BodyOffsetTable = BTreeMap<String, BodyParams>;

/// Per-state crop origins on a prepared sheet (within one color block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateOrigins {
    pub idle: (u32, u32),
    pub left: (u32, u32),
    pub right: (u32, u32),
}

impl StateOrigins {
    pub fn get(&self, state: FacingState) -> (u32, u32) {
        match state {
            FacingState::Idle => self.idle,
            FacingState::Left => self.left,
            FacingState::Right => self.right,
        }
    }
}

/// Frame size and per-state origins for one kind of sprite region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub size: (u32, u32),
    #[serde(rename = "where")]
    pub origin: StateOrigins,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadCrop {
    pub large: CropRegion,
    pub small: CropRegion,
}

impl HeadCrop {
    pub fn get(&self, size: HeadSize) -> &CropRegion {
        match size {
            HeadSize::Small => &self.small,
            HeadSize::Large => &self.large,
        }
    }
}

/// Cropping geometry for prepared head and body sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropSpec {
    pub head: HeadCrop,
    pub body: CropRegion,
}

impl Default for CropSpec {
    fn default() -> Self {
        CropSpec {
            head: HeadCrop {
                large: CropRegion {
                    size: (32, 32),
                    origin: StateOrigins {
                        idle: (0, 0),
                        left: (0, 64),
                        right: (0, 96),
                    },
                },
                // The 127/143 origins are a one-pixel quirk of the known rips.
                small: CropRegion {
                    size: (16, 16),
                    origin: StateOrigins {
                        idle: (0, 32),
                        left: (0, 127),
                        right: (0, 143),
                    },
                },
            },
            body: CropRegion {
                size: (32, 32),
                origin: StateOrigins {
                    idle: (0, 0),
                    left: (0, 32),
                    right: (0, 64),
                },
            },
        }
    }
}

/// Color-block order on source sheets (block index per variant).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorOrder(pub BTreeMap<ColorVariant, u32>);

impl Default for ColorOrder {
    fn default() -> Self {
        let mut order = BTreeMap::new();
        order.insert(ColorVariant::Purple, 0);
        order.insert(ColorVariant::Green, 1);
        order.insert(ColorVariant::Red, 2);
        order.insert(ColorVariant::Blue, 3);
        ColorOrder(order)
    }
}

impl ColorOrder {
    pub fn block_index(&self, color: ColorVariant) -> u32 {
        match self.0.get(&color) {
            Some(&idx) => idx,
            None => {
                warn!("color {} missing from source order table, using default", color);
                ColorOrder::default().0[&color]
            }
        }
    }
}

/// Crop rectangle on a raw ripped sheet: x, y, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRect(pub u32, pub u32, pub u32, pub u32);

/// The three rectangles cut out of one color block of a raw sheet. For head
/// sheets the `left`/`right` slots actually hold the combined large and
/// small move rows; the key names mirror the table files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStateRects {
    pub idle: RawRect,
    pub left: RawRect,
    pub right: RawRect,
}

/// Rectangles for all four color blocks of one raw sheet, keyed "0".."3".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSheetRects(pub BTreeMap<String, RawStateRects>);

impl RawSheetRects {
    pub fn block(&self, n: usize) -> Option<&RawStateRects> {
        self.0.get(&n.to_string())
    }
}

pub type RawTable = BTreeMap<String, RawSheetRects>;

fn raw_blocks(per_block: impl Fn(u32) -> RawStateRects) -> RawSheetRects {
    let mut blocks = BTreeMap::new();
    for n in 0..4u32 {
        blocks.insert(n.to_string(), per_block(n));
    }
    RawSheetRects(blocks)
}

/// Raw head-sheet rectangles for the known rip layout (584-row block stride).
pub fn default_raw_head_rects() -> RawSheetRects {
    raw_blocks(|n| RawStateRects {
        idle: RawRect(2, 2 + 584 * n, 256, 64),
        left: RawRect(2, 70 + 584 * n, 256, 64),
        right: RawRect(2, 406 + 584 * n, 256, 48),
    })
}

/// Raw body-sheet rectangles for the known rip layout (552-row block stride).
pub fn default_raw_body_rects() -> RawSheetRects {
    raw_blocks(|n| RawStateRects {
        idle: RawRect(2, 2 + 552 * n, 256, 32),
        left: RawRect(2, 38 + 552 * n, 256, 32),
        right: RawRect(2, 70 + 552 * n, 256, 32),
    })
}

/// Look up the rectangles for one raw sheet, falling back to the table's
/// `?::default` entry and then to the built-in layout.
pub fn raw_rects_for<'a>(
    table: &'a RawTable,
    stem: &str,
    builtin: fn() -> RawSheetRects,
) -> RawSheetRects {
    table
        .get(stem)
        .or_else(|| table.get(RAW_DEFAULT_KEY))
        .cloned()
        .unwrap_or_else(builtin)
}

pub fn load_head_paths(root: &Path) -> Result<PathTable, DataError> {
    let path = root.join(HEAD_PATHS_FILE);
    if !path.is_file() {
        return Err(DataError::MissingTable { file: path });
    }
    read_json(&path)
}

pub fn load_body_paths(root: &Path) -> Result<PathTable, DataError> {
    let path = root.join(BODY_PATHS_FILE);
    if !path.is_file() {
        return Err(DataError::MissingTable { file: path });
    }
    read_json(&path)
}

/// Missing offset tables are not fatal: every class then composites with
/// default parameters, exactly like an unlisted class.
pub fn load_head_offsets(root: &Path) -> Result<HeadOffsetTable, DataError> {
    let path = root.join(HEAD_OFFSETS_FILE);
    if !path.is_file() {
        warn!("{} not found, all classes use default head parameters", path.display());
        return Ok(HeadOffsetTable::new());
    }
    read_json(&path)
}

pub fn load_body_offsets(root: &Path) -> Result<BodyOffsetTable, DataError> {
    let path = root.join(BODY_OFFSETS_FILE);
    if !path.is_file() {
        warn!("{} not found, all classes use default body parameters", path.display());
        return Ok(BodyOffsetTable::new());
    }
    read_json(&path)
}

pub fn load_color_order(root: &Path) -> Result<ColorOrder, DataError> {
    let path = root.join(SRC_COLOR_FILE);
    if !path.is_file() {
        return Ok(ColorOrder::default());
    }
    read_json(&path)
}

pub fn load_crop_spec(root: &Path) -> Result<CropSpec, DataError> {
    let path = root.join(SRC_CROP_FILE);
    if !path.is_file() {
        return Ok(CropSpec::default());
    }
    read_json(&path)
}

pub fn load_raw_head_rects(root: &Path) -> Result<RawTable, DataError> {
    let path = root.join(RAW_HEAD_FILE);
    if !path.is_file() {
        return Ok(RawTable::new());
    }
    read_json(&path)
}

pub fn load_raw_body_rects(root: &Path) -> Result<RawTable, DataError> {
    let path = root.join(RAW_BODY_FILE);
    if !path.is_file() {
        return Ok(RawTable::new());
    }
    read_json(&path)
}

/// Regenerate `head.json` and `body.json` from the sheet directories.
/// Returns the number of head and body sheets registered.
pub fn scan_sheets(root: &Path) -> Result<(usize, usize), DataError> {
    let heads = scan_directory(root, HEAD_DIR, HEAD_PATHS_FILE)?;
    let bodies = scan_directory(root, BODY_DIR, BODY_PATHS_FILE)?;
    Ok((heads, bodies))
}

fn scan_directory(root: &Path, dir: &str, table_file: &str) -> Result<usize, DataError> {
    let mut table = PathTable::new();
    let dir_path = root.join(dir);

    if dir_path.is_dir() {
        for entry in fs::read_dir(&dir_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            table.insert(
                stem.to_string(),
                SheetEntry {
                    path: vec![dir.to_string(), format!("{}.png", stem)],
                    name: display_name(stem),
                },
            );
        }
    } else {
        warn!("sheet directory {} not found, writing empty table", dir_path.display());
    }

    let out = root.join(table_file);
    let json = serde_json::to_string_pretty(&table).map_err(|source| DataError::Json {
        file: out.display().to_string(),
        source,
    })?;
    fs::write(&out, json)?;
    Ok(table.len())
}

/// Turn a file stem into a display name: words split on '-', capitalized;
/// single letters render parenthesized, two-letter words stay as-is.
pub fn display_name(stem: &str) -> String {
    stem.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match (word.chars().count(), chars.next()) {
                (1, Some(c)) => format!("({})", c.to_uppercase()),
                (2, _) => word.to_string(),
                (_, Some(c)) => format!("{}{}", c.to_uppercase(), chars.as_str()),
                (_, None) => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names() {
        assert_eq!(display_name("adventurer-f"), "Adventurer (F)");
        assert_eq!(display_name("master-of-arms-m"), "Master of Arms (M)");
        assert_eq!(display_name("nine-tails"), "Nine Tails");
        assert_eq!(display_name("maid"), "Maid");
    }

    #[test]
    fn head_params_defaults_from_sparse_json() {
        let json = r#"{ "offset": { "idle": [[1, 2]] } }"#;
        let params: HeadParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.size, HeadSize::Large);
        assert!(!params.reverse);

        let frames = params.offset.frames(FacingState::Idle);
        assert_eq!(frames[0], FrameOffset(1, 2));
        assert_eq!(frames[1], FrameOffset(0, 0));
        assert_eq!(params.offset.frames(FacingState::Left), [FrameOffset(0, 0); 4]);
    }

    #[test]
    fn head_params_full_entry() {
        let json = r#"
        {
            "size": "small",
            "reverse": true,
            "offset": {
                "idle":  [[2, -2], [2, -2], [2, -2], [2, -2]],
                "left":  [[0, 0], [0, 0], [0, 0], [0, 0]],
                "right": [[0, 0], [0, 0], [0, 0], [0, 0]]
            }
        }"#;
        let params: HeadParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.size, HeadSize::Small);
        assert!(params.reverse);
        assert_eq!(params.offset.frames(FacingState::Idle)[3], FrameOffset(2, -2));
    }

    #[test]
    fn crop_spec_default_geometry() {
        let spec = CropSpec::default();
        assert_eq!(spec.head.large.size, (32, 32));
        assert_eq!(spec.head.large.origin.get(FacingState::Right), (0, 96));
        assert_eq!(spec.head.small.size, (16, 16));
        assert_eq!(spec.head.small.origin.get(FacingState::Idle), (0, 32));
        assert_eq!(spec.body.origin.get(FacingState::Left), (0, 32));
    }

    #[test]
    fn crop_spec_round_trips_with_where_key() {
        let spec = CropSpec::default();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"where\""));
        let back: CropSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn color_order_default_and_fallback() {
        let order = ColorOrder::default();
        assert_eq!(order.block_index(ColorVariant::Purple), 0);
        assert_eq!(order.block_index(ColorVariant::Blue), 3);

        let partial = ColorOrder(BTreeMap::new());
        assert_eq!(partial.block_index(ColorVariant::Green), 1);
    }

    #[test]
    fn raw_rect_fallback_chain() {
        let mut table = RawTable::new();
        table.insert(
            RAW_DEFAULT_KEY.to_string(),
            raw_blocks(|n| RawStateRects {
                idle: RawRect(0, n, 8, 8),
                left: RawRect(0, n, 8, 8),
                right: RawRect(0, n, 8, 8),
            }),
        );

        let fallback = raw_rects_for(&table, "unlisted", default_raw_head_rects);
        assert_eq!(fallback.block(2).unwrap().idle, RawRect(0, 2, 8, 8));

        let builtin = raw_rects_for(&RawTable::new(), "unlisted", default_raw_head_rects);
        assert_eq!(builtin.block(1).unwrap().idle, RawRect(2, 586, 256, 64));
        assert_eq!(builtin.block(0).unwrap().right, RawRect(2, 406, 256, 48));
    }

    #[test]
    fn sheet_path_joins_components() {
        let entry = SheetEntry {
            path: vec!["head".into(), "archer-f.png".into()],
            name: "Archer (F)".into(),
        };
        let path = sheet_path(Path::new("inputs"), &entry);
        assert_eq!(path, PathBuf::from("inputs").join("head").join("archer-f.png"));
    }
}
