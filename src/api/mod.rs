//! High-level, ergonomic library API: composite sheets to files or in-memory
//! buffers, batch helpers for whole class tables, and table/sheet
//! maintenance. Prefer these entrypoints over the low-level compositing
//! modules when embedding FESPRITE.
use std::fs;
use std::path::Path;

use image::RgbaImage;
use tracing::{info, warn};

use crate::core::compositing::{compose_sheet, resolve_body, resolve_head};
use crate::core::params::CompositeParams;
use crate::core::prepare::{self, PrepareReport};
use crate::error::{Error, Result};
use crate::io::data;
use crate::io::sheets::SheetSource;
use crate::io::writers::metadata::{SheetMetadata, create_sheet_metadata_sidecar};
use crate::io::writers::png::write_sheet;

/// Result of in-memory compositing
#[derive(Debug, Clone)]
pub struct ComposedSheet {
    pub image: RgbaImage,
    pub metadata: SheetMetadata,
}

/// Composite a head/body pair to an in-memory sheet (no output I/O)
pub fn composite_to_buffer(
    root: &Path,
    head: &str,
    body: &str,
    params: &CompositeParams,
) -> Result<ComposedSheet> {
    let head_paths = data::load_head_paths(root)?;
    let body_paths = data::load_body_paths(root)?;

    let head_entry = head_paths.get(head).ok_or_else(|| Error::UnknownHead {
        name: head.to_string(),
    })?;
    let body_entry = body_paths.get(body).ok_or_else(|| Error::UnknownBody {
        name: body.to_string(),
    })?;

    let head_offsets = data::load_head_offsets(root)?;
    let body_offsets = data::load_body_offsets(root)?;
    let color_order = data::load_color_order(root)?;
    let crop_spec = data::load_crop_spec(root)?;

    let head_sheet = SheetSource::open(data::sheet_path(root, head_entry))?;
    let body_sheet = SheetSource::open(data::sheet_path(root, body_entry))?;

    // Head placement is a property of the body class being worn.
    let head_layout = resolve_head(body, &head_offsets);
    let body_layout = resolve_body(body, &body_offsets);

    let image = compose_sheet(
        &head_sheet.image,
        &body_sheet.image,
        &head_layout,
        &body_layout,
        &color_order,
        &crop_spec,
        params.mode,
        params.alpha,
        params.offset,
    );
    let (width, height) = image.dimensions();

    let metadata = SheetMetadata {
        head: head.to_string(),
        body: body.to_string(),
        head_name: head_entry.name.clone(),
        body_name: body_entry.name.clone(),
        mode: params.mode,
        head_size: head_layout.size,
        reverse: head_layout.reverse,
        alpha: params.alpha,
        width,
        height,
        conversion_tool: String::new(),
        conversion_version: String::new(),
        conversion_timestamp: String::new(),
    }
    .stamped();

    Ok(ComposedSheet { image, metadata })
}

/// Composite a head/body pair to an output sheet using CompositeParams
pub fn composite_to_path(
    root: &Path,
    head: &str,
    body: &str,
    params: &CompositeParams,
    output: &Path,
) -> Result<()> {
    let sheet = composite_to_buffer(root, head, body, params)?;
    write_sheet(output, &sheet.image).map_err(Error::external)?;
    if params.sidecar {
        create_sheet_metadata_sidecar(output, &sheet.metadata).map_err(Error::external)?;
    }
    info!(
        "Composited {} + {} -> {} ({}x{})",
        head,
        body,
        output.display(),
        sheet.metadata.width,
        sheet.metadata.height
    );
    Ok(())
}

/// Batch compositing report
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Return an iterator over registered body class names
pub fn iterate_body_classes(root: &Path) -> Result<std::vec::IntoIter<String>> {
    let table = data::load_body_paths(root)?;
    Ok(table.keys().cloned().collect::<Vec<_>>().into_iter())
}

/// Composite `head` against every registered body class into `output_dir`.
/// If `continue_on_error` is true, failures are counted in the report and
/// processing continues; otherwise the first error is returned.
pub fn composite_directory_to_path(
    root: &Path,
    head: &str,
    output_dir: &Path,
    params: &CompositeParams,
    continue_on_error: bool,
) -> Result<BatchReport> {
    fs::create_dir_all(output_dir)?;

    let body_paths = data::load_body_paths(root)?;
    let mut report = BatchReport::default();

    for (body, entry) in &body_paths {
        let sheet_file = data::sheet_path(root, entry);
        if !sheet_file.is_file() {
            warn!("Skipping {}: sheet {} is missing", body, sheet_file.display());
            report.skipped += 1;
            continue;
        }

        let output_path = output_dir.join(format!("{}_{}.png", head, body));
        match composite_to_path(root, head, body, params, &output_path) {
            Ok(()) => report.processed += 1,
            Err(e) => {
                report.errors += 1;
                if !continue_on_error {
                    return Err(e);
                }
                warn!("Error compositing {} + {}: {}", head, body, e);
            }
        }
    }

    Ok(report)
}

/// Typed save helper for composited sheets
pub fn save_sheet(image: &RgbaImage, path: &Path) -> Result<()> {
    write_sheet(path, image).map_err(Error::external)
}

/// Regenerate intermediate sheets from the raw rips under the input root
pub fn prepare_directory(root: &Path) -> Result<PrepareReport> {
    prepare::prepare_directory(root).map_err(Error::external)
}

/// Regenerate the head and body path tables from the sheet directories
pub fn scan_sheets(root: &Path) -> Result<(usize, usize)> {
    data::scan_sheets(root).map_err(Error::from)
}
