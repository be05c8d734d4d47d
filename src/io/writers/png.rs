use std::fs;
use std::path::Path;

use image::RgbaImage;

/// Write an RGBA sheet, creating parent directories as needed. The encoder
/// is chosen from the extension; output sheets are PNG by convention.
pub fn write_sheet(output: &Path, image: &RgbaImage) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    image.save(output)?;
    Ok(())
}
