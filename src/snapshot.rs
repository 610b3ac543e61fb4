//! Snapshot persistence.

use std::fs;
use std::path::Path;

use image::RgbImage;

use crate::error::Result;

/// Write a rendered frame to `path`. The format follows the file extension.
///
/// Parent directories are created as needed.
pub fn save_snapshot(image: &RgbImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    image.save(path)?;
    log::info!("Snapshot saved as '{}'", path.display());
    Ok(())
}
