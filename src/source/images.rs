//! Image-sequence source
//!
//! Plays back a directory of still images in file-name order. Useful for
//! replaying recorded runs and for tuning the threshold offline.

use std::fs;
use std::path::{Path, PathBuf};

use super::FrameSource;
use crate::error::{Error, Result};
use crate::vision::Frame;

/// File extensions picked up from the directory
const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "pgm", "ppm"];

/// Frames read from image files in a directory
pub struct ImageSequenceSource {
    name: String,
    files: Vec<PathBuf>,
    cursor: usize,
    looping: bool,
}

impl ImageSequenceSource {
    /// Scan `dir` for image files.
    ///
    /// Fails with [`Error::DeviceUnavailable`] when the directory is missing
    /// or holds no images.
    pub fn open<P: AsRef<Path>>(dir: P, looping: bool) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|e| {
            Error::DeviceUnavailable(format!("cannot read {}: {}", dir.display(), e))
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && has_image_extension(path))
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(Error::DeviceUnavailable(format!(
                "no image files in {}",
                dir.display()
            )));
        }

        log::info!(
            "Opened image sequence {} ({} frames{})",
            dir.display(),
            files.len(),
            if looping { ", looping" } else { "" }
        );

        Ok(Self {
            name: format!("images:{}", dir.display()),
            files,
            cursor: 0,
            looping,
        })
    }

    /// Number of files in the sequence
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Always false; opening fails on an empty directory
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

impl FrameSource for ImageSequenceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if self.cursor >= self.files.len() {
            if !self.looping {
                return Err(Error::EndOfStream);
            }
            self.cursor = 0;
        }

        let path = &self.files[self.cursor];
        self.cursor += 1;

        let image = image::open(path)
            .map_err(|e| Error::FrameGrab(format!("{}: {}", path.display(), e)))?;
        Frame::from_dynamic(image)
    }
}

impl Drop for ImageSequenceSource {
    fn drop(&mut self) {
        log::info!("Released frame source {}", self.name);
    }
}
