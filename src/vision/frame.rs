//! Validated color frame.

use crate::error::{Error, Result};
use image::{DynamicImage, RgbImage};

/// Number of color channels a frame carries
pub const FRAME_CHANNELS: usize = 3;

/// A color frame with non-zero area.
///
/// Channel order is RGB. Sources that deliver BGR buffers must swap
/// before constructing a frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: RgbImage,
}

impl Frame {
    /// Wrap an RGB image, rejecting zero-area input.
    pub fn new(pixels: RgbImage) -> Result<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(Error::InvalidFrame(format!(
                "zero-area frame ({}x{})",
                pixels.width(),
                pixels.height()
            )));
        }
        Ok(Self { pixels })
    }

    /// Build a frame from a raw interleaved buffer.
    ///
    /// `channels` must be 3 and `data` must hold exactly
    /// `width * height * channels` bytes.
    pub fn from_raw(width: u32, height: u32, channels: usize, data: Vec<u8>) -> Result<Self> {
        if channels != FRAME_CHANNELS {
            return Err(Error::InvalidFrame(format!(
                "expected {} channels, got {}",
                FRAME_CHANNELS, channels
            )));
        }
        let expected = width as usize * height as usize * channels;
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "buffer holds {} bytes, {}x{}x{} needs {}",
                data.len(),
                width,
                height,
                channels,
                expected
            )));
        }
        let pixels = RgbImage::from_raw(width, height, data)
            .ok_or_else(|| Error::InvalidFrame("buffer/dimension mismatch".to_string()))?;
        Self::new(pixels)
    }

    /// Convert any decoded image into a frame.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self> {
        Self::new(image.into_rgb8())
    }

    /// Frame width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Frame height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Underlying pixel buffer
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Take ownership of the pixel buffer
    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }
}
