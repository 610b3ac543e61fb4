//! Obstacle mask construction.
//!
//! Frame → luminance → inverted threshold → smoothing. Pixels at or below the
//! cutoff are treated as traversable, so dark regions score as free space.

use image::GrayImage;

use super::filter::{self, FREE};
use super::frame::Frame;
use crate::config::{FreeCriterion, ScannerConfig};
use crate::error::{Error, Result};

/// Binary free/obstacle grid with the dimensions of its source frame.
#[derive(Clone, Debug)]
pub struct ObstacleMask {
    grid: GrayImage,
}

impl ObstacleMask {
    /// Wrap an already thresholded grid.
    pub fn from_grid(grid: GrayImage) -> Self {
        Self { grid }
    }

    /// Mask width in pixels
    pub fn width(&self) -> u32 {
        self.grid.width()
    }

    /// Mask height in pixels
    pub fn height(&self) -> u32 {
        self.grid.height()
    }

    /// Raw mask value at (x, y)
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.grid.get_pixel(x, y).0[0]
    }

    /// Underlying grid
    pub fn grid(&self) -> &GrayImage {
        &self.grid
    }

    /// Count free pixels in the full-height column band `[x_start, x_end)`.
    ///
    /// Columns past the mask width are ignored.
    pub fn count_free(&self, x_start: u32, x_end: u32, criterion: FreeCriterion) -> u64 {
        let x_end = x_end.min(self.width());
        if x_start >= x_end {
            return 0;
        }

        let width = self.width() as usize;
        let (start, end) = (x_start as usize, x_end as usize);
        self.grid
            .as_raw()
            .chunks_exact(width)
            .map(|row| {
                row[start..end]
                    .iter()
                    .filter(|&&v| match criterion {
                        FreeCriterion::Saturated => v == FREE,
                        FreeCriterion::Nonzero => v != 0,
                    })
                    .count() as u64
            })
            .sum()
    }
}

/// Builds obstacle masks from color frames.
#[derive(Clone, Debug)]
pub struct MaskBuilder {
    threshold: u8,
    blur_kernel: usize,
}

impl MaskBuilder {
    /// Create a builder with an explicit cutoff and kernel size.
    ///
    /// Fails with [`Error::Config`] unless the kernel size is 1, 3, 5 or 7.
    pub fn new(threshold: u8, blur_kernel: usize) -> Result<Self> {
        if filter::binomial_kernel(blur_kernel).is_none() {
            return Err(Error::Config(format!(
                "unsupported blur kernel size {}",
                blur_kernel
            )));
        }
        Ok(Self {
            threshold,
            blur_kernel,
        })
    }

    /// Create a builder from scanner configuration.
    pub fn from_config(config: &ScannerConfig) -> Result<Self> {
        Self::new(config.threshold, config.blur_kernel)
    }

    /// Smoothing kernel size
    pub fn blur_kernel(&self) -> usize {
        self.blur_kernel
    }

    /// Luminance cutoff
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Run the full mask pipeline on a frame.
    pub fn build(&self, frame: &Frame) -> ObstacleMask {
        let mut gray = filter::grayscale(frame.pixels());
        filter::threshold_inverted(&mut gray, self.threshold);
        let smoothed = filter::gaussian_blur(&gray, self.blur_kernel);
        ObstacleMask::from_grid(smoothed)
    }
}

impl Default for MaskBuilder {
    fn default() -> Self {
        let config = ScannerConfig::default();
        Self {
            threshold: config.threshold,
            blur_kernel: config.blur_kernel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn split_frame(width: u32, height: u32, dark_until: u32) -> Frame {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < dark_until {
                Rgb([20, 20, 20])
            } else {
                Rgb([240, 240, 240])
            }
        });
        Frame::new(img).unwrap()
    }

    #[test]
    fn test_mask_matches_frame_dimensions() {
        let frame = split_frame(37, 11, 10);
        let mask = MaskBuilder::default().build(&frame);
        assert_eq!((mask.width(), mask.height()), (37, 11));
    }

    #[test]
    fn test_dark_is_free_bright_is_obstacle() {
        let frame = split_frame(40, 10, 20);
        let mask = MaskBuilder::new(200, 1).unwrap().build(&frame);
        assert_eq!(mask.value(0, 0), FREE);
        assert_eq!(mask.value(19, 5), FREE);
        assert_eq!(mask.value(20, 5), 0);
        assert_eq!(mask.value(39, 9), 0);
    }

    #[test]
    fn test_threshold_boundary_luminance() {
        let at_cutoff = Frame::new(RgbImage::from_pixel(4, 4, Rgb([200, 200, 200]))).unwrap();
        let above = Frame::new(RgbImage::from_pixel(4, 4, Rgb([201, 201, 201]))).unwrap();
        let builder = MaskBuilder::new(200, 5).unwrap();
        assert_eq!(builder.build(&at_cutoff).value(2, 2), FREE);
        assert_eq!(builder.build(&above).value(2, 2), 0);
    }

    #[test]
    fn test_blur_edge_affects_criteria_differently() {
        let frame = split_frame(40, 10, 20);
        let mask = MaskBuilder::new(200, 5).unwrap().build(&frame);

        // Saturated pixels shrink away from the edge, non-zero pixels spread past it
        let saturated = mask.count_free(0, 40, FreeCriterion::Saturated);
        let nonzero = mask.count_free(0, 40, FreeCriterion::Nonzero);
        assert_eq!(saturated, 18 * 10);
        assert_eq!(nonzero, 22 * 10);
    }

    #[test]
    fn test_unsupported_kernel_rejected() {
        for size in [0usize, 2, 4, 9] {
            assert!(matches!(MaskBuilder::new(200, size), Err(Error::Config(_))));
        }
        let builder = MaskBuilder::new(200, 7).unwrap();
        assert_eq!(builder.blur_kernel(), 7);
        assert_eq!(MaskBuilder::default().blur_kernel(), 5);
    }

    #[test]
    fn test_count_free_clamps_range() {
        let frame = split_frame(10, 3, 10);
        let mask = MaskBuilder::new(200, 1).unwrap().build(&frame);
        assert_eq!(mask.count_free(5, 50, FreeCriterion::Saturated), 15);
        assert_eq!(mask.count_free(8, 8, FreeCriterion::Saturated), 0);
        assert_eq!(mask.count_free(12, 20, FreeCriterion::Saturated), 0);
    }
}
