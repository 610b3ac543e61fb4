//! Synthetic camera for hardware-free runs
//!
//! Produces a bright scene with one dark corridor that sweeps left and right
//! across the frame, plus seeded speckle noise so the smoothing stage has
//! something to remove.
//!
//! ```text
//! frame 0          frame P/4          frame P/2
//! ▓░░░░░░░░░       ░░░░▓▓░░░░        ░░░░░░░░▓▓
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use image::{Rgb, RgbImage};

use super::FrameSource;
use crate::error::{Error, Result};
use crate::vision::Frame;

/// Frames for one full left-right-left sweep
const SWEEP_PERIOD: u64 = 90;
/// Scene brightness (reads as obstacle)
const BACKGROUND_LEVEL: u8 = 235;
/// Corridor brightness (reads as free space)
const CORRIDOR_LEVEL: u8 = 40;
/// Probability that a pixel is replaced by random speckle
const SPECKLE_RATE: f64 = 0.002;

/// Generated frames with a moving free corridor
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_limit: u64,
    produced: u64,
    corridor_width: u32,
    rng: StdRng,
}

impl SyntheticSource {
    /// Create a generator. `frame_limit == 0` streams forever; `seed == 0`
    /// draws a fresh seed from the OS.
    pub fn new(width: u32, height: u32, frame_limit: u64, seed: u64) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::DeviceUnavailable(format!(
                "synthetic camera needs a non-zero size (got {}x{})",
                width, height
            )));
        }

        let rng = if seed == 0 {
            StdRng::from_entropy()
        } else {
            StdRng::seed_from_u64(seed)
        };

        log::info!(
            "Synthetic camera {}x{} ({})",
            width,
            height,
            if frame_limit == 0 {
                "endless".to_string()
            } else {
                format!("{} frames", frame_limit)
            }
        );

        Ok(Self {
            width,
            height,
            frame_limit,
            produced: 0,
            corridor_width: (width / 5).max(1),
            rng,
        })
    }

    /// Horizontal center of the corridor in frame `index`.
    pub fn corridor_center(&self, index: u64) -> u32 {
        let half = self.corridor_width / 2;
        let travel = self.width.saturating_sub(self.corridor_width) as f32;
        let phase = (index % SWEEP_PERIOD) as f32 / SWEEP_PERIOD as f32;
        let triangle = if phase < 0.5 {
            phase * 2.0
        } else {
            2.0 - phase * 2.0
        };
        half + (triangle * travel).round() as u32
    }

    /// Width of the corridor in pixels
    pub fn corridor_width(&self) -> u32 {
        self.corridor_width
    }

    fn render(&mut self, index: u64) -> RgbImage {
        let center = self.corridor_center(index);
        let x0 = center.saturating_sub(self.corridor_width / 2);
        let x1 = (x0 + self.corridor_width).min(self.width);

        let mut image = RgbImage::new(self.width, self.height);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            let level = if self.rng.gen_bool(SPECKLE_RATE) {
                self.rng.r#gen::<u8>()
            } else if x >= x0 && x < x1 {
                CORRIDOR_LEVEL
            } else {
                BACKGROUND_LEVEL
            };
            *pixel = Rgb([level, level, level]);
        }
        image
    }
}

impl FrameSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn next_frame(&mut self) -> Result<Frame> {
        if self.frame_limit > 0 && self.produced >= self.frame_limit {
            return Err(Error::EndOfStream);
        }
        let image = self.render(self.produced);
        self.produced += 1;
        Frame::new(image)
    }
}

impl Drop for SyntheticSource {
    fn drop(&mut self) {
        log::info!(
            "Released synthetic camera after {} frames",
            self.produced
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_limit() {
        let mut source = SyntheticSource::new(40, 30, 3, 7).unwrap();
        for _ in 0..3 {
            assert!(source.next_frame().is_ok());
        }
        assert!(matches!(source.next_frame(), Err(Error::EndOfStream)));
    }

    #[test]
    fn test_same_seed_same_frames() {
        let mut a = SyntheticSource::new(50, 20, 0, 11).unwrap();
        let mut b = SyntheticSource::new(50, 20, 0, 11).unwrap();
        for _ in 0..4 {
            assert_eq!(
                a.next_frame().unwrap().pixels().as_raw(),
                b.next_frame().unwrap().pixels().as_raw()
            );
        }
    }

    #[test]
    fn test_corridor_sweeps() {
        let source = SyntheticSource::new(500, 10, 0, 1).unwrap();
        assert_eq!(source.corridor_width(), 100);
        assert_eq!(source.corridor_center(0), 50);
        assert_eq!(source.corridor_center(SWEEP_PERIOD / 2), 450);
        assert_eq!(source.corridor_center(SWEEP_PERIOD), 50);
    }

    #[test]
    fn test_zero_size_unavailable() {
        assert!(matches!(
            SyntheticSource::new(0, 10, 0, 1),
            Err(Error::DeviceUnavailable(_))
        ));
    }
}
