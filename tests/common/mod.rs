//! Test utilities for MargaNav integration tests.
//!
//! Frame builders for known free-space layouts.

#![allow(dead_code)]

use image::{Rgb, RgbImage};
use marga_nav::Frame;
use marga_nav::config::Config;

/// Luminance well below the default threshold (reads as free)
pub const DARK: Rgb<u8> = Rgb([10, 10, 10]);
/// Luminance above the default threshold (reads as obstacle)
pub const BRIGHT: Rgb<u8> = Rgb([250, 250, 250]);

/// Bright frame with a dark (free) band covering columns `[x0, x1)`.
pub fn corridor_frame(width: u32, height: u32, x0: u32, x1: u32) -> Frame {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x >= x0 && x < x1 { DARK } else { BRIGHT }
    });
    Frame::new(img).unwrap()
}

/// Frame whose slice `i` has `free[i]` dark columns at its left edge.
///
/// With smoothing disabled and `height == 1` the free-space vector equals
/// `free` exactly.
pub fn slice_profile_frame(slice_width: u32, height: u32, free: &[u32]) -> Frame {
    let width = slice_width * free.len() as u32;
    let img = RgbImage::from_fn(width, height, |x, _| {
        let slice = (x / slice_width) as usize;
        if x % slice_width < free[slice] { DARK } else { BRIGHT }
    });
    Frame::new(img).unwrap()
}

/// Defaults with smoothing off and no waiting between frames.
pub fn exact_config() -> Config {
    let mut config = Config::default();
    config.scanner.blur_kernel = 1;
    config.control.poll_interval_ms = 0;
    config.control.keyboard = false;
    config
}
