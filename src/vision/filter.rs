//! Sample-grid primitives: grayscale reduction, inverted threshold, smoothing.
//!
//! All operations work on `image` buffers so any backend that can hand over
//! an `RgbImage` plugs straight in.

use image::{GrayImage, Luma, RgbImage};

/// Mask value for free space
pub const FREE: u8 = 255;
/// Mask value for obstacles
pub const OBSTACLE: u8 = 0;

// BT.601 luma weights in Q14 fixed point (0.299, 0.587, 0.114)
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Reduce an RGB image to single-channel BT.601 luminance.
pub fn grayscale(image: &RgbImage) -> GrayImage {
    let mut gray = GrayImage::new(image.width(), image.height());
    for (dst, src) in gray.pixels_mut().zip(image.pixels()) {
        let [r, g, b] = src.0;
        let y = (r as u32 * LUMA_R + g as u32 * LUMA_G + b as u32 * LUMA_B
            + (1 << (LUMA_SHIFT - 1)))
            >> LUMA_SHIFT;
        *dst = Luma([y.min(255) as u8]);
    }
    gray
}

/// Inverted binary threshold in place: `<= cutoff` becomes FREE, `> cutoff` OBSTACLE.
pub fn threshold_inverted(image: &mut GrayImage, cutoff: u8) {
    for pixel in image.pixels_mut() {
        pixel.0[0] = if pixel.0[0] <= cutoff { FREE } else { OBSTACLE };
    }
}

/// Integer binomial kernel for the given odd size, or `None` if unsupported.
///
/// These are the fixed Gaussian kernels used when the spread is derived from
/// the kernel size.
pub fn binomial_kernel(size: usize) -> Option<&'static [u32]> {
    match size {
        1 => Some(&[1]),
        3 => Some(&[1, 2, 1]),
        5 => Some(&[1, 4, 6, 4, 1]),
        7 => Some(&[2, 7, 14, 18, 14, 7, 2]),
        _ => None,
    }
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`dcb|abcd|cba`).
#[inline]
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    while i < 0 || i > last {
        if i < 0 {
            i = -i;
        }
        if i > last {
            i = 2 * last - i;
        }
    }
    i as usize
}

/// Separable Gaussian smoothing with a fixed binomial kernel.
///
/// Returns the input unchanged for kernel sizes without a table entry
/// (callers validate the size up front).
pub fn gaussian_blur(image: &GrayImage, kernel_size: usize) -> GrayImage {
    let kernel = match binomial_kernel(kernel_size) {
        Some(k) if k.len() > 1 => k,
        _ => return image.clone(),
    };

    let width = image.width() as usize;
    let height = image.height() as usize;
    let radius = (kernel.len() / 2) as isize;
    let norm: u32 = kernel.iter().sum();
    let scale = norm * norm;

    let src = image.as_raw();

    // Horizontal pass
    let mut horizontal = vec![0u32; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, width);
                acc += weight * row[sx] as u32;
            }
            horizontal[y * width + x] = acc;
        }
    }

    // Vertical pass with rounding
    let mut out = GrayImage::new(image.width(), image.height());
    let dst: &mut [u8] = &mut out;
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u32;
            for (k, &weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, height);
                acc += weight * horizontal[sy * width + x];
            }
            dst[y * width + x] = ((acc + scale / 2) / scale).min(255) as u8;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_grayscale_weights() {
        let mut img = RgbImage::new(4, 1);
        img.put_pixel(0, 0, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 0, Rgb([0, 255, 0]));
        img.put_pixel(3, 0, Rgb([0, 0, 255]));

        let gray = grayscale(&img);
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 76);
        assert_eq!(gray.get_pixel(2, 0).0[0], 150);
        assert_eq!(gray.get_pixel(3, 0).0[0], 29);
    }

    #[test]
    fn test_threshold_is_inclusive_and_inverted() {
        let mut img = GrayImage::from_raw(4, 1, vec![0, 200, 201, 255]).unwrap();
        threshold_inverted(&mut img, 200);
        assert_eq!(img.as_raw(), &vec![FREE, FREE, OBSTACLE, OBSTACLE]);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
        assert_eq!(reflect_101(-2, 2), 0);
        assert_eq!(reflect_101(4, 1), 0);
    }

    #[test]
    fn test_blur_preserves_uniform_images() {
        for value in [0u8, 255] {
            let img = GrayImage::from_pixel(9, 6, Luma([value]));
            let blurred = gaussian_blur(&img, 5);
            assert!(blurred.pixels().all(|p| p.0[0] == value));
        }
    }

    #[test]
    fn test_blur_softens_isolated_pixel() {
        let mut img = GrayImage::new(9, 9);
        img.put_pixel(4, 4, Luma([255]));

        let blurred = gaussian_blur(&img, 5);
        // Center weight 6*6/256 of 255
        assert_eq!(blurred.get_pixel(4, 4).0[0], 36);
        // Outermost ring still touched, nothing beyond it
        assert!(blurred.get_pixel(2, 4).0[0] > 0);
        assert_eq!(blurred.get_pixel(1, 4).0[0], 0);
        assert!(blurred.pixels().all(|p| p.0[0] < FREE));
    }

    #[test]
    fn test_blur_kernel_one_is_identity() {
        let img = GrayImage::from_raw(3, 1, vec![0, 255, 0]).unwrap();
        assert_eq!(gaussian_blur(&img, 1).as_raw(), img.as_raw());
    }

    #[test]
    fn test_binomial_kernel_sizes() {
        assert!(binomial_kernel(5).is_some());
        assert!(binomial_kernel(4).is_none());
        assert_eq!(binomial_kernel(7).unwrap().iter().sum::<u32>(), 64);
    }
}
