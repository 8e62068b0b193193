//! Background color estimation from image corners.
//!
//! When no explicit target color is supplied, the dominant background color is
//! estimated by averaging two small windows at the top corners of the image.
//! Foreground subjects are usually centered, so the top corners are the pixels
//! most likely to show unobstructed background.

use image::{Rgb, RgbaImage};

/// Side length of each corner sampling window, in pixels.
pub const SAMPLE_SIZE: u32 = 10;

/// Estimate the dominant background color of an image.
///
/// Samples a [`SAMPLE_SIZE`]x[`SAMPLE_SIZE`] window from the top-left corner and a
/// mirrored window anchored at the top-right corner, then averages each channel
/// independently with no weighting or outlier rejection. Windows clamp to the image
/// bounds; on images narrower than two windows the overlap region is counted twice.
///
/// A zero-pixel image yields black.
#[must_use]
pub fn estimate_background(image: &RgbaImage) -> Rgb<u8> {
    let width = image.width();
    let height = image.height();

    let mut total = [0u64; 3];
    let mut count = 0u64;

    for y in 0..SAMPLE_SIZE.min(height) {
        for x in 0..SAMPLE_SIZE.min(width) {
            let px = image.get_pixel(x, y);
            total[0] += u64::from(px[0]);
            total[1] += u64::from(px[1]);
            total[2] += u64::from(px[2]);
            count += 1;
        }
        for x in width.saturating_sub(SAMPLE_SIZE)..width {
            let px = image.get_pixel(x, y);
            total[0] += u64::from(px[0]);
            total[1] += u64::from(px[1]);
            total[2] += u64::from(px[2]);
            count += 1;
        }
    }

    if count == 0 {
        return Rgb([0, 0, 0]);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let average = |channel: u64| -> u8 { (channel as f64 / count as f64).round() as u8 };

    Rgb([average(total[0]), average(total[1]), average(total[2])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn uniform_image_returns_exact_color() {
        for (w, h) in [(10, 10), (20, 20), (50, 30), (640, 480)] {
            let img = RgbaImage::from_pixel(w, h, Rgba([12, 200, 99, 255]));
            assert_eq!(estimate_background(&img), Rgb([12, 200, 99]));
        }
    }

    #[test]
    fn image_smaller_than_window_is_clamped() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([7, 7, 7, 255]));
        assert_eq!(estimate_background(&img), Rgb([7, 7, 7]));
    }

    #[test]
    fn corners_of_different_colors_average() {
        // Left half pure red, right half pure blue: both windows contribute
        // 100 pixels each, so the mean of each mixed channel is 127.5 -> 128.
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 255, 255]));
        for y in 0..20 {
            for x in 0..10 {
                img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        assert_eq!(estimate_background(&img), Rgb([128, 0, 128]));
    }

    #[test]
    fn only_top_rows_are_sampled() {
        // Bottom half is green but must not influence the estimate.
        let mut img = RgbaImage::from_pixel(30, 30, Rgba([255, 255, 255, 255]));
        for y in 15..30 {
            for x in 0..30 {
                img.put_pixel(x, y, Rgba([0, 255, 0, 255]));
            }
        }
        assert_eq!(estimate_background(&img), Rgb([255, 255, 255]));
    }

    #[test]
    fn empty_image_returns_black() {
        let img = RgbaImage::new(0, 0);
        assert_eq!(estimate_background(&img), Rgb([0, 0, 0]));
    }
}
