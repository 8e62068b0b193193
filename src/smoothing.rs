//! Edge smoothing for the post-classification alpha mask.
//!
//! Classification leaves hard alpha edges. This pass softens partially
//! transparent edge pixels by pulling their alpha toward the average of their
//! four axis neighbors. It runs once per removal, never iteratively.

use image::RgbaImage;

/// Maximum smoothing strength.
pub const MAX_SMOOTHING: u8 = 5;

/// Default smoothing strength.
pub const DEFAULT_SMOOTHING: u8 = 3;

/// Soften partially transparent edges of the alpha mask in place.
///
/// For every interior pixel (the 1-pixel border is never modified) whose alpha is
/// strictly between 0 and 255, the alpha is blended with the unweighted average of
/// the four axis-adjacent alphas using factor `strength / 10`, rounded to the
/// nearest integer. Fully transparent and fully opaque pixels are left alone, so
/// a freshly classified binary mask passes through unchanged.
///
/// The pass runs in raster order over the live buffer: up/left neighbors
/// contribute their already-smoothed values.
///
/// `strength` 0 skips the pass entirely.
pub fn smooth_alpha(image: &mut RgbaImage, strength: u8) {
    if strength == 0 {
        return;
    }
    let width = image.width();
    let height = image.height();
    if width < 3 || height < 3 {
        return;
    }
    let factor = f32::from(strength) / 10.0;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let alpha = image.get_pixel(x, y)[3];
            if alpha == 0 || alpha == 255 {
                continue;
            }

            let neighbor_sum = f32::from(image.get_pixel(x, y - 1)[3])
                + f32::from(image.get_pixel(x, y + 1)[3])
                + f32::from(image.get_pixel(x - 1, y)[3])
                + f32::from(image.get_pixel(x + 1, y)[3]);
            let average = neighbor_sum / 4.0;

            let blended = f32::from(alpha) * (1.0 - factor) + average * factor;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                image.get_pixel_mut(x, y)[3] = blended.round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn alpha_grid(image: &RgbaImage) -> Vec<u8> {
        image.pixels().map(|px| px[3]).collect()
    }

    #[test]
    fn strength_zero_is_a_byte_identical_noop() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([50, 60, 70, 255]));
        img.put_pixel(3, 3, Rgba([50, 60, 70, 120]));
        img.put_pixel(4, 4, Rgba([50, 60, 70, 77]));
        let before = img.clone();

        smooth_alpha(&mut img, 0);
        assert_eq!(img.as_raw(), before.as_raw());
    }

    #[test]
    fn binary_mask_is_untouched() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        for x in 0..10 {
            img.put_pixel(x, 4, Rgba([0, 0, 0, 0]));
        }
        let before = alpha_grid(&img);

        smooth_alpha(&mut img, MAX_SMOOTHING);
        assert_eq!(alpha_grid(&img), before);
    }

    #[test]
    fn border_pixels_are_never_modified() {
        let mut img = RgbaImage::from_pixel(6, 6, Rgba([0, 0, 0, 100]));
        smooth_alpha(&mut img, MAX_SMOOTHING);

        for (x, y, px) in img.enumerate_pixels() {
            if x == 0 || y == 0 || x == 5 || y == 5 {
                assert_eq!(px[3], 100, "border pixel ({x},{y}) was modified");
            }
        }
    }

    #[test]
    fn center_pixel_blends_toward_neighbor_average() {
        // Center alpha 100, four opaque neighbors, strength 5 -> 50% blend:
        // round(100 * 0.5 + 255 * 0.5) = round(177.5) = 178.
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 100]));

        smooth_alpha(&mut img, MAX_SMOOTHING);
        assert_eq!(img.get_pixel(1, 1)[3], 178);
    }

    #[test]
    fn pass_runs_in_raster_order_over_the_live_buffer() {
        // Two adjacent interior pixels at default strength (factor 0.3).
        // (1,1): neighbors 255+255+255+200 -> avg 241.25,
        //        blended = 100*0.7 + 241.25*0.3 = 142.375 -> 142.
        // (2,1): sees the updated (1,1)=142: 255+255+142+255 -> avg 226.75,
        //        blended = 200*0.7 + 226.75*0.3 = 208.025 -> 208.
        let mut img = RgbaImage::from_pixel(4, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 100]));
        img.put_pixel(2, 1, Rgba([0, 0, 0, 200]));

        smooth_alpha(&mut img, DEFAULT_SMOOTHING);
        assert_eq!(img.get_pixel(1, 1)[3], 142);
        assert_eq!(img.get_pixel(2, 1)[3], 208);
    }

    #[test]
    fn tiny_images_are_skipped() {
        let mut img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 100]));
        let before = alpha_grid(&img);
        smooth_alpha(&mut img, MAX_SMOOTHING);
        assert_eq!(alpha_grid(&img), before);
    }
}
