//! Raster resizing, fitting, and cropping.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Resampling quality for resize operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeQuality {
    /// Nearest-neighbor. Fastest, hard edges; suits pixel art.
    Fast,
    /// Bilinear.
    Balanced,
    /// Lanczos3. Slowest, best for photographic content.
    #[default]
    High,
}

impl ResizeQuality {
    fn filter(self) -> FilterType {
        match self {
            ResizeQuality::Fast => FilterType::Nearest,
            ResizeQuality::Balanced => FilterType::Triangle,
            ResizeQuality::High => FilterType::Lanczos3,
        }
    }
}

/// Resize to exactly `width` x `height`, ignoring the aspect ratio.
#[must_use]
pub fn resize(image: &RgbaImage, width: u32, height: u32, quality: ResizeQuality) -> RgbaImage {
    imageops::resize(image, width, height, quality.filter())
}

/// Resize to fit within a bounding box, preserving the aspect ratio.
#[must_use]
pub fn resize_to_fit(
    image: &RgbaImage,
    max_width: u32,
    max_height: u32,
    quality: ResizeQuality,
) -> RgbaImage {
    let (width, height) = fit_dimensions(image.width(), image.height(), max_width, max_height);
    imageops::resize(image, width, height, quality.filter())
}

/// Largest dimensions that fit inside `max_width` x `max_height` while preserving
/// the `width`:`height` aspect ratio. Degenerate inputs collapse to 1x1.
#[must_use]
pub fn fit_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return (1, 1);
    }
    let scale = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Crop a rectangle out of the image, clamped to the image bounds.
#[must_use]
pub fn crop(image: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
    let x = x.min(image.width());
    let y = y.min(image.height());
    let width = width.min(image.width() - x);
    let height = height.min(image.height() - y);
    imageops::crop_imm(image, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn resize_stretches_to_exact_dimensions() {
        let img = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let out = resize(&img, 25, 5, ResizeQuality::Fast);
        assert_eq!(out.dimensions(), (25, 5));
    }

    #[test]
    fn fit_dimensions_preserves_aspect_ratio() {
        assert_eq!(fit_dimensions(400, 200, 100, 100), (100, 50));
        assert_eq!(fit_dimensions(200, 400, 100, 100), (50, 100));
        assert_eq!(fit_dimensions(100, 100, 300, 200), (200, 200));
        // Already fitting input scales up to the box edge, like the reference tool.
        assert_eq!(fit_dimensions(50, 50, 100, 200), (100, 100));
    }

    #[test]
    fn fit_dimensions_never_returns_zero() {
        assert_eq!(fit_dimensions(10_000, 10, 5, 5), (5, 1));
        assert_eq!(fit_dimensions(0, 10, 5, 5), (1, 1));
    }

    #[test]
    fn crop_is_clamped_to_bounds() {
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));
        img.put_pixel(8, 8, Rgba([9, 9, 9, 255]));

        let out = crop(&img, 8, 8, 50, 50);
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(*out.get_pixel(0, 0), Rgba([9, 9, 9, 255]));

        let empty = crop(&img, 20, 20, 5, 5);
        assert_eq!(empty.dimensions(), (0, 0));
    }
}
