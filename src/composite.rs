//! Background compositing behind a transparent foreground.
//!
//! Both entry points take the foreground by shared reference and return a new
//! buffer. Callers hold on to the retained original from the removal run and pass
//! it here for every recomposite; there is no way to composite on top of a
//! previous composite through this API.

use image::imageops::{self, FilterType};
use image::{Rgb, Rgba, RgbaImage};

use crate::error::{Error, Result};

/// Flatten the foreground over a solid background color.
///
/// Allocates a canvas of identical dimensions filled with the opaque color, then
/// alpha-composites the foreground on top (standard over-operator).
#[must_use]
pub fn over_color(foreground: &RgbaImage, color: Rgb<u8>) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(
        foreground.width(),
        foreground.height(),
        Rgba([color[0], color[1], color[2], 255]),
    );
    imageops::overlay(&mut canvas, foreground, 0, 0);
    canvas
}

/// Flatten the foreground over a background image.
///
/// The background is stretched to the foreground's dimensions (no aspect-ratio
/// preservation) before the foreground is composited on top.
#[must_use]
pub fn over_image(foreground: &RgbaImage, background: &RgbaImage) -> RgbaImage {
    let mut canvas = imageops::resize(
        background,
        foreground.width(),
        foreground.height(),
        FilterType::Triangle,
    );
    imageops::overlay(&mut canvas, foreground, 0, 0);
    canvas
}

/// Parse a `#rrggbb` hex color. The leading `#` is optional.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] for anything that is not six hex digits.
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor(s.to_string()));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidColor(s.to_string()))
    };
    Ok(Rgb([channel(0..2)?, channel(2..4)?, channel(4..6)?]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_foreground_hides_the_background_color() {
        let fg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let out = over_color(&fg, Rgb([255, 0, 0]));
        for px in out.pixels() {
            assert_eq!(*px, Rgba([10, 20, 30, 255]));
        }
    }

    #[test]
    fn transparent_pixels_show_the_background_color() {
        let mut fg = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        fg.put_pixel(2, 2, Rgba([10, 20, 30, 0]));
        let out = over_color(&fg, Rgb([0, 255, 0]));

        assert_eq!(*out.get_pixel(2, 2), Rgba([0, 255, 0, 255]));
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn half_transparent_pixels_blend() {
        let fg = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 128]));
        let out = over_color(&fg, Rgb([255, 255, 255]));
        let px = out.get_pixel(0, 0);

        // Red stays saturated, green/blue land near the 50% mix.
        assert_eq!(px[0], 255);
        assert!((125..=130).contains(&px[1]), "green channel was {}", px[1]);
        assert!((125..=130).contains(&px[2]), "blue channel was {}", px[2]);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn background_image_is_stretched_to_foreground_dimensions() {
        let mut fg = RgbaImage::from_pixel(8, 6, Rgba([0, 0, 0, 255]));
        for px in fg.pixels_mut() {
            px[3] = 0;
        }
        let bg = RgbaImage::from_pixel(2, 2, Rgba([40, 50, 60, 255]));
        let out = over_image(&fg, &bg);

        assert_eq!(out.dimensions(), (8, 6));
        for px in out.pixels() {
            assert_eq!(*px, Rgba([40, 50, 60, 255]));
        }
    }

    #[test]
    fn parse_hex_color_accepts_common_forms() {
        assert_eq!(parse_hex_color("#ff8800").unwrap(), Rgb([255, 136, 0]));
        assert_eq!(parse_hex_color("ff8800").unwrap(), Rgb([255, 136, 0]));
        assert_eq!(parse_hex_color("  #2ED573  ").unwrap(), Rgb([46, 213, 115]));
    }

    #[test]
    fn parse_hex_color_rejects_malformed_input() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
        assert!(parse_hex_color("#ff88001").is_err());
        assert!(parse_hex_color("").is_err());
    }
}
