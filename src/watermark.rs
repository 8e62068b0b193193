//! Logo watermark overlay.
//!
//! Stamps a logo image onto a photo: the logo is scaled to fit a square box,
//! faded to the requested opacity, and alpha-composited at an anchored corner or
//! the center.

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::resize::fit_dimensions;

/// Placement anchor for the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    #[default]
    BottomRight,
    /// Image center.
    Center,
}

/// Options controlling watermark placement and blending.
#[derive(Debug, Clone)]
pub struct WatermarkOptions {
    /// Placement anchor.
    pub anchor: Anchor,
    /// Watermark opacity in `[0.0, 1.0]`; values outside are clamped.
    pub opacity: f32,
    /// Side of the square box the logo is scaled to fit, in pixels.
    pub size: u32,
    /// Inset from the anchored edges, in pixels.
    pub margin: u32,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            anchor: Anchor::BottomRight,
            opacity: 0.8,
            size: 100,
            margin: 20,
        }
    }
}

/// Stamp a logo onto the image in place.
///
/// The logo keeps its aspect ratio inside the `size` box, its alpha channel is
/// multiplied by `opacity`, and the result is alpha-composited at the anchored
/// position. A logo box larger than the image is clipped by the compositing step.
pub fn apply_logo(image: &mut RgbaImage, logo: &RgbaImage, opts: &WatermarkOptions) {
    if logo.width() == 0 || logo.height() == 0 || opts.size == 0 {
        return;
    }

    let (logo_w, logo_h) = fit_dimensions(logo.width(), logo.height(), opts.size, opts.size);
    let mut scaled = imageops::resize(logo, logo_w, logo_h, FilterType::Triangle);

    let opacity = opts.opacity.clamp(0.0, 1.0);
    if opacity < 1.0 {
        for px in scaled.pixels_mut() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            {
                px[3] = (f32::from(px[3]) * opacity).round() as u8;
            }
        }
    }

    let (x, y) = anchor_position(
        image.width(),
        image.height(),
        logo_w,
        logo_h,
        opts.anchor,
        opts.margin,
    );
    imageops::overlay(image, &scaled, i64::from(x), i64::from(y));
}

/// Top-left corner for a `logo_w` x `logo_h` stamp, inset by `margin` from the
/// anchored edges. Saturates at the image origin when the stamp does not fit.
#[must_use]
pub fn anchor_position(
    image_w: u32,
    image_h: u32,
    logo_w: u32,
    logo_h: u32,
    anchor: Anchor,
    margin: u32,
) -> (u32, u32) {
    let right = image_w.saturating_sub(logo_w + margin);
    let bottom = image_h.saturating_sub(logo_h + margin);
    match anchor {
        Anchor::TopLeft => (margin, margin),
        Anchor::TopRight => (right, margin),
        Anchor::BottomLeft => (margin, bottom),
        Anchor::BottomRight => (right, bottom),
        Anchor::Center => (
            image_w.saturating_sub(logo_w) / 2,
            image_h.saturating_sub(logo_h) / 2,
        ),
    }
}
