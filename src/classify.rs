//! Per-pixel background classification.
//!
//! Every pixel is tested against the active [`Method`] and, when it matches, its
//! alpha is set to 0. Pixels that match nothing are kept: the classifier favors
//! retaining foreground over removing it.

use std::fmt;
use std::str::FromStr;

use image::{Rgb, RgbaImage};

use crate::error::Error;
use crate::sampler;

/// Minimum accepted tolerance for [`Method::AutoSample`].
pub const MIN_TOLERANCE: u8 = 10;

/// Maximum accepted tolerance for [`Method::AutoSample`].
pub const MAX_TOLERANCE: u8 = 80;

/// Default tolerance.
pub const DEFAULT_TOLERANCE: u8 = 30;

/// Channel dominance margin for the green/blue screen presets.
const DOMINANCE_MARGIN: u16 = 30;

/// Background classification strategy. Exactly one is active per removal run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Euclidean RGB distance against a sampled (or explicitly supplied) reference
    /// color, within a tolerance threshold.
    #[default]
    AutoSample,
    /// Green-screen dominance heuristic.
    Green,
    /// Blue-screen dominance heuristic.
    Blue,
    /// Near-white threshold.
    White,
    /// Near-black threshold.
    Black,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::AutoSample => "auto",
            Method::Green => "green",
            Method::Blue => "blue",
            Method::White => "white",
            Method::Black => "black",
        };
        f.write_str(name)
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" | "auto-sample" => Ok(Method::AutoSample),
            "green" => Ok(Method::Green),
            "blue" => Ok(Method::Blue),
            "white" => Ok(Method::White),
            "black" => Ok(Method::Black),
            other => Err(Error::UnknownMethod(other.to_string())),
        }
    }
}

/// Euclidean distance between two RGB colors.
#[must_use]
pub fn color_distance(a: Rgb<u8>, b: Rgb<u8>) -> f32 {
    let dr = f32::from(a[0]) - f32::from(b[0]);
    let dg = f32::from(a[1]) - f32::from(b[1]);
    let db = f32::from(a[2]) - f32::from(b[2]);
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Reference color used by [`Method::AutoSample`]: the explicit target when given,
/// otherwise the corner-sampled estimate. The fixed presets need no reference and
/// resolve to `None`.
#[must_use]
pub fn resolve_reference(
    image: &RgbaImage,
    method: Method,
    target: Option<Rgb<u8>>,
) -> Option<Rgb<u8>> {
    match method {
        Method::AutoSample => Some(target.unwrap_or_else(|| sampler::estimate_background(image))),
        _ => None,
    }
}

/// Decide whether a single pixel belongs to the background.
///
/// `reference` and `tolerance` are consulted only by [`Method::AutoSample`]; the
/// fixed presets ignore both. An `AutoSample` call with no reference keeps the
/// pixel.
#[must_use]
pub fn is_background(
    pixel: Rgb<u8>,
    method: Method,
    reference: Option<Rgb<u8>>,
    tolerance: u8,
) -> bool {
    let [r, g, b] = pixel.0;
    let (rw, gw, bw) = (u16::from(r), u16::from(g), u16::from(b));
    match method {
        Method::Green => gw > rw + DOMINANCE_MARGIN && gw > bw + DOMINANCE_MARGIN && gw > 100,
        Method::Blue => bw > rw + DOMINANCE_MARGIN && bw > gw + DOMINANCE_MARGIN && bw > 100,
        Method::White => r > 230 && g > 230 && b > 230,
        Method::Black => r < 25 && g < 25 && b < 25,
        Method::AutoSample => {
            reference.is_some_and(|c| color_distance(pixel, c) < f32::from(tolerance))
        }
    }
}

/// Classify every pixel of the image in place.
///
/// Background pixels get alpha 0; kept pixels are untouched in all four channels.
/// The border is not special-cased here (only the smoothing pass excludes it).
pub fn classify_pixels(
    image: &mut RgbaImage,
    method: Method,
    reference: Option<Rgb<u8>>,
    tolerance: u8,
) {
    for px in image.pixels_mut() {
        if is_background(Rgb([px[0], px[1], px[2]]), method, reference, tolerance) {
            px[3] = 0;
        }
    }
}
