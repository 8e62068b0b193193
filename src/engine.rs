//! Background removal pipeline and per-image session state.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, Rgb, RgbaImage};
use tracing::{debug, info};

use crate::classify::{self, Method, DEFAULT_TOLERANCE};
use crate::composite;
use crate::error::{Error, Result};
use crate::smoothing::{self, DEFAULT_SMOOTHING};

/// Default JPEG quality for [`save_image`] and [`encode_image`].
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Options controlling a background removal run.
///
/// The pipeline assumes pre-validated ranges: clamp `tolerance` to
/// [`classify::MIN_TOLERANCE`]..=[`classify::MAX_TOLERANCE`] and `smoothing` to
/// 0..=[`crate::smoothing::MAX_SMOOTHING`] before invoking (the CLI does).
#[derive(Debug, Clone)]
pub struct RemovalOptions {
    /// Classification strategy.
    pub method: Method,
    /// Color-distance tolerance, consulted only by [`Method::AutoSample`].
    pub tolerance: u8,
    /// Edge smoothing strength; 0 disables the smoothing pass.
    pub smoothing: u8,
    /// Explicit reference color overriding corner sampling for
    /// [`Method::AutoSample`].
    pub target: Option<Rgb<u8>>,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            method: Method::AutoSample,
            tolerance: DEFAULT_TOLERANCE,
            smoothing: DEFAULT_SMOOTHING,
            target: None,
        }
    }
}

/// Background applied when flattening batch output.
#[derive(Debug, Clone)]
pub enum Background {
    /// Solid color fill.
    Color(Rgb<u8>),
    /// Image loaded from disk and stretched to each foreground's dimensions.
    ImagePath(PathBuf),
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

/// Per-image removal session.
///
/// After [`remove`](Self::remove) runs, the engine holds the retained original:
/// the buffer snapshot taken right after classification and smoothing, before any
/// background is applied. Every compositing call re-reads that snapshot, so
/// changing the background repeatedly never accumulates loss. The snapshot is
/// replaced only by the next removal run, never by compositing.
#[derive(Debug, Default)]
pub struct RemovalEngine {
    retained: Option<RgbaImage>,
}

impl RemovalEngine {
    /// Engine with no image processed yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the background in place and snapshot the result as the retained
    /// original.
    ///
    /// Runs the sampler (for [`Method::AutoSample`] without an explicit target),
    /// the per-pixel classifier, and one smoothing pass, sequentially on the
    /// calling thread.
    pub fn remove(&mut self, image: &mut RgbaImage, opts: &RemovalOptions) {
        self.remove_with_progress(image, opts, &mut |_| {});
    }

    /// [`remove`](Self::remove) with coarse progress checkpoints.
    ///
    /// `progress` is called with 30 (buffer staged), 50 (analysis started),
    /// 70 (reference color resolved), 90 (classification done) and 100
    /// (smoothing done). Checkpoints exist for user feedback only; the pipeline
    /// is not resumable between them.
    pub fn remove_with_progress(
        &mut self,
        image: &mut RgbaImage,
        opts: &RemovalOptions,
        progress: &mut dyn FnMut(u8),
    ) {
        progress(30);
        let (width, height) = image.dimensions();
        debug!(
            method = %opts.method,
            tolerance = opts.tolerance,
            smoothing = opts.smoothing,
            width,
            height,
            "removing background"
        );

        progress(50);
        let reference = classify::resolve_reference(image, opts.method, opts.target);
        if let Some(color) = reference {
            debug!(r = color[0], g = color[1], b = color[2], "reference color resolved");
        }
        progress(70);

        classify::classify_pixels(image, opts.method, reference, opts.tolerance);
        progress(90);

        smoothing::smooth_alpha(image, opts.smoothing);
        self.retained = Some(image.clone());
        progress(100);
    }

    /// The retained original snapshot, if a removal has run.
    #[must_use]
    pub fn retained(&self) -> Option<&RgbaImage> {
        self.retained.as_ref()
    }

    /// Drop the retained original, returning to the unprocessed state.
    pub fn reset(&mut self) {
        self.retained = None;
    }

    /// Flatten the retained original over a solid background color.
    ///
    /// Always derives from the retained original, never from a previous
    /// composite, so any sequence of background choices is order-independent.
    /// Returns `None` when removal has not run yet (a defined no-op, not an
    /// error).
    #[must_use]
    pub fn composite_color(&self, color: Rgb<u8>) -> Option<RgbaImage> {
        self.retained
            .as_ref()
            .map(|foreground| composite::over_color(foreground, color))
    }

    /// Flatten the retained original over a background image, stretched to the
    /// retained original's dimensions.
    ///
    /// Same derivation guarantee and no-op behavior as
    /// [`composite_color`](Self::composite_color).
    #[must_use]
    pub fn composite_image(&self, background: &RgbaImage) -> Option<RgbaImage> {
        self.retained
            .as_ref()
            .map(|foreground| composite::over_image(foreground, background))
    }

    /// The retained original with its transparent background, as a fresh copy.
    #[must_use]
    pub fn composite_none(&self) -> Option<RgbaImage> {
        self.retained.clone()
    }
}

/// Process one image file: decode, remove the background, optionally flatten,
/// save.
///
/// Errors are captured in the returned [`ProcessResult`] instead of propagated,
/// so batch runs continue past bad files. Removal output keeps its alpha channel;
/// [`default_output_path`] always picks PNG for that reason.
#[must_use]
pub fn process_file(
    input: &Path,
    output: &Path,
    opts: &RemovalOptions,
    background: Option<&Background>,
) -> ProcessResult {
    process_file_with_progress(input, output, opts, background, &mut |_| {})
}

/// [`process_file`] with coarse progress checkpoints.
///
/// Emits 10 once the input is decoded, then the removal checkpoints 30 through
/// 100.
#[must_use]
pub fn process_file_with_progress(
    input: &Path,
    output: &Path,
    opts: &RemovalOptions,
    background: Option<&Background>,
    progress: &mut dyn FnMut(u8),
) -> ProcessResult {
    let mut result = ProcessResult {
        path: input.to_path_buf(),
        success: false,
        message: String::new(),
    };

    // Decoding is the only suspension point; everything after runs to completion.
    let decoded = match image::open(input) {
        Ok(img) => img,
        Err(e) => {
            result.message = format!("Failed to decode: {e}");
            return result;
        }
    };
    progress(10);
    let mut rgba = decoded.to_rgba8();

    let mut engine = RemovalEngine::new();
    engine.remove_with_progress(&mut rgba, opts, progress);

    let output_image = match background {
        None => rgba,
        Some(Background::Color(color)) => engine.composite_color(*color).unwrap_or(rgba),
        Some(Background::ImagePath(path)) => match image::open(path) {
            Ok(bg) => engine.composite_image(&bg.to_rgba8()).unwrap_or(rgba),
            Err(e) => {
                result.message = format!("Failed to load background image: {e}");
                return result;
            }
        },
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.message = format!("Failed to create output directory: {e}");
                return result;
            }
        }
    }

    match save_image(&output_image, output, DEFAULT_JPEG_QUALITY) {
        Ok(()) => {
            info!(output = %output.display(), "background removed");
            result.success = true;
            result.message = "Background removed".to_string();
        }
        Err(e) => {
            result.message = format!("Failed to save: {e}");
        }
    }

    result
}

/// Process all supported images in a directory.
///
/// Output files are named `{stem}.png`. Uses parallel iteration across files when
/// the `cli` feature is enabled (via rayon); each file still runs the sequential
/// per-image pipeline on its own buffer.
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &RemovalOptions,
    background: Option<&Background>,
) -> Vec<ProcessResult> {
    let entries: Vec<_> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|e| is_supported_image(e.path().as_path()))
            .collect(),
        Err(e) => {
            return vec![ProcessResult {
                path: input_dir.to_path_buf(),
                success: false,
                message: format!("Failed to read directory: {e}"),
            }];
        }
    };

    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![ProcessResult {
                path: output_dir.to_path_buf(),
                success: false,
                message: format!("Failed to create output directory: {e}"),
            }];
        }
    }

    let output_for = |input_path: &Path| {
        let stem = input_path.file_stem().unwrap_or_default().to_string_lossy();
        output_dir.join(format!("{stem}.png"))
    };

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        entries
            .par_iter()
            .map(|entry| {
                let input_path = entry.path();
                process_file(&input_path, &output_for(&input_path), opts, background)
            })
            .collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        entries
            .iter()
            .map(|entry| {
                let input_path = entry.path();
                process_file(&input_path, &output_for(&input_path), opts, background)
            })
            .collect()
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}

/// Save an RGBA image, inferring the format from the output extension.
///
/// `quality` applies to JPEG only (1-100); PNG and BMP are lossless and WebP is
/// encoded lossless by the underlying codec. JPEG cannot carry alpha, so the
/// image is flattened onto white first.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    let bytes = encode_image(img, format, quality)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Encode an RGBA image to in-memory bytes in the given format.
///
/// Same format and quality semantics as [`save_image`].
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for formats outside
/// PNG/JPEG/WebP/BMP, or an encoding error from the codec.
pub fn encode_image(img: &RgbaImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let flattened = composite::over_color(img, Rgb([255, 255, 255]));
            let rgb = DynamicImage::ImageRgba8(flattened).to_rgb8();
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                std::io::Cursor::new(&mut buffer),
                quality,
            );
            encoder.encode_image(&rgb)?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            DynamicImage::ImageRgba8(img.clone())
                .write_to(&mut std::io::Cursor::new(&mut buffer), format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }
    Ok(buffer)
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_nobg.png"`. The extension is always
/// PNG so the removed background survives encoding.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_nobg.png"))
}
