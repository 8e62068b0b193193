//! Chroma-key background removal with edge smoothing and background compositing.
//!
//! Backgrounds are classified per pixel, either against a fixed preset
//! (green/blue screen, near-white, near-black) or by Euclidean color distance
//! from a reference sampled at the image's top corners. Matched pixels become
//! fully transparent, a single smoothing pass softens the cut edges, and the
//! result is snapshotted as the *retained original*: every later background
//! change recomposites from that snapshot, so switching backgrounds never
//! degrades the cutout.
//!
//! # Quick Start
//!
//! ```
//! use chroma_key_removal::{Method, RemovalEngine, RemovalOptions};
//! use image::{Rgb, Rgba, RgbaImage};
//!
//! let mut image = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
//! let opts = RemovalOptions {
//!     method: Method::White,
//!     ..RemovalOptions::default()
//! };
//!
//! let mut engine = RemovalEngine::new();
//! engine.remove(&mut image, &opts);
//! assert!(image.pixels().all(|px| px[3] == 0));
//!
//! // Recomposite onto solid backgrounds, always from the retained original.
//! let on_red = engine.composite_color(Rgb([255, 71, 87])).unwrap();
//! let on_blue = engine.composite_color(Rgb([55, 66, 250])).unwrap();
//! assert_eq!(on_red.dimensions(), on_blue.dimensions());
//! ```
//!
//! # Image library
//!
//! Tools share inputs and results through an explicit [`ImageLibrary`]
//! collaborator instead of ambient state:
//!
//! ```
//! use chroma_key_removal::{ImageLibrary, ImageMetadata, InMemoryLibrary};
//! use image::RgbaImage;
//!
//! let mut library = InMemoryLibrary::new();
//! let id = library.add_image(
//!     RgbaImage::new(8, 8),
//!     ImageMetadata::new("cutout.png", "background-removal"),
//! );
//! assert_eq!(library.list().len(), 1);
//! library.remove_image(id);
//! ```

#![deny(missing_docs)]

pub mod classify;
pub mod composite;
mod engine;
pub mod error;
pub mod library;
pub mod resize;
pub mod sampler;
pub mod smoothing;
pub mod watermark;

pub use classify::Method;
pub use engine::{
    default_output_path, encode_image, is_supported_image, process_directory, process_file,
    process_file_with_progress, save_image, Background, ProcessResult, RemovalEngine,
    RemovalOptions, DEFAULT_JPEG_QUALITY,
};
pub use error::{Error, Result};
pub use library::{ImageId, ImageLibrary, ImageMetadata, InMemoryLibrary, LibraryEntry};
