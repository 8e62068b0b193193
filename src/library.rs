//! In-session image library collaborator.
//!
//! Tools share their inputs and results through an explicit [`ImageLibrary`]
//! handed to them by the hosting application, instead of reaching for ambient
//! shared state. The default [`InMemoryLibrary`] keeps everything in memory for
//! the lifetime of the session.

use chrono::{DateTime, Utc};
use image::RgbaImage;

/// Identifier assigned to a stored library entry.
pub type ImageId = u64;

/// Descriptive metadata attached to a stored image.
#[derive(Debug, Clone)]
pub struct ImageMetadata {
    /// Display name, usually derived from the original file name.
    pub name: String,
    /// Tool that produced the image (e.g. `"background-removal"`).
    pub source: String,
    /// Creation timestamp.
    pub created: DateTime<Utc>,
}

impl ImageMetadata {
    /// Metadata stamped with the current time.
    #[must_use]
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            created: Utc::now(),
        }
    }
}

/// A stored image plus its metadata.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    /// Identifier assigned at insertion.
    pub id: ImageId,
    /// The stored pixel buffer.
    pub image: RgbaImage,
    /// Attached metadata.
    pub metadata: ImageMetadata,
}

/// Shared image collection injected into tools that produce or consume images.
pub trait ImageLibrary {
    /// Store an image, returning its assigned id.
    fn add_image(&mut self, image: RgbaImage, metadata: ImageMetadata) -> ImageId;

    /// Remove an image by id. Returns `false` when the id is unknown.
    fn remove_image(&mut self, id: ImageId) -> bool;

    /// All stored entries, in insertion order.
    fn list(&self) -> &[LibraryEntry];
}

/// Default [`ImageLibrary`] backed by a `Vec`, with monotonically increasing ids.
#[derive(Debug, Default)]
pub struct InMemoryLibrary {
    next_id: ImageId,
    entries: Vec<LibraryEntry>,
}

impl InMemoryLibrary {
    /// An empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a single entry by id.
    #[must_use]
    pub fn get(&self, id: ImageId) -> Option<&LibraryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Remove every entry. Assigned ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the library holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ImageLibrary for InMemoryLibrary {
    fn add_image(&mut self, image: RgbaImage, metadata: ImageMetadata) -> ImageId {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(LibraryEntry {
            id,
            image,
            metadata,
        });
        id
    }

    fn remove_image(&mut self, id: ImageId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    fn list(&self) -> &[LibraryEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> (RgbaImage, ImageMetadata) {
        (RgbaImage::new(2, 2), ImageMetadata::new(name, "test"))
    }

    #[test]
    fn add_assigns_distinct_increasing_ids() {
        let mut library = InMemoryLibrary::new();
        let (img_a, meta_a) = sample("a");
        let (img_b, meta_b) = sample("b");

        let id_a = library.add_image(img_a, meta_a);
        let id_b = library.add_image(img_b, meta_b);

        assert!(id_b > id_a);
        assert_eq!(library.len(), 2);
        let names: Vec<_> = library.list().iter().map(|e| e.metadata.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn remove_image_reports_whether_the_id_existed() {
        let mut library = InMemoryLibrary::new();
        let (img, meta) = sample("a");
        let id = library.add_image(img, meta);

        assert!(library.remove_image(id));
        assert!(!library.remove_image(id));
        assert!(library.is_empty());
    }

    #[test]
    fn get_finds_entries_by_id() {
        let mut library = InMemoryLibrary::new();
        let (img, meta) = sample("cutout");
        let id = library.add_image(img, meta);

        assert_eq!(library.get(id).unwrap().metadata.name, "cutout");
        assert!(library.get(id + 1).is_none());
    }

    #[test]
    fn clear_does_not_reuse_ids() {
        let mut library = InMemoryLibrary::new();
        let (img_a, meta_a) = sample("a");
        let first = library.add_image(img_a, meta_a);
        library.clear();

        let (img_b, meta_b) = sample("b");
        let second = library.add_image(img_b, meta_b);
        assert!(second > first);
    }
}
