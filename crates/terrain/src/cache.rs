//! Caller-owned cache of decoded images.
//!
//! Entries are immutable once inserted and shared through `Arc`, so a cached
//! buffer can back any number of renders. Nothing is evicted implicitly; the
//! owner calls [`ImageCache::evict`] or [`ImageCache::clear`].

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::pixel::PixelBuffer;

/// Identity of a cached image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageKey {
    /// The file the image was decoded from.
    Path(PathBuf),
    /// Hash of the dimensions and pixel bytes.
    Content(u64),
}

impl ImageKey {
    pub fn path(path: impl AsRef<Path>) -> Self {
        ImageKey::Path(path.as_ref().to_path_buf())
    }

    /// Keys a buffer by its content.
    pub fn content(buffer: &PixelBuffer) -> Self {
        let mut hasher = DefaultHasher::new();
        buffer.width().hash(&mut hasher);
        buffer.height().hash(&mut hasher);
        buffer.data().hash(&mut hasher);
        ImageKey::Content(hasher.finish())
    }
}

/// Map from [`ImageKey`] to shared, immutable pixel buffers.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<ImageKey, Arc<PixelBuffer>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ImageKey) -> Option<Arc<PixelBuffer>> {
        self.entries.get(key).cloned()
    }

    /// Inserts `buffer` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: ImageKey, buffer: PixelBuffer) -> Arc<PixelBuffer> {
        let shared = Arc::new(buffer);
        self.entries.insert(key, Arc::clone(&shared));
        shared
    }

    /// Returns the cached entry for `key`, building it with `load` on a miss.
    ///
    /// A failed load leaves the cache unchanged.
    pub fn get_or_try_insert_with<F>(
        &mut self,
        key: ImageKey,
        load: F,
    ) -> Result<Arc<PixelBuffer>, TexturizeError>
    where
        F: FnOnce() -> Result<PixelBuffer, TexturizeError>,
    {
        if let Some(hit) = self.entries.get(&key) {
            log::debug!("image cache hit: {key:?}");
            return Ok(Arc::clone(hit));
        }
        log::debug!("image cache miss: {key:?}");
        let buffer = load()?;
        Ok(self.insert(key, buffer))
    }

    /// Removes and returns the entry for `key`.
    pub fn evict(&mut self, key: &ImageKey) -> Option<Arc<PixelBuffer>> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wa_texturizer_core::Color;

    fn buffer(color: Color) -> PixelBuffer {
        PixelBuffer::filled(2, 2, color).unwrap()
    }

    #[test]
    fn content_key_depends_on_pixels_and_shape() {
        let a = buffer(Color::rgb(1, 2, 3));
        let b = buffer(Color::rgb(1, 2, 4));
        let tall = PixelBuffer::filled(1, 4, Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(ImageKey::content(&a), ImageKey::content(&a.clone()));
        assert_ne!(ImageKey::content(&a), ImageKey::content(&b));
        assert_ne!(ImageKey::content(&a), ImageKey::content(&tall));
    }

    #[test]
    fn miss_loads_and_hit_reuses() {
        let mut cache = ImageCache::new();
        let key = ImageKey::path("Terrain/Art/text.png");
        let mut loads = 0;
        for _ in 0..3 {
            let entry = cache
                .get_or_try_insert_with(key.clone(), || {
                    loads += 1;
                    Ok(buffer(Color::BLACK))
                })
                .unwrap();
            assert_eq!(entry.width(), 2);
        }
        assert_eq!(loads, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let mut cache = ImageCache::new();
        let key = ImageKey::path("missing.png");
        let result = cache.get_or_try_insert_with(key.clone(), || {
            Err(TexturizeError::Io("not found".into()))
        });
        assert!(result.is_err());
        assert!(cache.is_empty());
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn entries_are_shared_not_copied() {
        let mut cache = ImageCache::new();
        let key = ImageKey::Content(7);
        let first = cache.insert(key.clone(), buffer(Color::BLACK));
        let second = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn evict_and_clear_remove_entries() {
        let mut cache = ImageCache::new();
        cache.insert(ImageKey::Content(1), buffer(Color::BLACK));
        cache.insert(ImageKey::Content(2), buffer(Color::BLACK));
        assert!(cache.evict(&ImageKey::Content(1)).is_some());
        assert!(cache.evict(&ImageKey::Content(1)).is_none());
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
