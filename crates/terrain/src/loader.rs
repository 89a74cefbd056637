//! Decoding and writing RGBA images on disk, and terrain asset lookup.
//!
//! Feature-gated behind `loader` (default on) so that consumers working with
//! already decoded buffers do not pull in the `image` crate.
//!
//! A terrain directory holds one folder per terrain name with a `text.png`
//! texture and a `grass.png` sheet.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::pixel::PixelBuffer;

use crate::cache::{ImageCache, ImageKey};
use crate::render::TerrainAssets;
use crate::Terrain;

const TEXTURE_FILE: &str = "text.png";
const GRASS_FILE: &str = "grass.png";

/// Decodes any supported image file into an RGBA8 buffer.
pub fn load_image(path: &Path) -> Result<PixelBuffer, TexturizeError> {
    let img = image::open(path)
        .map_err(|e| TexturizeError::Io(format!("{}: {e}", path.display())))?
        .to_rgba8();
    let (w, h) = img.dimensions();
    PixelBuffer::from_rgba(w as usize, h as usize, img.into_raw())
}

/// Writes a buffer as an RGBA PNG.
///
/// Returns `TexturizeError::InvalidDimensions` if the dimensions overflow
/// `u32`, or `TexturizeError::Io` on write failure.
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<(), TexturizeError> {
    let w = u32::try_from(buffer.width()).map_err(|_| TexturizeError::InvalidDimensions)?;
    let h = u32::try_from(buffer.height()).map_err(|_| TexturizeError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, buffer.data().to_vec())
        .ok_or_else(|| TexturizeError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path)
        .map_err(|e| TexturizeError::Io(format!("{}: {e}", path.display())))?;
    log::info!("wrote {}x{} image to {}", w, h, path.display());
    Ok(())
}

/// Loads terrain assets from a directory, caching decoded images.
#[derive(Debug)]
pub struct AssetLoader {
    root: PathBuf,
    cache: ImageCache,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: ImageCache::new(),
        }
    }

    pub fn cache(&self) -> &ImageCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ImageCache {
        &mut self.cache
    }

    fn terrain_dir(&self, terrain: &Terrain) -> PathBuf {
        self.root.join(terrain.name)
    }

    /// True when both asset files of `terrain` exist under the root.
    pub fn has_terrain(&self, terrain: &Terrain) -> bool {
        let dir = self.terrain_dir(terrain);
        dir.join(TEXTURE_FILE).is_file() && dir.join(GRASS_FILE).is_file()
    }

    /// Decodes (or fetches from cache) any image file.
    pub fn image(&mut self, path: &Path) -> Result<Arc<PixelBuffer>, TexturizeError> {
        self.cache
            .get_or_try_insert_with(ImageKey::path(path), || load_image(path))
    }

    /// The texture and grass sheet of `terrain`.
    pub fn terrain(&mut self, terrain: &Terrain) -> Result<TerrainAssets, TexturizeError> {
        let dir = self.terrain_dir(terrain);
        let texture = self.image(&dir.join(TEXTURE_FILE))?;
        let grass = self.image(&dir.join(GRASS_FILE))?;
        Ok(TerrainAssets { texture, grass })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wa_texturizer_core::{Color, GRASS_WIDTH};

    fn write_terrain(root: &Path, name: &str) {
        let dir = root.join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let texture = PixelBuffer::filled(8, 8, Color::rgb(120, 80, 40)).unwrap();
        let grass = PixelBuffer::filled(2 * GRASS_WIDTH, 16, Color::rgb(40, 180, 40)).unwrap();
        save_image(&texture, &dir.join(TEXTURE_FILE)).unwrap();
        save_image(&grass, &dir.join(GRASS_FILE)).unwrap();
    }

    #[test]
    fn save_then_load_preserves_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        let mut buffer = PixelBuffer::filled(5, 3, Color::rgba(1, 2, 3, 4)).unwrap();
        buffer.set(4, 2, Color::rgb(255, 0, 0)).unwrap();
        save_image(&buffer, &path).unwrap();
        assert_eq!(load_image(&path).unwrap(), buffer);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_image(&dir.path().join("missing.png")),
            Err(TexturizeError::Io(_))
        ));
    }

    #[test]
    fn terrain_assets_are_loaded_and_cached() {
        let dir = tempfile::tempdir().unwrap();
        write_terrain(dir.path(), "Art");
        let art = Terrain::from_name("Art").unwrap();
        let mut loader = AssetLoader::new(dir.path());
        assert!(loader.has_terrain(&art));

        let first = loader.terrain(&art).unwrap();
        assert_eq!(first.texture.width(), 8);
        assert_eq!(first.grass.width(), 2 * GRASS_WIDTH);
        assert_eq!(loader.cache().len(), 2);

        let second = loader.terrain(&art).unwrap();
        assert!(Arc::ptr_eq(&first.texture, &second.texture));
        assert_eq!(loader.cache().len(), 2);
    }

    #[test]
    fn missing_terrain_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let snow = Terrain::from_name("Snow").unwrap();
        let mut loader = AssetLoader::new(dir.path());
        assert!(!loader.has_terrain(&snow));
        assert!(loader.terrain(&snow).is_err());
    }
}
