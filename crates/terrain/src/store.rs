//! Precomputed terrain palettes, persisted as JSON.
//!
//! The file is an object mapping terrain name to an array of colors, each
//! either `"#rrggbb"` or `[r, g, b, a]`. Lookups hand out clones so a render
//! can reorder its palette without touching the registered one.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::palette::ColorPalette;

/// Terrain name to precomputed palette.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaletteStore {
    palettes: BTreeMap<String, ColorPalette>,
}

impl PaletteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `palette` for `terrain`, replacing any previous one.
    pub fn insert(&mut self, terrain: impl Into<String>, palette: ColorPalette) {
        self.palettes.insert(terrain.into(), palette);
    }

    /// A copy of the palette registered for `terrain`.
    ///
    /// Returns `TexturizeError::MissingPalette` if none is registered.
    pub fn palette_for(&self, terrain: &str) -> Result<ColorPalette, TexturizeError> {
        self.palettes
            .get(terrain)
            .cloned()
            .ok_or_else(|| TexturizeError::MissingPalette(terrain.to_string()))
    }

    /// Registered terrain names, sorted.
    pub fn terrains(&self) -> impl Iterator<Item = &str> {
        self.palettes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, TexturizeError> {
        serde_json::from_str(json)
            .map_err(|e| TexturizeError::InvalidInput(format!("invalid palette store: {e}")))
    }

    pub fn to_json(&self) -> Result<String, TexturizeError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TexturizeError::InvalidInput(format!("cannot serialize palettes: {e}")))
    }

    /// Reads a store from a JSON file.
    pub fn load(path: &Path) -> Result<Self, TexturizeError> {
        let json = fs::read_to_string(path)
            .map_err(|e| TexturizeError::Io(format!("{}: {e}", path.display())))?;
        let store = Self::from_json(&json)?;
        log::debug!("loaded {} palettes from {}", store.len(), path.display());
        Ok(store)
    }

    /// Writes the store to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), TexturizeError> {
        fs::write(path, self.to_json()?)
            .map_err(|e| TexturizeError::Io(format!("{}: {e}", path.display())))?;
        log::info!("wrote {} palettes to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wa_texturizer_core::Color;

    fn sample_store() -> PaletteStore {
        let mut store = PaletteStore::new();
        store.insert(
            "Art",
            ColorPalette::from_colors([Color::BLACK, Color::rgb(200, 10, 10)]),
        );
        store
    }

    #[test]
    fn palette_for_returns_registered_palette() {
        let store = sample_store();
        let palette = store.palette_for("Art").unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get(1), Some(Color::rgb(200, 10, 10)));
    }

    #[test]
    fn palette_for_unknown_terrain_is_missing_palette() {
        assert!(matches!(
            sample_store().palette_for("Cheese"),
            Err(TexturizeError::MissingPalette(name)) if name == "Cheese"
        ));
    }

    #[test]
    fn palette_for_hands_out_independent_copies() {
        let store = sample_store();
        let mut palette = store.palette_for("Art").unwrap();
        palette.place_first(Color::TRANSPARENT, true);
        assert_eq!(store.palette_for("Art").unwrap().len(), 2);
    }

    #[test]
    fn json_round_trip() {
        let store = sample_store();
        let restored = PaletteStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(store, restored);
    }

    #[test]
    fn from_json_accepts_array_colors() {
        let store = PaletteStore::from_json(r#"{"Snow": [[0,0,0,0], [250,250,250,255]]}"#).unwrap();
        let palette = store.palette_for("Snow").unwrap();
        assert_eq!(palette.get(0), Some(Color::TRANSPARENT));
        assert_eq!(palette.get(1), Some(Color::rgb(250, 250, 250)));
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        assert!(matches!(
            PaletteStore::from_json("[1, 2"),
            Err(TexturizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("palettes.json");
        let store = sample_store();
        store.save(&path).unwrap();
        assert_eq!(PaletteStore::load(&path).unwrap(), store);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            PaletteStore::load(&dir.path().join("nope.json")),
            Err(TexturizeError::Io(_))
        ));
    }

    #[test]
    fn terrains_are_sorted() {
        let mut store = sample_store();
        store.insert("-Beach", ColorPalette::new());
        let names: Vec<_> = store.terrains().collect();
        assert_eq!(names, ["-Beach", "Art"]);
    }
}
