#![deny(unsafe_code)]
//! Terrain registry: maps terrain names to their `waLV` texture indices and
//! ties the core compositor to terrain assets and precomputed palettes.
//!
//! The CLI depends on this crate to resolve a terrain identifier into the
//! texture, grass and palette a render needs.

pub mod cache;
pub mod render;
pub mod store;

#[cfg(feature = "loader")]
pub mod loader;

use wa_texturizer_core::error::TexturizeError;

/// A selectable terrain and the index the game uses for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Terrain {
    pub name: &'static str,
    pub index: u8,
}

/// All selectable terrains. Index 9 (Dungeon) has no usable assets.
pub const TERRAINS: &[Terrain] = &[
    Terrain { name: "-Beach", index: 0 },
    Terrain { name: "-Desert", index: 1 },
    Terrain { name: "-Forest", index: 2 },
    Terrain { name: "-Farm", index: 3 },
    Terrain { name: "-Hell", index: 4 },
    Terrain { name: "Art", index: 5 },
    Terrain { name: "Cheese", index: 6 },
    Terrain { name: "Construction", index: 7 },
    Terrain { name: "Desert", index: 8 },
    Terrain { name: "Easter", index: 10 },
    Terrain { name: "Forest", index: 11 },
    Terrain { name: "Fruit", index: 12 },
    Terrain { name: "Gulf", index: 13 },
    Terrain { name: "Hell", index: 14 },
    Terrain { name: "Hospital", index: 15 },
    Terrain { name: "Jungle", index: 16 },
    Terrain { name: "Manhattan", index: 17 },
    Terrain { name: "Medieval", index: 18 },
    Terrain { name: "Music", index: 19 },
    Terrain { name: "Pirate", index: 20 },
    Terrain { name: "Snow", index: 21 },
    Terrain { name: "Space", index: 22 },
    Terrain { name: "Sports", index: 23 },
    Terrain { name: "Tentacle", index: 24 },
    Terrain { name: "Time", index: 25 },
    Terrain { name: "Tools", index: 26 },
    Terrain { name: "Tribal", index: 27 },
    Terrain { name: "Urban", index: 28 },
];

impl Terrain {
    /// Looks up a terrain by its exact name.
    ///
    /// Returns `TexturizeError::UnknownTerrain` if the name is not registered.
    pub fn from_name(name: &str) -> Result<Terrain, TexturizeError> {
        TERRAINS
            .iter()
            .find(|t| t.name == name)
            .copied()
            .ok_or_else(|| TexturizeError::UnknownTerrain(name.to_string()))
    }

    /// Looks up a terrain by its `waLV` index.
    pub fn from_index(index: u8) -> Result<Terrain, TexturizeError> {
        TERRAINS
            .iter()
            .find(|t| t.index == index)
            .copied()
            .ok_or_else(|| TexturizeError::UnknownTerrain(format!("index {index}")))
    }

    /// Names of all registered terrains, in registry order.
    pub fn list_names() -> Vec<&'static str> {
        TERRAINS.iter().map(|t| t.name).collect()
    }
}
