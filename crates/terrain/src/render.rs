//! Terrain-aware rendering: resolves a terrain by name, seeds the palette
//! from the store, texturizes and optionally normalizes dimensions.

use std::sync::Arc;

use wa_texturizer_core::color::Color;
use wa_texturizer_core::compositor::{texturize, PaletteSeed};
use wa_texturizer_core::config::RenderConfig;
use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::grass::{GrassLayout, GrassStrips};
use wa_texturizer_core::palette::{terrain_palette, ColorPalette};
use wa_texturizer_core::pixel::PixelBuffer;
use wa_texturizer_core::resize::resize;

use crate::store::PaletteStore;
use crate::Terrain;

/// Decoded images of one terrain.
#[derive(Debug, Clone)]
pub struct TerrainAssets {
    pub texture: Arc<PixelBuffer>,
    /// Combined sheet holding both grass strips side by side.
    pub grass: Arc<PixelBuffer>,
}

impl TerrainAssets {
    pub fn new(texture: PixelBuffer, grass: PixelBuffer) -> Self {
        Self {
            texture: Arc::new(texture),
            grass: Arc::new(grass),
        }
    }

    /// Every color this terrain can contribute to a render, background
    /// first, then texture, top grass and bottom grass.
    pub fn palette(
        &self,
        background: Color,
        layout: GrassLayout,
    ) -> Result<ColorPalette, TexturizeError> {
        let strips = GrassStrips::split(&self.grass, layout)?;
        Ok(terrain_palette(
            background,
            [
                self.texture.as_ref(),
                strips.top.pixels(),
                strips.bottom.pixels(),
            ],
        ))
    }
}

/// A finished render.
#[derive(Debug, Clone)]
pub struct Render {
    pub image: PixelBuffer,
    pub palette: Option<ColorPalette>,
    pub terrain: Terrain,
}

/// Runs the compositor for named terrains.
///
/// When a [`PaletteStore`] is attached, palette-building renders start from
/// the terrain's registered palette and fail with
/// `TexturizeError::MissingPalette` if there is none. Without a store they
/// collect only the colors they encounter.
#[derive(Debug, Clone, Default)]
pub struct Texturizer {
    palettes: Option<PaletteStore>,
}

impl Texturizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_palettes(palettes: PaletteStore) -> Self {
        Self {
            palettes: Some(palettes),
        }
    }

    /// Resolves `config.terrain` to its registry entry.
    pub fn terrain(&self, config: &RenderConfig) -> Result<Terrain, TexturizeError> {
        Terrain::from_name(&config.terrain)
    }

    fn seed(&self, terrain: &Terrain, config: &RenderConfig) -> Result<PaletteSeed, TexturizeError> {
        match &self.palettes {
            Some(store) if config.build_palette => {
                Ok(PaletteSeed::Precomputed(store.palette_for(terrain.name)?))
            }
            _ => Ok(PaletteSeed::Encountered),
        }
    }

    /// Texturizes `source` with `assets`, then pads it to map dimensions
    /// when `config.resize` is set.
    pub fn render(
        &self,
        source: &PixelBuffer,
        assets: &TerrainAssets,
        config: &RenderConfig,
    ) -> Result<Render, TexturizeError> {
        let terrain = self.terrain(config)?;
        let seed = self.seed(&terrain, config)?;
        let out = texturize(source, &assets.texture, &assets.grass, config, seed)?;
        let image = if config.resize {
            resize(&out.image, config.background())?
        } else {
            out.image
        };
        Ok(Render {
            image,
            palette: out.palette,
            terrain,
        })
    }
}
