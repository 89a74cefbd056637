//! Render configuration for one texturize call.
//!
//! Deserializes from JSON with every field optional; missing fields take the
//! [`Default`] values. Colors accept either `"#rrggbb"` or `[r, g, b, a]`.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::grass::GrassLayout;

/// Terrain selected when none is configured.
pub const DEFAULT_TERRAIN: &str = "Cheese";

/// Every option that shapes a single texturize call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Terrain whose texture, grass and palette are used.
    pub terrain: String,
    /// Source pixels with this RGB are replaced.
    pub mask_color: Color,
    /// Suppress grass along the top border of the image.
    pub pad_top: bool,
    /// Suppress grass along the bottom border of the image.
    pub pad_bottom: bool,
    /// Collect the palette required for indexed output.
    pub build_palette: bool,
    /// Use fully transparent black as the background entry.
    pub transparent_background: bool,
    /// Background entry when `transparent_background` is off; also the
    /// fill color of the dimension normalizer.
    pub background_color: Color,
    /// Pad the result to valid map dimensions.
    pub resize: bool,
    /// Which half of the grass sheet holds which strip.
    pub grass_layout: GrassLayout,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            terrain: DEFAULT_TERRAIN.to_string(),
            mask_color: Color::BLACK,
            pad_top: false,
            pad_bottom: false,
            build_palette: false,
            transparent_background: false,
            background_color: Color::BLACK,
            resize: false,
            grass_layout: GrassLayout::default(),
        }
    }
}

impl RenderConfig {
    /// The color the output background resolves to.
    pub fn background(&self) -> Color {
        if self.transparent_background {
            Color::TRANSPARENT
        } else {
            self.background_color
        }
    }
}
