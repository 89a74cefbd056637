#![deny(unsafe_code)]
//! Core of the map texturizer.
//!
//! Turns a mask image into a textured map: pixels painted in the mask color
//! are replaced with a terrain texture and smoothed grass edges
//! ([`compositor`]). Also provides the palette rules for indexed output
//! ([`palette`]), the map dimension normalizer ([`resize`]) and the `waLV`
//! level record ([`metadata`]). Everything here is pure computation over
//! decoded RGBA buffers; file and PNG handling live in the sibling crates.

pub mod color;
pub mod compositor;
pub mod config;
pub mod error;
pub mod grass;
pub mod metadata;
pub mod palette;
pub mod pixel;
pub mod resize;

pub use color::Color;
pub use compositor::{texturize, Compositor, PaletteSeed, Texturized, MAX_GRASS_HEIGHT};
pub use config::RenderConfig;
pub use error::TexturizeError;
pub use grass::{GrassLayout, GrassStrip, GrassStrips, GRASS_WIDTH};
pub use metadata::WalvRecord;
pub use palette::{terrain_palette, ColorPalette};
pub use pixel::PixelBuffer;
