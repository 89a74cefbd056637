//! Grass edge strips and the near-black padding analysis.
//!
//! A terrain's grass sheet holds two [`GRASS_WIDTH`]-wide strips side by side:
//! one blended onto the upper edge of masked runs, one onto the lower edge.
//! The strips are padded with near-black rows so that the visible grass
//! starts at a clean row; the padding depth is the strip's offset.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::TexturizeError;
use crate::pixel::PixelBuffer;

/// Width of each grass strip; grass is tiled horizontally with this period.
pub const GRASS_WIDTH: usize = 64;

/// Which half of the grass sheet holds which strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrassLayout {
    /// Left half is the bottom strip, right half is the top strip.
    #[default]
    BottomLeft,
    /// Left half is the top strip, right half is the bottom strip.
    TopLeft,
}

/// The edge of a masked run a strip is drawn against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// One grass strip together with its precomputed padding offset.
#[derive(Debug, Clone)]
pub struct GrassStrip {
    pixels: PixelBuffer,
    edge: Edge,
    offset: usize,
}

impl GrassStrip {
    /// Wraps a strip buffer and measures its near-black padding.
    ///
    /// The strip must be exactly [`GRASS_WIDTH`] pixels wide.
    pub fn new(pixels: PixelBuffer, edge: Edge) -> Result<Self, TexturizeError> {
        if pixels.width() != GRASS_WIDTH {
            return Err(TexturizeError::InvalidInput(format!(
                "grass strip must be {GRASS_WIDTH} pixels wide, got {}",
                pixels.width()
            )));
        }
        let offset = edge_offset(&pixels, edge)?;
        Ok(Self {
            pixels,
            edge,
            offset,
        })
    }

    /// Number of near-black rows at the strip's outer edge.
    ///
    /// Equal to the strip height when the whole strip is padding.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Strip height in rows, padding included.
    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// Rows of real grass left after the padding.
    pub fn visible_rows(&self) -> usize {
        self.height() - self.offset
    }

    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Samples row `row` of the strip at column `x mod GRASS_WIDTH`.
    ///
    /// Returns `None` when `row` lies past the end of the strip.
    pub fn sample(&self, x: usize, row: usize) -> Option<Color> {
        self.pixels.get(x % GRASS_WIDTH, row).ok()
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }
}

/// Counts consecutive near-black rows in column 0, walking inward from the
/// strip's outer edge: downward from row 0 for a top strip, upward from the
/// last row for a bottom strip.
pub fn edge_offset(strip: &PixelBuffer, edge: Edge) -> Result<usize, TexturizeError> {
    let height = strip.height();
    let mut offset = 0;
    for i in 0..height {
        let y = match edge {
            Edge::Top => i,
            Edge::Bottom => height - 1 - i,
        };
        if !strip.get(0, y)?.is_close_to_black() {
            break;
        }
        offset += 1;
    }
    Ok(offset)
}

/// The top and bottom strips cut from one grass sheet.
#[derive(Debug, Clone)]
pub struct GrassStrips {
    pub top: GrassStrip,
    pub bottom: GrassStrip,
}

impl GrassStrips {
    /// Splits a combined grass sheet into its two strips.
    ///
    /// The sheet must be at least `2 * GRASS_WIDTH` pixels wide; columns past
    /// that are ignored.
    pub fn split(sheet: &PixelBuffer, layout: GrassLayout) -> Result<Self, TexturizeError> {
        if sheet.width() < 2 * GRASS_WIDTH {
            return Err(TexturizeError::InvalidInput(format!(
                "grass sheet must be at least {} pixels wide, got {}",
                2 * GRASS_WIDTH,
                sheet.width()
            )));
        }
        let height = sheet.height();
        let left = sheet.sub_image(0, 0, GRASS_WIDTH, height)?;
        let right = sheet.sub_image(GRASS_WIDTH, 0, GRASS_WIDTH, height)?;
        let (top, bottom) = match layout {
            GrassLayout::BottomLeft => (right, left),
            GrassLayout::TopLeft => (left, right),
        };
        Ok(Self {
            top: GrassStrip::new(top, Edge::Top)?,
            bottom: GrassStrip::new(bottom, Edge::Bottom)?,
        })
    }
}
