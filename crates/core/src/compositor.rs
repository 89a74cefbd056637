//! The texturizing pass: masked pixels become grass and terrain texture.
//!
//! Each column is scanned twice. The upward scan (bottom row first) lays the
//! bottom grass strip onto the lower edge of every vertical masked run and
//! fills the remainder of the run with the tiled terrain texture. The
//! downward scan (top row first) then lays the top grass strip onto the upper
//! edge of each run, overwriting what the first scan wrote. Near-black grass
//! pixels are blend padding and are never drawn.
//!
//! With `pad_top`/`pad_bottom` the source is rendered inside a
//! [`MAX_GRASS_HEIGHT`] margin filled with copies of the adjacent edge row,
//! so runs touching the image border continue into the margin and receive no
//! grass there. The margin is cropped away afterwards.

use crate::color::Color;
use crate::config::RenderConfig;
use crate::error::TexturizeError;
use crate::grass::{GrassStrip, GrassStrips};
use crate::palette::ColorPalette;
use crate::pixel::PixelBuffer;

/// Height of the working margin added for each padded border.
pub const MAX_GRASS_HEIGHT: usize = 64;

/// Where the palette of an indexed render starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PaletteSeed {
    /// Start empty; only background and source colors are collected.
    #[default]
    Encountered,
    /// Start from a terrain's precomputed palette.
    Precomputed(ColorPalette),
}

/// Output of one texturize call.
#[derive(Debug, Clone)]
pub struct Texturized {
    /// The composited image, same size as the source.
    pub image: PixelBuffer,
    /// Present when `build_palette` was requested.
    pub palette: Option<ColorPalette>,
}

/// Texturizes masked images against one terrain's texture and grass.
///
/// Grass offsets are measured once at construction and reused for every
/// image rendered with this compositor.
#[derive(Debug, Clone)]
pub struct Compositor<'a> {
    texture: &'a PixelBuffer,
    grass: GrassStrips,
}

impl<'a> Compositor<'a> {
    /// Creates a compositor from a texture and an already split grass sheet.
    pub fn new(texture: &'a PixelBuffer, grass: GrassStrips) -> Self {
        log::debug!(
            "grass offsets: top {}/{} rows, bottom {}/{} rows",
            grass.top.offset(),
            grass.top.height(),
            grass.bottom.offset(),
            grass.bottom.height()
        );
        Self { texture, grass }
    }

    /// Renders `source` according to `config`.
    ///
    /// The result has the dimensions of `source`. A mask color that matches
    /// no pixel yields a copy of the source.
    pub fn texturize(
        &self,
        source: &PixelBuffer,
        config: &RenderConfig,
        seed: PaletteSeed,
    ) -> Result<Texturized, TexturizeError> {
        let width = source.width();
        let height = source.height();
        let top_margin = if config.pad_top { MAX_GRASS_HEIGHT } else { 0 };
        let bottom_margin = if config.pad_bottom { MAX_GRASS_HEIGHT } else { 0 };
        let render_height = height + top_margin + bottom_margin;
        log::debug!("texturizing {width}x{height} source at render height {render_height}");

        let working = padded_source(source, top_margin, bottom_margin)?;
        let mut output = working.clone();

        let mut palette = config.build_palette.then(|| {
            let mut palette = match seed {
                PaletteSeed::Encountered => ColorPalette::new(),
                PaletteSeed::Precomputed(palette) => palette,
            };
            palette.place_background_first(
                config.transparent_background,
                config.background_color,
            );
            palette
        });

        for x in 0..width {
            self.apply_bottom_grass(&working, &mut output, x, config.mask_color, palette.as_mut())?;
            self.apply_top_grass(&working, &mut output, x, config.mask_color)?;
        }

        let image = if top_margin + bottom_margin > 0 {
            output.sub_image(0, top_margin, width, height)?
        } else {
            output
        };
        if let Some(palette) = &palette {
            log::debug!("collected palette of {} colors", palette.len());
        }
        Ok(Texturized { image, palette })
    }

    /// Scans column `x` from the bottom row up.
    ///
    /// `below` is the bottom-strip row drawn next; it restarts at the last
    /// visible grass row whenever the run is broken and becomes `None` once
    /// the strip is used up.
    fn apply_bottom_grass(
        &self,
        working: &PixelBuffer,
        output: &mut PixelBuffer,
        x: usize,
        mask: Color,
        mut palette: Option<&mut ColorPalette>,
    ) -> Result<(), TexturizeError> {
        let bottom: &GrassStrip = &self.grass.bottom;
        let first_row = bottom.visible_rows().checked_sub(1);
        let mut below = first_row;

        for y in (0..working.height()).rev() {
            let source = working.get(x, y)?;
            if source.rgb_eq(mask) {
                let grass = below
                    .and_then(|row| bottom.sample(x, row))
                    .filter(|c| !c.is_close_to_black());
                let color = grass.unwrap_or_else(|| self.texture.get_wrapped(x, y));
                output.set(x, y, color)?;
                below = below.and_then(|row| row.checked_sub(1));
            } else {
                below = first_row;
                if let Some(palette) = palette.as_deref_mut() {
                    palette.add_if_absent(source);
                }
            }
        }
        Ok(())
    }

    /// Scans column `x` from the top row down, counting masked pixels since
    /// the start of the current run in `above`.
    fn apply_top_grass(
        &self,
        working: &PixelBuffer,
        output: &mut PixelBuffer,
        x: usize,
        mask: Color,
    ) -> Result<(), TexturizeError> {
        let top: &GrassStrip = &self.grass.top;
        let mut above = 0;

        for y in 0..working.height() {
            if working.get(x, y)?.rgb_eq(mask) {
                if above < top.visible_rows() {
                    if let Some(color) = top
                        .sample(x, above + top.offset())
                        .filter(|c| !c.is_close_to_black())
                    {
                        output.set(x, y, color)?;
                    }
                }
                above += 1;
            } else {
                above = 0;
            }
        }
        Ok(())
    }
}

/// Places `source` inside the working margins and fills each margin with
/// copies of the adjacent edge row.
fn padded_source(
    source: &PixelBuffer,
    top_margin: usize,
    bottom_margin: usize,
) -> Result<PixelBuffer, TexturizeError> {
    if top_margin + bottom_margin == 0 {
        return Ok(source.clone());
    }
    let height = source.height();
    let mut working = PixelBuffer::new(source.width(), height + top_margin + bottom_margin)?;
    working.blit(source, 0, top_margin)?;
    if top_margin > 0 {
        working.set_row(0, &source.row(0)?, top_margin)?;
    }
    if bottom_margin > 0 {
        working.set_row(top_margin + height, &source.row(height - 1)?, bottom_margin)?;
    }
    Ok(working)
}

/// Splits `grass_sheet` and renders `source` in one call.
pub fn texturize(
    source: &PixelBuffer,
    texture: &PixelBuffer,
    grass_sheet: &PixelBuffer,
    config: &RenderConfig,
    seed: PaletteSeed,
) -> Result<Texturized, TexturizeError> {
    let grass = GrassStrips::split(grass_sheet, config.grass_layout)?;
    Compositor::new(texture, grass).texturize(source, config, seed)
}
