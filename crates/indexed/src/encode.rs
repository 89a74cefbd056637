//! RGBA to palette-index mapping and indexed PNG encoding.

use std::collections::HashMap;

use png::{BitDepth, ColorType, Encoder};
use wa_texturizer_core::color::Color;
use wa_texturizer_core::error::TexturizeError;
use wa_texturizer_core::metadata::WalvRecord;
use wa_texturizer_core::palette::ColorPalette;
use wa_texturizer_core::pixel::PixelBuffer;

use crate::chunk::splice_walv;

/// Entries addressable by an 8-bit index.
pub const MAX_PALETTE_LEN: usize = 256;

/// Resolves colors to palette indices, remembering every answer.
struct IndexMap<'a> {
    palette: &'a ColorPalette,
    transparent_first: bool,
    resolved: HashMap<Color, u8>,
}

impl<'a> IndexMap<'a> {
    fn new(palette: &'a ColorPalette) -> Self {
        let transparent_first = palette.get(0).is_some_and(|c| c.a == 0);
        let mut resolved = HashMap::with_capacity(palette.len());
        // first occurrence wins for exact matches
        for (i, &c) in palette.colors().iter().enumerate().rev() {
            resolved.insert(c, i as u8);
        }
        Self {
            palette,
            transparent_first,
            resolved,
        }
    }

    fn index_of(&mut self, color: Color) -> u8 {
        if color.a == 0 && self.transparent_first {
            return 0;
        }
        if let Some(&i) = self.resolved.get(&color) {
            return i;
        }
        let i = self.lookup(color);
        self.resolved.insert(color, i);
        i
    }

    fn lookup(&self, color: Color) -> u8 {
        let colors = self.palette.colors();
        // skip the transparent sentinel so opaque black finds its own entry
        let start = usize::from(self.transparent_first && colors.len() > 1);
        if let Some(i) = colors[start..].iter().position(|c| c.rgb_eq(color)) {
            return (start + i) as u8;
        }
        let (i, nearest) = colors
            .iter()
            .enumerate()
            .skip(start)
            .min_by_key(|(_, c)| c.rgb_distance_squared(color))
            .map(|(i, &c)| (i, c))
            .unwrap_or((0, colors[0]));
        log::warn!(
            "{} is not in the palette, using nearest entry {} ({})",
            color.to_hex(),
            i,
            nearest.to_hex()
        );
        i as u8
    }
}

fn check_palette(palette: &ColorPalette) -> Result<(), TexturizeError> {
    if palette.is_empty() {
        return Err(TexturizeError::InvalidInput("palette is empty".into()));
    }
    if palette.len() > MAX_PALETTE_LEN {
        return Err(TexturizeError::PaletteOverflow(palette.len()));
    }
    Ok(())
}

/// Maps every pixel of `image` to an index into `palette`, row-major.
///
/// A fully transparent pixel maps to 0 when the first entry is fully
/// transparent. Otherwise an exact RGBA match is preferred, then an RGB
/// match, then the nearest entry by squared RGB distance (logged as a
/// warning).
pub fn index_pixels(image: &PixelBuffer, palette: &ColorPalette) -> Result<Vec<u8>, TexturizeError> {
    check_palette(palette)?;
    let mut map = IndexMap::new(palette);
    Ok(image.pixels().map(|c| map.index_of(c)).collect())
}

fn encoding_err(e: png::EncodingError) -> TexturizeError {
    TexturizeError::Format(format!("cannot encode indexed png: {e}"))
}

/// Encodes `image` as an 8-bit indexed PNG over `palette` and embeds `record`
/// as the `waLV` chunk.
///
/// `PLTE` holds the RGB of every entry; when entry 0 is fully transparent a
/// one-entry `tRNS` marks it so.
pub fn encode_indexed(
    image: &PixelBuffer,
    palette: &ColorPalette,
    record: &WalvRecord,
) -> Result<Vec<u8>, TexturizeError> {
    let indices = index_pixels(image, palette)?;
    let width = u32::try_from(image.width()).map_err(|_| TexturizeError::InvalidDimensions)?;
    let height = u32::try_from(image.height()).map_err(|_| TexturizeError::InvalidDimensions)?;
    let plte: Vec<u8> = palette.colors().iter().flat_map(|c| c.rgb_channels()).collect();

    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(&mut bytes, width, height);
        encoder.set_color(ColorType::Indexed);
        encoder.set_depth(BitDepth::Eight);
        encoder.set_palette(plte);
        if palette.get(0).is_some_and(|c| c.a == 0) {
            encoder.set_trns(vec![0u8]);
        }
        let mut writer = encoder.write_header().map_err(encoding_err)?;
        writer.write_image_data(&indices).map_err(encoding_err)?;
        writer.finish().map_err(encoding_err)?;
    }
    log::debug!(
        "encoded {width}x{height} indexed png, {} palette entries",
        palette.len()
    );
    splice_walv(&bytes, record)
}
