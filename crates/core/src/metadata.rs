//! The `waLV` level descriptor embedded in indexed map images.
//!
//! Layout (41 bytes, little-endian):
//!
//! | offset | field |
//! |---|---|
//! | 0x00 | u32 land seed |
//! | 0x04 | u32 object seed |
//! | 0x08 | u32 cavern flag |
//! | 0x0C | u32 style |
//! | 0x10 | u32 no indestructible borders |
//! | 0x14 | u32 object percentage |
//! | 0x18 | u32 bridge percentage |
//! | 0x1C | u32 water level |
//! | 0x20 | u8 terrain index, u8 0, u8 format version, u8 0 |
//! | 0x24 | u32 water colour |
//! | 0x28 | u8 worm places |

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{self, Cursor};

use crate::error::TexturizeError;

/// PNG chunk type carrying the record.
pub const WALV_CHUNK_TYPE: [u8; 4] = *b"waLV";

/// Encoded size of a [`WalvRecord`].
pub const WALV_RECORD_LEN: usize = 41;

/// Version byte that makes the game read the terrain index.
pub const SOIL_FORMAT_VERSION: u8 = 1;

/// Level parameters stored in the `waLV` chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalvRecord {
    pub land_seed: u32,
    pub object_seed: u32,
    pub cavern: u32,
    pub style: u32,
    pub no_indestructible_borders: u32,
    pub object_percentage: u32,
    pub bridge_percentage: u32,
    pub water_level: u32,
    pub terrain_index: u8,
    pub format_version: u8,
    pub water_colour: u32,
    pub worm_places: u8,
}

impl Default for WalvRecord {
    fn default() -> Self {
        Self {
            land_seed: 0,
            object_seed: 0,
            cavern: 0,
            style: 0,
            no_indestructible_borders: 1,
            object_percentage: 85,
            bridge_percentage: 30,
            water_level: 0,
            terrain_index: 0,
            format_version: SOIL_FORMAT_VERSION,
            water_colour: 0,
            worm_places: 0,
        }
    }
}

impl WalvRecord {
    /// The default record pointing at `terrain_index`.
    pub fn for_terrain(terrain_index: u8) -> Self {
        Self {
            terrain_index,
            ..Self::default()
        }
    }

    /// Encodes the record into its fixed 41-byte form.
    pub fn to_bytes(&self) -> [u8; WALV_RECORD_LEN] {
        let mut out = [0u8; WALV_RECORD_LEN];
        // writing into a fixed array of exactly the right size cannot fail
        let _ = self.write_to(&mut Cursor::new(&mut out[..]));
        out
    }

    fn write_to(&self, w: &mut impl io::Write) -> io::Result<()> {
        w.write_u32::<LE>(self.land_seed)?;
        w.write_u32::<LE>(self.object_seed)?;
        w.write_u32::<LE>(self.cavern)?;
        w.write_u32::<LE>(self.style)?;
        w.write_u32::<LE>(self.no_indestructible_borders)?;
        w.write_u32::<LE>(self.object_percentage)?;
        w.write_u32::<LE>(self.bridge_percentage)?;
        w.write_u32::<LE>(self.water_level)?;
        w.write_all(&[self.terrain_index, 0, self.format_version, 0])?;
        w.write_u32::<LE>(self.water_colour)?;
        w.write_u8(self.worm_places)
    }

    /// Decodes a record; `bytes` must be exactly 41 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TexturizeError> {
        if bytes.len() != WALV_RECORD_LEN {
            return Err(TexturizeError::Format(format!(
                "waLV record must be {WALV_RECORD_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut r = Cursor::new(bytes);
        Self::read_from(&mut r).map_err(|e| TexturizeError::Format(e.to_string()))
    }

    fn read_from(r: &mut Cursor<&[u8]>) -> io::Result<Self> {
        let land_seed = r.read_u32::<LE>()?;
        let object_seed = r.read_u32::<LE>()?;
        let cavern = r.read_u32::<LE>()?;
        let style = r.read_u32::<LE>()?;
        let no_indestructible_borders = r.read_u32::<LE>()?;
        let object_percentage = r.read_u32::<LE>()?;
        let bridge_percentage = r.read_u32::<LE>()?;
        let water_level = r.read_u32::<LE>()?;
        let terrain_index = r.read_u8()?;
        let _ = r.read_u8()?;
        let format_version = r.read_u8()?;
        let _ = r.read_u8()?;
        let water_colour = r.read_u32::<LE>()?;
        let worm_places = r.read_u8()?;
        Ok(Self {
            land_seed,
            object_seed,
            cavern,
            style,
            no_indestructible_borders,
            object_percentage,
            bridge_percentage,
            water_level,
            terrain_index,
            format_version,
            water_colour,
            worm_places,
        })
    }
}
