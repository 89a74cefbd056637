//! 8-bit RGBA color value and the comparisons the compositor relies on.
//!
//! Two colors are considered the same for masking and palette purposes when
//! their red, green and blue channels match; alpha is carried along but never
//! compared. A color is "close to black" when every RGB channel is below
//! [`CLOSE_TO_BLACK_THRESHOLD`], which the grass assets use as blend padding.

use crate::error::TexturizeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Channels strictly below this value count as near-black.
pub const CLOSE_TO_BLACK_THRESHOLD: u8 = 40;

/// A single RGBA pixel value, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Fully transparent black, the sentinel background of transparent output.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// Opaque black.
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);

    /// Builds a color from four channel values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Builds a color from a 4-byte RGBA array.
    pub const fn from_array([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the channels as a 4-byte RGBA array.
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the red, green and blue channels.
    pub const fn rgb_channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Compares red, green and blue; alpha is ignored.
    pub fn rgb_eq(self, other: Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// True when each of R, G and B is below [`CLOSE_TO_BLACK_THRESHOLD`].
    pub fn is_close_to_black(self) -> bool {
        self.r < CLOSE_TO_BLACK_THRESHOLD
            && self.g < CLOSE_TO_BLACK_THRESHOLD
            && self.b < CLOSE_TO_BLACK_THRESHOLD
    }

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// The result is always opaque. Returns `TexturizeError::InvalidColor` if
    /// the input is not exactly six hex digits after the optional `#`.
    pub fn from_hex(hex: &str) -> Result<Color, TexturizeError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TexturizeError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|e| TexturizeError::InvalidColor(format!("'{hex}': {e}")))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Formats the RGB channels as `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Squared euclidean distance between the RGB channels of two colors.
    pub fn rgb_distance_squared(self, other: Color) -> u32 {
        self.rgb_channels()
            .iter()
            .zip(other.rgb_channels().iter())
            .map(|(&a, &b)| {
                let d = i32::from(a) - i32::from(b);
                (d * d) as u32
            })
            .sum()
    }
}

impl From<[u8; 4]> for Color {
    fn from(channels: [u8; 4]) -> Self {
        Color::from_array(channels)
    }
}

impl From<Color> for [u8; 4] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

/// Opaque colors serialize as `"#rrggbb"`; anything with alpha below 255
/// serializes as `[r, g, b, a]` so the alpha channel survives.
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.a == 255 {
            serializer.serialize_str(&self.to_hex())
        } else {
            self.to_array().serialize(serializer)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels([u8; 4]),
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match ColorRepr::deserialize(deserializer)? {
            ColorRepr::Hex(s) => Color::from_hex(&s).map_err(serde::de::Error::custom),
            ColorRepr::Channels(channels) => Ok(Color::from_array(channels)),
        }
    }
}
