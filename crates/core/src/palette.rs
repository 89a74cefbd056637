//! Ordered color table for palette-indexed output.
//!
//! Entry order is the index order of the final image, so insertion order is
//! preserved. Entries are deduplicated on RGB: [`ColorPalette::add_if_absent`]
//! never appends a color whose red, green and blue already appear, and
//! [`ColorPalette::place_first`] moves rather than duplicates.
//!
//! The one exception is a fully transparent `[0, 0, 0, 0]` entry at index 0,
//! the background sentinel of transparent output. Only fully transparent
//! colors match it, so opaque black still gets an entry of its own.

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::pixel::PixelBuffer;

/// Ordered, RGB-unique list of colors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Color>", into = "Vec<Color>")]
pub struct ColorPalette {
    colors: Vec<Color>,
}

impl ColorPalette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a palette from `colors`, keeping the first occurrence of each RGB triple.
    pub fn from_colors(colors: impl IntoIterator<Item = Color>) -> Self {
        let mut palette = Self::new();
        for color in colors {
            palette.add_if_absent(color);
        }
        palette
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The entries in index order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// True when index 0 holds the transparent background sentinel.
    pub fn has_transparent_sentinel(&self) -> bool {
        self.colors.first() == Some(&Color::TRANSPARENT)
    }

    /// Index of the first entry whose RGB matches `color`.
    ///
    /// A leading transparent sentinel only matches colors with zero alpha.
    pub fn position(&self, color: Color) -> Option<usize> {
        let skip = usize::from(self.has_transparent_sentinel() && color.a != 0);
        self.colors[skip..]
            .iter()
            .position(|c| c.rgb_eq(color))
            .map(|i| i + skip)
    }

    pub fn contains(&self, color: Color) -> bool {
        self.position(color).is_some()
    }

    /// Appends `color` unless an entry with the same RGB exists.
    ///
    /// Returns whether the color was added.
    pub fn add_if_absent(&mut self, color: Color) -> bool {
        if self.contains(color) {
            return false;
        }
        self.colors.push(color);
        true
    }

    /// Puts `color` at index 0.
    ///
    /// Any existing RGB match is removed first, so the entry moves instead of
    /// being duplicated. With `skip_dedupe` the color is inserted
    /// unconditionally; that is reserved for the fully transparent sentinel.
    pub fn place_first(&mut self, color: Color, skip_dedupe: bool) {
        if !skip_dedupe {
            match self.position(color) {
                Some(0) => return,
                Some(i) => {
                    self.colors.remove(i);
                }
                None => {}
            }
        }
        self.colors.insert(0, color);
    }

    /// Puts the output background at index 0: the transparent sentinel when
    /// `transparent` is set, otherwise `background`.
    ///
    /// A palette that already starts with the sentinel is left as is.
    pub fn place_background_first(&mut self, transparent: bool, background: Color) {
        if transparent {
            if !self.has_transparent_sentinel() {
                self.place_first(Color::TRANSPARENT, true);
            }
        } else {
            self.place_first(background, false);
        }
    }

    /// Adds every pixel of `buffer`, scanning column by column.
    pub fn extend_from_buffer(&mut self, buffer: &PixelBuffer) {
        for x in 0..buffer.width() {
            for y in 0..buffer.height() {
                // x and y never leave the buffer here
                if let Ok(color) = buffer.get(x, y) {
                    self.add_if_absent(color);
                }
            }
        }
    }
}

impl From<Vec<Color>> for ColorPalette {
    fn from(colors: Vec<Color>) -> Self {
        Self::from_colors(colors)
    }
}

impl From<ColorPalette> for Vec<Color> {
    fn from(palette: ColorPalette) -> Self {
        palette.colors
    }
}

/// Builds the precomputed palette of a terrain.
///
/// Starts from `[background]` and adds every color of each source buffer in
/// order (texture, then grass strips), so that every color the compositor
/// can write has a stable index.
pub fn terrain_palette<'a>(
    background: Color,
    sources: impl IntoIterator<Item = &'a PixelBuffer>,
) -> ColorPalette {
    let mut palette = ColorPalette::from_colors([background]);
    for source in sources {
        palette.extend_from_buffer(source);
    }
    palette
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Color = Color::rgb(255, 0, 0);
    const GREEN: Color = Color::rgb(0, 255, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    #[test]
    fn add_if_absent_appends_new_colors_in_order() {
        let mut p = ColorPalette::new();
        assert!(p.add_if_absent(RED));
        assert!(p.add_if_absent(GREEN));
        assert_eq!(p.colors(), &[RED, GREEN]);
    }

    #[test]
    fn add_if_absent_ignores_rgb_duplicate_with_other_alpha() {
        let mut p = ColorPalette::from_colors([RED]);
        assert!(!p.add_if_absent(Color::rgba(255, 0, 0, 10)));
        assert_eq!(p.len(), 1);
        assert_eq!(p.get(0), Some(RED));
    }

    #[test]
    fn place_first_moves_existing_entry() {
        let mut p = ColorPalette::from_colors([RED, GREEN, BLUE]);
        p.place_first(BLUE, false);
        assert_eq!(p.colors(), &[BLUE, RED, GREEN]);
    }

    #[test]
    fn place_first_keeps_entry_already_at_front() {
        let mut p = ColorPalette::from_colors([RED, GREEN]);
        p.place_first(RED, false);
        assert_eq!(p.colors(), &[RED, GREEN]);
    }

    #[test]
    fn place_first_inserts_new_color() {
        let mut p = ColorPalette::from_colors([RED]);
        p.place_first(GREEN, false);
        assert_eq!(p.colors(), &[GREEN, RED]);
    }

    #[test]
    fn place_first_with_skip_dedupe_inserts_unconditionally() {
        let mut p = ColorPalette::from_colors([RED, GREEN]);
        p.place_first(Color::TRANSPARENT, true);
        assert_eq!(p.colors(), &[Color::TRANSPARENT, RED, GREEN]);
    }

    #[test]
    fn transparent_background_is_always_first() {
        let mut p = ColorPalette::from_colors([RED, GREEN]);
        p.place_background_first(true, BLUE);
        assert_eq!(p.get(0), Some(Color::TRANSPARENT));
        assert!(!p.contains(BLUE));
    }

    #[test]
    fn transparent_background_is_not_inserted_twice() {
        let mut p = ColorPalette::from_colors([RED]);
        p.place_first(Color::TRANSPARENT, true);
        p.place_background_first(true, BLUE);
        assert_eq!(p.colors(), &[Color::TRANSPARENT, RED]);
    }

    #[test]
    fn opaque_black_coexists_with_transparent_sentinel() {
        let mut p = ColorPalette::new();
        p.place_background_first(true, BLUE);
        assert!(p.add_if_absent(Color::BLACK));
        assert!(!p.add_if_absent(Color::rgba(0, 0, 0, 200)));
        assert_eq!(p.colors(), &[Color::TRANSPARENT, Color::BLACK]);
        assert_eq!(p.position(Color::BLACK), Some(1));
        assert_eq!(p.position(Color::rgba(7, 7, 7, 0)), None);
        assert_eq!(p.position(Color::TRANSPARENT), Some(0));
    }

    #[test]
    fn transparent_entry_elsewhere_dedupes_on_rgb() {
        let mut p = ColorPalette::from_colors([RED, Color::TRANSPARENT]);
        assert!(!p.add_if_absent(Color::BLACK));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn solid_background_moves_to_front() {
        let mut p = ColorPalette::from_colors([RED, GREEN]);
        p.place_background_first(false, GREEN);
        assert_eq!(p.colors(), &[GREEN, RED]);
    }

    #[test]
    fn extend_from_buffer_scans_column_major() {
        let mut buf = PixelBuffer::new(2, 2).unwrap();
        buf.set(0, 0, RED).unwrap();
        buf.set(1, 0, GREEN).unwrap();
        buf.set(0, 1, BLUE).unwrap();
        buf.set(1, 1, RED).unwrap();
        let mut p = ColorPalette::new();
        p.extend_from_buffer(&buf);
        assert_eq!(p.colors(), &[RED, BLUE, GREEN]);
    }

    #[test]
    fn terrain_palette_starts_with_background() {
        let texture = PixelBuffer::filled(3, 3, RED).unwrap();
        let grass = PixelBuffer::filled(3, 3, GREEN).unwrap();
        let p = terrain_palette(BLUE, [&texture, &grass]);
        assert_eq!(p.colors(), &[BLUE, RED, GREEN]);
    }

    #[test]
    fn terrain_palette_does_not_duplicate_background() {
        let texture = PixelBuffer::filled(3, 3, BLUE).unwrap();
        let p = terrain_palette(BLUE, [&texture]);
        assert_eq!(p.len(), 1);
    }

    #[test]
    fn deserializing_deduplicates() {
        let p: ColorPalette =
            serde_json::from_str(r##"["#ff0000", [255, 0, 0, 0], "#00ff00"]"##).unwrap();
        assert_eq!(p.colors(), &[RED, GREEN]);
    }

    #[test]
    fn serializes_as_plain_list() {
        let p = ColorPalette::from_colors([RED, Color::TRANSPARENT]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r##"["#ff0000",[0,0,0,0]]"##);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn color() -> impl Strategy<Value = Color> {
            (0u8..4, 0u8..4, 0u8..4, any::<u8>())
                .prop_map(|(r, g, b, a)| Color::rgba(r * 60, g * 60, b * 60, a))
        }

        proptest! {
            #[test]
            fn entries_stay_rgb_unique(
                adds in proptest::collection::vec(color(), 0..64),
                firsts in proptest::collection::vec(color(), 0..8),
            ) {
                let mut p = ColorPalette::new();
                for c in adds {
                    p.add_if_absent(c);
                }
                for c in firsts {
                    p.place_first(c, false);
                }
                let colors = p.colors();
                for i in 0..colors.len() {
                    for j in (i + 1)..colors.len() {
                        if colors[i] == Color::TRANSPARENT || colors[j] == Color::TRANSPARENT {
                            continue;
                        }
                        prop_assert!(
                            !colors[i].rgb_eq(colors[j]),
                            "duplicate rgb at {} and {}: {:?}", i, j, colors[i]
                        );
                    }
                }
            }

            #[test]
            fn place_first_always_lands_at_index_zero(
                adds in proptest::collection::vec(color(), 0..32),
                first in color(),
            ) {
                let mut p = ColorPalette::from_colors(adds);
                p.place_first(first, false);
                prop_assert!(p.get(0).is_some_and(|c| c.rgb_eq(first)));
            }
        }
    }
}
