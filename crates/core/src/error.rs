//! Error types for the texturizer core.

use thiserror::Error;

/// Errors produced by texturizing, palette and export operations.
#[derive(Debug, Error)]
pub enum TexturizeError {
    /// Width or height was zero, or `width * height * 4` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A precondition on the inputs of an operation was violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A pixel or row access fell outside the buffer.
    #[error("index ({x}, {y}) out of bounds for buffer of size ({width}, {height})")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// No terrain is registered under the given name or index.
    #[error("unknown terrain: {0}")]
    UnknownTerrain(String),

    /// A palette was requested for a terrain that has none registered.
    #[error("no precomputed palette registered for terrain '{0}'")]
    MissingPalette(String),

    /// An indexed image can address at most 256 palette entries.
    #[error("palette has {0} colors, indexed output supports at most 256")]
    PaletteOverflow(usize),

    /// The bytes are not a well-formed PNG chunk sequence.
    #[error("malformed png: {0}")]
    Format(String),

    /// A file could not be read or written.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = TexturizeError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn out_of_bounds_includes_coordinates_and_dimensions() {
        let err = TexturizeError::OutOfBounds {
            x: 10,
            y: 20,
            width: 8,
            height: 9,
        };
        let msg = err.to_string();
        assert!(msg.contains("10"), "missing x in: {msg}");
        assert!(msg.contains("20"), "missing y in: {msg}");
        assert!(msg.contains('8'), "missing width in: {msg}");
        assert!(msg.contains('9'), "missing height in: {msg}");
    }

    #[test]
    fn missing_palette_names_the_terrain() {
        let msg = TexturizeError::MissingPalette("Cheese".into()).to_string();
        assert!(msg.contains("Cheese"), "missing terrain in: {msg}");
    }

    #[test]
    fn palette_overflow_reports_the_count() {
        let msg = TexturizeError::PaletteOverflow(300).to_string();
        assert!(msg.contains("300"), "missing count in: {msg}");
    }

    #[test]
    fn texturize_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TexturizeError>();
    }

    #[test]
    fn texturize_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<TexturizeError>();
    }
}
