//! Failures of a CLI run and the exit code each one ends the process with.
//!
//! | code | meaning |
//! |---|---|
//! | 0 | success |
//! | 2 | argument parse error (reported by clap) |
//! | 10 | rendering failed (bad texture or grass assets, bad dimensions) |
//! | 11 | an image, palette or config file could not be read or written |
//! | 12 | unknown terrain, missing palette, bad color or bad config file |
//! | 13 | JSON output could not be produced |
//! | 14 | indexed export failed (palette over 256 entries, malformed PNG) |

use thiserror::Error;
use wa_texturizer_core::TexturizeError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("render failed: {0}")]
    Render(TexturizeError),

    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Input(String),

    #[error("cannot produce JSON output: {0}")]
    Serialization(String),

    #[error("indexed export failed: {0}")]
    Export(TexturizeError),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Render(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
            CliError::Export(_) => 14,
        }
    }
}

impl From<TexturizeError> for CliError {
    fn from(e: TexturizeError) -> Self {
        use TexturizeError as E;
        match e {
            E::Io(msg) => CliError::Io(msg),
            E::InvalidColor(_) | E::UnknownTerrain(_) | E::MissingPalette(_) => {
                CliError::Input(e.to_string())
            }
            E::PaletteOverflow(_) | E::Format(_) => CliError::Export(e),
            E::InvalidDimensions | E::InvalidInput(_) | E::OutOfBounds { .. } => {
                CliError::Render(e)
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
