//! Dimension normalizer: pads an image to valid map dimensions.
//!
//! Map images must be at least [`MIN_MAP_WIDTH`] x [`MIN_MAP_HEIGHT`] and have
//! both dimensions divisible by 8. Content is centered horizontally and
//! aligned to the bottom edge; new pixels take the fill color.

use crate::color::Color;
use crate::error::TexturizeError;
use crate::pixel::PixelBuffer;

pub const MIN_MAP_WIDTH: usize = 640;
pub const MIN_MAP_HEIGHT: usize = 32;

/// Smallest multiple of 8 that is `>= n`.
pub fn next_multiple_of_8(n: usize) -> usize {
    n.div_ceil(8) * 8
}

/// Target dimensions for a `width x height` image.
pub fn normalized_dimensions(width: usize, height: usize) -> (usize, usize) {
    let w = if width > MIN_MAP_WIDTH {
        next_multiple_of_8(width)
    } else {
        MIN_MAP_WIDTH
    };
    let h = if height > MIN_MAP_HEIGHT {
        next_multiple_of_8(height)
    } else {
        MIN_MAP_HEIGHT
    };
    (w, h)
}

/// Returns `image` padded to [`normalized_dimensions`], border filled with `fill`.
pub fn resize(image: &PixelBuffer, fill: Color) -> Result<PixelBuffer, TexturizeError> {
    let (width, height) = normalized_dimensions(image.width(), image.height());
    let mut out = PixelBuffer::filled(width, height, fill)?;
    let dx = (width - image.width()) / 2;
    let dy = height - image.height();
    out.blit(image, dx, dy)?;
    log::debug!(
        "resized {}x{} to {width}x{height} (offset {dx}, {dy})",
        image.width(),
        image.height()
    );
    Ok(out)
}
