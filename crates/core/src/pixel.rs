//! Rectangular RGBA8 pixel buffer with bounds-checked accessors.
//!
//! Pixels are stored row-major, four bytes per pixel, so a buffer converts to
//! and from decoder output without copying. Every accessor validates its
//! coordinates and reports `TexturizeError::OutOfBounds` instead of touching a
//! neighbouring pixel. Reads always return copies, never views into the live
//! buffer.

use crate::color::Color;
use crate::error::TexturizeError;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// A `width x height` grid of [`Color`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

fn byte_len(width: usize, height: usize) -> Result<usize, TexturizeError> {
    if width == 0 || height == 0 {
        return Err(TexturizeError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(TexturizeError::InvalidDimensions)
}

impl PixelBuffer {
    /// Creates a fully transparent buffer.
    ///
    /// Returns `TexturizeError::InvalidDimensions` if either dimension is zero
    /// or the byte length overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, TexturizeError> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Creates a buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, TexturizeError> {
        let len = byte_len(width, height)?;
        let data = color
            .to_array()
            .iter()
            .copied()
            .cycle()
            .take(len)
            .collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps raw RGBA8 bytes, validating that `data.len() == width * height * 4`.
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, TexturizeError> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(TexturizeError::InvalidInput(format!(
                "expected {expected} bytes for a {width}x{height} RGBA buffer, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Buffer width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the row-major RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the buffer and returns its RGBA bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Iterates over every pixel in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Color> + '_ {
        self.data
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
    }

    fn out_of_bounds(&self, x: usize, y: usize) -> TexturizeError {
        TexturizeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// Byte offset of pixel `(x, y)`.
    fn offset(&self, x: usize, y: usize) -> Result<usize, TexturizeError> {
        if x >= self.width || y >= self.height {
            return Err(self.out_of_bounds(x, y));
        }
        Ok((y * self.width + x) * BYTES_PER_PIXEL)
    }

    /// Reads the pixel at `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Result<Color, TexturizeError> {
        let i = self.offset(x, y)?;
        let px = &self.data[i..i + BYTES_PER_PIXEL];
        Ok(Color::rgba(px[0], px[1], px[2], px[3]))
    }

    /// Reads the pixel at `(x mod width, y mod height)`; used for tiling.
    pub fn get_wrapped(&self, x: usize, y: usize) -> Color {
        let i = ((y % self.height) * self.width + x % self.width) * BYTES_PER_PIXEL;
        let px = &self.data[i..i + BYTES_PER_PIXEL];
        Color::rgba(px[0], px[1], px[2], px[3])
    }

    /// Writes the pixel at `(x, y)`.
    pub fn set(&mut self, x: usize, y: usize, color: Color) -> Result<(), TexturizeError> {
        let i = self.offset(x, y)?;
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// Copies scanline `y` out of the buffer.
    pub fn row(&self, y: usize) -> Result<Vec<Color>, TexturizeError> {
        if y >= self.height {
            return Err(self.out_of_bounds(0, y));
        }
        let stride = self.width * BYTES_PER_PIXEL;
        Ok(self.data[y * stride..(y + 1) * stride]
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
            .collect())
    }

    /// Writes `row` into `repeat` consecutive scanlines starting at `y`.
    ///
    /// The row must be exactly `width` pixels long and every destination
    /// scanline must exist; nothing is written otherwise.
    pub fn set_row(&mut self, y: usize, row: &[Color], repeat: usize) -> Result<(), TexturizeError> {
        if row.len() != self.width {
            return Err(TexturizeError::InvalidInput(format!(
                "row has {} pixels, buffer is {} wide",
                row.len(),
                self.width
            )));
        }
        let end = y.checked_add(repeat).ok_or_else(|| self.out_of_bounds(0, y))?;
        if end > self.height {
            return Err(self.out_of_bounds(0, end - 1));
        }
        let bytes: Vec<u8> = row.iter().flat_map(|c| c.to_array()).collect();
        let stride = bytes.len();
        for dst in y..end {
            self.data[dst * stride..(dst + 1) * stride].copy_from_slice(&bytes);
        }
        Ok(())
    }

    /// Copies the `width x height` rectangle whose top-left corner is `(x, y)`.
    pub fn sub_image(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> Result<PixelBuffer, TexturizeError> {
        let len = byte_len(width, height)?;
        let right = x.checked_add(width).filter(|&r| r <= self.width);
        let bottom = y.checked_add(height).filter(|&b| b <= self.height);
        let (Some(_), Some(_)) = (right, bottom) else {
            return Err(self.out_of_bounds(
                x.saturating_add(width).saturating_sub(1),
                y.saturating_add(height).saturating_sub(1),
            ));
        };
        let src_stride = self.width * BYTES_PER_PIXEL;
        let dst_stride = width * BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(len);
        for row in y..y + height {
            let start = row * src_stride + x * BYTES_PER_PIXEL;
            data.extend_from_slice(&self.data[start..start + dst_stride]);
        }
        Ok(PixelBuffer {
            width,
            height,
            data,
        })
    }

    /// Pastes `src` so that its top-left corner lands on `(dx, dy)`.
    ///
    /// `src` must fit entirely inside this buffer.
    pub fn blit(&mut self, src: &PixelBuffer, dx: usize, dy: usize) -> Result<(), TexturizeError> {
        let fits_x = dx.checked_add(src.width).is_some_and(|r| r <= self.width);
        let fits_y = dy.checked_add(src.height).is_some_and(|b| b <= self.height);
        if !fits_x || !fits_y {
            return Err(self.out_of_bounds(
                dx.saturating_add(src.width).saturating_sub(1),
                dy.saturating_add(src.height).saturating_sub(1),
            ));
        }
        let dst_stride = self.width * BYTES_PER_PIXEL;
        let src_stride = src.width * BYTES_PER_PIXEL;
        for (row, line) in src.data.chunks_exact(src_stride).enumerate() {
            let start = (dy + row) * dst_stride + dx * BYTES_PER_PIXEL;
            self.data[start..start + src_stride].copy_from_slice(line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        let mut buf = PixelBuffer::new(width, height).unwrap();
        for y in 0..height {
            for x in 0..width {
                buf.set(x, y, Color::rgb(x as u8, y as u8, 7)).unwrap();
            }
        }
        buf
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            PixelBuffer::new(0, 4),
            Err(TexturizeError::InvalidDimensions)
        ));
        assert!(PixelBuffer::new(4, 0).is_err());
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        assert!(PixelBuffer::new(usize::MAX, 2).is_err());
    }

    #[test]
    fn new_is_fully_transparent() {
        let buf = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(buf.data().len(), 3 * 2 * 4);
        assert!(buf.pixels().all(|c| c == Color::TRANSPARENT));
    }

    #[test]
    fn filled_sets_every_pixel() {
        let c = Color::rgba(1, 2, 3, 4);
        let buf = PixelBuffer::filled(5, 3, c).unwrap();
        assert_eq!(buf.pixels().count(), 15);
        assert!(buf.pixels().all(|p| p == c));
    }

    #[test]
    fn from_rgba_validates_length() {
        assert!(PixelBuffer::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_rgba(2, 2, vec![0; 15]),
            Err(TexturizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn get_and_set_address_row_major_bytes() {
        let mut buf = PixelBuffer::new(4, 3).unwrap();
        buf.set(2, 1, Color::rgba(9, 8, 7, 6)).unwrap();
        let i = (4 + 2) * 4;
        assert_eq!(&buf.data()[i..i + 4], &[9, 8, 7, 6]);
        assert_eq!(buf.get(2, 1).unwrap(), Color::rgba(9, 8, 7, 6));
    }

    #[test]
    fn get_out_of_range_is_an_error_not_a_neighbour() {
        let buf = gradient(4, 3);
        assert!(matches!(
            buf.get(4, 0),
            Err(TexturizeError::OutOfBounds { x: 4, y: 0, .. })
        ));
        assert!(buf.get(0, 3).is_err());
    }

    #[test]
    fn set_out_of_range_leaves_buffer_untouched() {
        let mut buf = gradient(4, 3);
        let before = buf.clone();
        assert!(buf.set(0, 3, Color::BLACK).is_err());
        assert_eq!(buf, before);
    }

    #[test]
    fn get_wrapped_tiles_in_both_axes() {
        let buf = gradient(4, 3);
        assert_eq!(buf.get_wrapped(5, 4), buf.get(1, 1).unwrap());
        assert_eq!(buf.get_wrapped(8, 6), buf.get(0, 0).unwrap());
    }

    #[test]
    fn row_copies_a_scanline() {
        let buf = gradient(4, 3);
        let row = buf.row(2).unwrap();
        assert_eq!(row.len(), 4);
        assert_eq!(row[3], Color::rgb(3, 2, 7));
        assert!(buf.row(3).is_err());
    }

    #[test]
    fn set_row_repeats_into_consecutive_rows() {
        let mut buf = gradient(4, 6);
        let row = buf.row(0).unwrap();
        buf.set_row(2, &row, 3).unwrap();
        for y in 2..5 {
            assert_eq!(buf.row(y).unwrap(), row, "row {y}");
        }
        assert_eq!(buf.get(0, 5).unwrap(), Color::rgb(0, 5, 7));
    }

    #[test]
    fn set_row_rejects_overrun_without_partial_write() {
        let mut buf = gradient(4, 3);
        let before = buf.clone();
        let row = vec![Color::BLACK; 4];
        assert!(matches!(
            buf.set_row(1, &row, 3),
            Err(TexturizeError::OutOfBounds { .. })
        ));
        assert_eq!(buf, before);
    }

    #[test]
    fn set_row_rejects_wrong_row_length() {
        let mut buf = gradient(4, 3);
        assert!(matches!(
            buf.set_row(0, &[Color::BLACK; 3], 1),
            Err(TexturizeError::InvalidInput(_))
        ));
    }

    #[test]
    fn sub_image_copies_rectangle() {
        let buf = gradient(6, 5);
        let sub = buf.sub_image(2, 1, 3, 2).unwrap();
        assert_eq!((sub.width(), sub.height()), (3, 2));
        assert_eq!(sub.get(0, 0).unwrap(), Color::rgb(2, 1, 7));
        assert_eq!(sub.get(2, 1).unwrap(), Color::rgb(4, 2, 7));
    }

    #[test]
    fn sub_image_rejects_rectangle_past_edge() {
        let buf = gradient(6, 5);
        assert!(buf.sub_image(4, 0, 3, 1).is_err());
        assert!(buf.sub_image(0, 4, 1, 2).is_err());
        assert!(buf.sub_image(0, 0, 0, 1).is_err());
    }

    #[test]
    fn blit_pastes_at_offset() {
        let mut dst = PixelBuffer::new(5, 5).unwrap();
        let src = PixelBuffer::filled(2, 3, Color::rgb(1, 1, 1)).unwrap();
        dst.blit(&src, 3, 2).unwrap();
        assert_eq!(dst.get(3, 2).unwrap(), Color::rgb(1, 1, 1));
        assert_eq!(dst.get(4, 4).unwrap(), Color::rgb(1, 1, 1));
        assert_eq!(dst.get(2, 2).unwrap(), Color::TRANSPARENT);
        assert!(dst.blit(&src, 4, 0).is_err());
    }
}
