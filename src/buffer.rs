//! RGBA pixel buffer shared by detection and fill.
//!
//! The buffer layout is the crate's one format contract: 8-bit RGBA,
//! row-major, top-left origin, four bytes per pixel. Dimensions and byte
//! length are validated at construction, so downstream passes can index
//! without re-checking. Nothing mutates a buffer in place across the public
//! API: every transform takes `&PixelBuffer` and returns a fresh one, and
//! `clone()` is the deep-copy snapshot that keeps a pristine original around
//! for repeated recolors.

use image::RgbaImage;

use crate::error::{Error, Result};

/// Bytes per pixel in the RGBA8888 layout.
pub const BYTES_PER_PIXEL: usize = 4;

/// An owned RGBA8888 pixel buffer, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

/// Required byte length for the given dimensions, `None` on overflow.
fn expected_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(BYTES_PER_PIXEL))
}

impl PixelBuffer {
    /// Create a fully transparent (all-zero) buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuffer`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        match expected_len(width, height) {
            Some(len) if width > 0 && height > 0 => Ok(Self {
                width,
                height,
                data: vec![0; len],
            }),
            _ => Err(Error::InvalidBuffer {
                width,
                height,
                len: 0,
            }),
        }
    }

    /// Wrap raw interleaved RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuffer`] if either dimension is zero or
    /// `data.len()` is not exactly `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || expected_len(width, height) != Some(data.len()) {
            return Err(Error::InvalidBuffer {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Take ownership of a decoded [`image::RgbaImage`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuffer`] for zero-sized images.
    pub fn from_rgba_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_raw(width, height, image.into_raw())
    }

    /// Convert to an [`image::RgbaImage`] for encoding.
    ///
    /// # Panics
    ///
    /// Cannot actually panic: the length invariant is established at
    /// construction.
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .expect("buffer length matches dimensions")
    }

    /// Buffer width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels (`width * height`, never zero).
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The raw interleaved RGBA bytes, row-major.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer, returning the raw bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Byte offset of the pixel at `(x, y)`.
    ///
    /// Asserts bounds: with `x >= width` the row-major formula would land on
    /// a valid byte of the wrong row.
    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x},{y}) out of bounds for {}x{} buffer",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }

    /// RGBA channels of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Alpha byte of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the buffer.
    #[inline]
    #[must_use]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.data[self.offset(x, y) + 3]
    }

    /// Iterate over alpha bytes in row-major order.
    pub fn alphas(&self) -> impl Iterator<Item = u8> + '_ {
        self.data.iter().skip(3).step_by(BYTES_PER_PIXEL).copied()
    }

    /// Overwrite the pixel at `(x, y)`. Crate-internal: public callers only
    /// ever see freshly built buffers.
    #[inline]
    pub(crate) fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = self.offset(x, y);
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }

    /// Mutable view of the raw bytes for whole-buffer passes.
    #[inline]
    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_fully_transparent() {
        let buf = PixelBuffer::new(4, 3).unwrap();
        assert_eq!(buf.width(), 4);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.pixel_count(), 12);
        assert!(buf.alphas().all(|a| a == 0));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(Error::InvalidBuffer { width: 0, .. })
        ));
        assert!(matches!(
            PixelBuffer::from_raw(5, 0, vec![]),
            Err(Error::InvalidBuffer { height: 0, .. })
        ));
    }

    #[test]
    fn mismatched_length_is_rejected() {
        // 2x2 needs 16 bytes; 15 is also not a multiple of 4
        let err = PixelBuffer::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidBuffer { len: 15, .. }));

        // right multiple of 4, wrong pixel count
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 12]).is_err());
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn pixel_accessors_use_row_major_layout() {
        let mut data = vec![0u8; 2 * 2 * 4];
        data[0..4].copy_from_slice(&[1, 2, 3, 4]); // (0,0)
        data[4..8].copy_from_slice(&[5, 6, 7, 8]); // (1,0)
        data[8..12].copy_from_slice(&[9, 10, 11, 12]); // (0,1)
        data[12..16].copy_from_slice(&[13, 14, 15, 16]); // (1,1)
        let buf = PixelBuffer::from_raw(2, 2, data).unwrap();

        assert_eq!(buf.pixel(0, 0), [1, 2, 3, 4]);
        assert_eq!(buf.pixel(1, 0), [5, 6, 7, 8]);
        assert_eq!(buf.pixel(0, 1), [9, 10, 11, 12]);
        assert_eq!(buf.alpha(1, 1), 16);
        assert_eq!(buf.alphas().collect::<Vec<_>>(), vec![4, 8, 12, 16]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn pixel_access_beyond_width_panics() {
        let buf = PixelBuffer::new(2, 2).unwrap();
        let _ = buf.pixel(2, 0);
    }

    #[test]
    fn clone_is_an_independent_snapshot() {
        let original = PixelBuffer::new(2, 1).unwrap();
        let mut copy = original.clone();
        copy.set_pixel(0, 0, [9, 9, 9, 255]);

        assert_eq!(original.pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(copy.pixel(0, 0), [9, 9, 9, 255]);
        assert_ne!(original, copy);
    }

    #[test]
    fn rgba_image_round_trip() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, image::Rgba([10, 20, 30, 40]));
        let buf = PixelBuffer::from_rgba_image(img).unwrap();

        assert_eq!(buf.pixel(2, 1), [10, 20, 30, 40]);
        let back = buf.to_rgba_image();
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30, 40]);
    }
}
