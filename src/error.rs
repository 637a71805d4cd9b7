//! Error types for the alpha-fill crate.

/// Errors that can occur during transparency detection and fill processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Buffer dimensions disagree with the byte length, or a dimension is zero.
    #[error("invalid pixel buffer: {width}x{height} with {len} data bytes")]
    InvalidBuffer {
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
        /// Byte length of the backing data (must be `width * height * 4`).
        len: usize,
    },

    /// A fill color string is not six hex digits with an optional leading `#`.
    #[error("invalid fill color {input:?}: expected RRGGBB hex, leading # optional")]
    InvalidColor {
        /// The rejected input string.
        input: String,
    },

    /// A supplied pixel coordinate lies outside the buffer.
    #[error("pixel ({x},{y}) out of bounds for {width}x{height} buffer")]
    PixelOutOfBounds {
        /// Column of the rejected coordinate.
        x: u32,
        /// Row of the rejected coordinate.
        y: u32,
        /// Buffer width in pixels.
        width: u32,
        /// Buffer height in pixels.
        height: u32,
    },

    /// A transparency mask does not match the buffer it is applied to.
    #[error("mask length {len} does not match pixel count {expected}")]
    MaskMismatch {
        /// Length of the supplied mask.
        len: usize,
        /// Expected number of entries, one per pixel.
        expected: usize,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred during image processing (load, save, encode).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
