//! Fill compositing for transparent pixels.
//!
//! A fill pass composites the original pixel over the fill color:
//! `channel = round(original * alpha/255 + fill * (1 - alpha/255))`
//!
//! Fully transparent pixels take the fill color outright, opaque pixels are
//! never altered, and every filled pixel leaves with alpha 255.

use crate::buffer::PixelBuffer;
use crate::detection::TransparentPixel;
use crate::error::{Error, Result};

/// An opaque RGB fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// White, the default fill color.
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Format as a lowercase `#rrggbb` string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a `#rrggbb` hex color. The leading `#` is optional, hex digits are
/// case-insensitive.
///
/// # Errors
///
/// Returns [`Error::InvalidColor`] unless the input is exactly six hex digits
/// after the optional `#`.
pub fn parse_hex(input: &str) -> Result<Rgb> {
    let digits = input.strip_prefix('#').unwrap_or(input);
    // the ASCII check also guarantees the byte slicing below is char-safe
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidColor {
            input: input.to_string(),
        });
    }

    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidColor {
            input: input.to_string(),
        })
    };

    Ok(Rgb {
        r: channel(0)?,
        g: channel(2)?,
        b: channel(4)?,
    })
}

/// Blend two colors: `round(fg * alpha + bg * (1 - alpha))` per channel.
///
/// `alpha` is the foreground weight in `0.0..=1.0`; the result is clamped to
/// the byte range.
#[must_use]
pub fn blend_colors(fg: Rgb, bg: Rgb, alpha: f32) -> Rgb {
    Rgb {
        r: blend_channel(fg.r, bg.r, alpha),
        g: blend_channel(fg.g, bg.g, alpha),
        b: blend_channel(fg.b, bg.b, alpha),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_channel(fg: u8, bg: u8, alpha: f32) -> u8 {
    (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// The per-pixel fill rule. `None` means the pixel stays untouched.
fn fill_pixel(rgb: [u8; 3], alpha: u8, fill: Rgb) -> Option<[u8; 4]> {
    match alpha {
        255 => None,
        0 => Some([fill.r, fill.g, fill.b, 255]),
        _ => {
            let ratio = f32::from(alpha) / 255.0;
            let original = Rgb {
                r: rgb[0],
                g: rgb[1],
                b: rgb[2],
            };
            let Rgb { r, g, b } = blend_colors(original, fill, ratio);
            Some([r, g, b, 255])
        }
    }
}

/// Fill transparent pixels with a solid color, returning a new buffer.
///
/// With `Some(pixels)` non-empty, only the listed coordinates are touched and
/// each entry's recorded alpha drives the per-pixel rule; this is the path
/// detection results take, so contour-mode exclusions survive. With `None` or
/// an empty slice, every pixel of the buffer is processed using its own alpha
/// byte.
///
/// Per pixel: alpha 0 becomes the fill color outright, alpha 255 stays
/// untouched, anything in between blends the original over the fill weighted
/// by `alpha / 255`. Filled pixels leave with alpha 255.
///
/// # Errors
///
/// Returns [`Error::PixelOutOfBounds`] if any listed coordinate lies outside
/// the buffer. Coordinates are validated before anything is written.
pub fn fill_transparent_pixels(
    buffer: &PixelBuffer,
    color: Rgb,
    pixels: Option<&[TransparentPixel]>,
) -> Result<PixelBuffer> {
    match pixels {
        Some(list) if !list.is_empty() => fill_listed(buffer, color, list),
        _ => Ok(fill_everywhere(buffer, color)),
    }
}

fn fill_listed(
    buffer: &PixelBuffer,
    color: Rgb,
    pixels: &[TransparentPixel],
) -> Result<PixelBuffer> {
    let width = buffer.width();
    let height = buffer.height();
    for p in pixels {
        if p.x >= width || p.y >= height {
            return Err(Error::PixelOutOfBounds {
                x: p.x,
                y: p.y,
                width,
                height,
            });
        }
    }

    let mut out = buffer.clone();
    for p in pixels {
        // channels are read from the output copy, so duplicate coordinates
        // in the list compound
        let [r, g, b, _] = out.pixel(p.x, p.y);
        if let Some(filled) = fill_pixel([r, g, b], p.alpha, color) {
            out.set_pixel(p.x, p.y, filled);
        }
    }
    Ok(out)
}

fn fill_everywhere(buffer: &PixelBuffer, color: Rgb) -> PixelBuffer {
    let mut out = buffer.clone();
    for chunk in out.as_raw_mut().chunks_exact_mut(4) {
        let alpha = chunk[3];
        if let Some(filled) = fill_pixel([chunk[0], chunk[1], chunk[2]], alpha, color) {
            chunk.copy_from_slice(&filled);
        }
    }
    out
}

/// Composite a fill color into the pixels a mask flags, returning a new
/// buffer.
///
/// The mask holds one byte per pixel in row-major order, as produced by
/// [`crate::detection::transparency_mask`]. Pixels whose mask byte is `1` go
/// through the same per-pixel rule as [`fill_transparent_pixels`]; any other
/// mask value leaves the pixel untouched, as does alpha 255.
///
/// # Errors
///
/// Returns [`Error::MaskMismatch`] if the mask length differs from the
/// buffer's pixel count.
pub fn preview_with_mask(buffer: &PixelBuffer, color: Rgb, mask: &[u8]) -> Result<PixelBuffer> {
    let expected = buffer.pixel_count();
    if mask.len() != expected {
        return Err(Error::MaskMismatch {
            len: mask.len(),
            expected,
        });
    }

    let mut out = buffer.clone();
    for (chunk, &flag) in out.as_raw_mut().chunks_exact_mut(4).zip(mask) {
        if flag != 1 {
            continue;
        }
        let alpha = chunk[3];
        if let Some(filled) = fill_pixel([chunk[0], chunk[1], chunk[2]], alpha, color) {
            chunk.copy_from_slice(&filled);
        }
    }
    Ok(out)
}
