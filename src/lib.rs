//! Detect transparent pixels in raster images and fill them with a solid color.
//!
//! Images exported with an alpha channel often carry fully or partially
//! transparent pixels where a solid background is wanted. This crate
//! classifies pixels by their alpha byte, optionally restricts the selection
//! to pixels enclosed by the opaque contour of the image, and composites a
//! fill color into the selection with alpha-weighted blending. Originals are
//! never modified: every operation returns a fresh buffer.
//!
//! # Quick Start
//!
//! ```no_run
//! use alpha_fill::{fill_transparent_pixels, parse_hex, PixelBuffer};
//!
//! let img = image::open("logo.png").unwrap().to_rgba8();
//! let buffer = PixelBuffer::from_rgba_image(img).expect("empty image");
//! let color = parse_hex("#ffffff").unwrap();
//! let filled = fill_transparent_pixels(&buffer, color, None).unwrap();
//! filled.to_rgba_image().save("logo_filled.png").unwrap();
//! ```
//!
//! # Detection modes
//!
//! [`DetectionMode::All`] flags every pixel with alpha below 255.
//! [`DetectionMode::Contour`] additionally requires the pixel to sit inside
//! the opaque contour of the image, so background around a figure survives
//! while holes and anti-aliased edges inside it get filled.
//!
//! ```no_run
//! use alpha_fill::{DetectionMode, FillSession, PixelBuffer, Rgb};
//!
//! let img = image::open("sticker.webp").unwrap().to_rgba8();
//! let buffer = PixelBuffer::from_rgba_image(img).expect("empty image");
//! let session = FillSession::new(buffer, DetectionMode::Contour);
//! println!(
//!     "{} of {} pixels flagged",
//!     session.transparent_pixels().len(),
//!     session.stats().total_pixels
//! );
//! let filled = session.recolor(Rgb::WHITE).unwrap();
//! filled.to_rgba_image().save("sticker_filled.png").unwrap();
//! ```

#![deny(missing_docs)]

pub mod buffer;
pub mod detection;
mod engine;
pub mod error;
pub mod fill;

pub use buffer::PixelBuffer;
pub use detection::{
    detect_transparent_pixels, has_transparency, transparency_mask, transparency_stats,
    visualize_transparency, ContourBounds, DetectionMode, ImageContour, TransparencyStats,
    TransparentPixel,
};
pub use engine::{
    default_output_path, is_supported_image, process_directory, process_file, save_image,
    FillOptions, FillOutcome, FillSession,
};
pub use error::{Error, Result};
pub use fill::{blend_colors, fill_transparent_pixels, parse_hex, preview_with_mask, Rgb};
