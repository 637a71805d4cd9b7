//! Transparent-pixel classification.
//!
//! Two detection modes select the pixels a fill pass will touch:
//!
//! 1. **All**: every pixel whose alpha byte is below 255.
//! 2. **Contour**: additionally requires the pixel to sit inside the opaque
//!    contour of the image, a padded bounding box of opaque content plus a
//!    local opacity neighborhood test.
//!
//! The contour test is a heuristic for "close to the figure's body", not
//! geometric containment: transparent holes, notches and anti-aliased edges
//! near opaque content count as inside, while isolated transparent pixels far
//! from any content do not. Transparent islands more than the neighborhood
//! radius away from every opaque pixel are excluded even when opaque content
//! surrounds them at a distance.

use crate::buffer::PixelBuffer;

/// Alpha value above which a pixel counts as opaque for the contour mask.
/// Semi-transparent pixels past the midpoint are treated as body, not
/// background. Distinct from the `< 255` transparency threshold.
const OPACITY_THRESHOLD: u8 = 128;

/// Chebyshev radius of the neighborhood searched for opaque pixels by the
/// contour containment test (an 11x11 window, clipped at buffer edges).
const NEIGHBORHOOD_RADIUS: u32 = 5;

/// Minimum bounding-box padding in pixels.
const MIN_PADDING: f64 = 2.0;

/// Bounding-box padding as a fraction of the smaller image dimension.
const PADDING_RATIO: f64 = 0.02;

/// Checkerboard cell edge in pixels for the transparency visualization.
const CHECKER_CELL: u32 = 8;
/// Checkerboard gray for even cells.
const CHECKER_EVEN: u8 = 200;
/// Checkerboard gray for odd cells.
const CHECKER_ODD: u8 = 240;

/// How transparent pixels are selected for filling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Every pixel with alpha below 255 qualifies.
    #[default]
    All,
    /// Only pixels inside the opaque contour of the image qualify.
    Contour,
}

/// A pixel flagged by a detection pass.
///
/// Coordinates index the buffer the pass ran over; `alpha` is the pixel's
/// alpha byte at detection time and is always below 255. Entries are
/// invalidated by any change to the source buffer or the detection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransparentPixel {
    /// Column, `0..width`.
    pub x: u32,
    /// Row, `0..height`.
    pub y: u32,
    /// Alpha byte at detection time.
    pub alpha: u8,
}

/// Aggregate transparency counts for one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TransparencyStats {
    /// Total pixels in the buffer.
    pub total_pixels: usize,
    /// Pixels with alpha below 255.
    pub transparent_pixels: usize,
    /// Pixels with alpha in `1..=254`.
    pub semi_transparent_pixels: usize,
    /// Pixels with alpha 0.
    pub fully_transparent_pixels: usize,
    /// Share of transparent pixels, `0.0..=100.0`.
    pub transparent_percentage: f64,
    /// Whether any pixel has alpha below 255.
    pub has_transparency: bool,
}

/// Integer bounding box of the opaque region after padding and clamping.
///
/// The padding is fractional (`max(2, 0.02 * min(width, height))`); the
/// stored integer bounds are its ceiling on the low edges and floor on the
/// high edges, so integer-coordinate containment is exactly the comparison
/// against the fractional box. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContourBounds {
    /// Leftmost included column.
    pub min_x: u32,
    /// Rightmost included column.
    pub max_x: u32,
    /// Topmost included row.
    pub min_y: u32,
    /// Bottommost included row.
    pub max_y: u32,
}

/// Opaque contour of an image: the padded bounding box plus the opacity mask
/// the neighborhood test reads.
///
/// Produced by [`find_contour`], consumed through [`ImageContour::contains`].
#[derive(Debug, Clone)]
pub struct ImageContour {
    /// Padded bounding box of opaque pixels; `None` when the image has no
    /// opaque pixel, in which case every containment test is false.
    pub bounds: Option<ContourBounds>,
    width: u32,
    height: u32,
    mask: Vec<u8>,
}

impl ImageContour {
    /// Whether `(x, y)` lies inside the contour.
    ///
    /// Inside means: within the padded bounding box AND at least one pixel of
    /// the surrounding 11x11 neighborhood (clipped at buffer edges) is opaque.
    /// Without the neighborhood test every pixel of the padded box would
    /// qualify, including background far from the figure.
    #[must_use]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !(bounds.min_x..=bounds.max_x).contains(&x)
            || !(bounds.min_y..=bounds.max_y).contains(&y)
        {
            return false;
        }

        let x0 = x.saturating_sub(NEIGHBORHOOD_RADIUS);
        let y0 = y.saturating_sub(NEIGHBORHOOD_RADIUS);
        let x1 = x.saturating_add(NEIGHBORHOOD_RADIUS).min(self.width - 1);
        let y1 = y.saturating_add(NEIGHBORHOOD_RADIUS).min(self.height - 1);

        (y0..=y1).any(|ny| {
            let row = ny as usize * self.width as usize;
            self.mask[row + x0 as usize..=row + x1 as usize]
                .iter()
                .any(|&m| m == 1)
        })
    }
}

/// Binary opacity mask: one byte per pixel, `1` where `alpha > 128`.
///
/// This is the mask the contour containment test reads. Not to be confused
/// with [`transparency_mask`], whose threshold is `alpha < 255`.
#[must_use]
pub fn opacity_mask(buffer: &PixelBuffer) -> Vec<u8> {
    buffer
        .alphas()
        .map(|a| u8::from(a > OPACITY_THRESHOLD))
        .collect()
}

/// Binary transparency mask: one byte per pixel, `1` where `alpha < 255`.
///
/// Input for mask-driven preview compositing. Not to be confused with
/// [`opacity_mask`], whose threshold is `alpha > 128`.
#[must_use]
pub fn transparency_mask(buffer: &PixelBuffer) -> Vec<u8> {
    buffer.alphas().map(|a| u8::from(a < 255)).collect()
}

/// Locate the opaque contour of the image.
///
/// Builds the opacity mask, computes the bounding box of opaque pixels and
/// expands it by `max(2, 0.02 * min(width, height))` pixels, clamped to the
/// buffer edges. The padding tolerates opaque content close to the border.
#[must_use]
pub fn find_contour(buffer: &PixelBuffer) -> ImageContour {
    let mask = opacity_mask(buffer);
    let width = buffer.width();
    let height = buffer.height();

    let mut bbox: Option<(u32, u32, u32, u32)> = None;
    for y in 0..height {
        let row = y as usize * width as usize;
        for x in 0..width {
            if mask[row + x as usize] == 1 {
                bbox = Some(match bbox {
                    None => (x, x, y, y),
                    Some((x0, x1, y0, y1)) => (x0.min(x), x1.max(x), y0.min(y), y1.max(y)),
                });
            }
        }
    }

    let bounds = bbox
        .map(|(min_x, max_x, min_y, max_y)| pad_bounds(min_x, max_x, min_y, max_y, width, height));

    ImageContour {
        bounds,
        width,
        height,
        mask,
    }
}

fn pad_bounds(
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
    width: u32,
    height: u32,
) -> ContourBounds {
    let padding = (f64::from(width.min(height)) * PADDING_RATIO).max(MIN_PADDING);
    ContourBounds {
        min_x: pad_low(min_x, padding),
        max_x: pad_high(max_x, padding, width),
        min_y: pad_low(min_y, padding),
        max_y: pad_high(max_y, padding, height),
    }
}

/// Low edge expanded by the fractional padding: integer `x` passes
/// `x >= edge - padding` iff `x >= ceil(edge - padding)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pad_low(edge: u32, padding: f64) -> u32 {
    (f64::from(edge) - padding).ceil().max(0.0) as u32
}

/// High edge expanded by the fractional padding: integer `x` passes
/// `x <= edge + padding` iff `x <= floor(edge + padding)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pad_high(edge: u32, padding: f64, size: u32) -> u32 {
    (f64::from(edge) + padding).floor().min(f64::from(size - 1)) as u32
}

/// Detect transparent pixels under the given mode.
///
/// Pixels are enumerated in row-major scan order (`y` outer, `x` inner). In
/// [`DetectionMode::Contour`] the result is always a subset of what
/// [`DetectionMode::All`] yields for the same buffer.
#[must_use]
pub fn detect_transparent_pixels(
    buffer: &PixelBuffer,
    mode: DetectionMode,
) -> Vec<TransparentPixel> {
    match mode {
        DetectionMode::All => detect_all(buffer),
        DetectionMode::Contour => detect_contour(buffer),
    }
}

fn detect_all(buffer: &PixelBuffer) -> Vec<TransparentPixel> {
    let mut flagged = Vec::new();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let alpha = buffer.alpha(x, y);
            if alpha < 255 {
                flagged.push(TransparentPixel { x, y, alpha });
            }
        }
    }
    flagged
}

fn detect_contour(buffer: &PixelBuffer) -> Vec<TransparentPixel> {
    let contour = find_contour(buffer);
    let mut flagged = Vec::new();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let alpha = buffer.alpha(x, y);
            if alpha < 255 && contour.contains(x, y) {
                flagged.push(TransparentPixel { x, y, alpha });
            }
        }
    }
    flagged
}

/// Whether the buffer has any transparent pixel under the given mode.
///
/// For [`DetectionMode::All`] this scans the alpha channel only and returns
/// on the first sub-255 byte. For [`DetectionMode::Contour`] it stops at the
/// first pixel the contour test accepts, which is equivalent to running the
/// full detection and checking for a non-empty result.
#[must_use]
pub fn has_transparency(buffer: &PixelBuffer, mode: DetectionMode) -> bool {
    match mode {
        DetectionMode::All => buffer.alphas().any(|a| a < 255),
        DetectionMode::Contour => {
            let contour = find_contour(buffer);
            if contour.bounds.is_none() {
                return false;
            }
            (0..buffer.height()).any(|y| {
                (0..buffer.width())
                    .any(|x| buffer.alpha(x, y) < 255 && contour.contains(x, y))
            })
        }
    }
}

/// Compute aggregate transparency counts in a single linear pass.
#[must_use]
pub fn transparency_stats(buffer: &PixelBuffer) -> TransparencyStats {
    let mut transparent = 0usize;
    let mut semi = 0usize;
    let mut fully = 0usize;
    for alpha in buffer.alphas() {
        if alpha < 255 {
            transparent += 1;
            if alpha == 0 {
                fully += 1;
            } else {
                semi += 1;
            }
        }
    }

    let total = buffer.pixel_count();
    // total is never zero: buffer construction rejects empty dimensions.
    #[allow(clippy::cast_precision_loss)]
    let percentage = transparent as f64 / total as f64 * 100.0;

    TransparencyStats {
        total_pixels: total,
        transparent_pixels: transparent,
        semi_transparent_pixels: semi,
        fully_transparent_pixels: fully,
        transparent_percentage: percentage,
        has_transparency: transparent > 0,
    }
}

/// Render transparency visibly.
///
/// Fully transparent pixels become an 8x8 checkerboard of grays (200 on even
/// cells, 240 on odd, keyed by `(x / 8 + y / 8) % 2`) with alpha forced to
/// 255. Semi-transparent and opaque pixels are copied verbatim, alpha
/// included.
#[must_use]
pub fn visualize_transparency(buffer: &PixelBuffer) -> PixelBuffer {
    let mut out = buffer.clone();
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            if buffer.alpha(x, y) == 0 {
                let even = (x / CHECKER_CELL + y / CHECKER_CELL) % 2 == 0;
                let gray = if even { CHECKER_EVEN } else { CHECKER_ODD };
                out.set_pixel(x, y, [gray, gray, gray, 255]);
            }
        }
    }
    out
}
