//! Fill pipeline: sessions, file processing, batch processing.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};

use crate::buffer::PixelBuffer;
use crate::detection::{self, DetectionMode, TransparencyStats, TransparentPixel};
use crate::error::{Error, Result};
use crate::fill::{self, Rgb};

/// Options controlling the fill pipeline.
#[derive(Debug, Clone)]
pub struct FillOptions {
    /// How transparent pixels are selected.
    pub mode: DetectionMode,
    /// Color composited into selected pixels.
    pub color: Rgb,
    /// Write the checkerboard transparency visualization instead of filling.
    pub visualize: bool,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            mode: DetectionMode::All,
            color: Rgb::WHITE,
            visualize: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct FillOutcome {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Whether the file was skipped (no transparency to fill).
    pub skipped: bool,
    /// Number of pixels the detection pass flagged.
    pub transparent_pixels: usize,
    /// Transparency stats of the decoded image (zeroed when loading failed).
    pub stats: TransparencyStats,
    /// Human-readable status message.
    pub message: String,
}

/// Per-image fill state: the pristine decoded buffer plus the detection
/// results for the active mode.
///
/// Create once per image with [`FillSession::new()`] and recolor as often as
/// wanted. Every fill starts from the retained original, so repeated
/// recolors never compound on each other's output.
pub struct FillSession {
    original: PixelBuffer,
    mode: DetectionMode,
    transparent: Vec<TransparentPixel>,
    stats: TransparencyStats,
}

impl FillSession {
    /// Create a session, running detection and stats over the buffer.
    #[must_use]
    pub fn new(original: PixelBuffer, mode: DetectionMode) -> Self {
        let transparent = detection::detect_transparent_pixels(&original, mode);
        let stats = detection::transparency_stats(&original);
        Self {
            original,
            mode,
            transparent,
            stats,
        }
    }

    /// Switch the detection mode, re-running detection if it changed.
    pub fn set_mode(&mut self, mode: DetectionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.transparent = detection::detect_transparent_pixels(&self.original, mode);
        }
    }

    /// The active detection mode.
    #[must_use]
    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// The pristine decoded buffer.
    #[must_use]
    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    /// Pixels flagged under the active mode, in row-major order.
    #[must_use]
    pub fn transparent_pixels(&self) -> &[TransparentPixel] {
        &self.transparent
    }

    /// Aggregate transparency stats (mode-independent).
    #[must_use]
    pub fn stats(&self) -> TransparencyStats {
        self.stats
    }

    /// Whether the active mode flagged any pixel.
    #[must_use]
    pub fn has_transparency(&self) -> bool {
        !self.transparent.is_empty()
    }

    /// Fill the flagged pixels with `color`, starting from the pristine
    /// original.
    ///
    /// With nothing flagged the original is returned unchanged; in
    /// particular a contour-mode session never falls back to filling the
    /// whole image.
    ///
    /// # Errors
    ///
    /// Propagates fill errors; none occur for a list produced by this
    /// session's own detection pass.
    pub fn recolor(&self, color: Rgb) -> Result<PixelBuffer> {
        if self.transparent.is_empty() {
            return Ok(self.original.clone());
        }
        fill::fill_transparent_pixels(&self.original, color, Some(&self.transparent))
    }

    /// Checkerboard visualization of the original's transparency.
    #[must_use]
    pub fn visualize(&self) -> PixelBuffer {
        detection::visualize_transparency(&self.original)
    }
}

/// Process a single image file: load, detect, fill, save.
///
/// Images without transparency under the requested mode are skipped and
/// count as success. With [`FillOptions::visualize`] set, the checkerboard
/// visualization is written instead of a fill result.
///
/// Returns a [`FillOutcome`] indicating success, skip, or failure.
#[must_use]
pub fn process_file(input: &Path, output: &Path, opts: &FillOptions) -> FillOutcome {
    let mut result = FillOutcome {
        path: input.to_path_buf(),
        success: false,
        skipped: false,
        transparent_pixels: 0,
        stats: TransparencyStats::default(),
        message: String::new(),
    };

    // Load image
    let dyn_img = match image::open(input) {
        Ok(img) => img,
        Err(e) => {
            result.message = format!("Failed to load: {e}");
            return result;
        }
    };

    let buffer = match PixelBuffer::from_rgba_image(dyn_img.to_rgba8()) {
        Ok(buffer) => buffer,
        Err(e) => {
            result.message = format!("Failed to load: {e}");
            return result;
        }
    };

    let session = FillSession::new(buffer, opts.mode);
    result.stats = session.stats();
    result.transparent_pixels = session.transparent_pixels().len();

    let filled = if opts.visualize {
        session.visualize()
    } else {
        if !session.has_transparency() {
            result.skipped = true;
            result.success = true;
            result.message = match opts.mode {
                DetectionMode::All => "No transparent pixels".to_string(),
                DetectionMode::Contour => {
                    "No transparent pixels inside the opaque contour".to_string()
                }
            };
            return result;
        }

        match session.recolor(opts.color) {
            Ok(filled) => filled,
            Err(e) => {
                result.message = format!("Fill failed: {e}");
                return result;
            }
        }
    };

    // Save output
    if let Some(parent) = output.parent() {
        if !parent.exists() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                result.message = format!("Failed to create output directory: {e}");
                return result;
            }
        }
    }

    match save_image(&filled, output) {
        Ok(()) => {
            result.success = true;
            result.message = if opts.visualize {
                "Transparency visualization written".to_string()
            } else {
                format!("Filled {} transparent pixels", result.transparent_pixels)
            };
        }
        Err(e) => {
            result.message = format!("Failed to save: {e}");
        }
    }

    result
}

/// Process all supported images in a directory.
///
/// Each input `photo.gif` lands at `<output_dir>/photo_filled.png`. Uses
/// parallel iteration when the `cli` feature is enabled (via rayon).
/// Returns a [`FillOutcome`] for each image found.
#[must_use]
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    opts: &FillOptions,
) -> Vec<FillOutcome> {
    let entries: Vec<_> = match std::fs::read_dir(input_dir) {
        Ok(rd) => rd
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .filter(|e| is_supported_image(e.path().as_path()))
            .collect(),
        Err(e) => {
            return vec![failed_outcome(
                input_dir,
                format!("Failed to read directory: {e}"),
            )];
        }
    };

    // Create output directory
    if !output_dir.exists() {
        if let Err(e) = std::fs::create_dir_all(output_dir) {
            return vec![failed_outcome(
                output_dir,
                format!("Failed to create output directory: {e}"),
            )];
        }
    }

    #[cfg(feature = "cli")]
    {
        use rayon::prelude::*;
        entries
            .par_iter()
            .map(|entry| {
                let input_path = entry.path();
                let output_path = output_dir.join(output_file_name(&input_path));
                process_file(&input_path, &output_path, opts)
            })
            .collect()
    }

    #[cfg(not(feature = "cli"))]
    {
        entries
            .iter()
            .map(|entry| {
                let input_path = entry.path();
                let output_path = output_dir.join(output_file_name(&input_path));
                process_file(&input_path, &output_path, opts)
            })
            .collect()
    }
}

fn failed_outcome(path: &Path, message: String) -> FillOutcome {
    FillOutcome {
        path: path.to_path_buf(),
        success: false,
        skipped: false,
        transparent_pixels: 0,
        stats: TransparencyStats::default(),
        message,
    }
}

/// Check if a file has a supported input extension.
///
/// The accepted set is the alpha-capable formats the pipeline decodes: PNG,
/// GIF and WebP. JPEG carries no alpha channel and is not accepted.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(ext.to_lowercase().as_str(), "png" | "gif" | "webp"),
        None => false,
    }
}

/// Save an RGBA buffer, choosing the encoder from the output extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] unless the extension maps to PNG,
/// WebP, BMP or GIF (the alpha-capable encoders), or the underlying encoder
/// error if writing fails.
pub fn save_image(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    match format {
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Gif => {
            DynamicImage::ImageRgba8(buffer.to_rgba_image()).save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Output file name for an input: the stem plus a `_filled` suffix, always
/// with the `.png` extension the exporter targets.
fn output_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{stem}_filled.png")
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.gif"` becomes `"photo_filled.png"` next to it.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(output_file_name(input))
}
