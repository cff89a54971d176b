//! The sketch engine: pipeline stages, effect dispatch and file helpers.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use log::{debug, trace, warn};

use crate::blending;
use crate::effect::{EffectKind, Intensity};
use crate::error::{Error, Result};
use crate::primitives::{Blur, ColorConvert, ImageBackend, Resample};
use crate::RasterImage;

/// Longest side, in pixels, that [`SketchEngine::render`] works at.
pub const MAX_DIMENSION: u32 = 800;

/// Fixed-point scale of the soft-sketch divide.
const SOFT_DIVIDE_SCALE: u32 = 256;

/// Weight of each operand in the colored and soft-color composites.
const COMPOSITE_WEIGHT: f32 = 0.5;

/// Options controlling file processing.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Effect to render.
    pub effect: EffectKind,
    /// Blur/dodge strength.
    pub intensity: Intensity,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            effect: EffectKind::OriginalToSketch,
            intensity: Intensity::default(),
            verbose: false,
            quiet: false,
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Where the rendering was written, if it was.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Dimensions of the rendered image.
    pub dimensions: Option<(u32, u32)>,
    /// Human-readable status message.
    pub message: String,
}

/// Renders sketch effects on top of an imaging backend.
///
/// The engine holds no per-image state; every call allocates fresh output
/// buffers and never touches its input, so one engine can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct SketchEngine<B = ImageBackend> {
    backend: B,
}

impl SketchEngine {
    /// Create an engine on the default [`ImageBackend`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_backend(ImageBackend)
    }
}

impl<B> SketchEngine<B>
where
    B: Blur + ColorConvert + Resample,
{
    /// Create an engine on a custom backend.
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    /// The imaging backend in use.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Downscale so the longest side is at most `max_dimension`.
    ///
    /// Images already within bounds are returned as an unchanged copy. The
    /// shorter side is rounded to the nearest pixel; aspect ratio is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image or a zero bound.
    pub fn downscale(&self, image: &RasterImage, max_dimension: u32) -> Result<RasterImage> {
        check_input(image)?;
        if max_dimension == 0 {
            return Err(Error::InvalidInput("max dimension must be positive".into()));
        }

        let (width, height) = image.dimensions();
        if width <= max_dimension && height <= max_dimension {
            return Ok(image.clone());
        }

        let (new_w, new_h) = scaled_dimensions(width, height, max_dimension);
        trace!("downscale {width}x{height} -> {new_w}x{new_h}");
        Ok(self.backend.resample(image, new_w, new_h))
    }

    /// Luma on all three color channels, alpha 255.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn to_grayscale(&self, image: &RasterImage) -> Result<RasterImage> {
        check_input(image)?;
        Ok(self.backend.grayscale(image))
    }

    /// Pencil sketch: dodge the blurred inverse of the grayscale onto itself.
    ///
    /// At intensity 0 the blur is a no-op and the result is close to white.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn to_sketch(&self, image: &RasterImage, intensity: Intensity) -> Result<RasterImage> {
        trace!("sketch, kernel {}", intensity.kernel_size());
        let gray = self.to_grayscale(image)?;
        let inverted = blending::invert(&gray);
        let blurred = self.backend.gaussian_blur(&inverted, intensity.kernel_size());
        blending::color_dodge_blend(&gray, &blurred)
    }

    /// Soft pencil: divide the grayscale by its own blur.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn to_soft_sketch(&self, image: &RasterImage, intensity: Intensity) -> Result<RasterImage> {
        trace!("soft sketch, kernel {}", intensity.kernel_size());
        let gray = self.to_grayscale(image)?;
        let blurred = self.backend.gaussian_blur(&gray, intensity.kernel_size());
        blending::divide_scaled(&gray, &blurred, SOFT_DIVIDE_SCALE)
    }

    /// Average of the image and its pencil sketch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn to_colored_sketch(
        &self,
        image: &RasterImage,
        intensity: Intensity,
    ) -> Result<RasterImage> {
        let sketch = self.to_sketch(image, intensity)?;
        blending::add_weighted(image, COMPOSITE_WEIGHT, &sketch, COMPOSITE_WEIGHT, 0.0)
    }

    /// Average of the soft sketch and the colored sketch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn to_soft_color_sketch(
        &self,
        image: &RasterImage,
        intensity: Intensity,
    ) -> Result<RasterImage> {
        let soft = self.to_soft_sketch(image, intensity)?;
        let colored = self.to_colored_sketch(image, intensity)?;
        blending::add_weighted(&soft, COMPOSITE_WEIGHT, &colored, COMPOSITE_WEIGHT, 0.0)
    }

    /// Render by numeric effect id (`0..=9`).
    ///
    /// Unknown ids are not an error: the downscaled source is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn render(
        &self,
        image: &RasterImage,
        effect_id: i64,
        intensity: Intensity,
    ) -> Result<RasterImage> {
        if let Some(effect) = EffectKind::from_id(effect_id) {
            return self.render_effect(image, effect, intensity);
        }
        warn!("unknown effect id {effect_id}, returning downscaled source");
        self.downscale(image, MAX_DIMENSION)
    }

    /// Downscale to [`MAX_DIMENSION`], then run the stage graph of `effect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for an empty image.
    pub fn render_effect(
        &self,
        image: &RasterImage,
        effect: EffectKind,
        intensity: Intensity,
    ) -> Result<RasterImage> {
        debug!(
            "rendering effect {} ({effect}) at intensity {}",
            effect.id(),
            intensity.value()
        );
        let src = self.downscale(image, MAX_DIMENSION)?;

        let result = match effect {
            EffectKind::OriginalToGray => self.to_grayscale(&src)?,
            // Sketch first, then composite the sketch with its own sketch.
            EffectKind::OriginalToSketch | EffectKind::SketchToColoredSketch => {
                let sketch = self.to_sketch(&src, intensity)?;
                self.to_colored_sketch(&sketch, intensity)?
            }
            EffectKind::OriginalToColoredSketch => self.to_colored_sketch(&src, intensity)?,
            EffectKind::OriginalToSoftSketch => self.to_soft_sketch(&src, intensity)?,
            EffectKind::OriginalToSoftColorSketch => self.to_soft_color_sketch(&src, intensity)?,
            EffectKind::GrayToSketch => self.to_sketch(&self.to_grayscale(&src)?, intensity)?,
            EffectKind::GrayToColoredSketch => {
                self.to_colored_sketch(&self.to_grayscale(&src)?, intensity)?
            }
            EffectKind::GrayToSoftSketch => {
                self.to_soft_sketch(&self.to_grayscale(&src)?, intensity)?
            }
            EffectKind::GrayToSoftColorSketch => {
                self.to_soft_color_sketch(&self.to_grayscale(&src)?, intensity)?
            }
        };

        debug!("result dimensions: {}x{}", result.width(), result.height());
        Ok(result)
    }
}

impl<B> SketchEngine<B>
where
    B: Blur + ColorConvert + Resample + Sync,
{
    /// Process a single image file: load, render, save.
    ///
    /// Failures are reported in the returned [`ProcessResult`], never panicked.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, opts: &ProcessOptions) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: None,
            success: false,
            dimensions: None,
            message: String::new(),
        };

        let source = match image::open(input) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let rendered = match self.render_effect(&source, opts.effect, opts.intensity) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to render: {e}");
                return result;
            }
        };
        result.dimensions = Some(rendered.dimensions());

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match save_image(&rendered, output) {
            Ok(()) => {
                result.success = true;
                result.output = Some(output.to_path_buf());
                result.message = format!("Rendered {}", opts.effect);
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    /// Returns a [`ProcessResult`] for each image found.
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        opts: &ProcessOptions,
    ) -> Vec<ProcessResult> {
        let inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![failure(input_dir, format!("Failed to read directory: {e}"))];
            }
        };

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![failure(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let run = |input: &PathBuf| {
            let output = output_dir.join(input.file_name().unwrap_or_default());
            self.process_file(input, &output, opts)
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            inputs.par_iter().map(run).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            inputs.iter().map(run).collect()
        }
    }
}

fn failure(path: &Path, message: String) -> ProcessResult {
    ProcessResult {
        path: path.to_path_buf(),
        output: None,
        success: false,
        dimensions: None,
        message,
    }
}

fn check_input(image: &RasterImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidInput(format!(
            "image is {}x{}",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

/// Target size when the longest side is clamped to `max_dimension`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let aspect = width as f32 / height as f32;
    let max = max_dimension as f32;
    if width > height {
        (max_dimension, ((max / aspect).round() as u32).max(1))
    } else {
        (((max * aspect).round() as u32).max(1), max_dimension)
    }
}

/// Extensions [`save_image`] can write and batch processing picks up.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "bmp"];

/// Extension used for renderings whose input has none; the app saved JPEG.
const FALLBACK_EXTENSION: &str = "jpg";

/// Whether `path` names a format listed in [`SUPPORTED_EXTENSIONS`].
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Save a rendered image; JPEG is written at quality 100 without alpha.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &RasterImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    let dyn_img = DynamicImage::ImageRgba8(img.clone());

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&DynamicImage::ImageRgb8(dyn_img.to_rgb8()))?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp => {
            dyn_img.save(path)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Sibling path for a rendering of `input`, tagged with the effect slug.
///
/// `"photo.png"` rendered as [`EffectKind::GrayToSketch`] becomes
/// `"photo_gray-to-sketch.png"`. Inputs without an extension get `.jpg`.
#[must_use]
pub fn default_output_path(input: &Path, effect: EffectKind) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input
        .extension()
        .map_or(Cow::Borrowed(FALLBACK_EXTENSION), std::ffi::OsStr::to_string_lossy);
    input.with_file_name(format!("{stem}_{}.{ext}", effect.slug()))
}
