//! Turn photographs into pencil-sketch renderings.
//!
//! A pure, deterministic pipeline converts a decoded RGBA image into one of
//! ten stylized variants: grayscale, pencil sketch, colored sketch, soft
//! sketch, soft-color sketch, and the same effects built on a grayscale or
//! sketch intermediate. A single intensity control (`0..=100`) sets the blur
//! span of the sketch stages.
//!
//! # Quick Start
//!
//! ```no_run
//! use image_sketch::{EffectKind, Intensity, SketchEngine};
//!
//! let engine = SketchEngine::new();
//! let img = image::open("photo.jpg").unwrap().to_rgba8();
//! let sketch = engine
//!     .render_effect(&img, EffectKind::GrayToSketch, Intensity::new(10))
//!     .unwrap();
//! sketch.save("photo_sketch.png").unwrap();
//! ```
//!
//! # Effect ids
//!
//! Callers that carry the effect as a plain number (a tab index, a CLI
//! argument) can use [`SketchEngine::render`], which falls back to the
//! downscaled source for ids outside `0..=9` instead of failing.
//!
//! ```no_run
//! use image_sketch::{Intensity, SketchEngine};
//!
//! let engine = SketchEngine::new();
//! let img = image::open("photo.jpg").unwrap().to_rgba8();
//! let soft = engine.render(&img, 3, Intensity::default()).unwrap();
//! assert!(soft.width() <= 800 && soft.height() <= 800);
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod effect;
mod engine;
pub mod error;
pub mod primitives;

pub use effect::{EffectKind, Intensity};
pub use engine::{
    default_output_path, is_supported_image, save_image, ProcessOptions, ProcessResult,
    SketchEngine, MAX_DIMENSION, SUPPORTED_EXTENSIONS,
};
pub use error::{Error, Result};

/// An 8-bit RGBA raster, row-major. Every stage output is fully opaque.
pub type RasterImage = image::RgbaImage;
