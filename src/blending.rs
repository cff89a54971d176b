//! Per-pixel blend arithmetic.
//!
//! All operations read two equal-size images and write a fresh, fully opaque
//! image. Intermediate products are computed in `u32`/`f32` and narrowed back
//! to `u8` with explicit clamping.

use image::Rgba;

use crate::error::{Error, Result};
use crate::RasterImage;

/// Color dodge of one channel: `base * 256 / (255 - blend)`, saturating at 255.
///
/// A fully white blend channel always yields 255.
#[must_use]
pub fn color_dodge(blend: u8, base: u8) -> u8 {
    if blend == 255 {
        return 255;
    }
    let v = (u32::from(base) << 8) / (255 - u32::from(blend));
    saturate(v)
}

/// Scaled divide of one channel: `num * scale / den`, rounded to nearest
/// (ties to even) and saturating at 255.
///
/// A zero denominator yields 255.
#[must_use]
pub fn divide_channel(num: u8, den: u8, scale: u32) -> u8 {
    if den == 0 {
        return 255;
    }
    let n = u32::from(num) * scale;
    let d = u32::from(den);
    let (q, r) = (n / d, n % d);
    let q = match (2 * r).cmp(&d) {
        std::cmp::Ordering::Greater => q + 1,
        std::cmp::Ordering::Equal => q + (q & 1),
        std::cmp::Ordering::Less => q,
    };
    saturate(q)
}

/// Color-dodge `blend` onto `base`, channel by channel.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the two images differ in size.
pub fn color_dodge_blend(base: &RasterImage, blend: &RasterImage) -> Result<RasterImage> {
    zip_pixels(base, blend, |b, l| {
        Rgba([
            color_dodge(l[0], b[0]),
            color_dodge(l[1], b[1]),
            color_dodge(l[2], b[2]),
            255,
        ])
    })
}

/// Divide `num` by `den` channel-wise with a fixed-point `scale`.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the two images differ in size.
pub fn divide_scaled(num: &RasterImage, den: &RasterImage, scale: u32) -> Result<RasterImage> {
    zip_pixels(num, den, |n, d| {
        Rgba([
            divide_channel(n[0], d[0], scale),
            divide_channel(n[1], d[1], scale),
            divide_channel(n[2], d[2], scale),
            255,
        ])
    })
}

/// Weighted sum `a * alpha + b * beta + gamma`, rounded to nearest (ties to
/// even) and clamped.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] if the two images differ in size.
pub fn add_weighted(
    a: &RasterImage,
    alpha: f32,
    b: &RasterImage,
    beta: f32,
    gamma: f32,
) -> Result<RasterImage> {
    let mix = |x: u8, y: u8| {
        let v = f32::from(x) * alpha + f32::from(y) * beta + gamma;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            v.round_ties_even().clamp(0.0, 255.0) as u8
        }
    };
    zip_pixels(a, b, |p, q| {
        Rgba([mix(p[0], q[0]), mix(p[1], q[1]), mix(p[2], q[2]), 255])
    })
}

/// Invert every color channel (`v -> 255 - v`); alpha is kept.
#[must_use]
pub fn invert(image: &RasterImage) -> RasterImage {
    let mut out = image.clone();
    for px in out.pixels_mut() {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
    out
}

/// Check that two blend operands share dimensions.
///
/// # Errors
///
/// Returns [`Error::InvalidDimensions`] on mismatch.
pub fn ensure_same_dimensions(a: &RasterImage, b: &RasterImage) -> Result<()> {
    if a.dimensions() == b.dimensions() {
        Ok(())
    } else {
        Err(Error::InvalidDimensions {
            expected: a.dimensions(),
            actual: b.dimensions(),
        })
    }
}

fn zip_pixels<F>(a: &RasterImage, b: &RasterImage, f: F) -> Result<RasterImage>
where
    F: Fn(&Rgba<u8>, &Rgba<u8>) -> Rgba<u8>,
{
    ensure_same_dimensions(a, b)?;
    let mut out = RasterImage::new(a.width(), a.height());
    for ((dst, p), q) in out.pixels_mut().zip(a.pixels()).zip(b.pixels()) {
        *dst = f(p, q);
    }
    Ok(out)
}

#[allow(clippy::cast_possible_truncation)]
fn saturate(v: u32) -> u8 {
    v.min(255) as u8
}
