//! Imaging primitives the pipeline is built on.
//!
//! The sketch stages only need three capabilities from an imaging library:
//! a square Gaussian blur, an RGB to luma conversion and a smooth resampler.
//! They are expressed as traits so an alternative backend can be plugged into
//! [`SketchEngine`](crate::SketchEngine); [`ImageBackend`] is the default,
//! built on the `image` crate.

use image::imageops::{self, FilterType};
use image::Rgba;

use crate::RasterImage;

/// Square Gaussian blur with a caller-chosen kernel span.
pub trait Blur {
    /// Blur RGB channels with an odd `kernel_size`. Borders replicate the edge
    /// pixel. The returned image is fully opaque.
    fn gaussian_blur(&self, image: &RasterImage, kernel_size: u32) -> RasterImage;
}

/// RGB to single-channel intensity conversion.
pub trait ColorConvert {
    /// Luma of one pixel.
    fn luma(&self, r: u8, g: u8, b: u8) -> u8;

    /// Replace every pixel by its luma on all three color channels, alpha 255.
    fn grayscale(&self, image: &RasterImage) -> RasterImage {
        let mut out = RasterImage::new(image.width(), image.height());
        for (dst, src) in out.pixels_mut().zip(image.pixels()) {
            let y = self.luma(src[0], src[1], src[2]);
            *dst = Rgba([y, y, y, 255]);
        }
        out
    }
}

/// Smooth (interpolating) resize.
pub trait Resample {
    /// Resample `image` to exactly `width` x `height`.
    fn resample(&self, image: &RasterImage, width: u32, height: u32) -> RasterImage;
}

/// Default backend: `image` crate resampling plus hand-rolled fixed-point luma
/// and separable Gaussian convolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBackend;

/// BT.601 weights scaled by `1 << 14`; they sum to exactly 16384.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

impl ColorConvert for ImageBackend {
    fn luma(&self, r: u8, g: u8, b: u8) -> u8 {
        let y = (u32::from(r) * LUMA_R
            + u32::from(g) * LUMA_G
            + u32::from(b) * LUMA_B
            + (1 << (LUMA_SHIFT - 1)))
            >> LUMA_SHIFT;
        #[allow(clippy::cast_possible_truncation)]
        {
            y.min(255) as u8
        }
    }
}

impl Resample for ImageBackend {
    fn resample(&self, image: &RasterImage, width: u32, height: u32) -> RasterImage {
        imageops::resize(image, width, height, FilterType::Triangle)
    }
}

impl Blur for ImageBackend {
    fn gaussian_blur(&self, image: &RasterImage, kernel_size: u32) -> RasterImage {
        let (width, height) = image.dimensions();
        let kernel = gaussian_kernel_1d(kernel_size);
        if kernel.len() == 1 || width == 0 || height == 0 {
            let mut out = image.clone();
            for px in out.pixels_mut() {
                px[3] = 255;
            }
            return out;
        }

        let w = width as usize;
        let h = height as usize;
        #[allow(clippy::cast_possible_wrap)]
        let half = (kernel.len() / 2) as isize;
        let src = image.as_raw();

        // Horizontal pass into f32 to avoid rounding twice
        let mut temp = vec![0.0f32; w * h * 3];
        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let mut sum = [0.0f32; 3];
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sx = replicate(x, ki, half, w);
                    let idx = (row + sx) * 4;
                    for (acc, &v) in sum.iter_mut().zip(&src[idx..idx + 3]) {
                        *acc += f32::from(v) * kv;
                    }
                }
                temp[(row + x) * 3..(row + x) * 3 + 3].copy_from_slice(&sum);
            }
        }

        // Vertical pass
        let mut out = RasterImage::new(width, height);
        let dst: &mut [u8] = &mut out;
        for y in 0..h {
            for x in 0..w {
                let mut sum = [0.0f32; 3];
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sy = replicate(y, ki, half, h);
                    let idx = (sy * w + x) * 3;
                    for (acc, &v) in sum.iter_mut().zip(&temp[idx..idx + 3]) {
                        *acc += v * kv;
                    }
                }
                let o = (y * w + x) * 4;
                for (d, v) in dst[o..o + 3].iter_mut().zip(sum) {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    {
                        *d = v.round().clamp(0.0, 255.0) as u8;
                    }
                }
                dst[o + 3] = 255;
            }
        }
        out
    }
}

/// Source index for kernel tap `ki` around `pos`, clamped into `0..len`.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn replicate(pos: usize, ki: usize, half: isize, len: usize) -> usize {
    (pos as isize + ki as isize - half).clamp(0, len as isize - 1) as usize
}

/// Normalized 1D Gaussian kernel of an odd span.
///
/// Sigma is derived from the span as `0.3 * ((k - 1) * 0.5 - 1) + 0.8`, the
/// usual automatic choice when no explicit sigma is given. Even spans are
/// widened by one; spans of 0 or 1 give the identity kernel.
#[must_use]
pub fn gaussian_kernel_1d(kernel_size: u32) -> Vec<f32> {
    let k = kernel_size | 1;
    if k == 1 {
        return vec![1.0];
    }

    #[allow(clippy::cast_precision_loss)]
    let sigma = 0.3 * ((k as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (k / 2) as usize;

    #[allow(clippy::cast_precision_loss)]
    let mut kernel: Vec<f32> = (0..k as usize)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for size in [3u32, 5, 21, 201] {
            let k = gaussian_kernel_1d(size);
            assert_eq!(k.len(), size as usize);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "size {size} sums to {sum}");
            for i in 0..k.len() / 2 {
                assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn kernel_of_size_one_is_identity() {
        assert_eq!(gaussian_kernel_1d(1), vec![1.0]);
        assert_eq!(gaussian_kernel_1d(0), vec![1.0]);
    }

    #[test]
    fn luma_of_gray_is_unchanged() {
        let backend = ImageBackend;
        for v in [0u8, 1, 64, 128, 200, 255] {
            assert_eq!(backend.luma(v, v, v), v);
        }
    }

    #[test]
    fn luma_weights_green_heaviest() {
        let backend = ImageBackend;
        assert_eq!(backend.luma(255, 0, 0), 76);
        assert_eq!(backend.luma(0, 255, 0), 150);
        assert_eq!(backend.luma(0, 0, 255), 29);
    }

    #[test]
    fn blur_preserves_flat_image() {
        let img = RasterImage::from_pixel(12, 7, Rgba([90, 140, 10, 255]));
        let out = ImageBackend.gaussian_blur(&img, 9);
        assert_eq!(out.dimensions(), (12, 7));
        for px in out.pixels() {
            assert_eq!(*px, Rgba([90, 140, 10, 255]));
        }
    }

    #[test]
    fn blur_with_unit_kernel_copies_and_forces_opaque() {
        let mut img = RasterImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
        img.put_pixel(1, 2, Rgba([200, 100, 50, 7]));
        let out = ImageBackend.gaussian_blur(&img, 1);
        assert_eq!(*out.get_pixel(1, 2), Rgba([200, 100, 50, 255]));
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn blur_spreads_a_single_bright_pixel() {
        let mut img = RasterImage::from_pixel(9, 9, Rgba([0, 0, 0, 255]));
        img.put_pixel(4, 4, Rgba([255, 255, 255, 255]));
        let out = ImageBackend.gaussian_blur(&img, 5);
        let center = out.get_pixel(4, 4)[0];
        let neighbor = out.get_pixel(5, 4)[0];
        assert!(center < 255);
        assert!(neighbor > 0);
        assert!(center > neighbor);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn resample_hits_requested_size() {
        let img = RasterImage::from_pixel(40, 20, Rgba([1, 2, 3, 255]));
        let out = ImageBackend.resample(&img, 10, 5);
        assert_eq!(out.dimensions(), (10, 5));
    }

    #[test]
    fn default_grayscale_sets_equal_channels() {
        let mut img = RasterImage::from_pixel(3, 3, Rgba([255, 0, 0, 10]));
        img.put_pixel(2, 2, Rgba([12, 200, 77, 255]));
        let gray = ImageBackend.grayscale(&img);
        for px in gray.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }
}
