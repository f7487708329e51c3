//! # Image Rasterizer
//!
//! Turns an arbitrary color or grayscale image into a [`MonochromeBitmap`]
//! ready for the raster bit-image command.
//!
//! ## Steps
//!
//! 1. Round the target width down to a multiple of 8 and scale the image
//!    to that width, preserving aspect ratio (Lanczos3 resampling).
//! 2. Composite transparent pixels onto white paper.
//! 3. Convert to luminance, pre-clip, and Floyd–Steinberg dither
//!    (see [`super::dither`]).
//! 4. Pack each row MSB-first, one bit per dot, 1 = ink.
//!
//! ## Widths
//!
//! | Use | Target width |
//! |-----|--------------|
//! | Full-width image job | 384 dots |
//! | Receipt logo | 250 dots (248 after alignment) |

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, GenericImageView, imageops::FilterType};
use tracing::{debug, instrument};

use super::dither;
use crate::error::{PrintError, PrintResult};

/// Tallest bitmap a raster header can describe (16-bit row count).
pub const MAX_HEIGHT: usize = u16::MAX as usize;

// ============================================================================
// MONOCHROME BITMAP
// ============================================================================

/// Packed 1-bit-per-pixel image.
///
/// Width is always a multiple of 8, and `data` holds exactly
/// `(width / 8) * height` bytes, rows top to bottom, MSB = leftmost dot,
/// bit set = ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonochromeBitmap {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl MonochromeBitmap {
    /// Wrap already packed bitmap data.
    ///
    /// Fails if `width` is zero or not a multiple of 8, or if `data` has the
    /// wrong length.
    pub fn from_packed(width: usize, height: usize, data: Vec<u8>) -> PrintResult<Self> {
        if width == 0 || width % 8 != 0 {
            return Err(PrintError::Encoding(format!(
                "bitmap width {} is not a positive multiple of 8",
                width
            )));
        }
        let expected = (width / 8) * height;
        if data.len() != expected {
            return Err(PrintError::Encoding(format!(
                "bitmap data is {} bytes, expected {} ({} bytes × {} rows)",
                data.len(),
                expected,
                width / 8,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in dots
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn width_bytes(&self) -> usize {
        self.width / 8
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Whether the dot at (x, y) prints black.
    pub fn is_ink(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y * self.width_bytes() + x / 8];
        byte & (0x80 >> (x % 8)) != 0
    }
}

// ============================================================================
// IMAGE SOURCES
// ============================================================================

/// Image payload handed over by the UI or by QR/barcode generators.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Encoded image file bytes (PNG, JPEG, GIF, BMP, ...)
    Encoded(Vec<u8>),
    /// Base64 text, optionally as a `data:image/...;base64,` URL
    Base64(String),
    /// Already decoded image
    Decoded(DynamicImage),
}

impl ImageSource {
    /// Decode the payload into an image.
    pub fn decode(&self) -> PrintResult<DynamicImage> {
        match self {
            ImageSource::Encoded(bytes) => decode_bytes(bytes),
            ImageSource::Base64(text) => {
                let bytes = decode_base64(text)?;
                decode_bytes(&bytes)
            }
            ImageSource::Decoded(image) => Ok(image.clone()),
        }
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(image: DynamicImage) -> Self {
        ImageSource::Decoded(image)
    }
}

fn decode_bytes(bytes: &[u8]) -> PrintResult<DynamicImage> {
    image::load_from_memory(bytes)
        .map_err(|e| PrintError::ImageProcessing(format!("Failed to decode image: {}", e)))
}

/// Decode base64 text, stripping a `data:` URL header if present.
fn decode_base64(text: &str) -> PrintResult<Vec<u8>> {
    let payload = match text.strip_prefix("data:") {
        Some(rest) => match rest.split_once(',') {
            Some((header, body)) if header.ends_with(";base64") => body,
            _ => {
                return Err(PrintError::ImageProcessing(
                    "data URL is not base64 encoded".to_string(),
                ));
            }
        },
        None => text,
    };

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| PrintError::ImageProcessing(format!("Invalid base64 image data: {}", e)))
}

// ============================================================================
// RASTERIZATION
// ============================================================================

/// Round a target width down to a whole number of bytes.
///
/// ```
/// use posprint::render::raster::corrected_width;
///
/// assert_eq!(corrected_width(384), 384);
/// assert_eq!(corrected_width(250), 248);
/// assert_eq!(corrected_width(7), 0);
/// ```
#[inline]
pub fn corrected_width(target_width: usize) -> usize {
    (target_width / 8) * 8
}

/// Decode `source` and rasterize it at `target_width` dots.
pub fn rasterize(source: &ImageSource, target_width: usize) -> PrintResult<MonochromeBitmap> {
    let image = source.decode()?;
    rasterize_image(&image, target_width)
}

/// Rasterize a decoded image at `target_width` dots.
///
/// Fails with [`PrintError::ImageProcessing`] if the image is empty, the
/// target width is narrower than one byte, or the scaled height exceeds
/// [`MAX_HEIGHT`]. The height is checked before any resampling.
#[instrument(skip(image), fields(source = ?image.dimensions()))]
pub fn rasterize_image(image: &DynamicImage, target_width: usize) -> PrintResult<MonochromeBitmap> {
    let width = corrected_width(target_width);
    if width == 0 {
        return Err(PrintError::ImageProcessing(format!(
            "target width {} is narrower than 8 dots",
            target_width
        )));
    }

    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(PrintError::ImageProcessing(format!(
            "image has no pixels ({}x{})",
            src_w, src_h
        )));
    }

    // Uniform scale; very wide images still get one row
    let height = ((src_h as f64 * width as f64 / src_w as f64).floor() as usize).max(1);
    if height > MAX_HEIGHT {
        return Err(PrintError::ImageProcessing(format!(
            "{}x{} image scales to {} rows at {} dots, maximum is {}",
            src_w, src_h, height, width, MAX_HEIGHT
        )));
    }
    debug!(width, height, "scaling image");

    let resized = if (src_w as usize, src_h as usize) == (width, height) {
        image.to_rgba8()
    } else {
        image
            .resize_exact(width as u32, height as u32, FilterType::Lanczos3)
            .to_rgba8()
    };

    let mut gray: Vec<f32> = resized
        .pixels()
        .map(|p| {
            let [r, g, b, a] = p.0;
            dither::preclip(dither::luminance(
                over_white(r, a),
                over_white(g, a),
                over_white(b, a),
            ))
        })
        .collect();

    let ink = dither::floyd_steinberg(&mut gray, width, height);

    let mut data = Vec::with_capacity(width / 8 * height);
    for row in ink.chunks(width) {
        data.extend(dither::pack_row(row));
    }

    MonochromeBitmap::from_packed(width, height, data)
}

/// Composite one channel over a white background.
#[inline]
fn over_white(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(rgb)))
    }

    #[test]
    fn test_single_black_pixel() {
        let bitmap = rasterize_image(&solid(1, 1, [0, 0, 0]), 8).unwrap();
        assert_eq!(bitmap.width(), 8);
        assert_eq!(bitmap.height(), 8);
        assert!(bitmap.data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_single_white_pixel() {
        let bitmap = rasterize_image(&solid(1, 1, [255, 255, 255]), 8).unwrap();
        assert!(bitmap.data().iter().all(|&b| b == 0x00));
    }

    #[test]
    fn test_one_row_black() {
        // 8x1 source at width 8 keeps its single row
        let bitmap = rasterize_image(&solid(8, 1, [0, 0, 0]), 8).unwrap();
        assert_eq!(bitmap.data(), &[0xFF]);

        let bitmap = rasterize_image(&solid(8, 1, [255, 255, 255]), 8).unwrap();
        assert_eq!(bitmap.data(), &[0x00]);
    }

    #[test]
    fn test_width_rounds_down_to_byte() {
        let bitmap = rasterize_image(&solid(100, 50, [200, 200, 200]), 250).unwrap();
        assert_eq!(bitmap.width(), 248);
        assert_eq!(bitmap.height(), 124);
        assert_eq!(bitmap.data().len(), 31 * 124);
    }

    #[test]
    fn test_aspect_ratio_floor() {
        // 384 * 3 / 7 = 164.57 → 164 rows
        let bitmap = rasterize_image(&solid(7, 3, [0, 0, 0]), 384).unwrap();
        assert_eq!(bitmap.height(), 164);
        assert_eq!(bitmap.data().len(), 48 * 164);
    }

    #[test]
    fn test_very_wide_image_keeps_one_row() {
        let bitmap = rasterize_image(&solid(2000, 1, [0, 0, 0]), 16).unwrap();
        assert_eq!(bitmap.height(), 1);
        assert_eq!(bitmap.data(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_tall_image_rejected_before_resize() {
        // 1x200 at 384 dots would be 76800 rows
        let err = rasterize_image(&solid(1, 200, [0, 0, 0]), 384).unwrap_err();
        match err {
            PrintError::ImageProcessing(msg) => assert!(msg.contains("76800")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_narrow_target_rejected() {
        let err = rasterize_image(&solid(4, 4, [0, 0, 0]), 7).unwrap_err();
        assert!(matches!(err, PrintError::ImageProcessing(_)));
    }

    #[test]
    fn test_transparent_pixels_print_white() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 1, Rgba([0, 0, 0, 0])));
        let bitmap = rasterize_image(&image, 8).unwrap();
        assert_eq!(bitmap.data(), &[0x00]);
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let mut gradient = RgbImage::new(37, 23);
        for (x, y, px) in gradient.enumerate_pixels_mut() {
            let v = ((x * 7 + y * 11) % 256) as u8;
            *px = Rgb([v, v / 2, 255 - v]);
        }
        let image = DynamicImage::ImageRgb8(gradient);

        let a = rasterize_image(&image, 384).unwrap();
        let b = rasterize_image(&image, 384).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let err = rasterize(&ImageSource::Encoded(vec![0x00, 0x01, 0x02]), 384).unwrap_err();
        assert!(matches!(err, PrintError::ImageProcessing(_)));
    }

    #[test]
    fn test_base64_data_url() {
        let mut png = Vec::new();
        solid(2, 2, [0, 0, 0])
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let url = format!("data:image/png;base64,{}", STANDARD.encode(&png));

        let bitmap = rasterize(&ImageSource::Base64(url), 8).unwrap();
        assert_eq!(bitmap.width(), 8);
        assert!(bitmap.data().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_bad_base64_is_image_error() {
        let err = ImageSource::Base64("not*base64!".into()).decode().unwrap_err();
        assert!(matches!(err, PrintError::ImageProcessing(_)));

        let err = ImageSource::Base64("data:image/png,rawdata".into())
            .decode()
            .unwrap_err();
        assert!(matches!(err, PrintError::ImageProcessing(_)));
    }

    #[test]
    fn test_from_packed_validates() {
        assert!(MonochromeBitmap::from_packed(12, 1, vec![0, 0]).is_err());
        assert!(MonochromeBitmap::from_packed(16, 2, vec![0; 3]).is_err());
        assert!(MonochromeBitmap::from_packed(0, 0, vec![]).is_err());
    }

    #[test]
    fn test_is_ink() {
        let bitmap = MonochromeBitmap::from_packed(8, 2, vec![0x80, 0x01]).unwrap();
        assert!(bitmap.is_ink(0, 0));
        assert!(!bitmap.is_ink(1, 0));
        assert!(bitmap.is_ink(7, 1));
        assert!(!bitmap.is_ink(8, 0));
    }
}
