//! # Floyd–Steinberg Dithering
//!
//! This module converts a luminance buffer into a binary (ink / no ink)
//! mask suitable for thermal printers.
//!
//! ## Pipeline
//!
//! ```text
//! RGB ──► luminance ──► pre-clip ──► error diffusion ──► pack rows
//!         Y = .299R       >230 → 255     threshold 128       MSB first
//!           + .587G       <30  → 0
//!           + .114B
//! ```
//!
//! ## Pre-clipping
//!
//! Near-white paper backgrounds and near-black text would otherwise pick up
//! stray dots from accumulated error. Snapping them to pure white/black
//! before diffusion keeps flat regions clean.
//!
//! ## Error Diffusion
//!
//! Pixels are visited in raster order. Each is quantized to 0 or 255 and the
//! quantization error is pushed to the unvisited neighbours:
//!
//! ```text
//!              X     7/16
//!      3/16   5/16   1/16
//! ```
//!
//! Neighbours outside the image are skipped (their share of the error is
//! dropped, not redistributed).
//!
//! ## Determinism
//!
//! The traversal is strictly sequential and uses the same `f32` operations
//! in the same order every time, so identical input always produces
//! byte-identical output.

/// Rec. 601 luma weights.
pub const LUMA_R: f32 = 0.299;
pub const LUMA_G: f32 = 0.587;
pub const LUMA_B: f32 = 0.114;

/// Luminance above this is forced to pure white.
pub const WHITE_CLIP: f32 = 230.0;

/// Luminance below this is forced to pure black.
pub const BLACK_CLIP: f32 = 30.0;

/// Quantization threshold: values below print black.
pub const THRESHOLD: f32 = 128.0;

/// Luminance of an RGB pixel, 0 (black) to 255 (white).
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    r as f32 * LUMA_R + g as f32 * LUMA_G + b as f32 * LUMA_B
}

/// Snap near-white to 255 and near-black to 0.
#[inline]
pub fn preclip(y: f32) -> f32 {
    if y > WHITE_CLIP {
        255.0
    } else if y < BLACK_CLIP {
        0.0
    } else {
        y
    }
}

/// Dither a luminance buffer in place.
///
/// `gray` holds `width * height` luminance values in raster order. On return
/// every value is either 0.0 or 255.0, and the returned mask is `true` where
/// the pixel quantized to black (ink).
///
/// ## Example
///
/// ```
/// use posprint::render::dither::floyd_steinberg;
///
/// let mut gray = vec![0.0, 255.0, 0.0, 255.0];
/// let ink = floyd_steinberg(&mut gray, 2, 2);
/// assert_eq!(ink, vec![true, false, true, false]);
/// ```
pub fn floyd_steinberg(gray: &mut [f32], width: usize, height: usize) -> Vec<bool> {
    debug_assert_eq!(gray.len(), width * height);

    let mut ink = vec![false; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = gray[idx];
            let new = if old < THRESHOLD { 0.0 } else { 255.0 };
            gray[idx] = new;
            ink[idx] = new == 0.0;

            let err = old - new;

            if x + 1 < width {
                gray[idx + 1] += err * 7.0 / 16.0;
            }
            if y + 1 < height {
                if x > 0 {
                    gray[idx + width - 1] += err * 3.0 / 16.0;
                }
                gray[idx + width] += err * 5.0 / 16.0;
                if x + 1 < width {
                    gray[idx + width + 1] += err / 16.0;
                }
            }
        }
    }

    ink
}

/// Pack a row of boolean pixel values into bytes.
///
/// ## Bit Packing
///
/// - Bit 7 (MSB) = leftmost pixel
/// - Bit 0 (LSB) = rightmost pixel
/// - 1 = black (print dot), 0 = white (no dot)
///
/// If the row length is not a multiple of 8, the last byte is padded with
/// zeros (white) on the right.
///
/// ## Example
///
/// ```
/// use posprint::render::dither::pack_row;
///
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let num_bytes = pixels.len().div_ceil(8);
    let mut bytes = vec![0u8; num_bytes];

    for (i, &pixel) in pixels.iter().enumerate() {
        if pixel {
            let byte_idx = i / 8;
            let bit_idx = 7 - (i % 8); // MSB first
            bytes[byte_idx] |= 1 << bit_idx;
        }
    }

    bytes
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luminance_extremes() {
        assert_eq!(luminance(0, 0, 0), 0.0);
        assert!((luminance(255, 255, 255) - 255.0).abs() < 0.01);
        assert!((luminance(255, 0, 0) - 76.245).abs() < 0.01);
    }

    #[test]
    fn test_preclip() {
        assert_eq!(preclip(231.0), 255.0);
        assert_eq!(preclip(230.0), 230.0);
        assert_eq!(preclip(29.9), 0.0);
        assert_eq!(preclip(30.0), 30.0);
        assert_eq!(preclip(128.0), 128.0);
    }

    #[test]
    fn test_black_and_white_are_stable() {
        let mut black = vec![0.0; 64];
        assert!(floyd_steinberg(&mut black, 8, 8).iter().all(|&b| b));

        let mut white = vec![255.0; 64];
        assert!(floyd_steinberg(&mut white, 8, 8).iter().all(|&b| !b));
    }

    #[test]
    fn test_threshold_boundary() {
        // 128 is not below the threshold, so it stays white
        let mut gray = vec![128.0];
        assert_eq!(floyd_steinberg(&mut gray, 1, 1), vec![false]);

        let mut gray = vec![127.9];
        assert_eq!(floyd_steinberg(&mut gray, 1, 1), vec![true]);
    }

    #[test]
    fn test_error_propagates_right() {
        // 100 → black, error +100; right neighbour 100 + 43.75 → white
        let mut gray = vec![100.0, 100.0];
        let ink = floyd_steinberg(&mut gray, 2, 1);
        assert_eq!(ink, vec![true, false]);
        assert_eq!(gray, vec![0.0, 255.0]);
    }

    #[test]
    fn test_error_propagates_down() {
        // Single column: 5/16 of the error goes straight down
        let mut gray = vec![100.0, 100.0];
        let ink = floyd_steinberg(&mut gray, 1, 2);
        // 100 + 100 * 5/16 = 131.25 → white
        assert_eq!(ink, vec![true, false]);
    }

    #[test]
    fn test_mid_gray_prints_about_half() {
        let (w, h) = (32, 32);
        let mut gray = vec![127.5; w * h];
        let ink = floyd_steinberg(&mut gray, w, h);
        let count = ink.iter().filter(|&&b| b).count();
        assert!(
            (w * h * 4 / 10..=w * h * 6 / 10).contains(&count),
            "50% gray should ink about half the dots, got {}",
            count
        );
    }

    #[test]
    fn test_dither_is_deterministic() {
        let (w, h) = (40, 17);
        let source: Vec<f32> = (0..w * h).map(|i| ((i * 37) % 256) as f32).collect();

        let mut a = source.clone();
        let mut b = source;
        assert_eq!(floyd_steinberg(&mut a, w, h), floyd_steinberg(&mut b, w, h));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pack_row_8_pixels() {
        assert_eq!(pack_row(&[true; 8]), vec![0xFF]);
        assert_eq!(pack_row(&[false; 8]), vec![0x00]);
        assert_eq!(
            pack_row(&[true, false, true, false, true, false, true, false]),
            vec![0xAA]
        );
    }

    #[test]
    fn test_pack_row_padding() {
        assert_eq!(pack_row(&[true, true, true, true]), vec![0xF0]);

        let packed = pack_row(&[true; 9]);
        assert_eq!(packed, vec![0xFF, 0x80]);
    }

    #[test]
    fn test_pack_row_empty() {
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }
}
