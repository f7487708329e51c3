//! # ESC/POS Raster Graphics
//!
//! Raster bit images print a packed monochrome bitmap directly under the
//! print head.
//!
//! ## Raster Data Layout
//!
//! Each row is `width_bytes` bytes. Within a byte the MSB is the leftmost
//! dot and a set bit prints black:
//!
//! ```text
//! Byte:    [b7 b6 b5 b4 b3 b2 b1 b0]
//! Pixels:  [x0 x1 x2 x3 x4 x5 x6 x7]
//! ```
//!
//! Rows follow each other top to bottom with no padding in between.

use super::commands::{GS, u16_le};

/// Raster mode `m = 0`: normal density, no scaling.
pub const RASTER_MODE_NORMAL: u8 = 0x00;

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH d1...dk |
/// | Hex     | 1D 76 30 00 xL xH yL yH ... |
///
/// ## Parameters
///
/// - `width_bytes`: bytes per row (`width_dots / 8`)
/// - `height`: number of rows
/// - `data`: `width_bytes * height` packed bytes
///
/// ## Example
///
/// ```
/// use posprint::protocol::graphics;
///
/// // 384 dots (48 bytes) wide, 2 rows
/// let data = vec![0xAA; 48 * 2];
/// let cmd = graphics::raster(48, 2, &data);
///
/// assert_eq!(&cmd[0..8], &[0x1D, 0x76, 0x30, 0x00, 48, 0, 2, 0]);
/// assert_eq!(cmd.len(), 8 + 96);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert!(
        data.len() == width_bytes as usize * height as usize,
        "Raster data length mismatch. Expected {} ({} bytes × {} rows), got {}",
        width_bytes as usize * height as usize,
        width_bytes,
        height,
        data.len()
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.push(GS);
    cmd.push(b'v');
    cmd.push(b'0');
    cmd.push(RASTER_MODE_NORMAL);
    cmd.push(xl);
    cmd.push(xh);
    cmd.push(yl);
    cmd.push(yh);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_header() {
        let data = vec![0xFF; 31 * 10];
        let cmd = raster(31, 10, &data);

        assert_eq!(cmd[0], 0x1D); // GS
        assert_eq!(cmd[1], 0x76); // 'v'
        assert_eq!(cmd[2], 0x30); // '0'
        assert_eq!(cmd[3], 0x00); // m
        assert_eq!(cmd[4], 31); // xL
        assert_eq!(cmd[5], 0); // xH
        assert_eq!(cmd[6], 10); // yL
        assert_eq!(cmd[7], 0); // yH
        assert_eq!(cmd.len(), 8 + 310);
    }

    #[test]
    fn test_raster_tall_image_height_le() {
        let height = 300u16; // 0x012C
        let data = vec![0x00; 48 * height as usize];
        let cmd = raster(48, height, &data);

        assert_eq!(cmd[6], 0x2C);
        assert_eq!(cmd[7], 0x01);
    }

    #[test]
    fn test_raster_single_byte() {
        assert_eq!(
            raster(1, 1, &[0xFF]),
            vec![0x1D, 0x76, 0x30, 0x00, 0x01, 0x00, 0x01, 0x00, 0xFF]
        );
    }

    #[test]
    fn test_raster_data_follows_header() {
        let data = vec![0x12, 0x34, 0x56, 0x78];
        let cmd = raster(2, 2, &data);
        assert_eq!(&cmd[8..], &data[..]);
    }
}
