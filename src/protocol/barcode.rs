//! # ESC/POS 1D Barcode Commands
//!
//! Receipts carry a single linear barcode (order or transaction number).
//! The printer renders the bars; the human readable text (HRI) is disabled
//! in firmware and printed by the caller as a normal text line, so it is
//! sanitized and aligned like any other text.
//!
//! ## Command Sequence
//!
//! ```text
//! GS w 2        module width 2 dots
//! GS h 80       bar height 80 dots
//! GS H 0        HRI off
//! GS k 73 n d1..dn
//! ```

use super::commands::GS;

/// Module width in dots (GS w n).
pub const MODULE_WIDTH: u8 = 0x02;

/// Bar height in dots (GS h n).
pub const BAR_HEIGHT: u8 = 0x50;

/// Symbology selector for GS k, function B (length-prefixed data).
pub const SYMBOLOGY: u8 = 73;

/// Set bar module width (GS w n)
#[inline]
pub fn set_module_width(n: u8) -> Vec<u8> {
    vec![GS, b'w', n]
}

/// Set bar height in dots (GS h n)
#[inline]
pub fn set_height(n: u8) -> Vec<u8> {
    vec![GS, b'h', n]
}

/// Disable printer-side HRI characters (GS H 0)
#[inline]
pub fn hri_off() -> Vec<u8> {
    vec![GS, b'H', 0x00]
}

/// Check that `data` can be sent as barcode content.
///
/// The length prefix is a single byte and the symbology only encodes
/// printable ASCII, so data must be 1..=255 bytes of `0x20..=0x7E`.
pub fn validate(data: &str) -> Result<(), String> {
    if data.is_empty() {
        return Err("barcode data is empty".to_string());
    }
    if data.len() > u8::MAX as usize {
        return Err(format!(
            "barcode data is {} bytes, maximum is {}",
            data.len(),
            u8::MAX
        ));
    }
    if let Some(c) = data.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(format!("barcode data contains unsupported character {:?}", c));
    }
    Ok(())
}

/// # Print Barcode (GS k m n d1...dn)
///
/// Emits the module width, height and HRI setup followed by the barcode
/// itself. `n` is the literal byte count of `data`. Run [`validate`] first;
/// this builder does not check its input.
///
/// ## Example
///
/// ```
/// use posprint::protocol::barcode;
///
/// barcode::validate("1234567890").unwrap();
/// let cmd = barcode::barcode(b"1234567890");
/// assert_eq!(&cmd[0..9], &[0x1D, 0x77, 0x02, 0x1D, 0x68, 0x50, 0x1D, 0x48, 0x00]);
/// assert_eq!(&cmd[9..13], &[0x1D, 0x6B, 0x49, 0x0A]);
/// assert_eq!(&cmd[13..], b"1234567890");
/// ```
pub fn barcode(data: &[u8]) -> Vec<u8> {
    debug_assert!(
        !data.is_empty() && data.len() <= u8::MAX as usize,
        "barcode data must be 1..=255 bytes, got {}",
        data.len()
    );

    let mut cmd = Vec::with_capacity(13 + data.len());
    cmd.extend(set_module_width(MODULE_WIDTH));
    cmd.extend(set_height(BAR_HEIGHT));
    cmd.extend(hri_off());
    cmd.push(GS);
    cmd.push(b'k');
    cmd.push(SYMBOLOGY);
    cmd.push(data.len() as u8);
    cmd.extend_from_slice(data);
    cmd
}

// ============================================================================
// TESTS
// ============================================================================
