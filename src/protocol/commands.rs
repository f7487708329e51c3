//! # ESC/POS Printer Control Commands
//!
//! This module implements the printer control subset of ESC/POS used by
//! generic 58mm/80mm thermal receipt printers.
//!
//! ## Protocol Overview
//!
//! ESC/POS commands are byte sequences introduced by one of two markers:
//!
//! - **ESC** (0x1B): printer control and text style
//! - **GS** (0x1D): paper cut, barcodes and raster graphics
//!
//! Everything that is not part of a command is printed as text. The printer
//! buffers text until a line feed (`LF`, 0x0A) arrives.
//!
//! ## Byte Order
//!
//! Multi-byte integers use **little-endian** encoding:
//! - `u16` value 0x1234 is sent as bytes `[0x34, 0x12]`

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for paper cut, barcode and raster bit-image commands.
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION COMMANDS
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets text modes to power-on defaults.
/// Every command buffer starts with this sequence.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
/// | Decimal | 27 64 |
///
/// ## Example
///
/// ```
/// use posprint::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED AND CUT
// ============================================================================

/// Line feeds emitted before the cutter engages.
///
/// The cutter sits a few lines above the print head; feeding four lines
/// moves the last printed line past the blade.
pub const CUT_FEED_LINES: usize = 4;

/// Print the line buffer and feed `count` lines.
#[inline]
pub fn feed_lines(count: usize) -> Vec<u8> {
    vec![LF; count]
}

/// # Partial Cut (GS V 66 0)
///
/// Feeds paper to the cutting position and performs a partial cut, leaving
/// a small hinge so the receipt does not drop.
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS V B NUL |
/// | Hex     | 1D 56 42 00 |
/// | Decimal | 29 86 66 0 |
///
/// `n = 0` requests no additional feed beyond the cutter offset; the
/// preceding line feeds take care of clearing the last printed line.
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', 0x42, 0x00]
}

// ============================================================================
// CASH DRAWER
// ============================================================================

/// Cash drawer connector pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerPin {
    /// Connector pin 2 (`m = 0`)
    Pin2 = 0,
    /// Connector pin 5 (`m = 1`)
    Pin5 = 1,
}

/// Pulse ON time in units of 2ms (25 → 50ms).
pub const PULSE_ON_TIME: u8 = 0x19;

/// Pulse OFF time in units of 2ms (250 → 500ms).
pub const PULSE_OFF_TIME: u8 = 0xFA;

/// # Generate Drawer Kick Pulse (ESC p m t1 t2)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC p m t1 t2 |
/// | Hex     | 1B 70 m 19 FA |
///
/// Drawers are wired to either pin, so both are pulsed when opening.
///
/// ## Example
///
/// ```
/// use posprint::protocol::commands::{pulse, DrawerPin};
///
/// assert_eq!(pulse(DrawerPin::Pin2), vec![0x1B, 0x70, 0x00, 0x19, 0xFA]);
/// assert_eq!(pulse(DrawerPin::Pin5), vec![0x1B, 0x70, 0x01, 0x19, 0xFA]);
/// ```
#[inline]
pub fn pulse(pin: DrawerPin) -> Vec<u8> {
    vec![ESC, b'p', pin as u8, PULSE_ON_TIME, PULSE_OFF_TIME]
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ## Example
///
/// ```
/// use posprint::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(384), [0x80, 0x01]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [value as u8, (value >> 8) as u8]
}

// ============================================================================
// TESTS
// ============================================================================
