//! # ESC/POS Text Commands
//!
//! Alignment, emphasis and character size, plus the ASCII sanitizer applied
//! to every piece of text before it enters the command stream.
//!
//! | Style | Command | Hex |
//! |-------|---------|-----|
//! | Align | ESC a n | 1B 61 n |
//! | Bold | ESC E n | 1B 45 n |
//! | Print mode | ESC ! n | 1B 21 n |

use super::commands::ESC;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Set Justification (ESC a n)
///
/// Takes effect at the start of the next line and stays active until changed.
///
/// ## Example
///
/// ```
/// use posprint::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// EMPHASIS
// ============================================================================

/// Turn emphasized (bold) mode on (ESC E 1)
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 0x01]
}

/// Turn emphasized (bold) mode off (ESC E 0)
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0x00]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character size selected through the print mode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextSize {
    /// Font A, 1x1
    #[default]
    Normal,
    /// Double height and double width ("4-square")
    Large,
}

/// Print mode bits for double height (bit 4) and double width (bit 5).
const MODE_DOUBLE_HEIGHT: u8 = 0x10;
const MODE_DOUBLE_WIDTH: u8 = 0x20;

/// # Select Print Mode (ESC ! n)
///
/// | Size | Hex |
/// |------|-----|
/// | Normal | 1B 21 00 |
/// | Large | 1B 21 30 |
pub fn size(size: TextSize) -> Vec<u8> {
    let n = match size {
        TextSize::Normal => 0x00,
        TextSize::Large => MODE_DOUBLE_HEIGHT | MODE_DOUBLE_WIDTH,
    };
    vec![ESC, b'!', n]
}

// ============================================================================
// TEXT SANITIZING
// ============================================================================

/// Replacement for characters the printer cannot render.
pub const REPLACEMENT: u8 = b'?';

/// Convert text to printer bytes.
///
/// The firmware has no Unicode support, so every non-ASCII character is
/// replaced by a single `?`. ASCII control characters pass through untouched.
///
/// ## Example
///
/// ```
/// use posprint::protocol::text::to_ascii;
///
/// assert_eq!(to_ascii("Café"), b"Caf?".to_vec());
/// ```
pub fn to_ascii(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { REPLACEMENT })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align() {
        assert_eq!(align(Alignment::Left), vec![0x1B, 0x61, 0x00]);
        assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
        assert_eq!(align(Alignment::Right), vec![0x1B, 0x61, 0x02]);
    }

    #[test]
    fn test_bold() {
        assert_eq!(bold_on(), vec![0x1B, 0x45, 0x01]);
        assert_eq!(bold_off(), vec![0x1B, 0x45, 0x00]);
    }

    #[test]
    fn test_size() {
        assert_eq!(size(TextSize::Normal), vec![0x1B, 0x21, 0x00]);
        assert_eq!(size(TextSize::Large), vec![0x1B, 0x21, 0x30]);
    }

    #[test]
    fn test_to_ascii_passthrough() {
        assert_eq!(to_ascii("TOTAL: 10000"), b"TOTAL: 10000".to_vec());
        assert_eq!(to_ascii(""), Vec::<u8>::new());
    }

    #[test]
    fn test_to_ascii_replaces_each_char_once() {
        // 'é' is two bytes in UTF-8 but one character on paper
        assert_eq!(to_ascii("é"), vec![0x3F]);
        assert_eq!(to_ascii("• ok •"), b"? ok ?".to_vec());
        assert_eq!(to_ascii("Rp 5.000 ☕"), b"Rp 5.000 ?".to_vec());
    }
}
