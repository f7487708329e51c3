//! # Command Encoder
//!
//! Stateful, job-scoped builder for ESC/POS command buffers.
//!
//! The encoder records every call as an IR [`Op`] and compiles the program
//! once, in [`CommandEncoder::finalize`]. The resulting [`CommandBuffer`] is
//! immutable: it cannot be appended to, and cloning it shares the bytes.
//!
//! ## Example
//!
//! ```
//! use posprint::encoder::CommandEncoder;
//! use posprint::protocol::text::{Alignment, TextSize};
//!
//! let mut enc = CommandEncoder::new();
//! enc.align(Alignment::Center)
//!     .bold(true)
//!     .size(TextSize::Large)
//!     .text("WARUNG KITA")
//!     .newline()
//!     .size(TextSize::Normal)
//!     .bold(false)
//!     .line('-')
//!     .cut();
//!
//! let buffer = enc.finalize();
//! assert!(buffer.as_bytes().starts_with(&[0x1B, 0x40]));
//! assert!(buffer.as_bytes().ends_with(&[0x1D, 0x56, 0x42, 0x00]));
//! ```

use std::ops::Deref;
use std::sync::Arc;

use crate::error::{PrintError, PrintResult};
use crate::ir::{Op, Program};
use crate::protocol::barcode;
use crate::protocol::commands::{CUT_FEED_LINES, DrawerPin};
use crate::protocol::text::{Alignment, TextSize};
use crate::render::raster::MonochromeBitmap;

/// Characters per line on 58mm paper with Font A.
pub const DEFAULT_COLUMNS: usize = 32;

/// # Command Encoder
///
/// Every buffer it produces starts with the initialize sequence (ESC @),
/// which is recorded when the encoder is created.
///
/// An encoder belongs to one job. It is consumed by [`finalize`], so it can
/// never be reused for a second job or read while it is still being built.
///
/// [`finalize`]: CommandEncoder::finalize
#[derive(Debug, Clone)]
pub struct CommandEncoder {
    program: Program,
    columns: usize,
}

impl CommandEncoder {
    /// Create an encoder for the default 32-column layout.
    pub fn new() -> Self {
        Self::with_columns(DEFAULT_COLUMNS)
    }

    /// Create an encoder for a given number of text columns.
    pub fn with_columns(columns: usize) -> Self {
        Self {
            program: Program::with_init(),
            columns,
        }
    }

    /// Text columns used by [`line`](Self::line).
    pub fn columns(&self) -> usize {
        self.columns
    }

    // === Text Output ===

    /// Write text. Non-ASCII characters are printed as `?`.
    pub fn text(&mut self, s: &str) -> &mut Self {
        self.program.push(Op::Text(s.to_string()));
        self
    }

    /// Write a single line feed
    pub fn newline(&mut self) -> &mut Self {
        self.program.push(Op::Newline);
        self
    }

    /// Write `count` line feeds
    pub fn newlines(&mut self, count: usize) -> &mut Self {
        self.program.extend(std::iter::repeat_n(Op::Newline, count));
        self
    }

    /// Write text followed by a line feed
    pub fn text_line(&mut self, s: &str) -> &mut Self {
        self.text(s).newline()
    }

    /// Repeat `ch` across the full line width, then feed.
    pub fn line(&mut self, ch: char) -> &mut Self {
        let rule: String = std::iter::repeat_n(ch, self.columns).collect();
        self.text_line(&rule)
    }

    // === Style ===

    pub fn align(&mut self, alignment: Alignment) -> &mut Self {
        self.program.push(Op::SetAlign(alignment));
        self
    }

    pub fn bold(&mut self, enabled: bool) -> &mut Self {
        self.program.push(Op::SetBold(enabled));
        self
    }

    pub fn size(&mut self, size: TextSize) -> &mut Self {
        self.program.push(Op::SetSize(size));
        self
    }

    // === Paper Control ===

    /// Feed four lines, then partial cut.
    pub fn cut(&mut self) -> &mut Self {
        self.program.push(Op::Cut);
        self
    }

    /// Feed the same four lines as [`cut`](Self::cut) without cutting.
    pub fn feed_without_cut(&mut self) -> &mut Self {
        self.newlines(CUT_FEED_LINES)
    }

    // === Cash Drawer ===

    /// Kick the cash drawer on pin 2, then pin 5.
    pub fn pulse(&mut self) -> &mut Self {
        self.program.push(Op::Pulse(DrawerPin::Pin2));
        self.program.push(Op::Pulse(DrawerPin::Pin5));
        self
    }

    // === Barcodes and Graphics ===

    /// Print a 1D barcode.
    ///
    /// Fails with [`PrintError::Encoding`] if the data is empty, longer than
    /// 255 bytes, or contains anything but printable ASCII.
    pub fn barcode(&mut self, data: &str) -> PrintResult<&mut Self> {
        barcode::validate(data).map_err(PrintError::Encoding)?;
        self.program.push(Op::Barcode(data.to_string()));
        Ok(self)
    }

    /// Blit a monochrome bitmap as a raster bit image.
    ///
    /// Fails with [`PrintError::Encoding`] if either dimension does not fit
    /// the 16-bit fields of the raster header.
    pub fn image(&mut self, bitmap: &MonochromeBitmap) -> PrintResult<&mut Self> {
        let width_bytes = u16::try_from(bitmap.width_bytes()).map_err(|_| {
            PrintError::Encoding(format!("bitmap width {} is too wide", bitmap.width()))
        })?;
        let height = u16::try_from(bitmap.height()).map_err(|_| {
            PrintError::Encoding(format!("bitmap height {} is too tall", bitmap.height()))
        })?;
        self.program.push(Op::Raster {
            width_bytes,
            height,
            data: bitmap.data().to_vec(),
        });
        Ok(self)
    }

    // === Build ===

    /// Inspect the recorded operations.
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Compile the recorded operations into an immutable buffer.
    pub fn finalize(self) -> CommandBuffer {
        CommandBuffer {
            bytes: self.program.to_bytes().into(),
        }
    }
}

impl Default for CommandEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Finished ESC/POS byte stream for one job.
///
/// Only [`CommandEncoder::finalize`] creates one, so every buffer starts with
/// ESC @. Clones share the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Arc<[u8]>,
}

impl CommandBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl Deref for CommandBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for CommandBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_encoder_is_init() {
        let buffer = CommandEncoder::new().finalize();
        assert_eq!(buffer.as_bytes(), &[0x1B, 0x40]);
    }

    #[test]
    fn test_line_repeats_column_width() {
        let mut enc = CommandEncoder::new();
        enc.line('-');
        let buffer = enc.finalize();

        let mut expected = vec![0x1B, 0x40];
        expected.extend(std::iter::repeat_n(b'-', 32));
        expected.push(0x0A);
        assert_eq!(buffer.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_line_honors_custom_columns() {
        let mut enc = CommandEncoder::with_columns(48);
        enc.line('=');
        assert_eq!(enc.finalize().len(), 2 + 48 + 1);
    }

    #[test]
    fn test_cut_vs_feed_only() {
        let mut cut = CommandEncoder::new();
        cut.cut();
        assert_eq!(
            cut.finalize().as_bytes(),
            &[0x1B, 0x40, 0x0A, 0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x42, 0x00]
        );

        let mut feed = CommandEncoder::new();
        feed.feed_without_cut();
        assert_eq!(
            feed.finalize().as_bytes(),
            &[0x1B, 0x40, 0x0A, 0x0A, 0x0A, 0x0A]
        );
    }

    #[test]
    fn test_non_ascii_becomes_question_mark() {
        let mut enc = CommandEncoder::new();
        enc.text("é");
        assert_eq!(enc.finalize().as_bytes(), &[0x1B, 0x40, 0x3F]);
    }

    #[test]
    fn test_barcode_then_hri_text() {
        let mut enc = CommandEncoder::new();
        enc.barcode("1234567890").unwrap().text_line("1234567890");
        let bytes = enc.finalize();

        let mut expected = vec![0x1B, 0x40];
        expected.extend([0x1D, 0x77, 0x02, 0x1D, 0x68, 0x50, 0x1D, 0x48, 0x00]);
        expected.extend([0x1D, 0x6B, 0x49, 0x0A]);
        expected.extend(b"1234567890");
        expected.extend(b"1234567890\n");
        assert_eq!(bytes.as_bytes(), &expected[..]);
    }

    #[test]
    fn test_invalid_barcode_is_encoding_error() {
        let mut enc = CommandEncoder::new();
        let err = enc.barcode("").unwrap_err();
        assert!(matches!(err, PrintError::Encoding(_)));
        // Nothing was recorded for the failed call
        assert_eq!(enc.program().len(), 1);
    }

    #[test]
    fn test_image_blit() {
        let bitmap = MonochromeBitmap::from_packed(16, 1, vec![0xF0, 0x0F]).unwrap();
        let mut enc = CommandEncoder::new();
        enc.image(&bitmap).unwrap();
        assert_eq!(
            enc.finalize().as_bytes(),
            &[0x1B, 0x40, 0x1D, 0x76, 0x30, 0x00, 0x02, 0x00, 0x01, 0x00, 0xF0, 0x0F]
        );
    }

    #[test]
    fn test_image_too_tall() {
        let height = u16::MAX as usize + 1;
        let bitmap = MonochromeBitmap::from_packed(8, height, vec![0; height]).unwrap();
        let mut enc = CommandEncoder::new();
        assert!(matches!(
            enc.image(&bitmap).unwrap_err(),
            PrintError::Encoding(_)
        ));
    }

    #[test]
    fn test_buffer_clone_shares_bytes() {
        let buffer = CommandEncoder::new().finalize();
        let copy = buffer.clone();
        assert_eq!(buffer, copy);
        assert_eq!(&*copy, &[0x1B, 0x40]);
    }
}
