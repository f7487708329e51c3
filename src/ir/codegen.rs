//! # Code Generation
//!
//! Converts IR programs to ESC/POS bytes.

use super::ops::{Op, Program};
use crate::protocol::{barcode, commands, graphics, text};

impl Program {
    /// Compile the IR program to ESC/POS bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.estimated_size());

        for op in &self.ops {
            match op {
                // ===== Printer Control =====
                Op::Init => {
                    out.extend(commands::init());
                }
                Op::Pulse(pin) => {
                    out.extend(commands::pulse(*pin));
                }
                Op::Cut => {
                    out.extend(commands::feed_lines(commands::CUT_FEED_LINES));
                    out.extend(commands::cut_partial());
                }

                // ===== Style Changes =====
                Op::SetAlign(align) => {
                    out.extend(text::align(*align));
                }
                Op::SetBold(enabled) => {
                    if *enabled {
                        out.extend(text::bold_on());
                    } else {
                        out.extend(text::bold_off());
                    }
                }
                Op::SetSize(size) => {
                    out.extend(text::size(*size));
                }

                // ===== Content =====
                Op::Text(s) => {
                    out.extend(text::to_ascii(s));
                }
                Op::Newline => {
                    out.push(commands::LF);
                }

                // ===== Graphics =====
                Op::Raster {
                    width_bytes,
                    height,
                    data,
                } => {
                    out.extend(graphics::raster(*width_bytes, *height, data));
                }

                // ===== Barcodes =====
                Op::Barcode(data) => {
                    out.extend(barcode::barcode(data.as_bytes()));
                }
            }
        }

        out
    }

    /// Rough output size, used to size the buffer up front.
    fn estimated_size(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Text(s) => s.len(),
                Op::Raster { data, .. } => 8 + data.len(),
                Op::Barcode(data) => 13 + data.len(),
                _ => 5,
            })
            .sum()
    }
}
