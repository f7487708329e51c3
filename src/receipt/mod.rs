//! # Receipts
//!
//! Structured sales receipts and the diagnostic test page.
//!
//! ## Modules
//!
//! - [`document`]: Receipt data model and print options
//! - [`render`]: Fixed-column layout into a command buffer
//! - [`test_page`]: Hardcoded diagnostic receipt
//!
//! ## Example
//!
//! ```
//! use posprint::printer::{PrinterProfile, ReceiptLabels};
//! use posprint::receipt::{LineItem, PrintOptions, ReceiptDocument, ReceiptRenderer};
//!
//! let doc = ReceiptDocument::new("WARUNG KITA", "18/10/2026")
//!     .with_rates(vec![LineItem::new("Kopi", 2, 5000)], 0, 0)
//!     .unwrap();
//!
//! let profile = PrinterProfile::default();
//! let labels = ReceiptLabels::default();
//! let buffer = ReceiptRenderer::new(&profile, &labels)
//!     .render(&doc, &PrintOptions::default())
//!     .unwrap();
//! assert!(buffer.as_bytes().ends_with(&[0x1D, 0x56, 0x42, 0x00]));
//! ```

pub mod document;
pub mod render;
pub mod test_page;

pub use document::{Density, LineItem, PrintOptions, ReceiptDocument, ReceiptStyle};
pub use render::{ReceiptRenderer, format_amount};
pub use test_page::{TestPageInfo, render_test_page};
