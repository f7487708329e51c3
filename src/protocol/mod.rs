//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS subset
//! understood by generic thermal receipt printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Printer control (init, feed, cut, cash drawer)
//! - [`text`]: Alignment, emphasis, size and ASCII sanitizing
//! - [`graphics`]: Raster bit images
//! - [`barcode`]: 1D barcodes
//!
//! ## Usage Example
//!
//! ```
//! use posprint::protocol::{commands, text};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(text::bold_on());
//! data.extend(text::to_ascii("RECEIPT"));
//! data.push(commands::LF);
//! data.extend(commands::feed_lines(commands::CUT_FEED_LINES));
//! data.extend(commands::cut_partial());
//! ```
//!
//! Every function here is pure: it returns the bytes for one command and
//! keeps no state. Stateful assembly lives in [`crate::encoder`].

pub mod barcode;
pub mod commands;
pub mod graphics;
pub mod text;
