//! # Printer Module
//!
//! Printer profiles and label configuration.
//!
//! ## Modules
//!
//! - [`config`]: Layout widths, transport tuning, and receipt labels

pub mod config;

pub use config::{PrinterProfile, ReceiptLabels};
