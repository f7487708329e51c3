//! # posprint - ESC/POS Receipt Printing Pipeline
//!
//! posprint turns print jobs into byte-exact ESC/POS command streams for
//! generic 58mm/80mm thermal printers and delivers them over BLE or USB in
//! acknowledged chunks. It provides:
//!
//! - **Protocol implementation**: ESC/POS command builders
//! - **Command encoder**: fluent builder producing immutable buffers
//! - **Rasterizer**: Floyd–Steinberg dithering to 1-bit bitmaps
//! - **Receipts**: fixed-column receipt layout and a diagnostic test page
//! - **Transport**: chunked BLE/USB delivery with progress and cancellation
//!
//! ## Quick Start
//!
//! ```no_run
//! use posprint::{
//!     job::{self, PrintJob},
//!     printer::{PrinterProfile, ReceiptLabels},
//!     receipt::{LineItem, PrintOptions, ReceiptDocument},
//!     transport::{DeviceHandle, RfcommCharacteristic, TransportTarget},
//! };
//!
//! # async fn run() -> posprint::PrintResult<()> {
//! let characteristic = RfcommCharacteristic::open("/dev/rfcomm0")?;
//! let mut target = TransportTarget::bind(DeviceHandle::ble("MPT-II", characteristic))?;
//!
//! let doc = ReceiptDocument::new("WARUNG KITA", "18/10/2026 09:15")
//!     .with_rates(vec![LineItem::new("Kopi", 2, 5000)], 0, 11)?;
//! let job = PrintJob::Receipt(doc, PrintOptions::default());
//!
//! let mut progress = |percent: u8| eprintln!("{}%", percent);
//! job::print(
//!     Some(&mut target),
//!     &job,
//!     &PrinterProfile::default(),
//!     &ReceiptLabels::default(),
//!     &mut progress,
//!     None,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | ESC/POS command builders |
//! | [`ir`] | Encoder operations and code generation |
//! | [`encoder`] | Job-scoped command encoder |
//! | [`render`] | Image decoding, dithering, bit packing |
//! | [`receipt`] | Receipt model, layout, test page |
//! | [`transport`] | Device binding and chunked delivery |
//! | [`job`] | Job orchestration |
//! | [`printer`] | Printer profiles and labels |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Generic ESC/POS thermal printers (58mm, 32 columns by default) reached
//! through a BLE write characteristic, an RFCOMM serial link, or USB.

pub mod encoder;
pub mod error;
pub mod ir;
pub mod job;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod render;
pub mod transport;

// Re-exports for convenience
pub use encoder::{CommandBuffer, CommandEncoder};
pub use error::{PrintError, PrintResult, TransportError};
pub use job::PrintJob;
pub use printer::{PrinterProfile, ReceiptLabels};
pub use transport::TransportTarget;
