//! # Printer Transport Layer
//!
//! Delivers a finished command buffer to the printer in bounded chunks.
//!
//! ## Available Transports
//!
//! - [`ble`]: Writes to a writable GATT characteristic
//! - [`usb`]: Bulk `transferOut` on the device's output endpoint
//!
//! Both are reached through [`TransportTarget`], a closed two-variant type
//! chosen once when the device handle is bound.
//!
//! ## Device Adapters (Linux)
//!
//! - [`rfcomm`]: Serial-profile Bluetooth printers via `/dev/rfcomm*`
//! - [`usblp`]: USB printers via the kernel `usblp` driver (`/dev/usb/lp*`)
//!
//! ## Flow Control
//!
//! ```text
//! buffer ──► [128 B] ──await ack──► progress ──► (BLE: sleep 25ms) ──► [128 B] ...
//! ```
//!
//! Each chunk write completes (the device acknowledged it) before the next
//! one starts, so there is no internal queue and chunks never reorder. A
//! failed write stops the transfer where it is: the printer may already have
//! printed part of the job.

pub mod ble;
pub mod rfcomm;
pub mod usb;
pub mod usblp;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::{PrintError, PrintResult, TransportError};
use crate::printer::PrinterProfile;

pub use ble::{BleTarget, GattCharacteristic};
pub use rfcomm::RfcommCharacteristic;
pub use usb::{
    Direction, UsbAlternate, UsbBulkDevice, UsbConfiguration, UsbEndpoint, UsbInterface, UsbTarget,
};
pub use usblp::UsbLpDevice;

// ============================================================================
// DEVICE HANDLES
// ============================================================================

/// Link type reported by device discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceKind {
    Ble,
    Usb,
    /// Anything else discovery might hand over (serial, network, ...)
    Other(String),
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Ble => write!(f, "ble"),
            DeviceKind::Usb => write!(f, "usb"),
            DeviceKind::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// Connected-device handle as produced by discovery and pairing.
///
/// The handle is loosely typed: its kind and its link endpoint are separate
/// fields and may disagree. [`TransportTarget::bind`] checks them once.
pub struct DeviceHandle {
    pub name: String,
    pub kind: DeviceKind,
    pub characteristic: Option<Box<dyn GattCharacteristic>>,
    pub usb_device: Option<Box<dyn UsbBulkDevice>>,
}

impl DeviceHandle {
    /// Handle for a BLE printer with a resolved writable characteristic.
    pub fn ble(name: impl Into<String>, characteristic: impl GattCharacteristic + 'static) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::Ble,
            characteristic: Some(Box::new(characteristic)),
            usb_device: None,
        }
    }

    /// Handle for an opened USB printer.
    pub fn usb(name: impl Into<String>, device: impl UsbBulkDevice + 'static) -> Self {
        Self {
            name: name.into(),
            kind: DeviceKind::Usb,
            characteristic: None,
            usb_device: Some(Box::new(device)),
        }
    }
}

impl fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceHandle")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("characteristic", &self.characteristic.is_some())
            .field("usb_device", &self.usb_device.is_some())
            .finish()
    }
}

// ============================================================================
// TRANSPORT TARGET
// ============================================================================

/// The bound link to one printer. Owned by a single job at a time.
#[derive(Debug)]
pub enum TransportTarget {
    Ble(BleTarget),
    Usb(UsbTarget),
}

impl TransportTarget {
    /// Convert a discovery handle into a target.
    ///
    /// ## Errors
    ///
    /// - [`PrintError::DeviceNotConnected`] if the handle's kind has no
    ///   matching characteristic or USB device
    /// - [`PrintError::UnsupportedDeviceType`] if the kind is neither BLE nor USB
    pub fn bind(handle: DeviceHandle) -> PrintResult<Self> {
        let DeviceHandle {
            name,
            kind,
            characteristic,
            usb_device,
        } = handle;

        let target = match kind {
            DeviceKind::Ble => {
                let characteristic = characteristic.ok_or_else(|| {
                    PrintError::DeviceNotConnected(format!(
                        "{}: Bluetooth characteristic not found",
                        name
                    ))
                })?;
                TransportTarget::Ble(BleTarget::new(name, characteristic))
            }
            DeviceKind::Usb => {
                let device = usb_device.ok_or_else(|| {
                    PrintError::DeviceNotConnected(format!("{}: USB interface not found", name))
                })?;
                TransportTarget::Usb(UsbTarget::new(name, device))
            }
            DeviceKind::Other(kind) => {
                return Err(PrintError::UnsupportedDeviceType(format!("{} ({})", name, kind)));
            }
        };

        debug!(target = ?target, "bound transport");
        Ok(target)
    }

    pub fn name(&self) -> &str {
        match self {
            TransportTarget::Ble(t) => t.name(),
            TransportTarget::Usb(t) => t.name(),
        }
    }

    pub fn kind(&self) -> DeviceKind {
        match self {
            TransportTarget::Ble(_) => DeviceKind::Ble,
            TransportTarget::Usb(_) => DeviceKind::Usb,
        }
    }

    /// Write one chunk and wait for the device to acknowledge it.
    pub async fn send(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        match self {
            TransportTarget::Ble(t) => t.write(chunk).await,
            TransportTarget::Usb(t) => t.transfer_out(chunk).await,
        }
    }

    /// Pause after each chunk. Only BLE needs one.
    pub fn chunk_delay(&self, profile: &PrinterProfile) -> Duration {
        match self {
            TransportTarget::Ble(_) => profile.ble_chunk_delay(),
            TransportTarget::Usb(_) => Duration::ZERO,
        }
    }
}

// ============================================================================
// PROGRESS
// ============================================================================

/// Receives integer percentages, non-decreasing, ending at 100 on success.
pub trait ProgressSink {
    fn report(&mut self, percent: u8);
}

impl<F: FnMut(u8)> ProgressSink for F {
    fn report(&mut self, percent: u8) {
        self(percent)
    }
}

impl ProgressSink for tokio::sync::mpsc::UnboundedSender<u8> {
    fn report(&mut self, percent: u8) {
        // Receiver gone means nobody is watching
        let _ = self.send(percent);
    }
}

impl ProgressSink for tokio::sync::watch::Sender<u8> {
    fn report(&mut self, percent: u8) {
        self.send_replace(percent);
    }
}

/// Discards progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: u8) {}
}

/// Percentage of `sent` over `total`, rounded half up, at most 100.
///
/// ```
/// use posprint::transport::progress_percent;
///
/// assert_eq!(progress_percent(128, 300), 43);
/// assert_eq!(progress_percent(256, 300), 85);
/// assert_eq!(progress_percent(300, 300), 100);
/// assert_eq!(progress_percent(1, 200), 1);
/// ```
pub fn progress_percent(sent: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent as u128;
    let total = total as u128;
    let percent = (sent * 200 + total) / (2 * total);
    percent.min(100) as u8
}

// ============================================================================
// CANCELLATION
// ============================================================================

/// Cooperative cancel flag, checked before each chunk.
///
/// Cancelling never interrupts a chunk that is already being written.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

// ============================================================================
// CHUNKED SEND
// ============================================================================

/// Send `data` to `target` in `profile.chunk_size` pieces.
///
/// ## Order of Events per Chunk
///
/// 1. Stop with [`PrintError::Cancelled`] if `cancel` is set
/// 2. Write the chunk and await the acknowledgment (bounded by
///    `profile.chunk_timeout()` when set)
/// 3. Report progress
/// 4. On BLE, sleep for `profile.ble_chunk_delay()`
///
/// ## Errors
///
/// Every error carries the number of bytes already acknowledged. Nothing is
/// retried.
#[instrument(skip_all, fields(device = %target.name(), kind = %target.kind(), total = data.len()))]
pub async fn send_buffer<P: ProgressSink + ?Sized>(
    target: &mut TransportTarget,
    data: &[u8],
    profile: &PrinterProfile,
    progress: &mut P,
    cancel: Option<&CancelToken>,
) -> PrintResult<()> {
    let total = data.len();
    let chunk_size = profile.chunk_size.max(1);
    let delay = target.chunk_delay(profile);
    let timeout = profile.chunk_timeout();
    let mut sent = 0;

    info!(chunk_size, chunks = total.div_ceil(chunk_size), "sending");

    for (index, chunk) in data.chunks(chunk_size).enumerate() {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            warn!(bytes_sent = sent, "cancelled");
            return Err(PrintError::Cancelled { bytes_sent: sent });
        }

        let write = target.send(chunk);
        let result = match timeout {
            Some(limit) => tokio::time::timeout(limit, write).await.map_err(|_| {
                warn!(chunk = index, bytes_sent = sent, "chunk write timed out");
                PrintError::Timeout {
                    bytes_sent: sent,
                    chunk_index: index,
                }
            })?,
            None => write.await,
        };

        result.map_err(|source| {
            warn!(chunk = index, bytes_sent = sent, error = %source, "chunk write failed");
            PrintError::TransportWrite {
                bytes_sent: sent,
                source,
            }
        })?;

        sent += chunk.len();
        let percent = progress_percent(sent, total);
        debug!(chunk = index, len = chunk.len(), sent, percent, "chunk acknowledged");
        progress.report(percent);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    if total == 0 {
        progress.report(100);
    }

    info!(bytes = sent, "transfer complete");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
