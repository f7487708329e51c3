//! # Error Types
//!
//! This module defines the error taxonomy of the print pipeline.
//!
//! ## Where Errors Happen
//!
//! | Stage | Errors | Printer touched? |
//! |-------|--------|------------------|
//! | Binding the device | `DeviceNotConnected`, `UnsupportedDeviceType` | No |
//! | Rasterizing images | `ImageProcessing` | No |
//! | Encoding commands | `Encoding` | No |
//! | Sending chunks | `TransportWrite`, `Cancelled`, `Timeout` | Possibly |
//!
//! The whole command buffer is built before the first byte is sent, so
//! rendering failures never reach the printer. Transport failures can happen
//! mid-stream: paper cannot be rolled back, and a partially printed receipt
//! may be left in the printer. Nothing here retries; that decision belongs
//! to the caller.

use thiserror::Error;

/// Failure of a single chunk write on the physical link.
///
/// Wraps whatever reason the underlying characteristic write or USB
/// `transferOut` gave for rejecting the data.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The device rejected the write
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The link went away while writing
    #[error("device disconnected")]
    Disconnected,

    /// I/O error from a file-backed device
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main error type for print jobs
#[derive(Debug, Error)]
pub enum PrintError {
    /// No transport is bound, or the handle lacks its link endpoint
    #[error("Device not connected: {0}")]
    DeviceNotConnected(String),

    /// The device handle is neither BLE nor USB
    #[error("Unsupported device type: {0}")]
    UnsupportedDeviceType(String),

    /// Source image could not be decoded or rasterized
    #[error("Image error: {0}")]
    ImageProcessing(String),

    /// A chunk write was rejected by the device
    #[error("Transport error after {bytes_sent} bytes: {source}")]
    TransportWrite {
        bytes_sent: usize,
        #[source]
        source: TransportError,
    },

    /// Malformed input to the command encoder
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The job was cancelled between chunks
    #[error("Print cancelled after {bytes_sent} bytes")]
    Cancelled { bytes_sent: usize },

    /// A chunk write did not complete in time
    #[error("Chunk {chunk_index} timed out after {bytes_sent} bytes")]
    Timeout { bytes_sent: usize, chunk_index: usize },
}

impl PrintError {
    /// Whether the error was raised before any byte reached the printer.
    ///
    /// When this returns `true` the physical printer is untouched. Otherwise
    /// a partially printed receipt may be sitting in the printer.
    pub fn is_pre_transmission(&self) -> bool {
        match self {
            PrintError::DeviceNotConnected(_)
            | PrintError::UnsupportedDeviceType(_)
            | PrintError::ImageProcessing(_)
            | PrintError::Encoding(_) => true,
            PrintError::Cancelled { bytes_sent } => *bytes_sent == 0,
            PrintError::TransportWrite { .. } | PrintError::Timeout { .. } => false,
        }
    }
}

/// Result type for print operations
pub type PrintResult<T> = Result<T, PrintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_errors_are_pre_transmission() {
        assert!(PrintError::ImageProcessing("bad png".into()).is_pre_transmission());
        assert!(PrintError::Encoding("empty barcode".into()).is_pre_transmission());
        assert!(PrintError::DeviceNotConnected("no handle".into()).is_pre_transmission());
        assert!(PrintError::UnsupportedDeviceType("serial".into()).is_pre_transmission());
    }

    #[test]
    fn test_mid_stream_errors() {
        let err = PrintError::TransportWrite {
            bytes_sent: 256,
            source: TransportError::Disconnected,
        };
        assert!(!err.is_pre_transmission());
        assert!(!PrintError::Cancelled { bytes_sent: 128 }.is_pre_transmission());

        // A rejected first chunk may still have been partially consumed
        let first = PrintError::TransportWrite {
            bytes_sent: 0,
            source: TransportError::Rejected("GATT error".into()),
        };
        assert!(!first.is_pre_transmission());

        // Cancelled before the first chunk never touched the printer
        assert!(PrintError::Cancelled { bytes_sent: 0 }.is_pre_transmission());
    }

    #[test]
    fn test_transport_error_message_wraps_reason() {
        let err = PrintError::TransportWrite {
            bytes_sent: 128,
            source: TransportError::Rejected("NetworkError".into()),
        };
        assert_eq!(
            err.to_string(),
            "Transport error after 128 bytes: write rejected: NetworkError"
        );
    }
}
