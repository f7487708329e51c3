//! # BLE Transport
//!
//! Writes chunks to a previously resolved writable GATT characteristic.
//!
//! Generic thermal printers expose a single write characteristic (commonly
//! service `0x18F0`, characteristic `0x2AF1`). The write call completing is
//! the acknowledgment; the extra inter-chunk delay lives in
//! [`super::send_buffer`].

use std::fmt;

use async_trait::async_trait;
use tracing::trace;

use crate::error::TransportError;

/// A writable characteristic on a connected BLE printer.
#[async_trait]
pub trait GattCharacteristic: Send {
    /// Write `data` and resolve once the stack confirms delivery.
    async fn write_value(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

/// BLE half of [`super::TransportTarget`].
pub struct BleTarget {
    name: String,
    characteristic: Box<dyn GattCharacteristic>,
}

impl BleTarget {
    pub fn new(name: String, characteristic: Box<dyn GattCharacteristic>) -> Self {
        Self {
            name,
            characteristic,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), TransportError> {
        trace!(len = chunk.len(), "gatt write");
        self.characteristic.write_value(chunk).await
    }
}

impl fmt::Debug for BleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BleTarget").field("name", &self.name).finish()
    }
}
