//! USB printers through the kernel `usblp` driver.
//!
//! The driver claims the printer interface and exposes its bulk-out pipe as
//! `/dev/usb/lp0`. Every write is a bulk transfer; the endpoint number the
//! transport resolves is only recorded for logging.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, trace};

use super::usb::{UsbBulkDevice, UsbConfiguration};
use crate::error::{PrintError, PrintResult, TransportError};

/// Default usblp device path
pub const DEFAULT_DEVICE: &str = "/dev/usb/lp0";

#[derive(Debug)]
pub struct UsbLpDevice {
    path: PathBuf,
    file: tokio::fs::File,
    configuration: UsbConfiguration,
}

impl UsbLpDevice {
    /// Open a usblp character device for writing.
    pub async fn open<P: AsRef<Path>>(device: P) -> PrintResult<Self> {
        let path = device.as_ref();
        let file = OpenOptions::new().write(true).open(path).await.map_err(|e| {
            PrintError::DeviceNotConnected(format!("Failed to open {}: {}", path.display(), e))
        })?;

        info!(device = %path.display(), "opened usblp device");
        Ok(Self {
            path: path.to_path_buf(),
            file,
            configuration: UsbConfiguration::single_out(1),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UsbBulkDevice for UsbLpDevice {
    fn configuration(&self) -> Option<&UsbConfiguration> {
        Some(&self.configuration)
    }

    async fn transfer_out(&mut self, endpoint: u8, data: &[u8]) -> Result<(), TransportError> {
        trace!(endpoint, len = data.len(), "usblp write");
        self.file.write_all(data).await?;
        self.file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_reach_file() {
        let path = std::env::temp_dir().join(format!("posprint-usblp-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let mut device = UsbLpDevice::open(&path).await.unwrap();
        device.transfer_out(1, &[0x1B, 0x40]).await.unwrap();
        device.transfer_out(1, b"hi").await.unwrap();
        drop(device);

        assert_eq!(std::fs::read(&path).unwrap(), b"\x1B\x40hi");
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_device() {
        let err = UsbLpDevice::open("/nonexistent/lp9").await.unwrap_err();
        assert!(matches!(err, PrintError::DeviceNotConnected(_)));
    }
}
