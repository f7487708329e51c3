//! # RFCOMM Characteristic
//!
//! Many cheap "BLE" receipt printers are dual-mode and also expose a Serial
//! Port Profile channel. On Linux that channel is bound to a TTY, and this
//! adapter presents it as a [`GattCharacteristic`] so it goes through the
//! same chunked, delayed BLE send path.
//!
//! ## Bluetooth Setup (Linux)
//!
//! ```bash
//! # 1. Find and pair the printer
//! $ bluetoothctl
//! [bluetooth]# scan on
//! [bluetooth]# pair 66:22:XX:XX:XX:XX
//!
//! # 2. Bind to an RFCOMM device
//! $ sudo rfcomm bind 0 66:22:XX:XX:XX:XX
//! # This creates /dev/rfcomm0
//! ```
//!
//! ## TTY Configuration
//!
//! The device is opened in raw mode so binary data passes unmodified:
//! no input or output processing, 8-bit characters, no echo, non-canonical
//! mode, and no XON/XOFF flow control (0x11 and 0x13 occur in raster data).

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::ble::GattCharacteristic;
use crate::error::{PrintError, PrintResult, TransportError};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Serial-profile link presented as a write characteristic.
#[derive(Debug)]
pub struct RfcommCharacteristic {
    path: PathBuf,
    file: tokio::fs::File,
}

impl RfcommCharacteristic {
    /// Open and configure an RFCOMM TTY.
    ///
    /// ## Errors
    ///
    /// [`PrintError::DeviceNotConnected`] if the device does not exist, is not
    /// accessible (may need the `dialout` group), or rejects raw mode.
    pub fn open<P: AsRef<Path>>(device: P) -> PrintResult<Self> {
        let path = device.as_ref();

        let file = OpenOptions::new().write(true).open(path).map_err(|e| {
            PrintError::DeviceNotConnected(format!("Failed to open {}: {}", path.display(), e))
        })?;

        configure_tty_raw(&file).map_err(|e| {
            PrintError::DeviceNotConnected(format!("{}: {}", path.display(), e))
        })?;

        info!(device = %path.display(), "opened rfcomm device");
        Ok(Self {
            path: path.to_path_buf(),
            file: tokio::fs::File::from_std(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl GattCharacteristic for RfcommCharacteristic {
    async fn write_value(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.file.write_all(data).await?;
        // tty writes are acknowledged once the kernel has them
        self.file.flush().await?;
        Ok(())
    }
}

/// Configure a file descriptor for raw TTY mode.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
#[cfg(unix)]
fn configure_tty_raw(file: &fs::File) -> io::Result<()> {
    use std::mem::MaybeUninit;
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();

    let mut termios = MaybeUninit::uninit();
    // SAFETY: fd is an open descriptor and termios points to writable storage
    if unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    // SAFETY: tcgetattr succeeded and filled the struct
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);
    termios.c_oflag &= !libc::OPOST;
    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    // SAFETY: termios is fully initialized
    if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) } != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

/// Serial devices without termios are written as-is.
#[cfg(not(unix))]
fn configure_tty_raw(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

// ============================================================================
// RFCOMM DISCOVERY
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Find the RFCOMM device already bound to `mac`.
///
/// Reads `/proc/net/rfcomm` (lines like `rfcomm0: 66:22:... channel 1 clean`).
#[cfg(target_os = "linux")]
pub fn find_rfcomm_for_mac(mac: &str) -> Option<PathBuf> {
    let contents = fs::read_to_string("/proc/net/rfcomm").ok()?;
    let found = find_in_listing(&contents, mac)?;
    debug!(mac, device = %found.display(), "found bound rfcomm device");
    found.exists().then_some(found)
}

#[cfg(not(target_os = "linux"))]
pub fn find_rfcomm_for_mac(_mac: &str) -> Option<PathBuf> {
    None
}

#[cfg(any(target_os = "linux", test))]
fn find_in_listing(listing: &str, mac: &str) -> Option<PathBuf> {
    let mac = mac.to_uppercase();
    listing
        .lines()
        .filter(|line| line.to_uppercase().contains(&mac))
        .find_map(|line| line.split(':').next())
        .map(|dev| PathBuf::from(format!("/dev/{}", dev.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_mac() {
        assert!(is_valid_mac("66:22:0A:bc:DE:f0"));
        assert!(!is_valid_mac("66:22:0A:bc:DE"));
        assert!(!is_valid_mac("66:22:0A:bc:DE:g0"));
        assert!(!is_valid_mac("/dev/rfcomm0"));
    }

    #[test]
    fn test_find_in_listing() {
        let listing = "rfcomm0: 00:11:22:33:44:55 channel 1 clean\n\
                       rfcomm1: 66:22:0A:BC:DE:F0 channel 1 connected [tty-attached]\n";
        assert_eq!(
            find_in_listing(listing, "66:22:0a:bc:de:f0"),
            Some(PathBuf::from("/dev/rfcomm1"))
        );
        assert_eq!(find_in_listing(listing, "AA:BB:CC:DD:EE:FF"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_open_rejects_non_tty() {
        // Regular files have no termios; raw mode fails and the link is unusable
        let path = std::env::temp_dir().join(format!("posprint-rfcomm-{}", std::process::id()));
        std::fs::write(&path, b"").unwrap();

        let err = RfcommCharacteristic::open(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, PrintError::DeviceNotConnected(_)));
    }

    #[test]
    fn test_open_missing_device() {
        let err = RfcommCharacteristic::open("/nonexistent/rfcomm9").unwrap_err();
        assert!(matches!(err, PrintError::DeviceNotConnected(_)));
    }
}
