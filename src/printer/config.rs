//! # Printer Configuration
//!
//! Empirical constants for generic ESC/POS thermal printers, gathered into one
//! value that is passed explicitly to every job.
//!
//! ## Built-in Profiles
//!
//! | Profile | Paper | Columns | Full width | Logo width |
//! |---------|-------|---------|------------|------------|
//! | `mm58` (default) | 58mm | 32 | 384 dots | 250 dots |
//! | `mm80` | 80mm | 48 | 576 dots | 250 dots |
//!
//! ## Usage
//!
//! ```
//! use posprint::printer::PrinterProfile;
//!
//! let profile = PrinterProfile::default();
//! assert_eq!(profile.columns, 32);
//! assert_eq!(profile.chunk_size, 128);
//! assert_eq!(profile.ble_chunk_delay().as_millis(), 25);
//! ```
//!
//! Profiles are plain serde values, so they load from JSON with any subset of
//! fields present:
//!
//! ```
//! use posprint::printer::PrinterProfile;
//!
//! let profile: PrinterProfile = serde_json::from_str(r#"{"columns": 48}"#).unwrap();
//! assert_eq!(profile.columns, 48);
//! assert_eq!(profile.full_width_dots, 384);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// # Printer Profile
///
/// ## Layout
///
/// - **columns**: characters per line in Font A
/// - **full_width_dots**: target width for full-width image jobs
/// - **logo_width_dots**: target width for receipt logos
///
/// ## Transport Tuning
///
/// - **chunk_size**: bytes per write, kept under typical BLE MTU limits
/// - **ble_chunk_delay_ms**: pause after every BLE chunk so the printer can
///   drain its receive buffer (USB never waits)
/// - **chunk_timeout_ms**: optional upper bound on a single chunk write
///
/// ## Formatting
///
/// - **thousands_separator**: digit grouping for amounts (`None` prints
///   plain integers)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterProfile {
    /// Profile name, shown in logs
    pub name: String,

    /// Characters per text line
    pub columns: usize,

    /// Raster width for full-width images, in dots
    pub full_width_dots: usize,

    /// Raster width for receipt logos, in dots
    pub logo_width_dots: usize,

    /// Maximum bytes per transport write
    pub chunk_size: usize,

    /// Delay after each BLE chunk, in milliseconds
    pub ble_chunk_delay_ms: u64,

    /// Per-chunk write timeout, in milliseconds
    pub chunk_timeout_ms: Option<u64>,

    /// Thousands separator for amounts
    pub thousands_separator: Option<char>,
}

impl PrinterProfile {
    /// # Generic 58mm Printer
    ///
    /// ```text
    /// ├─ 5mm ─┼──── 48mm printable ────┼─ 5mm ─┤
    /// │       │  384 dots / 32 chars   │       │
    /// ```
    pub fn mm58() -> Self {
        Self {
            name: "Generic 58mm".to_string(),
            columns: 32,
            full_width_dots: 384,
            logo_width_dots: 250,
            chunk_size: 128,
            ble_chunk_delay_ms: 25,
            chunk_timeout_ms: None,
            thousands_separator: None,
        }
    }

    /// # Generic 80mm Printer
    ///
    /// 72mm printable, 576 dots, 48 characters per line.
    pub fn mm80() -> Self {
        Self {
            name: "Generic 80mm".to_string(),
            columns: 48,
            full_width_dots: 576,
            ..Self::mm58()
        }
    }

    /// Parse a built-in profile name (`"mm58"`, `"58mm"`, `"mm80"`, `"80mm"`).
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "mm58" | "58mm" | "58" => Ok(Self::mm58()),
            "mm80" | "80mm" | "80" => Ok(Self::mm80()),
            other => Err(format!(
                "Unknown profile '{}'. Use 'mm58' or 'mm80', or pass a JSON file",
                other
            )),
        }
    }

    /// Load a profile from a JSON file. Missing fields take the 58mm defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        serde_json::from_str(&text)
            .map_err(|e| format!("Invalid profile {}: {}", path.display(), e))
    }

    #[inline]
    pub fn ble_chunk_delay(&self) -> Duration {
        Duration::from_millis(self.ble_chunk_delay_ms)
    }

    #[inline]
    pub fn chunk_timeout(&self) -> Option<Duration> {
        self.chunk_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for PrinterProfile {
    fn default() -> Self {
        Self::mm58()
    }
}

// ============================================================================
// RECEIPT LABELS
// ============================================================================

/// Fixed strings printed by the receipt renderer.
///
/// Amounts are appended directly after the prefix, so `discount_prefix`
/// carries its own minus sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptLabels {
    pub discount_prefix: String,
    pub tax_prefix: String,
    pub total_prefix: String,
    /// Printed under the signature rule
    pub signature: String,
    /// Centered line at the bottom of every receipt unless suppressed
    pub attribution: String,
}

impl Default for ReceiptLabels {
    fn default() -> Self {
        Self {
            discount_prefix: "Discount: -".to_string(),
            tax_prefix: "Tax: ".to_string(),
            total_prefix: "TOTAL: ".to_string(),
            signature: "   Signature   ".to_string(),
            attribution: "* Printed with posprint *".to_string(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
