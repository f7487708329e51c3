//! # Receipt Renderer
//!
//! Lays a [`ReceiptDocument`] out on a fixed character grid and records it
//! into a [`CommandEncoder`].
//!
//! ## Layout (32 columns)
//!
//! ```text
//!            [logo]
//!          WARUNG KITA            ← bold, double size
//!          Jl. Melati 4
//!        18/10/2026 09:15
//! --------------------------------
//! Kopi
//! 2x5000                     10000
//! --------------------------------
//!                  Discount: -1000
//!                      Tax: 990
//!                   TOTAL: 9990   ← bold
//!
//!                  _______________
//!                     Signature
//!
//!          Thank you!
//!        [barcode] INV-0042
//!    * Printed with posprint *
//! ```

use tracing::{debug, instrument};

use super::document::{LineItem, PrintOptions, ReceiptDocument};
use crate::encoder::{CommandBuffer, CommandEncoder};
use crate::error::{PrintError, PrintResult};
use crate::printer::{PrinterProfile, ReceiptLabels};
use crate::protocol::text::{Alignment, TextSize};
use crate::render::raster;

/// Width of the signature rule, in characters.
const SIGNATURE_WIDTH: usize = 15;

/// Blank run printed above the signature rule.
const SIGNATURE_SPACER: usize = 10;

/// Format an amount, grouping thousands when a separator is given.
///
/// ```
/// use posprint::receipt::format_amount;
///
/// assert_eq!(format_amount(1234567, None), "1234567");
/// assert_eq!(format_amount(1234567, Some('.')), "1.234.567");
/// assert_eq!(format_amount(500, Some(',')), "500");
/// ```
pub fn format_amount(amount: u64, separator: Option<char>) -> String {
    let digits = amount.to_string();
    let Some(sep) = separator else {
        return digits;
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Lay out `left` and `right` on one line of `columns` characters.
///
/// At least one space always separates them, even when the line overflows.
pub fn justify(left: &str, right: &str, columns: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    let gap = columns.saturating_sub(used).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Renders receipts for one printer profile.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptRenderer<'a> {
    profile: &'a PrinterProfile,
    labels: &'a ReceiptLabels,
}

impl<'a> ReceiptRenderer<'a> {
    pub fn new(profile: &'a PrinterProfile, labels: &'a ReceiptLabels) -> Self {
        Self { profile, labels }
    }

    pub fn amount(&self, amount: u64) -> String {
        format_amount(amount, self.profile.thousands_separator)
    }

    /// Second line of an item: `"{qty}x{price}"` then the line total flush right.
    pub fn item_row(&self, item: &LineItem) -> PrintResult<String> {
        let total = item.line_total().ok_or_else(|| {
            PrintError::Encoding(format!("line total for '{}' overflows", item.name))
        })?;
        let qty_price = format!("{}x{}", item.qty, self.amount(item.price));
        Ok(justify(&qty_price, &self.amount(total), self.profile.columns))
    }

    /// Render a receipt into a finished command buffer.
    ///
    /// The logo is rasterized first thing, so an unreadable logo fails the
    /// job with [`PrintError::ImageProcessing`] before any bytes exist.
    #[instrument(skip_all, fields(merchant = %doc.merchant_name, items = doc.items.len()))]
    pub fn render(&self, doc: &ReceiptDocument, options: &PrintOptions) -> PrintResult<CommandBuffer> {
        debug!(density = ?options.density, "density has no printer command");

        let mut enc = CommandEncoder::with_columns(self.profile.columns);

        if options.open_cash_drawer {
            enc.pulse();
        }

        // Header
        enc.align(Alignment::Center);
        if let Some(logo) = doc.logo_source() {
            let bitmap = raster::rasterize(&logo, self.profile.logo_width_dots)?;
            enc.image(&bitmap)?.newline();
        }
        enc.bold(true)
            .size(TextSize::Large)
            .text_line(&doc.merchant_name)
            .size(TextSize::Normal)
            .bold(false);
        if let Some(address) = non_empty(&doc.merchant_address) {
            enc.text_line(address);
        }
        enc.text_line(&doc.date);
        enc.line('-');

        // Items
        enc.align(Alignment::Left);
        for item in &doc.items {
            enc.text_line(&item.name);
            enc.text_line(&self.item_row(item)?);
        }
        enc.line('-');

        // Totals
        enc.align(Alignment::Right);
        if doc.discount > 0 {
            enc.text_line(&format!("{}{}", self.labels.discount_prefix, self.amount(doc.discount)));
        }
        if doc.tax > 0 {
            enc.text_line(&format!("{}{}", self.labels.tax_prefix, self.amount(doc.tax)));
        }
        enc.bold(true)
            .size(TextSize::Normal)
            .text_line(&format!("{}{}", self.labels.total_prefix, self.amount(doc.total)))
            .bold(false);

        if doc.show_signature {
            enc.newline()
                .align(Alignment::Right)
                .text_line(&" ".repeat(SIGNATURE_SPACER))
                .text_line(&"_".repeat(SIGNATURE_WIDTH))
                .text_line(&self.labels.signature);
        }

        // Footer
        enc.align(Alignment::Center).newline();
        if let Some(footer) = non_empty(&doc.footer_message) {
            enc.text_line(footer);
        }

        if let Some(code) = non_empty(&doc.barcode) {
            enc.newline();
            enc.barcode(code)?;
            enc.text_line(code);
        }

        if !doc.remove_footer {
            enc.newline()
                .align(Alignment::Center)
                .size(TextSize::Normal)
                .text_line(&self.labels.attribution);
        }

        if options.auto_cut {
            enc.cut();
        } else {
            enc.feed_without_cut();
        }

        Ok(enc.finalize())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::document::Density;
    use pretty_assertions::assert_eq;

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    fn sample() -> ReceiptDocument {
        let mut doc = ReceiptDocument::new("WARUNG KITA", "18/10/2026");
        doc.items = vec![LineItem::new("Kopi", 2, 5000)];
        doc.subtotal = 10000;
        doc.total = 10000;
        doc
    }

    fn render(doc: &ReceiptDocument, options: &PrintOptions) -> Vec<u8> {
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        ReceiptRenderer::new(&profile, &labels)
            .render(doc, options)
            .unwrap()
            .as_bytes()
            .to_vec()
    }

    #[test]
    fn test_item_row_layout() {
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        let renderer = ReceiptRenderer::new(&profile, &labels);

        let row = renderer.item_row(&LineItem::new("Kopi", 2, 5000)).unwrap();
        assert_eq!(row, format!("2x5000{}10000", " ".repeat(21)));
        assert_eq!(row.len(), 32);
    }

    #[test]
    fn test_item_row_keeps_one_space_when_crowded() {
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        let renderer = ReceiptRenderer::new(&profile, &labels);

        let row = renderer
            .item_row(&LineItem::new("x", 1_000_000, 1_000_000_000))
            .unwrap();
        assert_eq!(row, "1000000x1000000000 1000000000000000");
    }

    #[test]
    fn test_item_row_with_separator() {
        let profile = PrinterProfile {
            thousands_separator: Some('.'),
            ..Default::default()
        };
        let labels = ReceiptLabels::default();
        let row = ReceiptRenderer::new(&profile, &labels)
            .item_row(&LineItem::new("Roti", 2, 12000))
            .unwrap();
        assert_eq!(row, format!("2x12.000{}24.000", " ".repeat(18)));
    }

    #[test]
    fn test_item_row_overflow() {
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        let err = ReceiptRenderer::new(&profile, &labels)
            .item_row(&LineItem::new("x", 2, u64::MAX))
            .unwrap_err();
        assert!(matches!(err, PrintError::Encoding(_)));
    }

    #[test]
    fn test_auto_cut_ending() {
        let bytes = render(&sample(), &PrintOptions::default());
        assert!(bytes.starts_with(&[0x1B, 0x40]));
        assert!(bytes.ends_with(&[0x0A, 0x0A, 0x0A, 0x0A, 0x1D, 0x56, 0x42, 0x00]));
    }

    #[test]
    fn test_no_cut_ending() {
        let options = PrintOptions {
            auto_cut: false,
            ..Default::default()
        };
        let bytes = render(&sample(), &options);
        assert!(bytes.ends_with(&[0x0A, 0x0A, 0x0A, 0x0A]));
        assert_eq!(find(&bytes, &[0x1D, 0x56]), None);
    }

    #[test]
    fn test_drawer_pulse_follows_init() {
        let options = PrintOptions {
            open_cash_drawer: true,
            ..Default::default()
        };
        let bytes = render(&sample(), &options);
        assert_eq!(
            &bytes[..12],
            &[0x1B, 0x40, 0x1B, 0x70, 0x00, 0x19, 0xFA, 0x1B, 0x70, 0x01, 0x19, 0xFA]
        );
    }

    #[test]
    fn test_no_drawer_pulse_by_default() {
        let bytes = render(&sample(), &PrintOptions::default());
        assert_eq!(find(&bytes, &[0x1B, 0x70]), None);
    }

    #[test]
    fn test_header_bytes() {
        let bytes = render(&sample(), &PrintOptions::default());
        let mut expected = vec![0x1B, 0x40, 0x1B, 0x61, 0x01, 0x1B, 0x45, 0x01, 0x1B, 0x21, 0x30];
        expected.extend(b"WARUNG KITA\n");
        expected.extend([0x1B, 0x21, 0x00, 0x1B, 0x45, 0x00]);
        expected.extend(b"18/10/2026\n");
        assert_eq!(&bytes[..expected.len()], &expected[..]);
    }

    #[test]
    fn test_non_ascii_merchant_name() {
        let mut doc = sample();
        doc.merchant_name = "Café".to_string();
        let bytes = render(&doc, &PrintOptions::default());
        assert!(find(&bytes, b"Caf?\n").is_some());
    }

    #[test]
    fn test_discount_and_tax_only_when_positive() {
        let bytes = render(&sample(), &PrintOptions::default());
        assert_eq!(find(&bytes, b"Discount"), None);
        assert_eq!(find(&bytes, b"Tax"), None);

        let mut doc = sample();
        doc.discount = 1000;
        doc.tax = 990;
        doc.total = 9990;
        let bytes = render(&doc, &PrintOptions::default());
        assert!(find(&bytes, b"Discount: -1000\n").is_some());
        assert!(find(&bytes, b"Tax: 990\n").is_some());
        assert!(find(&bytes, b"\x1B\x45\x01\x1B\x21\x00TOTAL: 9990\n\x1B\x45\x00").is_some());
    }

    #[test]
    fn test_barcode_and_hri() {
        let mut doc = sample();
        doc.barcode = Some("1234567890".to_string());
        let bytes = render(&doc, &PrintOptions::default());

        let mut expected = vec![0x1D, 0x6B, 0x49, 0x0A];
        expected.extend(b"1234567890");
        expected.extend(b"1234567890\n");
        assert!(find(&bytes, &expected).is_some());
    }

    #[test]
    fn test_empty_barcode_is_skipped() {
        let mut doc = sample();
        doc.barcode = Some(String::new());
        let bytes = render(&doc, &PrintOptions::default());
        assert_eq!(find(&bytes, &[0x1D, 0x6B]), None);
    }

    #[test]
    fn test_invalid_barcode_fails() {
        let mut doc = sample();
        doc.barcode = Some("kopi ☕".to_string());
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        let err = ReceiptRenderer::new(&profile, &labels)
            .render(&doc, &PrintOptions::default())
            .unwrap_err();
        assert!(matches!(err, PrintError::Encoding(_)));
    }

    #[test]
    fn test_signature_block() {
        let mut doc = sample();
        doc.show_signature = true;
        let bytes = render(&doc, &PrintOptions::default());

        let mut expected = vec![0x0A, 0x1B, 0x61, 0x02];
        expected.extend(b"          \n_______________\n   Signature   \n");
        assert!(find(&bytes, &expected).is_some());
    }

    #[test]
    fn test_attribution_suppressed() {
        let labels = ReceiptLabels::default();
        let bytes = render(&sample(), &PrintOptions::default());
        assert!(find(&bytes, labels.attribution.as_bytes()).is_some());

        let mut doc = sample();
        doc.remove_footer = true;
        let bytes = render(&doc, &PrintOptions::default());
        assert_eq!(find(&bytes, labels.attribution.as_bytes()), None);
    }

    #[test]
    fn test_bad_logo_is_image_error() {
        let mut doc = sample();
        doc.logo = Some("data:image/png;base64,AAAA".to_string());
        let profile = PrinterProfile::default();
        let labels = ReceiptLabels::default();
        let err = ReceiptRenderer::new(&profile, &labels)
            .render(&doc, &PrintOptions::default())
            .unwrap_err();
        assert!(matches!(err, PrintError::ImageProcessing(_)));
    }

    #[test]
    fn test_density_does_not_change_bytes() {
        let light = PrintOptions {
            density: Density::Light,
            ..Default::default()
        };
        let dark = PrintOptions {
            density: Density::Dark,
            ..Default::default()
        };
        assert_eq!(render(&sample(), &light), render(&sample(), &dark));
    }

    #[test]
    fn test_dividers_follow_columns() {
        let profile = PrinterProfile::mm80();
        let labels = ReceiptLabels::default();
        let bytes = ReceiptRenderer::new(&profile, &labels)
            .render(&sample(), &PrintOptions::default())
            .unwrap();
        let rule = format!("{}\n", "-".repeat(48));
        assert!(find(&bytes, rule.as_bytes()).is_some());
    }
}
