//! Diagnostic test page.
//!
//! A fixed sample receipt that exercises every primitive a sales receipt
//! uses: double-size bold header, dividers, left/right alignment, barcode,
//! and the partial cut. Only the date and device name vary.

use serde::{Deserialize, Serialize};

use super::render::{format_amount, justify};
use crate::encoder::{CommandBuffer, CommandEncoder};
use crate::error::PrintResult;
use crate::printer::{PrinterProfile, ReceiptLabels};
use crate::protocol::text::{Alignment, TextSize};

/// Barcode value printed on every test page.
pub const TEST_BARCODE: &str = "1234567890";

/// Device names are cut to this many characters.
const DEVICE_NAME_LIMIT: usize = 15;

/// Fixed item table: name, quantity, line total.
const SAMPLE_ITEMS: [(&str, u32, u64); 3] = [
    ("Milk Coffee", 1, 18000),
    ("Cheese Toast", 2, 24000),
    ("Iced Tea", 1, 5000),
];

const SAMPLE_TAX_PERCENT: u64 = 10;

/// Variable parts of the test page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPageInfo {
    pub date: String,
    pub device_name: String,
}

impl TestPageInfo {
    pub fn new(date: impl Into<String>, device_name: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            device_name: device_name.into(),
        }
    }
}

/// One row of the item table: name left, qty in a 3-wide column, amount in
/// the remaining 11.
fn table_row(name: &str, qty: &str, amount: &str, columns: usize) -> String {
    let name_width = columns.saturating_sub(14);
    let name: String = name.chars().take(name_width).collect();
    format!("{:<name_width$}{:>3}{:>11}", name, qty, amount)
}

/// Render the test page.
pub fn render_test_page(
    info: &TestPageInfo,
    profile: &PrinterProfile,
    labels: &ReceiptLabels,
) -> PrintResult<CommandBuffer> {
    let columns = profile.columns;
    let sep = profile.thousands_separator;
    let mut enc = CommandEncoder::with_columns(columns);

    enc.align(Alignment::Center)
        .bold(true)
        .size(TextSize::Large)
        .text_line("POSPRINT CAFE")
        .size(TextSize::Normal)
        .bold(false)
        .text_line("88 Technology Rd, Jakarta")
        .text_line("Tel: 0812-3456-7890")
        .line('-');

    let device: String = info.device_name.chars().take(DEVICE_NAME_LIMIT).collect();
    enc.align(Alignment::Left)
        .text_line(&format!("Date    : {}", info.date))
        .text_line("Cashier : Demo Admin")
        .text_line(&format!("Device  : {}", device))
        .line('-');

    enc.text_line(&table_row("Item", "Qty", "Price", columns));
    let mut subtotal = 0;
    for (name, qty, amount) in SAMPLE_ITEMS {
        subtotal += amount;
        enc.text_line(&table_row(
            name,
            &qty.to_string(),
            &format_amount(amount, sep),
            columns,
        ));
    }
    enc.line('-');

    let tax = subtotal * SAMPLE_TAX_PERCENT / 100;
    enc.align(Alignment::Right)
        .text_line(&justify("Subtotal:", &format_amount(subtotal, sep), 20))
        .text_line(&justify(
            &format!("Tax ({}%):", SAMPLE_TAX_PERCENT),
            &format_amount(tax, sep),
            20,
        ))
        .bold(true)
        .size(TextSize::Normal)
        .text_line(&format!("{}{}", labels.total_prefix, format_amount(subtotal + tax, sep)))
        .bold(false);

    enc.newline()
        .align(Alignment::Center)
        .text_line("* TEST RECEIPT SAMPLE *")
        .text_line("Thank you for your visit")
        .text_line("Keep this receipt as proof.");

    enc.newline();
    enc.barcode(TEST_BARCODE)?;
    enc.text_line(TEST_BARCODE);

    enc.newline()
        .size(TextSize::Normal)
        .text_line(&labels.attribution)
        .cut();

    Ok(enc.finalize())
}
