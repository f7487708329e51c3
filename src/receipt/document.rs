//! Receipt data model.
//!
//! Documents arrive fully resolved from the UI layer: totals are already
//! computed and are printed as given. [`ReceiptDocument::with_rates`] exists
//! for callers that only know percentages.
//!
//! ## JSON
//!
//! ```json
//! {
//!   "merchant_name": "WARUNG KITA",
//!   "merchant_address": "Jl. Melati 4",
//!   "date": "18/10/2026 09:15",
//!   "items": [{ "name": "Kopi", "qty": 2, "price": 5000 }],
//!   "subtotal": 10000,
//!   "total": 10000,
//!   "barcode": "INV-0042"
//! }
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::{PrintError, PrintResult};
use crate::render::raster::ImageSource;

/// One purchased line. Prices are integer minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub qty: u32,
    pub price: u64,
}

impl LineItem {
    pub fn new(name: impl Into<String>, qty: u32, price: u64) -> Self {
        Self {
            name: name.into(),
            qty,
            price,
        }
    }

    /// `qty * price`, or `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(self.qty as u64)
    }
}

/// Visual style chosen in the UI. Only the on-screen preview uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptStyle {
    Modern,
    #[default]
    Classic,
    Minimal,
}

/// # Receipt Document
///
/// Everything printed on a sales receipt. `logo` holds base64 text or a
/// `data:` URL. Library callers holding image bytes or a decoded image set
/// `logo_image` instead; it wins over `logo` and is never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptDocument {
    pub merchant_name: String,
    #[serde(default)]
    pub merchant_address: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(skip)]
    pub logo_image: Option<ImageSource>,
    pub date: String,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub subtotal: u64,
    #[serde(default)]
    pub discount: u64,
    #[serde(default)]
    pub tax: u64,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub footer_message: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub style: ReceiptStyle,
    #[serde(default)]
    pub show_signature: bool,
    /// Suppress the attribution line
    #[serde(default)]
    pub remove_footer: bool,
}

impl ReceiptDocument {
    pub fn new(merchant_name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            merchant_name: merchant_name.into(),
            date: date.into(),
            ..Default::default()
        }
    }

    /// Set items and derive every amount from whole-percent rates.
    ///
    /// ```text
    /// subtotal = Σ qty × price
    /// discount = subtotal × discount% / 100
    /// tax      = (subtotal − discount) × tax% / 100
    /// total    = subtotal − discount + tax
    /// ```
    ///
    /// Divisions round half up. Fails with [`PrintError::Encoding`] if an
    /// amount overflows or the discount exceeds 100%.
    ///
    /// ```
    /// use posprint::receipt::{LineItem, ReceiptDocument};
    ///
    /// let doc = ReceiptDocument::new("SHOP", "today")
    ///     .with_rates(vec![LineItem::new("Tea", 3, 5000)], 10, 11)
    ///     .unwrap();
    /// assert_eq!(doc.subtotal, 15000);
    /// assert_eq!(doc.discount, 1500);
    /// assert_eq!(doc.tax, 1485);
    /// assert_eq!(doc.total, 14985);
    /// ```
    pub fn with_rates(
        mut self,
        items: Vec<LineItem>,
        discount_percent: u32,
        tax_percent: u32,
    ) -> PrintResult<Self> {
        if discount_percent > 100 {
            return Err(PrintError::Encoding(format!(
                "discount of {}% exceeds the subtotal",
                discount_percent
            )));
        }

        let overflow = || PrintError::Encoding("receipt amount overflows".to_string());

        let subtotal = items.iter().try_fold(0u64, |acc, item| {
            item.line_total().and_then(|t| acc.checked_add(t))
        });
        let subtotal = subtotal.ok_or_else(overflow)?;
        let discount = percent_of(subtotal, discount_percent).ok_or_else(overflow)?;
        let taxable = subtotal - discount;
        let tax = percent_of(taxable, tax_percent).ok_or_else(overflow)?;
        let total = taxable.checked_add(tax).ok_or_else(overflow)?;

        self.items = items;
        self.subtotal = subtotal;
        self.discount = discount;
        self.tax = tax;
        self.total = total;
        Ok(self)
    }

    /// Attach an already loaded logo.
    pub fn with_logo(mut self, logo: impl Into<ImageSource>) -> Self {
        self.logo_image = Some(logo.into());
        self
    }

    /// Logo as an image source, if present and non-empty.
    pub fn logo_source(&self) -> Option<Cow<'_, ImageSource>> {
        if let Some(image) = &self.logo_image {
            return Some(Cow::Borrowed(image));
        }
        self.logo
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| Cow::Owned(ImageSource::Base64(s.to_string())))
    }
}

/// `amount × percent / 100`, rounded half up.
fn percent_of(amount: u64, percent: u32) -> Option<u64> {
    let scaled = (amount as u128) * (percent as u128) + 50;
    u64::try_from(scaled / 100).ok()
}

/// Print head heat setting as chosen in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Density {
    Light,
    #[default]
    Normal,
    Dark,
}

/// Per-job printing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    pub auto_cut: bool,
    pub open_cash_drawer: bool,
    /// Recorded with the job. No density command is sent.
    pub density: Density,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            auto_cut: true,
            open_cash_drawer: false,
            density: Density::Normal,
        }
    }
}
