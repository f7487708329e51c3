//! # Print Jobs
//!
//! Turns a job into bytes and drives them through a transport.
//!
//! ## Pipeline
//!
//! ```text
//! Receipt(doc, options) ──► ReceiptRenderer ─┐
//! RasterImage(image)    ──► rasterize(384) ──┼──► CommandBuffer ──► send_buffer ──► progress
//! TestPage              ──► test page ───────┘
//! ```
//!
//! The whole buffer is rendered before the first chunk is sent, so image and
//! encoding failures never touch the printer.

use tracing::{info, instrument, warn};

use crate::encoder::{CommandBuffer, CommandEncoder};
use crate::error::{PrintError, PrintResult};
use crate::printer::{PrinterProfile, ReceiptLabels};
use crate::protocol::text::Alignment;
use crate::receipt::{PrintOptions, ReceiptDocument, ReceiptRenderer, TestPageInfo, render_test_page};
use crate::render::raster::{self, ImageSource};
use crate::transport::{CancelToken, ProgressSink, TransportTarget, send_buffer};

/// Date format printed on the test page.
const TEST_PAGE_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One print invocation.
#[derive(Debug, Clone)]
pub enum PrintJob {
    Receipt(ReceiptDocument, PrintOptions),
    /// Full-width image, always followed by a cut
    RasterImage(ImageSource),
    /// Fixed diagnostic receipt
    TestPage,
}

impl PrintJob {
    pub fn kind(&self) -> &'static str {
        match self {
            PrintJob::Receipt(..) => "receipt",
            PrintJob::RasterImage(_) => "image",
            PrintJob::TestPage => "test_page",
        }
    }
}

/// Render a job into a finished command buffer.
///
/// `device_name` is printed on the test page and ignored otherwise.
pub fn render_job(
    job: &PrintJob,
    profile: &PrinterProfile,
    labels: &ReceiptLabels,
    device_name: &str,
) -> PrintResult<CommandBuffer> {
    match job {
        PrintJob::Receipt(doc, options) => ReceiptRenderer::new(profile, labels).render(doc, options),
        PrintJob::RasterImage(source) => render_image(source, profile),
        PrintJob::TestPage => {
            let date = chrono::Local::now().format(TEST_PAGE_DATE_FORMAT).to_string();
            render_test_page(&TestPageInfo::new(date, device_name), profile, labels)
        }
    }
}

/// Centered full-width image, then cut.
pub fn render_image(source: &ImageSource, profile: &PrinterProfile) -> PrintResult<CommandBuffer> {
    let bitmap = raster::rasterize(source, profile.full_width_dots)?;
    let mut enc = CommandEncoder::with_columns(profile.columns);
    enc.align(Alignment::Center).image(&bitmap)?.cut();
    Ok(enc.finalize())
}

/// Render `job` and send it to `target`.
///
/// Returns the number of bytes delivered.
///
/// ## Errors
///
/// - [`PrintError::DeviceNotConnected`] immediately if `target` is `None`
/// - [`PrintError::ImageProcessing`] or [`PrintError::Encoding`] before any
///   byte is sent
/// - [`PrintError::TransportWrite`], [`PrintError::Timeout`], or
///   [`PrintError::Cancelled`] mid-stream; part of the job may have printed
#[instrument(skip_all, fields(job = job.kind()))]
pub async fn print<P: ProgressSink + ?Sized>(
    target: Option<&mut TransportTarget>,
    job: &PrintJob,
    profile: &PrinterProfile,
    labels: &ReceiptLabels,
    progress: &mut P,
    cancel: Option<&CancelToken>,
) -> PrintResult<usize> {
    let Some(target) = target else {
        return Err(PrintError::DeviceNotConnected("no printer bound".to_string()));
    };

    let buffer = render_job(job, profile, labels, target.name()).inspect_err(|e| {
        warn!(error = %e, "render failed; nothing sent");
    })?;
    info!(device = %target.name(), bytes = buffer.len(), "rendered job");

    send_buffer(target, &buffer, profile, progress, cancel).await?;
    Ok(buffer.len())
}
