//! # posprint CLI
//!
//! Command-line interface for ESC/POS receipt printing.
//!
//! ## Usage
//!
//! ```bash
//! # Print the diagnostic test page over Bluetooth (/dev/rfcomm0)
//! posprint test-page
//!
//! # Print a receipt from JSON, kick the cash drawer, no cut
//! posprint --drawer --no-cut receipt order.json
//!
//! # Print an image on an 80mm USB printer
//! posprint --transport usb --profile mm80 image logo.png
//!
//! # Preview the dithered image instead of printing
//! posprint image photo.jpg --png preview.png
//!
//! # Write the command stream to a file
//! posprint --dump receipt.bin receipt order.json
//! ```
//!
//! Set `RUST_LOG=posprint=debug` to see every chunk.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{info, warn};

use posprint::{
    PrintError, PrinterProfile, ReceiptLabels,
    job::{self, PrintJob},
    receipt::{Density, PrintOptions, ReceiptDocument},
    render::raster::{self, ImageSource, MonochromeBitmap},
    transport::{CancelToken, DeviceHandle, TransportTarget, UsbLpDevice, rfcomm, usblp},
};

/// posprint - ESC/POS thermal printer utility
#[derive(Parser, Debug)]
#[command(name = "posprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Device path, or a Bluetooth MAC bound with `rfcomm bind`
    #[arg(long, global = true)]
    device: Option<String>,

    /// Link type of the device
    #[arg(long, value_enum, default_value_t = TransportKind::Ble, global = true)]
    transport: TransportKind,

    /// Write the command stream to FILE instead of a printer
    #[arg(long, value_name = "FILE", global = true)]
    dump: Option<PathBuf>,

    /// Built-in profile (mm58, mm80) or a JSON profile file
    #[arg(long, default_value = "mm58", global = true)]
    profile: String,

    /// JSON file overriding receipt labels
    #[arg(long, value_name = "FILE", global = true)]
    labels: Option<PathBuf>,

    /// Characters per line
    #[arg(long, global = true)]
    columns: Option<usize>,

    /// Bytes per transport write
    #[arg(long, global = true)]
    chunk_size: Option<usize>,

    /// Pause after each BLE chunk, in milliseconds
    #[arg(long, global = true)]
    ble_delay_ms: Option<u64>,

    /// Give up on a chunk after this many milliseconds
    #[arg(long, global = true)]
    chunk_timeout_ms: Option<u64>,

    /// Group amount digits with this character
    #[arg(long, global = true)]
    thousands_separator: Option<char>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a receipt described by a JSON file
    Receipt {
        file: PathBuf,

        /// Feed without cutting
        #[arg(long)]
        no_cut: bool,

        /// Open the cash drawer first
        #[arg(long)]
        drawer: bool,

        #[arg(long, value_enum, default_value_t = DensityArg::Normal)]
        density: DensityArg,
    },

    /// Print an image at full paper width
    Image {
        file: PathBuf,

        /// Save the dithered bitmap as PNG instead of printing
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,
    },

    /// Print the diagnostic test page
    TestPage,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TransportKind {
    Ble,
    Usb,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DensityArg {
    Light,
    Normal,
    Dark,
}

impl From<DensityArg> for Density {
    fn from(arg: DensityArg) -> Self {
        match arg {
            DensityArg::Light => Density::Light,
            DensityArg::Normal => Density::Normal,
            DensityArg::Dark => Density::Dark,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Print(#[from] PrintError),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("posprint=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        if let CliError::Print(err) = &e {
            if !err.is_pre_transmission() {
                eprintln!("The printer may hold a partially printed job.");
            }
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let cli = Cli::parse();
    let profile = load_profile(&cli)?;
    let labels = match &cli.labels {
        Some(path) => read_json::<ReceiptLabels>(path)?,
        None => ReceiptLabels::default(),
    };

    let job = match &cli.command {
        Commands::Receipt {
            file,
            no_cut,
            drawer,
            density,
        } => {
            let doc: ReceiptDocument = read_json(file)?;
            let options = PrintOptions {
                auto_cut: !no_cut,
                open_cash_drawer: *drawer,
                density: (*density).into(),
            };
            PrintJob::Receipt(doc, options)
        }
        Commands::Image { file, png } => {
            let source = ImageSource::Encoded(std::fs::read(file)?);
            if let Some(png_path) = png {
                let bitmap = raster::rasterize(&source, profile.full_width_dots)?;
                save_png(png_path, &bitmap)?;
                println!("Saved to {}", png_path.display());
                return Ok(());
            }
            PrintJob::RasterImage(source)
        }
        Commands::TestPage => PrintJob::TestPage,
    };

    if let Some(dump_path) = &cli.dump {
        let buffer = job::render_job(&job, &profile, &labels, "dump")?;
        std::fs::write(dump_path, buffer.as_bytes())?;
        println!("Wrote {} bytes to {}", buffer.len(), dump_path.display());
        return Ok(());
    }

    let mut target = open_target(&cli).await?;

    let cancel = CancelToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("cancelling after the current chunk");
            on_ctrl_c.cancel();
        }
    });

    let mut progress = |percent: u8| {
        eprint!("\rPrinting... {:>3}%", percent);
        let _ = std::io::stderr().flush();
    };
    let result = job::print(
        Some(&mut target),
        &job,
        &profile,
        &labels,
        &mut progress,
        Some(&cancel),
    )
    .await;
    eprintln!();

    let sent = result?;
    info!(bytes = sent, "printed");
    println!("Printed successfully!");
    Ok(())
}

/// Built-in or file profile, then flag overrides.
fn load_profile(cli: &Cli) -> Result<PrinterProfile, CliError> {
    let path = Path::new(&cli.profile);
    let mut profile = if path.extension().is_some_and(|ext| ext == "json") {
        PrinterProfile::from_json_file(path).map_err(CliError::Config)?
    } else {
        PrinterProfile::parse(&cli.profile).map_err(CliError::Config)?
    };

    if let Some(columns) = cli.columns {
        profile.columns = columns;
    }
    if let Some(chunk_size) = cli.chunk_size {
        if chunk_size == 0 {
            return Err(CliError::Config("--chunk-size must be at least 1".to_string()));
        }
        profile.chunk_size = chunk_size;
    }
    if let Some(delay) = cli.ble_delay_ms {
        profile.ble_chunk_delay_ms = delay;
    }
    if let Some(timeout) = cli.chunk_timeout_ms {
        profile.chunk_timeout_ms = Some(timeout);
    }
    if cli.thousands_separator.is_some() {
        profile.thousands_separator = cli.thousands_separator;
    }
    Ok(profile)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Config(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Open the device named on the command line and bind it.
async fn open_target(cli: &Cli) -> Result<TransportTarget, CliError> {
    let handle = match cli.transport {
        TransportKind::Ble => {
            let device = cli.device.as_deref().unwrap_or(rfcomm::DEFAULT_DEVICE);
            let path = if rfcomm::is_valid_mac(device) {
                rfcomm::find_rfcomm_for_mac(device).ok_or_else(|| {
                    CliError::Config(format!(
                        "No RFCOMM device bound to {}. Run: sudo rfcomm bind 0 {}",
                        device, device
                    ))
                })?
            } else {
                PathBuf::from(device)
            };
            let characteristic = rfcomm::RfcommCharacteristic::open(&path)?;
            DeviceHandle::ble(path.display().to_string(), characteristic)
        }
        TransportKind::Usb => {
            let device = cli.device.as_deref().unwrap_or(usblp::DEFAULT_DEVICE);
            let usb = UsbLpDevice::open(device).await?;
            DeviceHandle::usb(device, usb)
        }
    };
    Ok(TransportTarget::bind(handle)?)
}

/// Save a bitmap as a black-and-white PNG
fn save_png(path: &Path, bitmap: &MonochromeBitmap) -> Result<(), CliError> {
    use image::{GrayImage, Luma};

    let mut img = GrayImage::new(bitmap.width() as u32, bitmap.height() as u32);
    for (x, y, px) in img.enumerate_pixels_mut() {
        let color = if bitmap.is_ink(x as usize, y as usize) { 0u8 } else { 255u8 };
        *px = Luma([color]);
    }

    img.save(path)
        .map_err(|e| CliError::Config(format!("Failed to save PNG: {}", e)))
}
