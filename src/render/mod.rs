//! # Rendering Module
//!
//! Image processing for thermal output.
//!
//! ## Modules
//!
//! - [`dither`]: Floyd–Steinberg error diffusion and row packing
//! - [`raster`]: Image decoding, scaling, and conversion to [`raster::MonochromeBitmap`]
//!
//! ## Usage Example
//!
//! ```no_run
//! use posprint::render::raster::{self, ImageSource};
//!
//! let png = std::fs::read("logo.png").unwrap();
//! let bitmap = raster::rasterize(&ImageSource::Encoded(png), 384).unwrap();
//!
//! // bitmap is ready for CommandEncoder::image()
//! assert_eq!(bitmap.width(), 384);
//! ```

pub mod dither;
pub mod raster;
