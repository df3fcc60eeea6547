//! Library for turning a vector image into multi-resolution icon files:
//! Windows icons (.ico) and Apple Icon Images (.icns).
//!
//! Each encoder asks a [`Rasterizer`] for one PNG per entry of a fixed size
//! table and packs the results into the container layout:
//!
//! * ICO: a 6-byte header, one 16-byte little-endian directory record per
//!   image (with absolute data offsets), then the PNG data.
//! * ICNS: the `icns` magic and big-endian file length, then for each image
//!   its OSType, big-endian element length (payload + 8), and PNG data.
//!
//! See https://en.wikipedia.org/wiki/ICO_(file_format) and
//! https://en.wikipedia.org/wiki/Apple_Icon_Image_format for more
//! information about the file formats.
//!
//! # Example
//! ```no_run
//! use svg2icon::{encode_ico, SvgRasterizer};
//! let rasterizer = SvgRasterizer::open("logo.svg").unwrap();
//! let ico_bytes = encode_ico(&rasterizer).unwrap();
//! std::fs::write("logo.ico", ico_bytes).unwrap();
//! ```

#![warn(missing_docs)]

mod element;
mod error;
mod family;
mod ico;
mod icontype;
mod image;
mod output;
#[cfg(feature = "pngio")]
mod pngio;
mod raster;
#[cfg(feature = "svg")]
mod svg;

pub use self::element::IconElement;
pub use self::error::{Entry, Error, Result};
pub use self::family::{encode_icns, IconFamily};
pub use self::ico::{encode_ico, IconDir, IconDirEntry, ICO_SIZES};
pub use self::icontype::{IconType, OSType};
pub use self::image::Image;
pub use self::output::{plan_outputs, save, write_atomic, Format};
pub use self::raster::Rasterizer;
#[cfg(feature = "svg")]
pub use self::svg::SvgRasterizer;
