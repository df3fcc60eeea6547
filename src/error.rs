use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use super::icontype::IconType;

/// Identifies one image slot of an icon container.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entry {
    /// An ICO directory entry of the given square size.
    Ico(u32),
    /// An ICNS element of the given type.
    Icns(IconType),
}

impl fmt::Display for Entry {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Entry::Ico(size) => write!(out, "{}x{}", size, size),
            Entry::Icns(icon_type) => {
                let size = icon_type.pixel_size();
                write!(out, "{} ({}x{})", icon_type.ostype(), size, size)
            }
        }
    }
}

/// Errors produced while building or saving an icon file.
#[derive(Debug, Error)]
pub enum Error {
    /// The rasterizer failed for one entry; nothing was produced.
    #[error("failed to rasterize {entry} image: {source}")]
    Rasterization {
        /// The entry whose image could not be rendered.
        entry: Entry,
        /// The rasterizer's error, unmodified.
        #[source]
        source: io::Error,
    },

    /// The rendered images could not be laid out in the container.
    #[error("failed to serialize icon: {0}")]
    Serialization(#[source] io::Error),

    /// The finished buffer could not be written to its destination.
    #[error("failed to write {}: {source}", .path.display())]
    Persist {
        /// The final path of the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Result type returned by the icon encoders.
pub type Result<T> = std::result::Result<T, Error>;
