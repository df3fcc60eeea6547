use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::io::{self, Error, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error;
use super::family::encode_icns;
use super::ico::encode_ico;
use super::raster::Rasterizer;

/// An icon container format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// Windows `.ico`.
    Ico,
    /// macOS `.icns`.
    Icns,
}

impl Format {
    /// Returns the file extension for this format, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ico => "ico",
            Format::Icns => "icns",
        }
    }

    /// Encodes a complete icon file of this format.
    pub fn encode<R>(self, rasterizer: &R) -> error::Result<Vec<u8>>
        where R: Rasterizer + ?Sized
    {
        match self {
            Format::Ico => encode_ico(rasterizer),
            Format::Icns => encode_icns(rasterizer),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        out.write_str(match *self {
            Format::Ico => "ICO",
            Format::Icns => "ICNS",
        })
    }
}

/// Decides which files to produce for converting `input` to `output`.
///
/// * An existing directory receives `<stem>.ico` and `<stem>.icns`, named
///   after the input file.
/// * A `.ico` or `.icns` path receives only that format.
/// * A `.icon` path, or one with no extension, receives both formats next
///   to each other with the extension replaced.
///
/// Any other extension is an error.
pub fn plan_outputs(input: &Path,
                    output: &Path)
                    -> io::Result<Vec<(Format, PathBuf)>> {
    let both = |base: &Path| {
        vec![(Format::Ico, base.with_extension(Format::Ico.extension())),
             (Format::Icns, base.with_extension(Format::Icns.extension()))]
    };
    if output.is_dir() {
        let stem = input.file_stem().unwrap_or_else(|| OsStr::new("icon"));
        let named = |format: Format| {
            let mut name = stem.to_os_string();
            name.push(".");
            name.push(format.extension());
            (format, output.join(name))
        };
        return Ok(vec![named(Format::Ico), named(Format::Icns)]);
    }
    let extension = output
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
    match extension.as_deref() {
        Some("ico") => Ok(vec![(Format::Ico, output.to_path_buf())]),
        Some("icns") => Ok(vec![(Format::Icns, output.to_path_buf())]),
        Some("icon") | None => Ok(both(output)),
        Some(other) => {
            let msg = format!("unsupported output extension '.{}' (use .ico, \
                               .icns, .icon or a directory)",
                              other);
            Err(Error::new(ErrorKind::InvalidInput, msg))
        }
    }
}

/// Writes `bytes` to `path` so that the file either appears complete or not
/// at all: the data goes to a temporary file in the same directory, which
/// is then renamed over `path`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> error::Result<()> {
    let persist = || -> io::Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(bytes)?;
        // Temporary files are owner-only; keep the mode of the file being
        // replaced, or fall back to the usual 0644.
        let permissions = match fs::metadata(path) {
            Ok(metadata) => metadata.permissions(),
            Err(_) => default_permissions(file.as_file())?,
        };
        file.as_file().set_permissions(permissions)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|error| error.error)?;
        Ok(())
    };
    persist().map_err(|source| {
        error::Error::Persist {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Mode for newly created icon files: world-readable, owner-writable.
#[cfg(unix)]
fn default_permissions(_file: &fs::File) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions(file: &fs::File) -> io::Result<fs::Permissions> {
    Ok(file.metadata()?.permissions())
}

/// Encodes one icon file and saves it to `path`.  Nothing is written if
/// encoding fails.
pub fn save<R>(format: Format, rasterizer: &R, path: &Path) -> error::Result<()>
    where R: Rasterizer + ?Sized
{
    let bytes = format.encode(rasterizer)?;
    write_atomic(path, &bytes)?;
    tracing::info!("wrote {} file {} ({} bytes)",
                   format,
                   path.display(),
                   bytes.len());
    Ok(())
}
