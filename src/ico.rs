use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error, ErrorKind, Read, Seek, SeekFrom, Write};

use super::error::{self, Entry};
use super::raster::{self, Rasterizer};

/// The square sizes written by [`encode_ico`], in file order.
pub const ICO_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// The resource type stored in the ICONDIR header for icons (as opposed to
/// cursors, which use 2).
const RESOURCE_TYPE_ICON: u16 = 1;

/// The length of the ICONDIR header, in bytes:
const ICON_DIR_HEADER_LENGTH: u32 = 6;

/// The length of one ICONDIRENTRY record, in bytes:
const ICON_DIR_ENTRY_LENGTH: u32 = 16;

const MIN_SIZE: u32 = 1;
const MAX_SIZE: u32 = 256;

// ========================================================================= //

/// A collection of images; the contents of a single ICO file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconDir {
    entries: Vec<IconDirEntry>,
}

impl IconDir {
    /// Creates a new, empty collection of icons.
    pub fn new() -> IconDir {
        IconDir { entries: Vec::new() }
    }

    /// Returns the entries in this collection, in file order.
    pub fn entries(&self) -> &[IconDirEntry] {
        &self.entries
    }

    /// Appends an encoded (PNG) image of the given dimensions.  Returns an
    /// error if either dimension is outside 1-256.
    pub fn add_entry(&mut self,
                     width: u32,
                     height: u32,
                     data: Vec<u8>)
                     -> io::Result<()> {
        for &(name, value) in &[("width", width), ("height", height)] {
            if value < MIN_SIZE || value > MAX_SIZE {
                let msg = format!("Invalid {} (was {}, but range is {}-{})",
                                  name,
                                  value,
                                  MIN_SIZE,
                                  MAX_SIZE);
                return Err(Error::new(ErrorKind::InvalidInput, msg));
            }
        }
        self.entries.push(IconDirEntry::new(width, height, data));
        Ok(())
    }

    /// Renders a square image for every size in `sizes` and collects the
    /// results, in order, into a new collection.
    pub fn render<R>(rasterizer: &R, sizes: &[u32]) -> error::Result<IconDir>
        where R: Rasterizer + ?Sized
    {
        let payloads = raster::render_all(rasterizer, sizes).map_err(|f| {
            error::Error::Rasterization {
                entry: Entry::Ico(sizes[f.index]),
                source: f.error,
            }
        })?;
        let mut icon_dir = IconDir::new();
        for (&size, data) in sizes.iter().zip(payloads) {
            icon_dir
                .add_entry(size, size, data)
                .map_err(error::Error::Serialization)?;
        }
        Ok(icon_dir)
    }

    /// Returns the byte offset of each entry's image data within the
    /// encoded file, in entry order.  The first image starts right after
    /// the directory and each later one right after its predecessor.
    pub fn data_offsets(&self) -> io::Result<Vec<u32>> {
        let overflow = || {
            Error::new(ErrorKind::InvalidInput, "ICO file exceeds 4 GiB")
        };
        let num_entries = u32::try_from(self.entries.len())
            .map_err(|_| overflow())?;
        let mut data_offset = num_entries
            .checked_mul(ICON_DIR_ENTRY_LENGTH)
            .and_then(|len| len.checked_add(ICON_DIR_HEADER_LENGTH))
            .ok_or_else(overflow)?;
        let mut offsets = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            offsets.push(data_offset);
            let data_size = u32::try_from(entry.data.len())
                .map_err(|_| overflow())?;
            data_offset =
                data_offset.checked_add(data_size).ok_or_else(overflow)?;
        }
        Ok(offsets)
    }

    /// Reads an ICO file into memory.
    pub fn read<R: Read + Seek>(mut reader: R) -> io::Result<IconDir> {
        let reserved = reader.read_u16::<LittleEndian>()?;
        if reserved != 0 {
            let msg = format!("Invalid reserved field value in ICONDIR (was \
                               {}, but must be 0)",
                              reserved);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let restype = reader.read_u16::<LittleEndian>()?;
        if restype != RESOURCE_TYPE_ICON {
            let msg = format!("Invalid resource type ({})", restype);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let num_entries = reader.read_u16::<LittleEndian>()? as usize;
        let mut entries = Vec::<IconDirEntry>::with_capacity(num_entries);
        let mut spans = Vec::<(u32, u32)>::with_capacity(num_entries);
        for _ in 0..num_entries {
            let width = reader.read_u8()?;
            let height = reader.read_u8()?;
            let num_colors = reader.read_u8()?;
            let reserved = reader.read_u8()?;
            if reserved != 0 {
                let msg = format!("Invalid reserved field value in \
                                   ICONDIRENTRY (was {}, but must be 0)",
                                  reserved);
                return Err(Error::new(ErrorKind::InvalidData, msg));
            }
            let color_planes = reader.read_u16::<LittleEndian>()?;
            let bits_per_pixel = reader.read_u16::<LittleEndian>()?;
            let data_size = reader.read_u32::<LittleEndian>()?;
            let data_offset = reader.read_u32::<LittleEndian>()?;
            spans.push((data_offset, data_size));
            entries.push(IconDirEntry {
                width: decode_dimension(width),
                height: decode_dimension(height),
                num_colors,
                color_planes,
                bits_per_pixel,
                data: Vec::new(),
            });
        }
        for (entry, &(data_offset, data_size)) in entries.iter_mut()
            .zip(spans.iter()) {
            reader.seek(SeekFrom::Start(u64::from(data_offset)))?;
            let mut data = Vec::new();
            reader
                .by_ref()
                .take(u64::from(data_size))
                .read_to_end(&mut data)?;
            if data.len() != data_size as usize {
                let msg = format!("ICO image data truncated (expected {} \
                                   bytes at offset {}, found {})",
                                  data_size,
                                  data_offset,
                                  data.len());
                return Err(Error::new(ErrorKind::UnexpectedEof, msg));
            }
            entry.data = data;
        }
        Ok(IconDir { entries })
    }

    /// Writes an ICO file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let num_entries = u16::try_from(self.entries.len()).map_err(|_| {
            let msg = format!("Too many entries in IconDir (was {}, but max \
                               is {})",
                              self.entries.len(),
                              u16::MAX);
            Error::new(ErrorKind::InvalidInput, msg)
        })?;
        let offsets = self.data_offsets()?;
        writer.write_u16::<LittleEndian>(0)?; // reserved
        writer.write_u16::<LittleEndian>(RESOURCE_TYPE_ICON)?;
        writer.write_u16::<LittleEndian>(num_entries)?;
        for (entry, &data_offset) in self.entries.iter().zip(offsets.iter()) {
            writer.write_u8(encode_dimension(entry.width))?;
            writer.write_u8(encode_dimension(entry.height))?;
            writer.write_u8(entry.num_colors)?;
            writer.write_u8(0)?; // reserved
            writer.write_u16::<LittleEndian>(entry.color_planes)?;
            writer.write_u16::<LittleEndian>(entry.bits_per_pixel)?;
            writer.write_u32::<LittleEndian>(entry.data.len() as u32)?;
            writer.write_u32::<LittleEndian>(data_offset)?;
        }
        for entry in &self.entries {
            writer.write_all(&entry.data)?;
        }
        Ok(())
    }

    /// Serializes the collection into a new buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::new();
        self.write(&mut output)?;
        Ok(output)
    }
}

// ========================================================================= //

/// One entry in an ICO file: the directory record and its image data.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconDirEntry {
    width: u32,
    height: u32,
    num_colors: u8,
    color_planes: u16,
    bits_per_pixel: u16,
    data: Vec<u8>,
}

impl IconDirEntry {
    fn new(width: u32, height: u32, data: Vec<u8>) -> IconDirEntry {
        IconDirEntry {
            width,
            height,
            // 0 means 8 or more bits per pixel.
            num_colors: 0,
            color_planes: 1,
            bits_per_pixel: 32,
            data,
        }
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 { self.width }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 { self.height }

    /// Returns the palette size recorded for the image (0 for true color).
    pub fn num_colors(&self) -> u8 { self.num_colors }

    /// Returns the number of color planes recorded for the image.
    pub fn color_planes(&self) -> u16 { self.color_planes }

    /// Returns the bit depth recorded for the image.
    pub fn bits_per_pixel(&self) -> u16 { self.bits_per_pixel }

    /// Returns the encoded image data.
    pub fn data(&self) -> &[u8] { &self.data }
}

/// Encodes a dimension in 1-256 into its ICONDIRENTRY byte, where 0 stands
/// for 256.
fn encode_dimension(value: u32) -> u8 {
    if value == MAX_SIZE {
        0
    } else {
        value as u8
    }
}

fn decode_dimension(value: u8) -> u32 {
    if value == 0 {
        MAX_SIZE
    } else {
        u32::from(value)
    }
}

// ========================================================================= //

/// Builds a complete ICO file holding a square image for every size in
/// [`ICO_SIZES`], rendered by `rasterizer`.
///
/// The first rasterization failure aborts the encode; no partial buffer is
/// returned.
pub fn encode_ico<R>(rasterizer: &R) -> error::Result<Vec<u8>>
    where R: Rasterizer + ?Sized
{
    let icon_dir = IconDir::render(rasterizer, &ICO_SIZES)?;
    let bytes = icon_dir.to_bytes().map_err(error::Error::Serialization)?;
    tracing::debug!("encoded ico with {} entries ({} bytes)",
                    icon_dir.entries.len(),
                    bytes.len());
    Ok(bytes)
}

// ========================================================================= //
