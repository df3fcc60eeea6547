use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error, ErrorKind, Read, Write};

use super::element::IconElement;
use super::error::{self, Entry};
use super::icontype::IconType;
use super::raster::{self, Rasterizer};

/// The first four bytes of an ICNS file:
const ICNS_MAGIC_LITERAL: &[u8; 4] = b"icns";

/// The length of an icon family header, in bytes:
const ICON_FAMILY_HEADER_LENGTH: u32 = 8;

/// A set of icons stored in a single ICNS file.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct IconFamily {
    /// The icon elements stored in the ICNS file, in file order.
    pub elements: Vec<IconElement>,
}

impl IconFamily {
    /// Creates a new, empty icon family.
    pub fn new() -> IconFamily {
        IconFamily { elements: Vec::new() }
    }

    /// Returns true if the icon family contains no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Renders every type in `icon_types` with the rasterizer and collects
    /// the results, in order, into a new family.  Types that share a pixel
    /// size are still rendered separately.
    pub fn render<R>(rasterizer: &R,
                     icon_types: &[IconType])
                     -> error::Result<IconFamily>
        where R: Rasterizer + ?Sized
    {
        let sizes: Vec<u32> =
            icon_types.iter().map(|icon_type| icon_type.pixel_size()).collect();
        let payloads = raster::render_all(rasterizer, &sizes).map_err(|f| {
            error::Error::Rasterization {
                entry: Entry::Icns(icon_types[f.index]),
                source: f.error,
            }
        })?;
        let elements = icon_types
            .iter()
            .zip(payloads)
            .map(|(icon_type, data)| IconElement::new(icon_type.ostype(), data))
            .collect();
        Ok(IconFamily { elements })
    }

    /// Finds the element with the given icon type, if present.
    pub fn find_element(&self, icon_type: IconType) -> Option<&IconElement> {
        let ostype = icon_type.ostype();
        self.elements.iter().find(|el| el.ostype == ostype)
    }

    /// Reads an icon family from an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconFamily> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if magic != *ICNS_MAGIC_LITERAL {
            let msg = "not an icns file (wrong magic literal)";
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let file_length = reader.read_u32::<BigEndian>()?;
        let mut file_position: u32 = ICON_FAMILY_HEADER_LENGTH;
        let mut family = IconFamily::new();
        while file_position < file_length {
            let element = IconElement::read(reader.by_ref())?;
            file_position = file_position
                .checked_add(element.total_length()?)
                .ok_or_else(|| {
                    Error::new(ErrorKind::InvalidData, "file length overflow")
                })?;
            family.elements.push(element);
        }
        if file_position != file_length {
            let msg = format!("element lengths sum to {} bytes, but header \
                               says {}",
                              file_position,
                              file_length);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        Ok(family)
    }

    /// Writes the icon family to an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(ICNS_MAGIC_LITERAL)?;
        writer.write_u32::<BigEndian>(self.total_length()?)?;
        for element in &self.elements {
            element.write(writer.by_ref())?;
        }
        Ok(())
    }

    /// Serializes the icon family into a new buffer.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut output = Vec::with_capacity(self.total_length()? as usize);
        self.write(&mut output)?;
        Ok(output)
    }

    /// Returns the encoded length of the file, in bytes, including the
    /// length of the header.  Returns an error if the file would be too
    /// large for the 32-bit length field.
    pub fn total_length(&self) -> io::Result<u32> {
        let mut length = ICON_FAMILY_HEADER_LENGTH;
        for element in &self.elements {
            length = length
                .checked_add(element.total_length()?)
                .ok_or_else(|| {
                    Error::new(ErrorKind::InvalidInput,
                               "icon family exceeds 4 GiB")
                })?;
        }
        Ok(length)
    }
}

/// Builds a complete ICNS file holding every type in
/// [`IconType::STANDARD`], rendered by `rasterizer`.
///
/// The first rasterization failure aborts the encode; no partial buffer is
/// returned.
pub fn encode_icns<R>(rasterizer: &R) -> error::Result<Vec<u8>>
    where R: Rasterizer + ?Sized
{
    let family = IconFamily::render(rasterizer, &IconType::STANDARD)?;
    let bytes = family.to_bytes().map_err(error::Error::Serialization)?;
    tracing::debug!("encoded icns with {} elements ({} bytes)",
                    family.elements.len(),
                    bytes.len());
    Ok(bytes)
}
