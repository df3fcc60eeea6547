use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Error, ErrorKind, Read, Write};

use super::icontype::{IconType, OSType};

/// The length of an icon element header, in bytes:
pub(crate) const ICON_ELEMENT_HEADER_LENGTH: u32 = 8;

/// One entry in an ICNS file: a four-character type code followed by the
/// encoded image data for that type.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IconElement {
    /// The OSType for this element (e.g. `ic07` or `ic11`).
    pub ostype: OSType,
    /// The raw data payload for this element.
    pub data: Vec<u8>,
}

impl IconElement {
    /// Creates an icon element with the given OSType and data payload.
    pub fn new(ostype: OSType, data: Vec<u8>) -> IconElement {
        IconElement { ostype, data }
    }

    /// Returns the type of icon stored in this element, or `None` if this
    /// element's OSType is not one written by this library.
    pub fn icon_type(&self) -> Option<IconType> {
        IconType::from_ostype(self.ostype)
    }

    /// Returns the encoded length of the element, in bytes, including the
    /// length of the header.  Returns an error if the length does not fit
    /// in the 32-bit length field.
    pub fn total_length(&self) -> io::Result<u32> {
        u32::try_from(self.data.len())
            .ok()
            .and_then(|len| len.checked_add(ICON_ELEMENT_HEADER_LENGTH))
            .ok_or_else(|| {
                let msg = format!("'{}' element payload is too large ({} \
                                   bytes)",
                                  self.ostype,
                                  self.data.len());
                Error::new(ErrorKind::InvalidInput, msg)
            })
    }

    /// Reads an icon element from within an ICNS file.
    pub fn read<R: Read>(mut reader: R) -> io::Result<IconElement> {
        let mut raw_ostype = [0u8; 4];
        reader.read_exact(&mut raw_ostype)?;
        let element_length = reader.read_u32::<BigEndian>()?;
        if element_length < ICON_ELEMENT_HEADER_LENGTH {
            return Err(Error::new(ErrorKind::InvalidData,
                                  "invalid element length"));
        }
        let data_length = element_length - ICON_ELEMENT_HEADER_LENGTH;
        let mut data = Vec::new();
        reader.take(u64::from(data_length)).read_to_end(&mut data)?;
        if data.len() != data_length as usize {
            let msg = format!("'{}' element truncated (expected {} bytes, \
                               found {})",
                              OSType(raw_ostype),
                              data_length,
                              data.len());
            return Err(Error::new(ErrorKind::UnexpectedEof, msg));
        }
        Ok(IconElement::new(OSType(raw_ostype), data))
    }

    /// Writes the icon element to within an ICNS file.
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        let OSType(ref raw_ostype) = self.ostype;
        writer.write_all(raw_ostype)?;
        writer.write_u32::<BigEndian>(self.total_length()?)?;
        writer.write_all(&self.data)?;
        Ok(())
    }
}
