use std::fmt;
use std::str::FromStr;

/// Types of icon elements written into an ICNS file.  Every type stores a
/// PNG payload with an alpha channel.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconType {
    /// 16x16 32-bit icon.
    RGBA32_16x16,
    /// 32x32 32-bit icon.
    RGBA32_32x32,
    /// 64x64 32-bit icon.
    RGBA32_64x64,
    /// 128x128 32-bit icon.
    RGBA32_128x128,
    /// 256x256 32-bit icon.
    RGBA32_256x256,
    /// 512x512 32-bit icon.
    RGBA32_512x512,
    /// 512x512 32-bit icon at 2x "retina" density (so, 1024 by 1024 pixels).
    RGBA32_512x512_2x,
    /// 16x16 32-bit icon at 2x "retina" density (so, 32 by 32 pixels).
    RGBA32_16x16_2x,
    /// 32x32 32-bit icon at 2x "retina" density (so, 64 by 64 pixels).
    RGBA32_32x32_2x,
    /// 128x128 32-bit icon at 2x "retina" density (so, 256 by 256 pixels).
    RGBA32_128x128_2x,
    /// 256x256 32-bit icon at 2x "retina" density (so, 512 by 512 pixels).
    RGBA32_256x256_2x,
}

impl IconType {
    /// The icon types written by [`encode_icns`](crate::encode_icns), in
    /// file order: the standard-density types first, then the retina ones.
    pub const STANDARD: [IconType; 11] = [
        IconType::RGBA32_16x16,
        IconType::RGBA32_32x32,
        IconType::RGBA32_64x64,
        IconType::RGBA32_128x128,
        IconType::RGBA32_256x256,
        IconType::RGBA32_512x512,
        IconType::RGBA32_512x512_2x,
        IconType::RGBA32_16x16_2x,
        IconType::RGBA32_32x32_2x,
        IconType::RGBA32_128x128_2x,
        IconType::RGBA32_256x256_2x,
    ];

    /// Get the icon type associated with the given OSType, if any.
    pub fn from_ostype(ostype: OSType) -> Option<IconType> {
        let OSType(raw_ostype) = ostype;
        match &raw_ostype {
            b"icp4" => Some(IconType::RGBA32_16x16),
            b"icp5" => Some(IconType::RGBA32_32x32),
            b"icp6" => Some(IconType::RGBA32_64x64),
            b"ic07" => Some(IconType::RGBA32_128x128),
            b"ic08" => Some(IconType::RGBA32_256x256),
            b"ic09" => Some(IconType::RGBA32_512x512),
            b"ic10" => Some(IconType::RGBA32_512x512_2x),
            b"ic11" => Some(IconType::RGBA32_16x16_2x),
            b"ic12" => Some(IconType::RGBA32_32x32_2x),
            b"ic13" => Some(IconType::RGBA32_128x128_2x),
            b"ic14" => Some(IconType::RGBA32_256x256_2x),
            _ => None,
        }
    }

    /// Get the OSType that represents this icon type.
    pub fn ostype(self) -> OSType {
        match self {
            IconType::RGBA32_16x16 => OSType(*b"icp4"),
            IconType::RGBA32_32x32 => OSType(*b"icp5"),
            IconType::RGBA32_64x64 => OSType(*b"icp6"),
            IconType::RGBA32_128x128 => OSType(*b"ic07"),
            IconType::RGBA32_256x256 => OSType(*b"ic08"),
            IconType::RGBA32_512x512 => OSType(*b"ic09"),
            IconType::RGBA32_512x512_2x => OSType(*b"ic10"),
            IconType::RGBA32_16x16_2x => OSType(*b"ic11"),
            IconType::RGBA32_32x32_2x => OSType(*b"ic12"),
            IconType::RGBA32_128x128_2x => OSType(*b"ic13"),
            IconType::RGBA32_256x256_2x => OSType(*b"ic14"),
        }
    }

    /// Returns the side length, in pixels, of the square image stored for
    /// this icon type.  Normally this is the same as the screen size, but
    /// for 2x "retina" density icons, this will be twice that value.
    ///
    /// # Examples
    /// ```
    /// use svg2icon::IconType;
    /// assert_eq!(IconType::RGBA32_16x16.pixel_size(), 16);
    /// assert_eq!(IconType::RGBA32_16x16_2x.pixel_size(), 32);
    /// assert_eq!(IconType::RGBA32_512x512_2x.pixel_size(), 1024);
    /// ```
    pub fn pixel_size(self) -> u32 {
        self.screen_size() * self.pixel_density()
    }

    /// Returns the pixel density for this icon type -- that is, 2 for 2x
    /// "retina" density icons, or 1 for other icon types.
    pub fn pixel_density(self) -> u32 {
        match self {
            IconType::RGBA32_512x512_2x
            | IconType::RGBA32_16x16_2x
            | IconType::RGBA32_32x32_2x
            | IconType::RGBA32_128x128_2x
            | IconType::RGBA32_256x256_2x => 2,
            _ => 1,
        }
    }

    /// Returns the screen size of this icon type.  For 2x "retina" density
    /// icons this is half the pixel size.
    ///
    /// # Examples
    /// ```
    /// use svg2icon::IconType;
    /// assert_eq!(IconType::RGBA32_128x128.screen_size(), 128);
    /// assert_eq!(IconType::RGBA32_128x128_2x.screen_size(), 128);
    /// ```
    pub fn screen_size(self) -> u32 {
        match self {
            IconType::RGBA32_16x16 | IconType::RGBA32_16x16_2x => 16,
            IconType::RGBA32_32x32 | IconType::RGBA32_32x32_2x => 32,
            IconType::RGBA32_64x64 => 64,
            IconType::RGBA32_128x128 | IconType::RGBA32_128x128_2x => 128,
            IconType::RGBA32_256x256 | IconType::RGBA32_256x256_2x => 256,
            IconType::RGBA32_512x512 | IconType::RGBA32_512x512_2x => 512,
        }
    }
}

/// A Macintosh OSType (also known as a ResType), used in ICNS files to
/// identify the type of each icon element.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct OSType(pub [u8; 4]);

impl fmt::Display for OSType {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        let &OSType(raw) = self;
        for &byte in &raw {
            write!(out, "{}", char::from(byte))?;
        }
        Ok(())
    }
}

impl FromStr for OSType {
    type Err = String;

    fn from_str(input: &str) -> Result<OSType, String> {
        let bytes = input.as_bytes();
        if bytes.len() != 4 {
            Err(format!("OSType string must be 4 bytes (was {})", bytes.len()))
        } else if !bytes.is_ascii() {
            Err(format!("OSType string must be ASCII (was {:?})", input))
        } else {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            Ok(OSType(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn icon_type_ostype_round_trip() {
        for icon_type in &IconType::STANDARD {
            let ostype = icon_type.ostype();
            let from = IconType::from_ostype(ostype);
            assert_eq!(Some(*icon_type), from);
        }
    }

    #[test]
    fn standard_table_order_and_sizes() {
        let table: Vec<(String, u32)> = IconType::STANDARD
            .iter()
            .map(|t| (t.ostype().to_string(), t.pixel_size()))
            .collect();
        let expected = [
            ("icp4", 16),
            ("icp5", 32),
            ("icp6", 64),
            ("ic07", 128),
            ("ic08", 256),
            ("ic09", 512),
            ("ic10", 1024),
            ("ic11", 32),
            ("ic12", 64),
            ("ic13", 256),
            ("ic14", 512),
        ];
        assert_eq!(table.len(), expected.len());
        for (actual, &(code, size)) in table.iter().zip(expected.iter()) {
            assert_eq!(actual.0, code);
            assert_eq!(actual.1, size);
        }
    }

    #[test]
    fn standard_ostypes_are_unique_ascii() {
        let codes: HashSet<OSType> =
            IconType::STANDARD.iter().map(|t| t.ostype()).collect();
        assert_eq!(codes.len(), IconType::STANDARD.len());
        for code in &codes {
            assert!(code.0.is_ascii());
        }
    }

    #[test]
    fn ostype_to_and_from_str() {
        let ostype = OSType::from_str("abcd").expect("failed to parse OSType");
        assert_eq!(ostype.to_string(), "abcd".to_string());
    }

    #[test]
    fn ostype_from_str_failure() {
        assert_eq!(OSType::from_str("abc"),
                   Err("OSType string must be 4 bytes (was 3)".to_string()));
        assert_eq!(OSType::from_str("abcde"),
                   Err("OSType string must be 4 bytes (was 5)".to_string()));
    }
}
