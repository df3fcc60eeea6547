extern crate svg2icon;

use pretty_assertions::assert_eq;
use std::io::{self, Cursor, Error, ErrorKind};
use std::sync::atomic::{AtomicUsize, Ordering};
use svg2icon::{encode_icns, encode_ico, Entry, IconDir, IconFamily, IconType,
               ICO_SIZES};

/// Deterministic stand-in for a real rasterizer: the payload for each size
/// has a distinct length and content.
fn fake_png(size: u32) -> io::Result<Vec<u8>> {
    let mut data = b"\x89PNG\r\n\x1a\n".to_vec();
    data.extend(std::iter::repeat(size as u8).take(size as usize / 4));
    data.extend_from_slice(&size.to_be_bytes());
    Ok(data)
}

fn read_u16_le(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn read_u32_le(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_u32_be(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[test]
fn ico_header() {
    let bytes = encode_ico(&fake_png).unwrap();
    assert_eq!(&[0u8, 0, 1, 0, 7, 0][..], &bytes[..6]);
}

#[test]
fn ico_directory_entries() {
    let bytes = encode_ico(&fake_png).unwrap();
    let mut expected_offset = 6 + 16 * ICO_SIZES.len() as u32;
    for (index, &size) in ICO_SIZES.iter().enumerate() {
        let record = 6 + 16 * index;
        let expected_dimension = if size == 256 { 0 } else { size as u8 };
        assert_eq!(expected_dimension, bytes[record]);
        assert_eq!(expected_dimension, bytes[record + 1]);
        assert_eq!(0, bytes[record + 2]);
        assert_eq!(0, bytes[record + 3]);
        assert_eq!(1, read_u16_le(&bytes, record + 4));
        assert_eq!(32, read_u16_le(&bytes, record + 6));
        let length = read_u32_le(&bytes, record + 8);
        let offset = read_u32_le(&bytes, record + 12);
        let payload = fake_png(size).unwrap();
        assert_eq!(payload.len() as u32, length);
        assert_eq!(expected_offset, offset);
        let start = offset as usize;
        assert_eq!(&payload[..], &bytes[start..start + length as usize]);
        expected_offset += length;
    }
    assert_eq!(expected_offset as usize, bytes.len());
}

#[test]
fn ico_round_trip() {
    let bytes = encode_ico(&fake_png).unwrap();
    let icon_dir = IconDir::read(Cursor::new(&bytes)).unwrap();
    assert_eq!(ICO_SIZES.len(), icon_dir.entries().len());
    for (entry, &size) in icon_dir.entries().iter().zip(ICO_SIZES.iter()) {
        assert_eq!(size, entry.width());
        assert_eq!(size, entry.height());
        assert_eq!(&fake_png(size).unwrap()[..], entry.data());
    }
}

#[test]
fn icns_layout() {
    let bytes = encode_icns(&fake_png).unwrap();
    assert_eq!(b"icns", &bytes[..4]);
    let mut position = 8;
    let mut sum_of_lengths = 0;
    for icon_type in &IconType::STANDARD {
        let payload = fake_png(icon_type.pixel_size()).unwrap();
        assert_eq!(&icon_type.ostype().0[..], &bytes[position..position + 4]);
        let length = read_u32_be(&bytes, position + 4);
        assert_eq!(payload.len() as u32 + 8, length);
        assert_eq!(&payload[..],
                   &bytes[position + 8..position + length as usize]);
        position += length as usize;
        sum_of_lengths += length;
    }
    assert_eq!(position, bytes.len());
    assert_eq!(8 + sum_of_lengths, read_u32_be(&bytes, 4));
}

#[test]
fn icns_round_trip() {
    let bytes = encode_icns(&fake_png).unwrap();
    let family = IconFamily::read(Cursor::new(&bytes)).unwrap();
    assert_eq!(IconType::STANDARD.len(), family.elements.len());
    for (element, &icon_type) in family.elements
        .iter()
        .zip(IconType::STANDARD.iter()) {
        assert_eq!(Some(icon_type), element.icon_type());
        assert_eq!(fake_png(icon_type.pixel_size()).unwrap(), element.data);
    }
}

#[test]
fn encoding_is_deterministic() {
    assert_eq!(encode_ico(&fake_png).unwrap(), encode_ico(&fake_png).unwrap());
    assert_eq!(encode_icns(&fake_png).unwrap(),
               encode_icns(&fake_png).unwrap());
}

#[test]
fn icns_renders_duplicate_sizes_separately() {
    let calls = AtomicUsize::new(0);
    let counting = |size: u32| -> io::Result<Vec<u8>> {
        calls.fetch_add(1, Ordering::SeqCst);
        fake_png(size)
    };
    encode_icns(&counting).unwrap();
    assert_eq!(IconType::STANDARD.len(), calls.load(Ordering::SeqCst));
}

#[test]
fn ico_failure_on_third_size() {
    let failing = |size: u32| -> io::Result<Vec<u8>> {
        if size == ICO_SIZES[2] {
            Err(Error::new(ErrorKind::Other, "renderer crashed"))
        } else {
            fake_png(size)
        }
    };
    match encode_ico(&failing) {
        Err(svg2icon::Error::Rasterization { entry, source }) => {
            assert_eq!(Entry::Ico(32), entry);
            assert_eq!("renderer crashed", source.to_string());
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn icns_failure_does_not_affect_ico() {
    let no_retina = |size: u32| -> io::Result<Vec<u8>> {
        if size > 256 {
            Err(Error::new(ErrorKind::Other, "too large"))
        } else {
            fake_png(size)
        }
    };
    match encode_icns(&no_retina) {
        Err(svg2icon::Error::Rasterization { entry, .. }) => {
            assert_eq!(Entry::Icns(IconType::RGBA32_512x512), entry);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(encode_ico(&no_retina).is_ok());
}
