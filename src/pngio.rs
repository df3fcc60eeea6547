use crate::image::{gray_alpha_to_rgba, grayscale_to_rgba, rgb_to_rgba, Image};
use std::io::{self, BufRead, Error, ErrorKind, Seek, Write};

impl Image {
    /// Reads an image from a PNG file, converting it to RGBA.
    pub fn read_png<R: BufRead + Seek>(input: R) -> io::Result<Image> {
        let mut decoder = png::Decoder::new(input);
        decoder.set_transformations(
            png::Transformations::STRIP_16 | png::Transformations::EXPAND,
        );
        let info = decoder.read_header_info()?;
        let (width, height) = (info.width, info.height);
        let mut reader = decoder.read_info()?;

        let (color_type, bit_depth) = reader.output_color_type();
        if bit_depth != png::BitDepth::Eight {
            let msg = format!("unsupported PNG bit depth: {:?}", bit_depth);
            return Err(Error::new(ErrorKind::InvalidData, msg));
        }
        let buffer_size = reader.output_buffer_size().ok_or_else(|| {
            Error::new(ErrorKind::InvalidData, "PNG image is too large")
        })?;
        let mut buffer = vec![0u8; buffer_size];
        reader.next_frame(&mut buffer)?;
        reader.finish()?;

        let rgba = match color_type {
            png::ColorType::Rgba => buffer,
            png::ColorType::Rgb => rgb_to_rgba(&buffer),
            png::ColorType::GrayscaleAlpha => gray_alpha_to_rgba(&buffer),
            png::ColorType::Grayscale => grayscale_to_rgba(&buffer),
            _ => unreachable!(), // EXPAND prevents paletted output
        };
        Image::from_rgba_data(width, height, rgba)
    }

    /// Writes the image to a PNG file.
    pub fn write_png<W: Write>(&self, output: W) -> io::Result<()> {
        let mut encoder = png::Encoder::new(output, self.width(), self.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(self.data())?;
        writer.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn png_round_trip() {
        let mut image = Image::new(3, 2);
        image.data_mut()[4..8].copy_from_slice(&[10, 20, 30, 40]);
        let mut encoded = Vec::new();
        image.write_png(&mut encoded).expect("write failed");
        assert_eq!(b"\x89PNG", &encoded[..4]);
        let decoded = Image::read_png(Cursor::new(encoded)).unwrap();
        assert_eq!(image, decoded);
        assert_eq!([10, 20, 30, 40], decoded.pixel(1, 0));
    }

    #[test]
    fn read_garbage_fails() {
        assert!(Image::read_png(Cursor::new(b"not a png".to_vec())).is_err());
    }
}
