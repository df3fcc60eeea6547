use std::io::{self, Error, ErrorKind};

/// A decoded RGBA image with straight (non-premultiplied) alpha.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Box<[u8]>,
}

impl Image {
    /// Creates a new image with all pixel data set to zero (fully
    /// transparent black).
    pub fn new(width: u32, height: u32) -> Image {
        let data_bytes = 4 * (width as usize) * (height as usize);
        Image {
            width,
            height,
            data: vec![0u8; data_bytes].into_boxed_slice(),
        }
    }

    /// Creates an image from row-major RGBA data.  Returns an error if
    /// `data` is not exactly `4 * width * height` bytes long.
    pub fn from_rgba_data(width: u32,
                          height: u32,
                          data: Vec<u8>)
                          -> io::Result<Image> {
        let expected = 4 * (width as usize) * (height as usize);
        if data.len() != expected {
            let msg = format!("wrong RGBA data length (was {}, but must be \
                               {} for {}x{} image)",
                              data.len(),
                              expected,
                              width,
                              height);
            return Err(Error::new(ErrorKind::InvalidInput, msg));
        }
        Ok(Image {
            width,
            height,
            data: data.into_boxed_slice(),
        })
    }

    /// Returns the width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the RGBA value of the pixel at the given position.  Panics if
    /// the position is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height);
        let start = 4 * (y as usize * self.width as usize + x as usize);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.data[start..start + 4]);
        rgba
    }

    /// Returns a reference to the image's pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a mutable reference to the image's pixel data.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Converts RGB image data into RGBA.
pub(crate) fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    assert_eq!(rgb.len() % 3, 0);
    let mut rgba = Vec::with_capacity(rgb.len() / 3 * 4);
    for pixel in rgb.chunks_exact(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(u8::MAX);
    }
    rgba
}

/// Converts grayscale-with-alpha image data into RGBA.
pub(crate) fn gray_alpha_to_rgba(gray_alpha: &[u8]) -> Vec<u8> {
    assert_eq!(gray_alpha.len() % 2, 0);
    let mut rgba = Vec::with_capacity(gray_alpha.len() * 2);
    for pixel in gray_alpha.chunks_exact(2) {
        rgba.extend_from_slice(&[pixel[0], pixel[0], pixel[0], pixel[1]]);
    }
    rgba
}

/// Converts grayscale image data into RGBA.
pub(crate) fn grayscale_to_rgba(gray: &[u8]) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for &value in gray {
        rgba.extend_from_slice(&[value, value, value, u8::MAX]);
    }
    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_transparent() {
        let image = Image::new(3, 2);
        assert_eq!(24, image.data().len());
        assert_eq!([0, 0, 0, 0], image.pixel(2, 1));
    }

    #[test]
    fn from_rgba_data_checks_length() {
        assert!(Image::from_rgba_data(2, 2, vec![0u8; 15]).is_err());
        let image = Image::from_rgba_data(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8])
            .unwrap();
        assert_eq!([5, 6, 7, 8], image.pixel(1, 0));
    }

    #[test]
    fn conversions_to_rgba() {
        assert_eq!(vec![1, 2, 3, 255, 4, 5, 6, 255],
                   rgb_to_rgba(&[1, 2, 3, 4, 5, 6]));
        assert_eq!(vec![9, 9, 9, 128], gray_alpha_to_rgba(&[9, 128]));
        assert_eq!(vec![7, 7, 7, 255], grayscale_to_rgba(&[7]));
    }
}
