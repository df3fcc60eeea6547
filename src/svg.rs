use resvg::{tiny_skia, usvg};
use std::fs;
use std::io::{self, Error, ErrorKind};
use std::path::Path;
use std::sync::Arc;

use crate::image::Image;
use crate::raster::Rasterizer;

/// Renders an SVG document to square PNG images.  The document is stretched
/// to fill the full square regardless of its aspect ratio.
pub struct SvgRasterizer {
    tree: usvg::Tree,
}

impl SvgRasterizer {
    /// Parses an SVG document.  System fonts are loaded so that text
    /// elements render.
    pub fn from_data(data: &[u8]) -> io::Result<SvgRasterizer> {
        let mut options = usvg::Options::default();
        Arc::make_mut(&mut options.fontdb).load_system_fonts();
        let tree = usvg::Tree::from_data(data, &options).map_err(|error| {
            Error::new(ErrorKind::InvalidData,
                       format!("malformed SVG: {}", error))
        })?;
        Ok(SvgRasterizer { tree })
    }

    /// Reads and parses an SVG file.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<SvgRasterizer> {
        let data = fs::read(path)?;
        SvgRasterizer::from_data(&data)
    }

    /// Returns the document's intrinsic width and height.
    pub fn size(&self) -> (f32, f32) {
        let size = self.tree.size();
        (size.width(), size.height())
    }

    /// Renders the document as a `pixel_size` by `pixel_size` image.
    pub fn render_image(&self, pixel_size: u32) -> io::Result<Image> {
        let mut pixmap = tiny_skia::Pixmap::new(pixel_size, pixel_size)
            .ok_or_else(|| {
                let msg = format!("cannot allocate a {}x{} canvas",
                                  pixel_size,
                                  pixel_size);
                Error::new(ErrorKind::InvalidInput, msg)
            })?;
        let (width, height) = self.size();
        let transform =
            tiny_skia::Transform::from_scale(pixel_size as f32 / width,
                                             pixel_size as f32 / height);
        resvg::render(&self.tree, transform, &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha; PNG wants straight alpha.
        let mut rgba = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            rgba.extend_from_slice(&[color.red(),
                                     color.green(),
                                     color.blue(),
                                     color.alpha()]);
        }
        Image::from_rgba_data(pixel_size, pixel_size, rgba)
    }
}

impl Rasterizer for SvgRasterizer {
    fn render(&self, pixel_size: u32) -> io::Result<Vec<u8>> {
        let image = self.render_image(pixel_size)?;
        let mut png = Vec::new();
        image.write_png(&mut png)?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const RED_SQUARE: &[u8] = b"<svg xmlns=\"http://www.w3.org/2000/svg\" \
        width=\"64\" height=\"64\" viewBox=\"0 0 64 64\">\
        <rect x=\"0\" y=\"0\" width=\"64\" height=\"64\" fill=\"#ff0000\"/>\
        </svg>";

    #[test]
    fn renders_requested_size() {
        let rasterizer = SvgRasterizer::from_data(RED_SQUARE).unwrap();
        assert_eq!((64.0, 64.0), rasterizer.size());
        let image = rasterizer.render_image(16).unwrap();
        assert_eq!(16, image.width());
        assert_eq!(16, image.height());
        assert_eq!([255, 0, 0, 255], image.pixel(8, 8));
    }

    #[test]
    fn render_produces_png() {
        let rasterizer = SvgRasterizer::from_data(RED_SQUARE).unwrap();
        let png = rasterizer.render(24).unwrap();
        let image = Image::read_png(Cursor::new(png)).unwrap();
        assert_eq!(24, image.width());
        assert_eq!([255, 0, 0, 255], image.pixel(12, 12));
    }

    #[test]
    fn zero_size_fails() {
        let rasterizer = SvgRasterizer::from_data(RED_SQUARE).unwrap();
        let error = rasterizer.render(0).unwrap_err();
        assert_eq!(ErrorKind::InvalidInput, error.kind());
    }

    #[test]
    fn malformed_svg_fails() {
        let error = SvgRasterizer::from_data(b"<svg").err().unwrap();
        assert_eq!(ErrorKind::InvalidData, error.kind());
    }
}
