use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use thiserror::Error;

/// Decoded 8-bit image, rows stored bottom to top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Cannot open image: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot decode PNG: {0}")]
    Decoding(#[from] png::DecodingError),
}

impl ImageData {
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, ImageError> {
        let file = File::open(path)?;

        Self::decode_png(BufReader::new(file))
    }

    pub fn decode_png<R: Read>(reader: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(reader);
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;

        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        let mut image = Self {
            width: info.width,
            height: info.height,
            channels: info.color_type.samples() as u8,
            pixels: buf,
        };

        // GL expects the first row at the bottom.
        image.flip_vertical();

        Ok(image)
    }

    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * self.channels as usize;
        let height = self.height as usize;

        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// RGB checkerboard used when no texture can be loaded.
    pub fn checkerboard(size: u32, cells: u32) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let mut pixels = Vec::with_capacity((size * size * 3) as usize);

        for y in 0..size {
            for x in 0..size {
                let light = ((x / cell) + (y / cell)) % 2 == 0;
                let value = if light { 230 } else { 60 };
                pixels.extend_from_slice(&[value, value, value]);
            }
        }

        Self {
            width: size,
            height: size,
            channels: 3,
            pixels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(width: u32, height: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn decodes_rgba_bottom_up() {
        // Top row red, bottom row blue.
        let data = [
            255, 0, 0, 255, 255, 0, 0, 255, //
            0, 0, 255, 255, 0, 0, 255, 255,
        ];
        let bytes = encode(2, 2, png::ColorType::Rgba, &data);

        let image = ImageData::decode_png(bytes.as_slice()).unwrap();

        assert_eq!((image.width, image.height, image.channels), (2, 2, 4));
        assert_eq!(&image.pixels[..4], &[0, 0, 255, 255]);
        assert_eq!(&image.pixels[8..12], &[255, 0, 0, 255]);
    }

    #[test]
    fn decodes_rgb() {
        let data = [10, 20, 30, 40, 50, 60, 70, 80, 90];
        let bytes = encode(3, 1, png::ColorType::Rgb, &data);

        let image = ImageData::decode_png(bytes.as_slice()).unwrap();

        assert_eq!(image.channels, 3);
        assert_eq!(image.pixels, data);
    }

    #[test]
    fn garbage_is_an_error() {
        let res = ImageData::decode_png(&b"definitely not a png"[..]);
        assert!(matches!(res, Err(ImageError::Decoding(_))));
    }

    #[test]
    fn flip_odd_height() {
        let mut image = ImageData {
            width: 1,
            height: 3,
            channels: 1,
            pixels: vec![1, 2, 3],
        };

        image.flip_vertical();
        assert_eq!(image.pixels, vec![3, 2, 1]);
    }

    #[test]
    fn checkerboard_alternates() {
        let board = ImageData::checkerboard(4, 2);

        assert_eq!(board.pixels.len(), 4 * 4 * 3);
        assert_eq!(board.pixels[0], 230);
        // (2, 0) is in the second cell.
        assert_eq!(board.pixels[2 * 3], 60);
        assert_eq!(board.pixels[(2 * 4 + 2) * 3], 230);
    }
}
