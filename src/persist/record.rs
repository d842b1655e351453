//! Canvas record codec
//!
//! Layout (little-endian):
//!
//! ```text
//! position   3 x f32   (z unused, written as 0)
//! scale      3 x f32   (z unused, written as 1)
//! visible    u8
//! width      i32       <= 0 for an uninitialized canvas
//! height     i32
//! byte count i32
//! png        byte count bytes, RGBA8
//! ```
//!
//! Canvas row 0 is the bottom of the art, so it is stored as the last row of
//! the PNG image.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use super::PersistError;
use crate::canvas::{Canvas, CanvasTransform};
use crate::math::Vec2;
use crate::raster::PixelBuffer;

/// Append one canvas record to `out`
pub fn write_canvas(canvas: &Canvas, out: &mut Vec<u8>) -> Result<(), PersistError> {
    let transform = canvas.transform();
    write_vec3(out, transform.position, 0.0);
    write_vec3(out, transform.size, 1.0);
    out.push(canvas.is_visible() as u8);

    if !canvas.is_initialized() {
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        out.extend_from_slice(&0i32.to_le_bytes());
        return Ok(());
    }

    let png = encode_png(canvas.pixels())?;
    out.extend_from_slice(&dimension(canvas.pixel_width())?.to_le_bytes());
    out.extend_from_slice(&dimension(canvas.pixel_height())?.to_le_bytes());
    out.extend_from_slice(&dimension(png.len())?.to_le_bytes());
    out.extend_from_slice(&png);
    Ok(())
}

/// Read one canvas record
pub fn read_canvas(reader: &mut ByteReader<'_>) -> Result<Canvas, PersistError> {
    let position = reader.read_vec3()?;
    let size = reader.read_vec3()?;
    let visible = reader.read_u8()? != 0;
    let width = reader.read_i32()?;
    let height = reader.read_i32()?;
    let byte_count = reader.read_i32()?;
    let byte_count = usize::try_from(byte_count)
        .map_err(|_| PersistError::Invalid(format!("negative image size {}", byte_count)))?;
    let png = reader.read_bytes(byte_count)?;

    let mut canvas = if width > 0 && height > 0 {
        let transform = CanvasTransform::new(position, size);
        if !transform.is_valid() {
            return Err(PersistError::Invalid(format!(
                "degenerate canvas placement: position {:?}, scale {:?}",
                position, size
            )));
        }
        let pixels = decode_png(png)?;
        let expected = (width as usize, height as usize);
        let found = (pixels.width(), pixels.height());
        if expected != found {
            return Err(PersistError::DimensionMismatch { expected, found });
        }
        Canvas::from_pixels(transform, pixels)
    } else {
        let mut canvas = Canvas::new();
        canvas.set_position(position);
        canvas
    };
    canvas.set_visible(visible);
    Ok(canvas)
}

/// Encode pixels as an RGBA8 PNG, bottom row last
pub fn encode_png(pixels: &PixelBuffer) -> Result<Vec<u8>, PersistError> {
    let (width, height) = (pixels.width(), pixels.height());
    let bytes = flip_rows(&pixels.to_rgba_bytes(), width, height);
    let image = RgbaImage::from_raw(width as u32, height as u32, bytes).ok_or(
        PersistError::DimensionMismatch {
            expected: (width, height),
            found: (width, height),
        },
    )?;

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Decode a PNG (any colour type) into pixels, bottom row first
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, PersistError> {
    let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)?.to_rgba8();
    let (width, height) = (image.width() as usize, image.height() as usize);
    let flipped = flip_rows(image.as_raw(), width, height);
    PixelBuffer::from_rgba_bytes(width, height, &flipped).ok_or(PersistError::DimensionMismatch {
        expected: (width, height),
        found: (width, height),
    })
}

/// Reverse row order of a tightly packed RGBA image
fn flip_rows(bytes: &[u8], width: usize, height: usize) -> Vec<u8> {
    let stride = width * 4;
    if stride == 0 {
        return Vec::new();
    }
    bytes
        .chunks_exact(stride)
        .take(height)
        .rev()
        .flatten()
        .copied()
        .collect()
}

fn dimension(value: usize) -> Result<i32, PersistError> {
    i32::try_from(value).map_err(|_| PersistError::Invalid(format!("{} does not fit in i32", value)))
}

fn write_vec3(out: &mut Vec<u8>, v: Vec2, z: f32) {
    out.extend_from_slice(&v.x.to_le_bytes());
    out.extend_from_slice(&v.y.to_le_bytes());
    out.extend_from_slice(&z.to_le_bytes());
}

/// Little-endian cursor over a byte slice
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], PersistError> {
        if self.remaining() < len {
            return Err(PersistError::Truncated {
                offset: self.offset,
                needed: len,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PersistError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, PersistError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i32(&mut self) -> Result<i32, PersistError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, PersistError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, PersistError> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Reads x, y, z and drops z
    fn read_vec3(&mut self) -> Result<Vec2, PersistError> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let _z = self.read_f32()?;
        Ok(Vec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Color;

    fn painted_canvas() -> Canvas {
        let mut canvas = Canvas::with_blocks(2, 1, Color::WHITE);
        canvas.set_position(Vec2::new(3.5, -2.0));
        canvas.begin_drawing(false);
        let mut art = PixelBuffer::new(32, 16);
        for (i, y) in (0..16).enumerate() {
            for x in 0..32 {
                let c = Color::rgba((x * 8) as u8, (y * 16) as u8, (i * 3) as u8, (255 - x) as u8);
                art.set(x, y, c);
            }
        }
        canvas.blit(&art);
        canvas.end_drawing();
        canvas
    }

    #[test]
    fn test_canvas_record_round_trip() {
        let canvas = painted_canvas();
        let mut bytes = Vec::new();
        write_canvas(&canvas, &mut bytes).unwrap();

        let mut reader = ByteReader::new(&bytes);
        let loaded = read_canvas(&mut reader).unwrap();
        assert_eq!(reader.remaining(), 0);
        assert!(loaded.is_initialized());
        assert!(loaded.is_visible());
        assert_eq!(loaded.transform(), canvas.transform());
        assert_eq!(loaded.pixels(), canvas.pixels());
    }

    #[test]
    fn test_header_layout() {
        let mut canvas = painted_canvas();
        canvas.set_visible(false);
        let mut bytes = Vec::new();
        write_canvas(&canvas, &mut bytes).unwrap();

        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.read_f32().unwrap(), 3.5);
        assert_eq!(r.read_f32().unwrap(), -2.0);
        assert_eq!(r.read_f32().unwrap(), 0.0);
        assert_eq!(r.read_f32().unwrap(), 2.0);
        assert_eq!(r.read_f32().unwrap(), 1.0);
        assert_eq!(r.read_f32().unwrap(), 1.0);
        assert_eq!(r.read_u8().unwrap(), 0);
        assert_eq!(r.read_i32().unwrap(), 32);
        assert_eq!(r.read_i32().unwrap(), 16);
        let len = r.read_i32().unwrap() as usize;
        assert_eq!(len, r.remaining());
        assert_eq!(&r.read_bytes(8).unwrap()[1..4], b"PNG");
    }

    #[test]
    fn test_png_bottom_row_is_last_image_row() {
        let mut pixels = PixelBuffer::filled(2, 2, Color::WHITE);
        pixels.set(0, 0, Color::RED);
        let png = encode_png(&pixels).unwrap();
        let image = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(decode_png(&png).unwrap(), pixels);
    }

    #[test]
    fn test_uninitialized_canvas_record() {
        let mut canvas = Canvas::new();
        canvas.set_position(Vec2::new(1.0, 2.0));
        let mut bytes = Vec::new();
        write_canvas(&canvas, &mut bytes).unwrap();
        assert_eq!(bytes.len(), 24 + 1 + 12);

        let loaded = read_canvas(&mut ByteReader::new(&bytes)).unwrap();
        assert!(!loaded.is_initialized());
        assert_eq!(loaded.transform().position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_truncated_and_mismatched_records() {
        let canvas = painted_canvas();
        let mut bytes = Vec::new();
        write_canvas(&canvas, &mut bytes).unwrap();

        let cut = &bytes[..bytes.len() - 10];
        assert!(matches!(
            read_canvas(&mut ByteReader::new(cut)),
            Err(PersistError::Truncated { .. })
        ));

        // Claim a width the PNG does not have
        let mut wrong = bytes.clone();
        wrong[25..29].copy_from_slice(&33i32.to_le_bytes());
        assert!(matches!(
            read_canvas(&mut ByteReader::new(&wrong)),
            Err(PersistError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_degenerate_scale_is_rejected() {
        let canvas = painted_canvas();
        let mut bytes = Vec::new();
        write_canvas(&canvas, &mut bytes).unwrap();

        for bad in [0.0f32, -2.0, f32::NAN, f32::INFINITY] {
            let mut record = bytes.clone();
            // Scale x follows the three position floats
            record[12..16].copy_from_slice(&bad.to_le_bytes());
            assert!(
                matches!(read_canvas(&mut ByteReader::new(&record)), Err(PersistError::Invalid(_))),
                "scale {} accepted",
                bad
            );
        }
    }
}
