//! Flat RGBA pixel storage addressed by grid cell

use super::types::Color;

/// Row-major pixel store, index = x + y * width
///
/// Every accessor tolerates out-of-range coordinates: reads return the
/// transparent sentinel, writes are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl PixelBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Build from row-major RGBA bytes (4 per pixel). Returns None on a
    /// length mismatch.
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width * height * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| Color::from_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(Self { width, height, pixels })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Cell index, or None when the coordinate is off the buffer
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(x + y * self.width)
    }

    pub fn try_get(&self, x: i32, y: i32) -> Option<Color> {
        self.index_of(x, y).map(|i| self.pixels[i])
    }

    /// Read a cell; off-buffer reads return `Color::TRANSPARENT`
    pub fn get(&self, x: i32, y: i32) -> Color {
        self.try_get(x, y).unwrap_or(Color::TRANSPARENT)
    }

    /// Write a cell; off-buffer writes are ignored. Returns whether the
    /// write landed.
    pub fn set(&mut self, x: i32, y: i32, color: Color) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.pixels[i] = color;
                true
            }
            None => false,
        }
    }

    pub fn pixel_at(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    pub fn set_at(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    pub fn clear(&mut self, color: Color) {
        for pixel in &mut self.pixels {
            *pixel = color;
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy another buffer of the same size into this one
    pub fn copy_from(&mut self, other: &PixelBuffer) {
        if self.width == other.width && self.height == other.height {
            self.pixels.copy_from_slice(&other.pixels);
        } else {
            *self = other.clone();
        }
    }

    /// Row-major RGBA bytes, row 0 first
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for color in &self.pixels {
            rgba.extend_from_slice(&color.to_bytes());
        }
        rgba
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_get() {
        let mut buf = PixelBuffer::new(8, 4);
        for y in 0..4 {
            for x in 0..8 {
                let c = Color::rgba(x as u8, y as u8, 7, 200);
                assert!(buf.set(x, y, c));
                assert_eq!(buf.get(x, y), c);
            }
        }
    }

    #[test]
    fn test_out_of_bounds_set_is_noop() {
        let mut buf = PixelBuffer::filled(3, 3, Color::WHITE);
        let before = buf.clone();
        for &(x, y) in &[(-1, 0), (0, -1), (3, 0), (0, 3), (-1, -1), (i32::MAX, 1), (1, i32::MIN)] {
            assert!(!buf.set(x, y, Color::RED));
        }
        assert_eq!(buf, before);
    }

    #[test]
    fn test_out_of_bounds_get_is_sentinel() {
        let buf = PixelBuffer::filled(2, 2, Color::WHITE);
        // (2, 0) would alias (0, 1) with a naive index
        assert_eq!(buf.get(2, 0), Color::TRANSPARENT);
        assert_eq!(buf.try_get(2, 0), None);
        assert_eq!(buf.get(-1, 1), Color::TRANSPARENT);
        assert_eq!(buf.index_of(1, 1), Some(3));
    }

    #[test]
    fn test_clear() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.set(1, 1, Color::RED);
        buf.clear(Color::BLUE);
        assert!(buf.pixels().iter().all(|&c| c == Color::BLUE));
    }

    #[test]
    fn test_rgba_bytes() {
        let mut buf = PixelBuffer::new(2, 1);
        buf.set(1, 0, Color::rgba(1, 2, 3, 4));
        let bytes = buf.to_rgba_bytes();
        assert_eq!(bytes, vec![0, 0, 0, 0, 1, 2, 3, 4]);
        assert_eq!(PixelBuffer::from_rgba_bytes(2, 1, &bytes), Some(buf));
        assert_eq!(PixelBuffer::from_rgba_bytes(2, 2, &bytes), None);
    }
}
