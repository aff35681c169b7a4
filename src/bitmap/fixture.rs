//! BMP file builder for tests

use super::header::LCS_SRGB;

pub struct BmpFixture {
    pub magic: [u8; 2],
    pub width: i32,
    pub height: i32,
    pub bit_count: u16,
    pub planes: u16,
    pub compression: u32,
    /// Red, green, blue, alpha masks; written after the info header
    pub masks: Option<[u32; 4]>,
    pub color_space: u32,
    /// Vendor bytes between the headers and the pixel data
    pub extra_header_bytes: usize,
    /// Stored value of pixel `x` in file row `row`, little-endian
    pub pixel: fn(u32, u32) -> u32,
}

/// Row pad bytes are filled with this so reading them as pixels shows up
pub const PAD_BYTE: u8 = 0xEE;

impl BmpFixture {
    pub fn new(width: i32, height: i32, bit_count: u16) -> Self {
        Self {
            magic: *b"BM",
            width,
            height,
            bit_count,
            planes: 1,
            compression: 0,
            masks: None,
            color_space: LCS_SRGB,
            extra_header_bytes: 0,
            pixel: |x, row| (row << 8) | x,
        }
    }

    pub fn with_pixels(mut self, pixel: fn(u32, u32) -> u32) -> Self {
        self.pixel = pixel;
        self
    }

    pub fn stride(&self) -> usize {
        (self.width as usize * self.bit_count as usize).div_ceil(32) * 4
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mask_len = if self.masks.is_some() { 84 } else { 0 };
        let info_size = 40 + mask_len as u32;
        let offset = 14 + info_size as usize + self.extra_header_bytes;
        let rows = self.height.unsigned_abs() as usize;
        let stride = self.stride();
        let bytes_per_pixel = (self.bit_count as usize / 8).max(1);

        let mut out = Vec::with_capacity(offset + stride * rows);
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&((offset + stride * rows) as u32).to_le_bytes());
        out.extend_from_slice(&[0u8; 4]);
        out.extend_from_slice(&(offset as u32).to_le_bytes());

        out.extend_from_slice(&info_size.to_le_bytes());
        out.extend_from_slice(&self.width.to_le_bytes());
        out.extend_from_slice(&self.height.to_le_bytes());
        out.extend_from_slice(&self.planes.to_le_bytes());
        out.extend_from_slice(&self.bit_count.to_le_bytes());
        out.extend_from_slice(&self.compression.to_le_bytes());
        out.extend_from_slice(&((stride * rows) as u32).to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&2835i32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());

        if let Some(masks) = self.masks {
            for mask in masks {
                out.extend_from_slice(&mask.to_le_bytes());
            }
            out.extend_from_slice(&self.color_space.to_le_bytes());
            out.extend_from_slice(&[0u8; 64]);
        }

        out.resize(offset, 0xAB);

        for row in 0..rows as u32 {
            let row_start = out.len();
            for x in 0..self.width.max(0) as u32 {
                let value = (self.pixel)(x, row).to_le_bytes();
                out.extend_from_slice(&value[..bytes_per_pixel]);
            }
            out.resize(row_start + stride, PAD_BYTE);
        }
        out
    }
}
