//! Little-endian BMP header layouts

use serde::Serialize;

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
/// Four channel masks, the color space tag and 64 reserved bytes
pub const COLOR_HEADER_SIZE: usize = 84;

/// "BM" read as a little-endian u16
pub const BMP_MAGIC: u16 = 0x4D42;
/// "sRGB" color space tag
pub const LCS_SRGB: u32 = 0x7352_4742;

fn le_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn le_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn le_i32(bytes: &[u8], at: usize) -> i32 {
    le_u32(bytes, at) as i32
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub file_type: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Start of pixel data, in bytes from the beginning of the file
    pub offset_data: u32,
}

impl FileHeader {
    pub fn from_bytes(bytes: &[u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            file_type: le_u16(bytes, 0),
            file_size: le_u32(bytes, 2),
            reserved1: le_u16(bytes, 6),
            reserved2: le_u16(bytes, 8),
            offset_data: le_u32(bytes, 10),
        }
    }

    pub fn has_magic(&self) -> bool {
        self.file_type == BMP_MAGIC
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InfoHeader {
    /// Declared size of this header, larger for V4/V5 headers
    pub size: u32,
    pub width: i32,
    /// Positive: bottom-up rows. Negative: top-down rows.
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pixels_per_meter: i32,
    pub y_pixels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl InfoHeader {
    pub fn from_bytes(bytes: &[u8; INFO_HEADER_SIZE]) -> Self {
        Self {
            size: le_u32(bytes, 0),
            width: le_i32(bytes, 4),
            height: le_i32(bytes, 8),
            planes: le_u16(bytes, 12),
            bit_count: le_u16(bytes, 14),
            compression: le_u32(bytes, 16),
            size_image: le_u32(bytes, 20),
            x_pixels_per_meter: le_i32(bytes, 24),
            y_pixels_per_meter: le_i32(bytes, 28),
            colors_used: le_u32(bytes, 32),
            colors_important: le_u32(bytes, 36),
        }
    }
}

/// Channel masks for 32-bit images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorHeader {
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
    pub color_space_type: u32,
}

impl Default for ColorHeader {
    /// BGRA in sRGB, the only layout accepted
    fn default() -> Self {
        Self {
            red_mask: 0x00ff_0000,
            green_mask: 0x0000_ff00,
            blue_mask: 0x0000_00ff,
            alpha_mask: 0xff00_0000,
            color_space_type: LCS_SRGB,
        }
    }
}

impl ColorHeader {
    pub fn from_bytes(bytes: &[u8; COLOR_HEADER_SIZE]) -> Self {
        Self {
            red_mask: le_u32(bytes, 0),
            green_mask: le_u32(bytes, 4),
            blue_mask: le_u32(bytes, 8),
            alpha_mask: le_u32(bytes, 12),
            color_space_type: le_u32(bytes, 16),
        }
    }

    pub fn masks_match(&self, other: &ColorHeader) -> bool {
        self.red_mask == other.red_mask
            && self.green_mask == other.green_mask
            && self.blue_mask == other.blue_mask
            && self.alpha_mask == other.alpha_mask
    }
}
