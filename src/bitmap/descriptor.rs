use serde::Serialize;
use std::io;
use tracing::{debug, warn};

use super::header::{
    ColorHeader, FileHeader, InfoHeader, COLOR_HEADER_SIZE, FILE_HEADER_SIZE, INFO_HEADER_SIZE,
};
use crate::error::{Error, Result};
use crate::storage::{Storage, StorageFile};

/// Largest width or height drawn; panel coordinates are 16-bit
pub const MAX_DIMENSION: i32 = u16::MAX as i32;

/// Source pixel encodings the renderer can convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    /// 16 bits per pixel, little-endian X1R5G5B5
    Rgb555,
    /// 24 bits per pixel, stored blue, green, red
    Bgr888,
}

impl PixelFormat {
    fn from_bit_depth(bits: u16) -> Option<Self> {
        match bits {
            16 => Some(PixelFormat::Rgb555),
            24 => Some(PixelFormat::Bgr888),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb555 => 2,
            PixelFormat::Bgr888 => 3,
        }
    }
}

/// Parsed header metadata of a BMP file
///
/// A parse that reads the file successfully but finds an unsupported layout
/// (planes, compression, bit depth) returns `Ok` and leaves the descriptor
/// invalid; callers check both.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BitmapDescriptor {
    file_header: FileHeader,
    info_header: InfoHeader,
    color_header: Option<ColorHeader>,
    /// Declared pixel data offset, where rows actually start in the file
    data_start: u32,
    row_order_flipped: bool,
    valid: bool,
}

impl BitmapDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `path` and parse its headers; the file is closed before returning
    pub fn load<S: Storage>(&mut self, storage: &mut S, path: &str) -> Result<()> {
        *self = Self::default();

        let mut file = storage.open(path).map_err(|source| {
            warn!("Could not open file {}: {}", path, source);
            Error::CantOpenFile {
                path: path.to_string(),
                source,
            }
        })?;

        let result = self.parse(&mut file);
        file.close();

        match &result {
            Ok(()) if self.valid => debug!(
                "Loaded {}: {}x{} @ {} bpp{}",
                path,
                self.width(),
                self.height(),
                self.bit_depth(),
                if self.row_order_flipped { " (top-down)" } else { "" }
            ),
            Ok(()) => warn!(
                "{} is a readable bitmap but not renderable ({} bpp, compression {}, {} planes)",
                path, self.info_header.bit_count, self.info_header.compression, self.info_header.planes
            ),
            Err(e) => warn!("Failed to parse {}: {}", path, e),
        }
        result
    }

    /// Parse headers from an open file positioned anywhere
    pub fn parse<F: StorageFile>(&mut self, file: &mut F) -> Result<()> {
        *self = Self::default();

        file.seek(0)?;
        let mut file_bytes = [0u8; FILE_HEADER_SIZE];
        let got = read_up_to(file, &mut file_bytes)?;
        self.file_header = FileHeader::from_bytes(&file_bytes);
        if got < 2 || !self.file_header.has_magic() {
            return Err(Error::UnrecognizedFileFormat);
        }
        if got < FILE_HEADER_SIZE {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }

        let mut info_bytes = [0u8; INFO_HEADER_SIZE];
        file.read_exact(&mut info_bytes)?;
        self.info_header = InfoHeader::from_bytes(&info_bytes);

        // Only 32-bit images carry channel masks
        if self.info_header.bit_count == 32 {
            if (self.info_header.size as usize) < INFO_HEADER_SIZE + COLOR_HEADER_SIZE {
                return Err(Error::NoBitMaskInfo);
            }

            let mut color_bytes = [0u8; COLOR_HEADER_SIZE];
            file.read_exact(&mut color_bytes)?;
            let color_header = ColorHeader::from_bytes(&color_bytes);

            let expected = ColorHeader::default();
            if !color_header.masks_match(&expected) {
                return Err(Error::UnexpectedColorMaskFormat);
            }
            if color_header.color_space_type != expected.color_space_type {
                return Err(Error::UnexpectedColorSpaceType);
            }
            self.color_header = Some(color_header);
        }

        // Skip whatever editors put between the headers and the pixel data
        self.data_start = self.file_header.offset_data;
        file.seek(self.data_start as u64)?;

        let header_len = if self.color_header.is_some() {
            INFO_HEADER_SIZE + COLOR_HEADER_SIZE
        } else {
            INFO_HEADER_SIZE
        };
        self.info_header.size = header_len as u32;
        self.file_header.offset_data = (FILE_HEADER_SIZE + header_len) as u32;
        self.file_header.file_size = self.file_header.offset_data;

        let renderable = self.info_header.planes == 1
            && PixelFormat::from_bit_depth(self.info_header.bit_count).is_some()
            && self.info_header.compression == 0
            && (1..=MAX_DIMENSION).contains(&self.info_header.width)
            && self.info_header.height.unsigned_abs() <= MAX_DIMENSION as u32;
        if !renderable {
            return Ok(());
        }

        let height = self.info_header.height.abs();
        self.row_order_flipped = self.info_header.height < 0;
        self.info_header.height = height;
        self.valid = true;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Rows are stored top-down (negative height in the file)
    pub fn is_row_order_flipped(&self) -> bool {
        self.row_order_flipped
    }

    pub fn width(&self) -> i32 {
        self.info_header.width
    }

    /// Positive row count once the descriptor is valid
    pub fn height(&self) -> i32 {
        self.info_header.height
    }

    pub fn bit_depth(&self) -> u16 {
        self.info_header.bit_count
    }

    pub fn planes(&self) -> u16 {
        self.info_header.planes
    }

    pub fn compression(&self) -> u32 {
        self.info_header.compression
    }

    /// Canonical pixel data offset: headers only, no editor padding
    pub fn pixel_data_offset(&self) -> u32 {
        self.file_header.offset_data
    }

    /// Canonical header size
    pub fn header_size(&self) -> u32 {
        self.info_header.size
    }

    /// Offset the file declared for its pixel data
    pub fn data_start(&self) -> u32 {
        self.data_start
    }

    pub fn color_mask(&self) -> Option<&ColorHeader> {
        self.color_header.as_ref()
    }

    /// Pixel encoding, only for valid descriptors
    pub fn pixel_format(&self) -> Option<PixelFormat> {
        if self.valid {
            PixelFormat::from_bit_depth(self.info_header.bit_count)
        } else {
            None
        }
    }

    /// Bytes per stored row, padded to a multiple of 4
    pub fn stride(&self) -> usize {
        let bytes_per_pixel = self.info_header.bit_count as usize / 8;
        let row = self.info_header.width.max(0) as usize * bytes_per_pixel;
        (row + 3) & !3
    }
}

/// Fill as much of `buf` as the file has, stopping at end of file
fn read_up_to<F: StorageFile>(file: &mut F, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read_bytes(&mut buf[filled..])? {
            0 => break,
            n => filled += n,
        }
    }
    Ok(filled)
}
