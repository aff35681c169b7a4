//! Row-streaming BMP renderer
//!
//! Peak memory is one padded source row plus one row of output colors,
//! whatever the image height. Rows are pushed to the panel as soon as they
//! are converted, so bottom-up files are drawn bottom to top.

use std::time::Instant;
use tracing::{debug, warn};

use super::descriptor::{BitmapDescriptor, PixelFormat};
use crate::display::{DisplaySink, Rgb565};
use crate::error::{Error, Result};
use crate::memory::{HeapGuard, MemoryBudget, RawAllocator};
use crate::storage::{Storage, StorageFile};

/// Open `path` and render it with its top-left corner at `(x, y)`
pub fn render_file<S, D, B, A>(
    storage: &mut S,
    path: &str,
    bitmap: &BitmapDescriptor,
    x: i32,
    y: i32,
    display: &mut D,
    guard: &HeapGuard<B, A>,
) -> Result<()>
where
    S: Storage,
    D: DisplaySink,
    B: MemoryBudget,
    A: RawAllocator,
{
    if !bitmap.is_valid() {
        return Err(Error::NotInitialized);
    }

    let mut file = storage.open(path).map_err(|source| {
        warn!("Could not open file {}: {}", path, source);
        Error::CantOpenFile {
            path: path.to_string(),
            source,
        }
    })?;

    let started = Instant::now();
    let result = render(&mut file, bitmap, x, y, display, guard);
    file.close();

    if result.is_ok() {
        debug!("Drawing {} took {:?}", path, started.elapsed());
    }
    result
}

/// Stream the pixel rows of an open file to the display
///
/// Rows are read from the offset the file declares
/// ([`BitmapDescriptor::data_start`]), not the canonical
/// [`BitmapDescriptor::pixel_data_offset`]; the two differ when an editor
/// left extra bytes after the headers.
pub fn render<F, D, B, A>(
    file: &mut F,
    bitmap: &BitmapDescriptor,
    x: i32,
    y: i32,
    display: &mut D,
    guard: &HeapGuard<B, A>,
) -> Result<()>
where
    F: StorageFile,
    D: DisplaySink,
    B: MemoryBudget,
    A: RawAllocator,
{
    let format = bitmap.pixel_format().ok_or(Error::NotInitialized)?;
    let width = bitmap.width() as usize;
    let height = bitmap.height();
    let used = width * format.bytes_per_pixel();

    file.seek(bitmap.data_start() as u64)?;

    let mut row = guard.try_allocate::<u8>(bitmap.stride())?;
    let mut colors = guard.try_allocate::<Rgb565>(width)?;

    for r in 0..height {
        file.read_exact(&mut row)?;
        convert_row(format, &row[..used], &mut colors, display);

        let dest = if bitmap.is_row_order_flipped() {
            y + r
        } else {
            y + height - r
        };
        display.set_address_window(x, dest, x + width as i32 - 1, dest);
        display.push_colors(&colors);
    }

    Ok(())
}

/// Convert one source row, ignoring the stride padding already trimmed off
fn convert_row<D: DisplaySink>(format: PixelFormat, src: &[u8], out: &mut [Rgb565], display: &D) {
    match format {
        PixelFormat::Bgr888 => {
            for (color, px) in out.iter_mut().zip(src.chunks_exact(3)) {
                *color = display.color565(px[2], px[1], px[0]);
            }
        }
        PixelFormat::Rgb555 => {
            for (color, px) in out.iter_mut().zip(src.chunks_exact(2)) {
                *color = Rgb565::from_x1r5g5b5(u16::from_le_bytes([px[0], px[1]]));
            }
        }
    }
}
