//! BMP support: header parsing and row-streaming rendering

mod descriptor;
#[cfg(test)]
pub(crate) mod fixture;
pub mod header;
mod render;

pub use descriptor::{BitmapDescriptor, PixelFormat};
pub use render::{render, render_file};
