pub mod bus;
pub mod color;
mod framebuffer;
#[cfg(test)]
pub mod mock;

pub use bus::SharedDisplay;
pub use color::*;
pub use framebuffer::FrameBuffer;

/// Width of one character cell at text size 1
pub const GLYPH_WIDTH: i32 = 6;
/// Height of one character cell at text size 1
pub const GLYPH_HEIGHT: i32 = 8;

/// The LCD controller as seen by the drawing code
///
/// Pixel writes are a two-step protocol: set an address window, then push
/// colors which fill it left to right, top to bottom. Shapes use the color
/// set by [`DisplaySink::set_color`].
pub trait DisplaySink {
    /// The panel's color packing function
    fn color565(&self, r: u8, g: u8, b: u8) -> Rgb565 {
        Rgb565::from_rgb(r, g, b)
    }

    fn set_color(&mut self, color: Rgb565);

    /// Select the inclusive rectangle subsequent pushes write into
    fn set_address_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    fn push_colors(&mut self, colors: &[Rgb565]);

    fn draw_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);

    fn draw_round_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32);

    fn set_text_size(&mut self, size: u8);

    fn set_text_color(&mut self, color: Rgb565);

    fn print_string(&mut self, text: &str, x: i32, y: i32);
}
