use anyhow::{anyhow, Result};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use rusttype::{Font, Scale};
use std::path::Path;
use tracing::debug;

use super::{DisplaySink, Rgb565, GLYPH_HEIGHT, WHITE};

/// Inclusive address window
#[derive(Debug, Clone, Copy)]
struct Window {
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

/// Software model of the LCD panel, used for previews and on the host
///
/// Pushed colors auto-increment through the address window and wrap inside
/// it like the controller's write pointer; anything outside the panel is
/// clipped.
pub struct FrameBuffer {
    image: RgbImage,
    draw_color: Rgb565,
    text_color: Rgb565,
    text_size: u8,
    window: Window,
    cursor: (i32, i32),
    font: Option<Font<'static>>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
            draw_color: WHITE,
            text_color: WHITE,
            text_size: 1,
            window: Window {
                x0: 0,
                y0: 0,
                x1: width as i32 - 1,
                y1: height as i32 - 1,
            },
            cursor: (0, 0),
            font: None,
        }
    }

    /// Load a TrueType font for `print_string`
    pub fn with_font_file(mut self, path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let font = Font::try_from_vec(data)
            .ok_or_else(|| anyhow!("Failed to load font {}", path.display()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn clear(&mut self, color: Rgb565) {
        let rgb = color.to_rgb();
        for pixel in self.image.pixels_mut() {
            *pixel = rgb;
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.image.save(path)?;
        Ok(())
    }

    fn put(&mut self, x: i32, y: i32, color: Rgb<u8>) {
        if x >= 0 && y >= 0 && (x as u32) < self.width() && (y as u32) < self.height() {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb<u8>) {
        draw_line_segment_mut(
            &mut self.image,
            (x0 as f32, y0 as f32),
            (x1 as f32, y1 as f32),
            color,
        );
    }

    /// Quarter circle outline; `quadrant` bits select the corners (1 = top-left,
    /// 2 = top-right, 4 = bottom-right, 8 = bottom-left)
    fn corner(&mut self, cx: i32, cy: i32, r: i32, quadrant: u8, color: Rgb<u8>) {
        let mut f = 1 - r;
        let mut dd_x = 1;
        let mut dd_y = -2 * r;
        let mut x = 0;
        let mut y = r;

        while x <= y {
            if quadrant & 0x1 != 0 {
                self.put(cx - y, cy - x, color);
                self.put(cx - x, cy - y, color);
            }
            if quadrant & 0x2 != 0 {
                self.put(cx + x, cy - y, color);
                self.put(cx + y, cy - x, color);
            }
            if quadrant & 0x4 != 0 {
                self.put(cx + x, cy + y, color);
                self.put(cx + y, cy + x, color);
            }
            if quadrant & 0x8 != 0 {
                self.put(cx - y, cy + x, color);
                self.put(cx - x, cy + y, color);
            }

            if f >= 0 {
                y -= 1;
                dd_y += 2;
                f += dd_y;
            }
            x += 1;
            dd_x += 2;
            f += dd_x;
        }
    }
}

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl DisplaySink for FrameBuffer {
    fn set_color(&mut self, color: Rgb565) {
        self.draw_color = color;
    }

    fn set_address_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        self.window = Window { x0, y0, x1, y1 };
        self.cursor = (x0, y0);
    }

    fn push_colors(&mut self, colors: &[Rgb565]) {
        for color in colors {
            let (x, y) = self.cursor;
            self.put(x, y, color.to_rgb());

            let mut next = (x + 1, y);
            if next.0 > self.window.x1 {
                next = (self.window.x0, y + 1);
                if next.1 > self.window.y1 {
                    next.1 = self.window.y0;
                }
            }
            self.cursor = next;
        }
    }

    fn draw_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        let rect = Rect::at(x0, y0).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_hollow_rect_mut(&mut self.image, rect, self.draw_color.to_rgb());
    }

    fn draw_round_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32) {
        let (x0, x1) = ordered(x0, x1);
        let (y0, y1) = ordered(y0, y1);
        let r = radius.clamp(0, (x1 - x0).min(y1 - y0) / 2);
        let color = self.draw_color.to_rgb();

        self.line(x0 + r, y0, x1 - r, y0, color);
        self.line(x0 + r, y1, x1 - r, y1, color);
        self.line(x0, y0 + r, x0, y1 - r, color);
        self.line(x1, y0 + r, x1, y1 - r, color);

        self.corner(x0 + r, y0 + r, r, 0x1, color);
        self.corner(x1 - r, y0 + r, r, 0x2, color);
        self.corner(x1 - r, y1 - r, r, 0x4, color);
        self.corner(x0 + r, y1 - r, r, 0x8, color);
    }

    fn set_text_size(&mut self, size: u8) {
        self.text_size = size.max(1);
    }

    fn set_text_color(&mut self, color: Rgb565) {
        self.text_color = color;
    }

    fn print_string(&mut self, text: &str, x: i32, y: i32) {
        let Some(font) = self.font.as_ref() else {
            debug!("No font loaded, skipping text {:?}", text);
            return;
        };

        let scale = Scale::uniform((GLYPH_HEIGHT * self.text_size as i32) as f32);
        let v_metrics = font.v_metrics(scale);
        let offset = rusttype::point(x as f32, y as f32 + v_metrics.ascent);
        let color = self.text_color.to_rgb();
        let (width, height) = (self.width() as i32, self.height() as i32);
        let image = &mut self.image;

        for glyph in font.layout(text, scale, offset) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    let px = bb.min.x + gx as i32;
                    let py = bb.min.y + gy as i32;

                    if px >= 0 && px < width && py >= 0 && py < height {
                        let pixel = image.get_pixel_mut(px as u32, py as u32);
                        // Alpha blend
                        let alpha = v;
                        for c in 0..3 {
                            pixel[c] =
                                ((1.0 - alpha) * pixel[c] as f32 + alpha * color[c] as f32) as u8;
                        }
                    }
                });
            }
        }
    }
}
