use tracing::warn;

use super::{Button, ButtonStyle};
use crate::bitmap;
use crate::display::{DisplaySink, GLYPH_HEIGHT, GLYPH_WIDTH};
use crate::error::{Error, Result};
use crate::memory::{HeapGuard, MemoryBudget, RawAllocator};
use crate::storage::Storage;

pub const PLACEHOLDER_RADIUS: i32 = 12;
pub const PLACEHOLDER_TEXT_SIZE: u8 = 2;
pub const SELECTION_RINGS: i32 = 7;

impl Button<'_> {
    /// Stream the icon to the display at the button's icon anchor
    pub fn draw_bitmap<S, D, B, A>(
        &self,
        storage: &mut S,
        display: &mut D,
        guard: &HeapGuard<B, A>,
    ) -> Result<()>
    where
        S: Storage,
        D: DisplaySink,
        B: MemoryBudget,
        A: RawAllocator,
    {
        let path = self.icon_path.ok_or(Error::NotInitialized)?;
        bitmap::render_file(
            storage,
            path,
            &self.bitmap,
            self.bmp_x,
            self.bmp_y,
            display,
            guard,
        )
    }

    /// Rounded outline over the tap target with centered text. Navigation
    /// roles always show their glyph instead of `text`.
    pub fn draw_placeholder<D: DisplaySink>(
        &self,
        display: &mut D,
        style: &ButtonStyle,
        text: Option<&str>,
    ) {
        let Self { rect, .. } = self;
        display.set_color(style.text);
        display.draw_round_rectangle(rect.x1, rect.y1, rect.x2, rect.y2, PLACEHOLDER_RADIUS);

        let text = match self.role.glyph() {
            Some(glyph) => glyph,
            None => match text {
                Some(text) if !text.is_empty() => text,
                _ => return,
            },
        };

        let size = PLACEHOLDER_TEXT_SIZE as i32;
        let text_width = text.chars().count() as i32 * GLYPH_WIDTH * size;
        let (cx, cy) = rect.center();
        display.set_text_size(PLACEHOLDER_TEXT_SIZE);
        display.set_text_color(style.text);
        display.print_string(text, cx - text_width / 2, cy - GLYPH_HEIGHT * size / 2);
    }

    /// Selection rings in the selected color, or the background color to
    /// erase them
    pub fn draw_selection_outline<D: DisplaySink>(&self, display: &mut D, style: &ButtonStyle) {
        display.set_color(if self.selected {
            style.selected
        } else {
            style.background
        });

        if self.has_bitmap() {
            let width = self.bitmap.width();
            let height = self.bitmap.height();
            for i in 1..=SELECTION_RINGS {
                let x0 = self.bmp_x - i;
                let y0 = self.bmp_y - i;
                display.draw_rectangle(x0, y0, x0 + width + i * 2, y0 + height + i * 2);
            }
        } else {
            let rect = self.rect;
            for i in 1..=SELECTION_RINGS {
                display.draw_round_rectangle(
                    rect.x1 + i,
                    rect.y1 + i,
                    rect.x2 - i,
                    rect.y2 - i,
                    PLACEHOLDER_RADIUS,
                );
            }
        }
    }

    /// Full draw cycle: icon or placeholder, then the selection outline.
    /// A failed render falls back to the placeholder; returns whether the
    /// icon was drawn.
    pub fn draw<S, D, B, A>(
        &self,
        storage: &mut S,
        display: &mut D,
        guard: &HeapGuard<B, A>,
        style: &ButtonStyle,
    ) -> bool
    where
        S: Storage,
        D: DisplaySink,
        B: MemoryBudget,
        A: RawAllocator,
    {
        let drawn = self.has_bitmap()
            && match self.draw_bitmap(storage, display, guard) {
                Ok(()) => true,
                Err(e) => {
                    warn!(
                        "Drawing {} failed (code {}): {}",
                        self.icon_path.unwrap_or_default(),
                        e.code(),
                        e
                    );
                    false
                }
            };

        if !drawn {
            self.draw_placeholder(display, style, self.label);
        }
        self.draw_selection_outline(display, style);
        drawn
    }
}
