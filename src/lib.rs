pub mod bitmap;
pub mod button;
pub mod config;
pub mod display;
pub mod error;
pub mod input;
pub mod memory;
pub mod storage;

use embedded_hal::delay::DelayNs;
use tracing::{debug, info, warn};

use button::{Button, ButtonRole, ButtonStyle, Rect};
use display::{DisplaySink, Rgb565};
use input::HidSink;
use memory::{HeapGuard, MemoryBudget};
use storage::Storage;

/// Debounce after the physical send buttons fire
pub const PHYSICAL_PRESS_DELAY_MS: u32 = 500;

/// What a touch did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOutcome {
    /// No on-screen button under the touch point
    Miss,
    /// Touched a button with no behavior
    Ignored,
    /// Now showing this page
    Page(usize),
    /// Every action button on the page is now (de)selected
    SelectAll { selected: bool },
    /// Action button toggled and its macro typed
    Action {
        index: usize,
        selected: bool,
        keys_sent: usize,
    },
}

/// The macro pad: buttons plus the peripherals they draw to and type on
///
/// Action buttons are split into pages of `page_size`; navigation buttons
/// (previous, next, select all) are on every page.
pub struct Deck<'a, S, D, H, Y, B> {
    buttons: Vec<Button<'a>>,
    storage: S,
    display: D,
    hid: H,
    delay: Y,
    guard: HeapGuard<B>,
    style: ButtonStyle,
    page_size: usize,
    page: usize,
}

impl<'a, S, D, H, Y, B> Deck<'a, S, D, H, Y, B>
where
    S: Storage,
    D: DisplaySink,
    H: HidSink,
    Y: DelayNs,
    B: MemoryBudget,
{
    pub fn new(
        buttons: Vec<Button<'a>>,
        storage: S,
        display: D,
        hid: H,
        delay: Y,
        guard: HeapGuard<B>,
    ) -> Self {
        Self {
            buttons,
            storage,
            display,
            hid,
            delay,
            guard,
            style: ButtonStyle::default(),
            page_size: usize::MAX,
            page: 0,
        }
    }

    pub fn with_style(mut self, style: ButtonStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn buttons(&self) -> &[Button<'a>] {
        &self.buttons
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.action_indices().count().div_ceil(self.page_size).max(1)
    }

    fn action_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.buttons
            .iter()
            .enumerate()
            .filter(|(_, b)| b.role() == ButtonRole::Action)
            .map(|(i, _)| i)
    }

    /// Indices of the buttons shown on `page`
    pub fn page_buttons(&self, page: usize) -> Vec<usize> {
        let first = page.saturating_mul(self.page_size);
        let actions: Vec<usize> = self
            .action_indices()
            .skip(first)
            .take(self.page_size)
            .collect();

        self.buttons
            .iter()
            .enumerate()
            .filter(|(i, b)| b.role() != ButtonRole::Action || actions.contains(i))
            .map(|(i, _)| i)
            .collect()
    }

    /// Parse every button's icon; returns how many are drawable
    ///
    /// Failures are logged and leave that button on its placeholder.
    pub fn load_bitmaps(&mut self) -> usize {
        let mut loaded = 0;
        for button in &mut self.buttons {
            if let Err(e) = button.load_bitmap(&mut self.storage) {
                warn!(
                    "Icon {} not loaded (code {}): {}",
                    button.icon_path().unwrap_or_default(),
                    e.code(),
                    e
                );
            }
            if button.has_bitmap() {
                loaded += 1;
            }
        }
        info!("Loaded {}/{} button icons", loaded, self.buttons.len());
        loaded
    }

    /// Show the current page: erase buttons leaving the screen, draw the rest
    pub fn draw_page(&mut self) {
        let visible = self.page_buttons(self.page);
        debug!("Drawing page {} ({} buttons)", self.page, visible.len());

        for (i, button) in self.buttons.iter_mut().enumerate() {
            let show = visible.contains(&i);
            if button.is_on_screen() && !show {
                erase(&mut self.display, &self.guard, &self.style, button.rect());
            }
            button.set_on_screen(show);
        }

        for &i in &visible {
            self.buttons[i].draw(
                &mut self.storage,
                &mut self.display,
                &self.guard,
                &self.style,
            );
        }
    }

    pub fn next_page(&mut self) -> usize {
        self.page = (self.page + 1) % self.page_count();
        self.draw_page();
        self.page
    }

    pub fn previous_page(&mut self) -> usize {
        let count = self.page_count();
        self.page = (self.page + count - 1) % count;
        self.draw_page();
        self.page
    }

    pub fn handle_touch(&mut self, x: i32, y: i32) -> TouchOutcome {
        let Some(index) = self
            .buttons
            .iter()
            .position(|b| b.is_on_screen() && b.hit_test(x, y))
        else {
            return TouchOutcome::Miss;
        };

        match self.buttons[index].role() {
            ButtonRole::PreviousPage => TouchOutcome::Page(self.previous_page()),
            ButtonRole::NextPage => TouchOutcome::Page(self.next_page()),
            ButtonRole::SelectAll => self.toggle_select_all(),
            ButtonRole::Action => {
                let button = &mut self.buttons[index];
                let selected = !button.is_selected();
                button.set_selected(selected);
                button.draw_selection_outline(&mut self.display, &self.style);
                let keys_sent = button.send_keys(&mut self.hid, &mut self.delay);
                TouchOutcome::Action {
                    index,
                    selected,
                    keys_sent,
                }
            }
            ButtonRole::Undefined => TouchOutcome::Ignored,
        }
    }

    fn toggle_select_all(&mut self) -> TouchOutcome {
        let on_page: Vec<usize> = self
            .page_buttons(self.page)
            .into_iter()
            .filter(|&i| self.buttons[i].role() == ButtonRole::Action)
            .collect();
        let selected = !on_page.iter().all(|&i| self.buttons[i].is_selected());

        for i in on_page {
            let button = &mut self.buttons[i];
            button.set_selected(selected);
            button.draw_selection_outline(&mut self.display, &self.style);
        }
        TouchOutcome::SelectAll { selected }
    }

    /// Type the macros of every selected button in order; returns keys sent
    pub fn send_selected(&mut self) -> usize {
        let mut sent = 0;
        for button in self.buttons.iter().filter(|b| b.is_selected()) {
            sent += button.send_keys(&mut self.hid, &mut self.delay);
        }
        self.delay.delay_ms(PHYSICAL_PRESS_DELAY_MS);
        sent
    }
}

/// Paint a rectangle with the background color one row at a time
fn erase<D: DisplaySink, B: MemoryBudget>(
    display: &mut D,
    guard: &HeapGuard<B>,
    style: &ButtonStyle,
    rect: Rect,
) {
    let width = (rect.x2 - rect.x1 + 1).max(0) as usize;
    let mut row = match guard.try_allocate::<Rgb565>(width) {
        Ok(row) => row,
        Err(e) => {
            warn!("Could not erase {:?}: {}", rect, e);
            return;
        }
    };
    row.fill(style.background);

    for y in rect.y1..=rect.y2 {
        display.set_address_window(rect.x1, y, rect.x2, y);
        display.push_colors(&row);
    }
}
