//! A touchscreen button: tap target, icon, selection state and key macro

mod draw;

use embedded_hal::delay::DelayNs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bitmap::BitmapDescriptor;
use crate::display::{Rgb565, BLACK, GREEN, WHITE};
use crate::error::Result;
use crate::input::{dispatch, HidSink};
use crate::storage::Storage;

pub use draw::{PLACEHOLDER_RADIUS, PLACEHOLDER_TEXT_SIZE, SELECTION_RINGS};

/// Inclusive screen rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Strict interior; the border itself is not inside
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x1 < x && x < self.x2 && self.y1 < y && y < self.y2
    }

    pub fn center(&self) -> (i32, i32) {
        ((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonRole {
    #[default]
    Undefined,
    PreviousPage,
    NextPage,
    SelectAll,
    Action,
}

impl ButtonRole {
    /// Fixed placeholder glyph for navigation roles
    pub fn glyph(self) -> Option<&'static str> {
        match self {
            ButtonRole::PreviousPage => Some(">"),
            ButtonRole::NextPage => Some("<"),
            ButtonRole::SelectAll => Some("A"),
            ButtonRole::Undefined | ButtonRole::Action => None,
        }
    }

    /// Paging and select-all buttons stay on screen across pages
    pub fn is_navigation(self) -> bool {
        self.glyph().is_some()
    }
}

/// Colors used when drawing buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStyle {
    pub selected: Rgb565,
    pub background: Rgb565,
    pub text: Rgb565,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            selected: GREEN,
            background: BLACK,
            text: WHITE,
        }
    }
}

/// The strings a button references are owned by whoever built the layout
/// and must outlive it.
#[derive(Debug, Clone)]
pub struct Button<'a> {
    rect: Rect,
    role: ButtonRole,
    keys: Option<&'a str>,
    icon_path: Option<&'a str>,
    label: Option<&'a str>,
    bmp_x: i32,
    bmp_y: i32,
    selected: bool,
    on_screen: bool,
    bitmap: BitmapDescriptor,
}

impl<'a> Button<'a> {
    pub fn new(rect: Rect, role: ButtonRole) -> Self {
        Self {
            rect,
            role,
            keys: None,
            icon_path: None,
            label: None,
            bmp_x: rect.x1,
            bmp_y: rect.y1,
            selected: false,
            on_screen: false,
            bitmap: BitmapDescriptor::new(),
        }
    }

    pub fn with_keys(mut self, keys: &'a str) -> Self {
        self.keys = Some(keys);
        self
    }

    /// Icon file and the screen position of its top-left corner
    pub fn with_icon(mut self, path: &'a str, bmp_x: i32, bmp_y: i32) -> Self {
        self.icon_path = Some(path);
        self.bmp_x = bmp_x;
        self.bmp_y = bmp_y;
        self
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn role(&self) -> ButtonRole {
        self.role
    }

    pub fn keys(&self) -> Option<&'a str> {
        self.keys
    }

    pub fn icon_path(&self) -> Option<&'a str> {
        self.icon_path
    }

    pub fn label(&self) -> Option<&'a str> {
        self.label
    }

    pub fn bmp_position(&self) -> (i32, i32) {
        (self.bmp_x, self.bmp_y)
    }

    pub fn bitmap(&self) -> &BitmapDescriptor {
        &self.bitmap
    }

    /// A valid icon selects the bitmap drawing path
    pub fn has_bitmap(&self) -> bool {
        self.bitmap.is_valid()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    pub fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    pub fn set_on_screen(&mut self, on_screen: bool) {
        self.on_screen = on_screen;
    }

    pub fn hit_test(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
    }

    /// Parse the icon's headers. A button without an icon keeps an invalid
    /// descriptor and draws its placeholder.
    pub fn load_bitmap<S: Storage>(&mut self, storage: &mut S) -> Result<()> {
        match self.icon_path {
            Some(path) => self.bitmap.load(storage, path),
            None => {
                self.bitmap = BitmapDescriptor::new();
                Ok(())
            }
        }
    }

    /// Type this button's macro; returns how many keys were sent
    pub fn send_keys<H, D>(&self, hid: &mut H, delay: &mut D) -> usize
    where
        H: HidSink + ?Sized,
        D: DelayNs + ?Sized,
    {
        match self.keys {
            Some(keys) => dispatch(keys, hid, delay),
            None => {
                debug!("Button at {:?} has no key action", self.rect);
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmap::fixture::BmpFixture;
    use crate::error::ErrorKind;
    use crate::input::mock::{timeline, Event};
    use crate::input::KeyCode;
    use crate::storage::mock::MemoryStorage;

    #[test]
    fn test_hit_test_is_strict_interior() {
        let button = Button::new(Rect::new(10, 10, 50, 50), ButtonRole::Action);
        assert!(!button.hit_test(10, 30));
        assert!(button.hit_test(30, 30));
        assert!(!button.hit_test(50, 30));
        assert!(!button.hit_test(30, 10));
        assert!(!button.hit_test(30, 50));
        assert!(button.hit_test(11, 49));
    }

    #[test]
    fn test_role_glyphs() {
        assert_eq!(ButtonRole::PreviousPage.glyph(), Some(">"));
        assert_eq!(ButtonRole::NextPage.glyph(), Some("<"));
        assert_eq!(ButtonRole::SelectAll.glyph(), Some("A"));
        assert_eq!(ButtonRole::Action.glyph(), None);
        assert!(!ButtonRole::Undefined.is_navigation());
    }

    #[test]
    fn test_load_bitmap() {
        let mut storage = MemoryStorage::new();
        storage.insert("/icons/copy.bmp", BmpFixture::new(32, 32, 24).bytes());

        let mut button = Button::new(Rect::new(0, 0, 40, 40), ButtonRole::Action)
            .with_icon("/icons/copy.bmp", 4, 4);
        assert!(!button.has_bitmap());
        button.load_bitmap(&mut storage).unwrap();
        assert!(button.has_bitmap());
        assert_eq!(button.bitmap().width(), 32);
        assert_eq!(storage.open_handles(), 0);
    }

    #[test]
    fn test_load_bitmap_without_icon() {
        let mut storage = MemoryStorage::new();
        let mut button = Button::new(Rect::new(0, 0, 40, 40), ButtonRole::NextPage);
        button.load_bitmap(&mut storage).unwrap();
        assert!(!button.has_bitmap());
    }

    #[test]
    fn test_load_bitmap_missing_file() {
        let mut storage = MemoryStorage::new();
        let mut button =
            Button::new(Rect::new(0, 0, 40, 40), ButtonRole::Action).with_icon("gone.bmp", 0, 0);
        let err = button.load_bitmap(&mut storage).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CantOpenFile);
        assert!(!button.has_bitmap());
    }

    #[test]
    fn test_send_keys() {
        let (mut hid, mut delay, log) = timeline();

        let button = Button::new(Rect::new(0, 0, 40, 40), ButtonRole::Action).with_keys("[ctrl]");
        assert_eq!(button.send_keys(&mut hid, &mut delay), 1);
        assert_eq!(log.borrow()[0], Event::Press(KeyCode::LeftCtrl));

        let silent = Button::new(Rect::new(0, 0, 40, 40), ButtonRole::Action);
        assert_eq!(silent.send_keys(&mut hid, &mut delay), 0);
        assert_eq!(log.borrow().len(), 4);
    }
}
