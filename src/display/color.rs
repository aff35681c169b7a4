use image::Rgb;
use serde::Serialize;

/// Packed 16-bit color in the panel's native 5-6-5 layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgb565(pub u16);

/// Color constants (RGB565)
pub const BLACK: Rgb565 = Rgb565(0x0000);
pub const BLUE: Rgb565 = Rgb565(0x001F);
pub const RED: Rgb565 = Rgb565(0xF800);
pub const GREEN: Rgb565 = Rgb565(0x07E0);
pub const CYAN: Rgb565 = Rgb565(0x07FF);
pub const MAGENTA: Rgb565 = Rgb565(0xF81F);
pub const YELLOW: Rgb565 = Rgb565(0xFFE0);
pub const WHITE: Rgb565 = Rgb565(0xFFFF);
pub const NAVY: Rgb565 = Rgb565(0x000F);
pub const DARKGREEN: Rgb565 = Rgb565(0x03E0);
pub const DARKCYAN: Rgb565 = Rgb565(0x03EF);
pub const MAROON: Rgb565 = Rgb565(0x7800);
pub const PURPLE: Rgb565 = Rgb565(0x780F);
pub const OLIVE: Rgb565 = Rgb565(0x7BE0);
pub const LIGHTGREY: Rgb565 = Rgb565(0xC618);
pub const DARKGREY: Rgb565 = Rgb565(0x7BEF);
pub const ORANGE: Rgb565 = Rgb565(0xFD20);
pub const GREENYELLOW: Rgb565 = Rgb565(0xAFE5);
pub const PINK: Rgb565 = Rgb565(0xF81F);

impl Rgb565 {
    /// Pack 8-bit channels, truncating the low bits
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u16 & 0xF8) << 8) | ((g as u16 & 0xFC) << 3) | (b as u16 >> 3))
    }

    /// Convert a BMP 16-bit pixel (X1R5G5B5) into 5-6-5, widening green
    pub const fn from_x1r5g5b5(word: u16) -> Self {
        let r = (word >> 10) & 0x1F;
        let g = (word >> 5) & 0x1F;
        let b = word & 0x1F;
        let g6 = (g << 1) | (g >> 4);
        Self((r << 11) | (g6 << 5) | b)
    }

    /// Expand back to 8-bit channels by bit replication
    pub fn to_rgb(self) -> Rgb<u8> {
        let r = ((self.0 >> 11) & 0x1F) as u8;
        let g = ((self.0 >> 5) & 0x3F) as u8;
        let b = (self.0 & 0x1F) as u8;
        Rgb([(r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2)])
    }
}

/// Parse a hex color string ("#RRGGBB" or "RRGGBB")
pub fn parse_hex_color(hex: &str) -> Option<Rgb565> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb565::from_rgb(r, g, b))
}
