//! Display that records every call, for tests

use super::{DisplaySink, Rgb565};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    SetColor(Rgb565),
    AddressWindow(i32, i32, i32, i32),
    Push(Vec<Rgb565>),
    Rectangle(i32, i32, i32, i32),
    RoundRectangle(i32, i32, i32, i32, i32),
    TextSize(u8),
    TextColor(Rgb565),
    Print(String, i32, i32),
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every push paired with the address window that preceded it
    pub fn strips(&self) -> Vec<((i32, i32, i32, i32), Vec<Rgb565>)> {
        let mut window = None;
        let mut strips = Vec::new();
        for op in &self.ops {
            match op {
                DisplayOp::AddressWindow(x0, y0, x1, y1) => window = Some((*x0, *y0, *x1, *y1)),
                DisplayOp::Push(colors) => {
                    strips.push((window.expect("push without address window"), colors.clone()))
                }
                _ => {}
            }
        }
        strips
    }

    pub fn rectangles(&self) -> Vec<(i32, i32, i32, i32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Rectangle(x0, y0, x1, y1) => Some((*x0, *y0, *x1, *y1)),
                _ => None,
            })
            .collect()
    }

    pub fn round_rectangles(&self) -> Vec<(i32, i32, i32, i32, i32)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::RoundRectangle(x0, y0, x1, y1, r) => Some((*x0, *y0, *x1, *y1, *r)),
                _ => None,
            })
            .collect()
    }

    pub fn printed(&self) -> Vec<String> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Print(text, _, _) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn colors_set(&self) -> Vec<Rgb565> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::SetColor(c) => Some(*c),
                _ => None,
            })
            .collect()
    }
}

impl DisplaySink for RecordingDisplay {
    fn set_color(&mut self, color: Rgb565) {
        self.ops.push(DisplayOp::SetColor(color));
    }

    fn set_address_window(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.ops.push(DisplayOp::AddressWindow(x0, y0, x1, y1));
    }

    fn push_colors(&mut self, colors: &[Rgb565]) {
        self.ops.push(DisplayOp::Push(colors.to_vec()));
    }

    fn draw_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        self.ops.push(DisplayOp::Rectangle(x0, y0, x1, y1));
    }

    fn draw_round_rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, radius: i32) {
        self.ops
            .push(DisplayOp::RoundRectangle(x0, y0, x1, y1, radius));
    }

    fn set_text_size(&mut self, size: u8) {
        self.ops.push(DisplayOp::TextSize(size));
    }

    fn set_text_color(&mut self, color: Rgb565) {
        self.ops.push(DisplayOp::TextColor(color));
    }

    fn print_string(&mut self, text: &str, x: i32, y: i32) {
        self.ops.push(DisplayOp::Print(text.to_string(), x, y));
    }
}
