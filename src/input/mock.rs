//! Recording HID and delay sinks sharing one timeline, for tests

use embedded_hal::delay::DelayNs;
use std::cell::RefCell;
use std::rc::Rc;

use super::keys::{HidSink, KeyCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Press(KeyCode),
    Release(KeyCode),
    Delay(u32),
}

pub type Timeline = Rc<RefCell<Vec<Event>>>;

pub struct RecordingHid {
    log: Timeline,
}

pub struct RecordingDelay {
    log: Timeline,
}

pub fn timeline() -> (RecordingHid, RecordingDelay, Timeline) {
    let log = Timeline::default();
    (
        RecordingHid { log: log.clone() },
        RecordingDelay { log: log.clone() },
        log,
    )
}

impl HidSink for RecordingHid {
    fn press(&mut self, key: KeyCode) {
        self.log.borrow_mut().push(Event::Press(key));
    }

    fn release(&mut self, key: KeyCode) {
        self.log.borrow_mut().push(Event::Release(key));
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::Delay(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::Delay(ms));
    }
}
