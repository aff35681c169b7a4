use anyhow::{anyhow, Result};
use embedded_hal::delay::DelayNs;
use enigo::{Direction, Enigo, Key as EnigoKey, Keyboard, Settings};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Keys a macro can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    LeftCtrl,
    /// A printable character sent as-is
    Char(char),
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::UpArrow => write!(f, "Up"),
            KeyCode::DownArrow => write!(f, "Down"),
            KeyCode::LeftArrow => write!(f, "Left"),
            KeyCode::RightArrow => write!(f, "Right"),
            KeyCode::LeftCtrl => write!(f, "Ctrl"),
            KeyCode::Char(c) => write!(f, "{:?}", c),
        }
    }
}

/// USB keyboard emulation
pub trait HidSink {
    fn press(&mut self, key: KeyCode);
    fn release(&mut self, key: KeyCode);
}

/// Sends key events to the host's focused window
pub struct EnigoHid {
    enigo: Enigo,
}

impl EnigoHid {
    pub fn new() -> Result<Self> {
        let enigo = Enigo::new(&Settings::default())
            .map_err(|e| anyhow!("Failed to initialize Enigo: {}", e))?;
        Ok(Self { enigo })
    }

    fn send(&mut self, key: KeyCode, direction: Direction) {
        let enigo_key = match key {
            KeyCode::UpArrow => EnigoKey::UpArrow,
            KeyCode::DownArrow => EnigoKey::DownArrow,
            KeyCode::LeftArrow => EnigoKey::LeftArrow,
            KeyCode::RightArrow => EnigoKey::RightArrow,
            KeyCode::LeftCtrl => EnigoKey::Control,
            KeyCode::Char(c) => EnigoKey::Unicode(c),
        };

        debug!("Sending key {:?} {:?}", enigo_key, direction);
        if let Err(e) = self.enigo.key(enigo_key, direction) {
            warn!("Failed to send {} ({:?}): {}", key, direction, e);
        }
    }
}

impl HidSink for EnigoHid {
    fn press(&mut self, key: KeyCode) {
        self.send(key, Direction::Press);
    }

    fn release(&mut self, key: KeyCode) {
        self.send(key, Direction::Release);
    }
}

/// Blocking delay backed by the OS scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms as u64));
    }
}
