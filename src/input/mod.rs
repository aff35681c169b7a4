pub mod keys;
pub mod macros;
#[cfg(test)]
pub mod mock;

pub use keys::{EnigoHid, HidSink, KeyCode, StdDelay};
pub use macros::{dispatch, KEY_SEND_DELAY_MS};
