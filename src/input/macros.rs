//! Key macros: `[token]` sequences typed one key at a time
//!
//! `"[ctrl][c]"` presses and releases Ctrl, then `c`. Named tokens are
//! case-insensitive; any other single character is sent literally and longer
//! unknown tokens are skipped.

use embedded_hal::delay::DelayNs;
use tracing::{debug, warn};

use super::keys::{HidSink, KeyCode};

/// Pause after every press and every release. The host polls the HID
/// endpoint on a fixed interval and drops events shorter than this.
pub const KEY_SEND_DELAY_MS: u32 = 50;

/// Bracketed tokens in order; stops at an unterminated `[`
pub struct MacroTokens<'a> {
    rest: &'a str,
}

impl<'a> Iterator for MacroTokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let open = self.rest.find('[')?;
        let after_open = &self.rest[open + 1..];
        match after_open.find(']') {
            Some(close) => {
                self.rest = &after_open[close + 1..];
                Some(&after_open[..close])
            }
            None => {
                self.rest = "";
                None
            }
        }
    }
}

pub fn tokens(keys: &str) -> MacroTokens<'_> {
    MacroTokens { rest: keys }
}

/// Resolve a single token to a key
pub fn parse_token(token: &str) -> Option<KeyCode> {
    const NAMED: [(&str, KeyCode); 5] = [
        ("up", KeyCode::UpArrow),
        ("down", KeyCode::DownArrow),
        ("left", KeyCode::LeftArrow),
        ("right", KeyCode::RightArrow),
        ("ctrl", KeyCode::LeftCtrl),
    ];

    if let Some((_, key)) = NAMED
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(token))
    {
        return Some(*key);
    }

    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(KeyCode::Char(c)),
        _ => None,
    }
}

/// Keys a macro resolves to, unknown tokens dropped
pub fn resolve(keys: &str) -> impl Iterator<Item = KeyCode> + '_ {
    tokens(keys).filter_map(|token| {
        let key = parse_token(token);
        if key.is_none() {
            warn!("Ignoring unknown macro token [{}]", token);
        }
        key
    })
}

/// Type a macro; returns how many keys were sent
pub fn dispatch<H, D>(keys: &str, hid: &mut H, delay: &mut D) -> usize
where
    H: HidSink + ?Sized,
    D: DelayNs + ?Sized,
{
    let mut sent = 0;
    for key in resolve(keys) {
        debug!("Macro key {}", key);
        hid.press(key);
        delay.delay_ms(KEY_SEND_DELAY_MS);
        hid.release(key);
        delay.delay_ms(KEY_SEND_DELAY_MS);
        sent += 1;
    }
    sent
}
