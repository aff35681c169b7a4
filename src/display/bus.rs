//! Display bus shared between cooperating tasks
//!
//! Setting the address window and pushing pixels are two separate bus
//! transactions; if another task sets its own window in between, the pixels
//! land in the wrong place. Every multi-step write happens under one lock.

use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use super::{DisplaySink, Rgb565};

pub struct SharedDisplay<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> Clone for SharedDisplay<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: DisplaySink> SharedDisplay<D> {
    pub fn new(display: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(display)),
        }
    }

    /// Exclusive access for a whole draw sequence (e.g. rendering a bitmap)
    pub async fn lock(&self) -> MutexGuard<'_, D> {
        self.inner.lock().await
    }

    /// Write one horizontal strip starting at `(x, y)`
    pub async fn push_strip(&self, x: i32, y: i32, colors: &[Rgb565]) {
        let mut display = self.inner.lock().await;
        display.set_address_window(x, y, x + colors.len() as i32 - 1, y);
        display.push_colors(colors);
    }

    /// Recover the display once every other handle is gone
    pub fn into_inner(self) -> Option<D> {
        Arc::try_unwrap(self.inner).ok().map(Mutex::into_inner)
    }
}
