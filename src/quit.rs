//! Process-quit gate.
//!
//! Write-once flag shared by every singleton type of a registry. Once set, no
//! instance can be created and every wait fails fast.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct QuitGate {
    quitting: AtomicBool,
}

impl QuitGate {
    pub const fn new() -> Self {
        Self {
            quitting: AtomicBool::new(false),
        }
    }

    /// Sets the flag. Returns `true` for the call that set it.
    pub fn close(&self) -> bool {
        !self.quitting.swap(true, Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.quitting.load(Ordering::SeqCst)
    }
}
