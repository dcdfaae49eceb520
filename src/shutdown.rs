//! Per-type shutdown signal and composed cancellation.
//!
//! A [`ShutdownSignal`] fires exactly once, when the live instance of its type is
//! torn down. Waiters combine it with their own [`CancellationToken`] through a
//! [`CancelScope`], which also reports which of the two fired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

/// One-shot trigger owned by a singleton type's state record.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the signal. Returns `true` only for the call that actually fired it.
    pub fn trigger(&self) -> bool {
        if self.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.token.cancel();
        true
    }

    pub fn is_triggered(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Completes once the signal has fired.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Token cancelled together with this signal, but cancellable on its own too.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// Which cancellation source ended a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelCause {
    /// The type's shutdown signal fired.
    Shutdown,
    /// The caller's own token fired.
    Caller,
}

/// Caller token and shutdown token, cancelled by whichever fires first.
#[derive(Debug, Clone, Copy)]
pub struct CancelScope<'a> {
    caller: &'a CancellationToken,
    shutdown: &'a CancellationToken,
}

impl<'a> CancelScope<'a> {
    pub fn new(caller: &'a CancellationToken, shutdown: &'a CancellationToken) -> Self {
        Self { caller, shutdown }
    }

    /// The cause, if either source has already fired. Shutdown wins ties.
    pub fn cause(&self) -> Option<CancelCause> {
        if self.shutdown.is_cancelled() {
            Some(CancelCause::Shutdown)
        } else if self.caller.is_cancelled() {
            Some(CancelCause::Caller)
        } else {
            None
        }
    }

    /// Completes when either source fires.
    pub async fn fired(&self) -> CancelCause {
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => CancelCause::Shutdown,
            _ = self.caller.cancelled() => CancelCause::Caller,
        }
    }
}
