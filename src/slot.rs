//! Observable single-value holders.
//!
//! A [`Slot`] is backed by a `tokio::sync::watch` channel whose sender it owns:
//! reads and writes never block, and [`Slot::wait_until`] parks the caller until a
//! predicate holds on the current value or a [`CancelScope`] fires.
//!
//! A write happens-before every wait it unblocks: the woken waiter evaluates the
//! predicate against the value written (or a later one), never an older one.

use tokio::sync::watch;

use crate::shutdown::{CancelCause, CancelScope};

#[derive(Debug)]
pub struct Slot<V> {
    tx: watch::Sender<V>,
}

impl<V> Slot<V>
where
    V: Clone + Send + Sync,
{
    pub fn new(initial: V) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Current value.
    pub fn get(&self) -> V {
        self.tx.borrow().clone()
    }

    /// Replaces the value and wakes every waiter.
    pub fn set(&self, value: V) {
        self.tx.send_replace(value);
    }

    /// Replaces the value only if `f` says so, under the channel's write lock.
    /// Returns whether the value changed.
    pub fn set_if(&self, f: impl FnOnce(&mut V) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Waits for `predicate` to hold and returns the value that satisfied it.
    ///
    /// Either source in `scope` firing first ends the wait with its cause. When
    /// both the value and a cancellation are available at the same time, the
    /// cancellation wins.
    pub async fn wait_until<P>(&self, mut predicate: P, scope: CancelScope<'_>) -> Result<V, CancelCause>
    where
        P: FnMut(&V) -> bool,
    {
        if let Some(cause) = scope.cause() {
            return Err(cause);
        }

        let mut rx = self.tx.subscribe();
        tokio::select! {
            biased;
            cause = scope.fired() => Err(cause),
            seen = rx.wait_for(|value| predicate(value)) => match seen {
                Ok(value) => Ok(value.clone()),
                // The sender lives as long as the slot; a closed channel means the
                // owning state is gone.
                Err(_) => Err(CancelCause::Shutdown),
            },
        }
    }
}
