//! Shared singletons and hosts for the integration tests.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use singleton_lifecycle::{BoxError, CancellationToken, Host, LocalHost, Singleton};

/// A `LocalHost` that takes its time building instances, to widen creation races.
#[derive(Debug, Default)]
pub struct SlowHost {
    pub inner: LocalHost,
    pub delay: Duration,
}

impl SlowHost {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: LocalHost::new(),
            delay,
        }
    }
}

impl Host for SlowHost {
    fn find_existing<T: Singleton>(&self) -> Vec<Arc<T>> {
        self.inner.find_existing()
    }

    fn instantiate<T: Singleton>(&self) -> Arc<T> {
        std::thread::sleep(self.delay);
        self.inner.instantiate()
    }

    fn mark_persistent<T: Singleton>(&self, instance: &Arc<T>) {
        self.inner.mark_persistent(instance)
    }

    fn destroy<T: Singleton>(&self, instance: &Arc<T>) {
        self.inner.destroy(instance)
    }
}

/// A `LocalHost` whose n-th `instantiate` call takes `delays[n]`, so a test can
/// pick which of several racing creators finishes first.
#[derive(Debug, Default)]
pub struct StaggeredHost {
    pub inner: LocalHost,
    delays: Vec<Duration>,
    calls: AtomicUsize,
}

impl StaggeredHost {
    pub fn new(delays: impl IntoIterator<Item = Duration>) -> Self {
        Self {
            inner: LocalHost::new(),
            delays: delays.into_iter().collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Host for StaggeredHost {
    fn find_existing<T: Singleton>(&self) -> Vec<Arc<T>> {
        self.inner.find_existing()
    }

    fn instantiate<T: Singleton>(&self) -> Arc<T> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(call) {
            std::thread::sleep(*delay);
        }
        self.inner.instantiate()
    }

    fn mark_persistent<T: Singleton>(&self, instance: &Arc<T>) {
        self.inner.mark_persistent(instance)
    }

    fn destroy<T: Singleton>(&self, instance: &Arc<T>) {
        self.inner.destroy(instance)
    }
}

/// Initializes instantly.
#[derive(Debug, Default)]
pub struct Quick {
    pub id: u32,
}

impl Singleton for Quick {}

/// Initialization finishes after a short delay and counts its runs.
#[derive(Debug, Default)]
pub struct Delayed {
    pub runs: AtomicUsize,
}

impl Singleton for Delayed {
    async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Initialization never completes and ignores its token; a detached watcher
/// records the cancellation.
#[derive(Debug, Default)]
pub struct Stuck {
    pub saw_cancel: Arc<AtomicBool>,
}

impl Singleton for Stuck {
    async fn initialize(&self, cancel: CancellationToken) -> Result<(), BoxError> {
        let saw_cancel = self.saw_cancel.clone();
        tokio::spawn(async move {
            cancel.cancelled().await;
            saw_cancel.store(true, Ordering::SeqCst);
        });
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Initialization parks on its token and cleans up once it fires.
#[derive(Debug, Default)]
pub struct Unwinding {
    pub unwound: AtomicBool,
}

impl Singleton for Unwinding {
    async fn initialize(&self, cancel: CancellationToken) -> Result<(), BoxError> {
        cancel.cancelled().await;
        self.unwound.store(true, Ordering::SeqCst);
        Err("cancelled".into())
    }
}

/// Initialization always fails.
#[derive(Debug, Default)]
pub struct Broken;

impl Singleton for Broken {
    async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        Err("backend unreachable".into())
    }
}

/// Lets a test drive exactly when initialization finishes.
#[derive(Debug, Default)]
pub struct Gated {
    pub gate: tokio::sync::Notify,
}

impl Singleton for Gated {
    async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        self.gate.notified().await;
        Ok(())
    }
}

/// Gives spawned waiters a chance to park before the test acts.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}
