//! The trait every managed type implements.

use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Boxed error returned by initialization procedures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A type managed as a process-wide singleton.
///
/// `Default` is how a host builds a fresh, minimal instance. [`initialize`](Singleton::initialize)
/// is the per-type override point for the initialization procedure; the default
/// completes immediately.
///
/// The procedure is bounded by the type's `init_timeout_seconds`. `cancel` fires
/// when that bound is exceeded or the instance is torn down. The procedure keeps
/// being polled for a short grace period after that, so a procedure that awaits
/// `cancel` at its suspension points gets to release what it holds before it is
/// dropped. Its return value after cancellation is ignored.
///
/// ```rust
/// use singleton_lifecycle::{BoxError, Singleton};
/// use tokio_util::sync::CancellationToken;
///
/// #[derive(Default)]
/// struct Catalog {
///     entries: std::sync::Mutex<Vec<String>>,
/// }
///
/// impl Singleton for Catalog {
///     async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
///         self.entries.lock().unwrap().push("default".into());
///         Ok(())
///     }
/// }
/// ```
pub trait Singleton: Default + Send + Sync + 'static {
    fn initialize(
        &self,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        let _ = cancel;
        async { Ok(()) }
    }
}
