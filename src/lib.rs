//! # Singleton Lifecycle
//!
//! Race-free, lazily created process-wide singletons with async readiness gating.
//!
//! A [`Registry`] guarantees at most one live instance per singleton type. It
//! hands the instance out synchronously, lets async callers wait for the instance
//! to exist or to be fully initialized, bounds initialization with a timeout, and
//! fails every outstanding wait deterministically when the instance is torn down
//! or the process starts quitting.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_lifecycle::{BoxError, CancellationToken, LocalHost, Registry, Singleton};
//!
//! #[derive(Default)]
//! struct Matchmaker;
//!
//! impl Singleton for Matchmaker {
//!     async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let registry = Registry::new(LocalHost::new());
//!
//! let created = registry.get_instance_sync::<Matchmaker>().unwrap();
//! registry.initialize::<Matchmaker>().await.unwrap();
//!
//! let ready = registry.wait_for_ready::<Matchmaker>(None).await.unwrap();
//! assert!(std::sync::Arc::ptr_eq(&created, &ready));
//! # }
//! ```
//!
//! ## Main Operations
//!
//! - [`Registry::get_instance_sync`] - get or create the instance
//! - [`Registry::wait_for_instance`] - wait until the instance exists
//! - [`Registry::wait_for_ready`] - wait until initialization succeeded
//! - [`Registry::initialize`] - run the bounded initialization routine
//! - [`Registry::on_destroyed`] / [`Registry::destroy`] - teardown hook
//! - [`Registry::boot`] / [`Registry::quit`] - process boot and quit hooks
//! - [`define_lifecycle!`] - named process-wide registry with free functions

mod config;
mod host;
mod lifecycle_error;
mod lifecycle_event;
mod macros;
pub mod observability;
mod quit;
mod registry;
mod shutdown;
mod singleton;
mod slot;

pub use config::{ConfigError, InitTiming, SingletonConfig};
pub use host::{Host, LocalHost};
pub use lifecycle_error::LifecycleError;
pub use lifecycle_event::LifecycleEvent;
pub use registry::{InitHandle, Registry, TraceCallback};
pub use shutdown::{CancelCause, CancelScope, ShutdownSignal};
pub use singleton::{BoxError, Singleton};
pub use slot::Slot;
pub use tokio_util::sync::CancellationToken;
