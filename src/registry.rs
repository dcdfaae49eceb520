//! The lifecycle controller.
//!
//! A [`Registry`] owns every piece of process-wide singleton state: one record
//! per singleton type (keyed by `TypeId`), the per-type configuration, the boot
//! registrations and the quit gate. Each record holds
//!
//! - an instance slot, written on creation and emptied on teardown,
//! - a ready slot, set when initialization succeeds and reset on teardown,
//! - a shutdown signal, fired once when the held instance is torn down,
//! - the creation lock used when the type is configured `thread_safe`.
//!
//! ```text
//! Absent ──create──▶ Created ──initialize ok──▶ Ready
//!                       │                         │
//!                       └──────── teardown ───────┴──▶ Destroyed (terminal)
//! ```
//!
//! Once [`Registry::quit`] has been called every entry point behaves as if the
//! type were `Destroyed`.

use std::any::{type_name, Any, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::{ConfigResolver, ConfigSource, InitTiming, SingletonConfig};
use crate::host::Host;
use crate::quit::QuitGate;
use crate::shutdown::{CancelCause, CancelScope, ShutdownSignal};
use crate::slot::Slot;
use crate::{BoxError, LifecycleError, LifecycleEvent, Singleton};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`LifecycleEvent`] the registry emits. It is
/// called without any registry lock held, so it may call back into the registry.
pub type TraceCallback = dyn Fn(&LifecycleEvent) + Send + Sync + 'static;

/// Join handle of a background initialization task.
pub type InitHandle<T> = JoinHandle<Result<Arc<T>, LifecycleError>>;

// -------------------------------------------------------------------------------------------------
// Events
// -------------------------------------------------------------------------------------------------

#[derive(Default)]
struct EventSink {
    callback: Mutex<Option<Arc<TraceCallback>>>,
}

impl EventSink {
    fn set(&self, callback: Arc<TraceCallback>) {
        *self.callback.lock().unwrap_or_else(|p| p.into_inner()) = Some(callback);
    }

    fn clear(&self) {
        *self.callback.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    fn emit(&self, event: LifecycleEvent) {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();
        if let Some(callback) = callback {
            callback(&event);
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Per-type state
// -------------------------------------------------------------------------------------------------

struct SingletonState<T: Singleton> {
    instance: Slot<Option<Arc<T>>>,
    ready: Slot<bool>,
    shutdown: ShutdownSignal,
    /// Serializes creation for `thread_safe` types.
    create_lock: Mutex<()>,
    /// Serializes "mark ready" against teardown.
    transition: Mutex<()>,
    init_started: AtomicBool,
    init_task: Mutex<Option<InitHandle<T>>>,
}

impl<T: Singleton> SingletonState<T> {
    fn new() -> Self {
        Self {
            instance: Slot::new(None),
            ready: Slot::new(false),
            shutdown: ShutdownSignal::new(),
            create_lock: Mutex::new(()),
            transition: Mutex::new(()),
            init_started: AtomicBool::new(false),
            init_task: Mutex::new(None),
        }
    }

    fn holds(&self, instance: &Arc<T>) -> bool {
        self.instance
            .get()
            .is_some_and(|held| Arc::ptr_eq(&held, instance))
    }

    /// Sets the ready flag if `instance` is still the live, held instance.
    fn mark_ready(&self, instance: &Arc<T>) -> bool {
        let _guard = self.transition.lock().unwrap_or_else(|p| p.into_inner());
        if self.shutdown.is_triggered() || !self.holds(instance) {
            return false;
        }
        self.ready.set(true);
        true
    }
}

struct BootEntry<H: Host> {
    type_id: TypeId,
    type_name: &'static str,
    start: fn(&Registry<H>) -> bool,
}

impl<H: Host> Clone for BootEntry<H> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            type_name: self.type_name,
            start: self.start,
        }
    }
}

fn start_on_boot<T: Singleton, H: Host>(registry: &Registry<H>) -> bool {
    registry.get_instance_sync::<T>().is_some()
}

// -------------------------------------------------------------------------------------------------
// Registry
// -------------------------------------------------------------------------------------------------

/// Process-wide owner of singleton lifecycles, bound to one host environment.
///
/// # Examples
///
/// ```rust
/// use singleton_lifecycle::{LocalHost, Registry, Singleton, SingletonConfig};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Settings;
/// impl Singleton for Settings {}
///
/// let registry = Registry::new(LocalHost::new());
/// registry.register::<Settings>(SingletonConfig::default());
///
/// let a = registry.get_instance_sync::<Settings>().unwrap();
/// let b = registry.get_instance_sync::<Settings>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// assert!(registry.is_initialized::<Settings>());
/// assert!(!registry.is_ready::<Settings>());
/// ```
pub struct Registry<H: Host> {
    host: H,
    configs: ConfigResolver,
    states: DashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    boot_entries: Mutex<Vec<BootEntry<H>>>,
    booted: AtomicBool,
    quit: QuitGate,
    runtime: Option<Handle>,
    events: Arc<EventSink>,
}

impl<H: Host> Registry<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            configs: ConfigResolver::new(),
            states: DashMap::new(),
            boot_entries: Mutex::new(Vec::new()),
            booted: AtomicBool::new(false),
            quit: QuitGate::new(),
            runtime: None,
            events: Arc::new(EventSink::default()),
        }
    }

    /// Runtime used for background initialization when the creating thread is
    /// not inside one.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    // ---------------------------------------------------------------------------------------------
    // Tracing
    // ---------------------------------------------------------------------------------------------

    /// Sets a callback invoked for every lifecycle event.
    pub fn set_trace_callback(&self, callback: impl Fn(&LifecycleEvent) + Send + Sync + 'static) {
        self.events.set(Arc::new(callback));
    }

    pub fn clear_trace_callback(&self) {
        self.events.clear();
    }

    // ---------------------------------------------------------------------------------------------
    // Registration and configuration
    // ---------------------------------------------------------------------------------------------

    /// Registers `T` with an explicit configuration.
    ///
    /// Returns `false` if `T` was already resolved (used) before this call; the
    /// existing configuration is kept.
    pub fn register<T: Singleton>(&self, config: SingletonConfig) -> bool {
        self.register_source::<T>(ConfigSource::Explicit(config))
    }

    /// Registers `T` with a TOML metadata table. Malformed metadata is logged
    /// and replaced by defaults when the type is resolved.
    pub fn register_metadata<T: Singleton>(&self, metadata: &str) -> bool {
        self.register_source::<T>(ConfigSource::Metadata(metadata.to_string()))
    }

    fn register_source<T: Singleton>(&self, source: ConfigSource) -> bool {
        let type_id = TypeId::of::<T>();
        let accepted = self.configs.set_source(type_id, type_name::<T>(), source);

        let mut entries = self.boot_entries.lock().unwrap_or_else(|p| p.into_inner());
        if !entries.iter().any(|e| e.type_id == type_id) {
            entries.push(BootEntry {
                type_id,
                type_name: type_name::<T>(),
                start: start_on_boot::<T, H>,
            });
        }
        accepted
    }

    /// The resolved configuration of `T`, resolving it on first call.
    pub fn config<T: Singleton>(&self) -> SingletonConfig {
        self.configs.resolve(TypeId::of::<T>(), type_name::<T>())
    }

    // ---------------------------------------------------------------------------------------------
    // State records
    // ---------------------------------------------------------------------------------------------

    fn state<T: Singleton>(&self) -> Result<Arc<SingletonState<T>>, LifecycleError> {
        let type_id = TypeId::of::<T>();
        let erased = match self.states.get(&type_id) {
            Some(entry) => entry.value().clone(),
            None => self
                .states
                .entry(type_id)
                .or_insert_with(|| Arc::new(SingletonState::<T>::new()) as Arc<dyn Any + Send + Sync>)
                .value()
                .clone(),
        };
        erased
            .downcast::<SingletonState<T>>()
            .map_err(|_| LifecycleError::TypeMismatch {
                type_name: type_name::<T>(),
            })
    }

    fn existing_state<T: Singleton>(&self) -> Option<Arc<SingletonState<T>>> {
        let erased = self.states.get(&TypeId::of::<T>())?.value().clone();
        erased.downcast::<SingletonState<T>>().ok()
    }

    fn refuse_after_quit<T: Singleton>(&self) {
        tracing::warn!(
            singleton = type_name::<T>(),
            "process is quitting; singleton access refused"
        );
        self.events.emit(LifecycleEvent::AccessAfterQuit {
            type_name: type_name::<T>(),
        });
    }

    fn cancel_error<T: Singleton>(&self, cause: CancelCause) -> LifecycleError {
        let type_name = type_name::<T>();
        match cause {
            CancelCause::Shutdown => {
                tracing::debug!(singleton = type_name, "wait ended by teardown");
                LifecycleError::Destroyed { type_name }
            }
            CancelCause::Caller => {
                tracing::debug!(singleton = type_name, "wait cancelled by caller");
                LifecycleError::Cancelled { type_name }
            }
        }
    }

    // ---------------------------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------------------------

    /// Whether an instance of `T` currently exists.
    pub fn is_initialized<T: Singleton>(&self) -> bool {
        self.existing_state::<T>()
            .is_some_and(|s| s.instance.get().is_some())
    }

    /// Whether the instance of `T` finished initialization.
    pub fn is_ready<T: Singleton>(&self) -> bool {
        self.existing_state::<T>().is_some_and(|s| s.ready.get())
    }

    /// Whether the instance of `T` was torn down.
    pub fn is_destroyed<T: Singleton>(&self) -> bool {
        self.existing_state::<T>()
            .is_some_and(|s| s.shutdown.is_triggered())
    }

    pub fn is_quitting(&self) -> bool {
        self.quit.is_closed()
    }

    // ---------------------------------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------------------------------

    /// Returns the instance of `T`, creating it if needed.
    ///
    /// Returns `None` once the process is quitting or after `T` was torn down.
    pub fn get_instance_sync<T: Singleton>(&self) -> Option<Arc<T>> {
        let type_name = type_name::<T>();
        if self.quit.is_closed() {
            self.refuse_after_quit::<T>();
            return None;
        }

        let state = match self.state::<T>() {
            Ok(state) => state,
            Err(e) => {
                tracing::error!(singleton = type_name, error = %e, "cannot access singleton state");
                return None;
            }
        };
        if let Some(instance) = state.instance.get() {
            return Some(instance);
        }
        if state.shutdown.is_triggered() {
            tracing::debug!(singleton = type_name, "singleton was destroyed; not re-creating");
            return None;
        }

        let config = self.config::<T>();
        if !config.thread_safe {
            return self.create(&state, &config);
        }

        let _guard = state.create_lock.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(instance) = state.instance.get() {
            return Some(instance);
        }
        if self.quit.is_closed() {
            self.refuse_after_quit::<T>();
            return None;
        }
        if state.shutdown.is_triggered() {
            return None;
        }
        self.create(&state, &config)
    }

    /// Builds or adopts an instance and publishes it. Returns `None` when the
    /// type was torn down while the host was building.
    fn create<T: Singleton>(
        &self,
        state: &Arc<SingletonState<T>>,
        config: &SingletonConfig,
    ) -> Option<Arc<T>> {
        let type_name = type_name::<T>();
        let mut candidates = self.host.find_existing::<T>();

        let instance = if candidates.is_empty() {
            let instance = self.host.instantiate::<T>();
            tracing::info!(singleton = type_name, "created singleton instance");
            self.events.emit(LifecycleEvent::Created { type_name });
            instance
        } else {
            let count = candidates.len();
            let survivor = candidates.remove(0);
            if count > 1 {
                tracing::warn!(
                    singleton = type_name,
                    candidates = count,
                    "multiple live instances found; keeping the first and destroying the rest"
                );
            }
            for extra in candidates {
                self.host.destroy(&extra);
                self.events
                    .emit(LifecycleEvent::DuplicateDestroyed { type_name });
            }
            tracing::info!(singleton = type_name, "adopted existing instance");
            self.events.emit(LifecycleEvent::Adopted {
                type_name,
                candidates: count,
            });
            survivor
        };

        self.host.mark_persistent(&instance);

        // Unsynchronized creators can race here; the first write wins and the
        // loser's object is removed so only one instance stays live. The write
        // shares the transition lock with teardown, so a creator that was still
        // building when the type was torn down cannot publish afterwards.
        let transition = state.transition.lock().unwrap_or_else(|p| p.into_inner());
        if state.shutdown.is_triggered() {
            drop(transition);
            tracing::warn!(
                singleton = type_name,
                "singleton was torn down during creation; destroying the new instance"
            );
            self.host.destroy(&instance);
            return None;
        }
        let mut written = false;
        state.instance.set_if(|slot| {
            if slot.is_none() {
                *slot = Some(instance.clone());
                written = true;
            }
            written
        });
        drop(transition);

        if !written {
            return match state.instance.get() {
                Some(held) if Arc::ptr_eq(&held, &instance) => Some(held),
                Some(held) => {
                    tracing::warn!(
                        singleton = type_name,
                        "lost a creation race; destroying the redundant instance"
                    );
                    self.host.destroy(&instance);
                    Some(held)
                }
                None => {
                    self.host.destroy(&instance);
                    None
                }
            };
        }

        if config.init_timing == InitTiming::Immediate {
            self.spawn_initialization(state, instance.clone(), config.init_timeout());
        }
        Some(instance)
    }

    // ---------------------------------------------------------------------------------------------
    // Initialization
    // ---------------------------------------------------------------------------------------------

    fn spawn_initialization<T: Singleton>(
        &self,
        state: &Arc<SingletonState<T>>,
        instance: Arc<T>,
        timeout: Duration,
    ) {
        if state.init_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let Some(handle) = Handle::try_current().ok().or_else(|| self.runtime.clone()) else {
            tracing::warn!(
                singleton = type_name::<T>(),
                "no tokio runtime available; immediate initialization not started"
            );
            state.init_started.store(false, Ordering::SeqCst);
            return;
        };

        let task = handle.spawn(run_initialization(
            state.clone(),
            instance,
            timeout,
            self.events.clone(),
        ));
        *state.init_task.lock().unwrap_or_else(|p| p.into_inner()) = Some(task);
    }

    /// Runs the bounded initialization routine of `T` and waits for it.
    ///
    /// This is the first-use hook for `Lazy` types; it creates the instance if it
    /// does not exist yet. The routine runs once per instance: a second call, or
    /// a call after `Immediate` initialization was started, fails with
    /// [`LifecycleError::InitAlreadyStarted`].
    pub async fn initialize<T: Singleton>(&self) -> Result<Arc<T>, LifecycleError> {
        let type_name = type_name::<T>();
        let instance = self
            .get_instance_sync::<T>()
            .ok_or(LifecycleError::Destroyed { type_name })?;
        let state = self.state::<T>()?;
        if state.init_started.swap(true, Ordering::SeqCst) {
            return Err(LifecycleError::InitAlreadyStarted { type_name });
        }
        let timeout = self.config::<T>().init_timeout();
        run_initialization(state, instance, timeout, self.events.clone()).await
    }

    /// Takes the handle of the background initialization started for an
    /// `Immediate` type, so its outcome can be observed.
    pub fn take_initialization<T: Singleton>(&self) -> Option<InitHandle<T>> {
        self.existing_state::<T>()?
            .init_task
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
    }

    // ---------------------------------------------------------------------------------------------
    // Waiting
    // ---------------------------------------------------------------------------------------------

    /// Waits until an instance of `T` exists.
    ///
    /// Fails with `Destroyed` if the process is quitting or the instance is torn
    /// down first, and with `Cancelled` if `cancel` fires first.
    pub async fn wait_for_instance<T: Singleton>(
        &self,
        cancel: Option<CancellationToken>,
    ) -> Result<Arc<T>, LifecycleError> {
        let type_name = type_name::<T>();
        if self.quit.is_closed() {
            self.refuse_after_quit::<T>();
            return Err(LifecycleError::Destroyed { type_name });
        }
        let state = self.state::<T>()?;
        if state.shutdown.is_triggered() {
            return Err(LifecycleError::Destroyed { type_name });
        }
        if let Some(instance) = state.instance.get() {
            return Ok(instance);
        }

        let caller = cancel.unwrap_or_default();
        let scope = CancelScope::new(&caller, state.shutdown.token());
        tracing::debug!(singleton = type_name, "waiting for instance");
        self.await_instance(&state, scope).await
    }

    async fn await_instance<T: Singleton>(
        &self,
        state: &SingletonState<T>,
        scope: CancelScope<'_>,
    ) -> Result<Arc<T>, LifecycleError> {
        let seen = state
            .instance
            .wait_until(|slot| slot.is_some(), scope)
            .await
            .map_err(|cause| self.cancel_error::<T>(cause))?;
        seen.ok_or(LifecycleError::Destroyed {
            type_name: type_name::<T>(),
        })
    }

    /// Waits until the instance of `T` exists and finished initialization.
    ///
    /// This does not start initialization. A failed or timed-out initialization
    /// leaves the ready flag unset, so the wait continues until `cancel` fires or
    /// the instance is torn down.
    pub async fn wait_for_ready<T: Singleton>(
        &self,
        cancel: Option<CancellationToken>,
    ) -> Result<Arc<T>, LifecycleError> {
        let type_name = type_name::<T>();
        if self.quit.is_closed() {
            self.refuse_after_quit::<T>();
            return Err(LifecycleError::Destroyed { type_name });
        }
        let state = self.state::<T>()?;
        if state.shutdown.is_triggered() {
            return Err(LifecycleError::Destroyed { type_name });
        }
        if let Some(instance) = state.instance.get() {
            if state.ready.get() {
                return Ok(instance);
            }
        }

        let caller = cancel.unwrap_or_default();
        let scope = CancelScope::new(&caller, state.shutdown.token());
        tracing::debug!(singleton = type_name, "waiting for readiness");

        let instance = self.await_instance(&state, scope).await?;
        state
            .ready
            .wait_until(|ready| *ready, scope)
            .await
            .map_err(|cause| self.cancel_error::<T>(cause))?;

        if state.shutdown.is_triggered() || !state.holds(&instance) {
            return Err(LifecycleError::Destroyed { type_name });
        }
        Ok(instance)
    }

    // ---------------------------------------------------------------------------------------------
    // Teardown, boot and quit
    // ---------------------------------------------------------------------------------------------

    /// Teardown hook: the host removed `instance`.
    ///
    /// Ignored unless `instance` is the held instance of `T`. Fires the shutdown
    /// signal, then empties the instance slot and clears the ready flag. Returns
    /// whether the teardown took place.
    pub fn on_destroyed<T: Singleton>(&self, instance: &Arc<T>) -> bool {
        let type_name = type_name::<T>();
        let Some(state) = self.existing_state::<T>() else {
            tracing::debug!(singleton = type_name, "teardown reported for an unknown singleton");
            return false;
        };

        {
            let _guard = state.transition.lock().unwrap_or_else(|p| p.into_inner());
            if !state.holds(instance) {
                tracing::debug!(
                    singleton = type_name,
                    "teardown reported for an instance that is not held; ignoring"
                );
                return false;
            }
            state.shutdown.trigger();
            state.instance.set(None);
            state.ready.set(false);
        }

        tracing::info!(singleton = type_name, "singleton torn down");
        self.events.emit(LifecycleEvent::TornDown { type_name });
        true
    }

    /// Asks the host to destroy the held instance of `T` and runs the teardown
    /// hook. Returns `false` if there was nothing to destroy.
    pub fn destroy<T: Singleton>(&self) -> bool {
        let Some(instance) = self.existing_state::<T>().and_then(|s| s.instance.get()) else {
            return false;
        };
        self.host.destroy(&instance);
        self.on_destroyed(&instance)
    }

    /// Boot hook: creates every registered type configured with
    /// `auto_start_on_boot`. Runs once; later calls return `0`.
    pub fn boot(&self) -> usize {
        if self.booted.swap(true, Ordering::SeqCst) {
            tracing::debug!("boot hook already ran");
            return 0;
        }

        let entries = self
            .boot_entries
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone();

        let mut started = 0;
        for entry in entries {
            let config = self.configs.resolve(entry.type_id, entry.type_name);
            if !config.auto_start_on_boot {
                continue;
            }
            if (entry.start)(self) {
                started += 1;
            } else {
                tracing::warn!(singleton = entry.type_name, "auto-start on boot did not create an instance");
            }
        }
        tracing::info!(started, "boot complete");
        started
    }

    /// Quit hook: from now on no instance is created and waits fail fast.
    ///
    /// Does not fire any shutdown signal; waits already in progress end only
    /// through teardown or their own token.
    pub fn quit(&self) {
        if self.quit.close() {
            tracing::info!("process quitting; singleton creation disabled");
            self.events.emit(LifecycleEvent::Quit {});
        }
    }
}

/// How long an interrupted procedure may keep running after its token was
/// cancelled before it is dropped.
const UNWIND_GRACE: Duration = Duration::from_millis(250);

enum InitOutcome {
    Finished(Result<(), BoxError>),
    TimedOut,
    TornDown,
}

/// The bounded initialization routine.
///
/// Races the procedure against `timeout` and the shutdown signal. When either
/// wins, the procedure's token is cancelled first and the procedure is polled
/// for up to [`UNWIND_GRACE`] so it can unwind from its suspension point; only
/// then is it dropped.
async fn run_initialization<T: Singleton>(
    state: Arc<SingletonState<T>>,
    instance: Arc<T>,
    timeout: Duration,
    events: Arc<EventSink>,
) -> Result<Arc<T>, LifecycleError> {
    let type_name = type_name::<T>();
    let scope = state.shutdown.child_token();
    tracing::debug!(singleton = type_name, ?timeout, "initializing");

    let outcome = {
        let procedure = instance.initialize(scope.clone());
        tokio::pin!(procedure);

        let outcome = tokio::select! {
            biased;
            _ = state.shutdown.cancelled() => InitOutcome::TornDown,
            result = &mut procedure => InitOutcome::Finished(result),
            _ = tokio::time::sleep(timeout) => InitOutcome::TimedOut,
        };

        if !matches!(outcome, InitOutcome::Finished(_)) {
            scope.cancel();
            if tokio::time::timeout(UNWIND_GRACE, &mut procedure).await.is_err() {
                tracing::debug!(
                    singleton = type_name,
                    grace = ?UNWIND_GRACE,
                    "initialization ignored cancellation; dropping it"
                );
            }
        }
        outcome
    };

    match outcome {
        InitOutcome::TornDown => {
            tracing::debug!(singleton = type_name, "torn down during initialization");
            Err(LifecycleError::Destroyed { type_name })
        }
        InitOutcome::TimedOut => {
            tracing::warn!(singleton = type_name, ?timeout, "initialization timed out");
            events.emit(LifecycleEvent::InitTimedOut { type_name, timeout });
            Err(LifecycleError::InitTimeout { type_name, timeout })
        }
        InitOutcome::Finished(Err(source)) => {
            scope.cancel();
            tracing::error!(singleton = type_name, error = %source, "initialization failed");
            events.emit(LifecycleEvent::InitFailed {
                type_name,
                error: source.to_string(),
            });
            Err(LifecycleError::InitFailed { type_name, source })
        }
        InitOutcome::Finished(Ok(())) => {
            if !state.mark_ready(&instance) {
                tracing::debug!(singleton = type_name, "initialized instance is no longer held");
                return Err(LifecycleError::Destroyed { type_name });
            }
            tracing::info!(singleton = type_name, "singleton ready");
            events.emit(LifecycleEvent::Ready { type_name });
            Ok(instance)
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
