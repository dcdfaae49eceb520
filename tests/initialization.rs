//! Integration tests for the bounded initialization routine.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{settle, Broken, Delayed, Gated, Stuck, Unwinding};
use singleton_lifecycle::{
    CancellationToken, InitTiming, LifecycleError, LocalHost, Registry, SingletonConfig,
};

fn immediate() -> SingletonConfig {
    SingletonConfig {
        init_timing: InitTiming::Immediate,
        ..SingletonConfig::default()
    }
}

#[tokio::test]
async fn test_lazy_initialization_is_driven_by_initialize() {
    let registry = Registry::new(LocalHost::new());
    let instance = registry.get_instance_sync::<Delayed>().unwrap();
    settle().await;
    assert!(!registry.is_ready::<Delayed>());
    assert_eq!(instance.runs.load(Ordering::SeqCst), 0);

    let initialized = registry.initialize::<Delayed>().await.unwrap();
    assert!(Arc::ptr_eq(&instance, &initialized));
    assert!(registry.is_ready::<Delayed>());
}

#[tokio::test]
async fn test_initialize_creates_missing_instance() {
    let registry = Registry::new(LocalHost::new());
    let instance = registry.initialize::<Delayed>().await.unwrap();
    assert_eq!(instance.runs.load(Ordering::SeqCst), 1);
    assert_eq!(registry.host().instantiate_count(), 1);
}

#[tokio::test]
async fn test_initialization_runs_once() {
    let registry = Registry::new(LocalHost::new());
    registry.initialize::<Delayed>().await.unwrap();

    let err = registry.initialize::<Delayed>().await.unwrap_err();
    assert!(matches!(err, LifecycleError::InitAlreadyStarted { .. }));
    let instance = registry.get_instance_sync::<Delayed>().unwrap();
    assert_eq!(instance.runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_immediate_initialization_starts_in_background() {
    let registry = Registry::new(LocalHost::new());
    registry.register::<Delayed>(immediate());

    let instance = registry.get_instance_sync::<Delayed>().unwrap();
    // Creation returned before the 50ms procedure finished.
    assert!(!registry.is_ready::<Delayed>());

    let ready = registry.wait_for_ready::<Delayed>(None).await.unwrap();
    assert!(Arc::ptr_eq(&instance, &ready));
    assert_eq!(instance.runs.load(Ordering::SeqCst), 1);

    let outcome = registry
        .take_initialization::<Delayed>()
        .unwrap()
        .await
        .unwrap();
    assert!(outcome.is_ok());
    assert!(registry.take_initialization::<Delayed>().is_none());

    let err = registry.initialize::<Delayed>().await.unwrap_err();
    assert!(matches!(err, LifecycleError::InitAlreadyStarted { .. }));
}

#[tokio::test]
async fn test_initialization_timeout() {
    let registry = Registry::new(LocalHost::new());
    registry.register_metadata::<Stuck>("init_timeout_seconds = 0.1");

    let instance = registry.get_instance_sync::<Stuck>().unwrap();
    let started = tokio::time::Instant::now();
    let err = registry.initialize::<Stuck>().await.unwrap_err();

    match err {
        LifecycleError::InitTimeout { timeout, .. } => {
            assert_eq!(timeout, Duration::from_millis(100))
        }
        other => panic!("expected InitTimeout, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(!registry.is_ready::<Stuck>());

    // The procedure's token was cancelled so its own work can unwind.
    settle().await;
    assert!(instance.saw_cancel.load(Ordering::SeqCst));

    // Not retried: readiness stays false for this instance.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!registry.is_ready::<Stuck>());
    assert!(registry.is_initialized::<Stuck>());
}

#[tokio::test]
async fn test_timed_out_procedure_unwinds_through_its_token() {
    let registry = Registry::new(LocalHost::new());
    registry.register_metadata::<Unwinding>("init_timeout_seconds = 0.1");

    let instance = registry.get_instance_sync::<Unwinding>().unwrap();
    let err = registry.initialize::<Unwinding>().await.unwrap_err();

    assert!(matches!(err, LifecycleError::InitTimeout { .. }));
    // The procedure saw the cancellation itself, before the error was returned.
    assert!(instance.unwound.load(Ordering::SeqCst));
    assert!(!registry.is_ready::<Unwinding>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_torn_down_procedure_unwinds_through_its_token() {
    let registry = Arc::new(Registry::new(LocalHost::new()));
    let instance = registry.get_instance_sync::<Unwinding>().unwrap();

    let init = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.initialize::<Unwinding>().await })
    };
    settle().await;
    assert!(!instance.unwound.load(Ordering::SeqCst));

    assert!(registry.destroy::<Unwinding>());
    let err = init.await.unwrap().unwrap_err();
    assert!(err.is_destroyed());
    assert!(instance.unwound.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_immediate_timeout_reaches_observer_not_waiter() {
    let registry = Registry::new(LocalHost::new());
    registry.register::<Stuck>(SingletonConfig {
        init_timing: InitTiming::Immediate,
        init_timeout_seconds: 0.1,
        ..SingletonConfig::default()
    });

    registry.get_instance_sync::<Stuck>().unwrap();
    let outcome = registry
        .take_initialization::<Stuck>()
        .unwrap()
        .await
        .unwrap();
    assert!(matches!(outcome, Err(LifecycleError::InitTimeout { .. })));

    // A readiness waiter is not told about the timeout; it waits until its own
    // token fires.
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });
    let err = registry
        .wait_for_ready::<Stuck>(Some(token))
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Cancelled { .. }));
}

#[tokio::test]
async fn test_initialization_failure_carries_source() {
    let registry = Registry::new(LocalHost::new());
    let err = registry.initialize::<Broken>().await.unwrap_err();

    match &err {
        LifecycleError::InitFailed { source, .. } => {
            assert_eq!(source.to_string(), "backend unreachable")
        }
        other => panic!("expected InitFailed, got {other:?}"),
    }
    assert!(!registry.is_ready::<Broken>());
    assert!(registry.is_initialized::<Broken>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_teardown_during_initialization() {
    let registry = Arc::new(Registry::new(LocalHost::new()));
    registry.get_instance_sync::<Gated>().unwrap();

    let init = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.initialize::<Gated>().await })
    };
    settle().await;

    assert!(registry.destroy::<Gated>());
    let err = init.await.unwrap().unwrap_err();
    assert!(err.is_destroyed());
    assert!(!registry.is_ready::<Gated>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_gated_initialization_releases_waiters() {
    let registry = Arc::new(Registry::new(LocalHost::new()));
    let instance = registry.get_instance_sync::<Gated>().unwrap();

    let init = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.initialize::<Gated>().await })
    };
    let waiter = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.wait_for_ready::<Gated>(None).await })
    };
    settle().await;
    assert!(!waiter.is_finished());

    instance.gate.notify_one();
    init.await.unwrap().unwrap();
    let ready = waiter.await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&instance, &ready));
}

#[test]
fn test_immediate_initialization_on_configured_runtime() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();

    let registry = Registry::new(LocalHost::new()).with_runtime(runtime.handle().clone());
    registry.register::<Delayed>(immediate());

    // Created from a plain thread; initialization still runs on the runtime.
    let instance = registry.get_instance_sync::<Delayed>().unwrap();
    let outcome = runtime
        .block_on(registry.take_initialization::<Delayed>().unwrap())
        .unwrap();
    assert!(outcome.is_ok());
    assert!(registry.is_ready::<Delayed>());
    assert_eq!(instance.runs.load(Ordering::SeqCst), 1);
}
