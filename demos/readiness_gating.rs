//! Readiness gating example for singleton-lifecycle.
//!
//! A slow-starting service is created immediately and initialized in the
//! background; callers await readiness instead of polling. A second service
//! that never finishes initializing shows the timeout and the caller-side
//! cancellation.
//!
//! Run with: `cargo run --example readiness_gating`

use std::time::Duration;

use singleton_lifecycle::{
    observability, BoxError, CancellationToken, InitTiming, LifecycleError, LocalHost, Registry,
    Singleton, SingletonConfig,
};

#[derive(Debug, Default)]
struct AssetCache {
    entries: std::sync::Mutex<Vec<&'static str>>,
}

impl Singleton for AssetCache {
    async fn initialize(&self, cancel: CancellationToken) -> Result<(), BoxError> {
        for asset in ["terrain", "sprites", "sounds"] {
            tokio::select! {
                _ = cancel.cancelled() => return Err("cancelled while loading".into()),
                _ = tokio::time::sleep(Duration::from_millis(100)) => {}
            }
            self.entries.lock().map_err(|e| e.to_string())?.push(asset);
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Matchmaker;

impl Singleton for Matchmaker {
    async fn initialize(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        // Waits for a server that never answers.
        std::future::pending::<()>().await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    observability::init_logging("singleton_lifecycle=debug");

    let registry = Registry::new(LocalHost::new());
    registry.register::<AssetCache>(SingletonConfig {
        init_timing: InitTiming::Immediate,
        ..SingletonConfig::default()
    });
    registry.register_metadata::<Matchmaker>("init_timeout_seconds = 0.5");

    // Creation returns right away; loading continues in the background.
    let _ = registry.get_instance_sync::<AssetCache>();
    println!("AssetCache ready right after creation: {}", registry.is_ready::<AssetCache>());

    let cache = registry.wait_for_ready::<AssetCache>(None).await?;
    println!("AssetCache ready with {:?}", cache.entries.lock().map_err(|e| e.to_string())?);

    // The matchmaker's initialization times out; the driver sees the error.
    match registry.initialize::<Matchmaker>().await {
        Err(LifecycleError::InitTimeout { timeout, .. }) => {
            println!("Matchmaker initialization timed out after {timeout:?}")
        }
        other => println!("Matchmaker initialization: {:?}", other.map(|_| ())),
    }

    // A waiter is not told about the timeout; it gives up on its own token.
    let give_up = CancellationToken::new();
    let trigger = give_up.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });
    match registry.wait_for_ready::<Matchmaker>(Some(give_up)).await {
        Err(e) => println!("Matchmaker wait ended: {e}"),
        Ok(_) => println!("Matchmaker became ready"),
    }

    registry.destroy::<AssetCache>();
    registry.quit();
    Ok(())
}
