//! Basic usage example for singleton-lifecycle.
//!
//! Demonstrates:
//! - Defining a process-wide registry with `define_lifecycle!`
//! - Registering per-type configuration and auto-starting on boot
//! - Synchronous access with `get_instance_sync()`
//! - Tearing an instance down and quitting the process
//!
//! Run with: `cargo run --example basic_usage`

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use singleton_lifecycle::{define_lifecycle, observability, LocalHost, Singleton, SingletonConfig};

define_lifecycle!(app: LocalHost = LocalHost::new());

/// Counts frames rendered since start.
#[derive(Debug, Default)]
struct FrameCounter {
    frames: AtomicU64,
}

impl Singleton for FrameCounter {}

/// Only created when somebody asks for it.
#[derive(Debug, Default)]
struct Leaderboard;

impl Singleton for Leaderboard {}

fn main() {
    observability::init_logging("singleton_lifecycle=info");
    println!("=== singleton-lifecycle: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Register types before the process boots
    // -------------------------------------------------------------------------
    println!("1. Registering singleton types...");

    app::register::<FrameCounter>(SingletonConfig {
        auto_start_on_boot: true,
        ..SingletonConfig::default()
    });
    app::register_metadata::<Leaderboard>("thread_safe = true\ninit_timeout_seconds = 2.0");

    // -------------------------------------------------------------------------
    // 2. Boot: auto-start types are created
    // -------------------------------------------------------------------------
    let started = app::boot();
    println!("\n2. Boot started {started} singleton(s)");
    println!("   FrameCounter initialized: {}", app::is_initialized::<FrameCounter>());
    println!("   Leaderboard initialized:  {}", app::is_initialized::<Leaderboard>());

    // -------------------------------------------------------------------------
    // 3. Access from several threads converges on one instance
    // -------------------------------------------------------------------------
    println!("\n3. Rendering from 4 threads...");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                if let Some(counter) = app::get_instance_sync::<FrameCounter>() {
                    counter.frames.fetch_add(10, Ordering::Relaxed);
                }
            })
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    if let Some(counter) = app::get_instance_sync::<FrameCounter>() {
        println!("   Frames rendered: {}", counter.frames.load(Ordering::Relaxed));
    }

    // -------------------------------------------------------------------------
    // 4. Lazy creation
    // -------------------------------------------------------------------------
    let board: Option<Arc<Leaderboard>> = app::get_instance_sync();
    println!("\n4. Leaderboard created on demand: {}", board.is_some());

    // -------------------------------------------------------------------------
    // 5. Teardown and quit
    // -------------------------------------------------------------------------
    println!("\n5. Tearing down and quitting...");
    app::destroy::<Leaderboard>();
    println!("   Leaderboard destroyed: {}", app::is_destroyed::<Leaderboard>());

    app::quit();
    println!(
        "   FrameCounter after quit: {:?}",
        app::get_instance_sync::<FrameCounter>().map(|_| "available")
    );

    println!("\n=== Example completed successfully! ===");
}
