//! # Demo: scheduler
//!
//! Runs three tasks side by side and prints runtime events through `tracing`.
//!
//! Shows how to:
//! - Load [`SchedulerConfig`] from a TOML file with `CHRONOVISOR_*` overrides.
//! - Build descriptors for every trigger kind.
//! - Attach [`LogWriter`] and a custom [`Subscribe`] implementation.
//! - Stop gracefully (in-flight units are drained before `stop()` returns).
//!
//! ## Flow
//! ```text
//! TaskScheduler::start()
//!     ├─► TaskLoop "heartbeat"  fixed_rate(1s)
//!     ├─► TaskLoop "flaky"      fixed_delay(2s), fails every other run
//!     └─► TaskLoop "rollup"     cron(* * * * *), blocking
//!                   │
//!                   ▼
//!   Bus ──► SubscriberSet ──► LogWriter / FailureCounter
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=chronovisor=debug,info cargo run --example scheduler -- [config.toml]
//! CHRONOVISOR_EXECUTOR=thread_pool cargo run --example scheduler
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chronovisor::{
    Event, EventKind, LogWriter, SchedulerConfig, Subscribe, SyncTaskFn, TaskDescriptor,
    TaskError, TaskFn, TaskScheduler,
};
use tracing_subscriber::EnvFilter;

/// Counts failed invocations; in real life this would feed a metrics exporter.
#[derive(Default)]
struct FailureCounter(AtomicU64);

#[async_trait::async_trait]
impl Subscribe for FailureCounter {
    async fn on_event(&self, ev: &Event) {
        if ev.kind == EventKind::TaskFailed {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn name(&self) -> &'static str {
        "failure-counter"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => SchedulerConfig::load(path)?,
        None => SchedulerConfig::load("chronovisor.toml")?,
    };

    let heartbeat = TaskFn::arc("heartbeat", || async {
        tracing::info!("still alive");
        Ok::<(), TaskError>(())
    });

    let runs = Arc::new(AtomicU64::new(0));
    let flaky = TaskFn::arc("flaky", move || {
        let runs = runs.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            if runs.fetch_add(1, Ordering::Relaxed) % 2 == 1 {
                return Err(TaskError::from("upstream returned 503"));
            }
            Ok(())
        }
    });

    let rollup = SyncTaskFn::arc("rollup", || -> Result<(), TaskError> {
        std::thread::sleep(Duration::from_millis(200));
        Ok(())
    });

    let failures = Arc::new(FailureCounter::default());
    let scheduler = TaskScheduler::builder(cfg)
        .with_subscribers(vec![Arc::new(LogWriter::new()), failures.clone()])
        .build();

    scheduler.discover(vec![
        TaskDescriptor::fixed_rate(heartbeat, Duration::from_secs(1))?,
        TaskDescriptor::fixed_delay(flaky, Duration::from_secs(2))?
            .with_initial_delay(Duration::from_millis(500)),
        TaskDescriptor::builder(rollup).cron("* * * * *").build()?,
    ]);

    scheduler.start().await?;
    tokio::select! {
        _ = tokio::time::sleep(Duration::from_secs(10)) => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    scheduler.stop().await?;

    println!("failed invocations: {}", failures.0.load(Ordering::Relaxed));
    Ok(())
}
