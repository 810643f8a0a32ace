//! # TaskScheduler: registry of descriptors, one loop per descriptor, aggregate lifecycle.
//!
//! The [`TaskScheduler`] owns the event bus, the executor and the descriptor registry.
//! `start()` spawns one [`TaskLoop`] per descriptor; `stop()` cancels them, waits for
//! them and drains the executor.
//!
//! ## State machine
//! ```text
//! Created ──start()──► Started ──stop()──► Stopped
//!    │                    │                   │
//!    ├─ stop(): no-op     ├─ start(): AlreadyStarted
//!    └─ disabled start(): └─ stop(): drain    ├─ start(): AlreadyStopped
//!       no-op                                 └─ stop(): no-op
//! ```
//!
//! ## Wiring
//! ```text
//! start():
//!   executor.start()
//!   listener: Bus.subscribe() ─► SubscriberSet::emit(&Event)   (ends after SchedulerStopped)
//!   for each descriptor:
//!     TaskLoop::new(descriptor, executor, bus, clock)
//!       └─► child CancellationToken = root.child_token()
//!           tokio::spawn(loop.run(child))
//!
//! stop():
//!   root.cancel()            → sleeping loops wake and exit without submitting
//!   take loops + listener, release the lifecycle lock
//!   join every loop
//!   executor.stop()          → waits until live() == 0
//!   publish ExecutorDrained, SchedulerStopped
//!   join listener            → every subscriber has seen every event
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use chronovisor::{
//!     AsyncExecutor, LogWriter, SchedulerConfig, TaskDescriptor, TaskError, TaskFn, TaskScheduler,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let heartbeat = TaskFn::arc("heartbeat", || async { Ok::<(), TaskError>(()) });
//!
//!     let scheduler = TaskScheduler::builder(SchedulerConfig::default())
//!         .with_executor(Arc::new(AsyncExecutor::new()))
//!         .with_descriptors(vec![
//!             TaskDescriptor::fixed_rate(heartbeat.clone(), Duration::from_millis(10))?,
//!             TaskDescriptor::cron(heartbeat, "*/5 * * * *")?,
//!         ])
//!         .with_subscribers(vec![Arc::new(LogWriter::new())])
//!         .build();
//!
//!     scheduler.start().await?;
//!     tokio::time::sleep(Duration::from_millis(35)).await;
//!     scheduler.stop().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, broadcast::error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    clock::Clock,
    core::{
        SchedulerConfig,
        builder::SchedulerBuilder,
        loops::{LoopExit, TaskLoop},
        shutdown,
    },
    error::SchedulerError,
    events::{Bus, Event, EventKind},
    executor::ExecutorRef,
    subscribers::{Subscribe, SubscriberSet},
    tasks::TaskDescriptor,
};

/// Lifecycle state of a [`TaskScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Built, loops not spawned yet.
    Created,
    /// Loops are running.
    Started,
    /// `stop()` has begun; loops are cancelled and the executor drains. Terminal.
    Stopped,
}

/// Handle to a running loop.
struct LoopHandle {
    name: String,
    join: JoinHandle<LoopExit>,
}

struct Lifecycle {
    state: SchedulerState,
    root: CancellationToken,
    loops: Vec<LoopHandle>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    listener: Option<JoinHandle<()>>,
}

/// Orchestrates periodic execution of the registered descriptors.
pub struct TaskScheduler {
    cfg: SchedulerConfig,
    bus: Bus,
    executor: ExecutorRef,
    clock: Arc<dyn Clock>,
    registry: Mutex<Vec<TaskDescriptor>>,
    lifecycle: AsyncMutex<Lifecycle>,
}

impl TaskScheduler {
    /// Creates a scheduler with default config, the given descriptors and executor.
    pub fn new(descriptors: Vec<TaskDescriptor>, executor: ExecutorRef) -> Self {
        Self::builder(SchedulerConfig::default())
            .with_executor(executor)
            .with_descriptors(descriptors)
            .build()
    }

    /// Starts a builder for a scheduler using `cfg`.
    pub fn builder(cfg: SchedulerConfig) -> SchedulerBuilder {
        SchedulerBuilder::new(cfg)
    }

    pub(crate) fn new_internal(
        cfg: SchedulerConfig,
        executor: ExecutorRef,
        clock: Arc<dyn Clock>,
        descriptors: Vec<TaskDescriptor>,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        Self {
            bus: Bus::new(cfg.bus_capacity_clamped()),
            cfg,
            executor,
            clock,
            registry: Mutex::new(descriptors),
            lifecycle: AsyncMutex::new(Lifecycle {
                state: SchedulerState::Created,
                root: CancellationToken::new(),
                loops: Vec::new(),
                subscribers,
                listener: None,
            }),
        }
    }

    /// Records descriptors and returns how many were accepted.
    ///
    /// Descriptors are validated at construction, so every one is accepted. Loops are only
    /// spawned by `start()`: descriptors discovered while started are recorded but not run.
    pub fn discover(&self, descriptors: impl IntoIterator<Item = TaskDescriptor>) -> usize {
        let mut registry = self.registry();
        let before = registry.len();
        for descriptor in descriptors {
            debug!(task = descriptor.name(), trigger = %descriptor.trigger(), "descriptor discovered");
            registry.push(descriptor);
        }
        registry.len() - before
    }

    /// Spawns one loop per registered descriptor.
    ///
    /// A no-op when scheduling is disabled in the config. Fails with
    /// [`SchedulerError::AlreadyStarted`] or [`SchedulerError::AlreadyStopped`] on misuse.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        let mut life = self.lifecycle.lock().await;
        match life.state {
            SchedulerState::Created => {}
            SchedulerState::Started => return Err(SchedulerError::AlreadyStarted),
            SchedulerState::Stopped => return Err(SchedulerError::AlreadyStopped),
        }
        if !self.cfg.enabled {
            info!(tasks = self.task_count(), "scheduling disabled; start is a no-op");
            return Ok(());
        }

        self.executor.start().await;
        let subscribers = std::mem::take(&mut life.subscribers);
        life.listener = Some(self.spawn_listener(subscribers));

        let descriptors = self.registry().clone();
        for descriptor in descriptors {
            let name = descriptor.name().to_string();
            let task_loop = TaskLoop::new(
                descriptor,
                Arc::clone(&self.executor),
                self.bus.clone(),
                Arc::clone(&self.clock),
            );
            let join = tokio::spawn(task_loop.run(life.root.child_token()));
            life.loops.push(LoopHandle { name, join });
        }

        life.state = SchedulerState::Started;
        let loops = life.loops.len();
        info!(loops, executor = self.executor.name(), "scheduler started");
        self.bus.publish(
            Event::new(EventKind::SchedulerStarted).with_reason(format!("loops={loops}")),
        );
        Ok(())
    }

    /// Cancels every loop, waits for them, then drains the executor.
    ///
    /// A no-op before `start()` and on repeated calls. The lifecycle lock is released
    /// before any waiting, so in-flight units may still query [`state`](Self::state) and
    /// [`running_loops`](Self::running_loops). Registered descriptors are kept.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        let (loops, listener) = {
            let mut life = self.lifecycle.lock().await;
            if life.state != SchedulerState::Started {
                debug!(state = ?life.state, "stop ignored");
                return Ok(());
            }
            life.state = SchedulerState::Stopped;
            life.root.cancel();
            (std::mem::take(&mut life.loops), life.listener.take())
        };

        for lp in loops {
            match lp.join.await {
                Ok(exit) => debug!(task = %lp.name, exit = exit.as_label(), "loop joined"),
                Err(err) => warn!(task = %lp.name, error = %err, "loop terminated abnormally"),
            }
        }

        self.executor.stop().await;
        self.bus.publish(Event::new(EventKind::ExecutorDrained));
        self.bus.publish(Event::new(EventKind::SchedulerStopped));

        if let Some(listener) = listener {
            if let Err(err) = listener.await {
                warn!(error = %err, "event listener terminated abnormally");
            }
        }
        info!("scheduler stopped");
        Ok(())
    }

    /// Starts, waits for SIGINT/SIGTERM/SIGQUIT (Ctrl-C elsewhere), then stops.
    pub async fn run_until_signal(&self) -> Result<(), SchedulerError> {
        self.start().await?;
        if let Err(err) = shutdown::wait_for_shutdown_signal().await {
            warn!(error = %err, "signal registration failed; stopping now");
        } else {
            info!("shutdown signal received");
        }
        self.stop().await
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SchedulerState {
        self.lifecycle.lock().await.state
    }

    /// Number of registered descriptors.
    pub fn task_count(&self) -> usize {
        self.registry().len()
    }

    /// Number of loops that are still running.
    pub async fn running_loops(&self) -> usize {
        self.lifecycle
            .lock()
            .await
            .loops
            .iter()
            .filter(|lp| !lp.join.is_finished())
            .count()
    }

    /// Event bus; call [`Bus::subscribe`] to observe runtime events directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Executor the loops submit to.
    pub fn executor(&self) -> &ExecutorRef {
        &self.executor
    }

    /// Configuration the scheduler was built with.
    pub fn config(&self) -> &SchedulerConfig {
        &self.cfg
    }

    fn registry(&self) -> MutexGuard<'_, Vec<TaskDescriptor>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forwards bus events to the subscriber set until `SchedulerStopped`, then flushes it.
    fn spawn_listener(&self, subscribers: Vec<Arc<dyn Subscribe>>) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(subscribers, self.bus.clone());
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => {
                        set.emit(&ev);
                        if ev.kind == EventKind::SchedulerStopped {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "event listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            set.shutdown().await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        AsyncExecutor, MonotonicClock, SyncTaskFn, TaskError, TaskFn, TaskRef, ThreadPoolExecutor,
    };
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::{self, Instant};

    type Spans = Arc<Mutex<Vec<(Duration, Duration)>>>;

    /// Task that sleeps `work` and records its (start, end) offsets from `origin`.
    fn recording(name: &'static str, work: Duration, origin: Instant, spans: Spans) -> TaskRef {
        TaskFn::arc(name, move || {
            let spans = spans.clone();
            async move {
                let start = origin.elapsed();
                time::sleep(work).await;
                spans.lock().unwrap().push((start, origin.elapsed()));
                Ok(())
            }
        })
    }

    fn counting(name: &'static str, calls: Arc<AtomicUsize>) -> TaskRef {
        TaskFn::arc(name, move || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
    }

    fn secs(spans: &Spans) -> Vec<(u64, u64)> {
        spans
            .lock()
            .unwrap()
            .iter()
            .map(|(s, e)| (s.as_secs(), e.as_secs()))
            .collect()
    }

    fn async_executor() -> ExecutorRef {
        Arc::new(AsyncExecutor::new())
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_rate_submits_at_initial_delay_then_every_interval() {
        let origin = Instant::now();
        let spans = Spans::default();
        let task = recording("rate", Duration::ZERO, origin, spans.clone());
        let descriptor = TaskDescriptor::fixed_rate(task, Duration::from_secs(10))
            .unwrap()
            .with_initial_delay(Duration::from_secs(3));

        let scheduler = TaskScheduler::new(vec![descriptor], async_executor());
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(25)).await;
        scheduler.stop().await.unwrap();

        let starts: Vec<u64> = secs(&spans).into_iter().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![3, 13, 23]);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_rate_allows_overlap_and_stop_drains_it() {
        let origin = Instant::now();
        let spans = Spans::default();
        let task = recording("overlap", Duration::from_secs(15), origin, spans.clone());
        let descriptor = TaskDescriptor::fixed_rate(task, Duration::from_secs(10)).unwrap();

        let scheduler = TaskScheduler::new(vec![descriptor], async_executor());
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(12)).await;
        assert_eq!(scheduler.executor().live(), 2);

        scheduler.stop().await.unwrap();
        assert_eq!(secs(&spans), vec![(0, 15), (10, 25)]);
        assert_eq!(scheduler.executor().live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_waits_for_completion_then_interval() {
        let origin = Instant::now();
        let spans = Spans::default();
        let task = recording("delay", Duration::from_secs(2), origin, spans.clone());
        let descriptor = TaskDescriptor::fixed_delay(task, Duration::from_secs(5)).unwrap();

        let scheduler = TaskScheduler::new(vec![descriptor], async_executor());
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(20)).await;
        scheduler.stop().await.unwrap();

        let spans = secs(&spans);
        assert_eq!(spans, vec![(0, 2), (7, 9), (14, 16)]);
        for pair in spans.windows(2) {
            assert_eq!(pair[1].0 - pair[0].1, 5);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_delay_honours_initial_delay() {
        let origin = Instant::now();
        let spans = Spans::default();
        let task = recording("late-start", Duration::from_secs(1), origin, spans.clone());
        let descriptor = TaskDescriptor::fixed_delay(task, Duration::from_secs(4))
            .unwrap()
            .with_initial_delay(Duration::from_secs(6));

        let scheduler = TaskScheduler::new(vec![descriptor], async_executor());
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(13)).await;
        scheduler.stop().await.unwrap();

        assert_eq!(secs(&spans), vec![(6, 7), (11, 12)]);
    }

    #[tokio::test(start_paused = true)]
    async fn cron_fires_on_calendar_and_ignores_initial_delay() {
        let origin = Instant::now();
        let spans = Spans::default();
        let task = recording("quarterly", Duration::ZERO, origin, spans.clone());
        let descriptor = TaskDescriptor::cron(task, "*/15 * * * *")
            .unwrap()
            .with_initial_delay(Duration::from_secs(3600));

        let clock = MonotonicClock::anchored_at(Utc.with_ymd_and_hms(2026, 1, 1, 10, 7, 0).unwrap());
        let scheduler = TaskScheduler::builder(SchedulerConfig::default())
            .with_executor(async_executor())
            .with_descriptors(vec![descriptor])
            .with_clock(Arc::new(clock))
            .build();

        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(480 + 900 + 60)).await;
        scheduler.stop().await.unwrap();

        let starts: Vec<u64> = secs(&spans).into_iter().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![480, 1380]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_returns_only_after_slow_units_finish() {
        let done = Arc::new(AtomicUsize::new(0));
        let d = done.clone();
        let slow = TaskFn::arc("slow", move || {
            let d = d.clone();
            async move {
                time::sleep(Duration::from_secs(10)).await;
                d.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });
        let descriptor = TaskDescriptor::fixed_rate(slow, Duration::from_secs(1)).unwrap();

        let scheduler = TaskScheduler::new(vec![descriptor], async_executor());
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(scheduler.executor().live(), 5);

        scheduler.stop().await.unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 5);
        assert_eq!(scheduler.executor().live(), 0);
        assert_eq!(scheduler.task_count(), 1);
        assert_eq!(scheduler.running_loops().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn units_can_query_the_scheduler_while_it_stops() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let slot: Arc<std::sync::OnceLock<Arc<TaskScheduler>>> = Arc::default();

        let s = slot.clone();
        let seen_by_task = seen.clone();
        let introspect = TaskFn::arc("introspect", move || {
            let s = s.clone();
            let seen = seen_by_task.clone();
            async move {
                time::sleep(Duration::from_secs(2)).await;
                if let Some(scheduler) = s.get() {
                    let loops = scheduler.running_loops().await;
                    let state = scheduler.state().await;
                    seen.lock().unwrap().push((loops, state));
                }
                Ok(())
            }
        });
        let descriptor = TaskDescriptor::fixed_rate(introspect, Duration::from_secs(10)).unwrap();
        let scheduler = Arc::new(TaskScheduler::new(vec![descriptor], async_executor()));
        assert!(slot.set(Arc::clone(&scheduler)).is_ok());

        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(1)).await;

        let stopped = time::timeout(Duration::from_secs(3600), scheduler.stop()).await;
        assert!(stopped.is_ok(), "stop must not wait on itself");
        assert_eq!(
            seen.lock().unwrap().clone(),
            vec![(0, SchedulerState::Stopped)]
        );
        assert_eq!(scheduler.executor().live(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_and_panicking_tasks_keep_ticking() {
        let failures = Arc::new(AtomicUsize::new(0));
        let f = failures.clone();
        let failing = TaskFn::arc("failing", move || {
            let f = f.clone();
            async move {
                f.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(TaskError::from("always"))
            }
        });
        let panics = Arc::new(AtomicUsize::new(0));
        let p = panics.clone();
        let panicking = SyncTaskFn::arc("panicking", move || -> Result<(), TaskError> {
            p.fetch_add(1, Ordering::SeqCst);
            panic!("every time")
        });

        let scheduler = TaskScheduler::new(
            vec![
                TaskDescriptor::fixed_rate(failing, Duration::from_secs(1)).unwrap(),
                TaskDescriptor::fixed_delay(panicking, Duration::from_secs(1)).unwrap(),
            ],
            async_executor(),
        );
        let mut rx = scheduler.bus().subscribe();
        scheduler.start().await.unwrap();
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(scheduler.running_loops().await, 2);
        scheduler.stop().await.unwrap();

        assert!(failures.load(Ordering::SeqCst) >= 3);
        assert!(panics.load(Ordering::SeqCst) >= 3);

        let mut failed = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::TaskFailed {
                failed += 1;
            }
        }
        assert!(failed >= 6);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_scheduler_spawns_nothing() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cfg = SchedulerConfig {
            enabled: false,
            ..SchedulerConfig::default()
        };
        let scheduler = TaskScheduler::builder(cfg)
            .with_descriptors(vec![
                TaskDescriptor::fixed_rate(counting("idle", calls.clone()), Duration::from_secs(1))
                    .unwrap(),
            ])
            .build();

        scheduler.start().await.unwrap();
        time::sleep(Duration::from_secs(5)).await;

        assert_eq!(scheduler.state().await, SchedulerState::Created);
        assert_eq!(scheduler.running_loops().await, 0);
        assert_eq!(scheduler.task_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        scheduler.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn lifecycle_misuse_is_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let scheduler = TaskScheduler::new(Vec::new(), async_executor());
        assert_eq!(scheduler.state().await, SchedulerState::Created);

        scheduler.stop().await.unwrap();
        assert_eq!(scheduler.state().await, SchedulerState::Created);

        let added = scheduler.discover(vec![
            TaskDescriptor::fixed_delay(counting("a", calls.clone()), Duration::from_secs(1))
                .unwrap(),
            TaskDescriptor::cron(counting("b", calls.clone()), "0 0 * * *").unwrap(),
        ]);
        assert_eq!(added, 2);

        scheduler.start().await.unwrap();
        assert_eq!(scheduler.state().await, SchedulerState::Started);
        assert_eq!(scheduler.running_loops().await, 2);
        assert!(matches!(
            scheduler.start().await,
            Err(SchedulerError::AlreadyStarted)
        ));

        scheduler.stop().await.unwrap();
        scheduler.stop().await.unwrap();
        assert_eq!(scheduler.state().await, SchedulerState::Stopped);
        assert!(matches!(
            scheduler.start().await,
            Err(SchedulerError::AlreadyStopped)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_submission_ends_the_loop() {
        let calls = Arc::new(AtomicUsize::new(0));
        let executor = async_executor();
        let descriptor = TaskDescriptor::fixed_delay(counting("orphan", calls.clone()), Duration::from_secs(1))
            .unwrap()
            .with_initial_delay(Duration::from_secs(1));
        let scheduler = TaskScheduler::new(vec![descriptor], Arc::clone(&executor));
        let mut rx = scheduler.bus().subscribe();

        scheduler.start().await.unwrap();
        executor.stop().await;
        time::sleep(Duration::from_secs(2)).await;

        assert_eq!(scheduler.running_loops().await, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        scheduler.stop().await.unwrap();

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::SubmitRejected));
        assert_eq!(kinds.last(), Some(&EventKind::SchedulerStopped));
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<EventKind>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.kind);
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_have_seen_everything_when_stop_returns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let recorder = Arc::new(Recorder::default());
        let scheduler = TaskScheduler::builder(SchedulerConfig::default())
            .with_descriptors(vec![
                TaskDescriptor::fixed_rate(counting("tick", calls.clone()), Duration::from_secs(1))
                    .unwrap(),
            ])
            .with_subscribers(vec![recorder.clone()])
            .build();

        scheduler.start().await.unwrap();
        time::sleep(Duration::from_millis(1500)).await;
        scheduler.stop().await.unwrap();

        let kinds = recorder.0.lock().unwrap().clone();
        assert!(kinds.contains(&EventKind::SchedulerStarted));
        assert!(kinds.contains(&EventKind::LoopStarted));
        assert!(kinds.contains(&EventKind::TaskCompleted));
        assert!(kinds.contains(&EventKind::LoopStopped));
        assert_eq!(
            &kinds[kinds.len() - 2..],
            &[EventKind::ExecutorDrained, EventKind::SchedulerStopped]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn thread_pool_executor_runs_blocking_tasks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = calls.clone();
        let blocking = SyncTaskFn::arc("blocking", move || -> Result<(), TaskError> {
            std::thread::sleep(Duration::from_millis(5));
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let scheduler = TaskScheduler::new(
            vec![TaskDescriptor::fixed_rate(blocking, Duration::from_millis(20)).unwrap()],
            Arc::new(ThreadPoolExecutor::new(2)),
        );

        scheduler.start().await.unwrap();
        time::sleep(Duration::from_millis(110)).await;
        scheduler.stop().await.unwrap();

        assert!(calls.load(Ordering::SeqCst) >= 2);
        assert_eq!(scheduler.executor().live(), 0);
    }
}
