use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::AppError;
use crate::clock::Clock;
use crate::notify::NotificationBackend;

/// Nominal interval between stopwatch ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 999;

/// Display text before the first tick.
pub const INITIAL_DISPLAY: &str = "00:00:00";

const MILLIS_PER_DAY: u64 = 86_400_000;

/// Command dispatched to the stopwatch service. Wire values are the literal
/// strings `START` and `STOP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Stop,
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(Action::Start),
            "STOP" => Ok(Action::Stop),
            other => Err(AppError::Action(other.to_string())),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Start => write!(f, "START"),
            Action::Stop => write!(f, "STOP"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Idle,
    Running,
    /// Terminal; the service does not restart after a stop.
    Stopped,
}

/// Formats elapsed milliseconds as a zero-padded 24-hour `HH:mm:ss` string.
/// Elapsed time is rendered as a time of day, so it wraps past 24 hours.
pub fn format_elapsed(millis: u64) -> String {
    let secs_of_day = ((millis % MILLIS_PER_DAY) / 1000) as u32;
    chrono::NaiveTime::from_num_seconds_from_midnight_opt(secs_of_day, 0)
        .unwrap_or(chrono::NaiveTime::MIN)
        .format("%H:%M:%S")
        .to_string()
}

/// Length of one tick given two wall-clock samples. The wall clock may step
/// backwards; a negative difference clamps to zero rather than propagating.
pub fn tick_delta(prev_millis: i64, now_millis: i64) -> u64 {
    (now_millis - prev_millis).max(0) as u64
}

/// Tick producer and notification updater handles for one running period.
struct TaskGroup {
    cancel: CancellationToken,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl TaskGroup {
    fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            handles: Vec::new(),
        }
    }

    async fn shutdown(self) {
        self.cancel.cancel();
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

/// Foreground stopwatch: accumulates elapsed wall-clock time once per tick
/// and pushes the formatted value into a persistent notification.
///
/// Elapsed milliseconds are written only by the tick producer and read by
/// display consumers, so an atomic counter suffices. The rendered text flows
/// through a `watch` channel: a single slot where the newest value overwrites
/// any pending one, which gives the updater latest-value-wins delivery.
pub struct StopwatchService {
    state: ServiceState,
    elapsed_ms: Arc<AtomicU64>,
    display_tx: watch::Sender<String>,
    display_rx: watch::Receiver<String>,
    clock: Arc<dyn Clock>,
    backend: Option<Box<dyn NotificationBackend + Send>>,
    tick_interval: Duration,
    tasks: Option<TaskGroup>,
}

impl StopwatchService {
    pub fn new(
        clock: Arc<dyn Clock>,
        backend: Box<dyn NotificationBackend + Send>,
        tick_interval: Duration,
    ) -> Self {
        let (display_tx, display_rx) = watch::channel(INITIAL_DISPLAY.to_string());
        Self {
            state: ServiceState::Idle,
            elapsed_ms: Arc::new(AtomicU64::new(0)),
            display_tx,
            display_rx,
            clock,
            backend: Some(backend),
            tick_interval,
            tasks: None,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Total accumulated milliseconds since the stopwatch started.
    pub fn elapsed_millis(&self) -> u64 {
        self.elapsed_ms.load(Ordering::Relaxed)
    }

    /// Current `HH:mm:ss` projection of the elapsed time.
    pub fn display_text(&self) -> String {
        format_elapsed(self.elapsed_millis())
    }

    /// Observer handle onto the display-text slot.
    pub fn subscribe_display(&self) -> watch::Receiver<String> {
        self.display_rx.clone()
    }

    pub async fn dispatch(&mut self, action: Action) {
        debug!(action = %action, state = ?self.state, "dispatching command");
        match action {
            Action::Start => self.start(),
            Action::Stop => self.stop().await,
        }
    }

    fn start(&mut self) {
        match self.state {
            ServiceState::Running => {
                debug!("start ignored; stopwatch already running");
                return;
            }
            ServiceState::Stopped => {
                warn!("start ignored; service already stopped");
                return;
            }
            ServiceState::Idle => {}
        }
        let Some(backend) = self.backend.take() else {
            warn!("start ignored; notification backend already consumed");
            return;
        };

        let mut group = TaskGroup::new();

        // Tick producer: samples the clock, accumulates, projects display text.
        let cancel = group.cancel.child_token();
        let clock = Arc::clone(&self.clock);
        let elapsed = Arc::clone(&self.elapsed_ms);
        let display = self.display_tx.clone();
        let interval = self.tick_interval;
        group.handles.push(tokio::spawn(async move {
            run_tick_producer(clock, cancel, interval, elapsed, display).await;
        }));

        // Notification updater: re-issues the notification on display change.
        let cancel = group.cancel.child_token();
        let display = self.display_rx.clone();
        group.handles.push(tokio::spawn(async move {
            run_updater(display, backend, cancel).await;
        }));

        self.tasks = Some(group);
        self.state = ServiceState::Running;
        info!("stopwatch started");
    }

    /// Cancels the task group and waits for both tasks to finish; the
    /// updater closes the notification on its way out.
    pub async fn stop(&mut self) {
        if let Some(group) = self.tasks.take() {
            group.shutdown().await;
        }
        if self.state != ServiceState::Stopped {
            self.state = ServiceState::Stopped;
            info!(
                elapsed_ms = self.elapsed_ms.load(Ordering::Relaxed),
                "stopwatch stopped"
            );
        }
    }
}

async fn run_tick_producer(
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    interval: Duration,
    elapsed: Arc<AtomicU64>,
    display: watch::Sender<String>,
) {
    let mut prev = clock.now_millis();
    while !cancel.is_cancelled() {
        let now = clock.now_millis();
        let delta = tick_delta(prev, now);
        prev = now;
        let total = elapsed.fetch_add(delta, Ordering::Relaxed) + delta;

        // Only wake observers when the rendered second actually changed.
        display.send_if_modified(|current| {
            let next = format_elapsed(total);
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!("tick producer exited");
}

async fn run_updater(
    mut display: watch::Receiver<String>,
    mut backend: Box<dyn NotificationBackend + Send>,
    cancel: CancellationToken,
) {
    let initial = display.borrow_and_update().clone();
    backend.show(&initial).await;
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = display.changed() => {
                if changed.is_err() {
                    break;
                }
                // borrow_and_update yields only the newest value; anything
                // published while the previous push was in flight is skipped.
                let text = display.borrow_and_update().clone();
                backend.update(&text).await;
            }
        }
    }
    backend.close().await;
    debug!("notification updater exited");
}
