//! Cron-driven scheduler for travel ticks.
//!
//! `start()` runs one tick immediately and then arms a background task that
//! sleeps until the next cron occurrence (top of every hour by default) and
//! runs the next tick. Every tick, first or recurring, goes through
//! [`execute_tick`] and is awaited before the next sleep begins, so ticks
//! never overlap. `stop()` only disarms the timer; a tick already running
//! finishes normally.

use chrono::{DateTime, Local, TimeZone};
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::llm::CompletionModel;
use crate::monitor::change::{ChangeEvent, MonitorState};
use crate::monitor::{report, TravelMonitor};
use crate::weather::WeatherSource;

/// Errors from scheduler operations.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("Invalid cron expression: {0}")]
    CronParse(String),
    #[error("Schedule has no upcoming occurrence")]
    NoUpcoming,
}

type Result<T> = std::result::Result<T, SchedulerError>;

/// Normalise a cron expression to 6-field format.
///
/// The `cron` crate expects 6 fields (sec min hr dom month dow). Standard
/// 5-field expressions get "0 " prepended to pin the seconds to zero.
fn normalize_cron_expr(expr: &str) -> String {
    let trimmed = expr.trim();
    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() == 5 {
        format!("0 {}", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Parse a 5- or 6-field cron expression.
pub fn parse_schedule(expr: &str) -> Result<cron::Schedule> {
    cron::Schedule::from_str(&normalize_cron_expr(expr))
        .map_err(|e| SchedulerError::CronParse(format!("{}: {}", expr, e)))
}

/// Next occurrence of `schedule` strictly after `after`.
pub fn next_run_after<Tz: TimeZone>(schedule: &cron::Schedule, after: &DateTime<Tz>) -> Result<DateTime<Tz>> {
    schedule.after(after).next().ok_or(SchedulerError::NoUpcoming)
}

/// Run one tick and feed its result through change detection.
///
/// Tick errors are logged here and never propagate; `None` means the tick
/// ended early and the stored recommendation was left alone.
pub async fn execute_tick<M, W>(
    monitor: &TravelMonitor<M, W>,
    state: &Mutex<MonitorState>,
) -> Option<ChangeEvent>
where
    M: CompletionModel,
    W: WeatherSource,
{
    log::info!(
        "[Monitor] Checking travel recommendations at {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    match monitor.run_tick().await {
        Ok(outcome) => {
            let event = state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .observe(outcome.recommendation, outcome.activities);
            report::print(&event);
            Some(event)
        }
        Err(e) => {
            log::error!("[Monitor] Error during recommendation check: {}", e);
            None
        }
    }
}

/// Owned handle to the armed recurring trigger.
pub struct ScheduleHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    /// Disarm the trigger. Safe to call repeatedly.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    /// Cancel and wait for the timer task, including any tick in flight.
    pub async fn shutdown(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            log::error!("[Scheduler] timer task ended abnormally: {}", e);
        }
    }
}

/// Background loop: sleep until the next occurrence, run a tick, repeat.
async fn run_timer<M, W>(
    monitor: Arc<TravelMonitor<M, W>>,
    state: Arc<Mutex<MonitorState>>,
    schedule: cron::Schedule,
    mut cancel: watch::Receiver<bool>,
) where
    M: CompletionModel,
    W: WeatherSource,
{
    loop {
        if *cancel.borrow_and_update() {
            break;
        }

        let now = Local::now();
        let next = match next_run_after(&schedule, &now) {
            Ok(next) => next,
            Err(e) => {
                log::error!("[Scheduler] {}, disarming", e);
                break;
            }
        };
        let wait = (next - now).to_std().unwrap_or_default();
        log::debug!("[Scheduler] next tick at {}", next.format("%Y-%m-%d %H:%M:%S"));

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = cancel.changed() => {
                log::debug!("[Scheduler] cancelled while waiting");
                break;
            }
        }

        execute_tick(monitor.as_ref(), state.as_ref()).await;
    }
}

enum SchedulerState {
    Stopped,
    Running(ScheduleHandle),
}

/// Drives ticks on a cron schedule. Two states: STOPPED and RUNNING.
pub struct Scheduler<M, W> {
    monitor: Arc<TravelMonitor<M, W>>,
    state: Arc<Mutex<MonitorState>>,
    schedule: cron::Schedule,
    expr: String,
    run_state: SchedulerState,
}

impl<M: CompletionModel, W: WeatherSource> Scheduler<M, W> {
    /// Create a stopped scheduler with empty monitor state.
    pub fn new(monitor: TravelMonitor<M, W>, cron_expr: &str) -> Result<Self> {
        Self::with_state(monitor, cron_expr, MonitorState::new())
    }

    /// Create a stopped scheduler starting from a given monitor state.
    pub fn with_state(
        monitor: TravelMonitor<M, W>,
        cron_expr: &str,
        state: MonitorState,
    ) -> Result<Self> {
        Ok(Self {
            monitor: Arc::new(monitor),
            state: Arc::new(Mutex::new(state)),
            schedule: parse_schedule(cron_expr)?,
            expr: cron_expr.trim().to_string(),
            run_state: SchedulerState::Stopped,
        })
    }

    pub fn is_running(&self) -> bool {
        matches!(self.run_state, SchedulerState::Running(_))
    }

    /// Snapshot of the change-detection state.
    pub fn state(&self) -> MonitorState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Next time the recurring trigger would fire.
    pub fn next_run(&self) -> Result<DateTime<Local>> {
        next_run_after(&self.schedule, &Local::now())
    }

    /// Run one tick outside the schedule, through the same path as scheduled ticks.
    pub async fn run_once(&self) -> Option<ChangeEvent> {
        execute_tick(self.monitor.as_ref(), self.state.as_ref()).await
    }

    /// STOPPED → RUNNING: run the first tick now, then arm the recurring trigger.
    ///
    /// Returns the first tick's event (`None` if it failed). Calling this while
    /// already running does nothing and returns `None`.
    pub async fn start(&mut self) -> Option<ChangeEvent> {
        if self.is_running() {
            log::warn!("[Scheduler] start() called while already running, ignoring");
            return None;
        }

        log::info!("[Scheduler] Starting travel monitoring (schedule: {})", self.expr);
        let first = self.run_once().await;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let task = tokio::spawn(run_timer(
            Arc::clone(&self.monitor),
            Arc::clone(&self.state),
            self.schedule.clone(),
            cancel_rx,
        ));
        self.run_state = SchedulerState::Running(ScheduleHandle {
            cancel: cancel_tx,
            task,
        });

        if let Ok(next) = self.next_run() {
            log::info!("[Scheduler] next tick at {}", next.format("%Y-%m-%d %H:%M:%S"));
        }
        first
    }

    fn take_handle(&mut self) -> Option<ScheduleHandle> {
        match std::mem::replace(&mut self.run_state, SchedulerState::Stopped) {
            SchedulerState::Running(handle) => Some(handle),
            SchedulerState::Stopped => None,
        }
    }

    /// RUNNING → STOPPED. No-op when already stopped. Does not wait for an
    /// in-flight tick; it finishes in the background.
    pub fn stop(&mut self) -> bool {
        match self.take_handle() {
            Some(handle) => {
                handle.cancel();
                log::info!("[Scheduler] Travel monitoring stopped");
                true
            }
            None => false,
        }
    }

    /// Like [`stop`](Self::stop), but waits for any in-flight tick to finish.
    pub async fn stop_and_wait(&mut self) -> bool {
        match self.take_handle() {
            Some(handle) => {
                handle.shutdown().await;
                log::info!("[Scheduler] Travel monitoring stopped");
                true
            }
            None => false,
        }
    }
}
