use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::simulator::{InputSimulator, SimulatorError};

pub const SPEED_MIN: f64 = 1.0;
pub const SPEED_MAX: f64 = 20.0;

const MIN_INTERVAL_SECS: f64 = 0.01;
// Lets the user release the Start button before the first synthetic click
// lands, so the clicker cannot click its own window.
const SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Seconds between clicks for a given speed, floored so the loop can never
/// spin without sleeping.
pub fn click_interval(speed_cps: f64) -> Duration {
    let cps = speed_cps.max(0.1);
    Duration::from_secs_f64((1.0 / cps).max(MIN_INTERVAL_SECS))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
}

/// Terminal report from a click loop, drained on the UI thread.
pub enum LoopEvent {
    /// The loop observed its stop flag and exited normally.
    Idle,
    /// A click was refused; the loop has already terminated.
    ClickFailed(SimulatorError),
}

pub struct AutoClicker {
    simulator: Arc<dyn InputSimulator>,
    run_state: RunState,
    stop_signal: Arc<AtomicBool>,
    status: String,
    events_tx: Sender<LoopEvent>,
    events_rx: Receiver<LoopEvent>,
}

impl AutoClicker {
    pub fn new(simulator: Arc<dyn InputSimulator>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            simulator,
            run_state: RunState::Idle,
            stop_signal: Arc::new(AtomicBool::new(false)),
            status: "Idle".to_string(),
            events_tx,
            events_rx,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Spawns the click loop at the given speed. No-op while already
    /// running, so at most one loop is ever live.
    ///
    /// Each run gets a fresh stop flag; a superseded loop keeps its own
    /// already-set flag and winds down on its own schedule.
    pub fn start(&mut self, speed_cps: f64) {
        if self.run_state == RunState::Running {
            return;
        }

        let interval = click_interval(speed_cps);
        self.stop_signal = Arc::new(AtomicBool::new(false));

        let simulator = Arc::clone(&self.simulator);
        let stop = Arc::clone(&self.stop_signal);
        let events = self.events_tx.clone();
        thread::spawn(move || run_click_loop(simulator, interval, SETTLE_DELAY, stop, events));

        self.run_state = RunState::Running;
        self.status = "Running... (move mouse to target position)".to_string();
        info!(interval_ms = interval.as_millis() as u64, "click loop started");
    }

    /// Requests cancellation and flips back to Idle immediately. The loop
    /// observes the flag within one interval and reports its own Idle,
    /// which `pump` applies later.
    pub fn stop(&mut self) {
        if self.run_state == RunState::Idle {
            return;
        }

        self.stop_signal.store(true, Ordering::Relaxed);
        self.run_state = RunState::Idle;
        self.status = "Stopped".to_string();
        info!("stop requested");
    }

    /// Drains loop reports. Must only be called from the UI thread; it is
    /// the sole place loop-originated state reaches the controller.
    pub fn pump(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                LoopEvent::Idle => {
                    // A report from a superseded loop must not relabel a
                    // newer run.
                    if self.run_state == RunState::Idle {
                        self.status = "Idle".to_string();
                    }
                }
                LoopEvent::ClickFailed(err) => {
                    warn!(%err, "click loop aborted");
                    self.run_state = RunState::Idle;
                    self.status = format!("Click error: {err}");
                }
            }
        }
    }
}

/// Body of the background click loop.
///
/// Waits out the settle delay, then clicks and sleeps until the stop flag
/// is set. A refused click ends the loop with a `ClickFailed` report; a
/// normal exit reports `Idle`. Send failures are ignored — the receiver is
/// gone only during shutdown.
fn run_click_loop(
    simulator: Arc<dyn InputSimulator>,
    interval: Duration,
    settle: Duration,
    stop: Arc<AtomicBool>,
    events: Sender<LoopEvent>,
) {
    thread::sleep(settle);
    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if let Err(err) = simulator.click() {
            let _ = events.send(LoopEvent::ClickFailed(err));
            return;
        }
        thread::sleep(interval);
    }
    let _ = events.send(LoopEvent::Idle);
}
