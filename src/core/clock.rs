//! Simulated clock driver.
//!
//! One tick of real time advances the simulated hour by one. The driver
//! starts `Running` and ends `Stopped` either when the hour reaches
//! `end_hour` or when a stop is requested; `Stopped` is terminal.
//!
//! [`ClockDriver::step`] performs a single tick without sleeping, which is
//! what tests drive directly. [`ClockDriver::run`] sleeps on a condition
//! variable between ticks so a stop request wakes it immediately.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::context::ControllerContext;

/// Lifecycle of the clock driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    /// Ticking.
    Running,
    /// Finished; no further ticks.
    Stopped,
}

/// Why the clock stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// The simulated hour reached `end_hour`.
    EndOfDay,
    /// An external stop was requested.
    Requested,
}

/// Shared stop flag with wake-up support.
///
/// Cloning yields another handle to the same flag.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every waiter.
    pub fn request(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock() = true;
        condvar.notify_all();
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Sleep for up to `timeout`, returning early if a stop is requested.
    /// Returns the flag value on wake-up.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (flag, condvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut requested = flag.lock();
        while !*requested {
            if condvar.wait_until(&mut requested, deadline).timed_out() {
                break;
            }
        }
        *requested
    }
}

/// Advances the shared simulated hour on a fixed real-time interval.
pub struct ClockDriver {
    ctx: Arc<ControllerContext>,
    interval: Duration,
    stop: StopSignal,
    shutdown: Option<Sender<StopCause>>,
    state: ClockState,
    cause: Option<StopCause>,
}

impl ClockDriver {
    /// Create a running driver over `ctx`.
    pub fn new(ctx: Arc<ControllerContext>, interval: Duration, stop: StopSignal) -> Self {
        Self {
            ctx,
            interval,
            stop,
            shutdown: None,
            state: ClockState::Running,
            cause: None,
        }
    }

    /// Notify `shutdown` with the stop cause when the driver stops.
    #[must_use]
    pub fn with_shutdown(mut self, shutdown: Sender<StopCause>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ClockState {
        self.state
    }

    /// Why the driver stopped, once it has.
    pub const fn stop_cause(&self) -> Option<StopCause> {
        self.cause
    }

    /// Perform one tick.
    pub fn step(&mut self) -> ClockState {
        if self.state == ClockState::Stopped {
            return self.state;
        }
        if self.stop.is_requested() {
            info!("clock stop requested");
            self.finish(StopCause::Requested);
            return self.state;
        }

        let end_hour = self.ctx.ledger.end_hour();
        match self.ctx.ledger.advance_hour() {
            Some(advance) => {
                info!(
                    hour = advance.to,
                    entering = advance.entering,
                    leaving = advance.leaving,
                    "simulated hour advanced"
                );
                self.ctx.log.record_advance(advance);
                if advance.to >= end_hour {
                    self.finish(StopCause::EndOfDay);
                }
            }
            None => self.finish(StopCause::EndOfDay),
        }
        self.state
    }

    /// Tick until stopped, sleeping `interval` between ticks.
    pub fn run(mut self) -> StopCause {
        debug!(interval_ms = self.interval.as_millis(), "clock driver started");
        while self.state == ClockState::Running {
            self.stop.wait_timeout(self.interval);
            self.step();
        }
        self.cause.unwrap_or(StopCause::Requested)
    }

    fn finish(&mut self, cause: StopCause) {
        self.state = ClockState::Stopped;
        self.cause = Some(cause);
        info!(?cause, hour = self.ctx.ledger.current_hour(), "clock stopped");
        if let Some(shutdown) = self.shutdown.take() {
            // the receiver may already be gone during teardown
            let _ = shutdown.send(cause);
        }
    }
}
