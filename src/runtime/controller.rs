//! Controller lifecycle: spawn the clock and the gateway, join them, report.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};
use tracing::info;

use crate::core::clock::{ClockDriver, StopCause, StopSignal};
use crate::core::context::ControllerContext;
use crate::core::error::{AppResult, ControllerError};
use crate::core::report::{Report, ReportGenerator};
use crate::core::stats::GatewayStats;
use crate::infra::mailbox::Mailbox;
use crate::infra::queue::InboundFrame;
use crate::runtime::gateway::RequestGateway;

/// A configured controller that has not started yet.
///
/// Built by [`crate::builders::ControllerBuilder`], which validates the
/// configuration first.
pub struct Controller {
    ctx: Arc<ControllerContext>,
    tick: Duration,
}

impl Controller {
    pub(crate) const fn new(ctx: Arc<ControllerContext>, tick: Duration) -> Self {
        Self { ctx, tick }
    }

    /// Shared state the controller will run over.
    pub fn context(&self) -> Arc<ControllerContext> {
        Arc::clone(&self.ctx)
    }

    /// Real-time length of one simulated hour.
    pub const fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// Spawn the `clock` and `gateway` threads.
    ///
    /// The gateway serves `inbound` and answers through `mailbox` until the
    /// clock stops, whichever way it stops.
    ///
    /// # Errors
    ///
    /// `ThreadSpawn` if either thread cannot be started. If the gateway
    /// fails to spawn, the already running clock is stopped and joined.
    pub fn start<M>(self, inbound: Receiver<InboundFrame>, mailbox: M) -> Result<ControllerHandle, ControllerError>
    where
        M: Mailbox + 'static,
    {
        let stop = StopSignal::new();
        let (shutdown_tx, shutdown_rx) = unbounded::<StopCause>();

        let driver = ClockDriver::new(Arc::clone(&self.ctx), self.tick, stop.clone()).with_shutdown(shutdown_tx);
        let clock = thread::Builder::new()
            .name("clock".into())
            .spawn(move || driver.run())
            .map_err(|source| ControllerError::ThreadSpawn { name: "clock", source })?;

        let gateway = RequestGateway::new(Arc::clone(&self.ctx), mailbox);
        let spawned = thread::Builder::new()
            .name("gateway".into())
            .spawn(move || gateway.run(&inbound, &shutdown_rx));
        let gateway = match spawned {
            Ok(handle) => handle,
            Err(source) => {
                stop.request();
                let _ = clock.join();
                return Err(ControllerError::ThreadSpawn { name: "gateway", source });
            }
        };

        info!(
            start_hour = self.ctx.config.start_hour,
            end_hour = self.ctx.config.end_hour,
            capacity = self.ctx.config.global_max_capacity,
            tick_ms = self.tick.as_millis(),
            "controller started"
        );

        Ok(ControllerHandle {
            ctx: self.ctx,
            stop,
            clock,
            gateway,
        })
    }
}

/// Handle to a running controller.
pub struct ControllerHandle {
    ctx: Arc<ControllerContext>,
    stop: StopSignal,
    clock: JoinHandle<StopCause>,
    gateway: JoinHandle<GatewayStats>,
}

impl ControllerHandle {
    /// Shared state of the running controller.
    pub fn context(&self) -> Arc<ControllerContext> {
        Arc::clone(&self.ctx)
    }

    /// Another handle to the stop signal, e.g. for a signal listener.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Ask the clock to stop at its next wake-up.
    pub fn request_stop(&self) {
        self.stop.request();
    }

    /// Whether both threads have exited.
    pub fn is_finished(&self) -> bool {
        self.clock.is_finished() && self.gateway.is_finished()
    }

    /// Wait for the run to end and build the final report.
    ///
    /// # Errors
    ///
    /// `ThreadPanicked` if the clock or the gateway panicked.
    pub fn wait(self) -> AppResult<Report> {
        let cause = self
            .clock
            .join()
            .map_err(|_| ControllerError::ThreadPanicked("clock"))?;
        let stats = self
            .gateway
            .join()
            .map_err(|_| ControllerError::ThreadPanicked("gateway"))?;

        info!(?cause, received = stats.received, "controller stopped");
        Ok(ReportGenerator::generate(&self.ctx, cause, Some(stats)))
    }
}
