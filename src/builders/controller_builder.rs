//! Build a [`Controller`] from a [`ParkConfig`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::ParkConfig;
use crate::core::context::ControllerContext;
use crate::core::error::ControllerError;
use crate::runtime::controller::Controller;

/// Validates configuration and assembles the controller context.
#[derive(Debug, Clone)]
pub struct ControllerBuilder {
    config: ParkConfig,
    tick: Option<Duration>,
}

impl ControllerBuilder {
    /// Start from `config`.
    pub const fn new(config: ParkConfig) -> Self {
        Self { config, tick: None }
    }

    /// Override the real-time length of one simulated hour.
    ///
    /// Intended for tests and demos that cannot wait whole seconds per hour.
    #[must_use]
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = Some(tick);
        self
    }

    /// Validate the configuration and build the controller.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if validation fails or the tick override is zero.
    pub fn build(self) -> Result<Controller, ControllerError> {
        self.config.validate().map_err(ControllerError::InvalidConfig)?;
        let tick = self.tick.unwrap_or_else(|| self.config.tick_interval());
        if tick.is_zero() {
            return Err(ControllerError::InvalidConfig("tick interval must be greater than 0".into()));
        }
        let ctx = Arc::new(ControllerContext::new(self.config));
        Ok(Controller::new(ctx, tick))
    }
}
