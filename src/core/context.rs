//! Controller context shared by every component.

use crate::config::ParkConfig;
use crate::core::audit::ReservationLog;
use crate::core::directory::AgentDirectory;
use crate::core::ledger::CapacityLedger;

/// Owns the ledger, the reservation log and the agent directory for one run.
///
/// Each of the three carries its own lock. Components take them one at a
/// time and never hold two at once.
pub struct ControllerContext {
    /// Validated configuration the context was built from.
    pub config: ParkConfig,
    /// Hourly capacity counters and the simulated clock.
    pub ledger: CapacityLedger,
    /// Decision and clock audit trail.
    pub log: ReservationLog,
    /// Registered agents.
    pub directory: AgentDirectory,
}

impl ControllerContext {
    /// Build a fresh context. `config` is expected to be validated already.
    pub fn new(config: ParkConfig) -> Self {
        let ledger = CapacityLedger::new(config.start_hour, config.end_hour, config.global_max_capacity);
        Self {
            config,
            ledger,
            log: ReservationLog::new(),
            directory: AgentDirectory::new(),
        }
    }
}
