//! Admission-control core: ledger, decisions, clock, audit trail and report.

pub mod audit;
pub mod clock;
pub mod context;
pub mod directory;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod report;
pub mod stats;

pub use audit::{LogEntry, Reservation, ReservationLog, ReservationStatus};
pub use clock::{ClockDriver, ClockState, StopCause, StopSignal};
pub use context::ControllerContext;
pub use directory::{AgentDirectory, AgentRecord, Registration};
pub use engine::{AdmissionEngine, Decision, RejectReason, ReservationRequest};
pub use error::{AppResult, ControllerError};
pub use ledger::{CapacityLedger, HourAdvance, HourSlot, LedgerGuard};
pub use report::{HourSummary, Report, ReportGenerator};
pub use stats::GatewayStats;
