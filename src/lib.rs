//! # Park Admission
//!
//! Admission control for a theme park running on a simulated clock.
//!
//! Booking agents register over a named pipe and submit reservation
//! requests for families. Each admitted party stays two consecutive hours,
//! and no hour may ever hold more persons than the configured maximum. The
//! controller accepts a request at the hour asked for when it fits,
//! reschedules it to the earliest later hour that does, or rejects it with a
//! reason. A clock thread advances the simulated hour on a fixed real-time
//! interval, and a final report summarizes the day when the clock stops.
//!
//! ## Components
//!
//! - [`core::CapacityLedger`]: per-hour occupancy and the simulated hour,
//!   behind one lock so every decision is a single critical section
//! - [`core::AdmissionEngine`]: the accept / reschedule / reject procedure
//! - [`core::ClockDriver`]: ticks the hour until end of day or a stop request
//! - [`runtime::RequestGateway`]: decodes frames, dispatches, answers
//! - [`core::ReportGenerator`]: end-of-run statistics
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use park_admission::builders::ControllerBuilder;
//! use park_admission::config::ParkConfig;
//! use park_admission::infra::{InMemoryMailbox, InboundQueue};
//!
//! # fn main() -> anyhow::Result<()> {
//! let controller = ControllerBuilder::new(ParkConfig::default())
//!     .with_tick_interval(Duration::from_millis(50))
//!     .build()?;
//!
//! let queue = InboundQueue::default();
//! let mailbox = InMemoryMailbox::new();
//! let handle = controller.start(queue.receiver(), mailbox.clone())?;
//!
//! queue.push("REGISTER,agent-1,replies-1")?;
//! queue.push("RESERVE,agent-1,replies-1,Garcia,8,4")?;
//!
//! let report = handle.wait()?;
//! println!("{report}");
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Ledger, admission decisions, clock, audit trail and report.
pub mod core;
/// Controller configuration.
pub mod config;
/// Builders that assemble a controller from configuration.
pub mod builders;
/// Inbound queue and response delivery backends.
pub mod infra;
/// Wire messages and response lines.
pub mod protocol;
/// Controller threads and lifecycle.
pub mod runtime;
/// Shared utilities.
pub mod util;
