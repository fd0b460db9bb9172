//! Append-only reservation log.
//!
//! Holds every admission decision and every clock advance for the run.
//! Entries are never removed or edited; the report reads them at shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::engine::{Decision, RejectReason, ReservationRequest};
use crate::core::ledger::HourAdvance;
use crate::util::clock::now_ms;
use crate::util::serde::{Hour, PartySize, ReservationId};

/// Final status of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Admitted at the requested hour.
    Accepted,
    /// Admitted at another hour.
    Rescheduled,
    /// Not admitted.
    Rejected(RejectReason),
}

/// One logged admission decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Sequence number within the run, starting at 1.
    pub id: ReservationId,
    /// Family name.
    pub family: String,
    /// Agent that submitted the request.
    pub agent: String,
    /// Hour asked for.
    pub requested_hour: Hour,
    /// Hour reserved; `None` when rejected.
    pub entry_hour: Option<Hour>,
    /// Number of persons.
    pub party_size: PartySize,
    /// Outcome.
    pub status: ReservationStatus,
    /// Wall-clock time of the decision.
    pub created_at_ms: u64,
}

/// Entry in the reservation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    /// An admission decision.
    Decision(Reservation),
    /// A simulated clock advance.
    HourAdvanced(HourAdvance),
}

/// Append-only record of decisions and clock advances.
pub struct ReservationLog {
    entries: Mutex<Vec<LogEntry>>,
    next_id: AtomicU64,
}

impl Default for ReservationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ReservationLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Append the outcome of `request` and return the stored reservation.
    pub fn record_decision(&self, request: ReservationRequest, decision: Decision) -> Reservation {
        let status = match decision {
            Decision::Accepted { .. } => ReservationStatus::Accepted,
            Decision::Rescheduled { .. } => ReservationStatus::Rescheduled,
            Decision::Rejected { reason } => ReservationStatus::Rejected(reason),
        };
        let reservation = Reservation {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            family: request.family,
            agent: request.agent,
            requested_hour: request.requested_hour,
            entry_hour: decision.entry_hour(),
            party_size: request.party_size,
            status,
            created_at_ms: now_ms(),
        };
        self.entries
            .lock()
            .push(LogEntry::Decision(reservation.clone()));
        reservation
    }

    /// Append a clock advance.
    pub fn record_advance(&self, advance: HourAdvance) {
        self.entries.lock().push(LogEntry::HourAdvanced(advance));
    }

    /// Snapshot of every entry, in append order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Snapshot of the logged decisions.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::Decision(r) => Some(r.clone()),
                LogEntry::HourAdvanced(_) => None,
            })
            .collect()
    }

    /// Snapshot of the logged clock advances.
    pub fn hour_advances(&self) -> Vec<HourAdvance> {
        self.entries
            .lock()
            .iter()
            .filter_map(|entry| match entry {
                LogEntry::HourAdvanced(a) => Some(*a),
                LogEntry::Decision(_) => None,
            })
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been logged yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
