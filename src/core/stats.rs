//! Request gateway counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Snapshot of gateway activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayStats {
    /// Frames taken off the inbound queue.
    pub received: u64,
    /// Registration messages handled.
    pub registrations: u64,
    /// Reservation messages handled.
    pub reservations: u64,
    /// Frames dropped because they failed to decode.
    pub malformed: u64,
    /// Responses written to a requester.
    pub delivered: u64,
    /// Responses abandoned because the requester channel failed.
    pub delivery_failures: u64,
}

/// Internal counters for gateway statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct GatewayCounters {
    pub received: AtomicU64,
    pub registrations: AtomicU64,
    pub reservations: AtomicU64,
    pub malformed: AtomicU64,
    pub delivered: AtomicU64,
    pub delivery_failures: AtomicU64,
}

impl GatewayCounters {
    pub fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> GatewayStats {
        GatewayStats {
            received: self.received.load(Ordering::Relaxed),
            registrations: self.registrations.load(Ordering::Relaxed),
            reservations: self.reservations.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
        }
    }
}
