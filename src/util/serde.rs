//! Scalar types shared across the ledger, the protocol and the report.

/// A simulated hour of the operating window (e.g. `7` for 07:00).
pub type Hour = u32;

/// Number of persons covered by one reservation.
pub type PartySize = u32;

/// Sequential identifier assigned to every logged admission decision.
pub type ReservationId = u64;
