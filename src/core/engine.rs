//! Admission decisions.
//!
//! The engine evaluates a [`ReservationRequest`] against the ledger in a
//! fixed order, each branch terminal:
//!
//! 1. requested hour after `end_hour` → rejected (`out_of_hours`)
//! 2. empty party → rejected (`invalid_party`); party larger than the
//!    global maximum → rejected (`over_capacity`)
//! 3. requested hour already past → earliest alternative from the current
//!    hour, else rejected (`expired`)
//! 4. otherwise the requested hour, else the earliest alternative from the
//!    current hour, else rejected (`no_availability`)
//!
//! Branches 3 and 4 run under one ledger guard, so the hour they read and
//! the reservation they commit belong to the same critical section.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::audit::ReservationLog;
use crate::core::context::ControllerContext;
use crate::core::ledger::CapacityLedger;
use crate::util::serde::{Hour, PartySize};

/// A reservation request as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    /// Family the reservation is for.
    pub family: String,
    /// Agent that submitted the request.
    pub agent: String,
    /// Hour the family asked to enter.
    pub requested_hour: Hour,
    /// Number of persons.
    pub party_size: PartySize,
}

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Requested hour is after the park closes.
    OutOfHours,
    /// Party has no persons.
    InvalidParty,
    /// Party is larger than the park's total capacity.
    OverCapacity,
    /// Requested hour has passed and nothing later fits.
    Expired,
    /// Neither the requested hour nor any later hour fits.
    NoAvailability,
}

impl RejectReason {
    /// Wire name of the reason.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OutOfHours => "out_of_hours",
            Self::InvalidParty => "invalid_party",
            Self::OverCapacity => "over_capacity",
            Self::Expired => "expired",
            Self::NoAvailability => "no_availability",
        }
    }

    /// Parse a wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "out_of_hours" => Some(Self::OutOfHours),
            "invalid_party" => Some(Self::InvalidParty),
            "over_capacity" => Some(Self::OverCapacity),
            "expired" => Some(Self::Expired),
            "no_availability" => Some(Self::NoAvailability),
            _ => None,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Decision {
    /// Admitted at the requested hour.
    Accepted {
        /// Entry hour.
        hour: Hour,
        /// Persons admitted.
        party: PartySize,
    },
    /// Admitted at a different hour.
    Rescheduled {
        /// Hour originally asked for.
        requested: Hour,
        /// Hour actually reserved.
        assigned: Hour,
        /// Persons admitted.
        party: PartySize,
    },
    /// Not admitted.
    Rejected {
        /// Reason for the rejection.
        reason: RejectReason,
    },
}

impl Decision {
    /// Entry hour reserved by this decision, if any.
    pub const fn entry_hour(&self) -> Option<Hour> {
        match *self {
            Self::Accepted { hour, .. } => Some(hour),
            Self::Rescheduled { assigned, .. } => Some(assigned),
            Self::Rejected { .. } => None,
        }
    }

    /// Whether capacity was committed.
    pub const fn is_admitted(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }
}

/// Decision procedure over the shared ledger and reservation log.
pub struct AdmissionEngine<'a> {
    ledger: &'a CapacityLedger,
    log: &'a ReservationLog,
    end_hour: Hour,
    global_max_capacity: u32,
}

impl<'a> AdmissionEngine<'a> {
    /// Borrow the engine's collaborators from the controller context.
    pub fn new(ctx: &'a ControllerContext) -> Self {
        Self {
            ledger: &ctx.ledger,
            log: &ctx.log,
            end_hour: ctx.config.end_hour,
            global_max_capacity: ctx.config.global_max_capacity,
        }
    }

    /// Decide `request` and commit any reservation to the ledger.
    pub fn decide(&self, request: &ReservationRequest) -> Decision {
        let requested = request.requested_hour;
        let party = request.party_size;

        if requested > self.end_hour {
            return Decision::Rejected {
                reason: RejectReason::OutOfHours,
            };
        }
        if party == 0 {
            return Decision::Rejected {
                reason: RejectReason::InvalidParty,
            };
        }
        if party > self.global_max_capacity {
            return Decision::Rejected {
                reason: RejectReason::OverCapacity,
            };
        }

        let mut ledger = self.ledger.lock();
        let now = ledger.current_hour();

        if requested < now {
            return match ledger.find_alternative(now, party, self.end_hour) {
                Some(assigned) => Decision::Rescheduled {
                    requested,
                    assigned,
                    party,
                },
                None => Decision::Rejected {
                    reason: RejectReason::Expired,
                },
            };
        }

        if ledger.try_reserve(requested, party) {
            return Decision::Accepted {
                hour: requested,
                party,
            };
        }

        match ledger.find_alternative(now, party, self.end_hour) {
            Some(assigned) => Decision::Rescheduled {
                requested,
                assigned,
                party,
            },
            None => Decision::Rejected {
                reason: RejectReason::NoAvailability,
            },
        }
    }

    /// Decide `request` and append the outcome to the reservation log.
    ///
    /// The ledger lock is released before the log lock is taken.
    pub fn admit(&self, request: ReservationRequest) -> Decision {
        let decision = self.decide(&request);
        tracing::debug!(
            family = %request.family,
            agent = %request.agent,
            requested_hour = request.requested_hour,
            party = request.party_size,
            ?decision,
            "admission decided"
        );
        self.log.record_decision(request, decision);
        decision
    }
}
