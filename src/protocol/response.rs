//! Response lines sent back to requesters.
//!
//! ```text
//! 7
//! ACCEPTED hour=7 party=6
//! RESCHEDULED requested=7 assigned=8 party=6
//! REJECTED reason=no_availability
//! ```

use std::fmt;

use crate::core::engine::{Decision, RejectReason};
use crate::protocol::message::ProtocolError;
use crate::util::serde::Hour;

/// A single response line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Reply to a registration: the current simulated hour.
    CurrentHour(Hour),
    /// Reply to a reservation request.
    Decision(Decision),
}

impl Response {
    /// Wire form including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }

    /// Parse a response line, as a requester would.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim();
        let unrecognized = || ProtocolError::UnrecognizedResponse(line.to_owned());

        if let Ok(hour) = line.parse::<Hour>() {
            return Ok(Self::CurrentHour(hour));
        }

        let mut tokens = line.split_whitespace();
        let kind = tokens.next().ok_or_else(unrecognized)?;
        let pairs: Vec<(&str, &str)> = tokens
            .map(|token| token.split_once('=').ok_or_else(unrecognized))
            .collect::<Result<_, _>>()?;
        let value = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| *v)
                .ok_or_else(unrecognized)
        };
        let number = |key: &str| value(key)?.parse::<u32>().map_err(|_| unrecognized());

        let decision = match kind {
            "ACCEPTED" => Decision::Accepted {
                hour: number("hour")?,
                party: number("party")?,
            },
            "RESCHEDULED" => Decision::Rescheduled {
                requested: number("requested")?,
                assigned: number("assigned")?,
                party: number("party")?,
            },
            "REJECTED" => Decision::Rejected {
                reason: RejectReason::parse(value("reason")?).ok_or_else(unrecognized)?,
            },
            _ => return Err(unrecognized()),
        };
        Ok(Self::Decision(decision))
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::CurrentHour(hour) => write!(f, "{hour}"),
            Self::Decision(Decision::Accepted { hour, party }) => {
                write!(f, "ACCEPTED hour={hour} party={party}")
            }
            Self::Decision(Decision::Rescheduled {
                requested,
                assigned,
                party,
            }) => write!(
                f,
                "RESCHEDULED requested={requested} assigned={assigned} party={party}"
            ),
            Self::Decision(Decision::Rejected { reason }) => write!(f, "REJECTED reason={reason}"),
        }
    }
}
