//! Inbound message schema and decoding.
//!
//! Two encodings are accepted on the same stream:
//!
//! ```text
//! {"type":"REGISTER","agentName":"a1","responseChannelId":"/tmp/a1"}
//! {"type":"RESERVE","agentName":"a1","responseChannelId":"/tmp/a1","familyName":"Diaz","requestedHour":9,"partySize":4}
//! REGISTER,a1,/tmp/a1
//! RESERVE,a1,/tmp/a1,Diaz,9,4
//! ```
//!
//! Decoding validates every field; a frame that fails is reported as a
//! [`ProtocolError`], never truncated into something that looks valid.
//!
//! `requestedHour` and `partySize` are carried as signed 64-bit integers so
//! that a negative or out-of-range number still reaches the engine and gets
//! a reply. [`ReserveMessage::to_request`] saturates them into the engine's
//! unsigned types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::engine::ReservationRequest;

/// Longest accepted frame, in bytes.
pub const MAX_FRAME_LEN: usize = 1024;
/// Longest agent name, in bytes.
pub const MAX_AGENT_NAME: usize = 63;
/// Longest response channel id, in bytes.
pub const MAX_CHANNEL_ID: usize = 255;
/// Longest family name, in bytes.
pub const MAX_FAMILY_NAME: usize = 63;

/// Decode and validation failures.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Blank frame.
    #[error("empty frame")]
    Empty,
    /// Frame exceeds [`MAX_FRAME_LEN`].
    #[error("frame is {len} bytes, limit is {max}")]
    Oversized {
        /// Frame length.
        len: usize,
        /// Limit.
        max: usize,
    },
    /// First field names no known message.
    #[error("unknown message kind `{0}`")]
    UnknownKind(String),
    /// A required field is absent.
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// More fields than the message kind takes.
    #[error("unexpected trailing field in {0} frame")]
    TrailingField(&'static str),
    /// A field is empty.
    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
    /// A field exceeds its length limit.
    #[error("field `{field}` is {len} bytes, limit is {max}")]
    FieldTooLong {
        /// Field name.
        field: &'static str,
        /// Field length.
        len: usize,
        /// Limit.
        max: usize,
    },
    /// A field contains a control character or the `,` separator.
    #[error("field `{0}` contains a forbidden character")]
    ForbiddenCharacter(&'static str),
    /// A numeric field is not a valid value.
    #[error("field `{field}` has invalid value `{value}`")]
    InvalidValue {
        /// Field name.
        field: &'static str,
        /// Offending text.
        value: String,
    },
    /// JSON frame failed to parse.
    #[error("invalid JSON frame: {0}")]
    Json(#[from] serde_json::Error),
    /// Line bytes are not UTF-8.
    #[error("frame is not valid UTF-8 after byte {valid_up_to}")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        valid_up_to: usize,
    },
    /// Response line in no known form.
    #[error("unrecognized response `{0}`")]
    UnrecognizedResponse(String),
}

/// Agent registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterMessage {
    /// Agent name, unique per agent.
    pub agent_name: String,
    /// Channel the agent reads responses from.
    pub response_channel_id: String,
}

/// Reservation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveMessage {
    /// Submitting agent.
    pub agent_name: String,
    /// Channel the agent reads responses from.
    pub response_channel_id: String,
    /// Family the reservation is for.
    pub family_name: String,
    /// Requested entry hour, as sent.
    pub requested_hour: i64,
    /// Number of persons, as sent.
    pub party_size: i64,
}

impl ReserveMessage {
    /// Convert into an engine request.
    ///
    /// Negative values become `0`, values above the unsigned range become
    /// the maximum. An hour of `0` is always in the past and a huge hour is
    /// always out of hours; a party of `0` is rejected as `invalid_party`.
    pub fn to_request(&self) -> ReservationRequest {
        ReservationRequest {
            family: self.family_name.clone(),
            agent: self.agent_name.clone(),
            requested_hour: saturate(self.requested_hour),
            party_size: saturate(self.party_size),
        }
    }
}

fn saturate(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// An inbound protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Message {
    /// Register or refresh an agent.
    Register(RegisterMessage),
    /// Ask for a reservation.
    Reserve(ReserveMessage),
}

impl Message {
    /// Decode and validate one frame (JSON or compact text).
    pub fn decode(frame: &str) -> Result<Self, ProtocolError> {
        if frame.len() > MAX_FRAME_LEN {
            return Err(ProtocolError::Oversized {
                len: frame.len(),
                max: MAX_FRAME_LEN,
            });
        }
        let frame = frame.trim();
        if frame.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let message = if frame.starts_with('{') {
            serde_json::from_str(frame)?
        } else {
            Self::decode_text(frame)?
        };
        message.validate()?;
        Ok(message)
    }

    fn decode_text(frame: &str) -> Result<Self, ProtocolError> {
        let mut fields = frame.split(',').map(str::trim);
        let kind = fields.next().unwrap_or_default();
        match kind {
            "REGISTER" => {
                let agent_name = next_field(&mut fields, "agentName")?;
                let response_channel_id = next_field(&mut fields, "responseChannelId")?;
                no_trailing(&mut fields, "REGISTER")?;
                Ok(Self::Register(RegisterMessage {
                    agent_name,
                    response_channel_id,
                }))
            }
            "RESERVE" => {
                let agent_name = next_field(&mut fields, "agentName")?;
                let response_channel_id = next_field(&mut fields, "responseChannelId")?;
                let family_name = next_field(&mut fields, "familyName")?;
                let requested_hour = parse_number(&next_field(&mut fields, "requestedHour")?, "requestedHour")?;
                let party_size = parse_number(&next_field(&mut fields, "partySize")?, "partySize")?;
                no_trailing(&mut fields, "RESERVE")?;
                Ok(Self::Reserve(ReserveMessage {
                    agent_name,
                    response_channel_id,
                    family_name,
                    requested_hour,
                    party_size,
                }))
            }
            other => Err(ProtocolError::UnknownKind(other.to_owned())),
        }
    }

    /// Check field lengths, characters and values.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        check_text(self.agent_name(), "agentName", MAX_AGENT_NAME)?;
        check_text(self.response_channel_id(), "responseChannelId", MAX_CHANNEL_ID)?;
        if let Self::Reserve(reserve) = self {
            check_text(&reserve.family_name, "familyName", MAX_FAMILY_NAME)?;
        }
        Ok(())
    }

    /// Sending agent.
    pub fn agent_name(&self) -> &str {
        match self {
            Self::Register(m) => &m.agent_name,
            Self::Reserve(m) => &m.agent_name,
        }
    }

    /// Channel the response goes to.
    pub fn response_channel_id(&self) -> &str {
        match self {
            Self::Register(m) => &m.response_channel_id,
            Self::Reserve(m) => &m.response_channel_id,
        }
    }

    /// Encode as a JSON frame, without the trailing newline.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Encode in the compact comma-separated form, without the trailing newline.
    pub fn encode_text(&self) -> String {
        match self {
            Self::Register(m) => format!("REGISTER,{},{}", m.agent_name, m.response_channel_id),
            Self::Reserve(m) => format!(
                "RESERVE,{},{},{},{},{}",
                m.agent_name, m.response_channel_id, m.family_name, m.requested_hour, m.party_size
            ),
        }
    }
}

fn next_field<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<String, ProtocolError> {
    fields
        .next()
        .map(str::to_owned)
        .ok_or(ProtocolError::MissingField(name))
}

fn no_trailing<'a>(
    fields: &mut impl Iterator<Item = &'a str>,
    kind: &'static str,
) -> Result<(), ProtocolError> {
    match fields.next() {
        None => Ok(()),
        Some(_) => Err(ProtocolError::TrailingField(kind)),
    }
}

fn parse_number(value: &str, field: &'static str) -> Result<i64, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::InvalidValue {
        field,
        value: value.to_owned(),
    })
}

fn check_text(value: &str, field: &'static str, max: usize) -> Result<(), ProtocolError> {
    if value.is_empty() {
        return Err(ProtocolError::EmptyField(field));
    }
    if value.len() > max {
        return Err(ProtocolError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    if value.chars().any(|c| c.is_control() || c == ',') {
        return Err(ProtocolError::ForbiddenCharacter(field));
    }
    Ok(())
}
