//! Requester-facing wire protocol.
//!
//! Inbound frames are single lines carrying either a registration or a
//! reservation request; every frame gets exactly one single-line response on
//! the requester's own channel.

pub mod message;
pub mod response;

pub use message::{
    Message, ProtocolError, RegisterMessage, ReserveMessage, MAX_AGENT_NAME, MAX_CHANNEL_ID,
    MAX_FAMILY_NAME, MAX_FRAME_LEN,
};
pub use response::Response;
