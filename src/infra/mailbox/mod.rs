//! Response delivery backends.

#[cfg(unix)]
pub mod fifo;
pub mod memory;

use thiserror::Error;

use crate::protocol::Response;

#[cfg(unix)]
pub use fifo::FifoMailbox;
pub use memory::InMemoryMailbox;

/// Why a response could not be delivered.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Nobody is reading the channel.
    #[error("no listener on channel {0}")]
    NoListener(String),
    /// The channel id does not name a response channel.
    #[error("{0} is not a response channel")]
    NotAChannel(String),
    /// Writing failed.
    #[error("delivery to {channel} failed: {source}")]
    Io {
        /// Channel id.
        channel: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Delivers one response to one requester channel.
///
/// Delivery is best-effort: a failure is reported to the caller, which logs
/// it and moves on. Nothing is retried.
pub trait Mailbox: Send {
    /// Deliver `response` to `channel_id`.
    fn deliver(&mut self, channel_id: &str, response: &Response) -> Result<(), DeliveryError>;
}
