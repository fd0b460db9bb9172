//! Infrastructure adapters for the inbound queue and response delivery.

pub mod mailbox;
pub mod queue;

pub use mailbox::{DeliveryError, InMemoryMailbox, Mailbox};
pub use queue::{InboundFrame, InboundQueue};

#[cfg(unix)]
pub use mailbox::FifoMailbox;
#[cfg(unix)]
pub use queue::FifoListener;
