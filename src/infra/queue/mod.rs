//! Inbound frame queue and its transport feeders.

#[cfg(unix)]
pub mod fifo;
pub mod memory;

#[cfg(unix)]
pub use fifo::FifoListener;
pub use memory::{InboundFrame, InboundQueue};
