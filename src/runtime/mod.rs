//! Controller threads: the request gateway, the lifecycle, the signal hook.

pub mod controller;
pub mod gateway;
#[cfg(feature = "tokio-runtime")]
pub mod signals;

pub use controller::{Controller, ControllerHandle};
pub use gateway::RequestGateway;
#[cfg(feature = "tokio-runtime")]
pub use signals::spawn_signal_listener;
