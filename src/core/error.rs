//! Error types for controller setup and lifecycle.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while building or running the controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Configuration failed validation; nothing was created.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The inbound channel could not be created or opened.
    #[error("channel setup failed for {path}: {source}")]
    ChannelSetup {
        /// Filesystem path of the channel.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A controller thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    ThreadSpawn {
        /// Thread role (`clock`, `gateway`, ...).
        name: &'static str,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A controller thread panicked before it could be joined.
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
