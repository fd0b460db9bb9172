//! Controller configuration.

pub mod park;

pub use park::ParkConfig;
