//! Builders that turn configuration into a ready-to-start controller.

pub mod controller_builder;

pub use controller_builder::ControllerBuilder;
