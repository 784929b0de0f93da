//! Builders to construct a game session from configuration.

pub mod session_builder;

pub use session_builder::build_session;
