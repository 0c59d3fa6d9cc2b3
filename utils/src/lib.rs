//! Shared utilities for the voter passport.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
