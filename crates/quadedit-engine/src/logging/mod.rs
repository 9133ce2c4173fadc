//! Logging utilities.
//!
//! Logger initialization lives here so binaries and tests configure the `log`
//! facade the same way.

mod init;

pub use init::{default_filter, init_logging, LoggingConfig};
