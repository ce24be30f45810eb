//! Logging utilities.
//!
//! Logger initialization for binaries and tests embedding the renderer. Library code
//! only ever talks to the `log` facade.

mod init;

pub use init::{init_logging, LoggingConfig};
