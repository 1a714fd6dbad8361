//! Structured logging setup.
//!
//! Logs are emitted as JSON to stdout. Log level is configurable via
//! `LOG_LEVEL` (default: `info`); `RUST_LOG` takes precedence when set.

pub mod init;

pub use init::{init_telemetry, install_panic_hook};
