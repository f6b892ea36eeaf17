//! Error types for Net Pulse (netpulse)

use std::io;
use thiserror::Error;

/// Result type alias for Net Pulse operations
pub type Result<T> = std::result::Result<T, NetPulseError>;

/// Error type shared by the sampler, the proxy cascade and configuration
///
/// Only [`NetPulseError::Snapshot`] is produced while sampling. Everything
/// else the sampler runs into (clock skew, vanished interfaces, unparsable
/// proxy text, command timeouts) is absorbed and reported as "no data".
#[derive(Error, Debug)]
pub enum NetPulseError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interface counters could not be read this tick
    #[error("Snapshot unavailable: {0}")]
    Snapshot(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Command failed
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl NetPulseError {
    /// True when the caller should treat this as "metrics unavailable this
    /// tick" and simply try again on the next one.
    pub fn is_transient(&self) -> bool {
        matches!(self, NetPulseError::Snapshot(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_error_is_transient() {
        let err = NetPulseError::Snapshot("no interfaces".into());
        assert!(err.is_transient());
        assert_eq!(err.to_string(), "Snapshot unavailable: no interfaces");
    }

    #[test]
    fn test_io_error_converts() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "missing");
        let err: NetPulseError = io_err.into();
        assert!(!err.is_transient());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
