use std::time::Duration;
use thiserror::Error;

/// Result type alias for host-side operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors from host-side tools
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The external command could not be started
    #[error("failed to run {command}: {source}")]
    Spawn {
        /// Program name
        command: &'static str,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The command exited unsuccessfully
    #[error("{command} exited with status {code:?}")]
    Exit {
        /// Program name
        command: &'static str,
        /// Exit code, if any
        code: Option<i32>,
    },

    /// The command output held no round-trip time
    #[error("no round-trip time in output: {0}")]
    Unparsable(String),

    /// Timeout
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Name resolution error
    #[error("DNS error: {0}")]
    Dns(String),
}

impl From<ProbeError> for swarmguard_core::GuardError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Dns(msg) => Self::Dns(msg),
            ProbeError::Spawn { source, .. } => Self::Io(source),
            other => Self::Probe(other.to_string()),
        }
    }
}
