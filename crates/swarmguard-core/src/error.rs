use thiserror::Error;

/// Result type alias for swarmguard operations
pub type Result<T> = std::result::Result<T, GuardError>;

/// Errors that can occur while observing or steering the node daemon
#[derive(Error, Debug)]
pub enum GuardError {
    /// The daemon could not be reached (refused, reset, timed out)
    #[error("connection failed: {0}")]
    Connection(String),

    /// The daemon answered with an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// Error message from the daemon
        message: String,
    },

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CIDR block or filter entry could not be parsed
    #[error("invalid address range: {0}")]
    InvalidRange(String),

    /// A bootstrap multiaddr could not be parsed
    #[error("invalid multiaddr: {0}")]
    InvalidMultiaddr(String),

    /// DNS resolution failed
    #[error("DNS resolution failed: {0}")]
    Dns(String),

    /// The latency probe failed or produced no round-trip time
    #[error("probe failed: {0}")]
    Probe(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Local I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuardError {
    /// Returns true if the daemon itself was unreachable
    ///
    /// A tick that hits one of these is abandoned until the next interval.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true for the error responses the daemon emits from filter
    /// add/remove calls even when the change was applied.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::Api { .. })
    }
}
