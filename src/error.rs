use crate::channel::Capability;
use thiserror::Error;

/// Custom error types for the bytequeue library.
#[derive(Error, Debug)]
pub enum Error {
    /// The channel handed to `attach` does not expose a required capability.
    /// Attach aborts entirely; no partial state is retained.
    #[error("incompatible channel: missing `{capability}` capability")]
    IncompatibleChannel { capability: Capability },

    /// A single message or write would exceed the configured maximum buffer
    /// size even after maximal growth. Fatal to the connection.
    #[error("buffer overflow: {required} bytes required, limit is {limit}")]
    BufferOverflow { required: usize, limit: usize },

    /// A decoder asked to rewind past the start of unread data. This is a
    /// decoder-logic bug and is raised immediately rather than clamped.
    #[error("invalid rewind: {rewind} bytes requested with read cursor at {cursor}")]
    InvalidRewind { rewind: usize, cursor: usize },

    /// A checked read was attempted with fewer unread bytes than requested.
    #[error("out of range: {requested} bytes requested, {available} unread")]
    OutOfRange { requested: usize, available: usize },

    /// Failure constructing the default raw channel for a URI in `open`.
    #[error("connect failed: {message}")]
    ConnectFailed { message: String },
}

impl Error {
    /// Create a new `IncompatibleChannel` error naming the missing capability.
    pub fn incompatible_channel(capability: Capability) -> Self {
        Self::IncompatibleChannel { capability }
    }

    /// Create a new `BufferOverflow` error with the required size and the limit.
    pub fn buffer_overflow(required: usize, limit: usize) -> Self {
        Self::BufferOverflow { required, limit }
    }

    /// Create a new `InvalidRewind` error with the requested rewind and cursor.
    pub fn invalid_rewind(rewind: usize, cursor: usize) -> Self {
        Self::InvalidRewind { rewind, cursor }
    }

    /// Create a new `OutOfRange` error with the requested and available sizes.
    pub fn out_of_range(requested: usize, available: usize) -> Self {
        Self::OutOfRange {
            requested,
            available,
        }
    }

    /// Create a new `ConnectFailed` error with a descriptive message.
    pub fn connect_failed(message: impl Into<String>) -> Self {
        Self::ConnectFailed {
            message: message.into(),
        }
    }
}

/// Result type alias for the library operations.
pub type Result<T> = std::result::Result<T, Error>;
