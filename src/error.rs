use std::io;

use thiserror::Error;

/// Status codes for ring buffer operations.
///
/// None of these leave the buffer in an inconsistent state. `TooMuchData` is a
/// partial success: the accepted prefix is already buffered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingBufferError {
    /// No unread bytes are available
    #[error("ring buffer is empty")]
    BufferEmpty,

    /// No free space is left for writing
    #[error("ring buffer is full")]
    BufferFull,

    /// The input exceeded free space; only the first `written` bytes were stored
    #[error("too much data to write: only {written} bytes accepted")]
    TooMuchData {
        /// Number of leading bytes of the input that were buffered
        written: usize,
    },

    /// A ring buffer cannot be created with zero capacity
    #[error("ring buffer capacity must be greater than zero")]
    ZeroCapacity,
}

impl RingBufferError {
    /// Number of bytes the failing call still transferred.
    ///
    /// Only `TooMuchData` reports a non-zero count.
    pub fn written(&self) -> usize {
        match self {
            RingBufferError::TooMuchData { written } => *written,
            _ => 0,
        }
    }
}

impl From<RingBufferError> for io::Error {
    fn from(err: RingBufferError) -> Self {
        let kind = match err {
            RingBufferError::BufferEmpty | RingBufferError::BufferFull => io::ErrorKind::WouldBlock,
            RingBufferError::TooMuchData { .. } => io::ErrorKind::WriteZero,
            RingBufferError::ZeroCapacity => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
