//! Error types for the chat client.

use std::io;

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to the connection failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
