//! Fatal server errors.

use std::io;

use thiserror::Error;

use crate::domain::RoomError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind listener: {0}")]
    Bind(#[source] io::Error),

    #[error("Failed to open default room: {0}")]
    Room(#[from] RoomError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
