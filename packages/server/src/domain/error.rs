//! Domain error types.

use thiserror::Error;

use super::{ConnectionId, RoomId};

/// Errors raised by the client registry
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry holds its maximum number of clients
    #[error("Client registry is full ({0} clients)")]
    Full(usize),

    /// The connection handle is already registered
    #[error("Connection {0} is already registered")]
    DuplicateHandle(ConnectionId),

    /// The requested display name is empty after trimming
    #[error("Display name must not be empty")]
    EmptyName,

    /// No client is registered under the connection handle
    #[error("Connection {0} is not registered")]
    NotFound(ConnectionId),
}

/// Errors raised by rooms and the room table
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoomError {
    /// The room holds its maximum number of members
    #[error("Room {0} is full")]
    Full(RoomId),

    /// No room exists under the identifier
    #[error("Room {0} does not exist")]
    NotFound(RoomId),

    /// The room table holds its maximum number of rooms
    #[error("Room table is full ({0} rooms)")]
    TableFull(usize),

    /// The requested room title is empty after trimming
    #[error("Room title must not be empty")]
    EmptyTitle,
}

/// Errors raised while pushing messages to connections
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagePushError {
    /// No write queue is registered for the connection
    #[error("Connection {0} not found")]
    ClientNotFound(ConnectionId),

    /// The write queue of the connection is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),
}
