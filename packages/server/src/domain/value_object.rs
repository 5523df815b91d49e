//! Value objects of the chat domain.

use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

use super::{MAX_NAME_CHARS, RegistryError, RoomError};

/// Handle of one live connection, unique for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Generates connection handles from a monotonically increasing counter.
#[derive(Debug)]
pub struct ConnectionIdFactory {
    next: AtomicU64,
}

impl ConnectionIdFactory {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn generate(&self) -> ConnectionId {
        ConnectionId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps the first `MAX_NAME_CHARS` characters of a trimmed string.
fn bounded(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_CHARS).collect())
}

/// User-chosen display name.
///
/// Surrounding whitespace is trimmed and the name is truncated to
/// `MAX_NAME_CHARS` characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a display name from raw user input
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::EmptyName` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, RegistryError> {
        bounded(raw).map(Self).ok_or(RegistryError::EmptyName)
    }

    /// Default name given to clients that connect without one (`UserN`)
    pub fn numbered(n: usize) -> Self {
        Self(format!("User{}", n))
    }

    /// Placeholder shown for room members the registry no longer knows
    pub fn unknown() -> Self {
        Self("Unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Index of a room in the room table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(usize);

impl RoomId {
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Title of a room, fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomTitle(String);

impl RoomTitle {
    /// Create a room title from raw user input
    ///
    /// # Errors
    ///
    /// Returns `RoomError::EmptyTitle` if nothing is left after trimming.
    pub fn new(raw: &str) -> Result<Self, RoomError> {
        bounded(raw).map(Self).ok_or(RoomError::EmptyTitle)
    }

    /// Title of the rooms opened at startup (`Chatroom-N`)
    pub fn numbered(n: usize) -> Self {
        Self(format!("Chatroom-{}", n))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
