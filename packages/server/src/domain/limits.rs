//! Capacity limits of the chat server.

/// Maximum number of concurrently registered clients.
pub const MAX_CLIENTS: usize = 20;
/// Maximum number of chat rooms, default rooms included.
pub const MAX_CHATROOMS: usize = 50;
/// Maximum number of members in a single room.
pub const MAX_ROOM_USERS: usize = 10;
/// Maximum number of items in a poll.
pub const MAX_POLL_ITEMS: usize = 10;
/// Maximum length of display names and room titles, in characters.
pub const MAX_NAME_CHARS: usize = 31;
/// Maximum length of a received line, in bytes. Longer lines are truncated.
pub const MAX_LINE_BYTES: usize = 127;
/// Capacity of aggregated replies (room list, poll list, poll result).
pub const RENDER_CAPACITY: usize = 1024;
/// Number of rooms opened at startup.
pub const DEFAULT_ROOM_COUNT: usize = 3;

/// Capacities the server is started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_clients: usize,
    pub max_rooms: usize,
    pub max_room_users: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_clients: MAX_CLIENTS,
            max_rooms: MAX_CHATROOMS,
            max_room_users: MAX_ROOM_USERS,
        }
    }
}
