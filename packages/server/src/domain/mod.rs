//! Domain layer: value objects, registries and the room protocol.
//!
//! Nothing here performs I/O. The room protocol returns the messages it
//! wants delivered and the use case layer hands them to a `MessagePusher`.

pub mod client;
pub mod error;
pub mod game;
pub mod limits;
pub mod message_pusher;
pub mod messages;
pub mod poll;
pub mod protocol;
pub mod room;
pub mod value_object;

pub use client::{ClientRecord, ClientRegistry, Membership};
pub use error::{MessagePushError, RegistryError, RoomError};
pub use game::{ANSWER_LEN, GameState, Score, evaluate_guess, is_valid_number};
pub use limits::{
    DEFAULT_ROOM_COUNT, Limits, MAX_CHATROOMS, MAX_CLIENTS, MAX_LINE_BYTES, MAX_NAME_CHARS,
    MAX_POLL_ITEMS, MAX_ROOM_USERS, RENDER_CAPACITY,
};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use poll::{ItemProgress, PollStage, PollState, VoteOutcome, parse_valid_int};
pub use protocol::{Outbound, Reaction};
pub use room::{Member, MemberList, Room, RoomMode, RoomSummary};
pub use value_object::{ConnectionId, ConnectionIdFactory, DisplayName, RoomId, RoomTitle};
