//! Infrastructure layer: socket plumbing behind the domain traits.

pub mod line_reader;
pub mod message_pusher;

pub use line_reader::LineReader;
pub use message_pusher::{TcpMessagePusher, spawn_writer};
