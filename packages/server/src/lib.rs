//! Multi-room TCP chat server library.
//!
//! Clients connect over TCP, pick a display name, then browse, join or
//! create rooms from the lobby. Rooms carry a chat mode plus two embedded
//! mini-protocols: a number-guessing game and a poll.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
