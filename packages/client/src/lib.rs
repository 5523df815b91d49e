//! Terminal peer for the multi-room TCP chat server.
//!
//! The client sends its display name, then forwards typed lines and prints
//! whatever the server sends. It carries no protocol logic of its own.

pub mod error;
pub mod session;
pub mod ui;

pub use error::ClientError;
pub use session::run_client;
