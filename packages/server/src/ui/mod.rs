//! TCP chat server implementation.

mod connection;
mod error;
mod server;
mod signal;

pub use error::ServerError;
pub use server::Server;
pub use signal::shutdown_signal;
