//! Utilities shared by the Madang server and client binaries.

pub mod logger;
pub mod time;
