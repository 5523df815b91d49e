//! Multi-room TCP chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin madang-server -- 8080
//! ```

use std::sync::Arc;

use clap::Parser;
use madang_server::{
    domain::Limits, infrastructure::TcpMessagePusher, ui::Server, usecase::ChatState,
};
use madang_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "madang-server")]
#[command(about = "Multi-room TCP chat server", long_about = None)]
struct Args {
    /// Port number to listen on
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // 1. Create MessagePusher (TCP implementation)
    let message_pusher = Arc::new(TcpMessagePusher::default());

    // 2. Create shared state
    let state = Arc::new(ChatState::new(Limits::default(), message_pusher));

    // 3. Bind and run the server
    let server = match Server::bind(("0.0.0.0", args.port), state).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
