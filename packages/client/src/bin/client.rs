//! Terminal client for the multi-room TCP chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin madang-client -- 127.0.0.1 8080 Alice
//! ```

use clap::Parser;
use madang_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "madang-client")]
#[command(about = "Terminal client for the multi-room TCP chat server", long_about = None)]
struct Args {
    /// Server IP address
    ip: String,

    /// Server port
    port: u16,

    /// Display name to register with
    name: String,
}

#[tokio::main]
async fn main() {
    // stdout is the chat transcript, so only warnings are logged by default
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();

    if let Err(e) = madang_client::run_client(&args.ip, args.port, &args.name).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
