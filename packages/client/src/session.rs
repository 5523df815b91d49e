//! TCP client session.

use madang_shared::time::local_timestamp;
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    sync::mpsc,
};

use super::{
    error::ClientError,
    ui::{banner, print_raw},
};

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The server closed the connection
    ServerClosed,
    /// The user interrupted or closed the input
    UserExit,
}

/// Run one client session against `ip:port`
///
/// # Errors
///
/// Returns an error if the connection cannot be opened or the name cannot
/// be sent.
pub async fn run_client(ip: &str, port: u16, name: &str) -> Result<SessionEnd, ClientError> {
    let addr = format!("{}:{}", ip, port);
    let stream = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Connected to {}", addr);

    let (mut read_half, mut write_half) = stream.into_split();
    write_half
        .write_all(format!("{}\n", name).as_bytes())
        .await?;

    print!("{}", banner(port, ip, name, &local_timestamp()));

    // Spawn a task to print everything the server sends
    let mut read_task = tokio::spawn(async move {
        let mut buffer = [0u8; 1024];
        loop {
            match read_half.read(&mut buffer).await {
                Ok(0) => break,
                Ok(n) => print_raw(&buffer[..n]),
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    break;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline("") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    rl.add_history_entry(line.as_str()).ok();
                    if input_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to forward typed lines to the server
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write_half.write_all(format!("{}\n", line).as_bytes()).await {
                tracing::warn!("Failed to send message: {}", e);
                return SessionEnd::ServerClosed;
            }
        }
        SessionEnd::UserExit
    });

    // If any one of the tasks completes, abort the other
    let end = tokio::select! {
        _ = &mut read_task => {
            write_task.abort();
            SessionEnd::ServerClosed
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.unwrap_or(SessionEnd::ServerClosed)
        }
    };

    match end {
        SessionEnd::ServerClosed => println!("\n[INFO] 서버와 연결 종료됨"),
        SessionEnd::UserExit => println!("\n[NOTICE] 클라이언트 종료"),
    }
    Ok(end)
}
