//! Server execution logic.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::mpsc,
    task::JoinSet,
};

use crate::{
    domain::{ConnectionIdFactory, DEFAULT_ROOM_COUNT, RoomTitle},
    usecase::{ChatState, LobbyUseCase, open_room},
};

use super::{connection::handle_connection, error::ServerError, signal::shutdown_signal};

/// Multi-room TCP chat server
///
/// The accept loop and the lobby dispatcher share one task; every room has
/// its own worker task and every connection its own reader task.
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(ChatState::new(Limits::default(), message_pusher));
/// let server = Server::bind(("0.0.0.0", 8080), state).await?;
/// server.run().await?;
/// ```
pub struct Server {
    listener: TcpListener,
    state: Arc<ChatState>,
}

impl Server {
    /// Bind the listener and open the default rooms
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the room table
    /// cannot hold the default rooms.
    pub async fn bind<A: ToSocketAddrs>(
        addr: A,
        state: Arc<ChatState>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;

        let default_rooms = DEFAULT_ROOM_COUNT.min(state.limits.max_rooms);
        for n in 0..default_rooms {
            open_room(&state, RoomTitle::numbered(n)).await?;
        }

        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<ChatState> {
        self.state.clone()
    }

    /// Run until Ctrl+C or SIGTERM
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_until(shutdown_signal()).await
    }

    /// Run until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!("Chat server listening on {}", self.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        let (lobby_tx, mut lobby_rx) = mpsc::unbounded_channel();
        let mut lobby = LobbyUseCase::new(self.state.clone());
        let ids = ConnectionIdFactory::new();
        let mut connections = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let handle = ids.generate();
                        tracing::debug!("[LOBBY] accepted {} as {}", peer, handle);
                        let task = handle_connection(stream, peer, handle, lobby_tx.clone());
                        connections.spawn(task);
                    }
                    Err(e) => tracing::warn!("[LOBBY] accept failed: {}", e),
                },
                Some(event) = lobby_rx.recv() => lobby.handle_event(event).await,
                Some(joined) = connections.join_next(), if !connections.is_empty() => {
                    if let Err(e) = joined {
                        if e.is_panic() {
                            tracing::error!("Connection task panicked: {}", e);
                        }
                    }
                }
            }
        }

        // Closing every queue lets the writers flush and close their sockets.
        self.state.pusher.unregister_all().await;
        connections.shutdown().await;
        self.state.abort_room_workers().await;
        drop(self.listener);

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
