//! Per-connection task.
//!
//! 読み取り側はこのタスクが、書き込み側は writer タスクが所有する。
//! 1 行ずつ現在の所有者（ロビーまたは部屋）へ転送し、
//! 所有者の `Disposition` を受け取ってから次の行を読む。

use std::net::SocketAddr;

use tokio::{
    net::TcpStream,
    sync::{mpsc, oneshot},
};

use crate::{
    domain::ConnectionId,
    infrastructure::{LineReader, spawn_writer},
    usecase::{Disposition, Envelope, Inbound, LobbyEvent, RoomRoute},
};

/// Current owner of a connection's traffic
enum Owner {
    Lobby,
    Room(RoomRoute),
}

/// Serve one accepted connection until it closes
pub async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handle: ConnectionId,
    lobby: mpsc::UnboundedSender<LobbyEvent>,
) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = LineReader::new(read_half);

    let name = match reader.next_line().await {
        Ok(Some(name)) => name,
        Ok(None) => {
            tracing::info!("[LOBBY] 연결 종료됨 ({})", peer);
            return;
        }
        Err(e) => {
            tracing::warn!("[LOBBY] Failed to read name from {}: {}", peer, e);
            return;
        }
    };

    // The writer stops once every sender of this queue is dropped.
    let (channel, rx) = mpsc::unbounded_channel();
    spawn_writer(write_half, rx);

    let (reply, response) = oneshot::channel();
    let connect = LobbyEvent::Connect {
        handle,
        peer,
        name,
        channel,
        reply,
    };
    if lobby.send(connect).is_err() {
        tracing::debug!("Lobby is gone, dropping {}", peer);
        return;
    }
    match response.await {
        Ok(Disposition::Stay) => {}
        _ => return,
    }

    let mut owner = Owner::Lobby;
    loop {
        let inbound = match reader.next_line().await {
            Ok(Some(line)) => Inbound::Line(line),
            Ok(None) => Inbound::Closed,
            Err(e) => {
                tracing::debug!("Read error on {}: {}", handle, e);
                Inbound::Closed
            }
        };
        let closed = inbound == Inbound::Closed;

        let Some(disposition) = forward(&owner, &lobby, handle, inbound).await else {
            tracing::debug!("Owner of {} is gone", handle);
            return;
        };

        match disposition {
            Disposition::Stay => {}
            Disposition::Enter(route) => owner = Owner::Room(route),
            Disposition::ReturnToLobby => {
                owner = Owner::Lobby;
                if closed {
                    // The room released the member; the lobby removes the client.
                    forward(&owner, &lobby, handle, Inbound::Closed).await;
                }
            }
            Disposition::Close => return,
        }

        if closed {
            return;
        }
    }
}

/// Send one envelope to the owner and wait for its decision
async fn forward(
    owner: &Owner,
    lobby: &mpsc::UnboundedSender<LobbyEvent>,
    handle: ConnectionId,
    inbound: Inbound,
) -> Option<Disposition> {
    let (reply, response) = oneshot::channel();
    let envelope = Envelope {
        handle,
        inbound,
        reply,
    };
    let sent = match owner {
        Owner::Lobby => lobby.send(LobbyEvent::Envelope(envelope)).is_ok(),
        Owner::Room(route) => route.inbox.send(envelope).is_ok(),
    };
    if !sent {
        return None;
    }
    response.await.ok()
}
