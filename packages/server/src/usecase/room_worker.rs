//! UseCase: 部屋ごとのワーカー
//!
//! 部屋ごとに 1 つのタスクが受信箱を待ち受け、届いた行を
//! プロトコルエンジン（`Room::handle_line`）に渡して結果を配信する。
//! 受信箱が空の間は何もしない（ポーリングしない）。

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    ConnectionId, Membership, MessagePusher, Outbound, Room, RoomError, RoomId, RoomTitle,
};

use super::{
    room_table::RoomHandle,
    routing::{Disposition, Envelope, Inbound},
    state::ChatState,
};

pub struct RoomWorker {
    state: Arc<ChatState>,
    room: Arc<Mutex<Room>>,
    title: RoomTitle,
}

impl RoomWorker {
    pub fn new(state: Arc<ChatState>, room: Arc<Mutex<Room>>, title: RoomTitle) -> Self {
        Self { state, room, title }
    }

    /// Serve the room until its inbox closes
    pub async fn run(self, mut inbox: mpsc::UnboundedReceiver<Envelope>) {
        tracing::debug!("[{}] room worker started", self.title);
        while let Some(envelope) = inbox.recv().await {
            let disposition = self.handle(envelope.handle, envelope.inbound).await;
            if envelope.reply.send(disposition).is_err() {
                tracing::debug!(
                    "[{}] {} went away before the reply",
                    self.title,
                    envelope.handle
                );
            }
        }
        tracing::debug!("[{}] room worker stopped", self.title);
    }

    /// Apply one inbound event and deliver the resulting messages
    pub async fn handle(&self, handle: ConnectionId, inbound: Inbound) -> Disposition {
        let closed = inbound == Inbound::Closed;
        let reaction = {
            let mut room = self.room.lock().await;
            if !room.members().contains(handle) {
                tracing::warn!(
                    "[{}] traffic from {} who is not a member",
                    self.title,
                    handle
                );
                return Disposition::ReturnToLobby;
            }

            {
                let registry = self.state.registry.lock().await;
                room.refresh_member_names(|h| registry.get(h).map(|c| c.name.clone()));
            }

            let reaction = match inbound {
                Inbound::Line(line) => room.handle_line(handle, &line),
                Inbound::Closed => room.disconnect(handle),
            };

            if let Some(member) = &reaction.departed {
                let mut registry = self.state.registry.lock().await;
                if let Err(e) = registry.set_membership(member.handle, Membership::Lobby) {
                    tracing::warn!("[{}] {}", self.title, e);
                }
            }
            reaction
        };

        let departed = reaction.departed.is_some();
        deliver(self.state.pusher.as_ref(), reaction.outbound).await;

        if departed || closed {
            if closed {
                tracing::info!("[{}] {} 접속 종료", self.title, handle);
            }
            Disposition::ReturnToLobby
        } else {
            Disposition::Stay
        }
    }
}

/// Push every message, logging the ones that could not be queued
pub async fn deliver(pusher: &dyn MessagePusher, outbound: Vec<Outbound>) {
    for message in outbound {
        if let Err(e) = pusher.push_to(message.to, &message.text).await {
            tracing::warn!("Failed to deliver to {}: {}", message.to, e);
        }
    }
}

/// Open a new room and start its worker
///
/// # Errors
///
/// * `RoomError::TableFull` - the room table already holds `max_rooms` rooms
pub async fn open_room(state: &Arc<ChatState>, title: RoomTitle) -> Result<RoomId, RoomError> {
    let mut rooms = state.rooms.write().await;
    if rooms.is_full() {
        return Err(RoomError::TableFull(rooms.capacity()));
    }

    let id = rooms.next_id();
    let room = Room::new(id, title.clone(), state.limits.max_room_users);
    let room = Arc::new(Mutex::new(room));
    let (inbox, rx) = mpsc::unbounded_channel();
    let worker = RoomWorker::new(state.clone(), room.clone(), title.clone());
    let worker = tokio::spawn(worker.run(rx));
    rooms.push(RoomHandle {
        id,
        room,
        inbox,
        worker,
    });

    tracing::info!("[LOBBY] 채팅방 {} ({}) 개설", title, id);
    Ok(id)
}
