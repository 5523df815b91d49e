//! Shared server state.
//!
//! Lock order, everywhere: `rooms` → one room's `Mutex<Room>` → `registry`.
//! A lock further left is never acquired while holding one further right.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::domain::{ClientRegistry, Limits, MessagePusher, RoomSummary};

use super::room_table::RoomTable;

pub struct ChatState {
    /// 接続中のクライアント（表示名と所在の唯一の情報源）
    pub registry: Mutex<ClientRegistry>,
    /// 開設済みの部屋
    pub rooms: RwLock<RoomTable>,
    /// MessagePusher（メッセージ通知の抽象化）
    pub pusher: Arc<dyn MessagePusher>,
    pub limits: Limits,
}

impl ChatState {
    pub fn new(limits: Limits, pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry: Mutex::new(ClientRegistry::new(limits.max_clients)),
            rooms: RwLock::new(RoomTable::new(limits.max_rooms)),
            pusher,
            limits,
        }
    }

    /// Room list snapshot in slot order
    pub async fn room_summaries(&self) -> Vec<RoomSummary> {
        let rooms = self.rooms.read().await;
        let mut summaries = Vec::with_capacity(rooms.len());
        for handle in rooms.iter() {
            summaries.push(handle.room.lock().await.summary());
        }
        summaries
    }

    pub async fn client_count(&self) -> usize {
        self.registry.lock().await.count_live()
    }

    pub async fn abort_room_workers(&self) {
        let rooms = self.rooms.read().await;
        for handle in rooms.iter() {
            handle.worker.abort();
        }
        tracing::debug!("{} room workers stopped", rooms.len());
    }
}
