//! UseCase: ロビー
//!
//! 部屋に入っていない全ての接続を 1 つのディスパッチャで処理する。
//! 名前変更・入室・開設の各ダイアログは接続ごとの `LobbyStage` として
//! 保持するため、ある接続の入力待ちが他の接続を止めることはない。

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use crate::domain::{
    ClientRegistry, ConnectionId, Membership, PusherChannel, RegistryError, RoomError, RoomId,
    RoomTitle, messages, parse_valid_int,
};

use super::{
    room_worker::open_room,
    routing::{Disposition, Envelope, Inbound, LobbyEvent, RoomRoute},
    state::ChatState,
};

/// Where a lobby connection is in its dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LobbyStage {
    #[default]
    Menu,
    AwaitingNewName,
    AwaitingRoomSelection,
    AwaitingRoomTitle,
}

/// ロビーのユースケース
pub struct LobbyUseCase {
    state: Arc<ChatState>,
    stages: HashMap<ConnectionId, LobbyStage>,
}

impl LobbyUseCase {
    pub fn new(state: Arc<ChatState>) -> Self {
        Self {
            state,
            stages: HashMap::new(),
        }
    }

    pub fn stage(&self, handle: ConnectionId) -> Option<LobbyStage> {
        self.stages.get(&handle).copied()
    }

    /// Handle one event and answer the connection task
    pub async fn handle_event(&mut self, event: LobbyEvent) {
        match event {
            LobbyEvent::Connect {
                handle,
                peer,
                name,
                channel,
                reply,
            } => {
                let disposition = self.connect(handle, peer, &name, channel).await;
                if reply.send(disposition).is_err() {
                    tracing::debug!("[LOBBY] {} went away before the reply", handle);
                }
            }
            LobbyEvent::Envelope(Envelope {
                handle,
                inbound,
                reply,
            }) => {
                let disposition = match inbound {
                    Inbound::Line(line) => self.handle_line(handle, &line).await,
                    Inbound::Closed => {
                        self.disconnect(handle).await;
                        Disposition::Close
                    }
                };
                if reply.send(disposition).is_err() {
                    tracing::debug!("[LOBBY] {} went away before the reply", handle);
                }
            }
        }
    }

    /// Register a new connection and send the menu
    ///
    /// When the registry is full the rejection is written straight to
    /// `channel`, which is then dropped so the connection closes.
    pub async fn connect(
        &mut self,
        handle: ConnectionId,
        peer: SocketAddr,
        raw_name: &str,
        channel: PusherChannel,
    ) -> Disposition {
        let registered = {
            let mut registry = self.state.registry.lock().await;
            let name = registry.register(handle, raw_name).map(|c| c.name.clone());
            log_occupancy(&registry);
            name
        };

        match registered {
            Ok(name) => {
                tracing::info!(
                    "[LOBBY] 새로운 사용자 {} 접속 - Connected client IP : {}",
                    name,
                    peer.ip()
                );
                self.state.pusher.register_client(handle, channel).await;
                self.stages.insert(handle, LobbyStage::Menu);
                self.send(handle, messages::MENU).await;
                Disposition::Stay
            }
            Err(e) => {
                tracing::warn!("[LOBBY] {} rejected: {}", peer, e);
                if let RegistryError::Full(_) = e {
                    if channel.send(messages::SERVER_FULL.to_string()).is_err() {
                        tracing::warn!("[LOBBY] {} closed before the full notice", peer);
                    }
                }
                Disposition::Close
            }
        }
    }

    /// Interpret one line from a lobby connection
    pub async fn handle_line(&mut self, handle: ConnectionId, line: &str) -> Disposition {
        let Some(stage) = self.stage(handle) else {
            tracing::warn!("[LOBBY] line from unregistered connection {}", handle);
            return Disposition::Close;
        };
        if let Some(Membership::InRoom(id)) = self.membership(handle).await {
            tracing::warn!(
                "[LOBBY] 채팅방 {} 클라이언트가 로비로 메시지 보냄 : {}",
                id,
                handle
            );
            return Disposition::Stay;
        }

        let input = line.trim();
        match stage {
            LobbyStage::Menu => self.handle_menu(handle, input).await,
            LobbyStage::AwaitingNewName => self.handle_new_name(handle, input).await,
            LobbyStage::AwaitingRoomSelection => self.handle_room_selection(handle, input).await,
            LobbyStage::AwaitingRoomTitle => self.handle_room_title(handle, input).await,
        }
    }

    /// Remove a connection that closed or chose to leave
    pub async fn disconnect(&mut self, handle: ConnectionId) {
        self.stages.remove(&handle);
        let removed = {
            let mut registry = self.state.registry.lock().await;
            let removed = registry.remove(handle);
            log_occupancy(&registry);
            removed
        };
        match removed {
            Some(record) => {
                if let Some(id) = record.room_id() {
                    tracing::warn!("[LOBBY] {} removed while still in room {}", record.name, id);
                }
                tracing::info!("[LOBBY] 사용자 {} - 접속이 끊어졌습니다.", record.name);
            }
            None => tracing::debug!("[LOBBY] {} closed before registering", handle),
        }
        self.state.pusher.unregister_client(handle).await;
    }

    async fn handle_menu(&mut self, handle: ConnectionId, input: &str) -> Disposition {
        match input {
            "" => {
                self.send(handle, messages::EMPTY_MENU).await;
                self.send(handle, messages::MENU).await;
            }
            "0" => self.send(handle, messages::MENU).await,
            "1" => {
                self.log_choice(handle, input).await;
                self.set_stage(handle, LobbyStage::AwaitingNewName);
                self.send(handle, messages::RENAME_PROMPT).await;
            }
            "2" => {
                self.log_choice(handle, input).await;
                self.show_room_list(handle).await;
            }
            "3" => {
                self.log_choice(handle, input).await;
                if self.state.rooms.read().await.is_full() {
                    self.send(handle, messages::CREATE_TABLE_FULL).await;
                    self.send(handle, messages::MENU).await;
                } else {
                    self.set_stage(handle, LobbyStage::AwaitingRoomTitle);
                    self.send(handle, messages::CREATE_PROMPT).await;
                }
            }
            "4" => {
                self.log_choice(handle, input).await;
                self.disconnect(handle).await;
                return Disposition::Close;
            }
            _ => self.send(handle, messages::UNKNOWN_COMMAND).await,
        }
        Disposition::Stay
    }

    async fn handle_new_name(&mut self, handle: ConnectionId, input: &str) -> Disposition {
        let renamed = {
            let mut registry = self.state.registry.lock().await;
            registry.rename(handle, input).cloned()
        };
        match renamed {
            Ok(name) => {
                tracing::info!("[LOBBY] 사용자 {}로 변경", name);
                self.set_stage(handle, LobbyStage::Menu);
                self.send(handle, messages::RENAME_DONE).await;
                self.send(handle, messages::MENU).await;
            }
            Err(RegistryError::EmptyName) => {
                self.send(handle, messages::RENAME_EMPTY).await;
                self.send(handle, messages::RENAME_PROMPT).await;
            }
            Err(e) => {
                tracing::warn!("[LOBBY] rename failed: {}", e);
                self.set_stage(handle, LobbyStage::Menu);
                self.send(handle, messages::MENU).await;
            }
        }
        Disposition::Stay
    }

    async fn handle_room_selection(&mut self, handle: ConnectionId, input: &str) -> Disposition {
        if input.eq_ignore_ascii_case("b") {
            self.set_stage(handle, LobbyStage::Menu);
            self.send(handle, messages::MENU).await;
            return Disposition::Stay;
        }
        if input.is_empty() {
            self.send(handle, messages::JOIN_EMPTY).await;
            self.show_room_list(handle).await;
            return Disposition::Stay;
        }
        let Some(number) = parse_valid_int(input) else {
            self.send(handle, messages::JOIN_NOT_A_NUMBER).await;
            self.show_room_list(handle).await;
            return Disposition::Stay;
        };
        let Ok(index) = usize::try_from(number) else {
            self.send(handle, messages::JOIN_NO_SUCH_ROOM).await;
            self.show_room_list(handle).await;
            return Disposition::Stay;
        };

        match self.join_room(handle, RoomId::new(index)).await {
            Ok((route, title)) => {
                self.set_stage(handle, LobbyStage::Menu);
                self.send(handle, &messages::joined(&title, route.id)).await;
                Disposition::Enter(route)
            }
            Err(RoomError::Full(_)) => {
                self.send(handle, messages::JOIN_ROOM_FULL).await;
                self.show_room_list(handle).await;
                Disposition::Stay
            }
            Err(e) => {
                tracing::debug!("[LOBBY] join failed: {}", e);
                self.send(handle, messages::JOIN_NO_SUCH_ROOM).await;
                self.show_room_list(handle).await;
                Disposition::Stay
            }
        }
    }

    async fn handle_room_title(&mut self, handle: ConnectionId, input: &str) -> Disposition {
        let title = match RoomTitle::new(input) {
            Ok(title) => title,
            Err(_) => {
                self.send(handle, messages::CREATE_EMPTY).await;
                self.send(handle, messages::CREATE_PROMPT).await;
                return Disposition::Stay;
            }
        };

        self.set_stage(handle, LobbyStage::Menu);
        match open_room(&self.state, title.clone()).await {
            Ok(_) => self.send(handle, &messages::room_created(&title)).await,
            Err(e) => {
                tracing::warn!("[LOBBY] {}", e);
                self.send(handle, messages::CREATE_TABLE_FULL).await;
            }
        }
        self.send(handle, messages::MENU).await;
        Disposition::Stay
    }

    /// Move a client into a room.
    ///
    /// Takes the room table, the room and then the registry, in that order.
    async fn join_room(
        &self,
        handle: ConnectionId,
        id: RoomId,
    ) -> Result<(RoomRoute, RoomTitle), RoomError> {
        let rooms = self.state.rooms.read().await;
        let room_handle = rooms.get(id).ok_or(RoomError::NotFound(id))?;
        let mut room = room_handle.room.lock().await;
        let mut registry = self.state.registry.lock().await;

        let name = match registry.get(handle) {
            Some(record) => record.name.clone(),
            None => {
                tracing::warn!("[LOBBY] {} is not registered", handle);
                return Err(RoomError::NotFound(id));
            }
        };
        room.join(handle, name.clone())?;
        if let Err(e) = registry.set_membership(handle, Membership::InRoom(id)) {
            tracing::warn!("[LOBBY] {}", e);
        }
        tracing::info!("[LOBBY] 사용자 {} - 채팅방 {}에 참여합니다.", name, id);

        Ok((room_handle.route(), room.title().clone()))
    }

    async fn show_room_list(&mut self, handle: ConnectionId) {
        let summaries = self.state.room_summaries().await;
        if summaries.is_empty() {
            self.set_stage(handle, LobbyStage::Menu);
            self.send(handle, messages::NO_ROOMS).await;
            self.send(handle, messages::MENU).await;
            return;
        }
        self.set_stage(handle, LobbyStage::AwaitingRoomSelection);
        let list = messages::room_list(&summaries, self.state.limits.max_room_users);
        self.send(handle, &list).await;
    }

    async fn membership(&self, handle: ConnectionId) -> Option<Membership> {
        let registry = self.state.registry.lock().await;
        registry.get(handle).map(|c| c.membership)
    }

    async fn log_choice(&self, handle: ConnectionId, choice: &str) {
        let registry = self.state.registry.lock().await;
        if let Some(record) = registry.get(handle) {
            tracing::info!("[LOBBY] 사용자 {} - 메뉴{} 선택", record.name, choice);
        }
    }

    fn set_stage(&mut self, handle: ConnectionId, stage: LobbyStage) {
        self.stages.insert(handle, stage);
    }

    async fn send(&self, handle: ConnectionId, text: &str) {
        if let Err(e) = self.state.pusher.push_to(handle, text).await {
            tracing::warn!("[LOBBY] Failed to push message to {}: {}", handle, e);
        }
    }
}

fn log_occupancy(registry: &ClientRegistry) {
    tracing::info!(
        "All chatters ({}/{})",
        registry.count_live(),
        registry.capacity()
    );
}
