//! Chat room aggregate: member list and current mode.

use super::{ConnectionId, DisplayName, GameState, PollState, RoomError, RoomId, RoomTitle};

/// One room member as seen by the room.
///
/// `name` is a cached copy of the registry entry and is refreshed before the
/// room looks at its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub handle: ConnectionId,
    pub name: DisplayName,
}

/// Capacity-capped member list.
///
/// Removal moves the last member into the freed slot, so iteration order is
/// join order only until the first removal.
#[derive(Debug, Clone)]
pub struct MemberList {
    members: Vec<Member>,
    capacity: usize,
}

impl MemberList {
    pub fn new(capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a member; hands it back if the list is full.
    pub fn push(&mut self, member: Member) -> Result<(), Member> {
        if self.is_full() {
            return Err(member);
        }
        self.members.push(member);
        Ok(())
    }

    pub fn remove(&mut self, handle: ConnectionId) -> Option<Member> {
        let index = self.position(handle)?;
        Some(self.members.swap_remove(index))
    }

    pub fn position(&self, handle: ConnectionId) -> Option<usize> {
        self.members.iter().position(|m| m.handle == handle)
    }

    pub fn get(&self, handle: ConnectionId) -> Option<&Member> {
        self.members.iter().find(|m| m.handle == handle)
    }

    pub fn contains(&self, handle: ConnectionId) -> bool {
        self.position(handle).is_some()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Member> {
        self.members.iter_mut()
    }

    /// Handles of every member, in slot order
    pub fn handles(&self) -> Vec<ConnectionId> {
        self.members.iter().map(|m| m.handle).collect()
    }
}

/// Current sub-protocol of a room together with its state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoomMode {
    #[default]
    Chat,
    Game(GameState),
    Poll(PollState),
}

impl RoomMode {
    /// Name shown by `info`
    pub fn label(&self) -> &'static str {
        match self {
            RoomMode::Chat => "Chat",
            RoomMode::Game(_) => "Game",
            RoomMode::Poll(_) => "Poll",
        }
    }
}

/// Snapshot used by the lobby room list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSummary {
    pub id: RoomId,
    pub title: RoomTitle,
    pub members: usize,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub(super) id: RoomId,
    pub(super) title: RoomTitle,
    pub(super) members: MemberList,
    pub(super) mode: RoomMode,
}

impl Room {
    pub fn new(id: RoomId, title: RoomTitle, max_users: usize) -> Self {
        Self {
            id,
            title,
            members: MemberList::new(max_users),
            mode: RoomMode::Chat,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn title(&self) -> &RoomTitle {
        &self.title
    }

    pub fn members(&self) -> &MemberList {
        &self.members
    }

    pub fn mode(&self) -> &RoomMode {
        &self.mode
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_full(&self) -> bool {
        self.members.is_full()
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            title: self.title.clone(),
            members: self.members.len(),
        }
    }

    /// Add a member to the room
    ///
    /// # Errors
    ///
    /// * `RoomError::Full` - the room already holds its maximum number of members
    pub fn join(&mut self, handle: ConnectionId, name: DisplayName) -> Result<(), RoomError> {
        if self.members.contains(handle) {
            tracing::warn!("[{}] {} is already a member", self.title, handle);
            return Ok(());
        }
        self.members
            .push(Member { handle, name })
            .map_err(|_| RoomError::Full(self.id))
    }

    /// Resynchronise cached member names with the registry.
    ///
    /// Members `lookup` cannot resolve are shown as `Unknown`.
    pub fn refresh_member_names<F>(&mut self, mut lookup: F)
    where
        F: FnMut(ConnectionId) -> Option<DisplayName>,
    {
        let title = &self.title;
        for member in self.members.iter_mut() {
            match lookup(member.handle) {
                Some(name) => member.name = name,
                None => {
                    tracing::warn!("[{}] {} not found in registry", title, member.handle);
                    member.name = DisplayName::unknown();
                }
            }
        }
    }

    pub(super) fn reset_to_chat(&mut self) {
        self.mode = RoomMode::Chat;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn name(raw: &str) -> DisplayName {
        DisplayName::new(raw).unwrap()
    }

    fn room(max_users: usize) -> Room {
        Room::new(RoomId::new(0), RoomTitle::numbered(0), max_users)
    }

    #[test]
    fn test_join_respects_capacity() {
        // テスト項目: 定員に達した部屋への参加は拒否され、状態は変わらない
        // given (前提条件):
        let mut room = room(2);
        room.join(id(1), name("alice")).unwrap();
        room.join(id(2), name("bob")).unwrap();

        // when (操作):
        let result = room.join(id(3), name("carol"));

        // then (期待する結果):
        assert_eq!(result, Err(RoomError::Full(RoomId::new(0))));
        assert_eq!(room.member_count(), 2);
        assert!(!room.members().contains(id(3)));
    }

    #[test]
    fn test_member_removal_swaps_last_into_slot() {
        // テスト項目: メンバー削除時に末尾のメンバーが空いた位置に移動する
        // given (前提条件):
        let mut members = MemberList::new(10);
        for n in 1..=3 {
            members
                .push(Member {
                    handle: id(n),
                    name: DisplayName::numbered(n as usize),
                })
                .unwrap();
        }

        // when (操作):
        let removed = members.remove(id(1));

        // then (期待する結果):
        assert_eq!(removed.map(|m| m.handle), Some(id(1)));
        assert_eq!(members.handles(), vec![id(3), id(2)]);
    }

    #[test]
    fn test_refresh_member_names_falls_back_to_unknown() {
        // テスト項目: レジストリに存在しないメンバーは Unknown と表示される
        // given (前提条件):
        let mut room = room(10);
        room.join(id(1), name("alice")).unwrap();
        room.join(id(2), name("bob")).unwrap();

        // when (操作):
        room.refresh_member_names(|handle| (handle == id(1)).then(|| name("alicia")));

        // then (期待する結果):
        assert_eq!(room.members().get(id(1)).unwrap().name.as_str(), "alicia");
        assert_eq!(room.members().get(id(2)).unwrap().name.as_str(), "Unknown");
    }

    #[test]
    fn test_mode_label() {
        // テスト項目: モード名が info 表示用の文字列になる
        // given (前提条件):
        let host = id(1);

        // when (操作) / then (期待する結果):
        assert_eq!(RoomMode::Chat.label(), "Chat");
        let game = RoomMode::Game(GameState::new(host, name("h")));
        assert_eq!(game.label(), "Game");
        assert_eq!(RoomMode::Poll(PollState::new(host)).label(), "Poll");
    }
}
