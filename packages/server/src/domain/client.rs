//! Client registry: who is connected and where they are.

use super::{ConnectionId, DisplayName, RegistryError, RoomId};

/// Where a registered client currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Lobby,
    InRoom(RoomId),
}

/// Identity of one registered connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub handle: ConnectionId,
    pub name: DisplayName,
    pub membership: Membership,
}

impl ClientRecord {
    /// Room the client is in, if any
    pub fn room_id(&self) -> Option<RoomId> {
        match self.membership {
            Membership::Lobby => None,
            Membership::InRoom(id) => Some(id),
        }
    }
}

/// Fixed-capacity table of registered clients.
///
/// This is the single source of truth for display names and membership.
/// Removing a client moves the last record into the freed slot, so slot
/// order is not stable across removals.
#[derive(Debug)]
pub struct ClientRegistry {
    clients: Vec<ClientRecord>,
    capacity: usize,
}

impl ClientRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            clients: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Register a new connection in the lobby
    ///
    /// An empty or whitespace-only `raw_name` is replaced by `UserN`, where `N`
    /// is the slot the client lands in (1-based).
    ///
    /// # Errors
    ///
    /// * `RegistryError::Full` - the registry already holds `capacity` clients
    /// * `RegistryError::DuplicateHandle` - the handle is already registered
    pub fn register(
        &mut self,
        handle: ConnectionId,
        raw_name: &str,
    ) -> Result<&ClientRecord, RegistryError> {
        if self.is_full() {
            return Err(RegistryError::Full(self.capacity));
        }
        if self.find_by_handle(handle).is_some() {
            return Err(RegistryError::DuplicateHandle(handle));
        }

        let name = DisplayName::new(raw_name)
            .unwrap_or_else(|_| DisplayName::numbered(self.clients.len() + 1));
        self.clients.push(ClientRecord {
            handle,
            name,
            membership: Membership::Lobby,
        });

        let index = self.clients.len() - 1;
        Ok(&self.clients[index])
    }

    /// Change the display name of a client
    ///
    /// # Errors
    ///
    /// * `RegistryError::EmptyName` - `new_name` is empty after trimming
    /// * `RegistryError::NotFound` - no client is registered under `handle`
    pub fn rename(
        &mut self,
        handle: ConnectionId,
        new_name: &str,
    ) -> Result<&DisplayName, RegistryError> {
        let name = DisplayName::new(new_name)?;
        let record = self
            .clients
            .iter_mut()
            .find(|c| c.handle == handle)
            .ok_or(RegistryError::NotFound(handle))?;
        record.name = name;
        Ok(&record.name)
    }

    /// Update the membership of a client
    pub fn set_membership(
        &mut self,
        handle: ConnectionId,
        membership: Membership,
    ) -> Result<(), RegistryError> {
        let record = self
            .clients
            .iter_mut()
            .find(|c| c.handle == handle)
            .ok_or(RegistryError::NotFound(handle))?;
        record.membership = membership;
        Ok(())
    }

    /// Remove a client, compacting the table
    ///
    /// Returns the removed record, or `None` if the handle is unknown.
    pub fn remove(&mut self, handle: ConnectionId) -> Option<ClientRecord> {
        let index = self.find_by_handle(handle)?;
        Some(self.clients.swap_remove(index))
    }

    /// Slot index of a client
    pub fn find_by_handle(&self, handle: ConnectionId) -> Option<usize> {
        self.clients.iter().position(|c| c.handle == handle)
    }

    pub fn get(&self, handle: ConnectionId) -> Option<&ClientRecord> {
        self.clients.iter().find(|c| c.handle == handle)
    }

    pub fn count_live(&self) -> usize {
        self.clients.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.clients.len() >= self.capacity
    }

    /// Records in slot order
    pub fn iter(&self) -> impl Iterator<Item = &ClientRecord> {
        self.clients.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    #[test]
    fn test_register_assigns_default_name_when_empty() {
        // テスト項目: 名前が空の場合 UserN が割り当てられ、ロビー状態になる
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);
        registry.register(id(1), "alice").unwrap();

        // when (操作):
        let record = registry.register(id(2), "   ").unwrap().clone();

        // then (期待する結果):
        assert_eq!(record.name.as_str(), "User2");
        assert_eq!(record.membership, Membership::Lobby);
        assert_eq!(record.room_id(), None);
    }

    #[test]
    fn test_register_rejects_when_full() {
        // テスト項目: 容量を超える登録は拒否され、件数は容量を超えない
        // given (前提条件):
        let mut registry = ClientRegistry::new(2);
        registry.register(id(1), "alice").unwrap();
        registry.register(id(2), "bob").unwrap();

        // when (操作):
        let result = registry.register(id(3), "charlie");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RegistryError::Full(2));
        assert_eq!(registry.count_live(), 2);
        assert!(registry.get(id(3)).is_none());
    }

    #[test]
    fn test_register_rejects_duplicate_handle() {
        // テスト項目: 同じハンドルの二重登録は拒否される
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);
        registry.register(id(1), "alice").unwrap();

        // when (操作):
        let result = registry.register(id(1), "alice-again");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RegistryError::DuplicateHandle(id(1)));
        assert_eq!(registry.count_live(), 1);
    }

    #[test]
    fn test_rename_trims_and_rejects_empty() {
        // テスト項目: 名前変更は前後の空白を除去し、空の名前は拒否する
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);
        registry.register(id(1), "alice").unwrap();

        // when (操作):
        let empty = registry.rename(id(1), "  ").cloned();
        let renamed = registry.rename(id(1), "  neo ").cloned();

        // then (期待する結果):
        assert_eq!(empty.unwrap_err(), RegistryError::EmptyName);
        assert_eq!(renamed.unwrap().as_str(), "neo");
        assert_eq!(registry.get(id(1)).unwrap().name.as_str(), "neo");
    }

    #[test]
    fn test_rename_unknown_handle() {
        // テスト項目: 未登録のハンドルの名前変更は NotFound になる
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);

        // when (操作):
        let result = registry.rename(id(9), "ghost");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), RegistryError::NotFound(id(9)));
    }

    #[test]
    fn test_remove_moves_last_record_into_freed_slot() {
        // テスト項目: 削除時は末尾のレコードが空いたスロットに移動する
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);
        registry.register(id(1), "alice").unwrap();
        registry.register(id(2), "bob").unwrap();
        registry.register(id(3), "charlie").unwrap();

        // when (操作):
        let removed = registry.remove(id(1)).unwrap();

        // then (期待する結果):
        assert_eq!(removed.name.as_str(), "alice");
        assert_eq!(registry.count_live(), 2);
        assert_eq!(registry.find_by_handle(id(3)), Some(0));
        assert_eq!(registry.find_by_handle(id(2)), Some(1));
        assert!(registry.remove(id(1)).is_none());
    }

    #[test]
    fn test_set_membership_round_trip() {
        // テスト項目: 所属状態をルームとロビーの間で更新できる
        // given (前提条件):
        let mut registry = ClientRegistry::new(20);
        registry.register(id(1), "alice").unwrap();

        // when (操作):
        registry
            .set_membership(id(1), Membership::InRoom(RoomId::new(2)))
            .unwrap();
        let in_room = registry.get(id(1)).unwrap().room_id();
        registry.set_membership(id(1), Membership::Lobby).unwrap();

        // then (期待する結果):
        assert_eq!(in_room, Some(RoomId::new(2)));
        assert_eq!(registry.get(id(1)).unwrap().membership, Membership::Lobby);
    }
}
