//! Table of open rooms.
//!
//! Slots are appended and never reused; a room lives until shutdown.

use std::sync::Arc;

use tokio::{
    sync::{Mutex, mpsc},
    task::JoinHandle,
};

use crate::domain::{Room, RoomId};

use super::routing::{Envelope, RoomRoute};

/// One open room and the worker serving it
pub struct RoomHandle {
    pub id: RoomId,
    pub room: Arc<Mutex<Room>>,
    pub inbox: mpsc::UnboundedSender<Envelope>,
    pub worker: JoinHandle<()>,
}

impl RoomHandle {
    pub fn route(&self) -> RoomRoute {
        RoomRoute {
            id: self.id,
            inbox: self.inbox.clone(),
        }
    }
}

pub struct RoomTable {
    rooms: Vec<RoomHandle>,
    capacity: usize,
}

impl RoomTable {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Vec::new(),
            capacity,
        }
    }

    pub fn get(&self, id: RoomId) -> Option<&RoomHandle> {
        self.rooms.get(id.value())
    }

    /// Identifier the next opened room will receive
    pub fn next_id(&self) -> RoomId {
        RoomId::new(self.rooms.len())
    }

    pub fn push(&mut self, handle: RoomHandle) {
        self.rooms.push(handle);
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.rooms.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomHandle> {
        self.rooms.iter()
    }
}
