//! Messages exchanged between a connection task and the component that
//! currently owns the connection (the lobby or one room worker).
//!
//! A connection task forwards each line in an `Envelope` and waits for the
//! owner's `Disposition` before reading the next one, so exactly one owner
//! sees a connection's traffic at any time.

use std::net::SocketAddr;

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ConnectionId, PusherChannel, RoomId};

/// What the connection task observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Line(String),
    /// The peer closed the connection or reading failed
    Closed,
}

#[derive(Debug)]
pub struct Envelope {
    pub handle: ConnectionId,
    pub inbound: Inbound,
    pub reply: oneshot::Sender<Disposition>,
}

/// Owner's decision after handling one envelope
#[derive(Debug)]
pub enum Disposition {
    /// Keep the current owner
    Stay,
    /// Forward further traffic to this room
    Enter(RoomRoute),
    /// Forward further traffic to the lobby
    ReturnToLobby,
    /// Stop reading; the connection is being closed
    Close,
}

/// Address of a room worker
#[derive(Debug, Clone)]
pub struct RoomRoute {
    pub id: RoomId,
    pub inbox: mpsc::UnboundedSender<Envelope>,
}

/// Input of the lobby dispatcher
#[derive(Debug)]
pub enum LobbyEvent {
    /// A new connection sent its requested display name
    Connect {
        handle: ConnectionId,
        peer: SocketAddr,
        name: String,
        channel: PusherChannel,
        reply: oneshot::Sender<Disposition>,
    },
    Envelope(Envelope),
}
