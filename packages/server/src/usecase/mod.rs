//! UseCase layer: the lobby dispatcher logic and the room workers.

pub mod lobby;
pub mod room_table;
pub mod room_worker;
pub mod routing;
pub mod state;

pub use lobby::{LobbyStage, LobbyUseCase};
pub use room_table::{RoomHandle, RoomTable};
pub use room_worker::{RoomWorker, deliver, open_room};
pub use routing::{Disposition, Envelope, Inbound, LobbyEvent, RoomRoute};
pub use state::ChatState;
