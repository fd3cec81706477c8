//! Services that sit between the pure domain and the outside world: the
//! game session, its turn scheduler, the room transport and persistence.

pub mod persistence;
pub mod scheduler;
pub mod session;
pub mod transport;

pub use persistence::{GameSettings, JsonFileStore, KeyValueStore, MemoryStore, PlayerStats};
pub use scheduler::{DecisionSource, TickOutcome, TurnScheduler};
pub use session::{GameSession, SeatKind, SeatSpec, SessionEvent, SessionHandle};
pub use transport::{LocalTransport, RoomEnvelope, RoomMessage, RoomState, Transport};
