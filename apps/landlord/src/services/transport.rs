//! Room lobby messages and the transport that carries them.
//!
//! Delivery is neither ordered nor exactly-once, so every message is applied
//! idempotently: repeated joins are ignored, ready is set rather than
//! toggled, chat is keyed by message id and name changes carry a timestamp.
//! The round itself is never distributed; `GameStart` only fixes the seed.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::domain::rules::SEATS;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomMessage {
    PlayerJoin {
        player_id: String,
        name: String,
    },
    PlayerLeave {
        player_id: String,
    },
    ReadyChange {
        player_id: String,
        ready: bool,
    },
    Chat {
        message_id: String,
        player_id: String,
        text: String,
        /// Sender clock, unix millis.
        sent_at: i64,
    },
    NameChange {
        player_id: String,
        name: String,
        /// Sender clock, unix millis; older changes lose.
        changed_at: i64,
    },
    SettingsUpdate {
        config: GameConfig,
    },
    GameStart {
        seed: u64,
    },
}

/// A message scoped to one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomEnvelope {
    pub room_id: String,
    pub sender: String,
    pub message: RoomMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomPlayer {
    pub id: String,
    pub name: String,
    pub ready: bool,
    pub name_changed_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatLine {
    pub message_id: String,
    pub player_id: String,
    pub text: String,
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomState {
    pub room_id: String,
    pub host: Option<String>,
    pub players: Vec<RoomPlayer>,
    /// Ordered by send time, then message id.
    pub chat: Vec<ChatLine>,
    pub config: GameConfig,
    pub started: bool,
    pub seed: Option<u64>,
}

impl RoomState {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            host: None,
            players: Vec::new(),
            chat: Vec::new(),
            config: GameConfig::default(),
            started: false,
            seed: None,
        }
    }

    fn player_mut(&mut self, id: &str) -> Option<&mut RoomPlayer> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    fn is_host(&self, id: &str) -> bool {
        self.host.as_deref() == Some(id)
    }

    /// Three players seated and every guest ready.
    pub fn can_start(&self) -> bool {
        !self.started
            && self.players.len() == SEATS
            && self
                .players
                .iter()
                .filter(|p| !self.is_host(&p.id))
                .all(|p| p.ready)
    }

    /// Apply one message. Returns whether anything changed; replays and
    /// messages for other rooms change nothing.
    pub fn apply(&mut self, envelope: &RoomEnvelope) -> Result<bool, DomainError> {
        if envelope.room_id != self.room_id {
            return Ok(false);
        }
        let changed = match &envelope.message {
            RoomMessage::PlayerJoin { player_id, name } => {
                if self.players.iter().any(|p| &p.id == player_id) {
                    return Ok(false);
                }
                if self.started {
                    return Err(DomainError::conflict(
                        ConflictKind::GameAlreadyStarted,
                        format!("Room {} already started", self.room_id),
                    ));
                }
                if self.players.len() >= SEATS {
                    return Err(DomainError::conflict(
                        ConflictKind::RoomFull,
                        format!("Room {} is full", self.room_id),
                    ));
                }
                self.players.push(RoomPlayer {
                    id: player_id.clone(),
                    name: name.clone(),
                    ready: false,
                    name_changed_at: 0,
                });
                if self.host.is_none() {
                    self.host = Some(player_id.clone());
                }
                true
            }
            RoomMessage::PlayerLeave { player_id } => {
                let before = self.players.len();
                self.players.retain(|p| &p.id != player_id);
                if self.is_host(player_id) {
                    self.host = self.players.first().map(|p| p.id.clone());
                }
                before != self.players.len()
            }
            RoomMessage::ReadyChange { player_id, ready } => match self.player_mut(player_id) {
                Some(p) if p.ready != *ready => {
                    p.ready = *ready;
                    true
                }
                _ => false,
            },
            RoomMessage::Chat {
                message_id,
                player_id,
                text,
                sent_at,
            } => {
                if self.chat.iter().any(|c| &c.message_id == message_id) {
                    return Ok(false);
                }
                let line = ChatLine {
                    message_id: message_id.clone(),
                    player_id: player_id.clone(),
                    text: text.clone(),
                    sent_at: *sent_at,
                };
                let at = self
                    .chat
                    .partition_point(|c| (c.sent_at, &c.message_id) < (line.sent_at, &line.message_id));
                self.chat.insert(at, line);
                true
            }
            RoomMessage::NameChange {
                player_id,
                name,
                changed_at,
            } => match self.player_mut(player_id) {
                Some(p) if *changed_at > p.name_changed_at => {
                    p.name = name.clone();
                    p.name_changed_at = *changed_at;
                    true
                }
                _ => false,
            },
            RoomMessage::SettingsUpdate { config } => {
                if self.started || !self.is_host(&envelope.sender) {
                    warn!(room = %self.room_id, sender = %envelope.sender, "Ignoring settings update");
                    return Ok(false);
                }
                if let Err(e) = config.validate() {
                    warn!(room = %self.room_id, sender = %envelope.sender, error = %e, "Rejecting invalid settings");
                    return Ok(false);
                }
                let changed = &self.config != config;
                self.config = config.clone();
                changed
            }
            RoomMessage::GameStart { seed } => {
                if self.started {
                    return Ok(false);
                }
                if !self.is_host(&envelope.sender) || !self.can_start() {
                    warn!(room = %self.room_id, sender = %envelope.sender, "Ignoring premature game start");
                    return Ok(false);
                }
                self.started = true;
                self.seed = Some(*seed);
                true
            }
        };
        debug!(room = %self.room_id, sender = %envelope.sender, changed, "Room message applied");
        Ok(changed)
    }
}

/// Room-scoped message channel.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, envelope: RoomEnvelope) -> Result<(), AppError>;

    /// Receiver for every message sent after this call.
    fn subscribe(&self) -> broadcast::Receiver<RoomEnvelope>;

    async fn disconnect(&self) -> Result<(), AppError>;
}

/// In-process transport over a tokio broadcast channel.
pub struct LocalTransport {
    sender: broadcast::Sender<RoomEnvelope>,
    connected: AtomicBool,
}

impl LocalTransport {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            connected: AtomicBool::new(true),
        }
    }

    /// Another endpoint on the same channel.
    pub fn peer(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            connected: AtomicBool::new(true),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, envelope: RoomEnvelope) -> Result<(), AppError> {
        if !self.is_connected() {
            return Err(AppError::transport("transport is disconnected"));
        }
        // No subscribers is not an error: nobody is listening yet.
        if self.sender.send(envelope).is_err() {
            debug!("Room message dropped; no subscribers");
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<RoomEnvelope> {
        self.sender.subscribe()
    }

    async fn disconnect(&self) -> Result<(), AppError> {
        self.connected.store(false, Ordering::Release);
        Ok(())
    }
}

/// Apply everything already queued on `rx` to `room`. Rejected messages are
/// logged and skipped; returns how many changed the room.
pub fn apply_pending(rx: &mut broadcast::Receiver<RoomEnvelope>, room: &mut RoomState) -> usize {
    let mut changed = 0;
    loop {
        match rx.try_recv() {
            Ok(envelope) => match room.apply(&envelope) {
                Ok(true) => changed += 1,
                Ok(false) => {}
                Err(e) => warn!(room = %room.room_id, error = %e, "Room message rejected"),
            },
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(room = %room.room_id, skipped, "Room receiver lagged");
            }
            Err(_) => break,
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(sender: &str, message: RoomMessage) -> RoomEnvelope {
        RoomEnvelope {
            room_id: "r1".into(),
            sender: sender.into(),
            message,
        }
    }

    fn join(id: &str) -> RoomEnvelope {
        env(
            id,
            RoomMessage::PlayerJoin {
                player_id: id.into(),
                name: id.to_uppercase(),
            },
        )
    }

    fn ready(id: &str, ready: bool) -> RoomEnvelope {
        env(
            id,
            RoomMessage::ReadyChange {
                player_id: id.into(),
                ready,
            },
        )
    }

    fn chat(id: &str, at: i64) -> RoomEnvelope {
        env(
            "p1",
            RoomMessage::Chat {
                message_id: id.into(),
                player_id: "p1".into(),
                text: format!("msg {id}"),
                sent_at: at,
            },
        )
    }

    fn full_room() -> RoomState {
        let mut room = RoomState::new("r1");
        for id in ["p1", "p2", "p3"] {
            room.apply(&join(id)).unwrap();
        }
        room
    }

    #[test]
    fn duplicate_join_and_ready_are_no_ops() {
        let mut room = RoomState::new("r1");
        assert!(room.apply(&join("p1")).unwrap());
        assert!(!room.apply(&join("p1")).unwrap());
        assert!(room.apply(&ready("p1", true)).unwrap());
        assert!(!room.apply(&ready("p1", true)).unwrap());
        assert_eq!(room.players.len(), 1);
        assert_eq!(room.host.as_deref(), Some("p1"));
    }

    #[test]
    fn fourth_player_is_rejected() {
        let mut room = full_room();
        let err = room.apply(&join("p4")).unwrap_err();
        assert_eq!(err, DomainError::conflict(ConflictKind::RoomFull, "Room r1 is full"));
    }

    #[test]
    fn chat_is_deduplicated_and_ordered() {
        let mut room = RoomState::new("r1");
        room.apply(&chat("b", 20)).unwrap();
        room.apply(&chat("a", 10)).unwrap();
        assert!(!room.apply(&chat("b", 20)).unwrap());
        let ids: Vec<_> = room.chat.iter().map(|c| c.message_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn stale_name_change_is_ignored() {
        let mut room = full_room();
        let rename = |name: &str, at| {
            env(
                "p2",
                RoomMessage::NameChange {
                    player_id: "p2".into(),
                    name: name.into(),
                    changed_at: at,
                },
            )
        };
        assert!(room.apply(&rename("new", 200)).unwrap());
        assert!(!room.apply(&rename("old", 100)).unwrap());
        assert_eq!(room.players[1].name, "new");
    }

    #[test]
    fn start_needs_ready_guests_and_host() {
        let mut room = full_room();
        let start = |sender: &str| env(sender, RoomMessage::GameStart { seed: 99 });
        assert!(!room.can_start());
        room.apply(&ready("p2", true)).unwrap();
        room.apply(&ready("p3", true)).unwrap();
        assert!(room.can_start());
        assert!(!room.apply(&start("p2")).unwrap());
        assert!(room.apply(&start("p1")).unwrap());
        assert!(!room.apply(&start("p1")).unwrap());
        assert_eq!(room.seed, Some(99));
        assert!(!room.can_start());
    }

    #[test]
    fn only_host_updates_settings() {
        let mut room = full_room();
        let config = GameConfig {
            hint_limit: 1,
            ..GameConfig::default()
        };
        let update = |sender: &str| {
            env(
                sender,
                RoomMessage::SettingsUpdate {
                    config: config.clone(),
                },
            )
        };
        assert!(!room.apply(&update("p3")).unwrap());
        assert!(room.apply(&update("p1")).unwrap());
        assert_eq!(room.config.hint_limit, 1);
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let mut room = full_room();
        let update = env(
            "p1",
            RoomMessage::SettingsUpdate {
                config: GameConfig {
                    tick_ms: 0,
                    ..GameConfig::default()
                },
            },
        );
        assert!(!room.apply(&update).unwrap());
        assert_eq!(room.config, GameConfig::default());
    }

    #[test]
    fn host_leaving_hands_over() {
        let mut room = full_room();
        let leave = env("p1", RoomMessage::PlayerLeave { player_id: "p1".into() });
        assert!(room.apply(&leave).unwrap());
        assert!(!room.apply(&leave).unwrap());
        assert_eq!(room.host.as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn local_transport_delivers_to_peers() {
        let a = LocalTransport::new(16);
        let b = a.peer();
        let mut rx = b.subscribe();
        a.send(join("p1")).await.unwrap();
        a.send(join("p1")).await.unwrap();
        b.send(join("p2")).await.unwrap();

        let mut room = RoomState::new("r1");
        assert_eq!(apply_pending(&mut rx, &mut room), 2);
        assert_eq!(room.players.len(), 2);

        a.disconnect().await.unwrap();
        assert!(a.send(join("p3")).await.is_err());
        assert!(b.is_connected());
    }
}
