//! Key-value persistence for player statistics and settings.
//!
//! Stores hold plain JSON values; typed records go through [`load`] and
//! [`save`].

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::domain::scoring::GameResult;
use crate::domain::state::Seat;
use crate::error::AppError;

pub const PLAYER_STATS_KEY: &str = "player_stats";
pub const SETTINGS_KEY: &str = "settings";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, AppError>;
    fn put(&self, key: &str, value: JsonValue) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, AppError> {
    store
        .get(key)?
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| AppError::storage(format!("corrupt record {key}: {e}")))
        })
        .transpose()
}

pub fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), AppError> {
    store.put(key, serde_json::to_value(value)?)
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, JsonValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, AppError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: JsonValue) -> Result<(), AppError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// All keys in one JSON object file, rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, JsonValue>, AppError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<JsonValue>(&raw)? {
            JsonValue::Object(map) => Ok(map),
            _ => Err(AppError::storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }

    fn write_all(&self, map: Map<String, JsonValue>) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&JsonValue::Object(map))?)?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "Store written");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<JsonValue>, AppError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: JsonValue) -> Result<(), AppError> {
        let _guard = self.lock.lock();
        let mut map = self.read_all()?;
        map.insert(key.to_string(), value);
        self.write_all(map)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let _guard = self.lock.lock();
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(map)?;
        }
        Ok(())
    }
}

/// Lifetime statistics for the local player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub total_games: u32,
    pub wins: u32,
    pub total_score: i64,
    /// Whole percent.
    pub win_rate: u32,
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_played: Option<OffsetDateTime>,
}

impl PlayerStats {
    /// Fold one finished game in, from `seat`'s point of view.
    pub fn record(&mut self, result: &GameResult, seat: Seat) {
        let won = (seat == result.landlord) == result.landlord_won;
        self.total_games += 1;
        if won {
            self.wins += 1;
        }
        self.total_score += result.scores.get(seat as usize).copied().unwrap_or(0);
        self.win_rate = (f64::from(self.wins) * 100.0 / f64::from(self.total_games)).round() as u32;
        self.last_played = Some(result.ended_at.unwrap_or_else(OffsetDateTime::now_utc));
    }
}

/// Load, update and store the statistics for `seat`.
pub fn record_result(
    store: &dyn KeyValueStore,
    result: &GameResult,
    seat: Seat,
) -> Result<PlayerStats, AppError> {
    let mut stats: PlayerStats = load(store, PLAYER_STATS_KEY)?.unwrap_or_default();
    stats.record(result, seat);
    save(store, PLAYER_STATS_KEY, &stats)?;
    info!(
        total_games = stats.total_games,
        wins = stats.wins,
        win_rate = stats.win_rate,
        "Player stats updated"
    );
    Ok(stats)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Seconds before a human seat is put on auto-play.
    pub auto_play_timeout: u32,
    pub show_card_hints: bool,
    pub sound_enabled: bool,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            auto_play_timeout: 45,
            show_card_hints: true,
            sound_enabled: true,
        }
    }
}

impl GameSettings {
    pub fn load(store: &dyn KeyValueStore) -> Result<Self, AppError> {
        Ok(load(store, SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), AppError> {
        save(store, SETTINGS_KEY, self)
    }

    /// Carry the settings that affect play into `config`.
    pub fn apply_to(&self, config: &mut GameConfig) {
        config.turn_budget_secs = self.auto_play_timeout;
        if !self.show_card_hints {
            config.hint_limit = 0;
        }
    }
}
