//! Game configuration: timing, AI pacing and rule knobs.
//!
//! Every field has a default; `from_env` overrides them from `LANDLORD_*`
//! variables and `from_json` from persisted settings.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::ai::Difficulty;
use crate::domain::rules::DEFAULT_MAX_RESHUFFLES;
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a human seat may take before it is switched to auto-play.
    pub turn_budget_secs: u32,
    pub tick_ms: u64,
    /// Scheduler ticks an AI seat waits before acting.
    pub ai_think_ticks: u32,
    pub oracle_timeout_ms: u64,
    /// Pause after an automated decision before the next may start.
    pub ai_cooldown_ms: u64,
    pub max_reshuffles: u8,
    pub difficulty: Difficulty,
    pub hint_limit: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            turn_budget_secs: 45,
            tick_ms: 1000,
            ai_think_ticks: 3,
            oracle_timeout_ms: 8000,
            ai_cooldown_ms: 500,
            max_reshuffles: DEFAULT_MAX_RESHUFFLES,
            difficulty: Difficulty::default(),
            hint_limit: 3,
        }
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(default),
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{name}={raw:?} is invalid: {e}"))),
        Err(std::env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}

impl GameConfig {
    /// Defaults overridden by any `LANDLORD_*` variables that are set.
    pub fn from_env() -> Result<Self, AppError> {
        let d = Self::default();
        let config = Self {
            turn_budget_secs: env_or("LANDLORD_TURN_BUDGET_SECS", d.turn_budget_secs)?,
            tick_ms: env_or("LANDLORD_TICK_MS", d.tick_ms)?,
            ai_think_ticks: env_or("LANDLORD_AI_THINK_TICKS", d.ai_think_ticks)?,
            oracle_timeout_ms: env_or("LANDLORD_ORACLE_TIMEOUT_MS", d.oracle_timeout_ms)?,
            ai_cooldown_ms: env_or("LANDLORD_AI_COOLDOWN_MS", d.ai_cooldown_ms)?,
            max_reshuffles: env_or("LANDLORD_MAX_RESHUFFLES", d.max_reshuffles)?,
            difficulty: env_or("LANDLORD_DIFFICULTY", d.difficulty)?,
            hint_limit: env_or("LANDLORD_HINT_LIMIT", d.hint_limit)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(value: &JsonValue) -> Result<Self, AppError> {
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| AppError::config(format!("invalid game config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<(), AppError> {
        if self.tick_ms == 0 {
            return Err(AppError::config("tick_ms must be positive"));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }

    pub fn ai_cooldown(&self) -> Duration {
        Duration::from_millis(self.ai_cooldown_ms)
    }

    /// Human turn budget expressed in scheduler ticks, at least one.
    pub fn turn_budget_ticks(&self) -> u32 {
        let ms = u64::from(self.turn_budget_secs) * 1000;
        let ticks = ms.div_ceil(self.tick_ms.max(1));
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use serial_test::serial;

    use super::*;

    const VARS: [&str; 3] = [
        "LANDLORD_TURN_BUDGET_SECS",
        "LANDLORD_DIFFICULTY",
        "LANDLORD_TICK_MS",
    ];

    fn clear() {
        for v in VARS {
            std::env::remove_var(v);
        }
    }

    #[test]
    #[serial]
    fn from_env_uses_defaults_when_unset() {
        clear();
        assert_eq!(GameConfig::from_env().unwrap(), GameConfig::default());
    }

    #[test]
    #[serial]
    fn from_env_reads_overrides() {
        clear();
        std::env::set_var("LANDLORD_TURN_BUDGET_SECS", "10");
        std::env::set_var("LANDLORD_DIFFICULTY", "hard");
        let config = GameConfig::from_env().unwrap();
        clear();
        assert_eq!(config.turn_budget_secs, 10);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    #[serial]
    fn malformed_env_is_a_config_error() {
        clear();
        std::env::set_var("LANDLORD_TICK_MS", "soon");
        let err = GameConfig::from_env().unwrap_err();
        clear();
        assert!(matches!(err, AppError::Config { .. }));
        assert!(err.to_string().contains("LANDLORD_TICK_MS"));
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = GameConfig::from_json(&json!({"hint_limit": 5, "difficulty": "easy"})).unwrap();
        assert_eq!(config.hint_limit, 5);
        assert_eq!(config.difficulty, Difficulty::Easy);
        assert_eq!(config.ai_think_ticks, 3);
        assert!(GameConfig::from_json(&json!({"tick_ms": 0})).is_err());
    }

    #[test]
    fn turn_budget_in_ticks() {
        let config = GameConfig {
            turn_budget_secs: 3,
            tick_ms: 250,
            ..GameConfig::default()
        };
        assert_eq!(config.turn_budget_ticks(), 12);
        assert_eq!(GameConfig::default().turn_budget_ticks(), 45);
    }
}
