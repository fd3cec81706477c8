//! AI configuration handling.
//!
//! Extracts the standard fields (`seed`, `personality`) from a JSON config
//! while preserving AI-specific custom fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::errors::domain::DomainError;

/// Play style of an AI seat. Fixed for a session and passed to the
/// decision oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Aggressive,
    Conservative,
    #[default]
    Balanced,
    Unpredictable,
}

/// Probabilities and risk appetite behind a personality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonalityTraits {
    pub bid_probability: f64,
    pub double_probability: f64,
    pub risk_tolerance: f64,
}

impl Personality {
    pub const ALL: [Personality; 4] = [
        Personality::Aggressive,
        Personality::Conservative,
        Personality::Balanced,
        Personality::Unpredictable,
    ];

    pub const fn traits(self) -> PersonalityTraits {
        match self {
            Personality::Aggressive => PersonalityTraits {
                bid_probability: 0.7,
                double_probability: 0.6,
                risk_tolerance: 0.8,
            },
            Personality::Conservative => PersonalityTraits {
                bid_probability: 0.3,
                double_probability: 0.2,
                risk_tolerance: 0.3,
            },
            Personality::Balanced => PersonalityTraits {
                bid_probability: 0.5,
                double_probability: 0.4,
                risk_tolerance: 0.5,
            },
            Personality::Unpredictable => PersonalityTraits {
                bid_probability: 0.6,
                double_probability: 0.5,
                risk_tolerance: 0.7,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Personality::Aggressive => "aggressive",
            Personality::Conservative => "conservative",
            Personality::Balanced => "balanced",
            Personality::Unpredictable => "unpredictable",
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Personality {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Personality::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::validation_other(format!("Unknown personality: {s}")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            // "normal" is the name used by older settings files
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(DomainError::validation_other(format!(
                "Unknown difficulty: {s}"
            ))),
        }
    }
}

/// Standard configuration for AI players.
///
/// # Example JSON Config
///
/// ```json
/// {"seed": 12345, "personality": "aggressive", "think_ticks": 2}
/// ```
///
/// Unknown fields are kept in `custom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// Optional RNG seed for reproducible decisions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub personality: Option<Personality>,

    /// AI-specific configuration.
    #[serde(flatten)]
    pub custom: JsonValue,
}

impl AiConfig {
    /// Build from optional JSON, falling back to an empty config when the
    /// value is absent or malformed.
    pub fn from_json(config: Option<&JsonValue>) -> Self {
        config
            .and_then(|json| serde_json::from_value(json.clone()).ok())
            .unwrap_or_else(Self::empty)
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn personality(&self) -> Personality {
        self.personality.unwrap_or_default()
    }

    pub fn get_custom(&self, key: &str) -> Option<&JsonValue> {
        self.custom.get(key)
    }

    pub fn empty() -> Self {
        Self {
            seed: None,
            personality: None,
            custom: JsonValue::Object(serde_json::Map::new()),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::empty()
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::empty()
    }
}
