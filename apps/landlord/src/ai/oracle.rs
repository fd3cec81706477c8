//! Decision oracle boundary.
//!
//! An oracle is an external advisor (typically a hosted language model)
//! asked for a decision in free text. Its answers are untrusted: they are
//! extracted, parsed and checked against the legal options here, and any
//! failure is reported as an [`OracleError`] so the caller can fall back to
//! the local heuristic.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ai::config::{Difficulty, Personality};
use crate::domain::compare::beats;
use crate::domain::decision::Decision;
use crate::domain::patterns::classify;
use crate::domain::player_view::{CurrentRoundInfo, Role};
use crate::domain::rules::SEATS;
use crate::domain::state::{
    BidDecision, BidRecord, BiddingPhase, MultiplierRecord, Phase, PlayAction, Seat,
};
use crate::domain::{Card, Rank};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
    #[error("oracle daily request limit reached ({limit})")]
    RateLimited { limit: u32 },
    #[error("oracle timed out after {0:?}")]
    Timeout(Duration),
    #[error("oracle http error: {0}")]
    Http(String),
    #[error("oracle response rejected: {0}")]
    Parse(String),
}

/// One play in the oracle's view of the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OraclePlay {
    pub seat: Seat,
    /// Card tokens; empty for a pass.
    pub cards: Vec<String>,
}

/// Everything an oracle is told about a decision point. Only information
/// visible to the deciding seat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleContext {
    pub phase: Phase,
    pub bidding_phase: Option<BiddingPhase>,
    pub seat: Seat,
    pub role: Role,
    pub current_cards: Vec<String>,
    pub played_cards: Vec<String>,
    pub remaining_cards: [usize; SEATS],
    pub last_play: Vec<String>,
    pub bidding_history: Vec<BidRecord>,
    pub multiplier_history: Vec<MultiplierRecord>,
    pub play_history: Vec<OraclePlay>,
    pub multiplier: u32,
    pub personality: Personality,
    pub difficulty: Difficulty,
}

fn tokens(cards: &[Card]) -> Vec<String> {
    cards.iter().map(Card::token).collect()
}

impl OracleContext {
    pub fn from_view(
        view: &CurrentRoundInfo,
        personality: Personality,
        difficulty: Difficulty,
    ) -> Self {
        let play_history: Vec<OraclePlay> = view
            .play_history
            .iter()
            .map(|r| OraclePlay {
                seat: r.seat,
                cards: match &r.action {
                    PlayAction::Play { pattern } => tokens(&pattern.cards),
                    PlayAction::Pass => Vec::new(),
                },
            })
            .collect();
        Self {
            phase: view.phase,
            bidding_phase: view.bidding_phase,
            seat: view.seat,
            role: view.role,
            current_cards: tokens(&view.hand),
            played_cards: play_history.iter().flat_map(|p| p.cards.clone()).collect(),
            remaining_cards: view.hand_counts,
            last_play: view
                .last_pattern
                .as_ref()
                .map(|p| tokens(&p.cards))
                .unwrap_or_default(),
            bidding_history: view.bid_history.clone(),
            multiplier_history: view.multiplier_history.clone(),
            play_history,
            multiplier: view.multiplier,
            personality,
            difficulty,
        }
    }
}

fn default_confidence() -> f64 {
    0.5
}

/// Raw oracle answer, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleResponse {
    pub decision: String,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
}

#[async_trait]
pub trait DecisionOracle: Send + Sync {
    /// Ask for a decision. `Ok(None)` means the oracle declined (not
    /// configured, nothing to say); callers treat it like an error.
    async fn decide(&self, context: &OracleContext)
        -> Result<Option<OracleResponse>, OracleError>;
}

struct OracleRegexRegistry;

impl OracleRegexRegistry {
    /// A JSON object with at most one level of nesting.
    fn json_object() -> &'static Regex {
        static RE: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?s)\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap()
        });
        &RE
    }

    fn trailing_comma() -> &'static Regex {
        static RE: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r",\s*([}\]])").unwrap()
        });
        &RE
    }

    fn line_comment() -> &'static Regex {
        static RE: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"(?m)^\s*//[^\r\n]*$").unwrap()
        });
        &RE
    }

    fn decision_field() -> &'static Regex {
        static RE: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r#"(?i)"decision"\s*:\s*"([^"]+)""#).unwrap()
        });
        &RE
    }

    fn confidence_field() -> &'static Regex {
        static RE: Lazy<Regex> = Lazy::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r#"(?i)"confidence"\s*:\s*([0-9.]+)"#).unwrap()
        });
        &RE
    }
}

/// Pull the decision JSON out of free text: a bare object, an object with
/// trailing commas or comment lines, or failing both a loose
/// `"decision": "..."` field.
pub fn extract_response(text: &str) -> Result<OracleResponse, OracleError> {
    if let Some(m) = OracleRegexRegistry::json_object().find(text) {
        let cleaned = OracleRegexRegistry::line_comment().replace_all(m.as_str(), "");
        let cleaned = OracleRegexRegistry::trailing_comma().replace_all(&cleaned, "$1");
        if let Ok(parsed) = serde_json::from_str::<OracleResponse>(&cleaned) {
            return Ok(parsed);
        }
    }
    let decision = OracleRegexRegistry::decision_field()
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| OracleError::Parse("no decision found in response".into()))?;
    let confidence = OracleRegexRegistry::confidence_field()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or_else(default_confidence);
    Ok(OracleResponse {
        decision,
        confidence,
        reasoning: String::new(),
    })
}

fn rank_from_label(label: &str) -> Option<Rank> {
    let rank = match label.to_ascii_uppercase().as_str() {
        "3" => Rank::Three,
        "4" => Rank::Four,
        "5" => Rank::Five,
        "6" => Rank::Six,
        "7" => Rank::Seven,
        "8" => Rank::Eight,
        "9" => Rank::Nine,
        "10" | "T" => Rank::Ten,
        "J" => Rank::Jack,
        "Q" => Rank::Queen,
        "K" => Rank::King,
        "A" => Rank::Ace,
        "2" => Rank::Two,
        "SJ" => Rank::SmallJoker,
        "BJ" => Rank::BigJoker,
        _ => return None,
    };
    Some(rank)
}

/// Map oracle card text onto cards in `hand`. Tokens may be full card
/// tokens ("7H") or bare ranks ("7", "10", "K"); bare ranks take the
/// lowest-suited unused card of that rank.
pub fn resolve_cards(hand: &[Card], text: &str) -> Result<Vec<Card>, OracleError> {
    let mut picked: Vec<Card> = Vec::new();
    for token in text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let exact = token
            .parse::<Card>()
            .ok()
            .filter(|c| hand.contains(c) && !picked.contains(c));
        let card = match exact {
            Some(card) => card,
            None => {
                let rank = rank_from_label(token)
                    .ok_or_else(|| OracleError::Parse(format!("unknown card token {token}")))?;
                let mut candidates: Vec<Card> = hand
                    .iter()
                    .copied()
                    .filter(|c| c.rank == rank && !picked.contains(c))
                    .collect();
                candidates.sort();
                candidates
                    .first()
                    .copied()
                    .ok_or_else(|| OracleError::Parse(format!("{token} is not in hand")))?
            }
        };
        picked.push(card);
    }
    if picked.is_empty() {
        return Err(OracleError::Parse("empty play".into()));
    }
    picked.sort();
    Ok(picked)
}

/// Validate an oracle decision string into a legal [`Decision`] for the
/// seat described by `view`.
pub fn parse_decision(raw: &str, view: &CurrentRoundInfo) -> Result<Decision, OracleError> {
    let normalized = raw.trim().to_ascii_lowercase();
    let reject = || OracleError::Parse(format!("{raw:?} is not legal during {:?}", view.phase));
    match view.phase {
        Phase::Bidding => {
            let bid = match normalized.as_str() {
                "call" => BidDecision::Call,
                "grab" => BidDecision::Grab,
                "pass" => BidDecision::Pass,
                _ => return Err(reject()),
            };
            if !view.legal_bids().contains(&bid) {
                return Err(reject());
            }
            Ok(match bid {
                BidDecision::Call => Decision::Call,
                BidDecision::Grab => Decision::Grab,
                BidDecision::Pass => Decision::Pass,
            })
        }
        Phase::Multiplier => match normalized.as_str() {
            "double" => Ok(Decision::Double),
            "pass" => Ok(Decision::Pass),
            _ => Err(reject()),
        },
        Phase::Playing => {
            if normalized == "pass" {
                return if view.can_pass() {
                    Ok(Decision::PassTurn)
                } else {
                    Err(reject())
                };
            }
            let cards = resolve_cards(&view.hand, raw)?;
            let pattern = classify(&cards);
            let legal = pattern.is_valid()
                && view.last_pattern.as_ref().map_or(true, |last| beats(&pattern, last));
            if !legal {
                return Err(reject());
            }
            Ok(Decision::PlayCards(cards))
        }
        Phase::Waiting | Phase::Ended => Err(reject()),
    }
}
