//! Game session - the single owner of a round and the entry point for every
//! decision, whether it comes from a human, the scheduler or a test.
//!
//! The session wraps the pure round state machine with what presentation
//! needs: seat controllers, an ordered event log, a version counter for
//! stale-result detection, hints and auto-play bookkeeping.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use time::OffsetDateTime;
use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::ai::{create_ai, decide, AiConfig, AiError, AiPlayer, Difficulty, Heuristic, Personality};
use crate::config::GameConfig;
use crate::domain::bidding::start_game;
use crate::domain::decision::{apply_decision, Decision};
use crate::domain::game_transition::Transition;
use crate::domain::hints::hints;
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::rules::{CARD_COUNT_WARNING_AT, SEATS};
use crate::domain::scoring::GameResult;
use crate::domain::snapshot::{snapshot, GameSnapshot};
use crate::domain::state::{require_seat, BidDecision, Phase, RoundState, Seat};
use crate::domain::Card;
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::services::persistence::{record_result, KeyValueStore};

/// Shared handle used by the scheduler and the presentation layer.
pub type SessionHandle = Arc<Mutex<GameSession>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    Human,
    Ai,
}

/// How to fill one seat when creating a session.
#[derive(Debug, Clone)]
pub struct SeatSpec {
    pub name: String,
    pub kind: SeatKind,
    /// Registered AI name; defaults to the heuristic.
    pub ai_type: Option<String>,
    pub ai_config: Option<JsonValue>,
}

impl SeatSpec {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SeatKind::Human,
            ai_type: None,
            ai_config: None,
        }
    }

    pub fn ai(name: impl Into<String>, ai_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: SeatKind::Ai,
            ai_type: Some(ai_type.into()),
            ai_config: None,
        }
    }

    pub fn with_ai_config(mut self, config: JsonValue) -> Self {
        self.ai_config = Some(config);
        self
    }
}

/// Why a seat went on auto-play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutoPlayReason {
    /// The player asked for it.
    Manual,
    /// The turn budget ran out.
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A change made by the round state machine.
    Round(Transition),
    AutoPlayEnabled { seat: Seat, reason: AutoPlayReason },
    AutoPlayDisabled { seat: Seat },
    CardCountWarning { seat: Seat, remaining: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEventRecord {
    pub seq: u64,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub event: SessionEvent,
}

/// A suggested play with its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub cards: Vec<Card>,
    pub description: String,
}

/// Result of charging one scheduler tick to a human seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTick {
    Waiting { remaining: u32 },
    /// Budget ran out; the seat is now on auto-play.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatStatus {
    pub seat: Seat,
    pub name: String,
    pub kind: SeatKind,
    pub personality: Personality,
    pub auto_play: bool,
    pub budget_left: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub version: u64,
    pub seats: Vec<SeatStatus>,
    #[serde(flatten)]
    pub game: GameSnapshot,
}

struct SeatSlot {
    name: String,
    kind: SeatKind,
    personality: Personality,
    auto_play: bool,
    budget_left: u32,
    /// Local decision maker: the configured AI, or the heuristic standing
    /// in for a human on auto-play.
    player: Box<dyn AiPlayer + Send + Sync>,
}

impl SeatSlot {
    fn build(spec: SeatSpec, budget: u32) -> Result<Self, AppError> {
        let personality = AiConfig::from_json(spec.ai_config.as_ref()).personality();
        let player: Box<dyn AiPlayer + Send + Sync> = match spec.kind {
            SeatKind::Human => Box::new(Heuristic::with_personality(personality)),
            SeatKind::Ai => {
                let ai_type = spec.ai_type.as_deref().unwrap_or(Heuristic::NAME);
                create_ai(ai_type, spec.ai_config.as_ref())
                    .ok_or_else(|| AppError::config(format!("Unknown AI type: {ai_type}")))?
            }
        };
        Ok(Self {
            name: spec.name,
            kind: spec.kind,
            personality,
            auto_play: false,
            budget_left: budget,
            player,
        })
    }
}

pub struct GameSession {
    id: Ulid,
    config: GameConfig,
    state: RoundState,
    seats: [SeatSlot; SEATS],
    events: Vec<SessionEventRecord>,
    next_seq: u64,
    /// Bumped on every accepted decision.
    version: u64,
    started_at: Option<OffsetDateTime>,
    /// Where finished games are folded into the local player's stats.
    stats: Option<(Arc<dyn KeyValueStore>, Seat)>,
}

impl GameSession {
    pub fn new(config: GameConfig, seats: [SeatSpec; SEATS], seed: u64) -> Result<Self, AppError> {
        config.validate()?;
        let budget = config.turn_budget_ticks();
        let [a, b, c] = seats;
        let seats = [
            SeatSlot::build(a, budget)?,
            SeatSlot::build(b, budget)?,
            SeatSlot::build(c, budget)?,
        ];
        let state = RoundState::new(seed).with_max_reshuffles(config.max_reshuffles);
        Ok(Self {
            id: Ulid::new(),
            config,
            state,
            seats,
            events: Vec::new(),
            next_seq: 0,
            version: 0,
            started_at: None,
            stats: None,
        })
    }

    /// Record every finished game into `store` from `seat`'s point of view.
    pub fn with_stats_store(mut self, store: Arc<dyn KeyValueStore>, seat: Seat) -> Self {
        self.stats = Some((store, seat));
        self
    }

    pub fn into_handle(self) -> SessionHandle {
        Arc::new(Mutex::new(self))
    }

    pub fn id(&self) -> Ulid {
        self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn current_actor(&self) -> Option<Seat> {
        self.state.current_actor()
    }

    pub fn result(&self) -> Option<&GameResult> {
        self.state.result.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::Ended
    }

    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Deal and open bidding.
    pub fn start(&mut self) -> Result<Vec<Transition>, AppError> {
        let transitions = start_game(&mut self.state)?;
        self.started_at = Some(OffsetDateTime::now_utc());
        self.version += 1;
        info!(session = %self.id, seed = self.state.seed, deal_no = self.state.deal_no, "Session started");
        Ok(self.record(transitions))
    }

    /// Apply one decision for `seat`. Rejections leave the session untouched.
    pub fn submit(&mut self, seat: Seat, decision: Decision) -> Result<Vec<Transition>, DomainError> {
        let kind = decision.kind_str();
        match apply_decision(&mut self.state, seat, decision) {
            Ok(transitions) => {
                self.version += 1;
                debug!(session = %self.id, seat, decision = kind, version = self.version, "Decision applied");
                Ok(self.record(transitions))
            }
            Err(e) if e.is_guard_rejection() => {
                warn!(session = %self.id, seat, decision = kind, error = %e, "Dropped decision");
                Err(e)
            }
            Err(e) => {
                debug!(session = %self.id, seat, decision = kind, error = %e, "Decision rejected");
                Err(e)
            }
        }
    }

    pub fn submit_bid(&mut self, seat: Seat, bid: BidDecision) -> Result<Vec<Transition>, DomainError> {
        let decision = match bid {
            BidDecision::Call => Decision::Call,
            BidDecision::Grab => Decision::Grab,
            BidDecision::Pass => Decision::Pass,
        };
        self.submit(seat, decision)
    }

    pub fn submit_multiplier_decision(
        &mut self,
        seat: Seat,
        doubled: bool,
    ) -> Result<Vec<Transition>, DomainError> {
        let decision = if doubled { Decision::Double } else { Decision::Pass };
        self.submit(seat, decision)
    }

    pub fn submit_play(&mut self, seat: Seat, cards: &[Card]) -> Result<Vec<Transition>, DomainError> {
        self.submit(seat, Decision::PlayCards(cards.to_vec()))
    }

    pub fn submit_pass(&mut self, seat: Seat) -> Result<Vec<Transition>, DomainError> {
        self.submit(seat, Decision::PassTurn)
    }

    /// Up to `hint_limit` legal plays for the seat on turn, weakest first.
    pub fn request_hint(&self, seat: Seat) -> Vec<Hint> {
        if self.state.phase != Phase::Playing || self.current_actor() != Some(seat) {
            return Vec::new();
        }
        let last = self.state.play.as_ref().and_then(|p| p.last_pattern.as_ref());
        hints(self.state.hand(seat), last, self.config.hint_limit)
            .into_iter()
            .map(|p| Hint {
                description: p.describe(),
                cards: p.cards,
            })
            .collect()
    }

    /// Flip auto-play for `seat` and return the new setting.
    pub fn toggle_auto_play(&mut self, seat: Seat) -> Result<bool, DomainError> {
        require_seat(seat)?;
        let slot = &mut self.seats[seat as usize];
        slot.auto_play = !slot.auto_play;
        let enabled = slot.auto_play;
        if enabled {
            info!(session = %self.id, seat, "Auto-play enabled");
            self.push_event(SessionEvent::AutoPlayEnabled {
                seat,
                reason: AutoPlayReason::Manual,
            });
        } else {
            slot.budget_left = self.config.turn_budget_ticks();
            info!(session = %self.id, seat, "Auto-play disabled");
            self.push_event(SessionEvent::AutoPlayDisabled { seat });
        }
        Ok(enabled)
    }

    /// Whether decisions for `seat` are made locally rather than awaited.
    pub fn is_automated(&self, seat: Seat) -> bool {
        self.seats
            .get(seat as usize)
            .is_some_and(|s| s.kind == SeatKind::Ai || s.auto_play)
    }

    pub fn seat_kind(&self, seat: Seat) -> Option<SeatKind> {
        self.seats.get(seat as usize).map(|s| s.kind)
    }

    pub fn personality(&self, seat: Seat) -> Personality {
        self.seats
            .get(seat as usize)
            .map_or(Personality::default(), |s| s.personality)
    }

    /// Charge one tick to a waiting human. Exhaustion switches the seat to
    /// auto-play.
    pub fn tick_human(&mut self, seat: Seat) -> BudgetTick {
        let Some(slot) = self.seats.get_mut(seat as usize) else {
            return BudgetTick::Exhausted;
        };
        slot.budget_left = slot.budget_left.saturating_sub(1);
        if slot.budget_left > 0 {
            return BudgetTick::Waiting {
                remaining: slot.budget_left,
            };
        }
        slot.auto_play = true;
        warn!(session = %self.id, seat, "Turn budget exhausted; switching to auto-play");
        self.push_event(SessionEvent::AutoPlayEnabled {
            seat,
            reason: AutoPlayReason::Timeout,
        });
        BudgetTick::Exhausted
    }

    pub fn view(&self, seat: Seat) -> CurrentRoundInfo {
        CurrentRoundInfo::for_seat(&self.state, seat)
    }

    /// Decision from the seat's local player.
    pub fn local_decision(&self, seat: Seat) -> Result<Decision, AiError> {
        let slot = self
            .seats
            .get(seat as usize)
            .ok_or_else(|| AiError::Internal(format!("No seat {seat}")))?;
        decide(slot.player.as_ref(), &self.view(seat))
    }

    pub fn seat_status(&self) -> Vec<SeatStatus> {
        self.seats
            .iter()
            .zip(0..)
            .map(|(s, seat)| SeatStatus {
                seat,
                name: s.name.clone(),
                kind: s.kind,
                personality: s.personality,
                auto_play: s.auto_play,
                budget_left: s.budget_left,
            })
            .collect()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.to_string(),
            version: self.version,
            seats: self.seat_status(),
            game: snapshot(&self.state),
        }
    }

    pub fn events(&self) -> &[SessionEventRecord] {
        &self.events
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SessionEventRecord> {
        std::mem::take(&mut self.events)
    }

    fn push_event(&mut self, event: SessionEvent) {
        self.events.push(SessionEventRecord {
            seq: self.next_seq,
            at: OffsetDateTime::now_utc(),
            event,
        });
        self.next_seq += 1;
    }

    /// Log transitions as events, stamp the result and reset the budget of
    /// the next seat on turn.
    fn record(&mut self, transitions: Vec<Transition>) -> Vec<Transition> {
        let mut out = Vec::with_capacity(transitions.len());
        for mut t in transitions {
            if let Transition::GameEnded { result } = &mut t {
                result.started_at = self.started_at;
                result.ended_at = Some(OffsetDateTime::now_utc());
                self.state.result = Some(result.clone());
                info!(
                    session = %self.id,
                    winner = result.winner,
                    landlord = result.landlord,
                    scores = ?result.scores,
                    "Session finished"
                );
                if let Some((store, seat)) = &self.stats {
                    if let Err(e) = record_result(store.as_ref(), result, *seat) {
                        warn!(session = %self.id, error = %e, "Failed to save player stats");
                    }
                }
            }
            let warning = match &t {
                Transition::CardsPlayed {
                    seat, remaining, ..
                } if CARD_COUNT_WARNING_AT.contains(remaining) => {
                    Some(SessionEvent::CardCountWarning {
                        seat: *seat,
                        remaining: *remaining,
                    })
                }
                _ => None,
            };
            self.push_event(SessionEvent::Round(t.clone()));
            if let Some(w) = warning {
                self.push_event(w);
            }
            out.push(t);
        }
        if let Some(next) = self.current_actor() {
            self.seats[next as usize].budget_left = self.config.turn_budget_ticks();
        }
        out
    }
}
