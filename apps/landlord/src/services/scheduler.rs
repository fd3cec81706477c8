//! Turn scheduler - drives automated seats and human turn budgets on a
//! fixed tick.
//!
//! Each tick looks at whose decision is outstanding. Human seats are charged
//! one tick of their budget; automated seats (AI or auto-play) go through the
//! decision pipeline: the oracle first, bounded by a timeout, then the seat's
//! local player. The session lock is never held across the oracle call, so a
//! result that arrives after the round moved on is discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::ai::oracle::{parse_decision, DecisionOracle, OracleContext};
use crate::ai::{Difficulty, Personality};
use crate::domain::decision::{legal_decisions, Decision};
use crate::domain::player_view::CurrentRoundInfo;
use crate::domain::state::Seat;
use crate::services::session::{BudgetTick, GameSession, SeatKind, SessionHandle};

/// Maximum local attempts per automated decision.
const MAX_RETRIES_PER_ACTION: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionSource {
    Oracle,
    /// The seat's own AI player or heuristic.
    Local,
    /// First legal decision, used when the local player keeps failing.
    FirstLegal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Paused,
    /// Nothing outstanding: not started or finished.
    Idle,
    /// A decision is in flight or cooling down.
    Busy,
    HumanWaiting {
        seat: Seat,
        remaining: u32,
    },
    AutoPlayEnabled {
        seat: Seat,
    },
    Thinking {
        seat: Seat,
    },
    Applied {
        seat: Seat,
        decision: Decision,
        source: DecisionSource,
    },
    /// The round changed while the oracle was consulted.
    Stale {
        seat: Seat,
    },
    Failed {
        seat: Seat,
    },
}

#[derive(Debug, Clone, Copy)]
struct ThinkState {
    seat: Seat,
    version: u64,
    waited: u32,
}

/// Clears the processing flag on every exit path.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What the decision pipeline needs, captured under the lock.
struct PendingDecision {
    seat: Seat,
    version: u64,
    view: CurrentRoundInfo,
    personality: Personality,
    difficulty: Difficulty,
    oracle_timeout: std::time::Duration,
}

pub struct TurnScheduler {
    session: SessionHandle,
    oracle: Option<Arc<dyn DecisionOracle>>,
    paused: AtomicBool,
    processing: AtomicBool,
    cooldown_until: Mutex<Option<Instant>>,
    thinking: Mutex<Option<ThinkState>>,
}

impl TurnScheduler {
    pub fn new(session: SessionHandle, oracle: Option<Arc<dyn DecisionOracle>>) -> Self {
        Self {
            session,
            oracle,
            paused: AtomicBool::new(false),
            processing: AtomicBool::new(false),
            cooldown_until: Mutex::new(None),
            thinking: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
        info!("Scheduler paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        info!("Scheduler resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    fn try_begin(&self) -> Option<ProcessingGuard<'_>> {
        self.processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(&self.processing))
    }

    fn cooling_down(&self) -> bool {
        self.cooldown_until
            .lock()
            .is_some_and(|until| Instant::now() < until)
    }

    /// Count a think tick for `seat` at `version`; true once it has waited
    /// long enough.
    fn done_thinking(&self, seat: Seat, version: u64, think_ticks: u32) -> bool {
        let mut thinking = self.thinking.lock();
        let waited = match thinking.as_mut() {
            Some(t) if t.seat == seat && t.version == version => {
                t.waited += 1;
                t.waited
            }
            _ => {
                *thinking = Some(ThinkState {
                    seat,
                    version,
                    waited: 0,
                });
                0
            }
        };
        waited >= think_ticks
    }

    /// Run one scheduler step.
    pub async fn tick(&self) -> TickOutcome {
        if self.is_paused() {
            return TickOutcome::Paused;
        }
        if self.cooling_down() {
            return TickOutcome::Busy;
        }
        let Some(_guard) = self.try_begin() else {
            return TickOutcome::Busy;
        };

        let pending = {
            let mut session = self.session.lock();
            let Some(seat) = session.current_actor() else {
                return TickOutcome::Idle;
            };
            if !session.is_automated(seat) {
                return match session.tick_human(seat) {
                    BudgetTick::Waiting { remaining } => {
                        TickOutcome::HumanWaiting { seat, remaining }
                    }
                    BudgetTick::Exhausted => TickOutcome::AutoPlayEnabled { seat },
                };
            }
            let version = session.version();
            let think_ticks = session.config().ai_think_ticks;
            if session.seat_kind(seat) == Some(SeatKind::Ai)
                && !self.done_thinking(seat, version, think_ticks)
            {
                return TickOutcome::Thinking { seat };
            }
            PendingDecision {
                seat,
                version,
                view: session.view(seat),
                personality: session.personality(seat),
                difficulty: session.difficulty(),
                oracle_timeout: session.config().oracle_timeout(),
            }
        };

        let oracle_decision = match self.oracle.as_deref() {
            Some(oracle) => ask_oracle(oracle, &pending).await,
            None => None,
        };

        let outcome = {
            let mut session = self.session.lock();
            if session.version() != pending.version || session.current_actor() != Some(pending.seat)
            {
                info!(seat = pending.seat, "Discarding stale decision");
                return TickOutcome::Stale { seat: pending.seat };
            }
            apply_automated(&mut session, pending.seat, oracle_decision)
        };

        let cooldown = self.session.lock().config().ai_cooldown();
        *self.cooldown_until.lock() = Some(Instant::now() + cooldown);
        outcome
    }

    /// Tick on the configured interval until the game ends or `shutdown`
    /// flips to true.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        let period = self.session.lock().config().tick();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let outcome = self.tick().await;
                    debug!(?outcome, "Scheduler tick");
                    let over = self.session.lock().is_over();
                    if over {
                        info!("Game over; scheduler stopping");
                        break;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler shut down");
                        break;
                    }
                }
            }
        }
    }
}

async fn ask_oracle(oracle: &dyn DecisionOracle, pending: &PendingDecision) -> Option<Decision> {
    let seat = pending.seat;
    let context = OracleContext::from_view(&pending.view, pending.personality, pending.difficulty);
    match tokio::time::timeout(pending.oracle_timeout, oracle.decide(&context)).await {
        Err(_) => {
            warn!(seat, timeout = ?pending.oracle_timeout, "Decision oracle timed out; using local player");
            None
        }
        Ok(Err(e)) => {
            warn!(seat, error = %e, "Decision oracle failed; using local player");
            None
        }
        Ok(Ok(None)) => {
            debug!(seat, "Decision oracle declined");
            None
        }
        Ok(Ok(Some(response))) => match parse_decision(&response.decision, &pending.view) {
            Ok(decision) => {
                debug!(seat, confidence = response.confidence, reasoning = %response.reasoning, "Oracle decision");
                Some(decision)
            }
            Err(e) => {
                warn!(seat, error = %e, "Oracle answer unusable; using local player");
                None
            }
        },
    }
}

fn apply_automated(
    session: &mut GameSession,
    seat: Seat,
    oracle_decision: Option<Decision>,
) -> TickOutcome {
    info!(seat, phase = ?session.state().phase, "Processing AI turn");

    if let Some(decision) = oracle_decision {
        match session.submit(seat, decision.clone()) {
            Ok(_) => {
                return TickOutcome::Applied {
                    seat,
                    decision,
                    source: DecisionSource::Oracle,
                }
            }
            Err(e) => warn!(seat, error = %e, "Oracle decision rejected; using local player"),
        }
    }

    for retry in 0..MAX_RETRIES_PER_ACTION {
        let decision = match session.local_decision(seat) {
            Ok(d) => d,
            Err(e) => {
                warn!(seat, retry, error = %e, "AI action failed");
                continue;
            }
        };
        match session.submit(seat, decision.clone()) {
            Ok(_) => {
                return TickOutcome::Applied {
                    seat,
                    decision,
                    source: DecisionSource::Local,
                }
            }
            Err(e) => warn!(seat, retry, error = %e, "AI action failed"),
        }
    }

    let Some(decision) = legal_decisions(session.state(), seat).into_iter().next() else {
        error!(seat, "No legal decision available for automated seat");
        return TickOutcome::Failed { seat };
    };
    match session.submit(seat, decision.clone()) {
        Ok(_) => TickOutcome::Applied {
            seat,
            decision,
            source: DecisionSource::FirstLegal,
        },
        Err(e) => {
            error!(seat, error = %e, "AI failed to act after retries");
            TickOutcome::Failed { seat }
        }
    }
}
