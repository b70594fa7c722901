//! Per-participant session driving rounds through the schedule.
//!
//! ## SessionContext
//!
//! One instance per participant; owns the RNG, ledger, balance, schedule
//! position, and the at-most-one in-flight round. Player actions arrive
//! as explicit events (`on_first_choice`, `on_second_choice`) that drive
//! the round engine directly and return a result, instead of re-deriving
//! state from session-wide flags on every interaction.
//!
//! Sessions are independent: nothing here is shared between instances,
//! and each submitted choice is processed synchronously to completion
//! before the next input is accepted.
//!
//! ## Snapshots
//!
//! [`SessionSnapshot`] captures the whole session (RNG position, cursor,
//! balance, ledger, in-flight round) so an interrupted session can
//! resume. Snapshot bytes use a compact binary encoding.

use serde::{Deserialize, Serialize};

use crate::core::{
    EngineError, RewardRule, RngState, RoundOutcome, RoundRng, RoundState, Slot, Stage,
};

use super::config::SessionConfig;
use super::ledger::{Ledger, RoundRecord, SessionSummary};

/// Where a session currently is in its schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Unscored warm-up rounds.
    Trial,
    /// Scored rounds inside the configured blocks.
    Scored,
    /// Schedule exhausted.
    Complete,
}

/// One participant's session: schedule cursor, balance, ledger, and the
/// at-most-one round in flight.
#[derive(Clone, Debug)]
pub struct SessionContext {
    config: SessionConfig,
    rng: RoundRng,
    ledger: Ledger,
    active: Option<RoundState>,
    trial_remaining: u32,
    scored_index: u32,
    balance: i64,
}

impl SessionContext {
    /// Create a session from its configuration.
    ///
    /// Seeds the RNG from the configured seed, or from entropy when the
    /// configuration leaves it unset.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => RoundRng::new(seed),
            None => RoundRng::from_entropy(),
        };
        let trial_remaining = config.trial_rounds;

        Self {
            config,
            rng,
            ledger: Ledger::new(),
            active: None,
            trial_remaining,
            scored_index: 0,
            balance: 0,
        }
    }

    /// Handle the participant's first pick.
    ///
    /// Starts the next scheduled round if none is in flight, submits the
    /// pick, and returns the revealed losing slot. Fails with
    /// `InvalidTransition` if the schedule is exhausted or a round is
    /// already past its first pick.
    pub fn on_first_choice(&mut self, choice: Slot) -> Result<Slot, EngineError> {
        if self.active.is_none() {
            if self.phase() == SessionPhase::Complete {
                return Err(EngineError::InvalidTransition {
                    expected: Stage::AwaitingFirst,
                    actual: Stage::Resolved,
                });
            }
            self.active = Some(RoundState::new(&mut self.rng));
        }

        match self.active.as_mut() {
            Some(round) => round.submit_first_choice(choice, &mut self.rng),
            None => Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingFirst,
                actual: Stage::Resolved,
            }),
        }
    }

    /// Handle the participant's keep-or-switch pick.
    ///
    /// Pre-computes the reward delta and enforces the points floor (if
    /// one is configured) *before* submitting, since the engine never
    /// rolls back a submitted choice; then resolves the round. Scored
    /// rounds are appended to the ledger and applied to the balance;
    /// trial rounds are returned for display but leave both untouched.
    pub fn on_second_choice(&mut self, choice: Slot) -> Result<RoundRecord, EngineError> {
        let scored = self.trial_remaining == 0;
        let rule = match self.current_rule() {
            Some(rule) => rule,
            None => {
                return Err(EngineError::InvalidTransition {
                    expected: Stage::AwaitingSecond,
                    actual: Stage::Resolved,
                })
            }
        };
        let round = match self.active.as_mut() {
            Some(round) => round,
            None => {
                return Err(EngineError::InvalidTransition {
                    expected: Stage::AwaitingSecond,
                    actual: Stage::AwaitingFirst,
                })
            }
        };
        if round.stage() != Stage::AwaitingSecond {
            return Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingSecond,
                actual: round.stage(),
            });
        }
        if round.revealed() == Some(choice) {
            return Err(EngineError::InvalidChoice { revealed: choice });
        }
        let first = match round.first_choice() {
            Some(slot) => slot,
            None => {
                return Err(EngineError::InvalidTransition {
                    expected: Stage::AwaitingSecond,
                    actual: round.stage(),
                })
            }
        };

        let reward = rule.evaluate(first, choice, round.hidden_target());
        if scored {
            if let Some(floor) = self.config.points_floor {
                if self.balance + reward.points_delta < floor {
                    return Err(EngineError::InsufficientBalance {
                        balance: self.balance,
                        delta: reward.points_delta,
                    });
                }
            }
        }

        let outcome = round.submit_second_choice(choice)?;
        let record = archive_round(round, self.scored_index, rule, outcome, reward.points_delta)?;

        self.active = None;
        if scored {
            self.balance += record.points_delta;
            self.ledger.append(record);
            self.scored_index += 1;
            log::debug!(
                "round {} resolved: won={} switched={} delta={}",
                record.round_index,
                record.won,
                record.switched,
                record.points_delta
            );
            if self.phase() == SessionPhase::Complete {
                log::info!(
                    "session {} complete: {} rounds, {} points",
                    self.config.participant,
                    self.ledger.len(),
                    self.balance
                );
            }
        } else {
            self.trial_remaining -= 1;
            log::debug!("trial round resolved: won={}", record.won);
        }

        Ok(record)
    }

    /// Skip any remaining trial rounds and move to the first block.
    ///
    /// An in-flight trial round is abandoned; nothing needs releasing.
    pub fn end_trial(&mut self) {
        if self.trial_remaining > 0 {
            self.trial_remaining = 0;
            self.active = None;
        }
    }

    // === Accessors ===

    /// Where the session is in its schedule.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.trial_remaining > 0 {
            SessionPhase::Trial
        } else if self.scored_index < self.config.scored_rounds() {
            SessionPhase::Scored
        } else {
            SessionPhase::Complete
        }
    }

    /// Whether the schedule is exhausted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Complete
    }

    /// Rule governing the next (or current) round. Trial rounds run
    /// under [`RewardRule::Flat`]; `None` once the schedule is done.
    #[must_use]
    pub fn current_rule(&self) -> Option<RewardRule> {
        match self.phase() {
            SessionPhase::Trial => Some(RewardRule::Flat),
            SessionPhase::Scored => self.config.rule_at(self.scored_index),
            SessionPhase::Complete => None,
        }
    }

    /// Stage of the in-flight round, if any.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.active.as_ref().map(RoundState::stage)
    }

    /// The in-flight round, if any.
    #[must_use]
    pub fn active_round(&self) -> Option<&RoundState> {
        self.active.as_ref()
    }

    /// Cumulative points over scored rounds.
    #[must_use]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Scored rounds resolved so far.
    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.scored_index
    }

    /// The session's ledger.
    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Aggregate summary of the ledger.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        self.ledger.summary()
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The participant identifier.
    #[must_use]
    pub fn participant(&self) -> &str {
        &self.config.participant
    }

    // === Snapshots ===

    /// Capture the full session state for checkpointing.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config.clone(),
            rng: self.rng.state(),
            ledger: self.ledger.clone(),
            active: self.active.clone(),
            trial_remaining: self.trial_remaining,
            scored_index: self.scored_index,
            balance: self.balance,
        }
    }

    /// Resume a session from a snapshot.
    #[must_use]
    pub fn restore(snapshot: SessionSnapshot) -> Self {
        Self {
            rng: RoundRng::from_state(&snapshot.rng),
            config: snapshot.config,
            ledger: snapshot.ledger,
            active: snapshot.active,
            trial_remaining: snapshot.trial_remaining,
            scored_index: snapshot.scored_index,
            balance: snapshot.balance,
        }
    }
}

/// Serializable capture of a whole session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session configuration.
    pub config: SessionConfig,
    /// RNG position.
    pub rng: RngState,
    /// Resolved scored rounds.
    pub ledger: Ledger,
    /// In-flight round, if one was open at capture.
    pub active: Option<RoundState>,
    /// Trial rounds still to play.
    pub trial_remaining: u32,
    /// Next scored round index.
    pub scored_index: u32,
    /// Cumulative points.
    pub balance: i64,
}

impl SessionSnapshot {
    /// Encode to compact binary bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode from bytes produced by [`SessionSnapshot::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Build the ledger record for a resolved round. The target accessor
/// gates on resolution, so an unresolved round cannot be archived.
fn archive_round(
    round: &RoundState,
    round_index: u32,
    rule: RewardRule,
    outcome: RoundOutcome,
    points_delta: i64,
) -> Result<RoundRecord, EngineError> {
    match (
        round.first_choice(),
        round.revealed(),
        round.second_choice(),
        round.target(),
    ) {
        (Some(first_choice), Some(revealed), Some(second_choice), Some(target)) => Ok(RoundRecord {
            round_index,
            first_choice,
            revealed,
            second_choice,
            target,
            won: outcome.won,
            switched: outcome.switched,
            points_delta,
            rule_applied: rule,
        }),
        _ => Err(EngineError::InvalidTransition {
            expected: Stage::Resolved,
            actual: round.stage(),
        }),
    }
}
