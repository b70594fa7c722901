//! Round state machine: first pick, reveal, second pick, resolution.
//!
//! ## Lifecycle
//!
//! `AwaitingFirst → AwaitingSecond → Resolved`, one [`RoundState`] per
//! round, fresh uniform target per round. The two submission operations
//! are the only mutations; a rejected operation leaves the round in its
//! prior stage.
//!
//! ## Invariants
//!
//! - The revealed slot is never the first choice and never the target.
//! - The second choice is never the revealed slot.
//! - The reveal is drawn uniformly among the eligible losing slots,
//!   whether one or two are eligible. Uniform selection is what makes
//!   always-switch win 2/3 of rounds.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::EngineError;
use super::rng::RoundRng;
use super::slot::{Slot, SLOT_COUNT};

/// Stage of a round's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for the participant's first pick.
    AwaitingFirst,
    /// One losing slot revealed; waiting for the keep-or-switch pick.
    AwaitingSecond,
    /// Both picks submitted; outcome available.
    Resolved,
}

/// Win/switch classification of a resolved round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    /// Second choice landed on the target.
    pub won: bool,
    /// Second choice differed from the first.
    pub switched: bool,
}

/// State of a single round, owned by one session at a time.
///
/// The hidden target is not observable through the public API until the
/// round resolves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    target: Slot,
    first_choice: Option<Slot>,
    revealed: Option<Slot>,
    second_choice: Option<Slot>,
    stage: Stage,
}

impl RoundState {
    /// Start a round with a fresh uniformly drawn target.
    #[must_use]
    pub fn new(rng: &mut RoundRng) -> Self {
        Self::with_target(rng.draw_slot())
    }

    /// Start a round with a known target, for replays and tests.
    #[must_use]
    pub fn with_target(target: Slot) -> Self {
        Self {
            target,
            first_choice: None,
            revealed: None,
            second_choice: None,
            stage: Stage::AwaitingFirst,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The first pick, once submitted.
    #[must_use]
    pub fn first_choice(&self) -> Option<Slot> {
        self.first_choice
    }

    /// The revealed losing slot, once the first pick is in.
    #[must_use]
    pub fn revealed(&self) -> Option<Slot> {
        self.revealed
    }

    /// The second pick, once submitted.
    #[must_use]
    pub fn second_choice(&self) -> Option<Slot> {
        self.second_choice
    }

    /// The target slot, observable only after resolution.
    #[must_use]
    pub fn target(&self) -> Option<Slot> {
        (self.stage == Stage::Resolved).then_some(self.target)
    }

    /// Target access for the session layer's pre-submission reward check.
    pub(crate) fn hidden_target(&self) -> Slot {
        self.target
    }

    /// Submit the first pick and reveal one losing slot.
    ///
    /// The reveal is drawn uniformly from the slots that are neither the
    /// pick nor the target: one candidate when the pick is the target,
    /// two otherwise. Returns the revealed slot and transitions to
    /// [`Stage::AwaitingSecond`].
    pub fn submit_first_choice(
        &mut self,
        choice: Slot,
        rng: &mut RoundRng,
    ) -> Result<Slot, EngineError> {
        if self.stage != Stage::AwaitingFirst {
            return Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingFirst,
                actual: self.stage,
            });
        }

        let eligible: SmallVec<[Slot; 2]> = Slot::all()
            .filter(|s| *s != choice && *s != self.target)
            .collect();
        // 1 candidate when choice == target, 2 otherwise; never empty
        let revealed = eligible[rng.gen_range_usize(0..eligible.len())];

        self.first_choice = Some(choice);
        self.revealed = Some(revealed);
        self.stage = Stage::AwaitingSecond;
        Ok(revealed)
    }

    /// Submit the keep-or-switch pick and resolve the round.
    ///
    /// Fails with [`EngineError::InvalidChoice`] if `choice` is the
    /// revealed slot; the round stays in [`Stage::AwaitingSecond`].
    pub fn submit_second_choice(&mut self, choice: Slot) -> Result<RoundOutcome, EngineError> {
        if self.stage != Stage::AwaitingSecond {
            return Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingSecond,
                actual: self.stage,
            });
        }
        if self.revealed == Some(choice) {
            return Err(EngineError::InvalidChoice { revealed: choice });
        }

        self.second_choice = Some(choice);
        self.stage = Stage::Resolved;
        self.outcome()
    }

    /// Win/switch classification, available once resolved.
    pub fn outcome(&self) -> Result<RoundOutcome, EngineError> {
        if self.stage != Stage::Resolved {
            return Err(EngineError::InvalidTransition {
                expected: Stage::Resolved,
                actual: self.stage,
            });
        }
        Ok(RoundOutcome {
            won: self.second_choice == Some(self.target),
            switched: self.second_choice != self.first_choice,
        })
    }

    /// The slot a switching participant would take: the one that is
    /// neither the first choice nor the revealed slot. Valid only in
    /// [`Stage::AwaitingSecond`].
    pub fn switch_slot(&self) -> Result<Slot, EngineError> {
        if self.stage != Stage::AwaitingSecond {
            return Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingSecond,
                actual: self.stage,
            });
        }
        match (self.first_choice, self.revealed) {
            (Some(first), Some(revealed)) => {
                // Slot indices sum to 0 + 1 + 2
                let sum: u8 = (0..SLOT_COUNT).sum();
                Ok(Slot::new(sum - first.raw() - revealed.raw()))
            }
            _ => Err(EngineError::InvalidTransition {
                expected: Stage::AwaitingSecond,
                actual: self.stage,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_stage() {
        let mut rng = RoundRng::new(42);
        let round = RoundState::new(&mut rng);

        assert_eq!(round.stage(), Stage::AwaitingFirst);
        assert_eq!(round.first_choice(), None);
        assert_eq!(round.revealed(), None);
        assert_eq!(round.second_choice(), None);
    }

    #[test]
    fn test_target_hidden_until_resolved() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(2));

        assert_eq!(round.target(), None);
        round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        assert_eq!(round.target(), None);
        round.submit_second_choice(Slot::new(0)).unwrap();
        assert_eq!(round.target(), Some(Slot::new(2)));
    }

    #[test]
    fn test_reveal_is_neither_choice_nor_target() {
        let mut rng = RoundRng::new(7);

        for seed in 0..200 {
            let mut rng2 = RoundRng::new(seed);
            let mut round = RoundState::new(&mut rng2);
            let choice = rng.draw_slot();
            let revealed = round.submit_first_choice(choice, &mut rng).unwrap();

            assert_ne!(Some(revealed), round.first_choice());
            round.submit_second_choice(choice).unwrap();
            assert_ne!(Some(revealed), round.target());
        }
    }

    #[test]
    fn test_reveal_forced_when_choice_is_target() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(1));

        let revealed = round.submit_first_choice(Slot::new(1), &mut rng).unwrap();
        // Only slots 0 and 2 are eligible
        assert!(revealed == Slot::new(0) || revealed == Slot::new(2));
    }

    #[test]
    fn test_reveal_forced_when_choice_misses_target() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(1));

        // Choice 0, target 1: only slot 2 is eligible
        let revealed = round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        assert_eq!(revealed, Slot::new(2));
    }

    #[test]
    fn test_reveal_uniform_over_two_candidates() {
        // Choice == target leaves two eligible losing slots; both must
        // come up with a nontrivial share
        let mut counts = [0u32; 3];
        for seed in 0..2000 {
            let mut rng = RoundRng::new(seed);
            let mut round = RoundState::with_target(Slot::new(0));
            let revealed = round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
            counts[revealed.index()] += 1;
        }

        assert_eq!(counts[0], 0);
        assert!(counts[1] > 700, "slot 1 revealed {} times", counts[1]);
        assert!(counts[2] > 700, "slot 2 revealed {} times", counts[2]);
    }

    #[test]
    fn test_double_first_choice_rejected() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(2));

        let revealed = round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        let err = round.submit_first_choice(Slot::new(1), &mut rng).unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidTransition {
                expected: Stage::AwaitingFirst,
                actual: Stage::AwaitingSecond,
            }
        );
        // First result unchanged
        assert_eq!(round.first_choice(), Some(Slot::new(0)));
        assert_eq!(round.revealed(), Some(revealed));
    }

    #[test]
    fn test_second_choice_before_first_rejected() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::new(&mut rng);

        let err = round.submit_second_choice(Slot::new(0)).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransition {
                expected: Stage::AwaitingSecond,
                actual: Stage::AwaitingFirst,
            }
        );
    }

    #[test]
    fn test_revealed_slot_not_selectable() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(1));

        let revealed = round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        let err = round.submit_second_choice(revealed).unwrap_err();

        assert_eq!(err, EngineError::InvalidChoice { revealed });
        // Round still awaiting the second pick
        assert_eq!(round.stage(), Stage::AwaitingSecond);
        assert_eq!(round.second_choice(), None);

        // A legal pick still goes through afterwards
        round.submit_second_choice(Slot::new(0)).unwrap();
        assert_eq!(round.stage(), Stage::Resolved);
    }

    #[test]
    fn test_stay_outcome() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(2));

        round.submit_first_choice(Slot::new(2), &mut rng).unwrap();
        let outcome = round.submit_second_choice(Slot::new(2)).unwrap();

        assert!(outcome.won);
        assert!(!outcome.switched);
    }

    #[test]
    fn test_switch_outcome() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(1));

        // Choice 0 misses; slot 2 revealed; switching lands on the target
        round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        let switch_to = round.switch_slot().unwrap();
        assert_eq!(switch_to, Slot::new(1));

        let outcome = round.submit_second_choice(switch_to).unwrap();
        assert!(outcome.won);
        assert!(outcome.switched);
    }

    #[test]
    fn test_switch_slot_complement() {
        for seed in 0..100 {
            let mut rng = RoundRng::new(seed);
            let mut round = RoundState::new(&mut rng);
            let first = rng.draw_slot();
            let revealed = round.submit_first_choice(first, &mut rng).unwrap();
            let switch_to = round.switch_slot().unwrap();

            assert_ne!(switch_to, first);
            assert_ne!(switch_to, revealed);
        }
    }

    #[test]
    fn test_switch_slot_outside_awaiting_second() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::new(&mut rng);

        assert!(round.switch_slot().is_err());

        round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        let switch_to = round.switch_slot().unwrap();
        round.submit_second_choice(switch_to).unwrap();

        assert!(round.switch_slot().is_err());
    }

    #[test]
    fn test_outcome_before_resolution_rejected() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::new(&mut rng);

        assert!(round.outcome().is_err());
        round.submit_first_choice(Slot::new(0), &mut rng).unwrap();
        assert!(round.outcome().is_err());
    }

    #[test]
    fn test_round_serde_roundtrip() {
        let mut rng = RoundRng::new(42);
        let mut round = RoundState::with_target(Slot::new(1));
        round.submit_first_choice(Slot::new(0), &mut rng).unwrap();

        let json = serde_json::to_string(&round).unwrap();
        let mut restored: RoundState = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.stage(), Stage::AwaitingSecond);
        assert_eq!(restored.first_choice(), Some(Slot::new(0)));
        let outcome = restored.submit_second_choice(Slot::new(1)).unwrap();
        assert!(outcome.won);
    }
}
