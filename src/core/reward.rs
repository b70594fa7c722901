//! Reward rules: the incentive schedule applied at round resolution.
//!
//! One tagged enum covers the whole family of incentive variants rather
//! than per-variant branching: a flat payout, an openly disclosed cost on
//! switching or staying, and the hidden-cost heuristic variants whose
//! arithmetic matches the open rules but whose cost is withheld from
//! participant-facing explanation.
//!
//! Evaluation is a pure function of the two picks and the target. Costs
//! apply once, at resolution, win or lose; cumulative balances may go
//! negative unless the session layer enforces a floor.

use serde::{Deserialize, Serialize};

use super::rng::RoundRng;
use super::slot::Slot;

/// Points awarded for landing on the target.
pub const WIN_POINTS: i64 = 100;

/// Which cognitive bias a hidden-cost block is probing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeuristicKind {
    /// Penalizes switching (cost arithmetic of [`RewardRule::SwitchCost`]).
    Familiarity,
    /// Penalizes staying (cost arithmetic of [`RewardRule::StayCost`]).
    Representativeness,
}

impl HeuristicKind {
    /// Draw a kind uniformly, the way an experiment assigns its condition
    /// at session start.
    pub fn draw(rng: &mut RoundRng) -> Self {
        if rng.gen_bool(0.5) {
            HeuristicKind::Familiarity
        } else {
            HeuristicKind::Representativeness
        }
    }

    /// Stable label used in persisted rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            HeuristicKind::Familiarity => "familiarity",
            HeuristicKind::Representativeness => "representativeness",
        }
    }
}

/// Incentive rule for a block of rounds. Selected once per block, never
/// mutated mid-round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardRule {
    /// 100 points on a win, nothing else.
    Flat,
    /// As `Flat`, minus the cost whenever the second pick differs from
    /// the first, win or lose.
    SwitchCost(i64),
    /// As `Flat`, minus the cost whenever the second pick equals the
    /// first, win or lose.
    StayCost(i64),
    /// Hidden-cost variant: arithmetic of the matching open rule, but the
    /// cost is withheld from participant-facing explanation.
    Heuristic { kind: HeuristicKind, cost: i64 },
}

/// Points delta and win flag for one resolved round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOutcome {
    /// Signed points change, cost already applied.
    pub points_delta: i64,
    /// Second pick landed on the target.
    pub won: bool,
}

impl RewardRule {
    /// Evaluate a resolved round under this rule.
    #[must_use]
    pub fn evaluate(self, first: Slot, second: Slot, target: Slot) -> RewardOutcome {
        let won = second == target;
        let switched = second != first;
        let base = if won { WIN_POINTS } else { 0 };

        let cost = match self {
            RewardRule::Flat => 0,
            RewardRule::SwitchCost(cost) if switched => cost,
            RewardRule::SwitchCost(_) => 0,
            RewardRule::StayCost(cost) if !switched => cost,
            RewardRule::StayCost(_) => 0,
            RewardRule::Heuristic {
                kind: HeuristicKind::Familiarity,
                cost,
            } if switched => cost,
            RewardRule::Heuristic {
                kind: HeuristicKind::Representativeness,
                cost,
            } if !switched => cost,
            RewardRule::Heuristic { .. } => 0,
        };

        RewardOutcome {
            points_delta: base - cost,
            won,
        }
    }

    /// The cost shown to the participant, if this rule discloses one.
    ///
    /// `None` for `Flat` (no cost) and for the heuristic rules (cost
    /// withheld by design of the experiment).
    #[must_use]
    pub const fn disclosed_cost(self) -> Option<i64> {
        match self {
            RewardRule::SwitchCost(cost) | RewardRule::StayCost(cost) => Some(cost),
            RewardRule::Flat | RewardRule::Heuristic { .. } => None,
        }
    }

    /// Stable label used in persisted rows.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            RewardRule::Flat => "flat",
            RewardRule::SwitchCost(_) => "switch_cost",
            RewardRule::StayCost(_) => "stay_cost",
            RewardRule::Heuristic { kind, .. } => kind.label(),
        }
    }
}
