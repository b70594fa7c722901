//! Session configuration: rule blocks, trial runs, points floor.
//!
//! Each session is configured explicitly up front instead of through
//! scattered session-wide flags: an ordered list of blocks (each a rule
//! plus a round count), an optional run of unscored trial rounds before
//! the first block, an optional points floor, and an optional RNG seed
//! for reproducible sessions.

use serde::{Deserialize, Serialize};

use crate::core::RewardRule;

/// A block of consecutive rounds played under one reward rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Rule applied to every round in the block.
    pub rule: RewardRule,
    /// Number of rounds in the block.
    pub rounds: u32,
}

impl BlockConfig {
    /// Create a block configuration.
    pub fn new(rule: RewardRule, rounds: u32) -> Self {
        assert!(rounds > 0, "Block must have at least 1 round");
        Self { rule, rounds }
    }
}

/// Complete configuration for one participant session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Participant identifier, used for export file naming.
    pub participant: String,

    /// Ordered rule blocks; the session plays them front to back.
    pub blocks: Vec<BlockConfig>,

    /// Unscored warm-up rounds before the first block.
    pub trial_rounds: u32,

    /// If set, a second pick whose delta would drop the balance below
    /// this floor is rejected before submission.
    pub points_floor: Option<i64>,

    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl SessionConfig {
    /// Create a configuration with no blocks yet.
    pub fn new(participant: impl Into<String>) -> Self {
        Self {
            participant: participant.into(),
            blocks: Vec::new(),
            trial_rounds: 0,
            points_floor: None,
            seed: None,
        }
    }

    /// Append a block of rounds under the given rule.
    #[must_use]
    pub fn with_block(mut self, rule: RewardRule, rounds: u32) -> Self {
        self.blocks.push(BlockConfig::new(rule, rounds));
        self
    }

    /// Set the number of unscored trial rounds.
    #[must_use]
    pub fn with_trial_rounds(mut self, rounds: u32) -> Self {
        self.trial_rounds = rounds;
        self
    }

    /// Set the points floor.
    #[must_use]
    pub fn with_points_floor(mut self, floor: i64) -> Self {
        self.points_floor = Some(floor);
        self
    }

    /// Set the RNG seed for a reproducible session.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Total scored rounds across all blocks.
    #[must_use]
    pub fn scored_rounds(&self) -> u32 {
        self.blocks.iter().map(|b| b.rounds).sum()
    }

    /// Total rounds including trials.
    #[must_use]
    pub fn total_rounds(&self) -> u32 {
        self.trial_rounds + self.scored_rounds()
    }

    /// The rule governing the scored round at `index`, front to back
    /// through the blocks. `None` past the end of the schedule.
    #[must_use]
    pub fn rule_at(&self, index: u32) -> Option<RewardRule> {
        let mut remaining = index;
        for block in &self.blocks {
            if remaining < block.rounds {
                return Some(block.rule);
            }
            remaining -= block.rounds;
        }
        None
    }
}
