//! Append-only ledger of resolved rounds and its aggregate summaries.
//!
//! ## RoundRecord
//!
//! Created exactly once per resolved scored round; never mutated or
//! deleted afterwards. The record set is the analysis artifact consumed
//! by reporting and export.
//!
//! ## Ledger
//!
//! Ordered sequence of records, insertion order = round order. Backed by
//! a persistent vector so appends are O(1) and clones share structure,
//! which keeps session snapshots from copying history.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{RewardRule, Slot};

/// One resolved round, as archived in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// 0-based index among the session's scored rounds.
    pub round_index: u32,
    /// The participant's first pick.
    pub first_choice: Slot,
    /// The losing slot revealed after the first pick.
    pub revealed: Slot,
    /// The participant's keep-or-switch pick.
    pub second_choice: Slot,
    /// The winning slot.
    pub target: Slot,
    /// Second pick landed on the target.
    pub won: bool,
    /// Second pick differed from the first.
    pub switched: bool,
    /// Signed points change under the applied rule.
    pub points_delta: i64,
    /// Rule the round was scored under.
    pub rule_applied: RewardRule,
}

/// Append-only ordered history of a session's resolved rounds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    records: Vector<RoundRecord>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vector::new(),
        }
    }

    /// Append a record. O(1); prior entries are never touched.
    pub fn append(&mut self, record: RoundRecord) {
        self.records.push_back(record);
    }

    /// The full ordered sequence of records.
    pub fn all(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a record by position.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RoundRecord> {
        self.records.get(index)
    }

    /// The most recently appended record.
    #[must_use]
    pub fn last(&self) -> Option<&RoundRecord> {
        self.records.last()
    }

    // === Aggregates ===

    /// Running point total across all records.
    #[must_use]
    pub fn total_points(&self) -> i64 {
        self.records.iter().map(|r| r.points_delta).sum()
    }

    /// Rounds won.
    #[must_use]
    pub fn wins(&self) -> usize {
        self.records.iter().filter(|r| r.won).count()
    }

    /// Rounds where the participant switched.
    #[must_use]
    pub fn switches(&self) -> usize {
        self.records.iter().filter(|r| r.switched).count()
    }

    /// Rounds won after switching.
    #[must_use]
    pub fn switch_wins(&self) -> usize {
        self.records.iter().filter(|r| r.switched && r.won).count()
    }

    /// Rounds won after staying.
    #[must_use]
    pub fn stay_wins(&self) -> usize {
        self.records.iter().filter(|r| !r.switched && r.won).count()
    }

    /// Fold the ledger into a reporting summary.
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let mut points_by_rule: FxHashMap<String, i64> = FxHashMap::default();
        for record in &self.records {
            *points_by_rule
                .entry(record.rule_applied.label().to_string())
                .or_insert(0) += record.points_delta;
        }

        SessionSummary {
            rounds: self.len(),
            wins: self.wins(),
            switches: self.switches(),
            switch_wins: self.switch_wins(),
            stay_wins: self.stay_wins(),
            total_points: self.total_points(),
            points_by_rule,
        }
    }
}

/// Aggregate view of a session's ledger for reporting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Scored rounds played.
    pub rounds: usize,
    /// Rounds won.
    pub wins: usize,
    /// Rounds where the participant switched.
    pub switches: usize,
    /// Wins after switching.
    pub switch_wins: usize,
    /// Wins after staying.
    pub stay_wins: usize,
    /// Running point total.
    pub total_points: i64,
    /// Point totals keyed by rule label.
    pub points_by_rule: FxHashMap<String, i64>,
}
