//! Core engine types: slots, RNG, the round state machine, reward rules,
//! and the error taxonomy.
//!
//! Everything here is pure and deterministic given the RNG; sessions,
//! ledgers, and export build on top without the core knowing about them.

pub mod error;
pub mod reward;
pub mod rng;
pub mod round;
pub mod slot;

pub use error::EngineError;
pub use reward::{HeuristicKind, RewardOutcome, RewardRule, WIN_POINTS};
pub use rng::{RngState, RoundRng};
pub use round::{RoundOutcome, RoundState, Stage};
pub use slot::{Slot, SLOT_COUNT};
