//! # monty-lab
//!
//! Round engine, reward policies, and session ledger for three-card
//! switch/stay experiments: a participant picks one of three slots, one
//! losing slot is revealed, the participant keeps or switches, and the
//! resolved round is scored under a configurable incentive rule.
//!
//! ## Design Principles
//!
//! 1. **Pure, deterministic core**: Every outcome is a function of the
//!    two picks, the hidden target, and the active rule. Randomness
//!    flows through one seedable RNG.
//!
//! 2. **Explicit session state**: Each participant session owns its own
//!    context (RNG, ledger, balance, schedule position) passed around
//!    explicitly; there is no process-wide state.
//!
//! 3. **One rule type**: The incentive variants (free play, open
//!    switch/stay costs, hidden heuristic costs) are one tagged enum,
//!    not parallel copies of near-identical branching.
//!
//! 4. **Append-only history**: Resolved rounds are archived once and
//!    never mutated; reporting and export are folds over the ledger.
//!
//! ## Modules
//!
//! - `core`: slots, RNG, round state machine, reward rules, errors
//! - `session`: configuration, per-participant context, ledger
//! - `export`: CSV rows compatible with historical logs
//! - `sim`: batch simulation of always-switch / always-stay

pub mod core;
pub mod export;
pub mod session;
pub mod sim;

// Re-export commonly used types
pub use crate::core::{
    EngineError, HeuristicKind, RewardOutcome, RewardRule, RngState, RoundOutcome, RoundRng,
    RoundState, Slot, Stage, SLOT_COUNT, WIN_POINTS,
};

pub use crate::session::{
    BlockConfig, Ledger, RoundRecord, SessionConfig, SessionContext, SessionPhase,
    SessionSnapshot, SessionSummary,
};

pub use crate::export::{export_session, session_filename, write_records};

pub use crate::sim::{Policy, PolicyComparison, SimulationConfig, SimulationReport};
