//! Error taxonomy for round and session operations.
//!
//! Every variant is a synchronous caller error: invalid call ordering,
//! picking the revealed slot, or a session-layer points floor. Nothing
//! here is retryable, and a rejected operation leaves all prior state
//! untouched.

use super::round::Stage;
use super::slot::Slot;

/// Errors reported by the round engine and session layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineError {
    /// An operation was invoked in the wrong stage.
    InvalidTransition {
        /// Stage the operation is valid in.
        expected: Stage,
        /// Stage the round was actually in.
        actual: Stage,
    },

    /// The second choice named the already-revealed losing slot.
    InvalidChoice {
        /// The revealed slot that cannot be selected.
        revealed: Slot,
    },

    /// Applying the round's point delta would cross the configured floor.
    ///
    /// Raised only by the session layer, and only when a points floor is
    /// configured; the round engine itself never checks balances.
    InsufficientBalance {
        /// Balance before the rejected choice.
        balance: i64,
        /// Delta the choice would have applied.
        delta: i64,
    },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidTransition { expected, actual } => {
                write!(f, "operation requires stage {expected:?}, round is in {actual:?}")
            }
            EngineError::InvalidChoice { revealed } => {
                write!(f, "{revealed} is the revealed losing slot and cannot be selected")
            }
            EngineError::InsufficientBalance { balance, delta } => {
                write!(
                    f,
                    "delta {delta} on balance {balance} would cross the points floor"
                )
            }
        }
    }
}

impl std::error::Error for EngineError {}
