//! Session layer: configuration, the per-participant context, and the
//! append-only ledger with its aggregate summaries.

pub mod config;
pub mod context;
pub mod ledger;

pub use config::{BlockConfig, SessionConfig};
pub use context::{SessionContext, SessionPhase, SessionSnapshot};
pub use ledger::{Ledger, RoundRecord, SessionSummary};
