//! Batch simulation of fixed switch/stay policies.
//!
//! Plays complete rounds through the real round engine with uniformly
//! random first picks and a fixed second-pick policy, and reports the
//! empirical win rate. Always-switch converges to 2/3 and always-stay
//! to 1/3 as the round count grows; the simulation exists to demonstrate
//! exactly that.

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, RoundRng, RoundState};

/// Fixed second-pick policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Policy {
    /// Keep the first pick.
    AlwaysStay,
    /// Take the slot that is neither the first pick nor the reveal.
    AlwaysSwitch,
}

/// Configuration for a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Second-pick policy.
    pub policy: Policy,
    /// Number of rounds to play.
    pub rounds: u32,
    /// RNG seed.
    pub seed: u64,
}

impl SimulationConfig {
    /// Create a configuration with the default seed.
    #[must_use]
    pub fn new(policy: Policy, rounds: u32) -> Self {
        Self {
            policy,
            rounds,
            seed: 0,
        }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Outcome counts of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Rounds played.
    pub rounds: u32,
    /// Rounds won.
    pub wins: u32,
}

impl SimulationReport {
    /// Fraction of rounds won.
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.rounds)
        }
    }
}

/// Both policy arms over the same round count, on independent RNG streams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyComparison {
    /// Always-switch arm.
    pub switch: SimulationReport,
    /// Always-stay arm.
    pub stay: SimulationReport,
}

/// Play `config.rounds` complete rounds under the configured policy.
pub fn run(config: &SimulationConfig) -> Result<SimulationReport, EngineError> {
    let mut rng = RoundRng::new(config.seed);
    run_with_rng(config.policy, config.rounds, &mut rng)
}

/// Run both policy arms with independent streams forked off one seed.
pub fn compare(rounds: u32, seed: u64) -> Result<PolicyComparison, EngineError> {
    let mut base = RoundRng::new(seed);
    let mut switch_rng = base.fork();
    let mut stay_rng = base.fork();

    Ok(PolicyComparison {
        switch: run_with_rng(Policy::AlwaysSwitch, rounds, &mut switch_rng)?,
        stay: run_with_rng(Policy::AlwaysStay, rounds, &mut stay_rng)?,
    })
}

fn run_with_rng(
    policy: Policy,
    rounds: u32,
    rng: &mut RoundRng,
) -> Result<SimulationReport, EngineError> {
    let mut wins = 0;

    for _ in 0..rounds {
        let mut round = RoundState::new(rng);
        let first = rng.draw_slot();
        round.submit_first_choice(first, rng)?;

        let second = match policy {
            Policy::AlwaysStay => first,
            Policy::AlwaysSwitch => round.switch_slot()?,
        };
        let outcome = round.submit_second_choice(second)?;
        if outcome.won {
            wins += 1;
        }
    }

    Ok(SimulationReport { rounds, wins })
}
