//! Program effects and the sink they are delivered to.

use serde::{Deserialize, Serialize};

use crate::core::program::ProgramName;

/// Outcome of performing a program, addressed to another game subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramEffect {
    /// Money earned by renting out capacity.
    MoneyEarned(f64),
    /// Computational base growth.
    ComputationalBaseGrown(f64),
    /// Development points for programs under development.
    DevelopmentPointsGenerated(f64),
    /// Number of hardware purchase attempts to make.
    HardwarePurchaseActions(u32),
    /// Credentials recovered by a cracking run.
    CredentialsCracked(f64),
}

/// Receiver of program effects.
///
/// This is the only path through which the scheduler touches other
/// subsystems.
pub trait EffectSink: Send {
    /// Apply an effect produced by `program`.
    fn apply(&mut self, program: ProgramName, effect: ProgramEffect);
}
