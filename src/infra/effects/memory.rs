//! In-memory effect ledger.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::effects::{EffectSink, ProgramEffect};
use crate::core::program::ProgramName;

/// Running totals of every effect applied so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTotals {
    /// Money earned.
    pub money: f64,
    /// Computational base accumulated.
    pub computational_base: f64,
    /// Development points produced.
    pub development_points: f64,
    /// Hardware purchase actions requested.
    pub hardware_purchase_actions: u64,
    /// Credentials cracked.
    pub credentials_cracked: f64,
}

/// Effect sink that accumulates totals and counts performs per program.
#[derive(Debug, Default)]
pub struct InMemoryEffectLedger {
    totals: EffectTotals,
    performs: HashMap<ProgramName, u64>,
}

impl InMemoryEffectLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals accumulated so far.
    #[must_use]
    pub const fn totals(&self) -> &EffectTotals {
        &self.totals
    }

    /// How many times `program` has performed.
    #[must_use]
    pub fn perform_count(&self, program: ProgramName) -> u64 {
        self.performs.get(&program).copied().unwrap_or(0)
    }

    /// Restore totals from a snapshot. Perform counts start over.
    pub fn restore(&mut self, totals: EffectTotals) {
        self.totals = totals;
        self.performs.clear();
    }
}

impl EffectSink for InMemoryEffectLedger {
    fn apply(&mut self, program: ProgramName, effect: ProgramEffect) {
        *self.performs.entry(program).or_default() += 1;
        match effect {
            ProgramEffect::MoneyEarned(delta) => self.totals.money += delta,
            ProgramEffect::ComputationalBaseGrown(delta) => {
                self.totals.computational_base += delta;
            }
            ProgramEffect::DevelopmentPointsGenerated(delta) => {
                self.totals.development_points += delta;
            }
            ProgramEffect::HardwarePurchaseActions(count) => {
                self.totals.hardware_purchase_actions += u64::from(count);
            }
            ProgramEffect::CredentialsCracked(delta) => self.totals.credentials_cracked += delta,
        }
    }
}
