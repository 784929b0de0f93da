//! Mainframe hardware: the capacity ledger the scheduler allocates from.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Hardware handle shared between the session and the scheduler.
pub type SharedHardware = Arc<RwLock<MainframeHardware>>;

/// Capacity figures read at the start of every allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardwareCapacity {
    /// Total cores.
    pub cores: u32,
    /// Total RAM units.
    pub ram: u32,
    /// Performance factor applied to progress and program effects.
    pub performance: f64,
}

/// Upgradeable hardware parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HardwareParameter {
    /// Core count.
    Cores,
    /// RAM amount.
    Ram,
    /// Performance factor, in whole steps.
    Performance,
}

/// Mainframe hardware state.
///
/// Whoever mutates it is responsible for telling the scheduler to re-run
/// allocation.
#[derive(Debug, Clone)]
pub struct MainframeHardware {
    capacity: HardwareCapacity,
}

impl MainframeHardware {
    /// Create hardware with the given capacity.
    #[must_use]
    pub const fn new(capacity: HardwareCapacity) -> Self {
        Self { capacity }
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedHardware {
        Arc::new(RwLock::new(self))
    }

    /// Current capacity.
    #[must_use]
    pub const fn capacity(&self) -> HardwareCapacity {
        self.capacity
    }

    /// Total cores.
    #[must_use]
    pub const fn cores(&self) -> u32 {
        self.capacity.cores
    }

    /// Total RAM.
    #[must_use]
    pub const fn ram(&self) -> u32 {
        self.capacity.ram
    }

    /// Performance factor.
    #[must_use]
    pub const fn performance(&self) -> f64 {
        self.capacity.performance
    }

    /// Increase a parameter by `amount` steps.
    pub fn upgrade(&mut self, parameter: HardwareParameter, amount: u32) {
        match parameter {
            HardwareParameter::Cores => {
                self.capacity.cores = self.capacity.cores.saturating_add(amount);
            }
            HardwareParameter::Ram => self.capacity.ram = self.capacity.ram.saturating_add(amount),
            HardwareParameter::Performance => self.capacity.performance += f64::from(amount),
        }
        tracing::info!(?parameter, amount, capacity = ?self.capacity, "hardware upgraded");
    }

    /// Replace capacity wholesale (new game, snapshot restore).
    pub fn set_capacity(&mut self, capacity: HardwareCapacity) {
        self.capacity = capacity;
        tracing::debug!(?capacity, "hardware capacity replaced");
    }
}
