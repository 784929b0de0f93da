//! Program catalog: the closed set of program kinds and their completion effects.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ProgramConfig;
use crate::core::effects::{EffectSink, ProgramEffect};

const MS_IN_SECOND: f64 = 1000.0;

/// Name of a program kind. Every program the game knows about is listed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgramName {
    /// Rents out spare capacity for money. Autoscalable.
    ShareServer,
    /// Grows the computational base from spare RAM. Autoscalable.
    PredictiveComputator,
    /// Produces development points for programs under development.
    CodeGenerator,
    /// Buys mainframe hardware upgrades on every completion.
    MainframeHardwareAutobuyer,
    /// Cracks credentials once, then exits.
    PasswordCracker,
}

impl ProgramName {
    /// Every program name, in catalog order.
    pub const ALL: [Self; 5] = [
        Self::ShareServer,
        Self::PredictiveComputator,
        Self::CodeGenerator,
        Self::MainframeHardwareAutobuyer,
        Self::PasswordCracker,
    ];

    /// Whether the program consumes leftover capacity instead of fixed threads.
    #[must_use]
    pub const fn is_autoscalable(self) -> bool {
        matches!(self, Self::ShareServer | Self::PredictiveComputator)
    }

    /// Whether a completed process restarts instead of exiting.
    #[must_use]
    pub const fn is_repeatable(self) -> bool {
        matches!(self, Self::CodeGenerator | Self::MainframeHardwareAutobuyer)
    }

    /// Stable snake_case identifier used in logs and snapshots.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShareServer => "share_server",
            Self::PredictiveComputator => "predictive_computator",
            Self::CodeGenerator => "code_generator",
            Self::MainframeHardwareAutobuyer => "mainframe_hardware_autobuyer",
            Self::PasswordCracker => "password_cracker",
        }
    }
}

impl fmt::Display for ProgramName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values a program reads from its surroundings when it performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformEnv {
    /// Logical length of one tick in milliseconds.
    pub update_interval_ms: u64,
    /// Hardware performance factor.
    pub performance: f64,
}

impl PerformEnv {
    #[allow(clippy::cast_precision_loss)]
    fn interval_secs(&self) -> f64 {
        self.update_interval_ms as f64 / MS_IN_SECOND
    }
}

/// An owned program: static costs plus the level and quality it was developed at.
///
/// Programs are immutable once built. Upgrading a program means building a new
/// one and replacing it in the owned programs collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    name: ProgramName,
    level: u32,
    quality: u32,
    cores_per_thread: u32,
    ram_per_thread: u32,
    completion_points: f64,
    base_increase: f64,
    quality_multiplier: f64,
}

impl Program {
    /// Build a program from its catalog entry.
    #[must_use]
    pub fn new(name: ProgramName, level: u32, quality: u32, config: &ProgramConfig) -> Self {
        Self {
            name,
            level,
            quality,
            cores_per_thread: config.cores_per_thread,
            ram_per_thread: config.ram_per_thread,
            completion_points: config.completion_points,
            base_increase: config.base_increase,
            quality_multiplier: config.quality_multiplier,
        }
    }

    /// Program name.
    #[must_use]
    pub const fn name(&self) -> ProgramName {
        self.name
    }

    /// Development level.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Development quality.
    #[must_use]
    pub const fn quality(&self) -> u32 {
        self.quality
    }

    /// Cores one thread occupies while running.
    #[must_use]
    pub const fn cores_per_thread(&self) -> u32 {
        self.cores_per_thread
    }

    /// RAM one thread reserves while the process exists.
    #[must_use]
    pub const fn ram_per_thread(&self) -> u32 {
        self.ram_per_thread
    }

    /// Points a process of this program needs to complete.
    #[must_use]
    pub const fn completion_points(&self) -> f64 {
        self.completion_points
    }

    /// See [`ProgramName::is_autoscalable`].
    #[must_use]
    pub const fn is_autoscalable(&self) -> bool {
        self.name.is_autoscalable()
    }

    /// See [`ProgramName::is_repeatable`].
    #[must_use]
    pub const fn is_repeatable(&self) -> bool {
        self.name.is_repeatable()
    }

    /// Apply the program's effect for `units` (threads or granted cores) and `ram`.
    ///
    /// Threaded programs are performed once per completion with their thread
    /// count; autoscalable programs every tick with whatever capacity is left.
    pub fn perform(&self, units: u32, ram: u32, env: &PerformEnv, sink: &mut dyn EffectSink) {
        let effect = self.effect(units, ram, env);
        tracing::trace!(program = %self.name, units, ram, ?effect, "program performed");
        sink.apply(self.name, effect);
    }

    fn effect(&self, units: u32, ram: u32, env: &PerformEnv) -> ProgramEffect {
        match self.name {
            ProgramName::ShareServer => {
                ProgramEffect::MoneyEarned(self.timed_delta(env) * f64::from(units))
            }
            ProgramName::PredictiveComputator => {
                ProgramEffect::ComputationalBaseGrown(self.timed_delta(env) * f64::from(ram))
            }
            ProgramName::CodeGenerator => {
                ProgramEffect::DevelopmentPointsGenerated(self.timed_delta(env) * f64::from(units))
            }
            ProgramName::MainframeHardwareAutobuyer => {
                ProgramEffect::HardwarePurchaseActions(units.saturating_mul(self.level))
            }
            ProgramName::PasswordCracker => ProgramEffect::CredentialsCracked(
                self.base_increase
                    * f64::from(units)
                    * f64::from(self.level)
                    * self.quality_factor(),
            ),
        }
    }

    fn timed_delta(&self, env: &PerformEnv) -> f64 {
        env.interval_secs()
            * self.base_increase
            * env.performance
            * f64::from(self.level)
            * self.quality_factor()
    }

    fn quality_factor(&self) -> f64 {
        self.quality_multiplier
            .powi(i32::try_from(self.quality).unwrap_or(i32::MAX))
    }
}
