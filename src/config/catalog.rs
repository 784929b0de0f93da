//! Static program costs and effect parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::program::ProgramName;

/// Costs and effect parameters for one program kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgramConfig {
    /// Cores per thread.
    pub cores_per_thread: u32,
    /// RAM per thread.
    pub ram_per_thread: u32,
    /// Points needed to complete one run.
    pub completion_points: f64,
    /// Base magnitude of the program's effect.
    pub base_increase: f64,
    /// Effect multiplier applied once per quality step.
    pub quality_multiplier: f64,
}

impl ProgramConfig {
    /// Built-in entry for `name`.
    #[must_use]
    pub const fn default_for(name: ProgramName) -> Self {
        match name {
            ProgramName::ShareServer => Self {
                cores_per_thread: 1,
                ram_per_thread: 1,
                completion_points: 1.0,
                base_increase: 0.1,
                quality_multiplier: 1.2,
            },
            ProgramName::PredictiveComputator => Self {
                cores_per_thread: 1,
                ram_per_thread: 1,
                completion_points: 1.0,
                base_increase: 0.05,
                quality_multiplier: 1.2,
            },
            ProgramName::CodeGenerator => Self {
                cores_per_thread: 1,
                ram_per_thread: 1,
                completion_points: 10.0,
                base_increase: 1.0,
                quality_multiplier: 1.3,
            },
            ProgramName::MainframeHardwareAutobuyer => Self {
                cores_per_thread: 1,
                ram_per_thread: 1,
                completion_points: 5.0,
                base_increase: 1.0,
                quality_multiplier: 1.0,
            },
            ProgramName::PasswordCracker => Self {
                cores_per_thread: 2,
                ram_per_thread: 4,
                completion_points: 100.0,
                base_increase: 10.0,
                quality_multiplier: 1.5,
            },
        }
    }
}

/// Catalog of program configs. Programs missing from the map use built-ins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramCatalogConfig {
    programs: BTreeMap<ProgramName, ProgramConfig>,
}

impl Default for ProgramCatalogConfig {
    fn default() -> Self {
        Self {
            programs: ProgramName::ALL
                .into_iter()
                .map(|name| (name, ProgramConfig::default_for(name)))
                .collect(),
        }
    }
}

impl ProgramCatalogConfig {
    /// Config for `name`.
    #[must_use]
    pub fn get(&self, name: ProgramName) -> ProgramConfig {
        self.programs
            .get(&name)
            .copied()
            .unwrap_or_else(|| ProgramConfig::default_for(name))
    }

    /// Override the config for `name`.
    pub fn set(&mut self, name: ProgramName, config: ProgramConfig) {
        self.programs.insert(name, config);
    }

    /// Validate every configured program.
    pub fn validate(&self) -> Result<(), String> {
        for (name, config) in &self.programs {
            if !name.is_autoscalable() {
                if config.cores_per_thread == 0 {
                    return Err(format!("program `{name}`: cores_per_thread must be greater than 0"));
                }
                if config.ram_per_thread == 0 {
                    return Err(format!("program `{name}`: ram_per_thread must be greater than 0"));
                }
            }
            if !(config.completion_points.is_finite() && config.completion_points > 0.0) {
                return Err(format!("program `{name}`: completion_points must be positive"));
            }
            if !config.base_increase.is_finite() || config.base_increase < 0.0 {
                return Err(format!("program `{name}`: base_increase must not be negative"));
            }
            if !config.quality_multiplier.is_finite() || config.quality_multiplier <= 0.0 {
                return Err(format!("program `{name}`: quality_multiplier must be positive"));
            }
        }
        Ok(())
    }
}
