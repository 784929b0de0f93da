//! Root configuration for a game session.

use serde::{Deserialize, Serialize};

use crate::config::{ProgramCatalogConfig, Settings};
use crate::core::catalog::SerializedProgram;
use crate::core::hardware::HardwareCapacity;
use crate::core::program::ProgramName;

/// Everything needed to start a new game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation settings.
    pub settings: Settings,
    /// Program catalog.
    pub programs: ProgramCatalogConfig,
    /// Hardware at the start of a new game.
    pub hardware: HardwareCapacity,
    /// Programs owned at the start of a new game.
    pub starting_programs: Vec<SerializedProgram>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            programs: ProgramCatalogConfig::default(),
            hardware: HardwareCapacity {
                cores: 1,
                ram: 1,
                performance: 1.0,
            },
            starting_programs: vec![
                SerializedProgram {
                    name: ProgramName::ShareServer,
                    level: 1,
                    quality: 0,
                },
                SerializedProgram {
                    name: ProgramName::CodeGenerator,
                    level: 1,
                    quality: 0,
                },
            ],
        }
    }
}

impl GameConfig {
    /// Validate settings, catalog and starting hardware.
    pub fn validate(&self) -> Result<(), String> {
        self.settings
            .validate()
            .map_err(|e| format!("settings invalid: {e}"))?;
        self.programs
            .validate()
            .map_err(|e| format!("programs invalid: {e}"))?;
        if !(self.hardware.performance.is_finite() && self.hardware.performance > 0.0) {
            return Err("hardware performance must be positive".into());
        }
        for (index, program) in self.starting_programs.iter().enumerate() {
            if self.starting_programs[..index]
                .iter()
                .any(|other| other.name == program.name)
            {
                return Err(format!("starting program `{}` listed twice", program.name));
            }
        }
        Ok(())
    }

    /// Parse game configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
