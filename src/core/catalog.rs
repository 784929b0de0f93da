//! Owned programs and the factory that builds them from catalog configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::config::ProgramCatalogConfig;
use crate::core::program::{Program, ProgramName};

/// Owned programs handle shared between the session and the scheduler.
pub type SharedPrograms = Arc<RwLock<OwnedPrograms>>;

/// Builds programs from catalog configuration.
#[derive(Debug, Clone)]
pub struct ProgramFactory {
    catalog: ProgramCatalogConfig,
}

impl ProgramFactory {
    /// Create a factory over a catalog.
    #[must_use]
    pub const fn new(catalog: ProgramCatalogConfig) -> Self {
        Self { catalog }
    }

    /// Build a program at the given level and quality.
    #[must_use]
    pub fn make_program(&self, name: ProgramName, level: u32, quality: u32) -> Program {
        Program::new(name, level, quality, &self.catalog.get(name))
    }
}

/// Persisted form of an owned program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedProgram {
    /// Program name.
    pub name: ProgramName,
    /// Level.
    pub level: u32,
    /// Quality.
    pub quality: u32,
}

/// Programs the player owns, at most one per name.
///
/// Processes hold `Arc` clones of these programs; replacing an owned program
/// does not change running processes until the scheduler rebinds them.
#[derive(Debug, Clone, Default)]
pub struct OwnedPrograms {
    programs: BTreeMap<ProgramName, Arc<Program>>,
}

impl OwnedPrograms {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap into a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedPrograms {
        Arc::new(RwLock::new(self))
    }

    /// Look up an owned program.
    #[must_use]
    pub fn get_owned_program_by_name(&self, name: ProgramName) -> Option<Arc<Program>> {
        self.programs.get(&name).cloned()
    }

    /// Add a program, replacing any owned program with the same name.
    /// Returns the program that was replaced.
    pub fn add_program(&mut self, program: Program) -> Option<Arc<Program>> {
        tracing::info!(
            program = %program.name(),
            level = program.level(),
            quality = program.quality(),
            "program owned"
        );
        self.programs.insert(program.name(), Arc::new(program))
    }

    /// All owned programs in catalog order.
    #[must_use]
    pub fn list_owned_programs(&self) -> Vec<Arc<Program>> {
        self.programs.values().cloned().collect()
    }

    /// Drop every owned program.
    pub fn clear(&mut self) {
        self.programs.clear();
    }

    /// Persist levels and qualities.
    #[must_use]
    pub fn serialize(&self) -> Vec<SerializedProgram> {
        self.programs
            .values()
            .map(|program| SerializedProgram {
                name: program.name(),
                level: program.level(),
                quality: program.quality(),
            })
            .collect()
    }

    /// Rebuild from persisted entries, replacing current contents.
    pub fn deserialize(&mut self, factory: &ProgramFactory, programs: &[SerializedProgram]) {
        self.programs = programs
            .iter()
            .map(|entry| {
                let program = factory.make_program(entry.name, entry.level, entry.quality);
                (entry.name, Arc::new(program))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_program_replaces_same_name() {
        let factory = ProgramFactory::new(ProgramCatalogConfig::default());
        let mut owned = OwnedPrograms::new();

        assert!(owned
            .add_program(factory.make_program(ProgramName::CodeGenerator, 1, 0))
            .is_none());
        let replaced = owned.add_program(factory.make_program(ProgramName::CodeGenerator, 2, 1));

        assert_eq!(replaced.map(|p| p.level()), Some(1));
        assert_eq!(owned.list_owned_programs().len(), 1);
        assert_eq!(
            owned
                .get_owned_program_by_name(ProgramName::CodeGenerator)
                .map(|p| p.level()),
            Some(2)
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_level_and_quality() {
        let factory = ProgramFactory::new(ProgramCatalogConfig::default());
        let mut owned = OwnedPrograms::new();
        owned.add_program(factory.make_program(ProgramName::ShareServer, 3, 2));
        owned.add_program(factory.make_program(ProgramName::PasswordCracker, 1, 4));

        let saved = owned.serialize();
        let mut restored = OwnedPrograms::new();
        restored.deserialize(&factory, &saved);

        assert_eq!(restored.serialize(), saved);
    }
}
