//! Process: a running instance of an owned program.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::program::{Program, ProgramName};

const MS_IN_SECOND: f64 = 1000.0;

/// Persisted form of a process. Transient allocation fields are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedProcess {
    /// Program the process runs.
    pub program_name: ProgramName,
    /// Thread count, 0 for autoscalable programs.
    pub threads: u32,
    /// Whether the process is switched on.
    pub is_active: bool,
    /// Progress toward completion.
    pub current_completion_points: f64,
}

/// A program bound to a thread count and a progress counter.
///
/// Owned by the scheduler; everything outside it gets shared references.
#[derive(Debug, Clone)]
pub struct Process {
    program: Arc<Program>,
    is_active: bool,
    threads: u32,
    current_completion_points: f64,
    used_cores: u32,
}

impl Process {
    pub(crate) fn new(
        program: Arc<Program>,
        threads: u32,
        is_active: bool,
        current_completion_points: f64,
    ) -> Self {
        let threads = if program.is_autoscalable() { 0 } else { threads };
        let max = program.completion_points();
        Self {
            program,
            is_active,
            threads,
            current_completion_points: current_completion_points.clamp(0.0, max),
            used_cores: 0,
        }
    }

    /// Program this process runs.
    #[must_use]
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Program name shortcut.
    #[must_use]
    pub fn program_name(&self) -> ProgramName {
        self.program.name()
    }

    /// Whether the process is switched on.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Thread count.
    #[must_use]
    pub const fn threads(&self) -> u32 {
        self.threads
    }

    /// Progress toward completion.
    #[must_use]
    pub const fn current_completion_points(&self) -> f64 {
        self.current_completion_points
    }

    /// Points needed to complete, fixed by the program.
    #[must_use]
    pub fn max_completion_points(&self) -> f64 {
        self.program.completion_points()
    }

    /// Cores granted by the latest allocation pass.
    #[must_use]
    pub const fn used_cores(&self) -> u32 {
        self.used_cores
    }

    /// Most cores the process can use at its thread count.
    #[must_use]
    pub fn max_cores(&self) -> u32 {
        self.threads.saturating_mul(self.program.cores_per_thread())
    }

    /// RAM held by the process. Autoscalable processes reserve none.
    #[must_use]
    pub fn total_ram(&self) -> u32 {
        self.threads.saturating_mul(self.program.ram_per_thread())
    }

    /// Whether progress reached the completion target.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.current_completion_points >= self.max_completion_points()
    }

    pub(crate) fn set_used_cores(&mut self, used_cores: u32) {
        self.used_cores = used_cores;
    }

    pub(crate) fn toggle_active(&mut self, active: bool) {
        self.is_active = active;
    }

    /// Change thread count in place. Progress is kept.
    pub(crate) fn update(&mut self, threads: u32) {
        if !self.program.is_autoscalable() {
            self.threads = threads;
        }
    }

    pub(crate) fn rebind_program(&mut self, program: Arc<Program>) {
        self.program = program;
        let max = self.max_completion_points();
        if self.current_completion_points > max {
            self.current_completion_points = max;
        }
    }

    /// Advance progress for one tick, proportional to granted cores.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn increase_completion(&mut self, update_interval_ms: u64, performance: f64) {
        let delta = f64::from(self.used_cores) * performance * update_interval_ms as f64
            / MS_IN_SECOND;
        let max = self.max_completion_points();
        self.current_completion_points = (self.current_completion_points + delta).min(max);
    }

    pub(crate) fn reset_completion(&mut self) {
        self.current_completion_points = 0.0;
    }

    /// Persisted form.
    #[must_use]
    pub fn serialize(&self) -> SerializedProcess {
        SerializedProcess {
            program_name: self.program.name(),
            threads: self.threads,
            is_active: self.is_active,
            current_completion_points: self.current_completion_points,
        }
    }
}
