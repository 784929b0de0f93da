//! Game session: the context object that owns one game's simulation state.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::core::catalog::{ProgramFactory, SerializedProgram, SharedPrograms};
use crate::core::clock::{GameSpeed, GameTime, TickClock};
use crate::core::hardware::{HardwareCapacity, HardwareParameter, SharedHardware};
use crate::core::message_log::{InMemoryMessageLog, LogMessage};
use crate::core::program::ProgramName;
use crate::core::scheduler::{ProcessScheduler, ProcessesSnapshot};
use crate::core::{AppResult, SchedulerError};
use crate::infra::effects::{EffectTotals, InMemoryEffectLedger};
use crate::util::clock::TimeSource;

/// Everything needed to resume a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Hardware capacity.
    pub hardware: HardwareCapacity,
    /// Owned programs.
    pub programs: Vec<SerializedProgram>,
    /// Processes in priority order.
    pub processes: ProcessesSnapshot,
    /// Time accounting.
    pub time: GameTime,
    /// Selected speed.
    pub speed: GameSpeed,
    /// Effects produced so far.
    pub effects: EffectTotals,
}

impl SessionSnapshot {
    /// Encode as JSON for a save slot.
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self).context("failed to encode session snapshot")
    }

    /// Decode a save slot written by [`SessionSnapshot::to_json`].
    pub fn from_json(input: &str) -> AppResult<Self> {
        serde_json::from_str(input).context("failed to decode session snapshot")
    }
}

/// Starting state for [`GameSession::start_new_state`].
#[derive(Debug, Clone)]
pub(crate) struct NewGame {
    pub(crate) hardware: HardwareCapacity,
    pub(crate) programs: Vec<SerializedProgram>,
}

/// One game's simulation: hardware, owned programs, scheduler and clock.
///
/// Built by [`crate::builders::build_session`].
pub struct GameSession<S> {
    pub(crate) settings: Settings,
    pub(crate) factory: ProgramFactory,
    pub(crate) new_game: NewGame,
    pub(crate) hardware: SharedHardware,
    pub(crate) programs: SharedPrograms,
    pub(crate) effects: Arc<Mutex<InMemoryEffectLedger>>,
    pub(crate) message_log: Arc<Mutex<InMemoryMessageLog>>,
    pub(crate) scheduler: ProcessScheduler,
    pub(crate) clock: TickClock<S>,
}

impl<S: TimeSource> GameSession<S> {
    /// Settings the session was built with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The process scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &ProcessScheduler {
        &self.scheduler
    }

    /// The process scheduler, for player actions.
    pub fn scheduler_mut(&mut self) -> &mut ProcessScheduler {
        &mut self.scheduler
    }

    /// Hardware handle.
    #[must_use]
    pub const fn hardware(&self) -> &SharedHardware {
        &self.hardware
    }

    /// Owned programs handle.
    #[must_use]
    pub const fn programs(&self) -> &SharedPrograms {
        &self.programs
    }

    /// Effects produced so far.
    #[must_use]
    pub fn effect_totals(&self) -> EffectTotals {
        self.effects.lock().totals().clone()
    }

    /// Player message log, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<LogMessage> {
        self.message_log.lock().messages()
    }

    /// Current speed.
    #[must_use]
    pub const fn speed(&self) -> GameSpeed {
        self.clock.speed()
    }

    /// Change speed.
    pub fn set_speed(&mut self, speed: GameSpeed) {
        self.clock.set_speed(speed);
    }

    /// Reset to the configured starting hardware and programs.
    pub fn start_new_state(&mut self) {
        self.hardware.write().set_capacity(self.new_game.hardware);
        self.programs
            .write()
            .deserialize(&self.factory, &self.new_game.programs);
        self.effects.lock().restore(EffectTotals::default());
        self.message_log.lock().clear();
        self.clock.reset();
        self.scheduler.start_new_state();
        tracing::info!("new game started");
    }

    /// Process ticks for the time elapsed since the last call, then flush
    /// change notifications once. Returns the number of ticks processed.
    pub fn update_state(&mut self) -> u32 {
        let ticks = self.clock.update_state(&mut self.scheduler);
        self.scheduler.fire_ui_events();
        ticks
    }

    /// Burst through banked time. Returns true if more may be pending.
    pub fn fast_forward_state(&mut self) -> bool {
        let pending = self.clock.fast_forward_state(&mut self.scheduler);
        self.scheduler.fire_ui_events();
        pending
    }

    /// Upgrade hardware and reallocate.
    pub fn upgrade_hardware(&mut self, parameter: HardwareParameter, amount: u32) {
        self.hardware.write().upgrade(parameter, amount);
        self.scheduler.handle_hardware_updated();
    }

    /// Take ownership of a program, replacing any owned version, and rebind
    /// its running process.
    pub fn purchase_program(&mut self, name: ProgramName, level: u32, quality: u32) {
        let program = self.factory.make_program(name, level, quality);
        self.programs.write().add_program(program);
        self.scheduler.handle_program_updated(name);
    }

    /// Capture the session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            hardware: self.hardware.read().capacity(),
            programs: self.programs.read().serialize(),
            processes: self.scheduler.serialize(),
            time: self.clock.time().clone(),
            speed: self.clock.speed(),
            effects: self.effect_totals(),
        }
    }

    /// Decode and restore a save slot. On error the session is left unchanged.
    pub fn restore_json(&mut self, input: &str) -> AppResult<()> {
        let snapshot = SessionSnapshot::from_json(input)?;
        self.restore(&snapshot)
            .context("session snapshot rejected")?;
        Ok(())
    }

    /// Restore a captured session. On error the session is left unchanged.
    pub fn restore(&mut self, snapshot: &SessionSnapshot) -> Result<(), SchedulerError> {
        let previous_hardware = self.hardware.read().capacity();
        let previous_programs = self.programs.read().serialize();

        self.hardware.write().set_capacity(snapshot.hardware);
        self.programs
            .write()
            .deserialize(&self.factory, &snapshot.programs);

        if let Err(e) = self.scheduler.deserialize(&snapshot.processes) {
            tracing::warn!(error = %e, "snapshot rejected, keeping current session");
            self.hardware.write().set_capacity(previous_hardware);
            self.programs
                .write()
                .deserialize(&self.factory, &previous_programs);
            self.scheduler.handle_hardware_updated();
            return Err(e);
        }

        self.effects.lock().restore(snapshot.effects.clone());
        self.clock.restore(snapshot.time.clone(), snapshot.speed);
        Ok(())
    }
}
