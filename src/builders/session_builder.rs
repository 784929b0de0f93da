//! Builds a game session from a [`GameConfig`].

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::GameConfig;
use crate::core::catalog::{OwnedPrograms, ProgramFactory};
use crate::core::clock::TickClock;
use crate::core::hardware::MainframeHardware;
use crate::core::message_log::{InMemoryMessageLog, SharedMessageLog};
use crate::core::scheduler::{ProcessScheduler, SchedulerContext, SharedEffects};
use crate::core::SchedulerError;
use crate::infra::effects::InMemoryEffectLedger;
use crate::runtime::session::{GameSession, NewGame};
use crate::util::clock::TimeSource;

/// Validate `cfg` and wire a session in its new-game state.
pub fn build_session<S: TimeSource>(
    cfg: &GameConfig,
    time_source: S,
) -> Result<GameSession<S>, SchedulerError> {
    cfg.validate()
        .map_err(|e| SchedulerError::Config(format!("config invalid: {e}")))?;

    let factory = ProgramFactory::new(cfg.programs.clone());
    let hardware = MainframeHardware::new(cfg.hardware).into_shared();

    let mut owned = OwnedPrograms::new();
    owned.deserialize(&factory, &cfg.starting_programs);
    let programs = owned.into_shared();

    let effects = Arc::new(Mutex::new(InMemoryEffectLedger::new()));
    let message_log = Arc::new(Mutex::new(InMemoryMessageLog::new(
        cfg.settings.message_log_size,
    )));

    let shared_effects: SharedEffects = effects.clone();
    let shared_log: SharedMessageLog = message_log.clone();
    let scheduler = ProcessScheduler::new(SchedulerContext {
        hardware: Arc::clone(&hardware),
        programs: Arc::clone(&programs),
        effects: shared_effects,
        message_log: shared_log,
        update_interval_ms: cfg.settings.update_interval_ms,
    });

    let clock = TickClock::new(&cfg.settings, time_source);

    tracing::info!(
        update_interval_ms = cfg.settings.update_interval_ms,
        cores = cfg.hardware.cores,
        ram = cfg.hardware.ram,
        "game session built"
    );

    Ok(GameSession {
        settings: cfg.settings.clone(),
        factory,
        new_game: NewGame {
            hardware: cfg.hardware,
            programs: cfg.starting_programs.clone(),
        },
        hardware,
        programs,
        effects,
        message_log,
        scheduler,
        clock,
    })
}
