//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use mainframe_scheduler::config::{ProgramCatalogConfig, ProgramConfig};
use mainframe_scheduler::core::{
    HardwareCapacity, InMemoryMessageLog, MainframeHardware, OwnedPrograms, ProcessScheduler,
    ProgramFactory, ProgramName, SchedulerContext, SharedHardware, SharedPrograms,
};
use mainframe_scheduler::infra::InMemoryEffectLedger;
use parking_lot::Mutex;

pub struct Harness {
    pub scheduler: ProcessScheduler,
    pub hardware: SharedHardware,
    pub programs: SharedPrograms,
    pub factory: ProgramFactory,
    pub effects: Arc<Mutex<InMemoryEffectLedger>>,
    pub log: Arc<Mutex<InMemoryMessageLog>>,
}

pub fn threaded(cores_per_thread: u32, ram_per_thread: u32, completion_points: f64) -> ProgramConfig {
    ProgramConfig {
        cores_per_thread,
        ram_per_thread,
        completion_points,
        base_increase: 1.0,
        quality_multiplier: 1.0,
    }
}

/// Scheduler over `cores`/`ram` owning every program, with overrides applied
/// on top of the built-in catalog. One tick is one second at performance 1.
pub fn harness(cores: u32, ram: u32, overrides: &[(ProgramName, ProgramConfig)]) -> Harness {
    let mut catalog = ProgramCatalogConfig::default();
    for (name, config) in overrides {
        catalog.set(*name, *config);
    }
    let factory = ProgramFactory::new(catalog);

    let mut owned = OwnedPrograms::new();
    for name in ProgramName::ALL {
        owned.add_program(factory.make_program(name, 1, 0));
    }

    let hardware = MainframeHardware::new(HardwareCapacity {
        cores,
        ram,
        performance: 1.0,
    })
    .into_shared();
    let programs = owned.into_shared();
    let effects = Arc::new(Mutex::new(InMemoryEffectLedger::new()));
    let log = Arc::new(Mutex::new(InMemoryMessageLog::new(64)));

    let scheduler = ProcessScheduler::new(SchedulerContext {
        hardware: Arc::clone(&hardware),
        programs: Arc::clone(&programs),
        effects: effects.clone(),
        message_log: log.clone(),
        update_interval_ms: 1000,
    });

    Harness {
        scheduler,
        hardware,
        programs,
        factory,
        effects,
        log,
    }
}

/// Process names in collection order.
pub fn order(scheduler: &ProcessScheduler) -> Vec<ProgramName> {
    scheduler
        .list_processes()
        .iter()
        .map(|process| process.program_name())
        .collect()
}

pub fn used_cores(scheduler: &ProcessScheduler, name: ProgramName) -> u32 {
    scheduler
        .get_process_by_name(name)
        .map(|process| process.used_cores())
        .expect("process exists")
}
