//! Process scheduler: core/RAM allocation, progress and completion handling.
//!
//! Allocation runs once per tick and once after every admission, removal,
//! toggle or hardware change. Processes are served in collection order, so
//! earlier-started processes take cores first and later ones may starve.
//! RAM is reserved by every existing threaded process whether active or not.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::catalog::SharedPrograms;
use crate::core::effects::EffectSink;
use crate::core::events::{EventBatcher, ListenerId, UiEvent, UiEventHandler, UiEventKind};
use crate::core::hardware::SharedHardware;
use crate::core::message_log::{build_message, MessageEvent, SharedMessageLog};
use crate::core::process::{Process, SerializedProcess};
use crate::core::program::{PerformEnv, ProgramName};
use crate::core::SchedulerError;

/// Effect sink handle shared between the session and the scheduler.
pub type SharedEffects = Arc<Mutex<dyn EffectSink>>;

/// Persisted scheduler state: processes in priority order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessesSnapshot {
    /// Processes, highest priority first.
    pub processes: Vec<SerializedProcess>,
}

/// Collaborators the scheduler reads from and reports to.
#[derive(Clone)]
pub struct SchedulerContext {
    /// Capacity ledger.
    pub hardware: SharedHardware,
    /// Owned programs lookup.
    pub programs: SharedPrograms,
    /// Receiver of program effects.
    pub effects: SharedEffects,
    /// Player-facing message log.
    pub message_log: SharedMessageLog,
    /// Logical tick length in milliseconds.
    pub update_interval_ms: u64,
}

/// Owns the process collection and everything derived from it.
pub struct ProcessScheduler {
    hardware: SharedHardware,
    programs: SharedPrograms,
    effects: SharedEffects,
    message_log: SharedMessageLog,
    update_interval_ms: u64,

    processes: Vec<Process>,
    /// Indices into `processes` that received cores in the latest pass.
    running: Vec<usize>,
    /// Index of the autoscalable process, if any.
    passive: Option<usize>,
    available_cores: u32,
    available_ram: u32,
    ui_events: EventBatcher,
}

impl ProcessScheduler {
    /// Create an empty scheduler and run the first allocation pass.
    #[must_use]
    pub fn new(context: SchedulerContext) -> Self {
        let mut scheduler = Self {
            hardware: context.hardware,
            programs: context.programs,
            effects: context.effects,
            message_log: context.message_log,
            update_interval_ms: context.update_interval_ms,
            processes: Vec::new(),
            running: Vec::new(),
            passive: None,
            available_cores: 0,
            available_ram: 0,
            ui_events: EventBatcher::new(),
        };
        scheduler.update_running_processes();
        scheduler
    }

    /// Cores left after the latest allocation pass.
    #[must_use]
    pub const fn available_cores(&self) -> u32 {
        self.available_cores
    }

    /// RAM left after the latest allocation pass.
    #[must_use]
    pub const fn available_ram(&self) -> u32 {
        self.available_ram
    }

    /// Logical tick length in milliseconds.
    #[must_use]
    pub const fn update_interval_ms(&self) -> u64 {
        self.update_interval_ms
    }

    /// Processes in priority order.
    #[must_use]
    pub fn list_processes(&self) -> &[Process] {
        &self.processes
    }

    /// Find the process running `name`.
    #[must_use]
    pub fn get_process_by_name(&self, name: ProgramName) -> Option<&Process> {
        self.processes.iter().find(|process| process.program_name() == name)
    }

    /// The autoscalable process, if one exists.
    #[must_use]
    pub fn passive_process(&self) -> Option<&Process> {
        self.passive.map(|index| &self.processes[index])
    }

    /// Names of processes that received cores in the latest pass, in priority order.
    #[must_use]
    pub fn running_processes(&self) -> Vec<ProgramName> {
        self.running
            .iter()
            .map(|&index| self.processes[index].program_name())
            .collect()
    }

    /// Start a process, or change the thread count of an existing one.
    ///
    /// Returns `Ok(false)` when the program is not owned or its threads do not
    /// fit in free RAM; nothing is changed in that case. A zero thread count
    /// for a non-scaling program is a validation error.
    pub fn add_process(&mut self, name: ProgramName, threads: u32) -> Result<bool, SchedulerError> {
        let Some(program) = self.programs.read().get_owned_program_by_name(name) else {
            tracing::debug!(program = %name, "cannot start process: program not owned");
            return Ok(false);
        };

        if !program.is_autoscalable() && threads == 0 {
            return Err(SchedulerError::InvalidThreads {
                program: name,
                threads,
            });
        }

        let thread_count = if program.is_autoscalable() { 0 } else { threads };
        let existing = self.position(name);

        if !program.is_autoscalable() {
            // Measured against capacity, not the clamped `available_ram`, so a
            // deficit left by a hardware downgrade still counts.
            let reserved_by_others: u64 = self
                .processes
                .iter()
                .filter(|process| process.program_name() != name)
                .map(|process| u64::from(process.total_ram()))
                .sum();
            let available_ram =
                u64::from(self.hardware.read().ram()).saturating_sub(reserved_by_others);

            let required = u64::from(program.ram_per_thread()) * u64::from(threads);
            if available_ram < required {
                tracing::info!(
                    program = %name,
                    threads,
                    required,
                    available_ram,
                    "process rejected: not enough ram"
                );
                return Ok(false);
            }
        }

        if program.is_autoscalable() && existing.is_none() {
            self.delete_autoscalable_processes();
        }

        if let Some(index) = existing {
            self.processes[index].update(thread_count);
            self.ui_events.enqueue_event(UiEvent::process_updated(name));
        } else {
            self.processes
                .push(Process::new(program, thread_count, true, 0.0));
        }

        self.update_running_processes();

        tracing::info!(program = %name, threads = thread_count, "process started");
        self.post_message(MessageEvent::ProcessStarted, name, thread_count);

        Ok(true)
    }

    /// Remove the process running `name`. Returns false if there was none.
    pub fn delete_process(&mut self, name: ProgramName) -> bool {
        let removed = self.remove_where(|process| process.program_name() == name);
        self.update_running_processes();
        removed > 0
    }

    /// Switch a process on or off. Unknown names are ignored.
    ///
    /// Switching off frees cores but not RAM.
    pub fn toggle_process_active(&mut self, name: ProgramName, active: bool) -> bool {
        let Some(index) = self.position(name) else {
            return false;
        };

        self.processes[index].toggle_active(active);
        self.ui_events.enqueue_event(UiEvent::process_updated(name));
        tracing::debug!(program = %name, active, "process toggled");
        self.update_running_processes();
        true
    }

    /// Re-run allocation after the hardware changed.
    pub fn handle_hardware_updated(&mut self) {
        tracing::debug!("hardware updated, reallocating");
        self.update_running_processes();
    }

    /// Rebind a process to the current owned version of its program.
    ///
    /// A process whose program is no longer owned is deleted.
    pub fn handle_program_updated(&mut self, name: ProgramName) {
        let Some(index) = self.position(name) else {
            return;
        };

        let program = self.programs.read().get_owned_program_by_name(name);
        match program {
            Some(program) => {
                self.processes[index].rebind_program(program);
                self.ui_events.enqueue_event(UiEvent::process_updated(name));
                self.update_running_processes();
            }
            None => {
                self.delete_process(name);
            }
        }
    }

    /// Advance the simulation by one tick.
    pub fn process_tick(&mut self) {
        let env = PerformEnv {
            update_interval_ms: self.update_interval_ms,
            performance: self.hardware.read().performance(),
        };
        let mut has_finished_processes = false;

        {
            let mut effects = self.effects.lock();

            if let Some(index) = self.passive {
                let process = &self.processes[index];
                if process.is_active() {
                    process.program().perform(
                        self.available_cores,
                        self.available_ram,
                        &env,
                        &mut *effects,
                    );
                }
            }

            for &index in &self.running {
                let process = &mut self.processes[index];
                process.increase_completion(env.update_interval_ms, env.performance);
                self.ui_events
                    .enqueue_event(UiEvent::process_progress_updated(process.program_name()));

                if process.is_completed() {
                    process
                        .program()
                        .perform(process.threads(), process.total_ram(), &env, &mut *effects);
                    has_finished_processes = true;
                }
            }
        }

        if has_finished_processes {
            self.update_finished_processes();
            self.update_running_processes();
        }
    }

    /// Drop every process (new game). Notifications still queued from the
    /// previous game are discarded.
    pub fn start_new_state(&mut self) {
        self.ui_events.discard_events();
        self.processes.clear();
        self.update_running_processes();
    }

    /// Persist processes in priority order.
    #[must_use]
    pub fn serialize(&self) -> ProcessesSnapshot {
        ProcessesSnapshot {
            processes: self.processes.iter().map(Process::serialize).collect(),
        }
    }

    /// Replace all processes with the ones in `snapshot`.
    ///
    /// The snapshot is checked in full before anything changes: every program
    /// must be owned, names must be unique, at most one process may be
    /// autoscalable and reserved RAM must fit the hardware.
    pub fn deserialize(&mut self, snapshot: &ProcessesSnapshot) -> Result<(), SchedulerError> {
        let mut processes: Vec<Process> = Vec::with_capacity(snapshot.processes.len());
        let mut total_ram = 0_u64;

        {
            let programs = self.programs.read();
            for entry in &snapshot.processes {
                let program = programs
                    .get_owned_program_by_name(entry.program_name)
                    .ok_or(SchedulerError::ProgramNotOwned(entry.program_name))?;

                if processes
                    .iter()
                    .any(|process| process.program_name() == entry.program_name)
                {
                    return Err(SchedulerError::InvalidSnapshot(format!(
                        "duplicate process for {}",
                        entry.program_name
                    )));
                }
                if program.is_autoscalable()
                    && processes.iter().any(|process| process.program().is_autoscalable())
                {
                    return Err(SchedulerError::InvalidSnapshot(
                        "more than one autoscalable process".into(),
                    ));
                }
                if !program.is_autoscalable() && entry.threads == 0 {
                    return Err(SchedulerError::InvalidThreads {
                        program: entry.program_name,
                        threads: entry.threads,
                    });
                }
                if !entry.current_completion_points.is_finite()
                    || entry.current_completion_points < 0.0
                {
                    return Err(SchedulerError::InvalidSnapshot(format!(
                        "invalid completion points for {}",
                        entry.program_name
                    )));
                }

                let process = Process::new(
                    program,
                    entry.threads,
                    entry.is_active,
                    entry.current_completion_points,
                );
                total_ram += u64::from(process.total_ram());
                processes.push(process);
            }
        }

        let capacity = u64::from(self.hardware.read().ram());
        if total_ram > capacity {
            return Err(SchedulerError::InvalidSnapshot(format!(
                "processes reserve {total_ram} ram, hardware has {capacity}"
            )));
        }

        self.processes = processes;
        self.update_running_processes();
        tracing::info!(processes = self.processes.len(), "processes restored");
        Ok(())
    }

    /// Subscribe to batched change notifications.
    pub fn add_ui_event_listener(&mut self, kind: UiEventKind, handler: UiEventHandler) -> ListenerId {
        self.ui_events.add_listener(kind, handler)
    }

    /// Unsubscribe. Returns false if the id was unknown.
    pub fn remove_ui_event_listener(&mut self, id: ListenerId) -> bool {
        self.ui_events.remove_listener(id)
    }

    /// Deliver queued notifications. Returns the number of events flushed.
    pub fn fire_ui_events(&mut self) -> usize {
        self.ui_events.fire_events()
    }

    /// Notifications waiting for the next flush.
    #[must_use]
    pub fn pending_ui_events(&self) -> &[UiEvent] {
        self.ui_events.pending()
    }

    fn position(&self, name: ProgramName) -> Option<usize> {
        self.processes
            .iter()
            .position(|process| process.program_name() == name)
    }

    /// Allocation pass.
    fn update_running_processes(&mut self) {
        let capacity = self.hardware.read().capacity();
        self.available_cores = capacity.cores;
        self.available_ram = capacity.ram;
        self.running.clear();
        self.passive = self
            .processes
            .iter()
            .position(|process| process.program().is_autoscalable());

        for (index, process) in self.processes.iter_mut().enumerate() {
            if process.program().is_autoscalable() {
                process.set_used_cores(0);
                continue;
            }

            let process_ram = process.total_ram();
            if process_ram > self.available_ram {
                tracing::warn!(
                    program = %process.program_name(),
                    process_ram,
                    available_ram = self.available_ram,
                    "ram over-subscribed"
                );
            }
            self.available_ram = self.available_ram.saturating_sub(process_ram);

            if !process.is_active() {
                process.set_used_cores(0);
                continue;
            }

            let used_cores = process.max_cores().min(self.available_cores);
            if used_cores > 0 {
                process.set_used_cores(used_cores);
                self.running.push(index);
                self.available_cores -= used_cores;
            } else {
                process.set_used_cores(0);
            }
        }

        tracing::debug!(
            available_cores = self.available_cores,
            available_ram = self.available_ram,
            running = self.running.len(),
            "allocation updated"
        );
        self.ui_events.enqueue_event(UiEvent::processes_updated());
    }

    /// Requeue finished repeatable processes at the end, drop the rest.
    fn update_finished_processes(&mut self) {
        let (finished, mut kept): (Vec<Process>, Vec<Process>) =
            std::mem::take(&mut self.processes)
                .into_iter()
                .partition(|process| !process.program().is_autoscalable() && process.is_completed());

        for mut process in finished {
            let name = process.program_name();
            if process.program().is_repeatable() {
                process.reset_completion();
                tracing::debug!(program = %name, "process completed, requeued");
                kept.push(process);
            } else {
                tracing::info!(program = %name, "process completed");
                self.post_message(MessageEvent::ProcessDeleted, name, process.threads());
            }
        }

        self.processes = kept;
    }

    fn delete_autoscalable_processes(&mut self) {
        self.remove_where(|process| process.program().is_autoscalable());
        self.update_running_processes();
    }

    fn remove_where(&mut self, predicate: impl Fn(&Process) -> bool) -> usize {
        let (removed, kept): (Vec<Process>, Vec<Process>) = std::mem::take(&mut self.processes)
            .into_iter()
            .partition(|process| predicate(process));
        self.processes = kept;

        for process in &removed {
            tracing::info!(program = %process.program_name(), "process deleted");
            self.post_message(
                MessageEvent::ProcessDeleted,
                process.program_name(),
                process.threads(),
            );
        }
        removed.len()
    }

    fn post_message(&self, event: MessageEvent, program: ProgramName, threads: u32) {
        self.message_log
            .lock()
            .post_message(build_message(event, program, threads));
    }
}
