//! Read-only views and request models for presentation layers.

use serde::{Deserialize, Serialize};

use crate::core::process::Process;
use crate::core::program::ProgramName;
use crate::core::scheduler::ProcessScheduler;
use crate::core::SchedulerError;

/// Request to start a process or change its threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartProcessRequest {
    /// Program to run.
    pub program: ProgramName,
    /// Thread count; ignored for autoscalable programs.
    pub threads: u32,
}

/// Result of a start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartProcessResponse {
    /// Process started or updated.
    Started,
    /// Program not owned or not enough RAM.
    Rejected,
}

/// One process as shown to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessView {
    /// Program name.
    pub program: ProgramName,
    /// Thread count.
    pub threads: u32,
    /// Switched on.
    pub is_active: bool,
    /// Cores granted this tick.
    pub used_cores: u32,
    /// RAM reserved.
    pub total_ram: u32,
    /// Progress toward completion.
    pub current_completion_points: f64,
    /// Completion target.
    pub max_completion_points: f64,
    /// Active but granted no cores.
    pub is_starved: bool,
}

impl From<&Process> for ProcessView {
    fn from(process: &Process) -> Self {
        Self {
            program: process.program_name(),
            threads: process.threads(),
            is_active: process.is_active(),
            used_cores: process.used_cores(),
            total_ram: process.total_ram(),
            current_completion_points: process.current_completion_points(),
            max_completion_points: process.max_completion_points(),
            is_starved: process.is_active()
                && !process.program().is_autoscalable()
                && process.used_cores() == 0,
        }
    }
}

/// Scheduler overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerView {
    /// Cores left after allocation.
    pub available_cores: u32,
    /// RAM left after allocation.
    pub available_ram: u32,
    /// Processes in priority order.
    pub processes: Vec<ProcessView>,
}

/// Build the scheduler overview.
#[must_use]
pub fn scheduler_view(scheduler: &ProcessScheduler) -> SchedulerView {
    SchedulerView {
        available_cores: scheduler.available_cores(),
        available_ram: scheduler.available_ram(),
        processes: scheduler.list_processes().iter().map(ProcessView::from).collect(),
    }
}

/// Handle a start request.
pub fn start_process(
    scheduler: &mut ProcessScheduler,
    req: &StartProcessRequest,
) -> Result<StartProcessResponse, SchedulerError> {
    let started = scheduler.add_process(req.program, req.threads)?;
    Ok(if started {
        StartProcessResponse::Started
    } else {
        StartProcessResponse::Rejected
    })
}
