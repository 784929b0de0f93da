//! # Mainframe Scheduler
//!
//! Simulation core of an idle mainframe game: a discrete-time engine that
//! turns elapsed wall-clock time into a bounded number of ticks and, on every
//! tick, shares two finite resources (cores and RAM) among running processes.
//!
//! ## Key Features
//!
//! - **Priority by start order**: processes are served in the order they were
//!   started; later processes starve when cores run out
//! - **RAM reserved by existence**: switching a process off frees its cores,
//!   never its RAM; admission is rejected outright if RAM does not fit
//! - **Completion state machine**: repeatable programs restart at the back of
//!   the queue, one-shot programs exit
//! - **Single autoscaler**: at most one autoscalable program runs, fed with
//!   whatever capacity is left over
//! - **Bounded catch-up**: the tick clock caps ticks per update and banks
//!   paused time for fast-forward
//! - **Batched notifications**: subscribers see one refresh per tick or action
//!
//! ## Example
//!
//! ```rust,ignore
//! use mainframe_scheduler::builders::build_session;
//! use mainframe_scheduler::config::GameConfig;
//! use mainframe_scheduler::core::ProgramName;
//! use mainframe_scheduler::util::SystemTimeSource;
//!
//! let mut session = build_session(&GameConfig::default(), SystemTimeSource)?;
//! session.scheduler_mut().add_process(ProgramName::CodeGenerator, 1)?;
//!
//! // Call from the frame loop.
//! let ticks = session.update_state();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Programs, processes, allocation and the tick clock.
pub mod core;
/// Configuration models for settings, catalog and new games.
pub mod config;
/// Builders to construct sessions from configuration.
pub mod builders;
/// Infrastructure adapters for effect delivery.
pub mod infra;
/// Session wiring, views and the async frame loop.
pub mod runtime;
/// Shared utilities.
pub mod util;
