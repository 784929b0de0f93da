//! Player-facing message log.
//!
//! Separate from `tracing` output: these entries are game content (process
//! started, process deleted) shown to the player, bounded by the configured
//! log size.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::program::ProgramName;
use crate::util::clock::now_ms;

/// Message log handle shared between the session and the scheduler.
pub type SharedMessageLog = Arc<Mutex<dyn MessageLogSink>>;

/// Kind of logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEvent {
    /// A process was started or had its thread count changed.
    ProcessStarted,
    /// A process was deleted, superseded or finished for good.
    ProcessDeleted,
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Entry identifier.
    pub id: Uuid,
    /// Event kind.
    pub event: MessageEvent,
    /// Program the process runs.
    pub program: ProgramName,
    /// Thread count at the time of the event.
    pub threads: u32,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Message log abstraction.
pub trait MessageLogSink: Send {
    /// Record a message.
    fn post_message(&mut self, message: LogMessage);
}

/// Bounded in-memory message log. Oldest entries are dropped first.
pub struct InMemoryMessageLog {
    messages: VecDeque<LogMessage>,
    max_messages: usize,
}

impl InMemoryMessageLog {
    /// Create a log holding at most `max_messages` entries.
    #[must_use]
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(max_messages.min(1024)),
            max_messages,
        }
    }

    /// Snapshot of stored messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<LogMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Remove every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

impl MessageLogSink for InMemoryMessageLog {
    fn post_message(&mut self, message: LogMessage) {
        if self.max_messages == 0 {
            return;
        }
        if self.messages.len() >= self.max_messages {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }
}

/// Build a log message stamped with a fresh id and the current time.
#[must_use]
pub fn build_message(event: MessageEvent, program: ProgramName, threads: u32) -> LogMessage {
    LogMessage {
        id: Uuid::new_v4(),
        event,
        program,
        threads,
        created_at_ms: now_ms(),
    }
}
