//! Simulation core: programs, processes, allocation and the tick clock.

pub mod catalog;
pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod hardware;
pub mod message_log;
pub mod process;
pub mod program;
pub mod scheduler;

pub use catalog::{OwnedPrograms, ProgramFactory, SerializedProgram, SharedPrograms};
pub use clock::{GameSpeed, GameTime, TickClock, TickTarget};
pub use effects::{EffectSink, ProgramEffect};
pub use error::{AppResult, SchedulerError};
pub use events::{EventBatcher, ListenerId, UiEvent, UiEventHandler, UiEventKind};
pub use hardware::{HardwareCapacity, HardwareParameter, MainframeHardware, SharedHardware};
pub use message_log::{
    build_message, InMemoryMessageLog, LogMessage, MessageEvent, MessageLogSink, SharedMessageLog,
};
pub use process::{Process, SerializedProcess};
pub use program::{PerformEnv, Program, ProgramName};
pub use scheduler::{ProcessScheduler, ProcessesSnapshot, SchedulerContext, SharedEffects};
