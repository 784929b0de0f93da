//! Session wiring, presentation-facing views and the async frame loop.

pub mod api;
pub mod session;
#[cfg(feature = "tokio-runtime")]
pub mod tokio_driver;

pub use api::{scheduler_view, start_process, ProcessView, SchedulerView, StartProcessRequest};
pub use session::{GameSession, SessionSnapshot};
#[cfg(feature = "tokio-runtime")]
pub use tokio_driver::{run_game_loop, spawn_game_loop};
