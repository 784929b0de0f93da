//! Tokio frame loop that polls the tick clock.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::runtime::session::GameSession;
use crate::util::clock::TimeSource;

/// Poll `session.update_state()` every `frame` until `shutdown` turns true or
/// its sender is dropped. Returns the total number of ticks processed.
pub async fn run_game_loop<S: TimeSource>(
    session: Arc<Mutex<GameSession<S>>>,
    frame: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> u64 {
    let mut interval = tokio::time::interval(frame);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    let mut total_ticks = 0_u64;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let ticks = session.lock().update_state();
                total_ticks += u64::from(ticks);
                if ticks > 0 {
                    tracing::trace!(ticks, "frame processed");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!(total_ticks, "game loop stopped");
    total_ticks
}

/// Spawn [`run_game_loop`] on the current runtime.
/// Send `true` on the returned sender to stop it.
pub fn spawn_game_loop<S: TimeSource + 'static>(
    session: Arc<Mutex<GameSession<S>>>,
    frame: Duration,
) -> (JoinHandle<u64>, watch::Sender<bool>) {
    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(run_game_loop(session, frame, rx));
    (handle, tx)
}
