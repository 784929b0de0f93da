#![allow(missing_docs)]
#![cfg(feature = "tokio-runtime")]

use std::sync::Arc;
use std::time::Duration;

use mainframe_scheduler::builders::build_session;
use mainframe_scheduler::config::{GameConfig, Settings};
use mainframe_scheduler::core::{HardwareCapacity, ProgramName};
use mainframe_scheduler::runtime::spawn_game_loop;
use mainframe_scheduler::util::ManualTimeSource;
use parking_lot::Mutex;

fn config() -> GameConfig {
    GameConfig {
        settings: Settings {
            update_interval_ms: 100,
            max_updates_per_tick: 100,
            ..Settings::default()
        },
        hardware: HardwareCapacity {
            cores: 2,
            ram: 8,
            performance: 1.0,
        },
        ..GameConfig::default()
    }
}

#[tokio::test]
async fn test_loop_processes_elapsed_ticks_and_stops() {
    let source = ManualTimeSource::new(0);
    let mut session = build_session(&config(), source.clone()).unwrap();
    session
        .scheduler_mut()
        .add_process(ProgramName::CodeGenerator, 1)
        .unwrap();
    let session = Arc::new(Mutex::new(session));

    source.advance(1_000);
    let (handle, shutdown) = spawn_game_loop(Arc::clone(&session), Duration::from_millis(5));

    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.send(true).unwrap();
    let total = handle.await.unwrap();

    assert_eq!(total, 10);
    let guard = session.lock();
    let process = guard
        .scheduler()
        .get_process_by_name(ProgramName::CodeGenerator)
        .unwrap();
    // Ten ticks of one core at 0.1s each give one point.
    assert!((process.current_completion_points() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_loop_stops_when_sender_dropped() {
    let source = ManualTimeSource::new(0);
    let session = Arc::new(Mutex::new(build_session(&config(), source).unwrap()));

    let (handle, shutdown) = spawn_game_loop(session, Duration::from_millis(5));
    drop(shutdown);

    let total = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(total, 0);
}
