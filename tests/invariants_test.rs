//! Randomized operation sequences checked against allocation invariants.

mod common;

use common::{harness, threaded, Harness};
use mainframe_scheduler::core::{HardwareParameter, ProgramName, SchedulerError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_program(rng: &mut StdRng) -> ProgramName {
    ProgramName::ALL[rng.random_range(0..ProgramName::ALL.len())]
}

fn check_invariants(h: &Harness) {
    let capacity = h.hardware.read().capacity();
    let processes = h.scheduler.list_processes();

    let used_cores: u32 = processes.iter().map(|p| p.used_cores()).sum();
    let total_ram: u32 = processes.iter().map(|p| p.total_ram()).sum();
    assert!(used_cores <= capacity.cores);
    assert_eq!(h.scheduler.available_cores(), capacity.cores - used_cores);
    assert!(total_ram <= capacity.ram);
    assert_eq!(h.scheduler.available_ram(), capacity.ram - total_ram);

    let autoscalers: Vec<_> = processes
        .iter()
        .filter(|p| p.program().is_autoscalable())
        .collect();
    assert!(autoscalers.len() <= 1);
    for process in &autoscalers {
        assert_eq!(process.threads(), 0);
        assert_eq!(process.used_cores(), 0);
    }

    for (index, process) in processes.iter().enumerate() {
        assert!(processes[..index]
            .iter()
            .all(|other| other.program_name() != process.program_name()));
        assert!(process.current_completion_points() >= 0.0);
        assert!(process.current_completion_points() <= process.max_completion_points());
        if !process.program().is_autoscalable() {
            assert!(process.threads() > 0);
        }
        if !process.is_active() {
            assert_eq!(process.used_cores(), 0);
        }
    }

    // Cores go to active threaded processes strictly in order.
    let mut short = false;
    for process in processes
        .iter()
        .filter(|p| p.is_active() && !p.program().is_autoscalable())
    {
        assert!(process.used_cores() <= process.max_cores());
        if short {
            assert_eq!(process.used_cores(), 0);
        }
        if process.used_cores() < process.max_cores() {
            short = true;
        }
    }
    if h.scheduler.available_cores() > 0 {
        assert!(!short);
    }
}

fn run(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut h = harness(
        6,
        40,
        &[
            (ProgramName::CodeGenerator, threaded(1, 4, 3.0)),
            (ProgramName::MainframeHardwareAutobuyer, threaded(2, 3, 5.0)),
            (ProgramName::PasswordCracker, threaded(2, 5, 4.0)),
        ],
    );

    for _ in 0..steps {
        match rng.random_range(0..7) {
            0 | 1 => {
                let name = random_program(&mut rng);
                let threads = rng.random_range(0..5);
                let before = h.scheduler.serialize();
                match h.scheduler.add_process(name, threads) {
                    Ok(true) => {}
                    Ok(false) => assert_eq!(h.scheduler.serialize(), before),
                    Err(SchedulerError::InvalidThreads { .. }) => {
                        assert_eq!(threads, 0);
                        assert_eq!(h.scheduler.serialize(), before);
                    }
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
            2 => {
                let name = random_program(&mut rng);
                h.scheduler.delete_process(name);
            }
            3 => {
                let name = random_program(&mut rng);
                let active = rng.random_bool(0.5);
                h.scheduler.toggle_process_active(name, active);
            }
            4 => {
                let parameter = if rng.random_bool(0.5) {
                    HardwareParameter::Cores
                } else {
                    HardwareParameter::Ram
                };
                h.hardware.write().upgrade(parameter, 1);
                h.scheduler.handle_hardware_updated();
            }
            _ => h.scheduler.process_tick(),
        }
        check_invariants(&h);
    }
}

#[test]
fn test_invariants_hold_under_random_operations() {
    for seed in 0..20 {
        run(seed, 300);
    }
}

#[test]
fn test_allocation_is_stable_without_changes() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut h = harness(3, 30, &[]);
    for _ in 0..10 {
        let name = random_program(&mut rng);
        let _ = h.scheduler.add_process(name, rng.random_range(1..3));
    }

    let cores = h.scheduler.available_cores();
    let ram = h.scheduler.available_ram();
    h.scheduler.handle_hardware_updated();
    h.scheduler.handle_hardware_updated();

    assert_eq!(h.scheduler.available_cores(), cores);
    assert_eq!(h.scheduler.available_ram(), ram);
    check_invariants(&h);
}
