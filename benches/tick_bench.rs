//! Benchmarks for the simulation hot paths.
//!
//! Benchmarks cover:
//! - Allocation pass after hardware changes
//! - Single tick with every program running
//! - Bounded catch-up through the tick clock
//! - Snapshot restore

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use std::sync::Arc;

use mainframe_scheduler::config::{ProgramCatalogConfig, Settings};
use mainframe_scheduler::core::{
    HardwareCapacity, InMemoryMessageLog, MainframeHardware, OwnedPrograms, ProcessScheduler,
    ProgramFactory, ProgramName, SchedulerContext, TickClock,
};
use mainframe_scheduler::infra::InMemoryEffectLedger;
use mainframe_scheduler::util::ManualTimeSource;
use parking_lot::Mutex;

// ============================================================================
// Helper Functions
// ============================================================================

fn build_scheduler(cores: u32, ram: u32) -> ProcessScheduler {
    let factory = ProgramFactory::new(ProgramCatalogConfig::default());
    let mut owned = OwnedPrograms::new();
    for name in ProgramName::ALL {
        owned.add_program(factory.make_program(name, 3, 2));
    }

    let mut scheduler = ProcessScheduler::new(SchedulerContext {
        hardware: MainframeHardware::new(HardwareCapacity {
            cores,
            ram,
            performance: 1.5,
        })
        .into_shared(),
        programs: owned.into_shared(),
        effects: Arc::new(Mutex::new(InMemoryEffectLedger::new())),
        message_log: Arc::new(Mutex::new(InMemoryMessageLog::new(200))),
        update_interval_ms: 200,
    });

    for name in ProgramName::ALL {
        let threads = if name.is_autoscalable() { 0 } else { 4 };
        let _ = scheduler.add_process(name, threads);
    }
    scheduler
}

// ============================================================================
// Scheduler Benchmarks
// ============================================================================

fn bench_allocation_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocation_pass");

    for cores in [4, 16, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(cores), &cores, |b, &cores| {
            let mut scheduler = build_scheduler(cores, 1_000);
            b.iter(|| {
                scheduler.handle_hardware_updated();
                black_box(scheduler.available_cores());
            });
        });
    }
    group.finish();
}

fn bench_process_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_tick");

    group.bench_function("all_programs_running", |b| {
        let mut scheduler = build_scheduler(64, 1_000);
        b.iter(|| {
            scheduler.process_tick();
            black_box(scheduler.running_processes());
        });
    });
    group.finish();
}

// ============================================================================
// Clock Benchmarks
// ============================================================================

fn bench_catch_up(c: &mut Criterion) {
    let mut group = c.benchmark_group("catch_up");
    let settings = Settings::default();

    for ticks in [10_u64, 100] {
        group.throughput(Throughput::Elements(ticks));
        group.bench_with_input(BenchmarkId::from_parameter(ticks), &ticks, |b, &ticks| {
            let source = ManualTimeSource::new(0);
            let mut clock = TickClock::new(&settings, source.clone());
            let mut scheduler = build_scheduler(16, 1_000);
            b.iter(|| {
                source.advance(ticks * settings.update_interval_ms);
                black_box(clock.update_state(&mut scheduler));
            });
        });
    }
    group.finish();
}

// ============================================================================
// Snapshot Benchmarks
// ============================================================================

fn bench_snapshot_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_restore");

    group.bench_function("serialize_deserialize", |b| {
        let mut scheduler = build_scheduler(16, 1_000);
        scheduler.process_tick();
        let snapshot = scheduler.serialize();
        b.iter(|| {
            scheduler.deserialize(black_box(&snapshot)).unwrap();
        });
    });
    group.finish();
}

// ============================================================================
// Benchmark Groups
// ============================================================================

criterion_group!(scheduler_benches, bench_allocation_pass, bench_process_tick);

criterion_group!(clock_benches, bench_catch_up);

criterion_group!(snapshot_benches, bench_snapshot_restore);

criterion_main!(scheduler_benches, clock_benches, snapshot_benches);
