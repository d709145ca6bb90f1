//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `routinely_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use routinely_core::{MemoryBackend, RoutineService, MORNING_ROUTINE_ID};

fn main() {
    let service = RoutineService::open(MemoryBackend::new());
    let document = service.document();

    println!("routinely_core version={}", routinely_core::core_version());
    println!(
        "seeded kids={} routines={} tasks={}",
        document.kids.len(),
        document.routines.len(),
        document.tasks.len()
    );
    println!(
        "morning tasks={}",
        service.tasks_in_routine(MORNING_ROUTINE_ID).len()
    );
}
