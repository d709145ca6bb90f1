//! Core domain logic for Routinely, a kids' routine-checklist app.
//! This crate is the single source of truth for document invariants:
//! roster cascades, record aggregation and timer state.

pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use engine::records::{KidStats, PersonalBest};
pub use engine::{EngineError, EngineResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{AppDocument, DATA_VERSION, EVENING_ROUTINE_ID, MORNING_ROUTINE_ID};
pub use model::entity::{Kid, KidPatch, Routine, RoutinePatch, Task, TaskPatch};
pub use model::record::{ActiveTimer, PersonalRecord, TaskCompletion, WorldRecord};
pub use service::RoutineService;
pub use store::{DocumentStore, FileBackend, LoadOutcome, MemoryBackend, StorageBackend};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
