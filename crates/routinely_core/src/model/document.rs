//! The persisted app document and its default seed.
//!
//! # Responsibility
//! - Define the `AppDocument` aggregate, the sole unit of persistence.
//! - Provide the fixed first-run seed and the current document version.
//!
//! # Invariants
//! - Serialized field names stay camelCase to match the legacy document
//!   shape on disk.
//! - `version` only changes when the stored shape changes incompatibly.

use crate::model::entity::{Kid, Routine, Task};
use crate::model::record::{ActiveTimer, PersonalRecord, TaskCompletion, WorldRecord};
use serde::{Deserialize, Serialize};

/// Current document shape version. Stored documents behind this version are
/// reseeded on load (one exception: the routines backfill in `store::migrate`).
pub const DATA_VERSION: u32 = 1;

/// Reserved id of the seeded morning routine.
pub const MORNING_ROUTINE_ID: &str = "morning";
/// Reserved id of the seeded evening routine.
pub const EVENING_ROUTINE_ID: &str = "evening";

/// The whole persisted state: roster, completion log and derived records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppDocument {
    pub version: u32,
    pub kids: Vec<Kid>,
    pub routines: Vec<Routine>,
    pub tasks: Vec<Task>,
    pub completions: Vec<TaskCompletion>,
    pub personal_records: Vec<PersonalRecord>,
    pub world_records: Vec<WorldRecord>,
    pub active_timers: Vec<ActiveTimer>,
}

impl AppDocument {
    /// Builds the fixed first-run document: two kids, the two default
    /// routines and their twelve seed tasks. Log and record tables start
    /// empty.
    pub fn seeded() -> Self {
        Self {
            version: DATA_VERSION,
            kids: default_kids(),
            routines: default_routines(),
            tasks: default_tasks(),
            completions: Vec::new(),
            personal_records: Vec::new(),
            world_records: Vec::new(),
            active_timers: Vec::new(),
        }
    }
}

fn default_kids() -> Vec<Kid> {
    vec![
        Kid::with_id("1", "Child 1", "bg-blue-500", "👦"),
        Kid::with_id("2", "Child 2", "bg-pink-500", "👧"),
    ]
}

/// Seed routines. Also synthesized by the legacy-shape migration, so the ids
/// here must stay in sync with the legacy `routineType` values.
pub(crate) fn default_routines() -> Vec<Routine> {
    vec![
        Routine {
            id: MORNING_ROUTINE_ID.to_string(),
            name: "Morning".to_string(),
            icon: "☀️".to_string(),
            color: "from-yellow-300 to-orange-400".to_string(),
            is_default: true,
        },
        Routine {
            id: EVENING_ROUTINE_ID.to_string(),
            name: "Evening".to_string(),
            icon: "🌙".to_string(),
            color: "from-indigo-500 to-purple-600".to_string(),
            is_default: true,
        },
    ]
}

fn default_tasks() -> Vec<Task> {
    vec![
        Task::with_id("m1", "Go to the toilet", "🚽", MORNING_ROUTINE_ID, 1),
        Task::with_id("m2", "Get changed", "👕", MORNING_ROUTINE_ID, 2),
        Task::with_id("m3", "Pack bag for school", "🎒", MORNING_ROUTINE_ID, 3),
        Task::with_id("m4", "Eat breakfast", "🍳", MORNING_ROUTINE_ID, 4),
        Task::with_id("m5", "Brush teeth", "🪥", MORNING_ROUTINE_ID, 5),
        Task::with_id("m6", "Say bye to Mum", "👋", MORNING_ROUTINE_ID, 6),
        Task::with_id("e1", "Clean up the table", "🧹", EVENING_ROUTINE_ID, 1),
        Task::with_id("e2", "Tidy toys", "🧸", EVENING_ROUTINE_ID, 2),
        Task::with_id("e3", "Take a bath", "🛁", EVENING_ROUTINE_ID, 3),
        Task::with_id("e4", "Brush teeth", "🪥", EVENING_ROUTINE_ID, 4),
        Task::with_id("e5", "Get changed", "🌙", EVENING_ROUTINE_ID, 5),
        Task::with_id("e6", "Read bedtime story", "📖", EVENING_ROUTINE_ID, 6),
    ]
}

#[cfg(test)]
mod tests {
    use super::{AppDocument, DATA_VERSION, EVENING_ROUTINE_ID, MORNING_ROUTINE_ID};

    #[test]
    fn seed_has_expected_shape() {
        let doc = AppDocument::seeded();

        assert_eq!(doc.version, DATA_VERSION);
        assert_eq!(doc.kids.len(), 2);
        assert_eq!(doc.routines.len(), 2);
        assert_eq!(doc.tasks.len(), 12);
        assert!(doc.completions.is_empty());
        assert!(doc.personal_records.is_empty());
        assert!(doc.world_records.is_empty());
        assert!(doc.active_timers.is_empty());

        assert!(doc.routines.iter().all(|routine| routine.is_default));
        for routine_id in [MORNING_ROUTINE_ID, EVENING_ROUTINE_ID] {
            let count = doc
                .tasks
                .iter()
                .filter(|task| task.routine_id == routine_id)
                .count();
            assert_eq!(count, 6);
        }
    }

    #[test]
    fn seed_serializes_with_legacy_field_names() {
        let doc = AppDocument::seeded();
        let payload = serde_json::to_string(&doc).unwrap();

        assert!(payload.contains("\"personalRecords\""));
        assert!(payload.contains("\"activeTimers\""));
        assert!(payload.contains("\"isDefault\""));
        assert!(payload.contains("\"routineId\""));
    }
}
