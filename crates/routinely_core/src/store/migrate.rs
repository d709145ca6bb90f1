//! Version gate and legacy-shape backfill for stored payloads.
//!
//! # Responsibility
//! - Decide what a stored payload is before typed decoding: current,
//!   upgradeable, outdated, from-the-future, or unreadable.
//! - Rewrite the one supported legacy shape (per-task `routineType`, no
//!   `routines` collection) into the current document shape.
//!
//! # Invariants
//! - Payloads behind `DATA_VERSION` are never partially upgraded; the caller
//!   reseeds them.
//! - Payloads ahead of `DATA_VERSION` are never rewritten or destroyed.

use crate::model::document::{default_routines, AppDocument, DATA_VERSION};
use serde_json::Value;

/// Legacy per-task field that predates the routines collection.
const LEGACY_ROUTINE_FIELD: &str = "routineType";

/// What a stored payload turned out to be.
#[derive(Debug)]
pub enum Assessment {
    /// Payload is at the current version and decoded cleanly.
    Current(AppDocument),
    /// Payload was at the current version but in the legacy shape; the
    /// returned document has routines synthesized and tasks rewritten.
    Migrated(AppDocument),
    /// Stored version is behind `DATA_VERSION`.
    Outdated { found: u32 },
    /// Stored version is ahead of `DATA_VERSION`.
    Newer { found: u32 },
    /// Payload is not a readable document.
    Malformed(String),
}

/// Classifies a stored payload and upgrades the legacy shape when possible.
pub fn assess(payload: &str) -> Assessment {
    let mut value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(err) => return Assessment::Malformed(err.to_string()),
    };

    let Some(root) = value.as_object_mut() else {
        return Assessment::Malformed("document root is not an object".to_string());
    };

    let found = root
        .get("version")
        .and_then(Value::as_u64)
        .map_or(0, |version| u32::try_from(version).unwrap_or(u32::MAX));
    if found < DATA_VERSION {
        return Assessment::Outdated { found };
    }
    if found > DATA_VERSION {
        return Assessment::Newer { found };
    }

    let needs_backfill = !matches!(root.get("routines"), Some(Value::Array(_)));
    if needs_backfill {
        root.insert(
            "routines".to_string(),
            serde_json::to_value(default_routines()).expect("seed routines serialize"),
        );
        rewrite_legacy_tasks(root);
    }

    match serde_json::from_value::<AppDocument>(value) {
        Ok(document) if needs_backfill => Assessment::Migrated(document),
        Ok(document) => Assessment::Current(document),
        Err(err) => Assessment::Malformed(err.to_string()),
    }
}

/// Moves each task's legacy `routineType` value into `routineId`. A present
/// legacy value wins over any `routineId` already on the task.
fn rewrite_legacy_tasks(root: &mut serde_json::Map<String, Value>) {
    let Some(Value::Array(tasks)) = root.get_mut("tasks") else {
        return;
    };

    for task in tasks {
        let Some(task) = task.as_object_mut() else {
            continue;
        };
        if let Some(legacy) = task.remove(LEGACY_ROUTINE_FIELD) {
            if !legacy.is_null() {
                task.insert("routineId".to_string(), legacy);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{assess, Assessment};
    use crate::model::document::{AppDocument, DATA_VERSION};

    #[test]
    fn current_payload_passes_through() {
        let payload = serde_json::to_string(&AppDocument::seeded()).unwrap();
        let assessment = assess(&payload);

        match assessment {
            Assessment::Current(doc) => assert_eq!(doc, AppDocument::seeded()),
            other => panic!("unexpected assessment: {other:?}"),
        }
    }

    #[test]
    fn missing_version_is_outdated() {
        let assessment = assess(r#"{"kids": [], "tasks": []}"#);
        assert!(matches!(assessment, Assessment::Outdated { found: 0 }));
    }

    #[test]
    fn future_version_is_reported_not_rewritten() {
        let payload = format!(r#"{{"version": {}}}"#, DATA_VERSION + 5);
        let assessment = assess(&payload);
        match assessment {
            Assessment::Newer { found } => assert_eq!(found, DATA_VERSION + 5),
            other => panic!("unexpected assessment: {other:?}"),
        }
    }

    #[test]
    fn legacy_routine_type_shape_is_backfilled() {
        let payload = format!(
            r#"{{
                "version": {DATA_VERSION},
                "kids": [{{"id": "1", "name": "Child 1", "color": "bg-blue-500", "avatar": "👦"}}],
                "tasks": [
                    {{"id": "m1", "name": "Go to the toilet", "icon": "🚽", "routineType": "morning", "order": 1}},
                    {{"id": "e1", "name": "Tidy toys", "icon": "🧸", "routineType": "evening", "order": 1}}
                ],
                "completions": [],
                "personalRecords": [],
                "worldRecords": [],
                "activeTimers": []
            }}"#
        );

        match assess(&payload) {
            Assessment::Migrated(doc) => {
                assert_eq!(doc.routines.len(), 2);
                assert!(doc.routines.iter().all(|routine| routine.is_default));
                assert_eq!(doc.tasks[0].routine_id, "morning");
                assert_eq!(doc.tasks[1].routine_id, "evening");
            }
            other => panic!("unexpected assessment: {other:?}"),
        }
    }

    #[test]
    fn garbage_payload_is_malformed() {
        assert!(matches!(assess("{not json"), Assessment::Malformed(_)));
        assert!(matches!(assess("[1, 2, 3]"), Assessment::Malformed(_)));
    }
}
