//! Completion logging, record aggregation and day queries.
//!
//! # Responsibility
//! - Append completions and keep the derived personal-record and
//!   world-record tables consistent with the minimum-so-far rule.
//! - Answer the lookups the presentation layer renders: bests, records,
//!   per-day completions, per-kid tallies.
//!
//! # Invariants
//! - A record row only ever improves: strictly smaller times replace it,
//!   ties and slower times leave it untouched (first achiever wins).
//! - Removing log entries never recomputes records; minimum-so-far values
//!   are monotonic by design.

use crate::engine::{EngineError, EngineResult};
use crate::model::document::AppDocument;
use crate::model::record::{PersonalRecord, TaskCompletion, WorldRecord};
use std::collections::HashSet;

/// A personal best together with the timestamp that set it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalBest {
    pub time: u32,
    pub last_updated: String,
}

/// Per-kid tallies for the records overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KidStats {
    /// Personal-record rows the kid holds.
    pub personal_records: usize,
    /// World-record rows currently credited to the kid.
    pub world_records: usize,
    /// Total completion log entries, any day.
    pub completions: usize,
}

/// Appends a completion to the log and refreshes the derived records.
///
/// The kid and task must both exist when the entry is created; the log
/// itself is append-only and allows repeat completions of the same task on
/// the same day.
pub fn add_completion(doc: &AppDocument, completion: TaskCompletion) -> EngineResult<AppDocument> {
    completion.validate()?;
    let kid = doc
        .kids
        .iter()
        .find(|kid| kid.id == completion.kid_id)
        .ok_or_else(|| EngineError::UnknownKid(completion.kid_id.clone()))?;
    if !doc.tasks.iter().any(|task| task.id == completion.task_id) {
        return Err(EngineError::UnknownTask(completion.task_id.clone()));
    }

    let mut next = doc.clone();

    let beats_personal = personal_best(doc, &completion.kid_id, &completion.task_id)
        .map_or(true, |best| completion.time_in_seconds < best);
    if beats_personal {
        next.personal_records.retain(|record| {
            !(record.kid_id == completion.kid_id && record.task_id == completion.task_id)
        });
        next.personal_records.push(PersonalRecord {
            task_id: completion.task_id.clone(),
            kid_id: completion.kid_id.clone(),
            personal_best: completion.time_in_seconds,
            last_updated: completion.completed_at.clone(),
        });
    }

    let beats_world = world_record(doc, &completion.task_id)
        .map_or(true, |record| completion.time_in_seconds < record.time);
    if beats_world {
        next.world_records
            .retain(|record| record.task_id != completion.task_id);
        next.world_records.push(WorldRecord {
            task_id: completion.task_id.clone(),
            kid_id: completion.kid_id.clone(),
            time: completion.time_in_seconds,
            kid_name: kid.name.clone(),
            date: completion.date.clone(),
        });
    }

    next.completions.push(completion);
    Ok(next)
}

/// Fastest time this kid recorded for this task, if any.
pub fn personal_best(doc: &AppDocument, kid_id: &str, task_id: &str) -> Option<u32> {
    doc.personal_records
        .iter()
        .find(|record| record.kid_id == kid_id && record.task_id == task_id)
        .map(|record| record.personal_best)
}

/// Fastest time plus the timestamp of the completion that set it.
pub fn personal_best_with_date(
    doc: &AppDocument,
    kid_id: &str,
    task_id: &str,
) -> Option<PersonalBest> {
    doc.personal_records
        .iter()
        .find(|record| record.kid_id == kid_id && record.task_id == task_id)
        .map(|record| PersonalBest {
            time: record.personal_best,
            last_updated: record.last_updated.clone(),
        })
}

/// Fastest time any kid recorded for this task, if any.
pub fn world_record<'doc>(doc: &'doc AppDocument, task_id: &str) -> Option<&'doc WorldRecord> {
    doc.world_records
        .iter()
        .find(|record| record.task_id == task_id)
}

/// All of the kid's completion entries for one calendar day.
pub fn completions_on<'doc>(
    doc: &'doc AppDocument,
    kid_id: &str,
    date: &str,
) -> Vec<&'doc TaskCompletion> {
    doc.completions
        .iter()
        .filter(|entry| entry.kid_id == kid_id && entry.date == date)
        .collect()
}

/// Removes the day's log entries for one (kid, task) pair, the
/// "uncomplete" toggle. Records set by a removed entry stay as they are.
pub fn clear_task_completions(
    doc: &AppDocument,
    kid_id: &str,
    task_id: &str,
    date: &str,
) -> AppDocument {
    let mut next = doc.clone();
    next.completions.retain(|entry| {
        !(entry.kid_id == kid_id && entry.task_id == task_id && entry.date == date)
    });
    next
}

/// Clears one kid's progress in one routine for one day: their completions
/// for the routine's tasks plus all of their active timers.
pub fn reset_day(
    doc: &AppDocument,
    kid_id: &str,
    routine_id: &str,
    date: &str,
) -> AppDocument {
    let routine_tasks = routine_task_ids(doc, routine_id);

    let mut next = doc.clone();
    next.completions.retain(|entry| {
        !(entry.kid_id == kid_id
            && entry.date == date
            && routine_tasks.contains(entry.task_id.as_str()))
    });
    next.active_timers.retain(|timer| timer.kid_id != kid_id);
    next
}

/// Clears every kid's progress in one routine for one day and stops all
/// timers (the multiplayer reset).
pub fn reset_day_all(doc: &AppDocument, routine_id: &str, date: &str) -> AppDocument {
    let routine_tasks = routine_task_ids(doc, routine_id);

    let mut next = doc.clone();
    next.completions
        .retain(|entry| !(entry.date == date && routine_tasks.contains(entry.task_id.as_str())));
    next.active_timers.clear();
    next
}

/// Tallies for the records overview page.
pub fn kid_stats(doc: &AppDocument, kid_id: &str) -> KidStats {
    KidStats {
        personal_records: doc
            .personal_records
            .iter()
            .filter(|record| record.kid_id == kid_id)
            .count(),
        world_records: doc
            .world_records
            .iter()
            .filter(|record| record.kid_id == kid_id)
            .count(),
        completions: doc
            .completions
            .iter()
            .filter(|entry| entry.kid_id == kid_id)
            .count(),
    }
}

fn routine_task_ids<'doc>(doc: &'doc AppDocument, routine_id: &str) -> HashSet<&'doc str> {
    doc.tasks
        .iter()
        .filter(|task| task.routine_id == routine_id)
        .map(|task| task.id.as_str())
        .collect()
}
