//! Roster operations: kids, routines, tasks, ordering.
//!
//! # Responsibility
//! - Add/update/delete kids, routines and tasks with the cascades the
//!   document's referential integrity requires.
//! - Normalize task ordering within one routine.
//!
//! # Invariants
//! - Deleting a kid removes its completions, personal records and active
//!   timers; world records it holds are kept (name snapshot survives).
//! - Deleting a routine removes its tasks and everything referencing them.
//! - `reorder_tasks` only accepts the full task-id set of the routine and
//!   rewrites orders to a dense 1-based sequence.

use crate::engine::{EngineError, EngineResult};
use crate::model::document::AppDocument;
use crate::model::entity::{Kid, KidPatch, Routine, RoutinePatch, Task, TaskPatch};
use std::collections::HashSet;

/// Appends a new kid. The id must be unused.
pub fn add_kid(doc: &AppDocument, kid: Kid) -> EngineResult<AppDocument> {
    kid.validate()?;
    if doc.kids.iter().any(|existing| existing.id == kid.id) {
        return Err(EngineError::DuplicateId(kid.id));
    }

    let mut next = doc.clone();
    next.kids.push(kid);
    Ok(next)
}

/// Merges a partial field set into the kid with this id. No-op when absent.
pub fn update_kid(doc: &AppDocument, kid_id: &str, patch: &KidPatch) -> AppDocument {
    let mut next = doc.clone();
    if let Some(kid) = next.kids.iter_mut().find(|kid| kid.id == kid_id) {
        patch.apply_to(kid);
    }
    next
}

/// Removes a kid and cascades to its completions, personal records and
/// active timers. World records the kid holds are preserved: the record row
/// carries its own name snapshot precisely so trophies outlive the roster.
pub fn delete_kid(doc: &AppDocument, kid_id: &str) -> AppDocument {
    let mut next = doc.clone();
    next.kids.retain(|kid| kid.id != kid_id);
    next.completions.retain(|entry| entry.kid_id != kid_id);
    next.personal_records.retain(|record| record.kid_id != kid_id);
    next.active_timers.retain(|timer| timer.kid_id != kid_id);
    next
}

/// Appends a new routine. The id must be unused.
pub fn add_routine(doc: &AppDocument, routine: Routine) -> EngineResult<AppDocument> {
    routine.validate()?;
    if doc.routines.iter().any(|existing| existing.id == routine.id) {
        return Err(EngineError::DuplicateId(routine.id));
    }

    let mut next = doc.clone();
    next.routines.push(routine);
    Ok(next)
}

/// Merges a partial field set into the routine with this id. No-op when
/// absent.
pub fn update_routine(doc: &AppDocument, routine_id: &str, patch: &RoutinePatch) -> AppDocument {
    let mut next = doc.clone();
    if let Some(routine) = next
        .routines
        .iter_mut()
        .find(|routine| routine.id == routine_id)
    {
        patch.apply_to(routine);
    }
    next
}

/// Removes a routine, its tasks, and every completion, personal record,
/// world record and active timer referencing those tasks.
///
/// Deleting a default routine is a precondition violation; deleting an
/// absent routine is a no-op.
pub fn delete_routine(doc: &AppDocument, routine_id: &str) -> EngineResult<AppDocument> {
    match doc.routines.iter().find(|routine| routine.id == routine_id) {
        Some(routine) if routine.is_default => {
            return Err(EngineError::DefaultRoutine(routine_id.to_string()));
        }
        Some(_) => {}
        None => return Ok(doc.clone()),
    }

    let doomed: HashSet<&str> = doc
        .tasks
        .iter()
        .filter(|task| task.routine_id == routine_id)
        .map(|task| task.id.as_str())
        .collect();

    let mut next = doc.clone();
    next.routines.retain(|routine| routine.id != routine_id);
    next.tasks.retain(|task| task.routine_id != routine_id);
    next.completions
        .retain(|entry| !doomed.contains(entry.task_id.as_str()));
    next.personal_records
        .retain(|record| !doomed.contains(record.task_id.as_str()));
    next.world_records
        .retain(|record| !doomed.contains(record.task_id.as_str()));
    next.active_timers
        .retain(|timer| !doomed.contains(timer.task_id.as_str()));
    Ok(next)
}

/// Appends a new task. The id must be unused and the routine must exist.
/// Callers compute `order`; see [`next_task_order`].
pub fn add_task(doc: &AppDocument, task: Task) -> EngineResult<AppDocument> {
    task.validate()?;
    if doc.tasks.iter().any(|existing| existing.id == task.id) {
        return Err(EngineError::DuplicateId(task.id));
    }
    if !doc
        .routines
        .iter()
        .any(|routine| routine.id == task.routine_id)
    {
        return Err(EngineError::UnknownRoutine(task.routine_id));
    }

    let mut next = doc.clone();
    next.tasks.push(task);
    Ok(next)
}

/// Merges a partial field set into the task with this id. No-op when the
/// task is absent; moving the task to a routine that does not exist is a
/// precondition violation.
pub fn update_task(doc: &AppDocument, task_id: &str, patch: &TaskPatch) -> EngineResult<AppDocument> {
    if let Some(routine_id) = &patch.routine_id {
        if !doc.routines.iter().any(|routine| &routine.id == routine_id) {
            return Err(EngineError::UnknownRoutine(routine_id.clone()));
        }
    }

    let mut next = doc.clone();
    if let Some(task) = next.tasks.iter_mut().find(|task| task.id == task_id) {
        patch.apply_to(task);
    }
    Ok(next)
}

/// Removes a task and every completion, personal record, world record and
/// active timer referencing it.
pub fn delete_task(doc: &AppDocument, task_id: &str) -> AppDocument {
    let mut next = doc.clone();
    next.tasks.retain(|task| task.id != task_id);
    next.completions.retain(|entry| entry.task_id != task_id);
    next.personal_records
        .retain(|record| record.task_id != task_id);
    next.world_records.retain(|record| record.task_id != task_id);
    next.active_timers.retain(|timer| timer.task_id != task_id);
    next
}

/// Rewrites each listed task's `order` to its 1-based position.
///
/// `task_ids` must contain exactly the routine's task ids, each once; a
/// partial or foreign list is rejected so a dense `1..=N` sequence is the
/// only reachable result. Tasks in other routines are untouched.
pub fn reorder_tasks(
    doc: &AppDocument,
    routine_id: &str,
    task_ids: &[&str],
) -> EngineResult<AppDocument> {
    let current: HashSet<&str> = doc
        .tasks
        .iter()
        .filter(|task| task.routine_id == routine_id)
        .map(|task| task.id.as_str())
        .collect();
    let requested: HashSet<&str> = task_ids.iter().copied().collect();
    if requested.len() != task_ids.len() || requested != current {
        return Err(EngineError::ReorderMismatch {
            routine_id: routine_id.to_string(),
        });
    }

    let mut next = doc.clone();
    for task in next
        .tasks
        .iter_mut()
        .filter(|task| task.routine_id == routine_id)
    {
        let position = task_ids
            .iter()
            .position(|id| *id == task.id)
            .expect("id set equality checked above");
        task.order = position as u32 + 1;
    }
    Ok(next)
}

/// Returns the routine's tasks sorted by `order`, then id for stability.
pub fn tasks_in_routine<'doc>(doc: &'doc AppDocument, routine_id: &str) -> Vec<&'doc Task> {
    let mut tasks: Vec<&Task> = doc
        .tasks
        .iter()
        .filter(|task| task.routine_id == routine_id)
        .collect();
    tasks.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    tasks
}

/// Order value for a task appended to this routine: `max(existing) + 1`.
pub fn next_task_order(doc: &AppDocument, routine_id: &str) -> u32 {
    doc.tasks
        .iter()
        .filter(|task| task.routine_id == routine_id)
        .map(|task| task.order)
        .max()
        .unwrap_or(0)
        + 1
}

pub fn find_kid<'doc>(doc: &'doc AppDocument, kid_id: &str) -> Option<&'doc Kid> {
    doc.kids.iter().find(|kid| kid.id == kid_id)
}

pub fn find_routine<'doc>(doc: &'doc AppDocument, routine_id: &str) -> Option<&'doc Routine> {
    doc.routines.iter().find(|routine| routine.id == routine_id)
}

pub fn find_task<'doc>(doc: &'doc AppDocument, task_id: &str) -> Option<&'doc Task> {
    doc.tasks.iter().find(|task| task.id == task_id)
}
