//! Completion log entries and derived record rows.
//!
//! # Responsibility
//! - Define the append-only completion log entry and the derived
//!   personal-record, world-record and active-timer rows.
//! - Validate completion timestamps before they enter the log.
//!
//! # Invariants
//! - `date` fields are ISO calendar days (`YYYY-MM-DD`).
//! - `PersonalRecord` is unique per (kid, task); `WorldRecord` per task;
//!   `ActiveTimer` per (kid, task). Uniqueness is enforced by the engine,
//!   not by these types.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static ISO_DAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid day regex"));

/// Validation error for completion log writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionValidationError {
    /// `kid_id` or `task_id` is blank.
    BlankReference(&'static str),
    /// `date` is not an ISO `YYYY-MM-DD` calendar day.
    InvalidDate(String),
}

impl Display for CompletionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankReference(field) => {
                write!(f, "completion {field} must not be blank")
            }
            Self::InvalidDate(value) => {
                write!(f, "completion date `{value}` is not a YYYY-MM-DD day")
            }
        }
    }
}

impl Error for CompletionValidationError {}

/// One finished task for one kid on one calendar day.
///
/// Log entries are append-only. Several entries may exist for the same
/// (kid, task, day); day queries simply return all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub kid_id: String,
    pub task_id: String,
    /// ISO calendar day in platform-local time.
    pub date: String,
    /// Elapsed whole seconds; zero for untimed completions.
    pub time_in_seconds: u32,
    /// ISO-8601 timestamp of the moment the task was finished.
    pub completed_at: String,
}

impl TaskCompletion {
    pub fn validate(&self) -> Result<(), CompletionValidationError> {
        if self.kid_id.trim().is_empty() {
            return Err(CompletionValidationError::BlankReference("kid id"));
        }
        if self.task_id.trim().is_empty() {
            return Err(CompletionValidationError::BlankReference("task id"));
        }
        if !ISO_DAY_RE.is_match(&self.date) {
            return Err(CompletionValidationError::InvalidDate(self.date.clone()));
        }
        Ok(())
    }
}

/// Fastest time one kid ever recorded for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    pub task_id: String,
    pub kid_id: String,
    /// Minimum `time_in_seconds` among the pair's completions.
    pub personal_best: u32,
    /// `completed_at` of the completion that set the best. Ties keep the
    /// earlier timestamp.
    pub last_updated: String,
}

/// Fastest time any kid ever recorded for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldRecord {
    pub task_id: String,
    pub kid_id: String,
    pub time: u32,
    /// Name snapshot taken when the record was set; survives kid deletion.
    pub kid_name: String,
    /// Calendar day the record was set.
    pub date: String,
}

/// An in-progress timing session for one (kid, task) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTimer {
    pub kid_id: String,
    pub task_id: String,
    /// Unix epoch milliseconds at timer start.
    pub start_time: i64,
}

#[cfg(test)]
mod tests {
    use super::{CompletionValidationError, TaskCompletion};

    fn completion(date: &str) -> TaskCompletion {
        TaskCompletion {
            kid_id: "k1".to_string(),
            task_id: "m1".to_string(),
            date: date.to_string(),
            time_in_seconds: 12,
            completed_at: "2026-08-06T07:15:00.000Z".to_string(),
        }
    }

    #[test]
    fn validate_accepts_iso_day() {
        assert!(completion("2026-08-06").validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_iso_dates() {
        for bad in ["06/08/2026", "2026-8-6", "today", ""] {
            let err = completion(bad).validate().unwrap_err();
            assert!(matches!(err, CompletionValidationError::InvalidDate(_)));
        }
    }

    #[test]
    fn validate_rejects_blank_references() {
        let mut entry = completion("2026-08-06");
        entry.kid_id = " ".to_string();
        assert!(matches!(
            entry.validate().unwrap_err(),
            CompletionValidationError::BlankReference("kid id")
        ));
    }
}
