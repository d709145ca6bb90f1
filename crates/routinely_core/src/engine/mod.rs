//! Pure operations over the app document.
//!
//! # Responsibility
//! - Define the closed set of deterministic document operations: roster
//!   CRUD, completion logging with record aggregation, timers.
//! - Define the precondition-violation error taxonomy those operations use.
//!
//! # Invariants
//! - Operations never mutate their input; they return a new document.
//! - Missing entities on lookup/update/delete paths are soft: `None` or a
//!   no-op, never an error. Errors are reserved for precondition violations
//!   on creation and structural moves.

use crate::model::entity::EntityValidationError;
use crate::model::record::CompletionValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod records;
pub mod roster;
pub mod timer;

pub type EngineResult<T> = Result<T, EngineError>;

/// Precondition violation reported by a document operation.
#[derive(Debug)]
pub enum EngineError {
    /// Entity failed field validation.
    Entity(EntityValidationError),
    /// Completion failed field validation.
    Completion(CompletionValidationError),
    /// An entity with this id already exists in the target collection.
    DuplicateId(String),
    /// Referenced kid does not exist.
    UnknownKid(String),
    /// Referenced routine does not exist.
    UnknownRoutine(String),
    /// Referenced task does not exist.
    UnknownTask(String),
    /// Default routines cannot be deleted.
    DefaultRoutine(String),
    /// Reorder id list is not a permutation of the routine's task ids.
    ReorderMismatch { routine_id: String },
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entity(err) => write!(f, "{err}"),
            Self::Completion(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "id already in use: {id}"),
            Self::UnknownKid(id) => write!(f, "kid not found: {id}"),
            Self::UnknownRoutine(id) => write!(f, "routine not found: {id}"),
            Self::UnknownTask(id) => write!(f, "task not found: {id}"),
            Self::DefaultRoutine(id) => {
                write!(f, "default routine cannot be deleted: {id}")
            }
            Self::ReorderMismatch { routine_id } => write!(
                f,
                "reorder ids must exactly match the tasks of routine {routine_id}"
            ),
        }
    }
}

impl Error for EngineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Entity(err) => Some(err),
            Self::Completion(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntityValidationError> for EngineError {
    fn from(value: EntityValidationError) -> Self {
        Self::Entity(value)
    }
}

impl From<CompletionValidationError> for EngineError {
    fn from(value: CompletionValidationError) -> Self {
        Self::Completion(value)
    }
}
