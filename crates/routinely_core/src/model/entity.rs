//! Roster entities: kids, routines, tasks.
//!
//! # Responsibility
//! - Define the editable entities managed by the admin surface.
//! - Provide partial-update patches for merge-by-id semantics.
//!
//! # Invariants
//! - `id` is stable and never reused for another entity.
//! - `Task.order` is 1-based and meaningful only within one routine.
//! - Default routines (`is_default = true`) must never be deleted.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for kids, routines and tasks.
///
/// Kept as a type alias to make semantic intent explicit in signatures. Ids
/// are opaque strings: the seed document uses readable ids (`morning`, `m1`),
/// entities created at runtime get UUIDv4 strings.
pub type EntityId = String;

/// Validation error for roster entity write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    /// A required field is blank after trimming.
    BlankField {
        entity: &'static str,
        field: &'static str,
    },
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField { entity, field } => {
                write!(f, "{entity} {field} must not be blank")
            }
        }
    }
}

impl Error for EntityValidationError {}

/// A child using the checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kid {
    pub id: EntityId,
    pub name: String,
    /// Display color token rendered by the presentation layer.
    pub color: String,
    /// Display avatar token (usually an emoji).
    pub avatar: String,
}

impl Kid {
    /// Creates a new kid with a generated stable id.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, color, avatar)
    }

    /// Creates a kid with a caller-provided stable id.
    ///
    /// Used by the seed document and import paths where identity already
    /// exists externally.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        avatar: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            avatar: avatar.into(),
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_filled("kid", "id", &self.id)?;
        require_filled("kid", "name", &self.name)
    }
}

/// A named, ordered collection of tasks (e.g. "Morning").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: EntityId,
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Seeded routines carry `true` and are protected from deletion.
    pub is_default: bool,
}

impl Routine {
    /// Creates a new custom (non-default) routine with a generated id.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, icon, color)
    }

    /// Creates a custom routine with a caller-provided stable id.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            is_default: false,
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_filled("routine", "id", &self.id)?;
        require_filled("routine", "name", &self.name)
    }
}

/// A single checklist item belonging to one routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    pub icon: String,
    pub routine_id: EntityId,
    /// 1-based display/traversal position within the owning routine.
    pub order: u32,
}

impl Task {
    /// Creates a new task with a generated stable id.
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        routine_id: impl Into<String>,
        order: u32,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), name, icon, routine_id, order)
    }

    /// Creates a task with a caller-provided stable id.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        routine_id: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            icon: icon.into(),
            routine_id: routine_id.into(),
            order,
        }
    }

    pub fn validate(&self) -> Result<(), EntityValidationError> {
        require_filled("task", "id", &self.id)?;
        require_filled("task", "name", &self.name)?;
        require_filled("task", "routine id", &self.routine_id)
    }
}

/// Partial field set merged into a kid by id.
#[derive(Debug, Clone, Default)]
pub struct KidPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub avatar: Option<String>,
}

impl KidPatch {
    pub fn apply_to(&self, kid: &mut Kid) {
        if let Some(name) = &self.name {
            kid.name = name.clone();
        }
        if let Some(color) = &self.color {
            kid.color = color.clone();
        }
        if let Some(avatar) = &self.avatar {
            kid.avatar = avatar.clone();
        }
    }
}

/// Partial field set merged into a routine by id.
///
/// `is_default` is deliberately not patchable: the deletion guard relies on
/// the seeded flag staying put.
#[derive(Debug, Clone, Default)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl RoutinePatch {
    pub fn apply_to(&self, routine: &mut Routine) {
        if let Some(name) = &self.name {
            routine.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            routine.icon = icon.clone();
        }
        if let Some(color) = &self.color {
            routine.color = color.clone();
        }
    }
}

/// Partial field set merged into a task by id.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub routine_id: Option<String>,
    pub order: Option<u32>,
}

impl TaskPatch {
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(name) = &self.name {
            task.name = name.clone();
        }
        if let Some(icon) = &self.icon {
            task.icon = icon.clone();
        }
        if let Some(routine_id) = &self.routine_id {
            task.routine_id = routine_id.clone();
        }
        if let Some(order) = self.order {
            task.order = order;
        }
    }
}

fn require_filled(
    entity: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::BlankField { entity, field });
    }
    Ok(())
}
