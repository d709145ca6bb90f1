//! Document persistence: backends, migration gate, load/save semantics.
//!
//! # Responsibility
//! - Own every way the app document touches durable storage.
//! - Keep storage failures from ever propagating out of `Load`.
//!
//! # Invariants
//! - The document is written and read as one whole JSON payload.
//! - `DocumentStore::load` never fails the caller; every failure path
//!   degrades to the seeded document with a logged outcome.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod backend;
pub mod document_store;
pub mod migrate;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};
pub use document_store::{DocumentStore, LoadOutcome};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure: persistence is unavailable or the payload is
/// unusable.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying read/write failed.
    Io(std::io::Error),
    /// Payload could not be serialized or deserialized.
    Payload(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage io failure: {err}"),
            Self::Payload(err) => write!(f, "document payload failure: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Payload(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Payload(value)
    }
}
