//! Whole-document load/save over a storage backend.
//!
//! # Responsibility
//! - Implement the never-failing Load contract: every failure path degrades
//!   to the seeded document with an explicit, logged outcome.
//! - Serialize the full document on Save and surface failures as
//!   `StoreError` for the caller to handle best-effort.
//!
//! # Invariants
//! - Load never panics and never returns an error.
//! - A corrupt or from-the-future payload is left untouched on storage;
//!   only first-run seeds, version resets and migrations write during Load.

use crate::model::document::{AppDocument, DATA_VERSION};
use crate::store::migrate::{self, Assessment};
use crate::store::{StorageBackend, StoreResult};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};

/// How Load obtained the document it returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored payload decoded cleanly at the current version.
    Loaded,
    /// Nothing was stored yet; the seed was created and persisted.
    SeededFirstRun,
    /// Storage read or payload decode failed; the seed is served in memory
    /// and the stored payload (if any) is left in place.
    SeededAfterError,
    /// Stored version was behind the engine; all prior data was discarded
    /// and the persisted seed took its place.
    SeededVersionReset { found: u32 },
    /// Legacy shape was upgraded (routines backfill) and persisted.
    Migrated,
    /// Stored version is ahead of this build; the seed is served in memory
    /// and the stored payload is preserved for the newer build that wrote it.
    NewerVersion { found: u32 },
}

impl LoadOutcome {
    /// Stable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::SeededFirstRun => "seeded_first_run",
            Self::SeededAfterError => "seeded_after_error",
            Self::SeededVersionReset { .. } => "seeded_version_reset",
            Self::Migrated => "migrated",
            Self::NewerVersion { .. } => "newer_version",
        }
    }
}

impl Display for LoadOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Load/save semantics for one app document on one backend.
pub struct DocumentStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the current document, falling back to the seed on every failure
    /// path. The outcome tells the caller what actually happened; callers
    /// surfacing `SeededVersionReset` to users is the whole point of it.
    pub fn load(&mut self) -> (AppDocument, LoadOutcome) {
        let payload = match self.backend.read() {
            Ok(payload) => payload,
            Err(err) => {
                error!("event=store_load module=store status=error error_code=read_failed error={err}");
                return (AppDocument::seeded(), LoadOutcome::SeededAfterError);
            }
        };

        let Some(payload) = payload else {
            let document = AppDocument::seeded();
            self.persist_quietly(&document, "first_run_seed");
            info!("event=store_load module=store status=ok outcome=seeded_first_run");
            return (document, LoadOutcome::SeededFirstRun);
        };

        match migrate::assess(&payload) {
            Assessment::Current(document) => {
                info!("event=store_load module=store status=ok outcome=loaded");
                (document, LoadOutcome::Loaded)
            }
            Assessment::Migrated(document) => {
                self.persist_quietly(&document, "migration");
                warn!(
                    "event=store_load module=store status=ok outcome=migrated detail=routines_backfill"
                );
                (document, LoadOutcome::Migrated)
            }
            Assessment::Outdated { found } => {
                let document = AppDocument::seeded();
                self.persist_quietly(&document, "version_reset");
                warn!(
                    "event=store_load module=store status=reset outcome=seeded_version_reset found_version={found} expected_version={DATA_VERSION}"
                );
                (document, LoadOutcome::SeededVersionReset { found })
            }
            Assessment::Newer { found } => {
                warn!(
                    "event=store_load module=store status=degraded outcome=newer_version found_version={found} expected_version={DATA_VERSION}"
                );
                (AppDocument::seeded(), LoadOutcome::NewerVersion { found })
            }
            Assessment::Malformed(detail) => {
                error!(
                    "event=store_load module=store status=error error_code=malformed_payload detail={detail}"
                );
                (AppDocument::seeded(), LoadOutcome::SeededAfterError)
            }
        }
    }

    /// Serializes and writes the full document.
    pub fn save(&mut self, document: &AppDocument) -> StoreResult<()> {
        let payload = serde_json::to_string(document)?;
        self.backend.write(&payload)
    }

    fn persist_quietly(&mut self, document: &AppDocument, reason: &str) {
        if let Err(err) = self.save(document) {
            error!(
                "event=store_save module=store status=error reason={reason} error={err}"
            );
        }
    }
}
