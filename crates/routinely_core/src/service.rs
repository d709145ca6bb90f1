//! Session facade over the document store and engine.
//!
//! # Responsibility
//! - Own the in-memory authoritative document for one session.
//! - Supply wall-clock time and the platform-local calendar day to the pure
//!   engine operations.
//! - Persist after every mutation, best-effort: a failed save is logged and
//!   flagged, never raised, and the in-memory copy stays authoritative.
//!
//! # Invariants
//! - Every mutation method applies one engine operation and then persists.
//! - A session opened against a newer-versioned payload is read-only: the
//!   stored document is never overwritten by an older build.

use crate::engine::records::{self, KidStats, PersonalBest};
use crate::engine::{roster, timer, EngineResult};
use crate::model::document::AppDocument;
use crate::model::entity::{Kid, KidPatch, Routine, RoutinePatch, Task, TaskPatch};
use crate::model::record::{TaskCompletion, WorldRecord};
use crate::store::{DocumentStore, LoadOutcome, StorageBackend};
use chrono::{Local, SecondsFormat, Utc};
use log::{error, info, warn};

/// One session over one storage backend.
pub struct RoutineService<B: StorageBackend> {
    store: DocumentStore<B>,
    document: AppDocument,
    outcome: LoadOutcome,
    read_only: bool,
    degraded: bool,
}

impl<B: StorageBackend> RoutineService<B> {
    /// Opens a session. Never fails: every load problem degrades to the
    /// seeded document with the outcome kept for the caller to surface.
    pub fn open(backend: B) -> Self {
        let mut store = DocumentStore::new(backend);
        let (document, outcome) = store.load();
        let read_only = matches!(outcome, LoadOutcome::NewerVersion { .. });
        info!(
            "event=session_open module=service status=ok outcome={outcome} read_only={read_only}"
        );

        Self {
            store,
            document,
            outcome,
            read_only,
            degraded: false,
        }
    }

    pub fn document(&self) -> &AppDocument {
        &self.document
    }

    /// How the session's document was obtained. Callers should surface
    /// `SeededVersionReset` (data was discarded) and `NewerVersion`
    /// (read-only session) to the user.
    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// True after a failed save: storage is unavailable and this session is
    /// running from memory only.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    // ----- roster -----

    pub fn add_kid(&mut self, kid: Kid) -> EngineResult<()> {
        let next = roster::add_kid(&self.document, kid)?;
        self.commit(next);
        Ok(())
    }

    pub fn update_kid(&mut self, kid_id: &str, patch: &KidPatch) {
        let next = roster::update_kid(&self.document, kid_id, patch);
        self.commit(next);
    }

    pub fn delete_kid(&mut self, kid_id: &str) {
        let next = roster::delete_kid(&self.document, kid_id);
        self.commit(next);
    }

    pub fn add_routine(&mut self, routine: Routine) -> EngineResult<()> {
        let next = roster::add_routine(&self.document, routine)?;
        self.commit(next);
        Ok(())
    }

    pub fn update_routine(&mut self, routine_id: &str, patch: &RoutinePatch) {
        let next = roster::update_routine(&self.document, routine_id, patch);
        self.commit(next);
    }

    pub fn delete_routine(&mut self, routine_id: &str) -> EngineResult<()> {
        let next = roster::delete_routine(&self.document, routine_id)?;
        self.commit(next);
        Ok(())
    }

    /// Appends a task at the end of its routine's sequence.
    pub fn add_task(&mut self, task: Task) -> EngineResult<()> {
        let next = roster::add_task(&self.document, task)?;
        self.commit(next);
        Ok(())
    }

    pub fn update_task(&mut self, task_id: &str, patch: &TaskPatch) -> EngineResult<()> {
        let next = roster::update_task(&self.document, task_id, patch)?;
        self.commit(next);
        Ok(())
    }

    pub fn delete_task(&mut self, task_id: &str) {
        let next = roster::delete_task(&self.document, task_id);
        self.commit(next);
    }

    pub fn reorder_tasks(&mut self, routine_id: &str, task_ids: &[&str]) -> EngineResult<()> {
        let next = roster::reorder_tasks(&self.document, routine_id, task_ids)?;
        self.commit(next);
        Ok(())
    }

    pub fn next_task_order(&self, routine_id: &str) -> u32 {
        roster::next_task_order(&self.document, routine_id)
    }

    pub fn tasks_in_routine(&self, routine_id: &str) -> Vec<&Task> {
        roster::tasks_in_routine(&self.document, routine_id)
    }

    // ----- completions, records, timers -----

    /// Records an untimed or externally timed completion, stamped with the
    /// local calendar day and the current timestamp.
    pub fn complete_task(
        &mut self,
        kid_id: &str,
        task_id: &str,
        time_in_seconds: u32,
    ) -> EngineResult<()> {
        let completion = TaskCompletion {
            kid_id: kid_id.to_string(),
            task_id: task_id.to_string(),
            date: local_day(),
            time_in_seconds,
            completed_at: now_iso(),
        };
        let next = records::add_completion(&self.document, completion)?;
        self.commit(next);
        Ok(())
    }

    pub fn start_timer(&mut self, kid_id: &str, task_id: &str) -> EngineResult<()> {
        let next = timer::start_timer(&self.document, kid_id, task_id, now_ms())?;
        self.commit(next);
        Ok(())
    }

    /// Stops the pair's timer without recording a completion. Returns the
    /// rounded elapsed seconds, or `None` when no timer was running (the
    /// document is left untouched in that case).
    pub fn stop_timer(&mut self, kid_id: &str, task_id: &str) -> Option<u32> {
        let (next, elapsed) = timer::stop_timer(&self.document, kid_id, task_id, now_ms());
        if elapsed.is_some() {
            self.commit(next);
        }
        elapsed
    }

    /// Stops the pair's timer and records the elapsed time as today's
    /// completion in one step. `None` means no timer was running and
    /// nothing changed.
    pub fn finish_timed_task(&mut self, kid_id: &str, task_id: &str) -> EngineResult<Option<u32>> {
        let (stopped, elapsed) = timer::stop_timer(&self.document, kid_id, task_id, now_ms());
        let Some(seconds) = elapsed else {
            return Ok(None);
        };

        let completion = TaskCompletion {
            kid_id: kid_id.to_string(),
            task_id: task_id.to_string(),
            date: local_day(),
            time_in_seconds: seconds,
            completed_at: now_iso(),
        };
        let next = records::add_completion(&stopped, completion)?;
        self.commit(next);
        Ok(Some(seconds))
    }

    /// The "uncomplete" toggle: drops today's log entries for the pair.
    /// Records set by a dropped entry are kept; bests never regress.
    pub fn uncomplete_task(&mut self, kid_id: &str, task_id: &str) {
        let day = local_day();
        let next = records::clear_task_completions(&self.document, kid_id, task_id, &day);
        self.commit(next);
    }

    /// Clears one kid's progress in one routine for today.
    pub fn reset_today(&mut self, kid_id: &str, routine_id: &str) {
        let day = local_day();
        let next = records::reset_day(&self.document, kid_id, routine_id, &day);
        self.commit(next);
    }

    /// Clears everyone's progress in one routine for today and stops all
    /// timers.
    pub fn reset_today_all(&mut self, routine_id: &str) {
        let day = local_day();
        let next = records::reset_day_all(&self.document, routine_id, &day);
        self.commit(next);
    }

    /// Discards everything and reseeds the defaults.
    pub fn clear_all(&mut self) {
        warn!("event=clear_all module=service status=ok");
        self.commit(AppDocument::seeded());
    }

    pub fn personal_best(&self, kid_id: &str, task_id: &str) -> Option<u32> {
        records::personal_best(&self.document, kid_id, task_id)
    }

    pub fn personal_best_with_date(&self, kid_id: &str, task_id: &str) -> Option<PersonalBest> {
        records::personal_best_with_date(&self.document, kid_id, task_id)
    }

    pub fn world_record(&self, task_id: &str) -> Option<&WorldRecord> {
        records::world_record(&self.document, task_id)
    }

    pub fn today_completions(&self, kid_id: &str) -> Vec<&TaskCompletion> {
        let day = local_day();
        records::completions_on(&self.document, kid_id, &day)
    }

    pub fn kid_stats(&self, kid_id: &str) -> KidStats {
        records::kid_stats(&self.document, kid_id)
    }

    // ----- persistence -----

    fn commit(&mut self, next: AppDocument) {
        self.document = next;
        if self.read_only {
            warn!("event=store_save module=service status=skipped reason=read_only");
            return;
        }

        match self.store.save(&self.document) {
            Ok(()) => self.degraded = false,
            Err(err) => {
                self.degraded = true;
                error!("event=store_save module=service status=error error={err}");
            }
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn local_day() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}
