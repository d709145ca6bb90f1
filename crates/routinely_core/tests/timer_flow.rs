use routinely_core::engine::timer;
use routinely_core::{AppDocument, EngineError};

#[test]
fn start_creates_one_timer_for_the_pair() {
    let doc = AppDocument::seeded();
    let doc = timer::start_timer(&doc, "1", "m1", 10_000).unwrap();

    assert_eq!(doc.active_timers.len(), 1);
    let active = &doc.active_timers[0];
    assert_eq!(active.kid_id, "1");
    assert_eq!(active.task_id, "m1");
    assert_eq!(active.start_time, 10_000);
}

#[test]
fn restart_replaces_the_prior_start_time() {
    let doc = AppDocument::seeded();
    let doc = timer::start_timer(&doc, "1", "m1", 10_000).unwrap();
    let doc = timer::start_timer(&doc, "1", "m1", 25_000).unwrap();

    assert_eq!(doc.active_timers.len(), 1);
    assert_eq!(doc.active_timers[0].start_time, 25_000);
}

#[test]
fn timers_for_different_pairs_coexist() {
    let doc = AppDocument::seeded();
    let doc = timer::start_timer(&doc, "1", "m1", 10_000).unwrap();
    let doc = timer::start_timer(&doc, "1", "m2", 11_000).unwrap();
    let doc = timer::start_timer(&doc, "2", "m1", 12_000).unwrap();

    assert_eq!(doc.active_timers.len(), 3);
}

#[test]
fn start_requires_existing_kid_and_task() {
    let doc = AppDocument::seeded();

    let err = timer::start_timer(&doc, "ghost", "m1", 10_000).unwrap_err();
    assert!(matches!(err, EngineError::UnknownKid(_)));

    let err = timer::start_timer(&doc, "1", "ghost", 10_000).unwrap_err();
    assert!(matches!(err, EngineError::UnknownTask(_)));
}

#[test]
fn stop_returns_rounded_elapsed_seconds_and_removes_the_timer() {
    let doc = AppDocument::seeded();
    let doc = timer::start_timer(&doc, "1", "m1", 10_000).unwrap();

    let (doc, elapsed) = timer::stop_timer(&doc, "1", "m1", 22_400);

    assert_eq!(elapsed, Some(12));
    assert!(doc.active_timers.is_empty());
    // Stopping never writes a completion; that is the caller's step.
    assert!(doc.completions.is_empty());
}

#[test]
fn stop_without_active_timer_is_a_soft_miss() {
    let doc = AppDocument::seeded();
    let (next, elapsed) = timer::stop_timer(&doc, "1", "m1", 10_000);

    assert_eq!(elapsed, None);
    assert_eq!(next, doc);
}

#[test]
fn stop_only_touches_the_named_pair() {
    let doc = AppDocument::seeded();
    let doc = timer::start_timer(&doc, "1", "m1", 10_000).unwrap();
    let doc = timer::start_timer(&doc, "2", "m1", 10_000).unwrap();

    let (doc, elapsed) = timer::stop_timer(&doc, "1", "m1", 15_000);

    assert_eq!(elapsed, Some(5));
    assert_eq!(doc.active_timers.len(), 1);
    assert_eq!(doc.active_timers[0].kid_id, "2");
}
