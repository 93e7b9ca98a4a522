//! Tests for the pagination engine.

use super::*;
use crate::avatar::PlaceholderResolver;
use crate::source::FixtureSource;
use crate::testing::{page, records, ScriptedSource};

fn engine_with(source: Arc<dyn ReviewSource>, page_size: usize) -> PaginationEngine {
    let config = FeedConfig::default().with_page_size(page_size);
    PaginationEngine::new(&config, source, Arc::new(PlaceholderResolver))
}

fn inserted(outcome: PageOutcome) -> Vec<usize> {
    match outcome {
        PageOutcome::Loaded(ChangeSet::InsertRows(indices)) => indices,
        other => panic!("expected inserted rows, got {other:?}"),
    }
}

#[test]
fn test_initial_state() {
    let engine = engine_with(Arc::new(FixtureSource::new(records(3))), 20);
    let state = engine.state();

    assert!(state.rows().is_empty());
    assert_eq!(state.next_offset(), 0);
    assert_eq!(state.page_size(), 20);
    assert!(state.has_more());
    assert!(!state.is_fetching());
    assert_eq!(state.total_count(), None);
    assert_eq!(engine.phase(), Phase::Idle);
    assert_eq!(engine.row_count(), 0);
    assert!(!engine.is_summary_row_visible());
}

#[tokio::test]
async fn test_three_pages_to_exhaustion() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);

    assert_eq!(inserted(engine.load_next_page().await), (0..20).collect::<Vec<_>>());
    assert_eq!(engine.rows().len(), 20);
    assert!(engine.state().has_more());

    assert_eq!(inserted(engine.load_next_page().await), (20..40).collect::<Vec<_>>());
    assert_eq!(engine.rows().len(), 40);
    assert!(engine.state().has_more());

    // Final page and the summary row arrive in one change-set.
    assert_eq!(inserted(engine.load_next_page().await), (40..46).collect::<Vec<_>>());
    assert_eq!(engine.rows().len(), 45);
    assert!(!engine.state().has_more());
    assert_eq!(engine.state().total_count(), Some(45));
    assert_eq!(engine.state().next_offset(), 60);
    assert_eq!(engine.phase(), Phase::Exhausted);
    assert_eq!(engine.row_count(), 46);

    assert_eq!(source.requests(), vec![(0, 20), (20, 20), (40, 20)]);

    let texts: Vec<_> = engine.rows().iter().map(|r| r.text.plain.clone()).collect();
    let expected: Vec<_> = (0..45).map(|n| format!("review {n}")).collect();
    assert_eq!(texts, expected);
}

#[tokio::test]
async fn test_exhausted_engine_ignores_requests() {
    let source = Arc::new(FixtureSource::new(records(5)));
    let mut engine = engine_with(source.clone(), 20);

    assert_eq!(inserted(engine.load_next_page().await), vec![0, 1, 2, 3, 4, 5]);
    assert!(engine.request_next_page().is_none());
    assert!(matches!(engine.load_next_page().await, PageOutcome::Skipped));
    assert_eq!(source.calls(), 1);
    assert_eq!(engine.rows().len(), 5);
}

#[tokio::test]
async fn test_concurrent_requests_collapse_to_one_fetch() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);

    let cmd = engine.request_next_page().expect("first request issues a fetch");
    assert_eq!(engine.phase(), Phase::Fetching);
    assert!(engine.request_next_page().is_none());
    assert!(engine.request_next_page().is_none());

    let msg = cmd.await.expect("page command yields a message");
    assert!(matches!(engine.update(msg), Ok(PageOutcome::Loaded(_))));
    assert_eq!(source.calls(), 1);
    assert_eq!(engine.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_merge_truncates_to_total() {
    let source = ScriptedSource::new(vec![Ok(page(0..3, 5)), Ok(page(3..7, 5))]);
    let mut engine = engine_with(source.clone(), 3);

    assert_eq!(inserted(engine.load_next_page().await), vec![0, 1, 2]);
    assert_eq!(inserted(engine.load_next_page().await), vec![3, 4, 5]);

    assert_eq!(engine.rows().len(), 5);
    assert!(!engine.state().has_more());
    assert_eq!(engine.rows()[4].text.plain, "review 4");
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_zero_capacity_appends_nothing() {
    // Server shrank its total below what is already shown.
    let source = ScriptedSource::new(vec![Ok(page(0..3, 10)), Ok(page(3..6, 2))]);
    let mut engine = engine_with(source, 3);

    engine.load_next_page().await;
    assert_eq!(inserted(engine.load_next_page().await), vec![3]);
    assert_eq!(engine.rows().len(), 3);
    assert_eq!(engine.state().total_count(), Some(2));
    assert!(!engine.state().has_more());
}

#[tokio::test]
async fn test_empty_page_without_exhaustion_emits_nothing() {
    let source = ScriptedSource::new(vec![Ok(page(0..0, 10))]);
    let mut engine = engine_with(source, 5);

    assert!(matches!(engine.load_next_page().await, PageOutcome::Skipped));
    assert_eq!(engine.state().next_offset(), 5);
    assert!(!engine.state().is_fetching());
    assert!(engine.state().has_more());
}

#[tokio::test]
async fn test_empty_source_shows_summary_only() {
    let mut engine = engine_with(Arc::new(FixtureSource::new(Vec::new())), 20);

    assert_eq!(inserted(engine.load_next_page().await), vec![0]);
    assert_eq!(engine.row_count(), 1);
    assert!(matches!(engine.row_at(0), Ok(Row::Summary(SummaryRow { total: 0 }))));
}

#[tokio::test]
async fn test_failure_then_retry_from_same_offset() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);

    engine.load_next_page().await;
    source.fail_next(1);

    let outcome = engine.load_next_page().await;
    assert!(matches!(outcome, PageOutcome::Failed(FetchError::Unavailable(_))));
    assert_eq!(engine.rows().len(), 20);
    assert!(!engine.state().is_fetching());
    assert!(engine.state().has_more());
    assert_eq!(engine.state().next_offset(), 20);

    assert_eq!(inserted(engine.load_next_page().await), (20..40).collect::<Vec<_>>());
    assert_eq!(source.requests(), vec![(0, 20), (20, 20), (20, 20)]);
}

#[tokio::test]
async fn test_failure_before_first_page_keeps_total_unknown() {
    let source = ScriptedSource::new(vec![Err(FetchError::Unavailable("offline".into()))]);
    let mut engine = engine_with(source, 20);

    assert!(matches!(engine.load_next_page().await, PageOutcome::Failed(_)));
    assert_eq!(engine.state().total_count(), None);
    assert_eq!(engine.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_rows_never_exceed_total() {
    let source = ScriptedSource::new(vec![
        Ok(page(0..4, 9)),
        Err(FetchError::Unavailable("flaky".into())),
        Ok(page(4..8, 9)),
        Ok(page(8..12, 9)),
    ]);
    let mut engine = engine_with(source, 4);

    let mut previous = 0;
    for _ in 0..4 {
        engine.load_next_page().await;
        let len = engine.rows().len();
        assert!(len >= previous);
        if let Some(total) = engine.state().total_count() {
            assert!(len <= total);
            assert_eq!(engine.state().has_more(), len < total);
        }
        previous = len;
    }
    assert_eq!(previous, 9);
}

#[tokio::test]
async fn test_stale_messages_are_ignored() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);

    let cmd = engine.request_next_page().unwrap();
    let msg = cmd.await.unwrap();
    engine.update(msg).ok();

    // A duplicate of the first page while nothing is in flight.
    let mut other = engine_with(source, 20);
    let duplicate = other.request_next_page().unwrap().await.unwrap();
    assert!(matches!(engine.update(duplicate), Ok(PageOutcome::Skipped)));
    assert_eq!(engine.rows().len(), 20);
}

#[tokio::test]
async fn test_page_for_other_offset_is_ignored_while_fetching() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);
    engine.load_next_page().await;

    let in_flight = engine.request_next_page().unwrap();
    assert!(engine.state().is_fetching());

    // A late copy of the first page arrives while offset 20 is in flight.
    let mut other = engine_with(source, 20);
    let late = other.request_next_page().unwrap().await.unwrap();
    assert_eq!(late.downcast_ref::<PageLoadedMsg>().unwrap().offset(), 0);

    assert!(matches!(engine.update(late), Ok(PageOutcome::Skipped)));
    assert!(engine.state().is_fetching());
    assert_eq!(engine.rows().len(), 20);
    assert_eq!(engine.state().next_offset(), 20);

    let msg = in_flight.await.unwrap();
    assert_eq!(
        inserted(engine.update(msg).unwrap()),
        (20..40).collect::<Vec<_>>()
    );
    assert!(!engine.state().is_fetching());
}

#[test]
fn test_unrelated_messages_are_handed_back() {
    let mut engine = engine_with(Arc::new(FixtureSource::new(records(1))), 20);
    let msg: Msg = Box::new(42u32);
    let returned = engine.update(msg).err().expect("not a page message");
    assert_eq!(returned.downcast_ref::<u32>(), Some(&42));
}

#[tokio::test]
async fn test_expand_row() {
    let mut engine = engine_with(Arc::new(FixtureSource::new(records(45))), 20);
    engine.load_next_page().await;

    let id = engine.rows()[7].id();
    assert_eq!(engine.expand_row(id), Some(ChangeSet::ReloadRow(7)));
    assert!(engine.rows()[7].is_expanded());
    assert_eq!(engine.rows()[6].truncation_limit(), 3);
    assert_eq!(engine.rows().len(), 20);

    // Idempotent.
    assert_eq!(engine.expand_row(id), Some(ChangeSet::ReloadRow(7)));
    assert_eq!(engine.rows()[7].truncation_limit(), 0);
}

#[tokio::test]
async fn test_expand_unknown_row_is_noop() {
    let mut engine = engine_with(Arc::new(FixtureSource::new(records(3))), 20);
    engine.load_next_page().await;

    let mut other = engine_with(Arc::new(FixtureSource::new(records(1))), 20);
    other.load_next_page().await;
    let foreign = other.rows()[0].id();

    assert_eq!(engine.expand_row(foreign), None);
    assert!(engine.rows().iter().all(|row| !row.is_expanded()));
}

#[tokio::test]
async fn test_row_at() {
    let mut engine = engine_with(Arc::new(FixtureSource::new(records(3))), 20);
    assert_eq!(
        engine.row_at(0).unwrap_err(),
        RowIndexError::OutOfRange { index: 0, count: 0 }
    );

    engine.load_next_page().await;
    assert_eq!(
        engine.row_at(1).unwrap().as_review().unwrap().text.plain,
        "review 1"
    );
    assert!(matches!(engine.row_at(3), Ok(Row::Summary(SummaryRow { total: 3 }))));
    assert_eq!(
        engine.row_at(4).unwrap_err(),
        RowIndexError::OutOfRange { index: 4, count: 4 }
    );
}

#[tokio::test]
async fn test_reset() {
    let source = Arc::new(FixtureSource::new(records(45)));
    let mut engine = engine_with(source.clone(), 20);
    engine.load_next_page().await;

    let cmd = engine.request_next_page().unwrap();
    assert!(!engine.reset(), "reset is refused while fetching");
    engine.update(cmd.await.unwrap()).ok();
    assert_eq!(engine.rows().len(), 40);

    assert!(engine.reset());
    assert!(engine.rows().is_empty());
    assert_eq!(engine.state().next_offset(), 0);
    assert_eq!(engine.state().total_count(), None);

    engine.load_next_page().await;
    assert_eq!(source.requests().last(), Some(&(0, 20)));
    assert_eq!(engine.rows().len(), 20);
}
