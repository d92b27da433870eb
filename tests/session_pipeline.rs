mod common;

use common::{ScriptedApi, create_session, type_alias, type_url};
use lnkup::application::flows::{AliasVerdict, AvailabilityIndicator, SuggestionSlots};
use lnkup::error::{ApiError, NETWORK_FAILURE_MESSAGE, SubmitRejected};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

const URL: &str = "https://example.com/docs";

#[tokio::test(start_paused = true)]
async fn test_slow_stale_availability_never_overwrites_newer_alias() {
    let api = Arc::new(
        ScriptedApi::new()
            .with_availability("abc", 2_000, false)
            .with_availability("abcd", 50, true),
    );
    let mut session = create_session(&api);

    type_alias(&mut session, "abc");
    assert!(session.step().await);
    assert_eq!(session.alias_verdict(), AliasVerdict::Checking);

    type_alias(&mut session, "abcd");
    session.settle().await;

    assert_eq!(session.alias_verdict(), AliasVerdict::Available);
    assert_eq!(session.availability().checked_alias(), Some("abcd"));

    // Let the slow "abc" answer arrive; it must be discarded.
    time::sleep(Duration::from_secs(3)).await;
    assert_eq!(session.pump(), 0);

    assert_eq!(session.alias_verdict(), AliasVerdict::Available);
    assert_eq!(session.view().availability, AvailabilityIndicator::Available);
    assert_eq!(api.calls(), vec!["check:abc", "check:abcd"]);
}

#[tokio::test(start_paused = true)]
async fn test_slow_stale_suggestions_are_discarded() {
    let api = Arc::new(
        ScriptedApi::new()
            .with_suggestions("https://a.example", 2_000, &["slow"])
            .with_suggestions("https://b.example", 10, &["fast"]),
    );
    let mut session = create_session(&api);

    session.set_url("https://a.example").unwrap();
    assert!(session.step().await);
    assert_eq!(session.view().suggestions, SuggestionSlots::Placeholders(3));

    session.set_url("https://b.example").unwrap();
    session.settle().await;
    time::sleep(Duration::from_secs(3)).await;
    session.pump();

    assert_eq!(
        session.view().suggestions,
        SuggestionSlots::Aliases(vec!["fast".to_string()])
    );
}

#[tokio::test(start_paused = true)]
async fn test_only_final_keystroke_reaches_the_network() {
    let api = Arc::new(ScriptedApi::new().with_suggestions(URL, 0, &["docs"]));
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    type_alias(&mut session, "my-docs");
    session.settle().await;

    assert_eq!(api.calls().len(), 2);
    assert_eq!(api.count("suggest"), 1);
    assert_eq!(api.count("check"), 1);
    assert!(api.calls().contains(&format!("suggest:{URL}")));
    assert!(api.calls().contains(&"check:my-docs".to_string()));
}

#[tokio::test(start_paused = true)]
async fn test_taken_alias_blocks_submission() {
    let api = Arc::new(ScriptedApi::new().with_availability("taken", 0, false));
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    type_alias(&mut session, "taken");
    session.settle().await;

    let view = session.view();
    assert_eq!(view.availability, AvailabilityIndicator::Taken);
    assert_eq!(
        view.availability.message().as_deref(),
        Some("Alias is already taken")
    );
    assert!(!view.action_enabled);

    assert_eq!(
        session.submit(),
        Err(SubmitRejected::AliasTaken {
            alias: "taken".to_string()
        })
    );
    session.settle().await;
    assert_eq!(api.count("shorten"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_check_blocks_but_reads_differently() {
    let api = Arc::new(ScriptedApi::new().with_availability_error(
        "ab",
        ApiError::application("BAD_REQUEST", "Alias must be at least 3 characters"),
    ));
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    type_alias(&mut session, "ab");
    session.settle().await;

    let view = session.view();
    assert_eq!(
        view.availability.message().as_deref(),
        Some("Could not verify alias: Alias must be at least 3 characters")
    );
    assert!(!view.action_enabled);
    assert!(matches!(
        session.submit(),
        Err(SubmitRejected::AliasUnverified { .. })
    ));
    assert_eq!(api.count("shorten"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_empty_alias_skips_availability_and_submits() {
    let api = Arc::new(ScriptedApi::new());
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    type_alias(&mut session, "x");
    session.set_alias("").unwrap();
    session.settle().await;

    assert_eq!(session.view().availability, AvailabilityIndicator::None);
    assert_eq!(api.count("check"), 0);

    session.submit().unwrap();
    session.settle().await;

    assert_eq!(
        session.view().short_link.as_deref(),
        Some("http://localhost:3000/a1b2c3d4")
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_stabilized_alias_checked_at_most_once() {
    let api = Arc::new(ScriptedApi::new());
    let mut session = create_session(&api);

    type_alias(&mut session, "docs");
    session.settle().await;

    type_alias(&mut session, "docs-x");
    time::advance(Duration::from_millis(100)).await;
    session.set_alias("docs").unwrap();
    session.settle().await;

    assert_eq!(api.count("check"), 1);
    assert_eq!(session.alias_verdict(), AliasVerdict::Available);
}

#[tokio::test(start_paused = true)]
async fn test_suggestions_are_bounded_and_pickable() {
    let api = Arc::new(
        ScriptedApi::new()
            .with_suggestions(URL, 100, &["docs", "example-docs", "ex-docs", "docs-1", "d0cs"])
            .with_availability("example-docs", 30, true),
    );
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    session.settle().await;

    let SuggestionSlots::Aliases(aliases) = session.view().suggestions else {
        panic!("expected suggestions");
    };
    assert_eq!(aliases, vec!["docs", "example-docs", "ex-docs"]);

    session.pick_suggestion(&aliases[1]).unwrap();
    session.settle().await;
    assert_eq!(session.alias(), "example-docs");
    assert_eq!(session.alias_verdict(), AliasVerdict::Available);

    session.submit().unwrap();
    session.settle().await;

    assert_eq!(
        session.short_link().as_deref(),
        Some("http://localhost:3000/example-docs")
    );
}

#[tokio::test(start_paused = true)]
async fn test_suggestion_failure_never_blocks_submission() {
    let api = Arc::new(
        ScriptedApi::new().with_suggestion_error(URL, ApiError::Network("refused".into())),
    );
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    session.settle().await;

    assert_eq!(session.view().suggestions, SuggestionSlots::Aliases(Vec::new()));
    assert!(session.view().action_enabled);
    assert!(session.submit().is_ok());
    session.settle().await;
}

#[tokio::test(start_paused = true)]
async fn test_network_failure_then_retry() {
    let api = Arc::new(
        ScriptedApi::new()
            .with_shorten(100, Err(ApiError::Network("connection reset".into())))
            .with_shorten(100, Ok("z9y8x7w6")),
    );
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    session.settle().await;

    session.submit().unwrap();
    assert!(session.view().inputs_locked);
    session.settle().await;

    let view = session.view();
    assert_eq!(view.error.as_deref(), Some(NETWORK_FAILURE_MESSAGE));
    assert!(view.short_link.is_none());
    assert_eq!(view.url, URL);
    assert!(view.action_enabled);

    session.submit().unwrap();
    session.settle().await;

    let view = session.view();
    assert!(view.error.is_none());
    assert_eq!(view.short_link.as_deref(), Some("http://localhost:3000/z9y8x7w6"));
    assert_eq!(api.count("shorten"), 2);
}

#[tokio::test(start_paused = true)]
async fn test_application_error_is_shown_verbatim() {
    let api = Arc::new(ScriptedApi::new().with_shorten(
        0,
        Err(ApiError::application(
            "BAD_REQUEST",
            "Name already occupied, try a different name",
        )),
    ));
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    session.settle().await;
    session.submit().unwrap();
    session.settle().await;

    assert_eq!(
        session.view().error.as_deref(),
        Some("Name already occupied, try a different name")
    );
}

#[tokio::test(start_paused = true)]
async fn test_failed_alias_check_can_be_repeated() {
    let api = Arc::new(
        ScriptedApi::new().with_failed_check("docs", ApiError::Network("connection reset".into())),
    );
    let mut session = create_session(&api);

    type_url(&mut session, URL);
    type_alias(&mut session, "docs");
    session.settle().await;
    assert!(matches!(session.alias_verdict(), AliasVerdict::Unverified(_)));

    // Retyping the same alias stabilizes to the value already checked.
    session.set_alias("").unwrap();
    type_alias(&mut session, "docs");
    session.settle().await;
    assert_eq!(api.count("check"), 1);
    assert!(matches!(session.alias_verdict(), AliasVerdict::Unverified(_)));

    assert!(session.recheck_alias().is_some());
    assert_eq!(session.alias_verdict(), AliasVerdict::Checking);
    session.settle().await;

    assert_eq!(api.count("check"), 2);
    assert_eq!(session.alias_verdict(), AliasVerdict::Available);
    assert!(session.view().action_enabled);
}

#[tokio::test(start_paused = true)]
async fn test_recheck_waits_for_settling_alias() {
    let api = Arc::new(ScriptedApi::new());
    let mut session = create_session(&api);

    type_alias(&mut session, "docs");
    assert!(session.recheck_alias().is_none());
    session.settle().await;

    assert_eq!(api.count("check"), 1);
}
