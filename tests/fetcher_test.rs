mod common;

use std::time::Duration;

use common::{FakeTokens, FakeTransport, fetcher, url};
use tokio::time::Instant;
use tunematch::{
    error::FetchError,
    spotify::{budget::CallBudget, fetcher::Fetcher, transport::RawResponse},
};

fn bearers(fetcher: &common::TestFetcher) -> Vec<String> {
    fetcher
        .transport()
        .calls()
        .into_iter()
        .map(|c| c.bearer)
        .collect()
}

#[tokio::test]
async fn test_returns_body_of_successful_call() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::ok("{}")]));

    let body = fetcher.call(&target).await.unwrap();

    assert_eq!(body, "{}");
    assert_eq!(bearers(&fetcher), vec!["token-1"]);
}

#[tokio::test]
async fn test_reuses_credential_between_calls() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::ok("{}")]));

    fetcher.call(&target).await.unwrap();
    fetcher.call(&target).await.unwrap();

    assert_eq!(bearers(&fetcher), vec!["token-1", "token-1"]);
}

#[tokio::test(start_paused = true)]
async fn test_waits_retry_after_on_too_many_requests() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(
        &target,
        vec![RawResponse::too_many_requests(Some(3)), RawResponse::ok("done")],
    ));

    let started = Instant::now();
    let body = fetcher.call(&target).await.unwrap();

    assert_eq!(body, "done");
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(fetcher.transport().calls_to(&target), 2);
}

#[tokio::test(start_paused = true)]
async fn test_too_many_requests_without_hint_waits_one_second() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(
        &target,
        vec![RawResponse::too_many_requests(None), RawResponse::ok("done")],
    ));

    fetcher.call(&target).await.unwrap();

    let calls = fetcher.transport().calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[1].at - calls[0].at >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_refreshes_token_once_on_unauthorized() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(
        &target,
        vec![RawResponse::status(401), RawResponse::ok("fresh")],
    ));

    let body = fetcher.call(&target).await.unwrap();

    assert_eq!(body, "fresh");
    assert_eq!(bearers(&fetcher), vec!["token-1", "token-2"]);
}

#[tokio::test]
async fn test_second_unauthorized_is_an_error() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::status(401)]));

    let err = fetcher.call(&target).await.unwrap_err();

    assert!(matches!(err, FetchError::Unauthorized { .. }));
    assert!(!err.is_fatal());
    assert_eq!(fetcher.transport().calls_to(&target), 2);
}

#[tokio::test]
async fn test_other_status_is_surfaced_without_retry() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::status(500)]));

    let err = fetcher.call(&target).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(fetcher.transport().calls_to(&target), 1);
}

#[tokio::test]
async fn test_token_failure_is_fatal_and_sends_nothing() {
    let target = url("me");
    let mut fetcher = Fetcher::new(
        FakeTransport::new().route(&target, vec![RawResponse::ok("{}")]),
        FakeTokens::failing(),
        common::BASE_URL,
    );

    let err = fetcher.call(&target).await.unwrap_err();

    assert!(matches!(err, FetchError::Auth(_)));
    assert!(err.is_fatal());
    assert!(fetcher.transport().calls().is_empty());
}

#[tokio::test]
async fn test_unparsable_body_is_a_parse_error() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::ok("<html>")]));

    let err = fetcher
        .get_json::<serde_json::Value>(&target)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_recovery_paths_compose() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(
        &target,
        vec![
            RawResponse::too_many_requests(Some(1)),
            RawResponse::status(401),
            RawResponse::too_many_requests(Some(2)),
            RawResponse::ok("finally"),
        ],
    ));

    let body = fetcher.call(&target).await.unwrap();

    assert_eq!(body, "finally");
    assert_eq!(
        bearers(&fetcher),
        vec!["token-1", "token-1", "token-2", "token-2"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_never_exceeds_budget_within_window() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::ok("{}")]))
        .with_budget(CallBudget::new(3, Duration::from_secs(30)));

    for _ in 0..7 {
        fetcher.call(&target).await.unwrap();
    }

    let calls = fetcher.transport().calls();
    assert_eq!(calls.len(), 7);
    for i in 0..calls.len() - 3 {
        assert!(calls[i + 3].at - calls[i].at >= Duration::from_secs(30));
    }
}

#[tokio::test(start_paused = true)]
async fn test_default_budget_is_fifty_calls_per_thirty_seconds() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(&target, vec![RawResponse::ok("{}")]));

    for _ in 0..120 {
        fetcher.call(&target).await.unwrap();
    }

    let calls = fetcher.transport().calls();
    assert_eq!(calls.len(), 120);
    // the first window holds exactly fifty calls
    assert!(calls[49].at - calls[0].at < Duration::from_secs(30));
    for i in 0..calls.len() - 50 {
        assert!(calls[i + 50].at - calls[i].at >= Duration::from_secs(30));
    }
}

#[tokio::test(start_paused = true)]
async fn test_retries_after_too_many_requests_count_against_budget() {
    let target = url("me");
    let mut fetcher = fetcher(FakeTransport::new().route(
        &target,
        vec![RawResponse::too_many_requests(Some(1)), RawResponse::ok("{}")],
    ))
    .with_budget(CallBudget::new(2, Duration::from_secs(30)));

    fetcher.call(&target).await.unwrap();
    fetcher.call(&target).await.unwrap();

    let calls = fetcher.transport().calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[2].at - calls[0].at >= Duration::from_secs(30));
}

#[tokio::test(start_paused = true)]
async fn test_budget_window_resets_after_idle_time() {
    let mut budget = CallBudget::new(2, Duration::from_secs(30));

    budget.acquire().await;
    budget.acquire().await;
    assert_eq!(budget.calls_in_window(), 2);

    tokio::time::sleep(Duration::from_secs(31)).await;
    let before = Instant::now();
    budget.acquire().await;

    assert_eq!(budget.calls_in_window(), 1);
    assert_eq!(Instant::now(), before);
}
