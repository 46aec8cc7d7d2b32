use axum::{
    Router,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use tunematch::{
    error::AuthError,
    spotify::{
        auth::{TokenManager, TokenSource},
        fetcher::Fetcher,
        transport::{HttpTransport, Transport},
    },
};

async fn token(headers: HeaderMap, body: String) -> Response {
    let expected = format!("Basic {}", STANDARD.encode("client:secret"));
    let authorized = headers
        .get(header::AUTHORIZATION)
        .is_some_and(|v| v.as_bytes() == expected.as_bytes());

    if !authorized || body != "grant_type=client_credentials" {
        return (StatusCode::UNAUTHORIZED, "invalid_client").into_response();
    }

    (
        [(header::CONTENT_TYPE, "application/json")],
        r#"{"access_token": "abc", "token_type": "Bearer", "expires_in": 3600}"#,
    )
        .into_response()
}

async fn denied() -> Response {
    (StatusCode::BAD_REQUEST, "invalid_grant").into_response()
}

async fn limited() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "7")],
        "slow down",
    )
        .into_response()
}

async fn limited_until_date() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT")],
        "slow down",
    )
        .into_response()
}

async fn echo(headers: HeaderMap) -> Response {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    bearer.into_response()
}

// Helper function to serve the fake accounts service and API on a local port
async fn serve() -> String {
    let app = Router::new()
        .route("/api/token", post(token))
        .route("/api/denied", post(denied))
        .route("/v1/limited", get(limited))
        .route("/v1/limited-until", get(limited_until_date))
        .route("/v1/echo", get(echo));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_token_manager_exchanges_client_credentials() {
    let base = serve().await;
    let tokens = TokenManager::new(format!("{base}/api/token"), "client", "secret").unwrap();

    let credential = tokens.get_token().await.unwrap();

    assert_eq!(credential.access_token, "abc");
    assert_eq!(credential.token_type, "Bearer");
    assert_eq!(credential.expires_in, 3600);
    assert!(credential.obtained_at > 0);
}

#[tokio::test]
async fn test_token_manager_reports_rejected_requests() {
    let base = serve().await;

    let denied = TokenManager::new(format!("{base}/api/denied"), "client", "secret").unwrap();
    match denied.get_token().await {
        Err(AuthError::Request(reason)) => {
            assert!(reason.contains("400"), "unexpected reason: {reason}");
            assert!(reason.contains("invalid_grant"));
        }
        other => panic!("expected a request error, got {other:?}"),
    }

    let wrong_secret = TokenManager::new(format!("{base}/api/token"), "client", "nope").unwrap();
    assert!(matches!(
        wrong_secret.get_token().await,
        Err(AuthError::Request(_))
    ));
}

#[tokio::test]
async fn test_token_manager_from_env_requires_both_credentials() {
    // SAFETY: no other test in this binary reads these variables
    unsafe {
        std::env::remove_var("SPOTIFY_CLIENT_ID");
        std::env::set_var("SPOTIFY_CLIENT_SECRET", "secret");
    }
    assert!(matches!(
        TokenManager::from_env(),
        Err(AuthError::Config(_))
    ));

    unsafe {
        std::env::set_var("SPOTIFY_CLIENT_ID", "client");
        std::env::set_var("SPOTIFY_CLIENT_SECRET", "  ");
    }
    assert!(matches!(
        TokenManager::from_env(),
        Err(AuthError::Config(_))
    ));

    unsafe {
        std::env::set_var("SPOTIFY_CLIENT_SECRET", "secret");
    }
    assert!(TokenManager::from_env().is_ok());
}

#[tokio::test]
async fn test_http_transport_reads_retry_after() {
    let base = serve().await;
    let transport = HttpTransport::new().unwrap();

    let limited = transport
        .get(&format!("{base}/v1/limited"), "abc")
        .await
        .unwrap();
    assert_eq!(limited.status, 429);
    assert_eq!(limited.retry_after, Some(7));
    assert_eq!(limited.body, "slow down");

    // only delay seconds are understood
    let dated = transport
        .get(&format!("{base}/v1/limited-until"), "abc")
        .await
        .unwrap();
    assert_eq!(dated.status, 429);
    assert_eq!(dated.retry_after, None);
}

#[tokio::test]
async fn test_http_transport_sends_bearer() {
    let base = serve().await;
    let transport = HttpTransport::new().unwrap();

    let response = transport
        .get(&format!("{base}/v1/echo"), "abc")
        .await
        .unwrap();

    assert!(response.is_success());
    assert_eq!(response.retry_after, None);
    assert_eq!(response.body, "Bearer abc");
}

#[tokio::test]
async fn test_fetcher_over_http_uses_issued_token() {
    let base = serve().await;
    let tokens = TokenManager::new(format!("{base}/api/token"), "client", "secret").unwrap();
    let mut fetcher = Fetcher::new(
        HttpTransport::new().unwrap(),
        tokens,
        format!("{base}/v1"),
    );

    let url = fetcher.endpoint("echo");
    let body = fetcher.call(&url).await.unwrap();

    assert_eq!(body, "Bearer abc");
}
