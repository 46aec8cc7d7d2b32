#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::time::Instant;
use tunematch::{
    error::{AuthError, FetchError},
    spotify::{
        auth::TokenSource,
        fetcher::Fetcher,
        transport::{RawResponse, Transport},
    },
    types::Credential,
};

pub const BASE_URL: &str = "https://api.test/v1";

pub type TestFetcher = Fetcher<FakeTransport, FakeTokens>;

/// One request seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub bearer: String,
    pub at: Instant,
}

/// Scripted transport: every URL answers from its queue, the last queued
/// response repeats, unknown URLs answer 404.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<RawResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: impl Into<String>, responses: Vec<RawResponse>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .extend(responses);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.url == url).count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(&self, url: &str, bearer: &str) -> Result<RawResponse, FetchError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            bearer: bearer.to_string(),
            at: Instant::now(),
        });

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        Ok(response.unwrap_or_else(|| RawResponse::status(404)))
    }
}

/// Issues `token-1`, `token-2`, ... or always fails.
#[derive(Default)]
pub struct FakeTokens {
    issued: AtomicUsize,
    fail: bool,
}

impl FakeTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            issued: AtomicUsize::new(0),
            fail: true,
        }
    }
}

#[async_trait]
impl TokenSource for FakeTokens {
    async fn get_token(&self) -> Result<Credential, AuthError> {
        if self.fail {
            return Err(AuthError::Request("token endpoint answered 400".to_string()));
        }
        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Credential {
            access_token: format!("token-{n}"),
            token_type: "Bearer".to_string(),
            expires_in: 3600,
            obtained_at: 0,
        })
    }
}

pub fn fetcher(transport: FakeTransport) -> TestFetcher {
    Fetcher::new(transport, FakeTokens::new(), BASE_URL)
}

pub fn url(path: &str) -> String {
    format!("{BASE_URL}/{path}")
}

pub fn tracks_url(playlist_id: &str) -> String {
    url(&format!("playlists/{playlist_id}/tracks?limit=100"))
}

pub fn playlists_url(user_id: &str) -> String {
    url(&format!("users/{user_id}/playlists?limit=50"))
}

pub fn artists_url(ids: &[&str]) -> String {
    url(&format!("artists?ids={}", ids.join(",")))
}

// Helper function to create a playlist item with the given (id, name) artists
pub fn track(artists: &[(Option<&str>, &str)]) -> Value {
    let artists: Vec<Value> = artists
        .iter()
        .map(|(id, name)| json!({ "id": id, "name": name }))
        .collect();
    json!({ "track": { "id": "t", "name": "song", "artists": artists } })
}

pub fn missing_track() -> Value {
    json!({ "track": null })
}

pub fn page(items: Vec<Value>, next: Option<&str>) -> RawResponse {
    let total = items.len();
    RawResponse::ok(json!({ "items": items, "next": next, "total": total }).to_string())
}

pub fn playlists_page(ids: &[&str], next: Option<&str>) -> RawResponse {
    page(
        ids.iter()
            .map(|id| json!({ "id": id, "name": format!("list {id}") }))
            .collect(),
        next,
    )
}

pub fn artists_body(artists: &[(&str, &str, &[&str])]) -> RawResponse {
    let artists: Vec<Value> = artists
        .iter()
        .map(|(id, name, genres)| json!({ "id": id, "name": name, "genres": genres }))
        .collect();
    RawResponse::ok(json!({ "artists": artists }).to_string())
}
