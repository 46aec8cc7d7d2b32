use std::time::Duration;

use indicatif::ProgressBar;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    error::{AuthError, FetchError},
    info,
    spotify::{
        auth::TokenSource,
        budget::CallBudget,
        transport::{RawResponse, Transport},
    },
    types::Credential,
    warning,
};

/// Wait used when a 429 carries no `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: u64 = 1;

/// Retry-After values above this are still honoured but reported.
const ABNORMAL_RETRY_AFTER: u64 = 120;

/// Rate limited, token renewing GET client.
///
/// One logical fetch runs through three stages, each of which may loop back:
/// the local call budget gate, server backoff on 429, and one credential
/// refresh on 401. Every physical send goes through the budget gate.
pub struct Fetcher<T, S> {
    transport: T,
    tokens: S,
    budget: CallBudget,
    credential: Option<Credential>,
    base_url: String,
    max_pages: Option<usize>,
    progress: ProgressBar,
}

impl<T: Transport, S: TokenSource> Fetcher<T, S> {
    pub fn new(transport: T, tokens: S, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            tokens,
            budget: CallBudget::default(),
            credential: None,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_pages: None,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_budget(mut self, budget: CallBudget) -> Self {
        self.budget = budget;
        self.budget.set_progress(self.progress.clone());
        self
    }

    /// Routes the fetcher's waiting and retry notices around `progress`.
    pub fn set_progress(&mut self, progress: ProgressBar) {
        self.budget.set_progress(progress.clone());
        self.progress = progress;
    }

    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    /// Caps every paginated walk started from this fetcher.
    pub fn with_max_pages(mut self, max_pages: Option<usize>) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches `url` and returns the response body of a successful answer.
    pub async fn call(&mut self, url: &str) -> Result<String, FetchError> {
        let bearer = self.bearer().await?;
        let mut response = self.send_with_backoff(url, &bearer).await?;

        if response.status == StatusCode::UNAUTHORIZED.as_u16() {
            self.progress
                .suspend(|| info!("Access token rejected, requesting a new one"));
            let bearer = self.refresh().await?;
            response = self.send_with_backoff(url, &bearer).await?;
            if response.status == StatusCode::UNAUTHORIZED.as_u16() {
                return Err(FetchError::Unauthorized {
                    url: url.to_string(),
                });
            }
        }

        if !response.is_success() {
            return Err(FetchError::Status {
                status: response.status,
                url: url.to_string(),
            });
        }

        Ok(response.body)
    }

    pub async fn get_json<D: DeserializeOwned>(&mut self, url: &str) -> Result<D, FetchError> {
        let body = self.call(url).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Parse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn bearer(&mut self) -> Result<String, AuthError> {
        match &self.credential {
            Some(credential) => Ok(credential.access_token.clone()),
            None => self.refresh().await,
        }
    }

    async fn refresh(&mut self) -> Result<String, AuthError> {
        let credential = self.tokens.get_token().await?;
        let bearer = credential.access_token.clone();
        self.credential = Some(credential);
        Ok(bearer)
    }

    /// Sends through the budget gate, repeating after the server mandated
    /// wait for as long as the answer is 429.
    async fn send_with_backoff(
        &mut self,
        url: &str,
        bearer: &str,
    ) -> Result<RawResponse, FetchError> {
        loop {
            let response = self.send(url, bearer).await?;
            if response.status != StatusCode::TOO_MANY_REQUESTS.as_u16() {
                return Ok(response);
            }

            let wait = response.retry_after.unwrap_or(DEFAULT_RETRY_AFTER);
            self.progress.suspend(|| {
                if wait > ABNORMAL_RETRY_AFTER {
                    warning!(
                        "Retry-After has reached an abnormal high of {} seconds, waiting anyway",
                        wait
                    );
                } else {
                    info!("Rate limited by the API, retrying in {}s", wait);
                }
            });
            sleep(Duration::from_secs(wait)).await;
        }
    }

    async fn send(&mut self, url: &str, bearer: &str) -> Result<RawResponse, FetchError> {
        self.budget.acquire().await;
        self.transport.get(url, bearer).await
    }
}
