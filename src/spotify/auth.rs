use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;

use crate::{
    config,
    error::AuthError,
    spotify::transport::REQUEST_TIMEOUT,
    types::{Credential, TokenResponse},
    utils,
};

/// Hands out application bearer credentials.
///
/// There is no expiry tracking: callers notice a stale credential through a
/// 401 from a downstream call and ask for a new one.
#[async_trait]
pub trait TokenSource {
    async fn get_token(&self) -> Result<Credential, AuthError>;
}

/// Client credentials grant against the Spotify accounts service.
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl TokenManager {
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Request(e.to_string()))?;

        Ok(Self {
            client,
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        })
    }

    /// Builds a manager from `SPOTIFY_CLIENT_ID` / `SPOTIFY_CLIENT_SECRET`.
    ///
    /// Fails with [`AuthError::Config`] if either is absent.
    pub fn from_env() -> Result<Self, AuthError> {
        let client_id = config::spotify_client_id()?;
        let client_secret = config::spotify_client_secret()?;
        Self::new(config::spotify_apitoken_url(), client_id, client_secret)
    }

    fn basic_auth(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn get_token(&self) -> Result<Credential, AuthError> {
        let res = self
            .client
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, self.basic_auth())
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AuthError::Request(format!("status {status}: {body}")));
        }

        let json: TokenResponse = res
            .json()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        Ok(Credential {
            access_token: json.access_token,
            token_type: json.token_type,
            expires_in: json.expires_in,
            obtained_at: utils::now_timestamp(),
        })
    }
}
