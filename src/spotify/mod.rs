//! # Spotify Integration Module
//!
//! This module is the data acquisition layer of tunematch. It wraps the
//! Spotify Web API endpoints the pipeline needs (playlists of a user, tracks of
//! a playlist, batched artist lookups) behind a single rate limited client.
//!
//! ## Architecture
//!
//! ```text
//! Pipeline / Aggregator
//!          ↓
//! Paginator (next pointer walk, optional page cap)
//!          ↓
//! Fetcher
//!     ├── CallBudget gate (50 calls / 30 s window)
//!     ├── 429 backoff (Retry-After, default 1 s)
//!     └── 401 refresh-and-retry (once, via TokenSource)
//!          ↓
//! Transport (reqwest, 50 s timeout)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - client credentials grant; the [`auth::TokenSource`] seam
//! - [`budget`] - sliding window call budget
//! - [`transport`] - the [`transport::Transport`] seam and its reqwest implementation
//! - [`fetcher`] - composes budget, backoff and credential refresh
//! - [`paginator`] - lazy walk over `next` links
//! - [`playlists`] - playlist and track endpoints, artist extraction
//! - [`artists`] - batched artist lookup and genre frequency
//!
//! ## Error Handling
//!
//! 429 and a first 401 never leave the [`fetcher::Fetcher`]. Everything else
//! surfaces as a [`crate::error::FetchError`] and the caller decides whether
//! to skip the item or abort.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client credentials exchange
//! - `GET /users/{user_id}/playlists` - playlists of a user
//! - `GET /playlists/{playlist_id}/tracks` - tracks of a playlist
//! - `GET /artists?ids=...` - up to 50 artists per call

pub mod artists;
pub mod auth;
pub mod budget;
pub mod fetcher;
pub mod paginator;
pub mod playlists;
pub mod transport;

use crate::{config, error::FetchError};

use self::{auth::TokenManager, fetcher::Fetcher, transport::HttpTransport};

/// The production client.
pub type SpotifyFetcher = Fetcher<HttpTransport, TokenManager>;

/// Builds the production fetcher from the environment.
///
/// Fails with [`crate::error::AuthError::Config`] (wrapped) when credentials
/// are absent.
pub fn fetcher_from_env() -> Result<SpotifyFetcher, FetchError> {
    let tokens = TokenManager::from_env()?;
    let transport = HttpTransport::new()?;
    Ok(Fetcher::new(transport, tokens, config::spotify_apiurl())
        .with_max_pages(config::max_pages()))
}
