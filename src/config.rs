//! Configuration management for tunematch.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, endpoint URLs and the local
//! storage locations for the database, the genre lookup and checkpoint files.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf};

use crate::error::AuthError;

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

const APP_DIR: &str = "tunematch";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `tunematch/.env`. A missing file is not an error:
/// every value can also come straight from the process environment.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/tunematch/.env`
/// - macOS: `~/Library/Application Support/tunematch/.env`
/// - Windows: `%LOCALAPPDATA%/tunematch/.env`
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be parsed
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the platform specific data directory of the application.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Returns the Spotify API client ID.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains the
/// client ID obtained when registering the application with Spotify's developer
/// platform.
///
/// # Errors
///
/// Returns [`AuthError::Config`] if the variable is unset or empty.
pub fn spotify_client_id() -> Result<String, AuthError> {
    required("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret.
///
/// Retrieves the `SPOTIFY_CLIENT_SECRET` environment variable. Together with
/// the client ID it is exchanged for an application bearer token.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs
/// or version control.
///
/// # Errors
///
/// Returns [`AuthError::Config`] if the variable is unset or empty.
pub fn spotify_client_secret() -> Result<String, AuthError> {
    required("SPOTIFY_CLIENT_SECRET")
}

/// Returns the Spotify Web API base URL, e.g. `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the URL of the client credentials token endpoint.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the path of the SQLite database holding rankings.
pub fn database_path() -> PathBuf {
    env::var("TUNEMATCH_DATABASE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("tunematch.db"))
}

/// Returns the path of the main genre to subgenre lookup document.
pub fn genres_path() -> PathBuf {
    env::var("TUNEMATCH_GENRES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("genres.json"))
}

/// Optional cap on the number of pages one paginated walk may request.
///
/// Unset or unparsable means unbounded.
pub fn max_pages() -> Option<usize> {
    env::var("TUNEMATCH_MAX_PAGES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
}

/// Default location of the checkpoint file for a named run.
pub fn checkpoint_path(name: &str) -> PathBuf {
    let mut path = data_dir();
    path.push("checkpoints");
    path.push(format!("{name}.json"));
    path
}

fn required(name: &str) -> Result<String, AuthError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthError::Config(format!("{name} must be set"))),
    }
}
