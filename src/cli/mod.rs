//! # CLI Module
//!
//! This module provides the command-line interface layer for tunematch. Each
//! public function backs one subcommand and coordinates configuration, the
//! Spotify client, the pipeline and the store while handling user feedback.
//!
//! ## Commands
//!
//! - [`brand`] - Collects and stores the rankings of a brand's followers
//! - [`user`] - Collects and stores the rankings of one user
//! - [`ranking`] - Shows a stored ranking, whole or sliced
//! - [`affinity`] - Scores a user against a brand per category
//!
//! ## Architecture Design
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Pipeline (brand / user runs)
//!     ↓
//! Management Layer (Checkpointed aggregation, SQLite store)
//!     ↓
//! Spotify Layer (Rate limited fetcher, paginator)
//! ```
//!
//! ## Error Handling
//!
//! Failures that leave nothing useful to do (missing credentials, an
//! unreadable genre lookup, an auth failure mid-run) end the process through
//! the [`crate::error!`] macro. Skipped playlists and followers are reported
//! with [`crate::warning!`] and the run continues. An interrupted collection
//! resumes from its checkpoint when the same command is run again.
//!
//! ## Usage Patterns
//!
//! ```bash
//! tunematch brand --brand-id acme --followers acme.txt
//! tunematch user --user-id alice
//! tunematch ranking --brand acme --category subgenres --top 3
//! tunematch affinity --user alice --brand acme
//! ```

mod affinity;
mod brand;
mod ranking;
mod setup;
mod user;

pub use affinity::affinity;
pub use brand::brand;
pub use ranking::ranking;
pub use user::user;
