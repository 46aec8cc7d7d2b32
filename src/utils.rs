use std::collections::HashSet;

use chrono::Utc;

/// Extracts the bare playlist ID from a share link.
///
/// `https://open.spotify.com/playlist/37i9dQ?si=abc` yields `37i9dQ`; a bare
/// ID is returned unchanged.
pub fn parse_playlist_id(link: &str) -> String {
    let last = link.trim().trim_end_matches('/').rsplit('/').next().unwrap_or("");
    last.split('?').next().unwrap_or("").to_string()
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Removes duplicate IDs, keeping the first occurrence.
pub fn dedup_ids(ids: &mut Vec<String>) {
    let mut seen = HashSet::new();
    ids.retain(|id| seen.insert(id.clone()));
}

pub fn now_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Follower IDs from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored; share links are
/// reduced to their ID; duplicates keep their first position.
pub fn parse_follower_ids(content: &str) -> Vec<String> {
    let mut ids: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_user_id)
        .filter(|id| !id.is_empty())
        .collect();
    dedup_ids(&mut ids);
    ids
}

/// Extracts the user ID from an `open.spotify.com/user/<id>` link; a bare ID
/// is returned unchanged.
pub fn parse_user_id(link: &str) -> String {
    parse_playlist_id(link)
}
