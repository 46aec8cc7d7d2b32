use std::{collections::BTreeMap, fmt};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Entity ID used for artists the API returns without an ID (local files).
pub const UNKNOWN_ENTITY_ID: &str = "None";

/// Deduplicated entity ID to display name map.
pub type EntityMap = BTreeMap<String, String>;

/// Artist name to the number of tracks crediting it.
pub type Appearances = BTreeMap<String, u64>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

fn default_expires_in() -> u64 {
    3600
}

/// One page of a cursor paginated collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next: Option<String>,
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralArtists {
    #[serde(default)]
    pub artists: Vec<Option<Artist>>,
}

/// Root of one checkpointed fetch: a follower with its playlists, or a
/// single playlist of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceKey {
    pub id: String,
    pub playlists: Vec<String>,
}

impl ResourceKey {
    pub fn new(id: impl Into<String>, playlists: Vec<String>) -> Self {
        Self {
            id: id.into(),
            playlists,
        }
    }

    /// Key for one playlist; the playlist is its own root.
    pub fn playlist(playlist_id: impl Into<String>) -> Self {
        let id = playlist_id.into();
        Self {
            playlists: vec![id.clone()],
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub label: String,
    pub count: u64,
}

/// Entities sorted by descending count. Ties keep the order in which the
/// labels were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTable {
    entries: Vec<RankEntry>,
}

impl RankTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from `(label, count)` pairs in first-seen order.
    pub fn from_counts<I, L>(counts: I) -> Self
    where
        I: IntoIterator<Item = (L, u64)>,
        L: Into<String>,
    {
        let mut entries: Vec<RankEntry> = counts
            .into_iter()
            .map(|(label, count)| RankEntry {
                label: label.into(),
                count,
            })
            .collect();
        // stable, so equal counts stay in input order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        Self { entries }
    }

    pub fn entries(&self) -> &[RankEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 1-based rank of `label`, first occurrence wins.
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.label == label)
            .map(|i| i + 1)
    }

    pub fn count_of(&self, label: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.count)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Entries at positions `start..=end` (1-based, clamped).
    pub fn slice(&self, start: usize, end: usize) -> &[RankEntry] {
        let from = start.saturating_sub(1).min(self.entries.len());
        let to = end.min(self.entries.len()).max(from);
        &self.entries[from..to]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Category {
    Artists,
    Genres,
    Subgenres,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Artists, Category::Genres, Category::Subgenres];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Artists => "artists",
            Category::Genres => "genres",
            Category::Subgenres => "subgenres",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Owner {
    User(String),
    Brand(String),
}

impl Owner {
    pub fn kind(&self) -> &'static str {
        match self {
            Owner::User(_) => "user",
            Owner::Brand(_) => "brand",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Owner::User(id) | Owner::Brand(id) => id,
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

/// Everything one pipeline run derives for an owner.
#[derive(Debug, Clone, Default)]
pub struct TasteProfile {
    pub unique_artists: EntityMap,
    pub artists: RankTable,
    pub subgenres: RankTable,
    pub genres: RankTable,
}

impl TasteProfile {
    pub fn ranking(&self, category: Category) -> &RankTable {
        match category {
            Category::Artists => &self.artists,
            Category::Genres => &self.genres,
            Category::Subgenres => &self.subgenres,
        }
    }
}

#[derive(Tabled)]
pub struct RankingTableRow {
    pub ranking: usize,
    pub name: String,
    pub appearances: u64,
}

#[derive(Tabled)]
pub struct AffinityTableRow {
    pub category: String,
    pub affinity: String,
}
