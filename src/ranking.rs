//! Subgenre and main genre rankings.
//!
//! The genre lookup is a static JSON document of the form
//! `{"genres_map": {"rock": ["indie rock", "garage rock"], ...}}`. It is read
//! once and inverted into a subgenre to main genre map.

use std::{collections::HashMap, path::PathBuf};

use serde::Deserialize;

use crate::{error::GenreLookupError, types::RankTable, warning};

#[derive(Debug, Deserialize)]
struct GenreDocument {
    genres_map: HashMap<String, Vec<String>>,
}

/// Subgenre to main genre mapping.
#[derive(Debug, Clone, Default)]
pub struct GenreLookup {
    by_subgenre: HashMap<String, String>,
}

impl GenreLookup {
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, GenreLookupError> {
        let path = path.into();
        let content = async_fs::read_to_string(&path).await?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, GenreLookupError> {
        let document: GenreDocument = serde_json::from_str(content)?;
        Ok(Self::from_main_genres(document.genres_map))
    }

    /// Inverts a main genre to subgenres map. A subgenre listed under several
    /// main genres keeps the first one in name order.
    pub fn from_main_genres<I, S>(main_genres: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<S>)>,
        S: Into<String>,
    {
        let mut groups: Vec<(String, Vec<String>)> = main_genres
            .into_iter()
            .map(|(main, subs)| (main.into(), subs.into_iter().map(Into::into).collect()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));

        let mut by_subgenre = HashMap::new();
        for (main, subs) in groups {
            for sub in subs {
                by_subgenre.entry(sub).or_insert_with(|| main.clone());
            }
        }
        Self { by_subgenre }
    }

    pub fn main_genre(&self, subgenre: &str) -> Option<&str> {
        self.by_subgenre.get(subgenre).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_subgenre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_subgenre.is_empty()
    }
}

/// Builds the subgenre and main genre tables from a raw subgenre frequency.
///
/// Main genre counts are the sum of the counts of their subgenres. Subgenres
/// without a main genre are dropped from the main genre table and reported.
pub fn build_rankings(raw: &RankTable, lookup: &GenreLookup) -> (RankTable, RankTable) {
    let subgenres = RankTable::from_counts(raw.iter().map(|e| (e.label.clone(), e.count)));

    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    let mut unmapped: Vec<&str> = Vec::new();

    for entry in subgenres.iter() {
        match lookup.main_genre(&entry.label) {
            Some(main) => {
                let count = counts.entry(main).or_insert_with(|| {
                    order.push(main);
                    0
                });
                *count += entry.count;
            }
            None => unmapped.push(&entry.label),
        }
    }

    if !unmapped.is_empty() {
        let lost: u64 = unmapped
            .iter()
            .filter_map(|label| subgenres.count_of(label))
            .sum();
        warning!(
            "{} subgenres have no main genre ({} appearances dropped): {}",
            unmapped.len(),
            lost,
            unmapped.join(", ")
        );
    }

    let genres = RankTable::from_counts(
        order
            .into_iter()
            .map(|main| (main, counts.get(main).copied().unwrap_or_default())),
    );

    (subgenres, genres)
}
