use std::{collections::HashMap, path::Path};

use indicatif::ProgressBar;

use crate::{
    error::{Error, FetchError},
    management::checkpoint::CheckpointManager,
    spotify::{
        auth::TokenSource, fetcher::Fetcher, playlists::collect_playlist_artists,
        transport::Transport,
    },
    types::{Appearances, EntityMap, RankTable, ResourceKey, UNKNOWN_ENTITY_ID},
    warning,
};

/// Per-key entity maps in input order.
pub type KeyedEntities = Vec<(String, EntityMap)>;

/// Runs the playlist → tracks → artists pipeline for many keys, persisting
/// progress after every key.
pub struct Aggregator<'f, T, S> {
    fetcher: &'f mut Fetcher<T, S>,
    progress: ProgressBar,
}

impl<'f, T: Transport, S: TokenSource> Aggregator<'f, T, S> {
    pub fn new(fetcher: &'f mut Fetcher<T, S>) -> Self {
        Self {
            fetcher,
            progress: ProgressBar::hidden(),
        }
    }

    /// Reports one tick per key on `progress`.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Aggregates every key, skipping keys the checkpoint already holds.
    ///
    /// A failed playlist only costs that playlist; the key is still
    /// committed with whatever was read. Auth failures abort the run
    /// without committing the key in flight.
    pub async fn aggregate(
        &mut self,
        keys: &[ResourceKey],
        checkpoint_path: &Path,
    ) -> Result<KeyedEntities, Error> {
        let mut checkpoint = CheckpointManager::load(checkpoint_path).await?;
        checkpoint.register(keys);
        self.fetcher.set_progress(self.progress.clone());

        self.progress.set_length(keys.len() as u64);

        for key in keys {
            if checkpoint.is_done(&key.id) {
                self.progress.inc(1);
                continue;
            }

            self.progress.set_message(format!("Collecting artists for {}", key.id));
            let (entities, appearances) = self.collect_key(key).await?;
            checkpoint.complete_counted(key, entities, appearances);
            checkpoint.persist().await?;
            self.progress.inc(1);
        }

        self.progress.finish_and_clear();

        let mut result: KeyedEntities = Vec::with_capacity(keys.len());
        for key in keys {
            if result.iter().any(|(id, _)| *id == key.id) {
                continue;
            }
            let entities = checkpoint.get(&key.id).cloned().unwrap_or_default();
            result.push((key.id.clone(), entities));
        }
        Ok(result)
    }

    async fn collect_key(
        &mut self,
        key: &ResourceKey,
    ) -> Result<(EntityMap, Appearances), Error> {
        let mut entities = EntityMap::new();
        let mut appearances = Appearances::new();
        for playlist_id in &key.playlists {
            let collected = collect_playlist_artists(
                &mut *self.fetcher,
                playlist_id,
                &mut entities,
                &mut appearances,
            )
            .await;
            match collected {
                Ok(()) => {}
                Err(FetchError::Auth(e)) => return Err(Error::Auth(e)),
                Err(e) => {
                    self.progress.suspend(|| {
                        warning!(
                            "Skipping playlist {} of {}: {}",
                            playlist_id,
                            key.id,
                            e
                        )
                    });
                }
            }
        }
        Ok((entities, appearances))
    }
}

/// Folds per-key maps into one; the first name seen for an ID wins. The
/// reserved unknown ID is dropped if present.
pub fn unique_entities(mapping: &[(String, EntityMap)]) -> EntityMap {
    let mut unique = EntityMap::new();
    for (_, entities) in mapping {
        for (id, name) in entities {
            unique.entry(id.clone()).or_insert_with(|| name.clone());
        }
    }
    unique.remove(UNKNOWN_ENTITY_ID);
    unique
}

/// Counts in how many per-key maps each entity name occurs.
pub fn rank_entities(mapping: &[(String, EntityMap)]) -> RankTable {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for (_, entities) in mapping {
        for name in entities.values().filter(|n| !n.is_empty()) {
            let count = counts.entry(name.as_str()).or_insert_with(|| {
                order.push(name.as_str());
                0
            });
            *count += 1;
        }
    }

    RankTable::from_counts(
        order
            .into_iter()
            .map(|name| (name, counts.get(name).copied().unwrap_or_default())),
    )
}

/// Sums track credits per artist name over `counts`. Ties keep the order in
/// which names were first reached.
pub fn rank_appearances<'a>(counts: impl IntoIterator<Item = &'a Appearances>) -> RankTable {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for appearances in counts {
        for (name, count) in appearances {
            let total = totals.entry(name.as_str()).or_insert_with(|| {
                order.push(name.as_str());
                0
            });
            *total += count;
        }
    }

    RankTable::from_counts(
        order
            .into_iter()
            .map(|name| (name, totals.get(name).copied().unwrap_or_default())),
    )
}
