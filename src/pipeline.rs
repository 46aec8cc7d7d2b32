//! End to end runs for brands and users.
//!
//! Both runs share one fold: aggregate artists per key, dedup them, rank them,
//! look up their genres and derive the subgenre and main genre tables. A brand
//! ranks artists by how many followers list them, a user by how many of their
//! tracks credit them. The results are written to the store under the run's
//! [`Owner`].

use std::path::Path;

use indicatif::ProgressBar;

use crate::{
    error::{Error, FetchError, StoreError},
    management::{
        Aggregator, CheckpointManager, KeyedEntities, Store, rank_appearances, rank_entities,
        unique_entities,
    },
    ranking::{GenreLookup, build_rankings},
    spotify::{
        artists::count_genres, auth::TokenSource, fetcher::Fetcher,
        playlists::playlist_ids_for_user, transport::Transport,
    },
    types::{Appearances, Category, Owner, ResourceKey, TasteProfile},
    utils::{dedup_ids, parse_playlist_id},
    warning,
};

/// Playlists read per brand follower.
pub const MAX_PLAYLISTS_PER_KEY: usize = 10;

/// What one count in the artist ranking stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtistCounting {
    /// One per key listing the artist.
    PerKey,
    /// One per track crediting the artist.
    PerTrack,
}

/// Builds one key per follower from their first playlists.
///
/// Playlists already recorded in the checkpoint at `checkpoint_path` are
/// reused. Followers without playlists, or whose listing fails, are skipped.
pub async fn follower_keys<T, S>(
    fetcher: &mut Fetcher<T, S>,
    follower_ids: &[String],
    checkpoint_path: &Path,
) -> Result<Vec<ResourceKey>, Error>
where
    T: Transport,
    S: TokenSource,
{
    let checkpoint = CheckpointManager::load(checkpoint_path).await?;
    let mut keys = Vec::with_capacity(follower_ids.len());

    for follower in follower_ids {
        if let Some(playlists) = checkpoint.playlists(follower) {
            keys.push(ResourceKey::new(follower.clone(), playlists.to_vec()));
            continue;
        }

        match playlist_ids_for_user(fetcher, follower, Some(MAX_PLAYLISTS_PER_KEY)).await {
            Ok(playlists) if playlists.is_empty() => {
                warning!("Follower {} has no public playlists, skipping", follower)
            }
            Ok(playlists) => keys.push(ResourceKey::new(follower.clone(), playlists)),
            Err(FetchError::Auth(e)) => return Err(Error::Auth(e)),
            Err(e) => warning!("Cannot list playlists of {}: {}", follower, e),
        }
    }

    Ok(keys)
}

/// One key per playlist of the user.
pub async fn user_keys<T, S>(
    fetcher: &mut Fetcher<T, S>,
    user_id: &str,
) -> Result<Vec<ResourceKey>, FetchError>
where
    T: Transport,
    S: TokenSource,
{
    let ids = playlist_ids_for_user(fetcher, user_id, None).await?;
    Ok(ids.into_iter().map(ResourceKey::playlist).collect())
}

/// Runs the shared fold over `keys`.
pub async fn taste_profile<T, S>(
    fetcher: &mut Fetcher<T, S>,
    keys: &[ResourceKey],
    checkpoint_path: &Path,
    lookup: &GenreLookup,
    counting: ArtistCounting,
    progress: ProgressBar,
) -> Result<TasteProfile, Error>
where
    T: Transport,
    S: TokenSource,
{
    let mapping = Aggregator::new(&mut *fetcher)
        .with_progress(progress)
        .aggregate(keys, checkpoint_path)
        .await?;

    let unique_artists = unique_entities(&mapping);
    let artists = match counting {
        ArtistCounting::PerKey => rank_entities(&mapping),
        ArtistCounting::PerTrack => {
            let checkpoint = CheckpointManager::load(checkpoint_path).await?;
            rank_appearances(&key_appearances(&checkpoint, &mapping))
        }
    };

    let raw = count_genres(fetcher, &unique_artists).await?;
    let (subgenres, genres) = build_rankings(&raw, lookup);

    Ok(TasteProfile {
        unique_artists,
        artists,
        subgenres,
        genres,
    })
}

/// Track credits per key. Rows written without credits count every artist of
/// the key once.
fn key_appearances(checkpoint: &CheckpointManager, mapping: &KeyedEntities) -> Vec<Appearances> {
    mapping
        .iter()
        .map(|(key, entities)| match checkpoint.appearances(key) {
            Some(appearances) => appearances.clone(),
            None => entities
                .values()
                .filter(|name| !name.is_empty())
                .map(|name| (name.clone(), 1))
                .collect(),
        })
        .collect()
}

/// Writes the three rankings and the unique artists of `owner`.
pub fn persist_profile(
    store: &mut Store,
    owner: &Owner,
    profile: &TasteProfile,
) -> Result<(), StoreError> {
    for category in Category::ALL {
        store.upsert_ranking(owner, category, profile.ranking(category))?;
    }
    store.upsert_unique_artists(owner, &profile.unique_artists)?;
    Ok(())
}

/// Everything a brand run needs besides the fetcher.
pub struct BrandRun<'a> {
    pub brand_id: &'a str,
    pub follower_ids: &'a [String],
    pub checkpoint_path: &'a Path,
    pub lookup: &'a GenreLookup,
}

pub async fn run_brand<T, S>(
    fetcher: &mut Fetcher<T, S>,
    store: &mut Store,
    run: BrandRun<'_>,
    progress: ProgressBar,
) -> Result<TasteProfile, Error>
where
    T: Transport,
    S: TokenSource,
{
    let keys = follower_keys(fetcher, run.follower_ids, run.checkpoint_path).await?;

    let profile = taste_profile(
        fetcher,
        &keys,
        run.checkpoint_path,
        run.lookup,
        ArtistCounting::PerKey,
        progress,
    )
    .await?;

    // followers whose playlists gave no artists are not recorded
    let checkpoint = CheckpointManager::load(run.checkpoint_path).await?;
    let active: Vec<ResourceKey> = keys
        .into_iter()
        .filter(|key| checkpoint.get(&key.id).is_some_and(|e| !e.is_empty()))
        .collect();
    store.upsert_followers(run.brand_id, &active)?;

    persist_profile(store, &Owner::Brand(run.brand_id.to_string()), &profile)?;
    Ok(profile)
}

/// Everything a user run needs besides the fetcher.
///
/// With no `playlist_links` every public playlist of the user is read.
pub struct UserRun<'a> {
    pub user_id: &'a str,
    pub playlist_links: &'a [String],
    pub checkpoint_path: &'a Path,
    pub lookup: &'a GenreLookup,
}

pub async fn run_user<T, S>(
    fetcher: &mut Fetcher<T, S>,
    store: &mut Store,
    run: UserRun<'_>,
    progress: ProgressBar,
) -> Result<TasteProfile, Error>
where
    T: Transport,
    S: TokenSource,
{
    let keys = if run.playlist_links.is_empty() {
        user_keys(fetcher, run.user_id).await?
    } else {
        let mut ids: Vec<String> = run
            .playlist_links
            .iter()
            .map(|l| parse_playlist_id(l))
            .collect();
        dedup_ids(&mut ids);
        ids.into_iter().map(ResourceKey::playlist).collect()
    };

    let profile = taste_profile(
        fetcher,
        &keys,
        run.checkpoint_path,
        run.lookup,
        ArtistCounting::PerTrack,
        progress,
    )
    .await?;
    persist_profile(store, &Owner::User(run.user_id.to_string()), &profile)?;
    Ok(profile)
}
