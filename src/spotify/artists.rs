use std::collections::HashMap;

use crate::{
    error::FetchError,
    spotify::{auth::TokenSource, fetcher::Fetcher, paginator::Paginator, transport::Transport},
    types::{Artist, EntityMap, RankTable, SeveralArtists, UNKNOWN_ENTITY_ID},
    warning,
};

/// Maximum number of IDs accepted by the several artists endpoint.
pub const ARTIST_BATCH_SIZE: usize = 50;

/// Walks one batched artist lookup of up to [`ARTIST_BATCH_SIZE`] IDs.
pub fn several_artists<'f, T, S>(
    fetcher: &'f mut Fetcher<T, S>,
    ids: &[String],
) -> Paginator<'f, SeveralArtists, T, S>
where
    T: Transport,
    S: TokenSource,
{
    let seed = fetcher.endpoint(&format!("artists?ids={}", ids.join(",")));
    Paginator::new(fetcher, seed)
}

/// Looks up full artist records for `ids`, batch by batch.
///
/// A failed batch is logged and skipped; auth failures abort.
pub async fn lookup_artists<T, S>(
    fetcher: &mut Fetcher<T, S>,
    ids: &[String],
) -> Result<Vec<Artist>, FetchError>
where
    T: Transport,
    S: TokenSource,
{
    let mut artists = Vec::with_capacity(ids.len());
    for batch in ids.chunks(ARTIST_BATCH_SIZE) {
        let (found, failure) = several_artists(fetcher, batch).collect_all().await;
        artists.extend(found);
        match failure {
            Some(e) if e.is_fatal() => return Err(e),
            Some(e) => warning!("Skipping batch of {} artists: {}", batch.len(), e),
            None => {}
        }
    }
    Ok(artists)
}

/// Subgenre frequency over the unique artists: each artist counts once for
/// each of its genres.
pub async fn count_genres<T, S>(
    fetcher: &mut Fetcher<T, S>,
    artists: &EntityMap,
) -> Result<RankTable, FetchError>
where
    T: Transport,
    S: TokenSource,
{
    let ids: Vec<String> = artists
        .keys()
        .filter(|id| id.as_str() != UNKNOWN_ENTITY_ID)
        .cloned()
        .collect();

    let found = lookup_artists(fetcher, &ids).await?;
    Ok(genre_frequency(&found))
}

/// Genre frequency in first-seen order, sorted by count.
pub fn genre_frequency(artists: &[Artist]) -> RankTable {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for genre in artists.iter().flat_map(|a| a.genres.iter()) {
        let count = counts.entry(genre.clone()).or_insert_with(|| {
            order.push(genre.clone());
            0
        });
        *count += 1;
    }

    RankTable::from_counts(order.into_iter().map(|g| {
        let count = counts.get(&g).copied().unwrap_or_default();
        (g, count)
    }))
}
