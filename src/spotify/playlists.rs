use crate::{
    error::FetchError,
    spotify::{auth::TokenSource, fetcher::Fetcher, paginator::Paginator, transport::Transport},
    types::{Appearances, EntityMap, Page, PlaylistItem, SimplifiedPlaylist, UNKNOWN_ENTITY_ID},
};

/// Page size of the playlist tracks endpoint.
pub const TRACKS_PAGE_SIZE: u32 = 100;

/// Page size of the user playlists endpoint.
pub const PLAYLISTS_PAGE_SIZE: u32 = 50;

/// Walks every track of a playlist.
pub fn playlist_tracks<'f, T, S>(
    fetcher: &'f mut Fetcher<T, S>,
    playlist_id: &str,
) -> Paginator<'f, Page<PlaylistItem>, T, S>
where
    T: Transport,
    S: TokenSource,
{
    let seed = fetcher.endpoint(&format!(
        "playlists/{playlist_id}/tracks?limit={TRACKS_PAGE_SIZE}"
    ));
    Paginator::new(fetcher, seed)
}

/// Walks the public playlists of a user.
pub fn user_playlists<'f, T, S>(
    fetcher: &'f mut Fetcher<T, S>,
    user_id: &str,
) -> Paginator<'f, Page<SimplifiedPlaylist>, T, S>
where
    T: Transport,
    S: TokenSource,
{
    let seed = fetcher.endpoint(&format!(
        "users/{user_id}/playlists?limit={PLAYLISTS_PAGE_SIZE}"
    ));
    Paginator::new(fetcher, seed)
}

/// Playlist IDs of a user, at most `limit` of them.
pub async fn playlist_ids_for_user<T, S>(
    fetcher: &mut Fetcher<T, S>,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<String>, FetchError>
where
    T: Transport,
    S: TokenSource,
{
    let mut ids = Vec::new();
    let mut pages = user_playlists(fetcher, user_id);
    while let Some(next) = pages.next().await {
        ids.push(next?.id);
        if limit.is_some_and(|l| ids.len() >= l) {
            break;
        }
    }
    Ok(ids)
}

/// Folds the artists of one playlist item into `map`.
///
/// Items without a track (removed or unavailable tracks) are skipped. The
/// first name seen for an ID wins; artists without an ID are filed under
/// [`UNKNOWN_ENTITY_ID`].
pub fn fold_track_artists(map: &mut EntityMap, item: &PlaylistItem) {
    let Some(track) = &item.track else {
        return;
    };

    for artist in &track.artists {
        let id = artist
            .id
            .clone()
            .unwrap_or_else(|| UNKNOWN_ENTITY_ID.to_string());
        let name = artist.name.clone().unwrap_or_default();
        map.entry(id).or_insert(name);
    }
}

/// Adds one appearance for every named artist credited on the item's track.
pub fn count_track_artists(counts: &mut Appearances, item: &PlaylistItem) {
    let Some(track) = &item.track else {
        return;
    };

    for name in track.artists.iter().filter_map(|a| a.name.as_deref()) {
        if !name.is_empty() {
            *counts.entry(name.to_string()).or_default() += 1;
        }
    }
}

/// Folds every artist of a playlist into `map` and counts its track credits
/// into `counts`.
///
/// On failure the artists read so far stay in `map` and `counts`.
pub async fn collect_playlist_artists<T, S>(
    fetcher: &mut Fetcher<T, S>,
    playlist_id: &str,
    map: &mut EntityMap,
    counts: &mut Appearances,
) -> Result<(), FetchError>
where
    T: Transport,
    S: TokenSource,
{
    let mut tracks = playlist_tracks(fetcher, playlist_id);
    while let Some(next) = tracks.next().await {
        let item = next?;
        fold_track_artists(map, &item);
        count_track_artists(counts, &item);
    }
    Ok(())
}
