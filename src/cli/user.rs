use std::path::PathBuf;

use crate::{
    cli::setup, config, error, info,
    management::CheckpointManager,
    pipeline::{self, UserRun},
    success,
};

/// Collects the taste profile of one user and stores it.
///
/// Without `playlists` every public playlist of the user is read; otherwise
/// only the given playlist IDs or share links. Each playlist is one
/// checkpointed unit of work.
///
/// # Example Usage
///
/// ```bash
/// tunematch user --user-id alice
/// tunematch user --user-id alice --playlist https://open.spotify.com/playlist/37i9dQ
/// ```
pub async fn user(
    user_id: String,
    playlists: Vec<String>,
    checkpoint: Option<PathBuf>,
    fresh: bool,
) {
    let checkpoint_path =
        checkpoint.unwrap_or_else(|| config::checkpoint_path(&format!("user-{user_id}")));

    if fresh {
        if let Err(e) = CheckpointManager::new(&checkpoint_path).clear().await {
            error!("Cannot remove checkpoint. Err: {}", e);
        }
    }

    let lookup = setup::load_lookup().await;
    let mut store = setup::open_store();
    let mut fetcher = setup::spotify_fetcher();

    info!("Collecting playlists of {}", user_id);

    let run = UserRun {
        user_id: &user_id,
        playlist_links: &playlists,
        checkpoint_path: &checkpoint_path,
        lookup: &lookup,
    };

    let profile =
        match pipeline::run_user(&mut fetcher, &mut store, run, setup::key_progress()).await {
            Ok(profile) => profile,
            Err(e) => error!("User run for {} failed. Err: {}", user_id, e),
        };

    success!(
        "Stored rankings for {}: {} unique artists, {} subgenres, {} genres",
        user_id,
        profile.unique_artists.len(),
        profile.subgenres.len(),
        profile.genres.len()
    );
}
