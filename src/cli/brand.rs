use std::path::PathBuf;

use crate::{
    cli::setup, config, error, info,
    management::CheckpointManager,
    pipeline::{self, BrandRun},
    success, utils, warning,
};

/// Rows shown after a run.
const SUMMARY_ROWS: usize = 10;

/// Collects the taste profile of a brand's followers and stores it.
///
/// Reads one follower ID (or profile link) per line from `followers`, walks
/// up to ten playlists per follower and persists artist, subgenre and main
/// genre rankings under the brand. Progress is checkpointed after every
/// follower; rerunning the same command resumes where the last run stopped.
///
/// # Arguments
///
/// * `brand_id` - Identifier the rankings are stored under
/// * `followers` - Text file with one follower per line
/// * `checkpoint` - Checkpoint file, defaults to `checkpoints/brand-<ID>.json`
/// * `fresh` - Discard an existing checkpoint before starting
///
/// # Example Usage
///
/// ```bash
/// tunematch brand --brand-id acme --followers acme_followers.txt
/// ```
pub async fn brand(
    brand_id: String,
    followers: PathBuf,
    checkpoint: Option<PathBuf>,
    fresh: bool,
) {
    let content = match async_fs::read_to_string(&followers).await {
        Ok(content) => content,
        Err(e) => error!(
            "Cannot read followers file {}. Err: {}",
            followers.display(),
            e
        ),
    };

    let follower_ids = utils::parse_follower_ids(&content);
    if follower_ids.is_empty() {
        warning!("No followers found in {}", followers.display());
        return;
    }

    let checkpoint_path =
        checkpoint.unwrap_or_else(|| config::checkpoint_path(&format!("brand-{brand_id}")));

    if fresh {
        if let Err(e) = CheckpointManager::new(&checkpoint_path).clear().await {
            error!("Cannot remove checkpoint. Err: {}", e);
        }
    }

    let lookup = setup::load_lookup().await;
    let mut store = setup::open_store();
    let mut fetcher = setup::spotify_fetcher();

    info!(
        "Collecting {} followers of {} (checkpoint: {})",
        follower_ids.len(),
        brand_id,
        checkpoint_path.display()
    );

    let run = BrandRun {
        brand_id: &brand_id,
        follower_ids: &follower_ids,
        checkpoint_path: &checkpoint_path,
        lookup: &lookup,
    };

    let profile =
        match pipeline::run_brand(&mut fetcher, &mut store, run, setup::key_progress()).await {
            Ok(profile) => profile,
            Err(e) => error!("Brand run for {} failed. Err: {}", brand_id, e),
        };

    let followers_stored = store.follower_count(&brand_id).unwrap_or_default();
    success!(
        "Stored rankings for {}: {} followers, {} unique artists, {} subgenres, {} genres",
        brand_id,
        followers_stored,
        profile.unique_artists.len(),
        profile.subgenres.len(),
        profile.genres.len()
    );

    setup::print_ranking(profile.artists.slice(1, SUMMARY_ROWS), 1);
}
