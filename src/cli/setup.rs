use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config, error,
    management::Store,
    ranking::GenreLookup,
    spotify::{self, SpotifyFetcher},
    types::{RankEntry, RankingTableRow},
};

pub(crate) fn open_store() -> Store {
    let path = config::database_path();
    match Store::open(&path) {
        Ok(store) => store,
        Err(e) => error!("Cannot open database {}. Err: {}", path.display(), e),
    }
}

pub(crate) async fn load_lookup() -> GenreLookup {
    let path = config::genres_path();
    match GenreLookup::load(&path).await {
        Ok(lookup) => lookup,
        Err(e) => error!("Cannot load genre lookup {}. Err: {}", path.display(), e),
    }
}

pub(crate) fn spotify_fetcher() -> SpotifyFetcher {
    match spotify::fetcher_from_env() {
        Ok(fetcher) => fetcher,
        Err(e) => error!(
            "Cannot set up the Spotify client. Check SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET.\n Error: {}",
            e
        ),
    }
}

/// Bar that advances once per resource key.
pub(crate) fn key_progress() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .progress_chars("=> "),
    );
    pb
}

/// Prints `entries` as a table, numbering from `first_position`.
pub(crate) fn print_ranking(entries: &[RankEntry], first_position: usize) {
    let rows: Vec<RankingTableRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| RankingTableRow {
            ranking: first_position + i,
            name: e.label.clone(),
            appearances: e.count,
        })
        .collect();

    println!("{}", Table::new(rows));
}
