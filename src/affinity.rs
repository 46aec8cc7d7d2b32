//! Rank weighted taste similarity between a user and a brand.

use std::collections::BTreeSet;

use crate::{
    error::StoreError,
    management::Store,
    types::{Category, Owner, RankTable},
    utils::round2,
};

/// Affinity between two rankings, in `[0, 100]`.
///
/// Only labels present in both tables take part. Each one is weighted by
/// `1 / position` in its full table, weights are normalized per table, and
/// the Euclidean distance `d` between the two weight vectors (labels in
/// alphabetical order) gives `max(0, (1 - d) * 100)`, rounded to two decimals.
/// A single shared label scores 100; no shared label scores 0.
pub fn affinity(user: &RankTable, brand: &RankTable) -> f64 {
    let shared: BTreeSet<&str> = user
        .iter()
        .map(|e| e.label.as_str())
        .filter(|label| brand.position_of(label).is_some())
        .collect();

    match shared.len() {
        0 => return 0.0,
        1 => return 100.0,
        _ => {}
    }

    let user_weights = normalized_weights(user, &shared);
    let brand_weights = normalized_weights(brand, &shared);

    let distance = user_weights
        .iter()
        .zip(&brand_weights)
        .map(|(u, b)| (u - b).powi(2))
        .sum::<f64>()
        .sqrt();

    round2(((1.0 - distance) * 100.0).max(0.0))
}

fn normalized_weights(table: &RankTable, shared: &BTreeSet<&str>) -> Vec<f64> {
    let weights: Vec<f64> = shared
        .iter()
        .map(|label| table.position_of(label).map_or(0.0, |p| 1.0 / p as f64))
        .collect();

    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return weights;
    }
    weights.into_iter().map(|w| w / total).collect()
}

/// Affinity of `user_id` to `brand_id` for one category, from stored rankings.
pub fn category_affinity(
    store: &Store,
    user_id: &str,
    brand_id: &str,
    category: Category,
) -> Result<f64, StoreError> {
    let user = store.load_ranking(&Owner::User(user_id.to_string()), category)?;
    let brand = store.load_ranking(&Owner::Brand(brand_id.to_string()), category)?;
    Ok(affinity(&user, &brand))
}

/// Affinity for artists, genres and subgenres.
pub fn affinity_report(
    store: &Store,
    user_id: &str,
    brand_id: &str,
) -> Result<Vec<(Category, f64)>, StoreError> {
    Category::ALL
        .iter()
        .map(|category| {
            category_affinity(store, user_id, brand_id, *category).map(|score| (*category, score))
        })
        .collect()
}
