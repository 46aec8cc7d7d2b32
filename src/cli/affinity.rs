use tabled::Table;

use crate::{
    affinity::{affinity_report, category_affinity},
    cli::setup,
    error,
    types::{AffinityTableRow, Category},
};

/// Prints how close a user's taste is to a brand's, per category.
///
/// Both sides must have been collected before (`tunematch user` and
/// `tunematch brand`). A category without shared entries scores 0%.
pub fn affinity(user_id: String, brand_id: String, category: Option<Category>) {
    let store = setup::open_store();

    let scores = match category {
        Some(category) => {
            category_affinity(&store, &user_id, &brand_id, category).map(|s| vec![(category, s)])
        }
        None => affinity_report(&store, &user_id, &brand_id),
    };

    let scores = match scores {
        Ok(scores) => scores,
        Err(e) => error!(
            "Cannot compute affinity of {} to {}. Err: {}",
            user_id, brand_id, e
        ),
    };

    let rows: Vec<AffinityTableRow> = scores
        .into_iter()
        .map(|(category, score)| AffinityTableRow {
            category: category.to_string(),
            affinity: format!("{score:.2}%"),
        })
        .collect();

    println!("{}", Table::new(rows));
}
