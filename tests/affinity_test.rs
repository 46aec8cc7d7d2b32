use tunematch::{
    affinity::{affinity, affinity_report, category_affinity},
    management::Store,
    types::{Category, Owner, RankTable},
};

// Helper function to create a table ranked in the given order
fn ranked(labels: &[&str]) -> RankTable {
    let n = labels.len() as u64;
    RankTable::from_counts(
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, n - i as u64)),
    )
}

#[test]
fn test_swapped_pair() {
    let user = ranked(&["A", "B"]);
    let brand = ranked(&["B", "A"]);

    assert_eq!(affinity(&user, &brand), 52.86);
}

#[test]
fn test_table_against_itself_is_perfect() {
    let table = ranked(&["A", "B", "C", "D", "E"]);
    assert_eq!(affinity(&table, &table), 100.0);
}

#[test]
fn test_single_shared_label_is_perfect() {
    let user = ranked(&["A", "B", "C"]);
    let brand = ranked(&["X", "Y", "C"]);

    assert_eq!(affinity(&user, &brand), 100.0);
}

#[test]
fn test_disjoint_tables_score_zero() {
    let user = ranked(&["A", "B"]);
    let brand = ranked(&["C", "D"]);

    assert_eq!(affinity(&user, &brand), 0.0);
    assert_eq!(affinity(&RankTable::new(), &brand), 0.0);
    assert_eq!(affinity(&RankTable::new(), &RankTable::new()), 0.0);
}

#[test]
fn test_weights_use_position_in_full_table() {
    // user weights A=1, B=1/4; brand weights A=1, B=1/2
    let user = ranked(&["A", "X", "Y", "B"]);
    let brand = ranked(&["A", "B"]);

    assert_eq!(affinity(&user, &brand), 81.14);
}

#[test]
fn test_far_apart_rankings_floor_at_zero() {
    let user_fillers: Vec<String> = (0..998).map(|i| format!("u{i}")).collect();
    let brand_fillers: Vec<String> = (0..998).map(|i| format!("b{i}")).collect();

    let mut user_labels = vec!["A"];
    user_labels.extend(user_fillers.iter().map(String::as_str));
    user_labels.push("B");
    let mut brand_labels = vec!["B"];
    brand_labels.extend(brand_fillers.iter().map(String::as_str));
    brand_labels.push("A");

    assert_eq!(affinity(&ranked(&user_labels), &ranked(&brand_labels)), 0.0);
}

#[test]
fn test_scores_stay_within_bounds() {
    let tables = [
        ranked(&["A"]),
        ranked(&["A", "B"]),
        ranked(&["B", "A", "C"]),
        ranked(&["C", "D", "A", "B"]),
        ranked(&["E", "D", "C", "B", "A"]),
        ranked(&["Z"]),
    ];

    for user in &tables {
        for brand in &tables {
            let score = affinity(user, brand);
            assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
    }
}

#[test]
fn test_report_covers_every_category() {
    let mut store = Store::in_memory().unwrap();
    let user = Owner::User("alice".to_string());
    let brand = Owner::Brand("acme".to_string());

    store
        .upsert_ranking(&user, Category::Artists, &ranked(&["A", "B"]))
        .unwrap();
    store
        .upsert_ranking(&brand, Category::Artists, &ranked(&["B", "A"]))
        .unwrap();
    store
        .upsert_ranking(&user, Category::Genres, &ranked(&["rock", "pop"]))
        .unwrap();
    store
        .upsert_ranking(&brand, Category::Genres, &ranked(&["rock", "pop"]))
        .unwrap();

    let report = affinity_report(&store, "alice", "acme").unwrap();

    assert_eq!(
        report,
        vec![
            (Category::Artists, 52.86),
            (Category::Genres, 100.0),
            (Category::Subgenres, 0.0),
        ]
    );
    assert_eq!(
        category_affinity(&store, "alice", "acme", Category::Genres).unwrap(),
        100.0
    );
    assert_eq!(
        category_affinity(&store, "alice", "nobody", Category::Artists).unwrap(),
        0.0
    );
}
