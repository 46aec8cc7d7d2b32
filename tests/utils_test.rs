use tunematch::utils::*;

#[test]
fn test_parse_playlist_id_from_share_link() {
    assert_eq!(
        parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M?si=abc123"),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
    assert_eq!(
        parse_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DXcBWIGoYBM5M/"),
        "37i9dQZF1DXcBWIGoYBM5M"
    );
}

#[test]
fn test_parse_playlist_id_passes_bare_id_through() {
    assert_eq!(parse_playlist_id("37i9dQZF1DXcBWIGoYBM5M"), "37i9dQZF1DXcBWIGoYBM5M");
    assert_eq!(parse_playlist_id("  37i9dQ  "), "37i9dQ");
    assert_eq!(parse_playlist_id(""), "");
}

#[test]
fn test_round2() {
    assert_eq!(round2(52.859548), 52.86);
    assert_eq!(round2(100.0), 100.0);
    assert_eq!(round2(0.004), 0.0);
    assert_eq!(round2(81.14381), 81.14);
}

#[test]
fn test_dedup_ids_keeps_first_occurrence() {
    let mut ids = vec![
        "b".to_string(),
        "a".to_string(),
        "b".to_string(),
        "c".to_string(),
        "a".to_string(),
    ];

    dedup_ids(&mut ids);

    assert_eq!(ids, vec!["b", "a", "c"]);
}

#[test]
fn test_parse_follower_ids() {
    let content = "\
# followers of acme
alice

https://open.spotify.com/user/bob?si=xyz
  carol
alice
";

    assert_eq!(parse_follower_ids(content), vec!["alice", "bob", "carol"]);
    assert!(parse_follower_ids("# nothing\n\n").is_empty());
}

#[test]
fn test_now_timestamp_is_recent() {
    // 2024-01-01T00:00:00Z
    assert!(now_timestamp() > 1_704_067_200);
}
