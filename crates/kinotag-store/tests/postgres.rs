//! Postgres integration tests.
//!
//! These need a scratch database. Point `KINOTAG_TEST_DATABASE_URL` at one
//! and run `cargo test -p kinotag-store -- --ignored`. Titles are suffixed
//! with the process id so reruns against the same database stay idempotent.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use kinotag_core::TagVocabulary;
use kinotag_store::MovieStore;
use rust_decimal::Decimal;

async fn store() -> MovieStore {
    let url = std::env::var("KINOTAG_TEST_DATABASE_URL")
        .expect("KINOTAG_TEST_DATABASE_URL must be set for integration tests");
    let store = MovieStore::connect(&url, Arc::new(TagVocabulary::movie_descriptors()))
        .await
        .expect("connect");
    store.ensure_schema().await.expect("ensure schema");
    store.verify_schema().await.expect("verify schema");
    store
}

fn unique(title: &str) -> String {
    format!("{title}-{}", std::process::id())
}

fn tags(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_string()).collect()
}

#[tokio::test]
#[ignore]
async fn test_upsert_is_idempotent() {
    let store = store().await;
    let title = unique("Signal");

    let first = store
        .upsert(&title, 2024, Decimal::new(8000, 3), &tags(&["tense", "slow-burn"]))
        .await
        .unwrap();
    let second = store
        .upsert(&title, 2024, Decimal::new(8000, 3), &tags(&["tense", "slow-burn"]))
        .await
        .unwrap();

    assert!(first, "first insert should create the row");
    assert!(!second, "second insert should be a no-op");
}

#[tokio::test]
#[ignore]
async fn test_upsert_never_updates_existing_row() {
    let store = store().await;
    let title = unique("Residue");

    store
        .upsert(&title, 2019, Decimal::new(7500, 3), &tags(&["bleak", "raw"]))
        .await
        .unwrap();
    // Different rating and tags, same key: first write wins.
    let inserted = store
        .upsert(&title, 2019, Decimal::new(9999, 3), &tags(&["comedic"]))
        .await
        .unwrap();
    assert!(!inserted);

    let hits = store.search(&tags(&["bleak", "raw"]), 1000).await.unwrap();
    let hit = hits.iter().find(|h| h.title == title).expect("row present");
    assert_eq!(hit.overlap, 2, "stored mask still encodes the first write");
}

#[tokio::test]
#[ignore]
async fn test_search_overlap_dominates_rating() {
    let store = store().await;
    let two_shared = unique("TwoShared");
    let one_shared = unique("OneShared");

    // Lower-rated movie with MORE shared tags must rank first.
    store
        .upsert(
            &two_shared,
            2020,
            Decimal::new(9000, 3),
            &tags(&["tense", "gritty"]),
        )
        .await
        .unwrap();
    store
        .upsert(&one_shared, 2021, Decimal::new(9500, 3), &tags(&["tense"]))
        .await
        .unwrap();

    let hits = store.search(&tags(&["tense", "gritty"]), 1000).await.unwrap();
    let pos_two = hits.iter().position(|h| h.title == two_shared).unwrap();
    let pos_one = hits.iter().position(|h| h.title == one_shared).unwrap();

    assert_eq!(hits[pos_two].overlap, 2);
    assert_eq!(hits[pos_one].overlap, 1);
    assert!(pos_two < pos_one, "overlap count must dominate rating");
}

#[tokio::test]
#[ignore]
async fn test_search_excludes_zero_overlap_rows() {
    let store = store().await;
    let title = unique("Disjoint");

    store
        .upsert(&title, 2018, Decimal::new(8800, 3), &tags(&["whimsical"]))
        .await
        .unwrap();

    let hits = store.search(&tags(&["bleak"]), 1000).await.unwrap();
    assert!(
        hits.iter().all(|h| h.title != title),
        "a row sharing no tag must not appear at all"
    );
}

#[tokio::test]
#[ignore]
async fn test_search_truncates_to_limit() {
    let store = store().await;
    for i in 0..4 {
        store
            .upsert(
                &unique(&format!("Filler-{i}")),
                1990 + i,
                Decimal::new(7000, 3),
                &tags(&["dystopian"]),
            )
            .await
            .unwrap();
    }

    let hits = store.search(&tags(&["dystopian"]), 2).await.unwrap();
    assert!(hits.len() <= 2);
}

#[tokio::test]
#[ignore]
async fn test_count_reflects_inserts() {
    let store = store().await;
    let before = store.count().await.unwrap();
    store
        .upsert(
            &unique("Counted"),
            2001,
            Decimal::new(6000, 3),
            &tags(&["nostalgic", "intimate"]),
        )
        .await
        .unwrap();
    let after = store.count().await.unwrap();
    assert!(after >= before, "count never shrinks on insert");
}
