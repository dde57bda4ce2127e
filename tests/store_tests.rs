use podarr::clients::itunes::CatalogRecord;
use podarr::db::Store;
use podarr::domain::TrackId;
use podarr::entities::search_queries;
use sea_orm::{EntityTrait, Set};

async fn memory_store() -> Store {
    // A single connection keeps every statement on the same in-memory
    // database.
    Store::with_pool_options("sqlite::memory:", 1, 1)
        .await
        .expect("Failed to open in-memory store")
}

fn record(track_id: i64, name: &str) -> CatalogRecord {
    CatalogRecord {
        track_id: TrackId::new(track_id),
        track_name: name.to_string(),
        artist_name: Some("ثمانية".to_string()),
        feed_url: Some(format!("https://feeds.example.com/{track_id}")),
        artwork_url_600: Some("https://img.example.com/600.jpg".to_string()),
        ..Default::default()
    }
}

async fn backdate_query(store: &Store, term: &str, media: &str, minutes_ago: i64) {
    let created = (chrono::Utc::now() - chrono::Duration::minutes(minutes_ago)).to_rfc3339();
    let row = search_queries::ActiveModel {
        term: Set(term.to_string()),
        media: Set(media.to_string()),
        created_at: Set(created),
        ..Default::default()
    };
    search_queries::Entity::insert(row)
        .exec(&store.conn)
        .await
        .expect("Failed to insert backdated query");
}

#[tokio::test]
async fn fresh_store_starts_empty() {
    let store = memory_store().await;
    assert_eq!(store.count_queries().await.unwrap(), 0);
    assert_eq!(store.count_results().await.unwrap(), 0);
    assert_eq!(store.count_links().await.unwrap(), 0);
}

#[tokio::test]
async fn freshness_window_is_strict() {
    let store = memory_store().await;
    let window = chrono::Duration::minutes(60);

    backdate_query(&store, "فنجان", "podcast", 59).await;
    let hit = store
        .find_fresh_query("فنجان", "podcast", window)
        .await
        .unwrap();
    assert!(hit.is_some(), "59-minute-old query should still be fresh");

    backdate_query(&store, "سوالف", "podcast", 61).await;
    let miss = store
        .find_fresh_query("سوالف", "podcast", window)
        .await
        .unwrap();
    assert!(miss.is_none(), "61-minute-old query should be stale");
}

#[tokio::test]
async fn fresh_query_lookup_is_keyed_on_term_and_media() {
    let store = memory_store().await;
    let window = chrono::Duration::minutes(60);

    store.record_query("فنجان", "podcast").await.unwrap();

    let other_media = store
        .find_fresh_query("فنجان", "music", window)
        .await
        .unwrap();
    assert!(other_media.is_none());

    let other_term = store
        .find_fresh_query("بودكاست آخر", "podcast", window)
        .await
        .unwrap();
    assert!(other_term.is_none());
}

#[tokio::test]
async fn newest_query_row_wins() {
    let store = memory_store().await;
    let window = chrono::Duration::minutes(60);

    backdate_query(&store, "تاريخ", "podcast", 50).await;
    backdate_query(&store, "تاريخ", "podcast", 10).await;

    let found = store
        .find_fresh_query("تاريخ", "podcast", window)
        .await
        .unwrap()
        .expect("Expected a fresh query row");

    let ten_minutes_ago = chrono::Utc::now() - chrono::Duration::minutes(11);
    assert!(found.created_at > ten_minutes_ago.to_rfc3339());
}

#[tokio::test]
async fn concurrent_inserts_for_same_track_land_on_one_row() {
    let store = memory_store().await;
    let rec = record(42, "فنجان");

    let (a, b) = tokio::join!(
        store.insert_result_if_absent(&rec),
        store.insert_result_if_absent(&rec),
    );

    let a = a.expect("First insert failed");
    let b = b.expect("Second insert failed");

    assert_eq!(a.id, b.id);
    assert_eq!(store.count_results().await.unwrap(), 1);
}

#[tokio::test]
async fn upsert_keeps_first_stored_fields() {
    let store = memory_store().await;

    let stored = store.upsert_result(&record(7, "الأصل")).await.unwrap();

    let mut later = record(7, "نسخة أحدث");
    later.description = Some("وصف جديد".to_string());
    let resolved = store.upsert_result(&later).await.unwrap();

    assert_eq!(resolved.id, stored.id);
    assert_eq!(resolved.track_name, "الأصل");
    assert!(resolved.description.is_none());
    assert_eq!(store.count_results().await.unwrap(), 1);
}

#[tokio::test]
async fn existing_track_ids_returns_the_known_subset() {
    let store = memory_store().await;

    store.insert_result_if_absent(&record(1, "أ")).await.unwrap();
    store.insert_result_if_absent(&record(3, "ب")).await.unwrap();

    let known = store.existing_track_ids(&[1, 2, 3, 4]).await.unwrap();
    assert_eq!(known.len(), 2);
    assert!(known.contains(&1));
    assert!(known.contains(&3));

    let none = store.existing_track_ids(&[]).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn linked_results_respect_the_limit() {
    let store = memory_store().await;
    let query = store.record_query("تقنية", "podcast").await.unwrap();

    for i in 0..5 {
        let model = store
            .insert_result_if_absent(&record(100 + i, &format!("برنامج {i}")))
            .await
            .unwrap();
        store.link_query_to_result(query.id, model.id).await.unwrap();
    }

    let limited = store.list_linked_results(query.id, 3).await.unwrap();
    assert_eq!(limited.len(), 3);

    let all = store.list_linked_results(query.id, 50).await.unwrap();
    assert_eq!(all.len(), 5);
}

#[tokio::test]
async fn linked_results_for_unknown_query_are_empty() {
    let store = memory_store().await;
    let rows = store.list_linked_results(9999, 10).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn duplicate_link_is_an_error_and_leaves_one_row() {
    let store = memory_store().await;
    let query = store.record_query("علوم", "podcast").await.unwrap();
    let result = store.insert_result_if_absent(&record(8, "علوم")).await.unwrap();

    store.link_query_to_result(query.id, result.id).await.unwrap();
    assert!(store.link_query_to_result(query.id, result.id).await.is_err());

    assert_eq!(store.count_links().await.unwrap(), 1);
}

#[tokio::test]
async fn one_result_row_serves_many_queries() {
    let store = memory_store().await;

    let first = store.record_query("فنجان", "podcast").await.unwrap();
    let second = store.record_query("فنجان ثمانية", "podcast").await.unwrap();
    let row = store.insert_result_if_absent(&record(11, "فنجان")).await.unwrap();

    store.link_query_to_result(first.id, row.id).await.unwrap();
    store.link_query_to_result(second.id, row.id).await.unwrap();

    assert_eq!(store.count_results().await.unwrap(), 1);
    assert_eq!(store.count_links().await.unwrap(), 2);

    let linked = store.list_linked_results(second.id, 10).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].track_id, 11);
}
