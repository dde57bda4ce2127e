use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tokio::sync::RwLock;
use tower::ServiceExt;

use podarr::clients::itunes::{CatalogError, CatalogRecord, CatalogSearch};
use podarr::config::Config;
use podarr::db::Store;
use podarr::domain::{MediaKind, TrackId};
use podarr::services::{PopularService, SearchService};
use podarr::state::SharedState;

fn memory_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // One connection keeps the in-memory database visible to every query.
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config
}

/// App over the real wiring; endpoints that call the catalog are not
/// exercised through this one.
async fn spawn_app() -> Router {
    let state = podarr::api::create_app_state_from_config(memory_config(), None)
        .await
        .expect("Failed to create app state");
    podarr::api::router(state).await
}

/// App with a scripted catalog behind the search and popular services.
async fn spawn_app_with_catalog(catalog: Arc<dyn CatalogSearch>) -> Router {
    let config = memory_config();
    let store = Store::with_pool_options(&config.general.database_path, 1, 1)
        .await
        .expect("Failed to open in-memory store");

    let search_service = Arc::new(SearchService::new(Arc::new(store.clone()), catalog.clone()));
    let popular_service = Arc::new(PopularService::new(catalog));

    let shared = Arc::new(SharedState {
        config: Arc::new(RwLock::new(config)),
        store,
        search_service,
        popular_service,
    });

    let state = podarr::api::create_app_state(shared, None);
    podarr::api::router(state).await
}

struct StubCatalog {
    records: Vec<CatalogRecord>,
}

#[async_trait::async_trait]
impl CatalogSearch for StubCatalog {
    async fn search(
        &self,
        _term: &str,
        _media: MediaKind,
        limit: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        Ok(self
            .records
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

struct TimeoutCatalog;

#[async_trait::async_trait]
impl CatalogSearch for TimeoutCatalog {
    async fn search(
        &self,
        _term: &str,
        _media: MediaKind,
        _limit: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        Err(CatalogError::Timeout)
    }
}

fn show(track_id: i64, name: &str) -> CatalogRecord {
    CatalogRecord {
        track_id: TrackId::new(track_id),
        track_name: name.to_string(),
        artist_name: Some("Mics Network".to_string()),
        artwork_url_600: Some("https://img.example.com/600.jpg".to_string()),
        ..Default::default()
    }
}

fn episode(track_id: i64) -> CatalogRecord {
    CatalogRecord {
        track_id: TrackId::new(track_id),
        track_name: "Live Special".to_string(),
        collection_name: Some("History Hour".to_string()),
        episode_url: Some("https://cdn.example.com/ep.mp3".to_string()),
        track_time_millis: Some(1_800_000),
        ..Default::default()
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value =
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn missing_term_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], "Search term is required");
}

#[tokio::test]
async fn whitespace_term_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/search?term=%20%20%20").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search term is required");
}

#[tokio::test]
async fn overlong_term_is_rejected() {
    let app = spawn_app().await;
    let term = "a".repeat(101);

    let (status, body) = get(&app, &format!("/api/search?term={term}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search term must be less than 100 characters");
}

#[tokio::test]
async fn unknown_media_is_rejected() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/search?term=history&media=tvShow").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("Media must be one of:"), "got: {error}");
}

#[tokio::test]
async fn out_of_range_limits_are_rejected() {
    let app = spawn_app().await;

    for bad in ["0", "201", "-5", "abc"] {
        let (status, body) = get(&app, &format!("/api/search?term=history&limit={bad}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit={bad}");
        assert_eq!(body["error"], "Limit must be between 1 and 200", "limit={bad}");
    }
}

#[tokio::test]
async fn boundary_limits_are_accepted() {
    let app = spawn_app_with_catalog(Arc::new(StubCatalog {
        records: Vec::new(),
    }))
    .await;

    for ok in ["1", "200"] {
        let (status, body) = get(&app, &format!("/api/search?term=history&limit={ok}")).await;
        assert_eq!(status, StatusCode::OK, "limit={ok}");
        assert_eq!(body["success"], serde_json::json!(true));
        assert_eq!(body["message"], "No results found");
    }
}

#[tokio::test]
async fn search_reports_live_then_cache() {
    let app = spawn_app_with_catalog(Arc::new(StubCatalog {
        records: vec![show(1, "History Hour"), show(2, "Deep Past")],
    }))
    .await;

    let (status, body) = get(&app, "/api/search?term=history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], serde_json::json!(true));
    assert_eq!(body["message"], "Found 2 results");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Cards go over the wire with camelCase keys.
    let card = &body["data"][0];
    assert!(card["trackId"].is_i64());
    assert!(card["trackName"].is_string());
    assert!(card["artworkUrl"].is_string());

    let (status, body) = get(&app, "/api/search?term=history").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Results from cache");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn episode_search_returns_episode_cards() {
    let app = spawn_app_with_catalog(Arc::new(StubCatalog {
        records: vec![episode(55)],
    }))
    .await;

    let (status, body) = get(&app, "/api/search?term=history&media=podcastEpisode").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Found 1 episodes");
    assert_eq!(body["data"][0]["id"], "episode-55");
    assert_eq!(body["data"][0]["artistName"], "History Hour");
    assert_eq!(body["data"][0]["episodeUrl"], "https://cdn.example.com/ep.mp3");
}

#[tokio::test]
async fn empty_episode_search_has_its_own_message() {
    let app = spawn_app_with_catalog(Arc::new(StubCatalog {
        records: Vec::new(),
    }))
    .await;

    let (status, body) = get(&app, "/api/search?term=history&media=podcastEpisode").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "No episodes found");
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn upstream_timeout_maps_to_gateway_timeout() {
    let app = spawn_app_with_catalog(Arc::new(TimeoutCatalog)).await;

    let (status, body) = get(&app, "/api/search?term=history").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"], "Request timeout - please try again");
}

#[tokio::test]
async fn popular_returns_curated_cards() {
    let app = spawn_app_with_catalog(Arc::new(StubCatalog {
        records: vec![show(10, "صوتيات"), show(11, "أخبار اليوم"), show(12, "علوم")],
    }))
    .await;

    let (status, body) = get(&app, "/api/popular?limit=9").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], serde_json::json!(true));

    let cards = body["data"].as_array().unwrap();
    assert!(!cards.is_empty());
    assert_eq!(
        body["message"],
        format!("Found {} popular Arabic podcasts", cards.len())
    );
    assert!(cards[0]["id"].as_str().unwrap().starts_with("podcast-"));
}

#[tokio::test]
async fn popular_rejects_out_of_range_limit() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/popular?limit=0").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Limit must be between 1 and 200");
}

#[tokio::test]
async fn system_status_reports_cache_counts() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/system/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["data"]["uptime"].is_u64());
    assert_eq!(body["data"]["cached_queries"], 0);
    assert_eq!(body["data"]["cached_results"], 0);
    assert_eq!(body["data"]["query_links"], 0);
}

#[tokio::test]
async fn health_probes_answer() {
    let app = spawn_app().await;

    let (status, body) = get(&app, "/api/system/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "alive");

    let (status, body) = get(&app, "/api/system/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ready"], serde_json::json!(true));
    assert_eq!(body["data"]["checks"]["database"], serde_json::json!(true));
}

#[tokio::test]
async fn metrics_endpoint_reports_disabled_without_recorder() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("Metrics not enabled"));
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let app = spawn_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/system/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
}
