use crate::constants::catalog;
use crate::domain::{MediaKind, TrackId};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

/// Classified failures from the upstream catalog call. Everything the
/// transport or the response shape can do wrong lands in one of these.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Search term is required")]
    EmptyTerm,

    #[error("Request timeout - please try again")]
    Timeout,

    #[error("{message}")]
    Upstream { message: String },

    #[error("{message}")]
    Malformed { message: String },
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed {
                message: "Invalid response format from iTunes API".to_string(),
            }
        } else {
            Self::Upstream {
                message: format!("iTunes API request failed: {err}"),
            }
        }
    }
}

/// Why a raw catalog record was dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRejection {
    /// The raw value is not a JSON object at all.
    UnreadableShape,
    /// Missing or non-numeric `trackId`.
    MissingTrackId,
    /// Missing or non-string `trackName`.
    MissingTitle,
    /// Neither `artistName` nor `collectionName` is a string.
    MissingAttribution,
}

/// One upstream record after validation. Every optional field stays optional;
/// the three validated fields (id, title, attribution) are the trust floor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRecord {
    pub track_id: TrackId,
    pub track_name: String,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub artwork_url_30: Option<String>,
    pub artwork_url_60: Option<String>,
    pub artwork_url_100: Option<String>,
    pub artwork_url_160: Option<String>,
    pub artwork_url_600: Option<String>,
    pub feed_url: Option<String>,
    pub track_view_url: Option<String>,
    pub country: Option<String>,
    pub primary_genre_name: Option<String>,
    pub release_date: Option<String>,
    pub track_count: Option<i32>,
    pub content_advisory_rating: Option<String>,
    pub track_time_millis: Option<i64>,
    pub episode_url: Option<String>,
    pub preview_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchEnvelope {
    #[serde(default)]
    result_count: Option<u32>,
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

/// Validates one raw record before any field is trusted: numeric track id,
/// string title, and at least one of artist/collection name present.
pub fn validate_record(value: &serde_json::Value) -> Result<CatalogRecord, RecordRejection> {
    let Some(object) = value.as_object() else {
        return Err(RecordRejection::UnreadableShape);
    };

    let track_id = object
        .get("trackId")
        .and_then(serde_json::Value::as_i64)
        .filter(|id| *id >= 0)
        .ok_or(RecordRejection::MissingTrackId)?;

    let track_name = object
        .get("trackName")
        .and_then(serde_json::Value::as_str)
        .ok_or(RecordRejection::MissingTitle)?;

    let artist_name = string_field(object, "artistName");
    let collection_name = string_field(object, "collectionName");

    if artist_name.is_none() && collection_name.is_none() {
        return Err(RecordRejection::MissingAttribution);
    }

    Ok(CatalogRecord {
        track_id: TrackId::new(track_id),
        track_name: track_name.to_string(),
        artist_name,
        collection_name,
        description: string_field(object, "description"),
        short_description: string_field(object, "shortDescription"),
        artwork_url_30: string_field(object, "artworkUrl30"),
        artwork_url_60: string_field(object, "artworkUrl60"),
        artwork_url_100: string_field(object, "artworkUrl100"),
        artwork_url_160: string_field(object, "artworkUrl160"),
        artwork_url_600: string_field(object, "artworkUrl600"),
        feed_url: string_field(object, "feedUrl"),
        track_view_url: string_field(object, "trackViewUrl"),
        country: string_field(object, "country"),
        primary_genre_name: resolve_genre(object),
        release_date: string_field(object, "releaseDate"),
        track_count: object
            .get("trackCount")
            .and_then(serde_json::Value::as_i64)
            .and_then(|n| i32::try_from(n).ok()),
        content_advisory_rating: string_field(object, "contentAdvisoryRating"),
        track_time_millis: object
            .get("trackTimeMillis")
            .and_then(serde_json::Value::as_i64),
        episode_url: string_field(object, "episodeUrl"),
        preview_url: string_field(object, "previewUrl"),
    })
}

fn string_field(
    object: &serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    object
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// The upstream genre shape is loose: `primaryGenreName` is a string for
/// shows but sometimes a `{name}` object for episodes, with a `genres` array
/// of strings as the last resort.
fn resolve_genre(object: &serde_json::Map<String, serde_json::Value>) -> Option<String> {
    match object.get("primaryGenreName") {
        Some(serde_json::Value::String(name)) => return Some(name.clone()),
        Some(serde_json::Value::Object(map)) => {
            if let Some(name) = map.get("name").and_then(serde_json::Value::as_str) {
                return Some(name.to_string());
            }
        }
        _ => {}
    }

    object
        .get("genres")
        .and_then(serde_json::Value::as_array)
        .and_then(|genres| genres.first())
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

/// The search operation the orchestrator depends on, behind a trait so tests
/// can count calls and script outcomes.
#[async_trait::async_trait]
pub trait CatalogSearch: Send + Sync {
    async fn search(
        &self,
        term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError>;
}

#[derive(Clone)]
pub struct ItunesClient {
    client: Client,
    base_url: String,
}

impl Default for ItunesClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ItunesClient {
    /// Creates a new `ItunesClient` with the standard 10-second timeout.
    ///
    /// # Panics
    /// Panics if the HTTP client cannot be built (e.g., due to system TLS
    /// configuration issues). This is a programming error or critical system
    /// issue that should not be caught.
    #[must_use]
    pub fn new() -> Self {
        Self::with_timeout(catalog::REQUEST_TIMEOUT)
            .expect("Failed to create ItunesClient with default timeout")
    }

    /// Creates a new `ItunesClient` with a custom timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_timeout(timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(catalog::USER_AGENT)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client))
    }

    /// Creates a new `ItunesClient` using a shared HTTP client.
    ///
    /// This is the preferred constructor when using `SharedState` as it allows
    /// connection pooling and reuse across multiple clients. The shared client
    /// must carry the request timeout itself.
    #[must_use]
    pub fn with_shared_client(client: Client) -> Self {
        Self {
            client,
            base_url: catalog::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different search endpoint, for local stand-ins
    /// of the real catalog.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_search_url(
        &self,
        term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Result<Url, CatalogError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| CatalogError::Upstream {
            message: format!("Invalid catalog base URL: {e}"),
        })?;

        {
            let mut pairs = url.query_pairs_mut();

            // Episodes live inside the podcast media and are selected with
            // the entity qualifier; every other kind maps straight through.
            let media_param = if media.is_episode() {
                MediaKind::Podcast.as_str()
            } else {
                media.as_str()
            };

            pairs
                .append_pair("term", term)
                .append_pair("media", media_param)
                .append_pair("limit", &limit.to_string());

            if media.is_episode() {
                pairs.append_pair("entity", "podcastEpisode");
            }
        }

        Ok(url)
    }
}

#[async_trait::async_trait]
impl CatalogSearch for ItunesClient {
    async fn search(
        &self,
        term: &str,
        media: MediaKind,
        limit: u32,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let trimmed = term.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::EmptyTerm);
        }

        let url = self.build_search_url(trimmed, media, limit)?;

        debug!("Catalog search: {url}");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(CatalogError::Upstream {
                message: format!(
                    "iTunes API error: {} {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let envelope: SearchEnvelope = response.json().await?;

        let Some(raw_results) = envelope.results else {
            return Err(CatalogError::Malformed {
                message: "Invalid response format from iTunes API".to_string(),
            });
        };

        debug!(
            "Catalog returned {} raw records (reported count: {:?})",
            raw_results.len(),
            envelope.result_count
        );

        let records = raw_results
            .iter()
            .filter_map(|value| match validate_record(value) {
                Ok(record) => Some(record),
                Err(rejection) => {
                    debug!("Dropping catalog record: {rejection:?}");
                    None
                }
            })
            .collect();

        Ok(records)
    }
}
