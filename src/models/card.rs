use crate::clients::itunes::CatalogRecord;
use crate::constants::artwork;
use crate::entities::podcast_results;
use serde::{Deserialize, Serialize};

/// UI-ready projection of a podcast show, from either a stored row or a live
/// catalog record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastCard {
    pub id: String,
    pub track_id: i64,
    pub track_name: String,
    pub artist_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub artwork_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_view_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_genre_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_count: Option<i32>,
}

impl PodcastCard {
    /// Card for a stored row. The card id is the row id, which stays stable
    /// across every query the row is linked to.
    #[must_use]
    pub fn from_stored(model: &podcast_results::Model) -> Self {
        Self {
            id: model.id.to_string(),
            track_id: model.track_id,
            track_name: model.track_name.clone(),
            artist_name: model.artist_name.clone(),
            collection_name: non_empty(model.collection_name.clone()),
            description: non_empty(model.description.clone()),
            artwork_url: pick_artwork(&[
                model.artwork_url_600.as_deref(),
                model.artwork_url_100.as_deref(),
                model.artwork_url_60.as_deref(),
                model.artwork_url_30.as_deref(),
            ]),
            track_view_url: non_empty(model.track_view_url.clone()),
            primary_genre_name: non_empty(model.primary_genre_name.clone()),
            release_date: non_empty(model.release_date.clone()),
            track_count: model.track_count,
        }
    }

    /// Card straight from a live catalog record, for the cache-free popular
    /// path. No stored row exists, so the id is derived from the track id.
    #[must_use]
    pub fn from_catalog(record: &CatalogRecord) -> Self {
        Self {
            id: format!("podcast-{}", record.track_id),
            track_id: record.track_id.value(),
            track_name: record.track_name.clone(),
            artist_name: Some(record.artist_name.clone().unwrap_or_default()),
            collection_name: non_empty(record.collection_name.clone()),
            description: non_empty(record.description.clone()),
            artwork_url: pick_artwork(&[
                record.artwork_url_600.as_deref(),
                record.artwork_url_100.as_deref(),
                record.artwork_url_60.as_deref(),
                record.artwork_url_30.as_deref(),
            ]),
            track_view_url: non_empty(record.track_view_url.clone()),
            primary_genre_name: non_empty(record.primary_genre_name.clone()),
            release_date: non_empty(record.release_date.clone()),
            track_count: record.track_count,
        }
    }
}

/// UI-ready projection of a single episode. Episodes are never persisted, so
/// these are always built from live catalog records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeCard {
    pub id: String,
    pub track_id: i64,
    pub track_name: String,
    pub artist_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub artwork_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_view_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_genre_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_time_millis: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_url: Option<String>,
}

impl EpisodeCard {
    #[must_use]
    pub fn from_catalog(record: &CatalogRecord) -> Self {
        let artist_name = non_empty(record.artist_name.clone())
            .or_else(|| non_empty(record.collection_name.clone()))
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            id: format!("episode-{}", record.track_id),
            track_id: record.track_id.value(),
            track_name: record.track_name.clone(),
            artist_name,
            collection_name: non_empty(record.collection_name.clone()),
            description: non_empty(record.description.clone())
                .or_else(|| non_empty(record.short_description.clone())),
            artwork_url: pick_artwork(&[
                record.artwork_url_600.as_deref(),
                record.artwork_url_160.as_deref(),
                record.artwork_url_100.as_deref(),
                record.artwork_url_60.as_deref(),
                record.artwork_url_30.as_deref(),
            ]),
            track_view_url: non_empty(record.track_view_url.clone()),
            primary_genre_name: non_empty(record.primary_genre_name.clone()),
            release_date: non_empty(record.release_date.clone()),
            track_time_millis: record.track_time_millis,
            episode_url: non_empty(record.episode_url.clone())
                .or_else(|| non_empty(record.preview_url.clone())),
        }
    }
}

/// Highest available resolution wins; the placeholder closes the chain.
fn pick_artwork(urls: &[Option<&str>]) -> String {
    urls.iter()
        .find_map(|url| url.filter(|u| !u.is_empty()).map(str::to_string))
        .unwrap_or_else(|| artwork::PLACEHOLDER.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
