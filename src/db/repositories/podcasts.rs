use crate::clients::itunes::CatalogRecord;
use crate::entities::{podcast_results, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect, Set,
};
use std::collections::HashSet;

pub struct PodcastResultRepository {
    conn: DatabaseConnection,
}

impl PodcastResultRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Which of the given track ids already have a stored row. A round-trip
    /// saver for batch persistence; the unique index remains the authority.
    pub async fn existing_track_ids(&self, track_ids: &[i64]) -> Result<HashSet<i64>> {
        if track_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let rows: Vec<i64> = PodcastResults::find()
            .select_only()
            .column(podcast_results::Column::TrackId)
            .filter(podcast_results::Column::TrackId.is_in(track_ids.iter().copied()))
            .into_tuple()
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn find_by_track_id(&self, track_id: i64) -> Result<Option<podcast_results::Model>> {
        let row = PodcastResults::find()
            .filter(podcast_results::Column::TrackId.eq(track_id))
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    /// Insert-or-ignore keyed on the track id unique index, then re-select.
    /// Two concurrent calls for the same id both land on the single winning
    /// row; stored fields are never overwritten by later sightings.
    pub async fn insert_if_absent(&self, record: &CatalogRecord) -> Result<podcast_results::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = podcast_results::ActiveModel {
            track_id: Set(record.track_id.value()),
            track_name: Set(record.track_name.clone()),
            artist_name: Set(record.artist_name.clone()),
            collection_name: Set(record.collection_name.clone()),
            description: Set(record.description.clone()),
            artwork_url_30: Set(record.artwork_url_30.clone()),
            artwork_url_60: Set(record.artwork_url_60.clone()),
            artwork_url_100: Set(record.artwork_url_100.clone()),
            artwork_url_600: Set(record.artwork_url_600.clone()),
            feed_url: Set(record.feed_url.clone()),
            track_view_url: Set(record.track_view_url.clone()),
            country: Set(record.country.clone()),
            primary_genre_name: Set(record.primary_genre_name.clone()),
            release_date: Set(record.release_date.clone()),
            track_count: Set(record.track_count),
            content_advisory_rating: Set(record.content_advisory_rating.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        PodcastResults::insert(active_model)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(podcast_results::Column::TrackId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        self.find_by_track_id(record.track_id.value())
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve stored podcast result"))
    }

    pub async fn count(&self) -> Result<u64> {
        let count = PodcastResults::find().count(&self.conn).await?;
        Ok(count)
    }
}
