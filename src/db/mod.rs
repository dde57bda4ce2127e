use crate::clients::itunes::CatalogRecord;
use crate::entities::{podcast_results, search_queries};
use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// The persistence operations the search orchestrator depends on, kept behind
/// a trait so tests can substitute in-memory fakes.
#[async_trait::async_trait]
pub trait ResultCacheStore: Send + Sync {
    /// Most recent query row for (term, media) created inside `max_age`.
    async fn find_fresh_query(
        &self,
        term: &str,
        media: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<search_queries::Model>>;

    /// Inserts and returns a new query row.
    async fn record_query(&self, term: &str, media: &str) -> Result<search_queries::Model>;

    /// Results linked to a query, up to `limit`.
    async fn list_linked_results(
        &self,
        query_id: i32,
        limit: u64,
    ) -> Result<Vec<podcast_results::Model>>;

    /// Subset of `track_ids` that already have stored rows.
    async fn existing_track_ids(&self, track_ids: &[i64]) -> Result<HashSet<i64>>;

    async fn find_result_by_track_id(
        &self,
        track_id: i64,
    ) -> Result<Option<podcast_results::Model>>;

    /// Race-safe insert keyed on the track id unique index; returns the
    /// winning row whether or not this call inserted it.
    async fn insert_result_if_absent(
        &self,
        record: &CatalogRecord,
    ) -> Result<podcast_results::Model>;

    /// Existing-or-insert resolution for one record. Field values of an
    /// already-stored row win over the fresh sighting.
    async fn upsert_result(&self, record: &CatalogRecord) -> Result<podcast_results::Model>;

    async fn link_query_to_result(&self, query_id: i32, result_id: i32) -> Result<()>;
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if path_str != ":memory:" {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn query_repo(&self) -> repositories::queries::SearchQueryRepository {
        repositories::queries::SearchQueryRepository::new(self.conn.clone())
    }

    fn podcast_repo(&self) -> repositories::podcasts::PodcastResultRepository {
        repositories::podcasts::PodcastResultRepository::new(self.conn.clone())
    }

    pub async fn find_fresh_query(
        &self,
        term: &str,
        media: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<search_queries::Model>> {
        self.query_repo().find_fresh(term, media, max_age).await
    }

    pub async fn record_query(&self, term: &str, media: &str) -> Result<search_queries::Model> {
        self.query_repo().create(term, media).await
    }

    pub async fn list_linked_results(
        &self,
        query_id: i32,
        limit: u64,
    ) -> Result<Vec<podcast_results::Model>> {
        self.query_repo().list_linked_results(query_id, limit).await
    }

    pub async fn link_query_to_result(&self, query_id: i32, result_id: i32) -> Result<()> {
        self.query_repo().link_result(query_id, result_id).await
    }

    pub async fn existing_track_ids(&self, track_ids: &[i64]) -> Result<HashSet<i64>> {
        self.podcast_repo().existing_track_ids(track_ids).await
    }

    pub async fn find_result_by_track_id(
        &self,
        track_id: i64,
    ) -> Result<Option<podcast_results::Model>> {
        self.podcast_repo().find_by_track_id(track_id).await
    }

    pub async fn insert_result_if_absent(
        &self,
        record: &CatalogRecord,
    ) -> Result<podcast_results::Model> {
        self.podcast_repo().insert_if_absent(record).await
    }

    /// Existing-or-insert resolution for one record. Field values of an
    /// already-stored row win over the fresh sighting.
    pub async fn upsert_result(&self, record: &CatalogRecord) -> Result<podcast_results::Model> {
        if let Some(existing) = self
            .find_result_by_track_id(record.track_id.value())
            .await?
        {
            return Ok(existing);
        }

        self.insert_result_if_absent(record).await
    }

    pub async fn count_queries(&self) -> Result<u64> {
        self.query_repo().count().await
    }

    pub async fn count_links(&self) -> Result<u64> {
        self.query_repo().count_links().await
    }

    pub async fn count_results(&self) -> Result<u64> {
        self.podcast_repo().count().await
    }
}

#[async_trait::async_trait]
impl ResultCacheStore for Store {
    async fn find_fresh_query(
        &self,
        term: &str,
        media: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<search_queries::Model>> {
        Self::find_fresh_query(self, term, media, max_age).await
    }

    async fn record_query(&self, term: &str, media: &str) -> Result<search_queries::Model> {
        Self::record_query(self, term, media).await
    }

    async fn list_linked_results(
        &self,
        query_id: i32,
        limit: u64,
    ) -> Result<Vec<podcast_results::Model>> {
        Self::list_linked_results(self, query_id, limit).await
    }

    async fn existing_track_ids(&self, track_ids: &[i64]) -> Result<HashSet<i64>> {
        Self::existing_track_ids(self, track_ids).await
    }

    async fn find_result_by_track_id(
        &self,
        track_id: i64,
    ) -> Result<Option<podcast_results::Model>> {
        Self::find_result_by_track_id(self, track_id).await
    }

    async fn insert_result_if_absent(
        &self,
        record: &CatalogRecord,
    ) -> Result<podcast_results::Model> {
        Self::insert_result_if_absent(self, record).await
    }

    async fn upsert_result(&self, record: &CatalogRecord) -> Result<podcast_results::Model> {
        Self::upsert_result(self, record).await
    }

    async fn link_query_to_result(&self, query_id: i32, result_id: i32) -> Result<()> {
        Self::link_query_to_result(self, query_id, result_id).await
    }
}
