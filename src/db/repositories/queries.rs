use crate::entities::{prelude::*, podcast_results, search_queries, search_query_results};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::info;

pub struct SearchQueryRepository {
    conn: DatabaseConnection,
}

impl SearchQueryRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Most recent query row for the normalized term and media kind, provided
    /// it was created inside the freshness window. Repeated searches leave
    /// older rows behind; freshest wins.
    pub async fn find_fresh(
        &self,
        term: &str,
        media: &str,
        max_age: chrono::Duration,
    ) -> Result<Option<search_queries::Model>> {
        let cutoff = chrono::Utc::now()
            .checked_sub_signed(max_age)
            .map_or_else(|| "1970-01-01T00:00:00Z".to_string(), |t| t.to_rfc3339());

        let row = SearchQueries::find()
            .filter(search_queries::Column::Term.eq(term))
            .filter(search_queries::Column::Media.eq(media))
            .filter(search_queries::Column::CreatedAt.gt(&cutoff))
            .order_by_desc(search_queries::Column::CreatedAt)
            .one(&self.conn)
            .await?;

        Ok(row)
    }

    pub async fn create(&self, term: &str, media: &str) -> Result<search_queries::Model> {
        let active_model = search_queries::ActiveModel {
            term: Set(term.to_string()),
            media: Set(media.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let result = SearchQueries::insert(active_model).exec(&self.conn).await?;

        let model = SearchQueries::find_by_id(result.last_insert_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created search query"))?;

        info!("Recorded search query '{}' ({})", model.term, model.media);
        Ok(model)
    }

    /// Results associated with a query through the junction table, up to
    /// `limit`, in store-default order.
    pub async fn list_linked_results(
        &self,
        query_id: i32,
        limit: u64,
    ) -> Result<Vec<podcast_results::Model>> {
        let Some(query) = SearchQueries::find_by_id(query_id).one(&self.conn).await? else {
            return Ok(Vec::new());
        };

        let rows = query
            .find_related(PodcastResults)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok(rows)
    }

    /// Inserts one junction row. Errors surface to the caller, which decides
    /// whether a failed link drops the record or the request.
    pub async fn link_result(&self, query_id: i32, result_id: i32) -> Result<()> {
        let active_model = search_query_results::ActiveModel {
            search_query_id: Set(query_id),
            podcast_result_id: Set(result_id),
        };

        SearchQueryResults::insert(active_model)
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        let count = SearchQueries::find().count(&self.conn).await?;
        Ok(count)
    }

    pub async fn count_links(&self) -> Result<u64> {
        let count = SearchQueryResults::find().count(&self.conn).await?;
        Ok(count)
    }
}
