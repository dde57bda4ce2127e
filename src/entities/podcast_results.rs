use sea_orm::entity::prelude::*;

/// One row per upstream track id; the `track_id` unique index is the dedup
/// authority. Rows are insert-only and never field-updated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "podcast_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub track_id: i64,
    pub track_name: String,
    pub artist_name: Option<String>,
    pub collection_name: Option<String>,
    pub description: Option<String>,
    pub artwork_url_30: Option<String>,
    pub artwork_url_60: Option<String>,
    pub artwork_url_100: Option<String>,
    pub artwork_url_600: Option<String>,
    pub feed_url: Option<String>,
    pub track_view_url: Option<String>,
    pub country: Option<String>,
    pub primary_genre_name: Option<String>,
    pub release_date: Option<String>,
    pub track_count: Option<i32>,
    pub content_advisory_rating: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::search_queries::Entity> for Entity {
    fn to() -> RelationDef {
        super::search_query_results::Relation::SearchQuery.def()
    }
    fn via() -> Option<RelationDef> {
        Some(
            super::search_query_results::Relation::PodcastResult
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
