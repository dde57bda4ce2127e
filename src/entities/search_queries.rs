use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "search_queries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Normalized lookup term: trimmed and lower-cased before insert.
    pub term: String,
    pub media: String,
    pub created_at: String, // SQLite doesn't strictly enforce types, but typically strings for ISO8601
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::podcast_results::Entity> for Entity {
    fn to() -> RelationDef {
        super::search_query_results::Relation::PodcastResult.def()
    }
    fn via() -> Option<RelationDef> {
        Some(
            super::search_query_results::Relation::SearchQuery
                .def()
                .rev(),
        )
    }
}

impl ActiveModelBehavior for ActiveModel {}
