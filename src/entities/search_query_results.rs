use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "search_query_results")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub search_query_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub podcast_result_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::search_queries::Entity",
        from = "Column::SearchQueryId",
        to = "super::search_queries::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    SearchQuery,
    #[sea_orm(
        belongs_to = "super::podcast_results::Entity",
        from = "Column::PodcastResultId",
        to = "super::podcast_results::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PodcastResult,
}

impl Related<super::search_queries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SearchQuery.def()
    }
}

impl Related<super::podcast_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PodcastResult.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
