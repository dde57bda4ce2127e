use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SearchQueries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchQueries::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SearchQueries::Term).string().not_null())
                    .col(ColumnDef::new(SearchQueries::Media).string().not_null())
                    .col(
                        ColumnDef::new(SearchQueries::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Freshness lookups filter on (term, media) and take the newest row.
        manager
            .create_index(
                Index::create()
                    .name("idx_search_queries_term_media")
                    .table(SearchQueries::Table)
                    .col(SearchQueries::Term)
                    .col(SearchQueries::Media)
                    .col(SearchQueries::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PodcastResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PodcastResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PodcastResults::TrackId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PodcastResults::TrackName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PodcastResults::ArtistName).string())
                    .col(ColumnDef::new(PodcastResults::CollectionName).string())
                    .col(ColumnDef::new(PodcastResults::Description).text())
                    .col(ColumnDef::new(PodcastResults::ArtworkUrl30).string())
                    .col(ColumnDef::new(PodcastResults::ArtworkUrl60).string())
                    .col(ColumnDef::new(PodcastResults::ArtworkUrl100).string())
                    .col(ColumnDef::new(PodcastResults::ArtworkUrl600).string())
                    .col(ColumnDef::new(PodcastResults::FeedUrl).string())
                    .col(ColumnDef::new(PodcastResults::TrackViewUrl).string())
                    .col(ColumnDef::new(PodcastResults::Country).string())
                    .col(ColumnDef::new(PodcastResults::PrimaryGenreName).string())
                    .col(ColumnDef::new(PodcastResults::ReleaseDate).string())
                    .col(ColumnDef::new(PodcastResults::TrackCount).integer())
                    .col(ColumnDef::new(PodcastResults::ContentAdvisoryRating).string())
                    .col(
                        ColumnDef::new(PodcastResults::CreatedAt)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PodcastResults::UpdatedAt)
                            .string()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The dedup authority: concurrent inserts for one track id race on this
        // index, and ON CONFLICT DO NOTHING keeps exactly one row.
        manager
            .create_index(
                Index::create()
                    .name("idx_podcast_results_track_id")
                    .table(PodcastResults::Table)
                    .col(PodcastResults::TrackId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SearchQueryResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SearchQueryResults::SearchQueryId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SearchQueryResults::PodcastResultId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_search_query_results")
                            .col(SearchQueryResults::SearchQueryId)
                            .col(SearchQueryResults::PodcastResultId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_query_results_query_id")
                            .from(
                                SearchQueryResults::Table,
                                SearchQueryResults::SearchQueryId,
                            )
                            .to(SearchQueries::Table, SearchQueries::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_search_query_results_result_id")
                            .from(
                                SearchQueryResults::Table,
                                SearchQueryResults::PodcastResultId,
                            )
                            .to(PodcastResults::Table, PodcastResults::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SearchQueryResults::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(PodcastResults::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(SearchQueries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SearchQueries {
    Table,
    Id,
    Term,
    Media,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PodcastResults {
    Table,
    Id,
    TrackId,
    TrackName,
    ArtistName,
    CollectionName,
    Description,
    // DeriveIden's snake_case drops the underscore before digits
    // (`artwork_url30`), but the entity columns are `artwork_url_30` etc.
    #[sea_orm(iden = "artwork_url_30")]
    ArtworkUrl30,
    #[sea_orm(iden = "artwork_url_60")]
    ArtworkUrl60,
    #[sea_orm(iden = "artwork_url_100")]
    ArtworkUrl100,
    #[sea_orm(iden = "artwork_url_600")]
    ArtworkUrl600,
    FeedUrl,
    TrackViewUrl,
    Country,
    PrimaryGenreName,
    ReleaseDate,
    TrackCount,
    ContentAdvisoryRating,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SearchQueryResults {
    Table,
    SearchQueryId,
    PodcastResultId,
}
