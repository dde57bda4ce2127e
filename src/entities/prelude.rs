pub use super::podcast_results::Entity as PodcastResults;
pub use super::search_queries::Entity as SearchQueries;
pub use super::search_query_results::Entity as SearchQueryResults;
