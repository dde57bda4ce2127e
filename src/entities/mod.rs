pub mod prelude;

pub mod podcast_results;
pub mod search_queries;
pub mod search_query_results;
