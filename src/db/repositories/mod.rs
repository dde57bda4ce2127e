pub mod podcasts;
pub mod queries;
