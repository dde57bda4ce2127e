pub mod card;

pub use card::{EpisodeCard, PodcastCard};
