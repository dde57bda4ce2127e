//! Domain types for podcast discovery with strong typing.
//!
//! This module provides type-safe wrappers and domain primitives for the
//! search and caching subsystem. It follows the Newtype pattern to prevent
//! ID mixing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The upstream catalog's stable identifier for a podcast or episode.
///
/// This newtype wrapper prevents mixing upstream track ids with the store's
/// own row ids, which are plain `i32` values with an unrelated number space.
///
/// # Examples
///
/// ```rust
/// use podarr::domain::TrackId;
///
/// let id = TrackId::new(1436_991_370);
/// assert_eq!(id.value(), 1436991370);
/// assert_eq!(id.to_string(), "1436991370");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TrackId(i64);

impl TrackId {
    /// Creates a new `TrackId` from a raw i64 value.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `id` is negative. Production code should
    /// validate before construction.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        debug_assert!(id >= 0, "TrackId should be non-negative");
        Self(id)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TrackId> for i64 {
    fn from(id: TrackId) -> Self {
        id.0
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl Serialize for TrackId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for TrackId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Category of content a search targets, using the upstream wire spellings.
///
/// `PodcastEpisode` is special-cased throughout: episode results are returned
/// directly and never persisted, while the show-level kinds flow through the
/// result cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MediaKind {
    #[default]
    Podcast,
    Music,
    Movie,
    Audiobook,
    PodcastEpisode,
}

impl MediaKind {
    /// Every recognized kind, in a stable order used for error messages.
    pub const ALL: [Self; 5] = [
        Self::Podcast,
        Self::Music,
        Self::Movie,
        Self::Audiobook,
        Self::PodcastEpisode,
    ];

    /// The upstream query-parameter spelling for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Podcast => "podcast",
            Self::Music => "music",
            Self::Movie => "movie",
            Self::Audiobook => "audiobook",
            Self::PodcastEpisode => "podcastEpisode",
        }
    }

    /// Parses a wire spelling back into a kind. Case-sensitive, matching the
    /// upstream API's own parameter handling.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Returns true for episode searches, which bypass the result cache.
    #[must_use]
    pub const fn is_episode(self) -> bool {
        matches!(self, Self::PodcastEpisode)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MediaKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown media kind: {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_id_conversions() {
        let id = TrackId::new(1_436_991_370);
        assert_eq!(id.value(), 1_436_991_370);
        assert_eq!(id.to_string(), "1436991370");
        assert_eq!(i64::from(id), 1_436_991_370);
        assert_eq!(TrackId::from(1_436_991_370), id);
    }

    #[test]
    fn track_id_equality() {
        let id1 = TrackId::new(1);
        let id2 = TrackId::new(1);
        let id3 = TrackId::new(2);
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn media_kind_round_trips_wire_names() {
        for kind in MediaKind::ALL {
            assert_eq!(MediaKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(MediaKind::parse("podcastepisode"), None);
        assert_eq!(MediaKind::parse("tvShow"), None);
    }

    #[test]
    fn media_kind_episode_detection() {
        assert!(MediaKind::PodcastEpisode.is_episode());
        assert!(!MediaKind::Podcast.is_episode());
        assert!(!MediaKind::Audiobook.is_episode());
    }

    #[test]
    fn track_id_serialization() {
        let id = TrackId::new(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let deserialized: TrackId = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, id);
    }

    #[test]
    fn media_kind_serialization() {
        let json = serde_json::to_string(&MediaKind::PodcastEpisode).unwrap();
        assert_eq!(json, "\"podcastEpisode\"");
        let deserialized: MediaKind = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, MediaKind::PodcastEpisode);
        assert!(serde_json::from_str::<MediaKind>("\"vodcast\"").is_err());
    }
}
