use super::ApiError;
use crate::constants::limits;
use crate::domain::MediaKind;

/// Term must be non-empty after trimming and at most 100 characters before
/// trimming. Returns the term untrimmed; normalization for cache keys
/// happens downstream.
pub fn validate_term(term: &str) -> Result<&str, ApiError> {
    if term.trim().is_empty() {
        return Err(ApiError::validation("Search term is required"));
    }

    if term.chars().count() > limits::MAX_TERM_LENGTH {
        return Err(ApiError::validation(
            "Search term must be less than 100 characters",
        ));
    }

    Ok(term)
}

/// Missing or empty media falls back to podcast; anything else must be one
/// of the recognized media kinds.
pub fn parse_media(raw: Option<&str>) -> Result<MediaKind, ApiError> {
    let Some(raw) = raw.filter(|m| !m.is_empty()) else {
        return Ok(MediaKind::default());
    };

    MediaKind::parse(raw).ok_or_else(|| {
        let allowed = MediaKind::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        ApiError::validation(format!("Media must be one of: {allowed}"))
    })
}

/// Missing or empty limit falls back to the default; anything else must
/// parse as an integer inside [1, 200]. A non-numeric limit gets the same
/// message as an out-of-range one.
pub fn parse_limit(raw: Option<&str>) -> Result<u32, ApiError> {
    let Some(raw) = raw.filter(|l| !l.is_empty()) else {
        return Ok(limits::DEFAULT_RESULT_LIMIT);
    };

    let limit: u32 = raw
        .parse()
        .map_err(|_| ApiError::validation("Limit must be between 1 and 200"))?;

    if !(limits::MIN_RESULT_LIMIT..=limits::MAX_RESULT_LIMIT).contains(&limit) {
        return Err(ApiError::validation("Limit must be between 1 and 200"));
    }

    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: ApiError) -> String {
        match err {
            ApiError::ValidationError(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn term_rules() {
        assert!(validate_term("فنجان").is_ok());
        assert!(validate_term("  tech news  ").is_ok());

        assert_eq!(
            message(validate_term("").unwrap_err()),
            "Search term is required"
        );
        assert_eq!(
            message(validate_term("   ").unwrap_err()),
            "Search term is required"
        );

        let exactly_100 = "a".repeat(100);
        assert!(validate_term(&exactly_100).is_ok());

        let over = "a".repeat(101);
        assert_eq!(
            message(validate_term(&over).unwrap_err()),
            "Search term must be less than 100 characters"
        );
    }

    #[test]
    fn term_length_counts_characters_not_bytes() {
        // 100 Arabic characters are well over 100 bytes in UTF-8.
        let arabic = "ق".repeat(100);
        assert!(validate_term(&arabic).is_ok());
    }

    #[test]
    fn media_defaults_to_podcast() {
        assert_eq!(parse_media(None).unwrap(), MediaKind::Podcast);
        assert_eq!(parse_media(Some("")).unwrap(), MediaKind::Podcast);
        assert_eq!(
            parse_media(Some("podcastEpisode")).unwrap(),
            MediaKind::PodcastEpisode
        );
        assert!(parse_media(Some("tvShow")).is_err());
    }

    #[test]
    fn limit_rules() {
        assert_eq!(parse_limit(None).unwrap(), 20);
        assert_eq!(parse_limit(Some("")).unwrap(), 20);
        assert_eq!(parse_limit(Some("1")).unwrap(), 1);
        assert_eq!(parse_limit(Some("200")).unwrap(), 200);

        for bad in ["0", "201", "-5", "abc"] {
            assert_eq!(
                message(parse_limit(Some(bad)).unwrap_err()),
                "Limit must be between 1 and 200"
            );
        }
    }
}
