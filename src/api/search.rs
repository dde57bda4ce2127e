use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::services::{ResultOrigin, SearchOutcome};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub term: Option<String>,
    pub media: Option<String>,
    // Kept as a raw string so a malformed value gets the structured
    // validation reply instead of an extractor rejection.
    pub limit: Option<String>,
}

/// `GET /api/search?term=...&media=...&limit=...`
///
/// Validates the request, then runs it through the search orchestrator.
/// Podcast and episode searches reply with different card shapes, so the
/// body is built per outcome.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let term = validation::validate_term(params.term.as_deref().unwrap_or_default())?;
    let media = validation::parse_media(params.media.as_deref())?;
    let limit = validation::parse_limit(params.limit.as_deref())?;

    let outcome = state.search_service().search(term, media, limit).await?;

    let response = match outcome {
        SearchOutcome::Podcasts { cards, origin } => {
            let message = match origin {
                ResultOrigin::Cache => "Results from cache".to_string(),
                ResultOrigin::Live if cards.is_empty() => "No results found".to_string(),
                ResultOrigin::Live => format!("Found {} results", cards.len()),
            };
            Json(ApiResponse::success_with_message(cards, message)).into_response()
        }
        SearchOutcome::Episodes { cards } => {
            let message = if cards.is_empty() {
                "No episodes found".to_string()
            } else {
                format!("Found {} episodes", cards.len())
            };
            Json(ApiResponse::success_with_message(cards, message)).into_response()
        }
    };

    Ok(response)
}
