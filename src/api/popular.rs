use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::models::PodcastCard;

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<String>,
}

/// `GET /api/popular?limit=...`
///
/// Curated listing from rotating Arabic terms; never touches the cache.
pub async fn popular(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PopularParams>,
) -> Result<Json<ApiResponse<Vec<PodcastCard>>>, ApiError> {
    let limit = validation::parse_limit(params.limit.as_deref())?;

    let cards = state.popular_service().list_popular(limit).await;
    let message = format!("Found {} popular Arabic podcasts", cards.len());

    Ok(Json(ApiResponse::success_with_message(cards, message)))
}
