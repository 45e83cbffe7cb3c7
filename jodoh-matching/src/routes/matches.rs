use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use jodoh_shared::errors::AppResult;
use jodoh_shared::types::pagination::{Paginated, PaginationParams};
use jodoh_shared::types::ApiResponse;

use crate::models::UserId;
use crate::AppState;

/// What a user sees about someone they matched with.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub age: u8,
    pub username: Option<String>,
    pub photo_id: String,
    pub matched_at: DateTime<Utc>,
}

/// GET /profiles/:id/matches - most recent match first
pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<MatchedProfile>>>> {
    let matched = state
        .engine
        .matched_profiles(id)
        .await?
        .into_iter()
        .map(|(record, profile)| MatchedProfile {
            user_id: profile.user_id,
            display_name: profile.display_name,
            age: profile.age,
            username: profile.username,
            photo_id: profile.photo_id,
            matched_at: record.matched_at,
        })
        .collect();

    Ok(Json(ApiResponse::ok(Paginated::from_vec(matched, &params))))
}

#[derive(Debug, Serialize)]
pub struct MatchCheck {
    pub matched: bool,
}

/// GET /matches/:a/:b
pub async fn check_match(
    State(state): State<Arc<AppState>>,
    Path((a, b)): Path<(UserId, UserId)>,
) -> Json<ApiResponse<MatchCheck>> {
    let matched = state.engine.check_match(a, b).await;
    Json(ApiResponse::ok(MatchCheck { matched }))
}
