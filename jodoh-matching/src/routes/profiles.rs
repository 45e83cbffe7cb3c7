use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use jodoh_shared::errors::{AppError, AppResult, ErrorCode};
use jodoh_shared::types::pagination::{Paginated, PaginationParams};
use jodoh_shared::types::ApiResponse;
use jodoh_shared::AppJson;

use crate::models::{AgeRange, Decision, Gender, NewProfile, UserId, UserProfile, UserStats};
use crate::AppState;

// --- POST /profiles ---

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: UserId,
    pub display_name: String,
    pub username: Option<String>,
    pub age: u8,
    pub gender: Gender,
    #[serde(default)]
    pub bio: String,
    pub photo_id: String,
    pub pref_gender: Gender,
    pub pref_age_min: u8,
    /// Defaults to `pref_age_min + 15`, capped at 60.
    pub pref_age_max: Option<u8>,
}

impl From<RegisterRequest> for NewProfile {
    fn from(req: RegisterRequest) -> Self {
        let pref_age_max = req
            .pref_age_max
            .unwrap_or_else(|| AgeRange::spanning_from(req.pref_age_min).max);
        NewProfile {
            user_id: req.user_id,
            display_name: req.display_name,
            username: req.username,
            age: req.age,
            gender: req.gender,
            bio: req.bio,
            photo_id: req.photo_id,
            pref_gender: req.pref_gender,
            pref_age_min: req.pref_age_min,
            pref_age_max,
        }
    }
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<UserProfile>>)> {
    let profile = state.engine.register(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

// --- GET /profiles/:id ---

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> AppResult<Json<ApiResponse<UserProfile>>> {
    let profile = state
        .engine
        .get(id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;

    Ok(Json(ApiResponse::ok(profile)))
}

// --- GET /profiles/:id/exists ---

#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub registered: bool,
}

pub async fn exists(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> Json<ApiResponse<ExistsResponse>> {
    let registered = state.engine.exists(id).await;
    Json(ApiResponse::ok(ExistsResponse { registered }))
}

// --- GET /profiles/:id/overview ---

#[derive(Debug, Serialize)]
pub struct ProfileOverview {
    pub profile: UserProfile,
    pub stats: UserStats,
}

pub async fn overview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> AppResult<Json<ApiResponse<ProfileOverview>>> {
    let profile = state
        .engine
        .get(id)
        .await
        .ok_or_else(|| AppError::new(ErrorCode::ProfileNotFound, "profile not found"))?;
    let stats = state.engine.stats(id).await?;

    Ok(Json(ApiResponse::ok(ProfileOverview { profile, stats })))
}

// --- GET /profiles/:id/next-candidate ---

pub async fn next_candidate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> AppResult<Json<ApiResponse<Option<UserProfile>>>> {
    let candidate = state.engine.next_candidate(id).await?;

    let response = match candidate {
        Some(profile) => ApiResponse::ok(Some(profile)),
        None => ApiResponse::ok_with_message(None, "no new profiles right now"),
    };
    Ok(Json(response))
}

// --- GET /profiles/:id/decisions ---

pub async fn list_decisions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Decision>>>> {
    if !state.engine.exists(id).await {
        return Err(AppError::new(ErrorCode::ProfileNotFound, "profile not found"));
    }
    let decisions = state.engine.decisions_by(id).await;

    Ok(Json(ApiResponse::ok(Paginated::from_vec(decisions, &params))))
}

// --- GET /profiles/:id/stats ---

pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<UserId>,
) -> AppResult<Json<ApiResponse<UserStats>>> {
    let stats = state.engine.stats(id).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
