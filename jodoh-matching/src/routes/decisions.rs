use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use jodoh_shared::errors::AppResult;
use jodoh_shared::types::ApiResponse;
use jodoh_shared::AppJson;

use crate::models::{Action, Decision, UserId};
use crate::routes::matches::MatchedProfile;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordDecisionRequest {
    pub actor_id: UserId,
    pub target_id: UserId,
    pub action: Action,
}

#[derive(Debug, Serialize)]
pub struct RecordDecisionResponse {
    pub decision: Decision,
    pub is_new: bool,
    pub is_match: bool,
    /// Present when this decision completed a match, so the front end can
    /// introduce the two users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner: Option<MatchedProfile>,
}

/// POST /decisions - record a like or pass
pub async fn record_decision(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RecordDecisionRequest>,
) -> AppResult<Json<ApiResponse<RecordDecisionResponse>>> {
    let outcome = state
        .engine
        .record_decision(req.actor_id, req.target_id, req.action)
        .await?;

    let partner = if outcome.is_match {
        state.engine.get(req.target_id).await.map(|profile| MatchedProfile {
            user_id: profile.user_id,
            display_name: profile.display_name,
            age: profile.age,
            username: profile.username,
            photo_id: profile.photo_id,
            matched_at: outcome.decision.decided_at,
        })
    } else {
        None
    };

    let response = RecordDecisionResponse {
        decision: outcome.decision,
        is_new: outcome.is_new,
        is_match: outcome.is_match,
        partner,
    };

    Ok(Json(if response.is_match {
        ApiResponse::ok_with_message(response, "it's a match")
    } else {
        ApiResponse::ok(response)
    }))
}

#[derive(Debug, Serialize)]
pub struct DecisionLookup {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

/// GET /decisions/:actor/:target - has `actor` already decided on `target`?
pub async fn check_decision(
    State(state): State<Arc<AppState>>,
    Path((actor, target)): Path<(UserId, UserId)>,
) -> Json<ApiResponse<DecisionLookup>> {
    let decision = state.engine.decision(actor, target).await;
    Json(ApiResponse::ok(DecisionLookup {
        exists: decision.is_some(),
        action: decision.map(|d| d.action),
    }))
}
