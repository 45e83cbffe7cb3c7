pub mod candidates;
pub mod decisions;
pub mod detector;
pub mod engine;
pub mod profiles;
pub mod stats;

pub use candidates::SelectionOptions;
pub use decisions::DecisionLog;
pub use engine::MatchEngine;
pub use profiles::ProfileRegistry;

use jodoh_shared::errors::{AppError, ErrorCode};

use crate::models::UserId;

#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error("user {0} already has a profile")]
    AlreadyRegistered(UserId),

    #[error("user {0} has no profile")]
    UnknownUser(UserId),

    #[error("invalid decision: {0}")]
    InvalidDecision(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<MatchingError> for AppError {
    fn from(err: MatchingError) -> Self {
        match err {
            MatchingError::AlreadyRegistered(_) => {
                AppError::new(ErrorCode::AlreadyRegistered, "you already have a profile")
            }
            MatchingError::UnknownUser(id) => AppError::with_details(
                ErrorCode::ProfileNotFound,
                "profile not found",
                serde_json::json!({ "user_id": id }),
            ),
            MatchingError::InvalidDecision(msg) => AppError::new(ErrorCode::InvalidDecision, msg),
            MatchingError::InvalidProfile(msg) => AppError::new(ErrorCode::InvalidProfile, msg),
            MatchingError::Storage(e) => AppError::Internal(e),
        }
    }
}
