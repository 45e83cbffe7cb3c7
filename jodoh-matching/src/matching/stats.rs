use crate::models::{Action, UserId, UserStats};

use super::decisions::DecisionLog;
use super::detector;

/// Recomputed from the log on every call.
pub fn compute(log: &DecisionLog, user: UserId) -> UserStats {
    let likes_given = log.by_actor(user).filter(|d| d.action == Action::Like).count();
    let likes_received = log.toward(user).filter(|d| d.action == Action::Like).count();
    let matches = detector::matches_of(log, user).len();

    UserStats {
        likes_given: likes_given as u64,
        likes_received: likes_received as u64,
        matches: matches as u64,
    }
}
