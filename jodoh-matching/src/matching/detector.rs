//! Mutual-like detection. A match is never stored: it exists exactly when
//! both directed likes are in the log.

use crate::models::{Action, Decision, MatchRecord, UserId};

use super::decisions::DecisionLog;

pub fn liked(log: &DecisionLog, actor: UserId, target: UserId) -> bool {
    log.action(actor, target) == Some(Action::Like)
}

/// True iff `a` liked `b` and `b` liked `a`. Symmetric; never true for `a == b`.
pub fn is_match(log: &DecisionLog, a: UserId, b: UserId) -> bool {
    a != b && liked(log, a, b) && liked(log, b, a)
}

/// Whether `decision` was the like that completed a match, i.e. the reverse
/// like was already in the log when it was appended.
pub fn completed_match(log: &DecisionLog, decision: &Decision) -> bool {
    decision.action == Action::Like
        && log
            .get(decision.target_id, decision.actor_id)
            .is_some_and(|reverse| reverse.action == Action::Like && reverse.seq < decision.seq)
}

/// Everyone `user` has matched with, most recently formed first.
pub fn matches_of(log: &DecisionLog, user: UserId) -> Vec<MatchRecord> {
    let mut records: Vec<MatchRecord> = log
        .by_actor(user)
        .filter(|out| out.action == Action::Like)
        .filter_map(|out| {
            let back = log.get(out.target_id, user)?;
            if back.action != Action::Like {
                return None;
            }
            let later = if back.seq > out.seq { back } else { out };
            Some(MatchRecord {
                partner_id: out.target_id,
                formed_seq: later.seq,
                matched_at: later.decided_at,
            })
        })
        .collect();

    records.sort_by(|a, b| b.formed_seq.cmp(&a.formed_seq));
    records
}
