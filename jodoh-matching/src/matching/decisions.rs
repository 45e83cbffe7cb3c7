use std::collections::HashMap;

use crate::models::{Action, Decision, UserId};

/// Append-only like/pass log with at most one entry per ordered pair.
#[derive(Debug, Default)]
pub struct DecisionLog {
    entries: Vec<Decision>,
    by_pair: HashMap<(UserId, UserId), usize>,
    outbound: HashMap<UserId, Vec<usize>>,
    inbound: HashMap<UserId, Vec<usize>>,
}

impl DecisionLog {
    /// Sequence number the next appended decision must carry.
    pub fn next_seq(&self) -> u64 {
        self.entries.last().map_or(1, |d| d.seq + 1)
    }

    /// Returns `false` without appending if the pair is already decided.
    pub fn append(&mut self, decision: Decision) -> bool {
        let pair = (decision.actor_id, decision.target_id);
        if self.by_pair.contains_key(&pair) {
            return false;
        }
        let idx = self.entries.len();
        self.by_pair.insert(pair, idx);
        self.outbound.entry(decision.actor_id).or_default().push(idx);
        self.inbound.entry(decision.target_id).or_default().push(idx);
        self.entries.push(decision);
        true
    }

    pub fn get(&self, actor: UserId, target: UserId) -> Option<&Decision> {
        self.by_pair.get(&(actor, target)).map(|&idx| &self.entries[idx])
    }

    pub fn action(&self, actor: UserId, target: UserId) -> Option<Action> {
        self.get(actor, target).map(|d| d.action)
    }

    pub fn contains(&self, actor: UserId, target: UserId) -> bool {
        self.by_pair.contains_key(&(actor, target))
    }

    /// Decisions made by `actor`, in log order.
    pub fn by_actor(&self, actor: UserId) -> impl Iterator<Item = &Decision> + '_ {
        self.outbound
            .get(&actor)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.entries[idx])
    }

    /// Decisions made about `target`, in log order.
    pub fn toward(&self, target: UserId) -> impl Iterator<Item = &Decision> + '_ {
        self.inbound
            .get(&target)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.entries[idx])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
