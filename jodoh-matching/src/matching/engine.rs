use std::sync::Arc;

use chrono::Utc;
use metrics::counter;
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    Action, Decision, DecisionOutcome, MatchRecord, NewProfile, UserId, UserProfile, UserStats,
};
use crate::store::Store;

use super::candidates::{self, SelectionOptions};
use super::decisions::DecisionLog;
use super::detector;
use super::profiles::ProfileRegistry;
use super::stats;
use super::MatchingError;

#[derive(Debug, Default)]
struct Ledger {
    profiles: ProfileRegistry,
    decisions: DecisionLog,
}

/// The matching engine: profile store, decision log, match detection,
/// candidate selection and stats over one shared ledger.
///
/// Reads share the lock. `register` and `record_decision` hold the write lock
/// across check, persist and append, so two reciprocal likes racing each other
/// are serialized and exactly one of them observes the other.
pub struct MatchEngine {
    ledger: RwLock<Ledger>,
    store: Arc<dyn Store>,
    options: SelectionOptions,
}

impl MatchEngine {
    /// Rebuilds the in-memory ledger from `store`.
    pub fn open(store: Arc<dyn Store>, options: SelectionOptions) -> anyhow::Result<Self> {
        let snapshot = store.load()?;
        let mut ledger = Ledger::default();

        for profile in snapshot.profiles {
            let id = profile.user_id;
            if !ledger.profiles.insert(profile) {
                anyhow::bail!("duplicate profile {id} in store");
            }
        }
        for decision in snapshot.decisions {
            if decision.seq != ledger.decisions.next_seq() {
                anyhow::bail!(
                    "decision log gap: expected seq {}, found {}",
                    ledger.decisions.next_seq(),
                    decision.seq
                );
            }
            let (actor, target) = (decision.actor_id, decision.target_id);
            if !ledger.decisions.append(decision) {
                anyhow::bail!("duplicate decision {actor} -> {target} in store");
            }
        }

        tracing::info!(
            store = store.kind(),
            profiles = ledger.profiles.len(),
            decisions = ledger.decisions.len(),
            mutual_preference = options.mutual_preference,
            "match engine ready"
        );

        Ok(Self {
            ledger: RwLock::new(ledger),
            store,
            options,
        })
    }

    pub fn store_kind(&self) -> &'static str {
        self.store.kind()
    }

    pub async fn ping_store(&self) -> anyhow::Result<()> {
        self.persist(|store| store.ping()).await
    }

    /// Runs a blocking store call off the async workers. Callers that hold the
    /// write guard keep it across the await, so writes stay serialized.
    async fn persist<F>(&self, op: F) -> anyhow::Result<()>
    where
        F: FnOnce(&dyn Store) -> anyhow::Result<()> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref())).await?
    }

    // --- Profile store ---

    pub async fn register(&self, new: NewProfile) -> Result<UserProfile, MatchingError> {
        new.validate()
            .map_err(|e| MatchingError::InvalidProfile(e.to_string()))?;

        let mut ledger = self.ledger.write().await;
        if ledger.profiles.contains(new.user_id) {
            return Err(MatchingError::AlreadyRegistered(new.user_id));
        }

        let seq = ledger.profiles.len() as u64 + 1;
        let profile = new.into_profile(Utc::now());
        let row = profile.clone();
        self.persist(move |store| store.insert_profile(seq, &row)).await?;
        ledger.profiles.insert(profile.clone());

        counter!("jodoh_registrations_total").increment(1);
        tracing::info!(
            user_id = %profile.user_id,
            age = profile.age,
            gender = profile.gender.as_str(),
            "profile registered"
        );

        Ok(profile)
    }

    pub async fn get(&self, id: UserId) -> Option<UserProfile> {
        self.ledger.read().await.profiles.get(id).cloned()
    }

    pub async fn exists(&self, id: UserId) -> bool {
        self.ledger.read().await.profiles.contains(id)
    }

    // --- Decision log ---

    /// Records a like or pass. Deciding an already-decided pair again is a
    /// no-op: the first decision is kept and its original outcome is returned
    /// with `is_new == false`.
    pub async fn record_decision(
        &self,
        actor: UserId,
        target: UserId,
        action: Action,
    ) -> Result<DecisionOutcome, MatchingError> {
        if actor == target {
            return Err(MatchingError::InvalidDecision(
                "cannot decide on your own profile".into(),
            ));
        }

        let mut ledger = self.ledger.write().await;
        for id in [actor, target] {
            if !ledger.profiles.contains(id) {
                return Err(MatchingError::UnknownUser(id));
            }
        }

        if let Some(existing) = ledger.decisions.get(actor, target) {
            tracing::debug!(
                actor = %actor,
                target = %target,
                kept = existing.action.as_str(),
                requested = action.as_str(),
                "pair already decided, keeping first decision"
            );
            return Ok(DecisionOutcome {
                is_match: detector::completed_match(&ledger.decisions, existing),
                decision: existing.clone(),
                is_new: false,
            });
        }

        let decision = Decision {
            id: Uuid::now_v7(),
            seq: ledger.decisions.next_seq(),
            actor_id: actor,
            target_id: target,
            action,
            decided_at: Utc::now(),
        };
        let is_match = action == Action::Like && detector::liked(&ledger.decisions, target, actor);

        let row = decision.clone();
        self.persist(move |store| store.insert_decision(&row)).await?;
        ledger.decisions.append(decision.clone());

        counter!("jodoh_decisions_total", "action" => action.as_str()).increment(1);
        if is_match {
            counter!("jodoh_matches_total").increment(1);
            tracing::info!(actor = %actor, target = %target, "mutual match");
        } else {
            tracing::debug!(actor = %actor, target = %target, action = action.as_str(), "decision recorded");
        }

        Ok(DecisionOutcome {
            decision,
            is_new: true,
            is_match,
        })
    }

    pub async fn decision(&self, actor: UserId, target: UserId) -> Option<Decision> {
        self.ledger.read().await.decisions.get(actor, target).cloned()
    }

    pub async fn decision_exists(&self, actor: UserId, target: UserId) -> bool {
        self.ledger.read().await.decisions.contains(actor, target)
    }

    /// Decisions made by `actor`, in the order they were recorded.
    pub async fn decisions_by(&self, actor: UserId) -> Vec<Decision> {
        self.ledger.read().await.decisions.by_actor(actor).cloned().collect()
    }

    // --- Match detector ---

    pub async fn check_match(&self, a: UserId, b: UserId) -> bool {
        detector::is_match(&self.ledger.read().await.decisions, a, b)
    }

    /// Ids of everyone `user` matched with, most recent match first.
    pub async fn matches(&self, user: UserId) -> Result<Vec<UserId>, MatchingError> {
        Ok(self
            .match_records(user)
            .await?
            .into_iter()
            .map(|m| m.partner_id)
            .collect())
    }

    /// Matches paired with the partner's profile, most recent first.
    pub async fn matched_profiles(
        &self,
        user: UserId,
    ) -> Result<Vec<(MatchRecord, UserProfile)>, MatchingError> {
        let ledger = self.ledger.read().await;
        if !ledger.profiles.contains(user) {
            return Err(MatchingError::UnknownUser(user));
        }
        Ok(detector::matches_of(&ledger.decisions, user)
            .into_iter()
            .filter_map(|record| {
                let partner = ledger.profiles.get(record.partner_id)?.clone();
                Some((record, partner))
            })
            .collect())
    }

    async fn match_records(&self, user: UserId) -> Result<Vec<MatchRecord>, MatchingError> {
        let ledger = self.ledger.read().await;
        if !ledger.profiles.contains(user) {
            return Err(MatchingError::UnknownUser(user));
        }
        Ok(detector::matches_of(&ledger.decisions, user))
    }

    // --- Candidate selector ---

    /// Next profile to show `viewer`, or `None` when nobody eligible is left.
    pub async fn next_candidate(&self, viewer: UserId) -> Result<Option<UserProfile>, MatchingError> {
        let ledger = self.ledger.read().await;
        let viewer_profile = ledger
            .profiles
            .get(viewer)
            .ok_or(MatchingError::UnknownUser(viewer))?;

        let candidate =
            candidates::next_candidate(&ledger.profiles, &ledger.decisions, viewer_profile, self.options);
        Ok(candidate.cloned())
    }

    // --- Stats ---

    pub async fn stats(&self, user: UserId) -> Result<UserStats, MatchingError> {
        let ledger = self.ledger.read().await;
        if !ledger.profiles.contains(user) {
            return Err(MatchingError::UnknownUser(user));
        }
        Ok(stats::compute(&ledger.decisions, user))
    }
}
