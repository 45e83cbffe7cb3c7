use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::matching::{DecisionLog, MatchEngine, SelectionOptions};
use crate::models::{Action, Decision, Gender, NewProfile, UserId};
use crate::models::UserProfile;
use crate::store::{MemoryStore, Snapshot, Store};

pub fn new_profile(
    id: i64,
    age: u8,
    gender: Gender,
    pref_gender: Gender,
    pref_min: u8,
    pref_max: u8,
) -> NewProfile {
    NewProfile {
        user_id: UserId(id),
        display_name: format!("user-{id}"),
        username: Some(format!("handle{id}")),
        age,
        gender,
        bio: "halo".into(),
        photo_id: format!("photo-{id}"),
        pref_gender,
        pref_age_min: pref_min,
        pref_age_max: pref_max,
    }
}

pub fn engine() -> MatchEngine {
    engine_with(Arc::new(MemoryStore::default()), SelectionOptions::default())
}

pub fn engine_with(store: Arc<MemoryStore>, options: SelectionOptions) -> MatchEngine {
    MatchEngine::open(store, options).expect("memory store always loads")
}

/// Appends a decision with the next sequence number straight onto a log.
pub fn push_decision(log: &mut DecisionLog, actor: i64, target: i64, action: Action) -> bool {
    let seq = log.next_seq();
    log.append(Decision {
        id: Uuid::now_v7(),
        seq,
        actor_id: UserId(actor),
        target_id: UserId(target),
        action,
        decided_at: Utc::now(),
    })
}

/// Starts empty, then refuses every write and health ping, like a database
/// that went away after startup.
pub struct UnreachableStore;

impl Store for UnreachableStore {
    fn load(&self) -> anyhow::Result<Snapshot> {
        Ok(Snapshot::default())
    }

    fn insert_profile(&self, _seq: u64, _profile: &UserProfile) -> anyhow::Result<()> {
        anyhow::bail!("database unreachable")
    }

    fn insert_decision(&self, _decision: &Decision) -> anyhow::Result<()> {
        anyhow::bail!("database unreachable")
    }

    fn ping(&self) -> anyhow::Result<()> {
        anyhow::bail!("database unreachable")
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
