use std::sync::Mutex;

use anyhow::anyhow;

use super::{Snapshot, Store};
use crate::models::{Decision, UserProfile};

/// Process-local store. State is lost on restart; used when no database is
/// configured and as a fresh, isolated store per test.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Snapshot>,
}

impl MemoryStore {
    fn with_inner<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> anyhow::Result<T> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(f(&mut *guard))
    }
}

impl Store for MemoryStore {
    fn load(&self) -> anyhow::Result<Snapshot> {
        self.with_inner(|snapshot| snapshot.clone())
    }

    fn insert_profile(&self, seq: u64, profile: &UserProfile) -> anyhow::Result<()> {
        self.with_inner(|snapshot| {
            if snapshot.profiles.iter().any(|p| p.user_id == profile.user_id) {
                return Err(anyhow!("profile {} already stored", profile.user_id));
            }
            let expected = snapshot.profiles.len() as u64 + 1;
            if seq != expected {
                return Err(anyhow!("registration seq {seq} out of order, expected {expected}"));
            }
            snapshot.profiles.push(profile.clone());
            Ok(())
        })?
    }

    fn insert_decision(&self, decision: &Decision) -> anyhow::Result<()> {
        self.with_inner(|snapshot| {
            let duplicate = snapshot.decisions.iter().any(|d| {
                d.seq == decision.seq
                    || (d.actor_id == decision.actor_id && d.target_id == decision.target_id)
            });
            if duplicate {
                return Err(anyhow!(
                    "decision {} -> {} already stored",
                    decision.actor_id,
                    decision.target_id
                ));
            }
            snapshot.decisions.push(decision.clone());
            Ok(())
        })?
    }

    fn ping(&self) -> anyhow::Result<()> {
        self.with_inner(|_| ())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, Gender, UserId};
    use crate::test_support::new_profile;
    use chrono::Utc;

    fn decision(seq: u64, actor: i64, target: i64) -> Decision {
        Decision {
            id: uuid::Uuid::now_v7(),
            seq,
            actor_id: UserId(actor),
            target_id: UserId(target),
            action: Action::Like,
            decided_at: Utc::now(),
        }
    }

    #[test]
    fn load_returns_inserts_in_order() {
        let store = MemoryStore::default();
        for (seq, id) in [(1, 3), (2, 1), (3, 2)] {
            let p = new_profile(id, 30, Gender::Male, Gender::Female, 20, 40).into_profile(Utc::now());
            store.insert_profile(seq, &p).unwrap();
        }
        store.insert_decision(&decision(1, 3, 1)).unwrap();

        let snapshot = store.load().unwrap();
        let ids: Vec<i64> = snapshot.profiles.iter().map(|p| p.user_id.0).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(snapshot.decisions.len(), 1);
    }

    #[test]
    fn duplicate_pair_is_refused() {
        let store = MemoryStore::default();
        store.insert_decision(&decision(1, 1, 2)).unwrap();
        assert!(store.insert_decision(&decision(2, 1, 2)).is_err());
        assert!(store.insert_decision(&decision(1, 2, 1)).is_err());
        assert!(store.insert_decision(&decision(2, 2, 1)).is_ok());
    }

    #[test]
    fn duplicate_profile_is_refused() {
        let store = MemoryStore::default();
        let p = new_profile(1, 30, Gender::Male, Gender::Female, 20, 40).into_profile(Utc::now());
        store.insert_profile(1, &p).unwrap();
        assert!(store.insert_profile(2, &p).is_err());
        assert_eq!(store.kind(), "memory");
        assert!(store.ping().is_ok());
    }

    #[test]
    fn registration_seq_must_follow_on() {
        let store = MemoryStore::default();
        let first = new_profile(1, 30, Gender::Male, Gender::Female, 20, 40).into_profile(Utc::now());
        let second = new_profile(2, 30, Gender::Female, Gender::Male, 20, 40).into_profile(Utc::now());

        assert!(store.insert_profile(2, &first).is_err());
        store.insert_profile(1, &first).unwrap();
        assert!(store.insert_profile(1, &second).is_err());
        store.insert_profile(2, &second).unwrap();
        assert_eq!(store.load().unwrap().profiles.len(), 2);
    }
}
