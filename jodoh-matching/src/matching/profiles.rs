use std::collections::HashMap;

use crate::models::{UserId, UserProfile};

/// Registered profiles, write-once, iterated in registration order.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    by_id: HashMap<UserId, usize>,
    entries: Vec<UserProfile>,
}

impl ProfileRegistry {
    /// Returns `false` and leaves the registry untouched if the id is taken.
    pub fn insert(&mut self, profile: UserProfile) -> bool {
        if self.by_id.contains_key(&profile.user_id) {
            return false;
        }
        self.by_id.insert(profile.user_id, self.entries.len());
        self.entries.push(profile);
        true
    }

    pub fn get(&self, id: UserId) -> Option<&UserProfile> {
        self.by_id.get(&id).map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UserProfile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use crate::test_support::new_profile;
    use chrono::Utc;

    #[test]
    fn registration_is_write_once() {
        let mut registry = ProfileRegistry::default();
        let first = new_profile(1, 25, Gender::Male, Gender::Female, 20, 35).into_profile(Utc::now());
        let mut second = first.clone();
        second.display_name = "impostor".into();

        assert!(registry.insert(first));
        assert!(!registry.insert(second));
        assert_eq!(registry.get(UserId(1)).unwrap().display_name, "user-1");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn iteration_follows_registration_order() {
        let mut registry = ProfileRegistry::default();
        for id in [5, 2, 9] {
            registry.insert(new_profile(id, 30, Gender::Female, Gender::Male, 20, 40).into_profile(Utc::now()));
        }
        let ids: Vec<i64> = registry.iter().map(|p| p.user_id.0).collect();
        assert_eq!(ids, vec![5, 2, 9]);
        assert!(registry.contains(UserId(2)));
        assert!(registry.get(UserId(3)).is_none());
    }
}
