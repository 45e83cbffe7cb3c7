use diesel::prelude::*;

use jodoh_shared::clients::db::DbPool;

use super::{Snapshot, Store};
use crate::models::{Decision, DecisionRow, ProfileRow, UserProfile};
use crate::schema::{decisions, profiles};

/// Postgres-backed store. The unique `(actor_id, target_id)` constraint on
/// `decisions` backs the one-decision-per-pair rule at the storage level.
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Store for PgStore {
    fn load(&self) -> anyhow::Result<Snapshot> {
        let mut conn = self.pool.get()?;

        let profiles = profiles::table
            .order(profiles::reg_seq.asc())
            .load::<ProfileRow>(&mut conn)?
            .into_iter()
            .map(UserProfile::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        let decisions = decisions::table
            .order(decisions::seq.asc())
            .load::<DecisionRow>(&mut conn)?
            .into_iter()
            .map(Decision::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        tracing::info!(
            profiles = profiles.len(),
            decisions = decisions.len(),
            "loaded matching state from postgres"
        );

        Ok(Snapshot { profiles, decisions })
    }

    fn insert_profile(&self, seq: u64, profile: &UserProfile) -> anyhow::Result<()> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(profiles::table)
            .values(ProfileRow::new(seq, profile))
            .execute(&mut conn)?;
        Ok(())
    }

    fn insert_decision(&self, decision: &Decision) -> anyhow::Result<()> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(decisions::table)
            .values(DecisionRow::from(decision))
            .execute(&mut conn)?;
        Ok(())
    }

    fn ping(&self) -> anyhow::Result<()> {
        let mut conn = self.pool.get()?;
        diesel::sql_query("SELECT 1").execute(&mut conn)?;
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "postgres"
    }
}
