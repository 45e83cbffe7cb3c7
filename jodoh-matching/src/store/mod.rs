//! Durable backing for the matching engine.
//!
//! The engine keeps its working set in memory and writes every accepted
//! profile and decision through a [`Store`] before it becomes visible. On
//! startup the engine is rebuilt from [`Store::load`].

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{Decision, UserProfile};

/// Everything needed to rebuild the engine. Profiles are in registration
/// order, decisions in log order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub profiles: Vec<UserProfile>,
    pub decisions: Vec<Decision>,
}

/// Calls are blocking; the engine runs them on tokio's blocking pool.
pub trait Store: Send + Sync {
    fn load(&self) -> anyhow::Result<Snapshot>;

    /// `seq` is the profile's 1-based registration position. [`Store::load`]
    /// returns profiles ordered by it.
    fn insert_profile(&self, seq: u64, profile: &UserProfile) -> anyhow::Result<()>;

    fn insert_decision(&self, decision: &Decision) -> anyhow::Result<()>;

    /// Cheap liveness probe used by the health endpoint.
    fn ping(&self) -> anyhow::Result<()>;

    fn kind(&self) -> &'static str;
}
