use crate::models::UserProfile;

use super::decisions::DecisionLog;
use super::profiles::ProfileRegistry;

#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionOptions {
    /// Also require the candidate's own preference to admit the viewer.
    pub mutual_preference: bool,
}

pub fn is_candidate(
    viewer: &UserProfile,
    candidate: &UserProfile,
    log: &DecisionLog,
    options: SelectionOptions,
) -> bool {
    candidate.user_id != viewer.user_id
        && !log.contains(viewer.user_id, candidate.user_id)
        && viewer.preference.admits(candidate)
        && (!options.mutual_preference || candidate.preference.admits(viewer))
}

/// Earliest-registered eligible profile. Deterministic for a given state, so
/// asking twice without deciding in between yields the same profile.
pub fn next_candidate<'a>(
    profiles: &'a ProfileRegistry,
    log: &DecisionLog,
    viewer: &UserProfile,
    options: SelectionOptions,
) -> Option<&'a UserProfile> {
    profiles
        .iter()
        .find(|candidate| is_candidate(viewer, candidate, log, options))
}
