use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::schema::{decisions, profiles};

pub const MIN_AGE: u8 = 18;
pub const MAX_AGE: u8 = 60;
/// Width of the preferred age window when only a minimum is collected.
pub const DEFAULT_AGE_SPAN: u8 = 15;

/// Opaque, platform-assigned user identifier (a chat platform user id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(format!("unknown gender '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Like,
    Pass,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "pass" => Ok(Self::Pass),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// Inclusive age window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    pub fn contains(&self, age: u8) -> bool {
        self.min <= age && age <= self.max
    }

    /// `[min, min + 15]`, capped at [`MAX_AGE`]. This is how the chat front end
    /// fills in the upper bound when it only asks for a minimum.
    pub fn spanning_from(min: u8) -> Self {
        Self {
            min,
            max: min.saturating_add(DEFAULT_AGE_SPAN).min(MAX_AGE),
        }
    }
}

/// What a viewer is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub gender: Gender,
    pub age: AgeRange,
}

impl Preference {
    pub fn admits(&self, profile: &UserProfile) -> bool {
        profile.gender == self.gender && self.age.contains(profile.age)
    }
}

// --- UserProfile ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub display_name: String,
    pub username: Option<String>,
    pub age: u8,
    pub gender: Gender,
    pub bio: String,
    pub photo_id: String,
    pub preference: Preference,
    pub registered_at: DateTime<Utc>,
}

/// Registration input. Values are expected to be validated by the front end,
/// but are checked again before anything is stored.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_age_preference"))]
pub struct NewProfile {
    pub user_id: UserId,
    #[validate(length(min = 1, max = 64, message = "display name must be 1-64 characters"))]
    pub display_name: String,
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: Option<String>,
    #[validate(range(min = 18, max = 60, message = "age must be between 18 and 60"))]
    pub age: u8,
    pub gender: Gender,
    #[validate(length(max = 200, message = "bio must be at most 200 characters"))]
    pub bio: String,
    pub photo_id: String,
    pub pref_gender: Gender,
    #[validate(range(min = 18, max = 60, message = "preferred minimum age must be between 18 and 60"))]
    pub pref_age_min: u8,
    #[validate(range(min = 18, max = 60, message = "preferred maximum age must be between 18 and 60"))]
    pub pref_age_max: u8,
}

fn validate_age_preference(profile: &NewProfile) -> Result<(), ValidationError> {
    if profile.pref_age_min > profile.pref_age_max {
        let mut err = ValidationError::new("pref_age_range");
        err.message = Some("preferred minimum age exceeds maximum".into());
        return Err(err);
    }
    Ok(())
}

impl NewProfile {
    pub fn into_profile(self, registered_at: DateTime<Utc>) -> UserProfile {
        UserProfile {
            user_id: self.user_id,
            display_name: self.display_name,
            username: self.username,
            age: self.age,
            gender: self.gender,
            bio: self.bio,
            photo_id: self.photo_id,
            preference: Preference {
                gender: self.pref_gender,
                age: AgeRange {
                    min: self.pref_age_min,
                    max: self.pref_age_max,
                },
            },
            registered_at,
        }
    }
}

// --- Decision ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: Uuid,
    /// Position in the decision log, starting at 1.
    pub seq: u64,
    pub actor_id: UserId,
    pub target_id: UserId,
    pub action: Action,
    pub decided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub decision: Decision,
    /// False when the pair was already decided and the first decision was kept.
    pub is_new: bool,
    /// True when this decision completed a mutual like.
    pub is_match: bool,
}

/// A mutual like as seen from one side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub partner_id: UserId,
    /// Sequence of the later of the two likes.
    pub formed_seq: u64,
    pub matched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub likes_given: u64,
    pub likes_received: u64,
    pub matches: u64,
}

// --- Persistence rows ---

#[derive(Debug, Queryable, Insertable, Clone)]
#[diesel(table_name = profiles)]
pub struct ProfileRow {
    pub user_id: i64,
    pub display_name: String,
    pub username: Option<String>,
    pub age: i16,
    pub gender: String,
    pub bio: String,
    pub photo_id: String,
    pub pref_gender: String,
    pub pref_age_min: i16,
    pub pref_age_max: i16,
    pub registered_at: DateTime<Utc>,
    /// Registration position; defines candidate order across restarts.
    pub reg_seq: i64,
}

impl ProfileRow {
    pub fn new(reg_seq: u64, p: &UserProfile) -> Self {
        Self {
            user_id: p.user_id.0,
            display_name: p.display_name.clone(),
            username: p.username.clone(),
            age: i16::from(p.age),
            gender: p.gender.as_str().to_string(),
            bio: p.bio.clone(),
            photo_id: p.photo_id.clone(),
            pref_gender: p.preference.gender.as_str().to_string(),
            pref_age_min: i16::from(p.preference.age.min),
            pref_age_max: i16::from(p.preference.age.max),
            registered_at: p.registered_at,
            reg_seq: reg_seq as i64,
        }
    }
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = anyhow::Error;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: UserId(row.user_id),
            display_name: row.display_name,
            username: row.username,
            age: u8::try_from(row.age)?,
            gender: row.gender.parse().map_err(anyhow::Error::msg)?,
            bio: row.bio,
            photo_id: row.photo_id,
            preference: Preference {
                gender: row.pref_gender.parse().map_err(anyhow::Error::msg)?,
                age: AgeRange {
                    min: u8::try_from(row.pref_age_min)?,
                    max: u8::try_from(row.pref_age_max)?,
                },
            },
            registered_at: row.registered_at,
        })
    }
}

#[derive(Debug, Queryable, Insertable, Clone)]
#[diesel(table_name = decisions)]
pub struct DecisionRow {
    pub id: Uuid,
    pub seq: i64,
    pub actor_id: i64,
    pub target_id: i64,
    pub action: String,
    pub decided_at: DateTime<Utc>,
}

impl From<&Decision> for DecisionRow {
    fn from(d: &Decision) -> Self {
        Self {
            id: d.id,
            seq: d.seq as i64,
            actor_id: d.actor_id.0,
            target_id: d.target_id.0,
            action: d.action.as_str().to_string(),
            decided_at: d.decided_at,
        }
    }
}

impl TryFrom<DecisionRow> for Decision {
    type Error = anyhow::Error;

    fn try_from(row: DecisionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            seq: u64::try_from(row.seq)?,
            actor_id: UserId(row.actor_id),
            target_id: UserId(row.target_id),
            action: row.action.parse().map_err(anyhow::Error::msg)?,
            decided_at: row.decided_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::new_profile;

    #[test]
    fn spanning_range_is_capped() {
        assert_eq!(AgeRange::spanning_from(20), AgeRange { min: 20, max: 35 });
        assert_eq!(AgeRange::spanning_from(50), AgeRange { min: 50, max: 60 });
    }

    #[test]
    fn age_range_is_inclusive() {
        let range = AgeRange { min: 22, max: 30 };
        assert!(range.contains(22));
        assert!(range.contains(30));
        assert!(!range.contains(21));
        assert!(!range.contains(31));
    }

    #[test]
    fn valid_profile_passes_validation() {
        assert!(new_profile(1, 25, Gender::Male, Gender::Female, 20, 35).validate().is_ok());
    }

    #[test]
    fn out_of_range_age_is_rejected() {
        assert!(new_profile(1, 17, Gender::Male, Gender::Female, 20, 35).validate().is_err());
        assert!(new_profile(1, 61, Gender::Male, Gender::Female, 20, 35).validate().is_err());
    }

    #[test]
    fn inverted_preference_is_rejected() {
        assert!(new_profile(1, 25, Gender::Male, Gender::Female, 40, 30).validate().is_err());
        assert!(new_profile(1, 25, Gender::Male, Gender::Female, 30, 30).validate().is_ok());
    }

    #[test]
    fn bio_limit_counts_characters() {
        let mut profile = new_profile(1, 25, Gender::Male, Gender::Female, 20, 35);
        profile.bio = "é".repeat(200);
        assert!(profile.validate().is_ok());
        profile.bio.push('x');
        assert!(profile.validate().is_err());
    }

    #[test]
    fn wire_names_are_lowercase() {
        assert_eq!(serde_json::to_string(&Action::Like).unwrap(), "\"like\"");
        assert_eq!(serde_json::from_str::<Gender>("\"female\"").unwrap(), Gender::Female);
        assert!(serde_json::from_str::<Action>("\"superlike\"").is_err());
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
    }

    #[test]
    fn profile_row_conversion_keeps_fields() {
        let profile = new_profile(7, 28, Gender::Female, Gender::Male, 22, 30).into_profile(Utc::now());
        let row = ProfileRow::new(4, &profile);
        assert_eq!(row.reg_seq, 4);
        let back = UserProfile::try_from(row).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn corrupt_rows_are_rejected() {
        let profile = new_profile(7, 28, Gender::Female, Gender::Male, 22, 30).into_profile(Utc::now());
        let mut row = ProfileRow::new(1, &profile);
        row.gender = "unknown".into();
        assert!(UserProfile::try_from(row).is_err());
    }
}
