//! Junior Progress
//!
//! Level, experience, skills and badges of a junior player, with the two pure reducers that
//! move them forward.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::progress::{
    badges::{Badge, BadgeSet},
    skills::{MAX_SKILL, Skill, Skills},
};

pub mod badges;
pub mod skills;
pub mod tracker;

/// Experience needed to leave level 1.
pub const STARTING_THRESHOLD: u64 = 100;

/// Errors rejected at the reducer boundary. The input progress is never modified.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    /// The user id is empty or has characters outside `[A-Za-z0-9_-]`.
    #[error("invalid user id: {0:?}")]
    InvalidUserId(String),

    /// The skill is not one of the fixed set.
    #[error("unknown skill: {0:?}")]
    InvalidSkillName(String),

    /// Experience awards must be positive.
    #[error("experience award must be positive")]
    ZeroExperience,

    /// Skill awards must be positive.
    #[error("skill point award must be positive")]
    ZeroSkillPoints,

    /// Stored progress breaks an invariant.
    #[error("inconsistent progress: {0}")]
    Inconsistent(&'static str),
}

/// A junior player's progression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ProgressRecord")]
pub struct JuniorProgress {
    level: u32,
    experience: u64,
    experience_to_next: u64,
    skills: Skills,
    badges: BadgeSet,
}

impl Default for JuniorProgress {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            experience_to_next: STARTING_THRESHOLD,
            skills: Skills::default(),
            badges: BadgeSet::default(),
        }
    }
}

impl JuniorProgress {
    /// Current level, starting at 1
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Experience earned within the current level
    pub fn experience(&self) -> u64 {
        self.experience
    }

    /// Experience needed to reach the next level
    pub fn experience_to_next(&self) -> u64 {
        self.experience_to_next
    }

    /// Skill values
    pub fn skills(&self) -> &Skills {
        &self.skills
    }

    /// Earned badges
    pub fn badges(&self) -> &BadgeSet {
        &self.badges
    }

    /// Badges present here that were not present in `before`.
    ///
    /// Badges are append-only, so this is the tail past `before`'s count.
    pub fn badges_since<'a>(&'a self, before: &JuniorProgress) -> impl Iterator<Item = &'a Badge> {
        self.badges.iter().skip(before.badges.len())
    }
}

/// Shape of stored progress before its invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRecord {
    level: u32,
    experience: u64,
    experience_to_next: u64,
    #[serde(default)]
    skills: Skills,
    #[serde(default)]
    badges: BadgeSet,
}

impl TryFrom<ProgressRecord> for JuniorProgress {
    type Error = ProgressError;

    fn try_from(record: ProgressRecord) -> Result<Self, Self::Error> {
        if record.level == 0 {
            return Err(ProgressError::Inconsistent("level must be at least 1"));
        }

        // A threshold of 1 would never grow, see `next_threshold`.
        if record.experience_to_next < 2 {
            return Err(ProgressError::Inconsistent(
                "experience threshold must be at least 2",
            ));
        }

        if record.experience >= record.experience_to_next {
            return Err(ProgressError::Inconsistent(
                "experience must be below the level threshold",
            ));
        }

        Ok(Self {
            level: record.level,
            experience: record.experience,
            experience_to_next: record.experience_to_next,
            skills: record.skills,
            badges: record.badges,
        })
    }
}

/// Whether `user_id` is non-empty and only uses ASCII letters, digits, `-` and `_`.
pub fn is_valid_user_id(user_id: &str) -> bool {
    !user_id.is_empty()
        && user_id
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// `floor(threshold × 1.5)`
fn next_threshold(threshold: u64) -> u64 {
    threshold.saturating_add(threshold / 2)
}

/// Award experience, rolling any overflow into level-ups.
///
/// Every level gained adds a `level-{N}` badge, unless that badge was already earned.
///
/// # Errors
///
/// Returns [`ProgressError::ZeroExperience`] if `amount` is zero.
pub fn award_experience(
    progress: &JuniorProgress,
    amount: u32,
    earned_at: Timestamp,
) -> Result<JuniorProgress, ProgressError> {
    if amount == 0 {
        return Err(ProgressError::ZeroExperience);
    }

    let mut next = progress.clone();

    next.experience = next.experience.saturating_add(u64::from(amount));

    while next.experience >= next.experience_to_next {
        next.experience -= next.experience_to_next;
        next.level = next.level.saturating_add(1);
        next.experience_to_next = next_threshold(next.experience_to_next);

        next.badges.insert(Badge::level(next.level, earned_at));
    }

    Ok(next)
}

/// Award points to a named skill, clamping at 100.
///
/// A skill at 100 earns its `{skill}-master` badge once.
///
/// # Errors
///
/// - [`ProgressError::InvalidSkillName`]: `skill_name` is not a known skill.
/// - [`ProgressError::ZeroSkillPoints`]: `amount` is zero.
pub fn award_skill_points(
    progress: &JuniorProgress,
    skill_name: &str,
    amount: u32,
    earned_at: Timestamp,
) -> Result<JuniorProgress, ProgressError> {
    let skill: Skill = skill_name.parse()?;

    if amount == 0 {
        return Err(ProgressError::ZeroSkillPoints);
    }

    let mut next = progress.clone();

    if next.skills.add(skill, amount) == MAX_SKILL {
        next.badges.insert(Badge::mastery(skill, earned_at));
    }

    Ok(next)
}
