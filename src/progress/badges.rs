//! Badges
//!
//! Badges are append-only and unique by id.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::progress::skills::Skill;

/// A milestone award.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    /// Unique id, e.g. `level-5` or `passing-master`
    pub id: String,

    /// Display name
    pub name: String,

    /// Display description
    pub description: String,

    /// Display icon
    pub icon: String,

    /// When the badge was earned
    pub earned_at: Timestamp,
}

impl Badge {
    /// Id of the badge for reaching a level.
    pub fn level_id(level: u32) -> String {
        format!("level-{level}")
    }

    /// Id of the mastery badge for a skill.
    pub fn mastery_id(skill: Skill) -> String {
        format!("{skill}-master")
    }

    /// Badge for reaching `level`.
    pub fn level(level: u32, earned_at: Timestamp) -> Self {
        Self {
            id: Self::level_id(level),
            name: format!("Level {level}"),
            description: format!("Reached level {level}"),
            icon: "⭐".to_string(),
            earned_at,
        }
    }

    /// Badge for maxing out `skill`.
    pub fn mastery(skill: Skill, earned_at: Timestamp) -> Self {
        Self {
            id: Self::mastery_id(skill),
            name: format!("{} Master", skill.title()),
            description: format!("Mastered {}", skill.as_str()),
            icon: "🏆".to_string(),
            earned_at,
        }
    }
}

/// Badges in the order they were earned, unique by id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Badge>", into = "Vec<Badge>")]
pub struct BadgeSet {
    badges: Vec<Badge>,
}

impl BadgeSet {
    /// Add a badge unless one with the same id exists. Returns `true` if it was added.
    pub fn insert(&mut self, badge: Badge) -> bool {
        if self.contains(&badge.id) {
            return false;
        }

        self.badges.push(badge);

        true
    }

    /// Check whether a badge id has been earned.
    pub fn contains(&self, id: &str) -> bool {
        self.badges.iter().any(|badge| badge.id == id)
    }

    /// Look up a badge by id.
    pub fn get(&self, id: &str) -> Option<&Badge> {
        self.badges.iter().find(|badge| badge.id == id)
    }

    /// Iterate over badges in earned order.
    pub fn iter(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter()
    }

    /// Number of badges.
    pub fn len(&self) -> usize {
        self.badges.len()
    }

    /// Check if no badges have been earned.
    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }
}

impl From<Vec<Badge>> for BadgeSet {
    fn from(badges: Vec<Badge>) -> Self {
        let mut set = BadgeSet::default();

        for badge in badges {
            set.insert(badge);
        }

        set
    }
}

impl From<BadgeSet> for Vec<Badge> {
    fn from(set: BadgeSet) -> Self {
        set.badges
    }
}
