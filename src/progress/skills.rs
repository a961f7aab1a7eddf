//! Skills

use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::progress::ProgressError;

/// Highest value a skill can reach.
pub const MAX_SKILL: u8 = 100;

/// The fixed set of trainable skills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    /// Passing
    Passing,
    /// Tackling
    Tackling,
    /// Kicking
    Kicking,
    /// Teamwork
    Teamwork,
    /// Fitness
    Fitness,
}

impl Skill {
    /// Every skill, in display order.
    pub const ALL: [Skill; 5] = [
        Skill::Passing,
        Skill::Tackling,
        Skill::Kicking,
        Skill::Teamwork,
        Skill::Fitness,
    ];

    /// Lowercase key of the skill.
    pub fn as_str(self) -> &'static str {
        match self {
            Skill::Passing => "passing",
            Skill::Tackling => "tackling",
            Skill::Kicking => "kicking",
            Skill::Teamwork => "teamwork",
            Skill::Fitness => "fitness",
        }
    }

    /// Capitalised name for display.
    pub fn title(self) -> &'static str {
        match self {
            Skill::Passing => "Passing",
            Skill::Tackling => "Tackling",
            Skill::Kicking => "Kicking",
            Skill::Teamwork => "Teamwork",
            Skill::Fitness => "Fitness",
        }
    }
}

impl Display for Skill {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = ProgressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();

        Skill::ALL
            .into_iter()
            .find(|skill| skill.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ProgressError::InvalidSkillName(s.to_string()))
    }
}

/// Skill values, each clamped to `0..=100`. Untrained skills read as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Skill, u8>", into = "BTreeMap<Skill, u8>")]
pub struct Skills {
    values: BTreeMap<Skill, u8>,
}

impl Skills {
    /// Current value of a skill.
    pub fn get(&self, skill: Skill) -> u8 {
        self.values.get(&skill).copied().unwrap_or_default()
    }

    /// Add points to a skill, saturating at [`MAX_SKILL`]. Returns the new value.
    pub fn add(&mut self, skill: Skill, points: u32) -> u8 {
        let raised = u32::from(self.get(skill))
            .saturating_add(points)
            .min(u32::from(MAX_SKILL));
        let value = u8::try_from(raised).unwrap_or(MAX_SKILL);

        self.values.insert(skill, value);

        value
    }

    /// Iterate over every skill with its value, untrained skills included.
    pub fn iter(&self) -> impl Iterator<Item = (Skill, u8)> + '_ {
        Skill::ALL.into_iter().map(|skill| (skill, self.get(skill)))
    }
}

impl From<BTreeMap<Skill, u8>> for Skills {
    fn from(values: BTreeMap<Skill, u8>) -> Self {
        let values = values
            .into_iter()
            .map(|(skill, value)| (skill, value.min(MAX_SKILL)))
            .collect();

        Self { values }
    }
}

impl From<Skills> for BTreeMap<Skill, u8> {
    fn from(skills: Skills) -> Self {
        skills.values
    }
}
