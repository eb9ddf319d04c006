//! Ability, proficiency and skill rules.
//!
//! Every function here is pure: the only input beyond its arguments is the
//! [`RandomSource`] handed to [`roll_skill_check`].

use crate::character::{ProficiencyLevel, SkillEntry};
use crate::dice::{roll_d20, RandomSource};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ability modifier for a score: `floor((score - 10) / 2)`.
///
/// Uses floor division, so 9 gives -1 rather than 0.
pub fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus for a level: `floor((level - 1) / 4) + 2`.
///
/// The caller keeps `level` within `[1, 20]`; see [`crate::character::Level`].
pub fn proficiency_bonus(level: i32) -> i32 {
    (level - 1).div_euclid(4) + 2
}

/// Bonus contributed by a proficiency level at `level`.
pub fn proficiency_modifier(level: i32, proficiency: ProficiencyLevel) -> i32 {
    proficiency.bonus(proficiency_bonus(level))
}

/// Total modifier for a skill.
pub fn skill_total(ability_modifier: i32, level: i32, skill: &SkillEntry) -> i32 {
    ability_modifier + proficiency_modifier(level, skill.proficiency) + skill.other
}

pub fn passive_score(skill_total: i32) -> i32 {
    skill_total + 10
}

/// Outcome of a d20 skill check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCheck {
    pub roll: u32,
    pub modifier: i32,
    pub total: i32,
}

impl SkillCheck {
    pub fn meets_dc(&self, dc: i32) -> bool {
        self.total >= dc
    }
}

impl fmt::Display for SkillCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Roll: {}, Modifier: {:+}, Total: {}",
            self.roll, self.modifier, self.total
        )
    }
}

/// Roll a d20 and add `total`.
pub fn roll_skill_check<R: RandomSource + ?Sized>(total: i32, rng: &mut R) -> SkillCheck {
    let roll = roll_d20(rng);
    SkillCheck {
        roll,
        modifier: total,
        total: roll as i32 + total,
    }
}
