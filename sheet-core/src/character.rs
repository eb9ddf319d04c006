//! Character sheet types.
//!
//! Holds the raw, user-editable state of a character: ability scores, level,
//! skill selections, weapons, inventory and spell slots. Nothing derived is
//! stored here; modifiers, skill totals and attack bonuses are always computed
//! through [`crate::rules`], [`crate::items`] and [`crate::combat`].

use crate::class_actions::ClassActions;
use crate::class_data::CharacterClass;
use crate::combat::{self, AttackResult, Weapon};
use crate::config::SheetConfig;
use crate::dice::{DiceError, RandomSource};
use crate::items::{Coins, Encumbrance, InventoryItem};
use crate::rules::{self, SkillCheck};
use crate::spells::{Spell, SpellSlots};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Validation errors for a character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CharacterError {
    #[error("Character name cannot be empty")]
    EmptyName,

    #[error("Level must be between 1 and 20")]
    LevelOutOfRange(i32),

    #[error("{field} cannot be negative")]
    Negative { field: &'static str, value: i32 },

    #[error("{ability} must be between 0 and 99")]
    ScoreOutOfRange { ability: Ability, score: i32 },

    #[error("Unknown ability: {0}")]
    UnknownAbility(String),

    #[error("Unknown skill: {0}")]
    UnknownSkill(String),

    #[error("Unknown class: {0}")]
    UnknownClass(String),
}

// ============================================================================
// Ability Scores
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Ability::Strength => "STR",
            Ability::Dexterity => "DEX",
            Ability::Constitution => "CON",
            Ability::Intelligence => "INT",
            Ability::Wisdom => "WIS",
            Ability::Charisma => "CHA",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Ability::Strength => "Strength",
            Ability::Dexterity => "Dexterity",
            Ability::Constitution => "Constitution",
            Ability::Intelligence => "Intelligence",
            Ability::Wisdom => "Wisdom",
            Ability::Charisma => "Charisma",
        }
    }

    pub fn all() -> [Ability; 6] {
        [
            Ability::Strength,
            Ability::Dexterity,
            Ability::Constitution,
            Ability::Intelligence,
            Ability::Wisdom,
            Ability::Charisma,
        ]
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Ability {
    type Err = CharacterError;

    /// Accepts full names or abbreviations, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Ability::all()
            .into_iter()
            .find(|a| {
                a.name().eq_ignore_ascii_case(wanted) || a.abbreviation().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CharacterError::UnknownAbility(s.to_string()))
    }
}

/// Raw ability scores, each in `[0, 99]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Set a score, capped at [`MAX_ABILITY_SCORE`].
    pub fn set(&mut self, ability: Ability, value: u8) {
        let value = value.min(MAX_ABILITY_SCORE);
        match ability {
            Ability::Strength => self.strength = value,
            Ability::Dexterity => self.dexterity = value,
            Ability::Constitution => self.constitution = value,
            Ability::Intelligence => self.intelligence = value,
            Ability::Wisdom => self.wisdom = value,
            Ability::Charisma => self.charisma = value,
        }
    }

    /// Modifier for an ability, always derived from the current score.
    pub fn modifier(&self, ability: Ability) -> i32 {
        rules::modifier(i32::from(self.get(ability)))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

pub const MAX_ABILITY_SCORE: u8 = 99;

/// Check a raw score as it arrives from outside the sheet.
pub fn check_ability_score(ability: Ability, score: i32) -> Result<u8, CharacterError> {
    if score < 0 {
        return Err(CharacterError::Negative {
            field: ability.name(),
            value: score,
        });
    }
    if score > i32::from(MAX_ABILITY_SCORE) {
        return Err(CharacterError::ScoreOutOfRange { ability, score });
    }
    Ok(score as u8)
}

// ============================================================================
// Level
// ============================================================================

/// Character level, always within `[1, 20]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(20);

    pub fn new(level: i32) -> Result<Self, CharacterError> {
        if (1..=20).contains(&level) {
            Ok(Level(level as u8))
        } else {
            Err(CharacterError::LevelOutOfRange(level))
        }
    }

    /// Clamp any integer into the valid range.
    pub fn clamped(level: i32) -> Self {
        Level(level.clamp(1, 20) as u8)
    }

    pub fn get(&self) -> i32 {
        i32::from(self.0)
    }

    pub fn proficiency_bonus(&self) -> i32 {
        rules::proficiency_bonus(self.get())
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::MIN
    }
}

impl TryFrom<i32> for Level {
    type Error = CharacterError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for i32 {
    fn from(level: Level) -> Self {
        level.get()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Skills
// ============================================================================

/// The eighteen fixed skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Athletics,
    Acrobatics,
    #[serde(rename = "Sleight of Hand")]
    SleightOfHand,
    Stealth,
    Arcana,
    History,
    Investigation,
    Nature,
    Religion,
    #[serde(rename = "Animal Handling")]
    AnimalHandling,
    Insight,
    Medicine,
    Perception,
    Survival,
    Deception,
    Intimidation,
    Performance,
    Persuasion,
}

impl Skill {
    /// Governing ability. This partition is fixed.
    pub fn ability(&self) -> Ability {
        match self {
            Skill::Athletics => Ability::Strength,
            Skill::Acrobatics | Skill::SleightOfHand | Skill::Stealth => Ability::Dexterity,
            Skill::Arcana
            | Skill::History
            | Skill::Investigation
            | Skill::Nature
            | Skill::Religion => Ability::Intelligence,
            Skill::AnimalHandling
            | Skill::Insight
            | Skill::Medicine
            | Skill::Perception
            | Skill::Survival => Ability::Wisdom,
            Skill::Deception | Skill::Intimidation | Skill::Performance | Skill::Persuasion => {
                Ability::Charisma
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Athletics => "Athletics",
            Skill::Acrobatics => "Acrobatics",
            Skill::SleightOfHand => "Sleight of Hand",
            Skill::Stealth => "Stealth",
            Skill::Arcana => "Arcana",
            Skill::History => "History",
            Skill::Investigation => "Investigation",
            Skill::Nature => "Nature",
            Skill::Religion => "Religion",
            Skill::AnimalHandling => "Animal Handling",
            Skill::Insight => "Insight",
            Skill::Medicine => "Medicine",
            Skill::Perception => "Perception",
            Skill::Survival => "Survival",
            Skill::Deception => "Deception",
            Skill::Intimidation => "Intimidation",
            Skill::Performance => "Performance",
            Skill::Persuasion => "Persuasion",
        }
    }

    /// All skills, grouped by ability in sheet order.
    pub fn all() -> [Skill; 18] {
        [
            Skill::Athletics,
            Skill::Acrobatics,
            Skill::SleightOfHand,
            Skill::Stealth,
            Skill::Arcana,
            Skill::History,
            Skill::Investigation,
            Skill::Nature,
            Skill::Religion,
            Skill::AnimalHandling,
            Skill::Insight,
            Skill::Medicine,
            Skill::Perception,
            Skill::Survival,
            Skill::Deception,
            Skill::Intimidation,
            Skill::Performance,
            Skill::Persuasion,
        ]
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Skill {
    type Err = CharacterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Skill::all()
            .into_iter()
            .find(|skill| skill.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CharacterError::UnknownSkill(s.to_string()))
    }
}

/// Skills governed by `ability`, in sheet order. Constitution has none.
pub fn skills_for(ability: Ability) -> Vec<Skill> {
    Skill::all()
        .into_iter()
        .filter(|skill| skill.ability() == ability)
        .collect()
}

/// Proficiency level for a skill.
///
/// Variants are ordered by the bonus they grant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProficiencyLevel {
    #[default]
    None,
    JackOfAllTrades,
    Proficient,
    Expertise,
}

impl ProficiencyLevel {
    /// Bonus granted given the level's proficiency bonus.
    pub fn bonus(&self, proficiency_bonus: i32) -> i32 {
        match self {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::JackOfAllTrades => proficiency_bonus.div_euclid(2),
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expertise => proficiency_bonus * 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProficiencyLevel::None => "None",
            ProficiencyLevel::JackOfAllTrades => "Jack of All Trades",
            ProficiencyLevel::Proficient => "Proficient",
            ProficiencyLevel::Expertise => "Expertise",
        }
    }
}

/// A character's selections for one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: Skill,
    #[serde(default)]
    pub proficiency: ProficiencyLevel,
    #[serde(default)]
    pub other: i32,
}

impl SkillEntry {
    pub fn new(name: Skill) -> Self {
        Self {
            name,
            proficiency: ProficiencyLevel::None,
            other: 0,
        }
    }

    pub fn ability(&self) -> Ability {
        self.name.ability()
    }
}

// ============================================================================
// Hit Points
// ============================================================================

/// Hit point fields as edited on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HitPoints {
    pub current: i32,
    pub maximum: i32,
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(maximum: i32) -> Self {
        Self {
            current: maximum,
            maximum,
            temporary: 0,
        }
    }
}

// ============================================================================
// Species and Background
// ============================================================================

/// A named trait or feature granted by a species or background.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trait {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Species {
    pub id: Option<String>,
    pub name: String,
    pub traits: Vec<Trait>,
}

impl Species {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    pub id: Option<String>,
    pub name: String,
    pub features: Vec<Trait>,
}

impl Background {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ============================================================================
// Character
// ============================================================================

/// A character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: Option<i64>,
    pub name: String,
    pub species: Option<Species>,
    pub background: Option<Background>,
    pub class: Option<CharacterClass>,
    pub level: Level,
    pub hit_points: HitPoints,
    pub speed: i32,
    pub abilities: AbilityScores,
    pub skills: Vec<SkillEntry>,
    pub weapons: Vec<Weapon>,
    pub coins: Coins,
    pub items: Vec<InventoryItem>,
    pub spell_slots: SpellSlots,
    pub spells: Vec<Spell>,
    pub class_actions: ClassActions,
    pub details: Option<String>,
    /// Creation timestamp assigned by the character API, kept as sent.
    pub created_at: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            species: None,
            background: None,
            class: None,
            level: Level::default(),
            hit_points: HitPoints::default(),
            speed: 30,
            abilities: AbilityScores::default(),
            skills: Vec::new(),
            weapons: Vec::new(),
            coins: Coins::default(),
            items: Vec::new(),
            spell_slots: SpellSlots::default(),
            spells: Vec::new(),
            class_actions: ClassActions::default(),
            details: None,
            created_at: None,
        }
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.level.proficiency_bonus()
    }

    /// Stored entry for `skill`, or the untrained default if never edited.
    pub fn skill(&self, skill: Skill) -> SkillEntry {
        self.skills
            .iter()
            .find(|entry| entry.name == skill)
            .copied()
            .unwrap_or_else(|| SkillEntry::new(skill))
    }

    /// Mutable entry for `skill`, created with defaults on first edit.
    pub fn skill_mut(&mut self, skill: Skill) -> &mut SkillEntry {
        let index = match self.skills.iter().position(|entry| entry.name == skill) {
            Some(index) => index,
            None => {
                self.skills.push(SkillEntry::new(skill));
                self.skills.len() - 1
            }
        };
        &mut self.skills[index]
    }

    pub fn set_skill_proficiency(&mut self, skill: Skill, proficiency: ProficiencyLevel) {
        self.skill_mut(skill).proficiency = proficiency;
    }

    pub fn set_skill_other(&mut self, skill: Skill, other: i32) {
        self.skill_mut(skill).other = other;
    }

    pub fn skill_total(&self, skill: Skill) -> i32 {
        rules::skill_total(
            self.abilities.modifier(skill.ability()),
            self.level.get(),
            &self.skill(skill),
        )
    }

    pub fn passive_score(&self, skill: Skill) -> i32 {
        rules::passive_score(self.skill_total(skill))
    }

    pub fn roll_skill_check<R: RandomSource + ?Sized>(&self, skill: Skill, rng: &mut R) -> SkillCheck {
        rules::roll_skill_check(self.skill_total(skill), rng)
    }

    /// Carried weight against capacity.
    pub fn encumbrance(&self, config: &SheetConfig) -> Encumbrance {
        Encumbrance::compute(&self.items, &self.coins, self.abilities.strength, config)
    }

    /// Resolve an attack with one of this character's weapons.
    pub fn attack<R: RandomSource + ?Sized>(
        &self,
        weapon: &Weapon,
        rng: &mut R,
    ) -> Result<AttackResult, DiceError> {
        combat::resolve_attack(weapon, self.level.get(), &self.abilities, rng)
    }

    /// Find a weapon by name, case-insensitively.
    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons
            .iter()
            .find(|w| w.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Check the same constraints the character API enforces on update.
    pub fn validate(&self) -> Result<(), CharacterError> {
        if self.name.trim().is_empty() {
            return Err(CharacterError::EmptyName);
        }

        let non_negative = [
            ("Temporary HP", self.hit_points.temporary),
            ("Current HP", self.hit_points.current),
            ("Maximum HP", self.hit_points.maximum),
            ("Speed", self.speed),
        ];
        for (field, value) in non_negative {
            if value < 0 {
                return Err(CharacterError::Negative { field, value });
            }
        }

        for ability in Ability::all() {
            check_ability_score(ability, i32::from(self.abilities.get(ability)))?;
        }

        Ok(())
    }
}
