//! Weapon attack and damage resolution.
//!
//! A weapon's damage is rolled alongside every attack. On a critical hit the
//! extra critical dice are rolled and added on top of the normal damage; the
//! flat damage bonus is applied once to the combined dice total.

use crate::character::{Ability, AbilityScores};
use crate::dice::{roll_d20, Dice, DiceError, DiceRoll, RandomSource};
use crate::rules;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;
use uuid::Uuid;

pub const DEFAULT_CRIT_ON: u32 = 20;

/// How a weapon is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttackType {
    #[default]
    Melee,
    Ranged,
    Thrown,
}

/// Ability that drives a weapon's attack and damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponStat {
    #[default]
    #[serde(rename = "STR")]
    Strength,
    #[serde(rename = "DEX")]
    Dexterity,
    #[serde(rename = "CON")]
    Constitution,
    #[serde(rename = "INT")]
    Intelligence,
    #[serde(rename = "WIS")]
    Wisdom,
    #[serde(rename = "CHA")]
    Charisma,
    /// The better of Strength and Dexterity.
    Finesse,
}

impl WeaponStat {
    pub fn label(&self) -> &'static str {
        match self {
            WeaponStat::Strength => "STR",
            WeaponStat::Dexterity => "DEX",
            WeaponStat::Constitution => "CON",
            WeaponStat::Intelligence => "INT",
            WeaponStat::Wisdom => "WIS",
            WeaponStat::Charisma => "CHA",
            WeaponStat::Finesse => "Finesse",
        }
    }

    /// The single ability behind this stat, if it is not Finesse.
    pub fn ability(&self) -> Option<Ability> {
        match self {
            WeaponStat::Strength => Some(Ability::Strength),
            WeaponStat::Dexterity => Some(Ability::Dexterity),
            WeaponStat::Constitution => Some(Ability::Constitution),
            WeaponStat::Intelligence => Some(Ability::Intelligence),
            WeaponStat::Wisdom => Some(Ability::Wisdom),
            WeaponStat::Charisma => Some(Ability::Charisma),
            WeaponStat::Finesse => None,
        }
    }
}

impl fmt::Display for WeaponStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A weapon entry on the sheet.
///
/// Dice expressions are kept as entered and parsed when an attack resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Weapon {
    pub id: String,
    pub name: String,
    pub attack_type: AttackType,
    pub stat: WeaponStat,
    pub proficient: bool,
    pub magic_bonus: i32,
    pub damage_dice: String,
    /// Whether the stat modifier is added to damage.
    pub plus_stat: bool,
    pub damage_type: String,
    pub crit_damage: Option<String>,
    /// Lowest natural d20 that counts as a critical hit.
    pub crit_on: u32,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage_dice: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            attack_type: AttackType::Melee,
            stat: WeaponStat::Strength,
            proficient: true,
            magic_bonus: 0,
            damage_dice: damage_dice.into(),
            plus_stat: true,
            damage_type: String::new(),
            crit_damage: None,
            crit_on: DEFAULT_CRIT_ON,
        }
    }

    pub fn with_attack_type(mut self, attack_type: AttackType) -> Self {
        self.attack_type = attack_type;
        self
    }

    pub fn with_stat(mut self, stat: WeaponStat) -> Self {
        self.stat = stat;
        self
    }

    pub fn with_proficiency(mut self, proficient: bool) -> Self {
        self.proficient = proficient;
        self
    }

    pub fn with_magic_bonus(mut self, bonus: i32) -> Self {
        self.magic_bonus = bonus;
        self
    }

    pub fn with_plus_stat(mut self, plus_stat: bool) -> Self {
        self.plus_stat = plus_stat;
        self
    }

    pub fn with_damage_type(mut self, damage_type: impl Into<String>) -> Self {
        self.damage_type = damage_type.into();
        self
    }

    pub fn with_crit_damage(mut self, dice: impl Into<String>) -> Self {
        self.crit_damage = Some(dice.into());
        self
    }

    pub fn with_crit_on(mut self, crit_on: u32) -> Self {
        self.crit_on = crit_on;
        self
    }

    /// Parsed normal damage dice, `None` when none are set.
    pub fn damage(&self) -> Result<Option<Dice>, DiceError> {
        parse_optional(&self.damage_dice)
    }

    /// Dice rolled in addition to normal damage on a critical hit.
    ///
    /// Falls back to doubling the normal damage dice when the weapon defines
    /// no critical dice of its own.
    pub fn critical_damage(&self) -> Result<Option<Dice>, DiceError> {
        match self.crit_damage.as_deref().map(parse_optional).transpose()?.flatten() {
            Some(dice) => Ok(Some(dice)),
            None => self.damage()?.map(|dice| dice.doubled()).transpose(),
        }
    }
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new("", "")
    }
}

fn parse_optional(expr: &str) -> Result<Option<Dice>, DiceError> {
    if expr.trim().is_empty() {
        Ok(None)
    } else {
        Dice::parse(expr).map(Some)
    }
}

/// Modifier for a weapon stat. Finesse takes the better of STR and DEX.
pub fn stat_modifier(stat: WeaponStat, abilities: &AbilityScores) -> i32 {
    match stat.ability() {
        Some(ability) => abilities.modifier(ability),
        None => abilities
            .modifier(Ability::Strength)
            .max(abilities.modifier(Ability::Dexterity)),
    }
}

/// The parts that make up an attack bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToHitBreakdown {
    pub proficiency: i32,
    pub stat_modifier: i32,
    pub magic_bonus: i32,
}

impl ToHitBreakdown {
    pub fn compute(weapon: &Weapon, level: i32, abilities: &AbilityScores) -> Self {
        Self {
            proficiency: if weapon.proficient {
                rules::proficiency_bonus(level)
            } else {
                0
            },
            stat_modifier: stat_modifier(weapon.stat, abilities),
            magic_bonus: weapon.magic_bonus,
        }
    }

    pub fn total(&self) -> i32 {
        self.proficiency + self.stat_modifier + self.magic_bonus
    }
}

pub fn to_hit_bonus(weapon: &Weapon, level: i32, abilities: &AbilityScores) -> i32 {
    ToHitBreakdown::compute(weapon, level, abilities).total()
}

pub fn damage_bonus(weapon: &Weapon, abilities: &AbilityScores) -> i32 {
    let stat = if weapon.plus_stat {
        stat_modifier(weapon.stat, abilities)
    } else {
        0
    };
    weapon.magic_bonus + stat
}

/// Damage rolled for one attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageBreakdown {
    pub normal: Option<DiceRoll>,
    /// Extra dice from a critical hit.
    pub critical: Option<DiceRoll>,
    /// Flat bonus, applied once.
    pub bonus: i32,
    pub damage_type: String,
    pub total: i32,
}

impl DamageBreakdown {
    pub fn dice_total(&self) -> i32 {
        let normal = self.normal.as_ref().map_or(0, |r| u64::from(r.total));
        let critical = self.critical.as_ref().map_or(0, |r| u64::from(r.total));
        i32::try_from(normal + critical).unwrap_or(i32::MAX)
    }
}

impl fmt::Display for DamageBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(roll) = &self.normal {
            parts.push(format!("{} {}", roll.dice, roll.faces_display()));
        }
        if let Some(roll) = &self.critical {
            parts.push(format!("crit {} {}", roll.dice, roll.faces_display()));
        }
        let mut text = parts.join(" + ");
        if text.is_empty() {
            text = self.bonus.to_string();
        } else if self.bonus > 0 {
            text.push_str(&format!(" + {}", self.bonus));
        } else if self.bonus < 0 {
            text.push_str(&format!(" - {}", self.bonus.abs()));
        }
        write!(f, "{} = {}", text, self.total)?;
        if !self.damage_type.is_empty() {
            write!(f, " {}", self.damage_type)?;
        }
        Ok(())
    }
}

/// Complete outcome of a weapon attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResult {
    pub weapon: String,
    /// Natural d20.
    pub roll: u32,
    pub to_hit: ToHitBreakdown,
    pub to_hit_bonus: i32,
    pub total: i32,
    pub is_critical: bool,
    pub is_fumble: bool,
    pub damage: DamageBreakdown,
}

impl fmt::Display for AttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {:+} = {} to hit",
            self.weapon, self.roll, self.to_hit_bonus, self.total
        )?;
        if self.is_critical {
            write!(f, " (critical)")?;
        } else if self.is_fumble {
            write!(f, " (fumble)")?;
        }
        write!(f, "; damage {}", self.damage)
    }
}

/// Roll an attack and its damage.
///
/// Dice expressions are parsed before any roll, so a malformed weapon fails
/// without consuming randomness. Draw order is d20, normal damage, then
/// critical damage.
pub fn resolve_attack<R: RandomSource + ?Sized>(
    weapon: &Weapon,
    level: i32,
    abilities: &AbilityScores,
    rng: &mut R,
) -> Result<AttackResult, DiceError> {
    let normal_dice = weapon.damage()?;
    let critical_dice = weapon.critical_damage()?;

    let to_hit = ToHitBreakdown::compute(weapon, level, abilities);
    let to_hit_bonus = to_hit.total();

    let roll = roll_d20(rng);
    let is_critical = roll >= weapon.crit_on;
    let is_fumble = roll == 1;

    let normal = normal_dice.map(|dice| dice.roll(rng));
    let critical = if is_critical {
        critical_dice.map(|dice| dice.roll(rng))
    } else {
        None
    };

    let mut damage = DamageBreakdown {
        normal,
        critical,
        bonus: damage_bonus(weapon, abilities),
        damage_type: weapon.damage_type.clone(),
        total: 0,
    };
    damage.total = damage.dice_total().saturating_add(damage.bonus);

    trace!(
        weapon = %weapon.name,
        roll,
        to_hit_bonus,
        is_critical,
        damage = damage.total,
        "resolved attack"
    );

    Ok(AttackResult {
        weapon: weapon.name.clone(),
        roll,
        to_hit,
        to_hit_bonus,
        total: i32::try_from(roll).unwrap_or(i32::MAX).saturating_add(to_hit_bonus),
        is_critical,
        is_fumble,
        damage,
    })
}
