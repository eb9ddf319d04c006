//! D&D 5e character sheet rules.
//!
//! This crate provides:
//! - Ability modifiers, proficiency bonuses and skill totals
//! - Inventory weight, carrying capacity and load bands
//! - Dice notation, weapon attacks and damage breakdowns
//! - Spell slot and class action tracking, class feature tables
//! - Conversion to and from the character API's record format
//!
//! Derived values are never stored; they are computed from the sheet on
//! demand. Rolling always takes an explicit [`RandomSource`].
//!
//! # Quick Start
//!
//! ```
//! use sheet_core::{Character, ProficiencyLevel, Skill, Weapon};
//!
//! let mut hero = Character::new("Thorin");
//! hero.abilities.strength = 14;
//! hero.set_skill_proficiency(Skill::Athletics, ProficiencyLevel::Proficient);
//! assert_eq!(hero.skill_total(Skill::Athletics), 4);
//!
//! let axe = Weapon::new("Battleaxe", "1d8").with_damage_type("slashing");
//! let result = hero.attack(&axe, &mut rand::thread_rng()).unwrap();
//! println!("{result}");
//! ```

pub mod character;
pub mod class_actions;
pub mod class_data;
pub mod combat;
pub mod config;
pub mod dice;
pub mod items;
pub mod record;
pub mod rules;
pub mod spells;
pub mod testing;

pub use character::{
    check_ability_score, skills_for, Ability, AbilityScores, Background, Character,
    CharacterError, HitPoints, Level, ProficiencyLevel, Skill, SkillEntry, Species, Trait,
};
pub use class_actions::{ClassAction, ClassActions};
pub use class_data::{hit_die_for, CharacterClass, ClassFeature};
pub use combat::{
    damage_bonus, resolve_attack, stat_modifier, to_hit_bonus, AttackResult, AttackType,
    DamageBreakdown, ToHitBreakdown, Weapon, WeaponStat,
};
pub use config::{ConfigError, SheetConfig};
pub use dice::{
    doubled_dice, parse_dice, roll_dice, Dice, DiceError, DiceRoll, RandomSource, MAX_DICE_COUNT,
    MAX_DICE_SIDES,
};
pub use items::{
    carrying_capacity, coins_weight, items_weight, load_percentage, load_state, total_weight,
    Coins, Denomination, Encumbrance, InventoryItem, LoadState,
};
pub use record::{CharacterRecord, RecordError};
pub use rules::{
    modifier, passive_score, proficiency_bonus, proficiency_modifier, roll_skill_check,
    skill_total, SkillCheck,
};
pub use spells::{Spell, SpellSlot, SpellSlots};
