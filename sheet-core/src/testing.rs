//! Testing utilities.
//!
//! This module provides deterministic stand-ins for randomness:
//! - `ScriptedRolls` replays a fixed sequence of die faces
//! - `MaxRolls` and `MinRolls` always roll the highest or lowest face
//! - `sample_character` builds a ready-made sheet for scenarios

use crate::character::{
    AbilityScores, Background, Character, HitPoints, Level, ProficiencyLevel, Skill, Species,
};
use crate::class_actions::ClassAction;
use crate::class_data::CharacterClass;
use crate::combat::{Weapon, WeaponStat};
use crate::dice::RandomSource;
use crate::items::{Coins, InventoryItem};

/// Replays scripted faces in order, cycling when exhausted.
///
/// Each face is clamped into the requested die's range, and the die sizes
/// requested are recorded so tests can assert on draw order.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    faces: Vec<u32>,
    index: usize,
    requested: Vec<u32>,
}

impl ScriptedRolls {
    pub fn new(faces: Vec<u32>) -> Self {
        Self {
            faces,
            index: 0,
            requested: Vec::new(),
        }
    }

    /// Die sizes asked for so far, in order.
    pub fn requested(&self) -> &[u32] {
        &self.requested
    }
}

impl RandomSource for ScriptedRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.requested.push(sides);
        let face = if self.faces.is_empty() {
            1
        } else {
            let face = self.faces[self.index % self.faces.len()];
            self.index += 1;
            face
        };
        face.clamp(1, sides.max(1))
    }
}

/// Always rolls the highest face.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRolls;

impl RandomSource for MaxRolls {
    fn roll_die(&mut self, sides: u32) -> u32 {
        sides.max(1)
    }
}

/// Always rolls a 1.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinRolls;

impl RandomSource for MinRolls {
    fn roll_die(&mut self, _sides: u32) -> u32 {
        1
    }
}

/// A level 5 fighter with a longsword, a rapier, Second Wind and a little gear.
///
/// STR 14 (+2), DEX 16 (+3), proficient in Athletics with a +1 bonus.
pub fn sample_character(name: &str) -> Character {
    let mut character = Character::new(name);
    character.id = Some(1);
    character.species = Some(Species::named("Human"));
    character.background = Some(Background::named("Soldier"));
    character.class = CharacterClass::named("Fighter").ok();
    character.level = Level::clamped(5);
    character.hit_points = HitPoints::new(44);
    character.abilities = AbilityScores::new(14, 16, 14, 10, 12, 8);

    character.set_skill_proficiency(Skill::Athletics, ProficiencyLevel::Proficient);
    character.set_skill_other(Skill::Athletics, 1);
    character.set_skill_proficiency(Skill::Perception, ProficiencyLevel::Proficient);

    character.weapons = vec![
        Weapon::new("Longsword", "1d8").with_damage_type("slashing"),
        Weapon::new("Rapier", "1d8")
            .with_stat(WeaponStat::Finesse)
            .with_magic_bonus(1)
            .with_damage_type("piercing"),
    ];
    character.items = vec![
        InventoryItem::new("Chain mail").with_weight(55.0),
        InventoryItem::new("Rations").with_quantity(10).with_weight(2.0),
    ];
    character.coins = Coins {
        gold: 40,
        silver: 10,
        ..Coins::default()
    };
    character.class_actions.add(
        ClassAction::new("Second Wind")
            .with_gained_from("Fighter 1")
            .with_max_uses(2),
    );
    character
}
