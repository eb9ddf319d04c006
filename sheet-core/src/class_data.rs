//! Class hit dice and level-gated class features.

use crate::character::CharacterError;
use crate::dice::Dice;
use serde::{Deserialize, Serialize};

/// A feature a class gains at a given level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassFeature {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub level: u8,
}

impl ClassFeature {
    fn new(title: &str, description: &str, level: u8) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            description: description.to_string(),
            level,
        }
    }
}

/// A character class with its hit die and features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterClass {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub hit_die: Dice,
    pub features: Vec<ClassFeature>,
}

impl CharacterClass {
    /// Build one of the built-in classes by name (case-insensitive).
    pub fn named(name: &str) -> Result<Self, CharacterError> {
        let (canonical, features) = CLASS_FEATURES
            .iter()
            .find(|(class, _)| class.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| CharacterError::UnknownClass(name.to_string()))?;

        Ok(Self {
            id: None,
            name: canonical.to_string(),
            hit_die: hit_die_for(canonical),
            features: features.clone(),
        })
    }

    /// Features unlocked at `level`, lowest level first.
    pub fn available_features(&self, level: i32) -> Vec<&ClassFeature> {
        let mut unlocked: Vec<&ClassFeature> = self
            .features
            .iter()
            .filter(|f| i32::from(f.level) <= level)
            .collect();
        unlocked.sort_by_key(|f| f.level);
        unlocked
    }

    /// Whether any feature is still locked at `level`.
    pub fn has_locked_features(&self, level: i32) -> bool {
        self.features.iter().any(|f| i32::from(f.level) > level)
    }
}

/// Hit die for a class name. Classes not listed use a d8.
pub fn hit_die_for(class_name: &str) -> Dice {
    match class_name.trim() {
        "Fighter" | "Paladin" | "Ranger" => Dice::single(10),
        "Wizard" | "Sorcerer" => Dice::single(6),
        _ => Dice::single(8),
    }
}

lazy_static::lazy_static! {
    /// Built-in class feature tables.
    static ref CLASS_FEATURES: Vec<(&'static str, Vec<ClassFeature>)> = vec![
        ("Fighter", vec![
            ClassFeature::new("Fighting Style", "Gain a Fighting Style feat of your choice; it can be swapped whenever you gain a Fighter level.", 1),
            ClassFeature::new("Second Wind", "As a Bonus Action, regain 1d10 + Fighter level Hit Points. Two uses, one regained on a Short Rest and all on a Long Rest.", 1),
            ClassFeature::new("Weapon Mastery", "Use the mastery properties of three kinds of Simple or Martial weapons; change one choice after a Long Rest.", 1),
            ClassFeature::new("Action Surge", "Take one additional action on your turn, except the Magic action. Once per Short or Long Rest.", 2),
            ClassFeature::new("Tactical Mind", "When you fail an ability check, expend a Second Wind use to add 1d10 to the roll.", 2),
        ]),
        ("Wizard", vec![
            ClassFeature::new("Spellcasting", "Cast Wizard spells from your spellbook using Intelligence.", 1),
            ClassFeature::new("Ritual Adept", "Cast any Ritual spell in your spellbook without preparing it.", 1),
            ClassFeature::new("Arcane Recovery", "After a Short Rest, recover expended slots with combined level up to half your Wizard level, rounded up. Once per Long Rest.", 1),
            ClassFeature::new("Scholar", "Gain Expertise in one of Arcana, History, Investigation, Medicine, Nature, or Religion.", 2),
        ]),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_dice() {
        assert_eq!(hit_die_for("Fighter"), Dice::new(1, 10).unwrap());
        assert_eq!(hit_die_for("Ranger"), Dice::new(1, 10).unwrap());
        assert_eq!(hit_die_for("Sorcerer"), Dice::new(1, 6).unwrap());
        assert_eq!(hit_die_for("Bard"), Dice::new(1, 8).unwrap());
        assert_eq!(hit_die_for("Wizard").to_string(), "1d6");
    }

    #[test]
    fn test_named_class() {
        let fighter = CharacterClass::named("fighter").unwrap();
        assert_eq!(fighter.name, "Fighter");
        assert_eq!(fighter.hit_die, Dice::new(1, 10).unwrap());
        assert!(matches!(
            CharacterClass::named("Artificer"),
            Err(CharacterError::UnknownClass(_))
        ));
    }

    #[test]
    fn test_features_by_level() {
        let wizard = CharacterClass::named("Wizard").unwrap();
        let at_one: Vec<&str> = wizard
            .available_features(1)
            .iter()
            .map(|f| f.title.as_str())
            .collect();
        assert_eq!(at_one, vec!["Spellcasting", "Ritual Adept", "Arcane Recovery"]);
        assert!(wizard.has_locked_features(1));

        assert_eq!(wizard.available_features(2).len(), 4);
        assert!(!wizard.has_locked_features(20));
    }

    #[test]
    fn test_features_sorted_by_level() {
        let class = CharacterClass {
            id: None,
            name: "Homebrew".to_string(),
            hit_die: hit_die_for("Homebrew"),
            features: vec![
                ClassFeature::new("Late", "", 5),
                ClassFeature::new("Early", "", 1),
            ],
        };
        let titles: Vec<&str> = class
            .available_features(20)
            .iter()
            .map(|f| f.title.as_str())
            .collect();
        assert_eq!(titles, vec!["Early", "Late"]);
    }
}
