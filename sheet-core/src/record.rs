//! Character records as exchanged with the character API.
//!
//! The API nests several sub-structures (coins, items, skills, weapons, spell
//! slots, spells, class actions) as JSON-encoded strings inside the character
//! resource. They are decoded once here, into the structured types the rules
//! work with, and re-encoded on the way back out. Species, background and
//! class sub-objects keep their ids and text so a round trip loses nothing.

use crate::character::{
    check_ability_score, Ability, AbilityScores, Background, Character, CharacterError,
    HitPoints, Level, ProficiencyLevel, SkillEntry, Species,
};
use crate::class_actions::{ClassAction, ClassActions};
use crate::class_data::{hit_die_for, CharacterClass, ClassFeature};
use crate::combat::Weapon;
use crate::dice::Dice;
use crate::items::{Coins, InventoryItem};
use crate::rules;
use crate::spells::{Spell, SpellSlot, SpellSlots};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from decoding or encoding a character record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid {field} JSON format: {source}")]
    InvalidField {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Character(#[from] CharacterError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassFeatureRecord {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub level: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassRecord {
    pub id: Option<String>,
    pub name: String,
    pub hit_die: String,
    pub features: Vec<ClassFeatureRecord>,
}

/// A skill as stored by the API, with its ability spelled out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SkillRecord {
    name: String,
    #[serde(default)]
    ability: String,
    #[serde(default)]
    proficiency: ProficiencyLevel,
    #[serde(default)]
    other: i32,
}

/// Skills arrive either as a JSON string or as an inline array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillsField {
    Encoded(String),
    Inline(serde_json::Value),
}

/// The API's character resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: Option<i64>,
    pub name: String,
    pub species: Option<Species>,
    pub background: Option<Background>,
    pub character_class: Option<ClassRecord>,
    #[serde(default = "default_level")]
    pub level: i32,
    pub temporary_hp: i32,
    pub current_hp: i32,
    pub max_hp: i32,
    pub speed: i32,
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
    // Derived on the way out; ignored on the way in.
    pub strength_modifier: i32,
    pub dexterity_modifier: i32,
    pub constitution_modifier: i32,
    pub intelligence_modifier: i32,
    pub wisdom_modifier: i32,
    pub charisma_modifier: i32,
    pub coins: Option<String>,
    pub items: Option<String>,
    pub details: Option<String>,
    pub skills: Option<SkillsField>,
    pub weapons: Option<String>,
    pub spell_slots: Option<String>,
    pub spells: Option<String>,
    pub class_actions: Option<String>,
    pub created_at: Option<String>,
}

impl CharacterRecord {
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode into a validated [`Character`].
    pub fn into_character(self) -> Result<Character, RecordError> {
        let skills = decode_skills(self.skills.as_ref())?;
        let coins: Coins = decode_embedded("coins", self.coins.as_deref())?;
        let items: Vec<InventoryItem> = decode_embedded("items", self.items.as_deref())?;
        let weapons: Vec<Weapon> = decode_embedded("weapons", self.weapons.as_deref())?;
        let slots: Vec<SpellSlot> = decode_embedded("spell slots", self.spell_slots.as_deref())?;
        let spells: Vec<Spell> = decode_embedded("spells", self.spells.as_deref())?;
        let actions: Vec<ClassAction> =
            decode_embedded("class actions", self.class_actions.as_deref())?;
        let abilities = AbilityScores::new(
            check_ability_score(Ability::Strength, self.strength)?,
            check_ability_score(Ability::Dexterity, self.dexterity)?,
            check_ability_score(Ability::Constitution, self.constitution)?,
            check_ability_score(Ability::Intelligence, self.intelligence)?,
            check_ability_score(Ability::Wisdom, self.wisdom)?,
            check_ability_score(Ability::Charisma, self.charisma)?,
        );

        let character = Character {
            id: self.id,
            name: self.name,
            species: self.species,
            background: self.background,
            class: self.character_class.map(ClassRecord::into_class),
            level: Level::new(self.level)?,
            hit_points: HitPoints {
                current: self.current_hp,
                maximum: self.max_hp,
                temporary: self.temporary_hp,
            },
            speed: self.speed,
            abilities,
            skills,
            weapons,
            coins,
            items,
            spell_slots: SpellSlots::from_slots(slots),
            spells,
            class_actions: ClassActions::from_actions(actions),
            details: self.details,
            created_at: self.created_at,
        };
        character.validate()?;
        Ok(character)
    }

    /// Encode a character, filling in derived modifier fields.
    pub fn from_character(character: &Character) -> Result<Self, RecordError> {
        let abilities = &character.abilities;
        let skills: Vec<SkillRecord> = character
            .skills
            .iter()
            .map(|entry| SkillRecord {
                name: entry.name.name().to_string(),
                ability: entry.ability().name().to_string(),
                proficiency: entry.proficiency,
                other: entry.other,
            })
            .collect();

        Ok(Self {
            id: character.id,
            name: character.name.clone(),
            species: character.species.clone(),
            background: character.background.clone(),
            character_class: character.class.as_ref().map(ClassRecord::from_class),
            level: character.level.get(),
            temporary_hp: character.hit_points.temporary,
            current_hp: character.hit_points.current,
            max_hp: character.hit_points.maximum,
            speed: character.speed,
            strength: i32::from(abilities.strength),
            dexterity: i32::from(abilities.dexterity),
            constitution: i32::from(abilities.constitution),
            intelligence: i32::from(abilities.intelligence),
            wisdom: i32::from(abilities.wisdom),
            charisma: i32::from(abilities.charisma),
            strength_modifier: rules::modifier(i32::from(abilities.strength)),
            dexterity_modifier: rules::modifier(i32::from(abilities.dexterity)),
            constitution_modifier: rules::modifier(i32::from(abilities.constitution)),
            intelligence_modifier: rules::modifier(i32::from(abilities.intelligence)),
            wisdom_modifier: rules::modifier(i32::from(abilities.wisdom)),
            charisma_modifier: rules::modifier(i32::from(abilities.charisma)),
            coins: Some(serde_json::to_string(&character.coins)?),
            items: Some(serde_json::to_string(&character.items)?),
            details: character.details.clone(),
            skills: Some(SkillsField::Encoded(serde_json::to_string(&skills)?)),
            weapons: Some(serde_json::to_string(&character.weapons)?),
            spell_slots: Some(serde_json::to_string(&character.spell_slots)?),
            spells: Some(serde_json::to_string(&character.spells)?),
            class_actions: Some(serde_json::to_string(&character.class_actions)?),
            created_at: character.created_at.clone(),
        })
    }
}

impl ClassRecord {
    fn into_class(self) -> CharacterClass {
        let hit_die = Dice::parse(&self.hit_die).unwrap_or_else(|_| hit_die_for(&self.name));
        CharacterClass {
            id: self.id,
            name: self.name,
            hit_die,
            features: self
                .features
                .into_iter()
                .map(|f| ClassFeature {
                    id: f.id,
                    title: f.title,
                    description: f.description,
                    level: f.level,
                })
                .collect(),
        }
    }

    fn from_class(class: &CharacterClass) -> Self {
        let hit_die = if class.hit_die.count() == 1 {
            format!("d{}", class.hit_die.sides())
        } else {
            class.hit_die.to_string()
        };
        Self {
            id: class.id.clone(),
            name: class.name.clone(),
            hit_die,
            features: class
                .features
                .iter()
                .map(|f| ClassFeatureRecord {
                    id: f.id.clone(),
                    title: f.title.clone(),
                    description: f.description.clone(),
                    level: f.level,
                })
                .collect(),
        }
    }
}

fn default_level() -> i32 {
    1
}

fn is_absent(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None => true,
        Some(s) => s.is_empty() || s == "null" || s == "undefined",
    }
}

/// Decode a string-encoded sub-record, defaulting when it is absent.
fn decode_embedded<T>(field: &'static str, raw: Option<&str>) -> Result<T, RecordError>
where
    T: DeserializeOwned + Default,
{
    match raw {
        Some(json) if !is_absent(raw) => serde_json::from_str(json)
            .map_err(|source| RecordError::InvalidField { field, source }),
        _ => {
            debug!(field, "no stored value, using defaults");
            Ok(T::default())
        }
    }
}

fn decode_skills(field: Option<&SkillsField>) -> Result<Vec<SkillEntry>, RecordError> {
    let records: Vec<SkillRecord> = match field {
        Some(SkillsField::Encoded(json)) => decode_embedded("skills", Some(json.as_str()))?,
        Some(SkillsField::Inline(value)) if !value.is_null() => {
            serde_json::from_value(value.clone())
                .map_err(|source| RecordError::InvalidField {
                    field: "skills",
                    source,
                })?
        }
        _ => Vec::new(),
    };

    let mut entries: Vec<SkillEntry> = Vec::with_capacity(records.len());
    for record in records {
        match record.name.parse() {
            Ok(skill) => {
                let entry = SkillEntry {
                    name: skill,
                    proficiency: record.proficiency,
                    other: record.other,
                };
                // Names are unique; a later duplicate replaces the earlier one.
                match entries.iter_mut().find(|e| e.name == skill) {
                    Some(existing) => *existing = entry,
                    None => entries.push(entry),
                }
            }
            Err(_) => warn!(skill = %record.name, "dropping unrecognised skill"),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Ability, Skill};

    const RECORD: &str = r#"{
        "id": 7,
        "name": "Vex",
        "species": {"id": "s1", "name": "Elf", "traits": [{"id": "t1", "title": "Darkvision", "description": "60 ft"}]},
        "background": {"id": "b1", "name": "Sage", "features": []},
        "characterClass": {"id": "c1", "name": "Wizard", "hitDie": "d6", "features": [
            {"id": "f1", "title": "Scholar", "description": "", "level": 2}
        ]},
        "level": 3,
        "temporaryHp": 0, "currentHp": 14, "maxHp": 17, "speed": 30,
        "strength": 8, "dexterity": 14, "constitution": 13,
        "intelligence": 17, "wisdom": 12, "charisma": 10,
        "strengthModifier": 99,
        "coins": "{\"platinum\":0,\"gold\":12,\"electrum\":0,\"silver\":3,\"copper\":0}",
        "items": "[{\"id\":\"i1\",\"name\":\"Spellbook\",\"description\":\"\",\"quantity\":1,\"weight\":3}]",
        "skills": "[{\"name\":\"Arcana\",\"ability\":\"Intelligence\",\"proficiency\":\"expertise\",\"other\":0}]",
        "weapons": "",
        "spellSlots": "null",
        "classActions": "[{\"id\":\"1700000000000\",\"name\":\"Arcane Recovery\",\"description\":\"\",\"gainedFrom\":\"Wizard 1\",\"currentlyUsed\":1,\"maxUses\":1}]",
        "details": "Quiet.",
        "createdAt": "2024-01-01T00:00:00"
    }"#;

    #[test]
    fn test_decode_record() {
        let character = CharacterRecord::from_json(RECORD)
            .unwrap()
            .into_character()
            .unwrap();

        assert_eq!(character.name, "Vex");
        let species = character.species.as_ref().unwrap();
        assert_eq!(species.name, "Elf");
        assert_eq!(species.traits[0].title, "Darkvision");
        assert_eq!(character.level.get(), 3);
        assert_eq!(character.abilities.modifier(Ability::Strength), -1);
        assert_eq!(character.coins.gold, 12);
        assert_eq!(character.items[0].name, "Spellbook");
        assert!(character.weapons.is_empty());
        assert_eq!(character.spell_slots, SpellSlots::default());
        assert!(character.spells.is_empty());
        assert_eq!(character.skill(Skill::Arcana).proficiency, ProficiencyLevel::Expertise);
        // INT +3, expertise at level 3 is +4
        assert_eq!(character.skill_total(Skill::Arcana), 7);

        let class = character.class.as_ref().unwrap();
        assert_eq!(class.hit_die, Dice::new(1, 6).unwrap());
        assert!(class.available_features(3).iter().any(|f| f.title == "Scholar"));
    }

    #[test]
    fn test_inline_skills_and_unknown_names() {
        let json = r#"{"name":"Pip","level":1,"skills":[
            {"name":"Stealth","proficiency":"proficient","other":1},
            {"name":"Basket Weaving","proficiency":"expertise","other":0},
            {"name":"Stealth","proficiency":"expertise","other":2}
        ]}"#;
        let character = CharacterRecord::from_json(json)
            .unwrap()
            .into_character()
            .unwrap();
        assert_eq!(character.skills.len(), 1);
        assert_eq!(character.skill(Skill::Stealth).proficiency, ProficiencyLevel::Expertise);
        assert_eq!(character.skill(Skill::Stealth).other, 2);
    }

    #[test]
    fn test_malformed_embedded_field() {
        let json = r#"{"name":"Pip","level":1,"weapons":"[{broken"}"#;
        let err = CharacterRecord::from_json(json)
            .unwrap()
            .into_character()
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { field: "weapons", .. }));
        assert!(err.to_string().starts_with("Invalid weapons JSON format"));
    }

    #[test]
    fn test_invalid_level_and_negative_hp() {
        let err = CharacterRecord::from_json(r#"{"name":"Pip","level":0}"#)
            .unwrap()
            .into_character()
            .unwrap_err();
        assert_eq!(err.to_string(), "Level must be between 1 and 20");

        let err = CharacterRecord::from_json(r#"{"name":"Pip","level":2,"maxHp":-3}"#)
            .unwrap()
            .into_character()
            .unwrap_err();
        assert_eq!(err.to_string(), "Maximum HP cannot be negative");
    }

    #[test]
    fn test_round_trip_keeps_api_data() {
        let character = CharacterRecord::from_json(RECORD)
            .unwrap()
            .into_character()
            .unwrap();
        let recovery = character.class_actions.get("1700000000000").unwrap();
        assert_eq!(recovery.name, "Arcane Recovery");
        assert_eq!(recovery.remaining(), 0);

        let json = CharacterRecord::from_character(&character)
            .unwrap()
            .to_json()
            .unwrap();
        let record = CharacterRecord::from_json(&json).unwrap();

        let species = record.species.as_ref().unwrap();
        assert_eq!(species.id.as_deref(), Some("s1"));
        assert_eq!(species.traits[0].title, "Darkvision");
        assert_eq!(species.traits[0].description, "60 ft");
        assert_eq!(record.background.as_ref().unwrap().id.as_deref(), Some("b1"));

        let class = record.character_class.as_ref().unwrap();
        assert_eq!(class.id.as_deref(), Some("c1"));
        assert_eq!(class.features[0].id.as_deref(), Some("f1"));
        assert_eq!(record.created_at.as_deref(), Some("2024-01-01T00:00:00"));

        let actions = record.class_actions.as_deref().unwrap();
        assert!(actions.contains("\"name\":\"Arcane Recovery\""));
        assert!(actions.contains("\"gainedFrom\":\"Wizard 1\""));
        assert_eq!(record.into_character().unwrap(), character);
    }

    #[test]
    fn test_negative_ability_score_uses_backend_message() {
        let err = CharacterRecord::from_json(r#"{"name":"Pip","strength":-1,"dexterity":10}"#)
            .unwrap()
            .into_character()
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::Character(CharacterError::Negative {
                field: "Strength",
                value: -1
            })
        ));
        assert_eq!(err.to_string(), "Strength cannot be negative");

        let err = CharacterRecord::from_json(r#"{"name":"Pip","wisdom":300}"#)
            .unwrap()
            .into_character()
            .unwrap_err();
        assert_eq!(err.to_string(), "Wisdom must be between 0 and 99");
    }

    #[test]
    fn test_encode_recomputes_modifiers() {
        let character = CharacterRecord::from_json(RECORD)
            .unwrap()
            .into_character()
            .unwrap();
        let record = CharacterRecord::from_character(&character).unwrap();
        assert_eq!(record.strength_modifier, -1);
        assert_eq!(record.intelligence_modifier, 3);
        assert_eq!(record.character_class.as_ref().unwrap().hit_die, "d6");

        let skills = match record.skills.as_ref().unwrap() {
            SkillsField::Encoded(json) => json.clone(),
            other => panic!("expected encoded skills, got {other:?}"),
        };
        assert!(skills.contains("\"ability\":\"Intelligence\""));
        assert!(skills.contains("\"proficiency\":\"expertise\""));

        let again = CharacterRecord::from_json(&record.to_json().unwrap())
            .unwrap()
            .into_character()
            .unwrap();
        assert_eq!(again.skills, character.skills);
        assert_eq!(again.coins, character.coins);
    }
}
