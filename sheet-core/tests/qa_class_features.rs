//! QA tests for class features, class actions and spell slot bookkeeping.
//!
//! Run with: `cargo test -p sheet-core --test qa_class_features`

use sheet_core::testing::sample_character;
use sheet_core::{hit_die_for, Character, CharacterClass, ClassAction, Dice, Level, SpellSlots};

// =============================================================================
// TEST 1: Level-gated features
// =============================================================================

#[test]
fn test_fighter_features_unlock_with_level() {
    let mut character = Character::new("Brakka");
    character.class = Some(CharacterClass::named("Fighter").unwrap());
    let class = character.class.as_ref().unwrap();

    let titles = |level: i32| -> Vec<String> {
        class
            .available_features(level)
            .iter()
            .map(|f| f.title.clone())
            .collect()
    };

    assert_eq!(titles(character.level.get()).len(), 3);
    assert!(!titles(1).contains(&"Action Surge".to_string()));
    assert!(class.has_locked_features(character.level.get()));

    character.level = Level::new(2).unwrap();
    assert!(titles(character.level.get()).contains(&"Action Surge".to_string()));
    assert!(!class.has_locked_features(character.level.get()));
}

#[test]
fn test_hit_dice_by_class() {
    assert_eq!(CharacterClass::named("Wizard").unwrap().hit_die, Dice::new(1, 6).unwrap());
    assert_eq!(hit_die_for("Paladin"), Dice::new(1, 10).unwrap());
    assert_eq!(hit_die_for("Cleric"), Dice::new(1, 8).unwrap());
}

// =============================================================================
// TEST 2: Spell slots
// =============================================================================

#[test]
fn test_spending_and_resting() {
    let mut slots = SpellSlots::default();
    assert!(slots.set_max(1, 4));
    assert!(slots.set_max(2, 2));

    assert!(slots.expend(2));
    assert!(slots.expend(2));
    assert!(!slots.expend(2));
    assert_eq!(slots.get(2).unwrap().remaining(), 0);

    assert!(!slots.expend(3));
    assert!(!slots.set_max(10, 1));

    slots.reset_used();
    assert!(slots.iter().all(|slot| slot.used == 0));
    assert_eq!(slots.get(1).unwrap().remaining(), 4);
}

#[test]
fn test_over_used_slots_report_negative() {
    let mut slots = SpellSlots::default();
    slots.set_max(3, 1);
    slots.set_used(3, 3);
    let slot = slots.get(3).unwrap();
    assert!(slot.is_over_used());
    assert_eq!(slot.remaining(), -2);

    slots.set_used(3, 500);
    assert_eq!(slots.get(3).unwrap().used, 99);
}

// =============================================================================
// TEST 3: Class actions
// =============================================================================

#[test]
fn test_second_wind_between_rests() {
    let mut character = sample_character("Roland");
    let id = character
        .class_actions
        .iter()
        .find(|action| action.name == "Second Wind")
        .map(|action| action.id.clone())
        .unwrap();

    assert!(character.class_actions.expend(&id));
    assert!(character.class_actions.expend(&id));
    assert!(!character.class_actions.expend(&id));

    character.class_actions.reset_used();
    assert_eq!(character.class_actions.get(&id).unwrap().remaining(), 2);
}

#[test]
fn test_tracking_new_actions() {
    let mut character = sample_character("Roland");
    let surge = character
        .class_actions
        .add(ClassAction::new("Action Surge").with_max_uses(1));
    assert_eq!(character.class_actions.len(), 2);

    assert!(character.class_actions.expend(&surge));
    assert!(character.class_actions.remove(&surge));
    assert_eq!(character.class_actions.len(), 1);
    assert!(character.class_actions.get(&surge).is_none());
}
