//! Spell slots and the character's spell list.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MAX_SPELL_LEVEL: u8 = 9;
pub const MAX_SLOT_COUNT: u32 = 99;

/// Slots for one spell level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlot {
    pub level: u8,
    pub used: u32,
    pub max: u32,
}

impl SpellSlot {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            used: 0,
            max: 0,
        }
    }

    /// Slots left. Negative when more have been used than are available.
    pub fn remaining(&self) -> i64 {
        i64::from(self.max) - i64::from(self.used)
    }

    pub fn is_over_used(&self) -> bool {
        self.used > self.max
    }
}

/// Slots for levels 1 through 9.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellSlots(Vec<SpellSlot>);

impl SpellSlots {
    /// Build from stored slots, filling in any missing levels.
    pub fn from_slots(slots: Vec<SpellSlot>) -> Self {
        let mut all = Self::default();
        for slot in slots {
            if let Some(existing) = all.get_mut(slot.level) {
                *existing = slot;
            }
        }
        all
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellSlot> {
        self.0.iter()
    }

    pub fn get(&self, level: u8) -> Option<&SpellSlot> {
        self.0.iter().find(|slot| slot.level == level)
    }

    fn get_mut(&mut self, level: u8) -> Option<&mut SpellSlot> {
        self.0.iter_mut().find(|slot| slot.level == level)
    }

    /// Set slots used at `level`, clamped to `[0, 99]`. Returns false for an
    /// unknown level.
    pub fn set_used(&mut self, level: u8, used: i64) -> bool {
        match self.get_mut(level) {
            Some(slot) => {
                slot.used = used.clamp(0, i64::from(MAX_SLOT_COUNT)) as u32;
                true
            }
            None => false,
        }
    }

    /// Set the slot maximum at `level`, clamped to `[0, 99]`.
    pub fn set_max(&mut self, level: u8, max: i64) -> bool {
        match self.get_mut(level) {
            Some(slot) => {
                slot.max = max.clamp(0, i64::from(MAX_SLOT_COUNT)) as u32;
                true
            }
            None => false,
        }
    }

    /// Spend a slot. Returns false, changing nothing, if none remain.
    pub fn expend(&mut self, level: u8) -> bool {
        match self.get_mut(level) {
            Some(slot) if slot.remaining() > 0 => {
                slot.used += 1;
                true
            }
            _ => false,
        }
    }

    /// Mark every slot unused, as after a long rest.
    pub fn reset_used(&mut self) {
        for slot in &mut self.0 {
            slot.used = 0;
        }
    }
}

impl Default for SpellSlots {
    fn default() -> Self {
        Self((1..=MAX_SPELL_LEVEL).map(SpellSlot::new).collect())
    }
}

/// A spell on the character's list. Text fields hold whatever was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub cast_time: String,
    pub gained_from: String,
    pub target_area: String,
    pub range: String,
    pub duration: String,
    pub description: String,
    pub material_components: String,
    pub school: String,
    pub prepared: String,
    pub spell_level: String,
    pub concentration: bool,
    pub ritual: bool,
    pub verbal: bool,
    pub somatic: bool,
    pub material: bool,
}

impl Spell {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ..Self::blank()
        }
    }

    fn blank() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            cast_time: String::new(),
            gained_from: String::new(),
            target_area: String::new(),
            range: String::new(),
            duration: String::new(),
            description: String::new(),
            material_components: String::new(),
            school: String::new(),
            prepared: String::new(),
            spell_level: String::new(),
            concentration: false,
            ritual: false,
            verbal: false,
            somatic: false,
            material: false,
        }
    }

    /// Component letters, e.g. `"V, S, M"`.
    pub fn components(&self) -> String {
        let mut parts = Vec::new();
        if self.verbal {
            parts.push("V");
        }
        if self.somatic {
            parts.push("S");
        }
        if self.material {
            parts.push("M");
        }
        parts.join(", ")
    }
}

impl Default for Spell {
    fn default() -> Self {
        Self::new("")
    }
}
