//! Inventory weight and carrying capacity.
//!
//! The free functions use [`SheetConfig::default`]; the `_with` variants take
//! an explicit configuration.

use crate::config::SheetConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Coins
// ============================================================================

/// Coin denominations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Denomination {
    Platinum,
    Gold,
    Electrum,
    Silver,
    Copper,
}

impl Denomination {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Denomination::Platinum => "pp",
            Denomination::Gold => "gp",
            Denomination::Electrum => "ep",
            Denomination::Silver => "sp",
            Denomination::Copper => "cp",
        }
    }

    pub fn all() -> [Denomination; 5] {
        [
            Denomination::Platinum,
            Denomination::Gold,
            Denomination::Electrum,
            Denomination::Silver,
            Denomination::Copper,
        ]
    }
}

/// Coin purse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Coins {
    pub platinum: u32,
    pub gold: u32,
    pub electrum: u32,
    pub silver: u32,
    pub copper: u32,
}

impl Coins {
    pub fn get(&self, denomination: Denomination) -> u32 {
        match denomination {
            Denomination::Platinum => self.platinum,
            Denomination::Gold => self.gold,
            Denomination::Electrum => self.electrum,
            Denomination::Silver => self.silver,
            Denomination::Copper => self.copper,
        }
    }

    /// Set a denomination, clamping to `[0, config.max_coins]`.
    pub fn set(&mut self, denomination: Denomination, value: i64, config: &SheetConfig) {
        let value = value.clamp(0, i64::from(config.max_coins)) as u32;
        match denomination {
            Denomination::Platinum => self.platinum = value,
            Denomination::Gold => self.gold = value,
            Denomination::Electrum => self.electrum = value,
            Denomination::Silver => self.silver = value,
            Denomination::Copper => self.copper = value,
        }
    }

    /// Number of coins across all denominations.
    pub fn count(&self) -> u64 {
        Denomination::all()
            .iter()
            .map(|d| u64::from(self.get(*d)))
            .sum()
    }
}

// ============================================================================
// Items
// ============================================================================

/// An inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub quantity: u32,
    /// Weight of one unit, in pounds.
    pub weight: f64,
}

impl InventoryItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            quantity: 1,
            weight: 0.0,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight.max(0.0);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn line_weight(&self) -> f64 {
        f64::from(self.quantity) * self.weight
    }
}

impl Default for InventoryItem {
    fn default() -> Self {
        Self::new("")
    }
}

// ============================================================================
// Weight rules
// ============================================================================

pub fn coins_weight(coins: &Coins) -> f64 {
    coins_weight_with(coins, &SheetConfig::default())
}

pub fn coins_weight_with(coins: &Coins, config: &SheetConfig) -> f64 {
    coins.count() as f64 * config.coin_weight
}

pub fn items_weight(items: &[InventoryItem]) -> f64 {
    items.iter().map(InventoryItem::line_weight).sum()
}

pub fn total_weight(items: &[InventoryItem], coins: &Coins) -> f64 {
    items_weight(items) + coins_weight(coins)
}

pub fn carrying_capacity(strength: i32) -> i32 {
    carrying_capacity_with(strength, &SheetConfig::default())
}

pub fn carrying_capacity_with(strength: i32, config: &SheetConfig) -> i32 {
    config.capacity_per_strength * strength
}

/// Load as a percentage of capacity, unclamped.
///
/// A non-positive capacity is 0% when nothing is carried and unbounded
/// otherwise.
pub fn load_ratio(total_weight: f64, carrying_capacity: i32) -> f64 {
    if carrying_capacity <= 0 {
        return if total_weight > 0.0 { f64::INFINITY } else { 0.0 };
    }
    total_weight / f64::from(carrying_capacity) * 100.0
}

/// Load percentage for display, clamped to `[0, 100]`.
pub fn load_percentage(total_weight: f64, carrying_capacity: i32) -> f64 {
    load_ratio(total_weight, carrying_capacity).clamp(0.0, 100.0)
}

/// How close a character is to their carrying capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadState {
    Normal,
    EncumberedWarning,
    Overloaded,
}

impl LoadState {
    /// Classify an unclamped load percentage.
    pub fn classify(percent: f64, config: &SheetConfig) -> LoadState {
        if percent > config.overload_percent {
            LoadState::Overloaded
        } else if percent > config.warning_percent {
            LoadState::EncumberedWarning
        } else {
            LoadState::Normal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadState::Normal => "normal",
            LoadState::EncumberedWarning => "encumbered-warning",
            LoadState::Overloaded => "overloaded",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn load_state(total_weight: f64, carrying_capacity: i32) -> LoadState {
    LoadState::classify(
        load_ratio(total_weight, carrying_capacity),
        &SheetConfig::default(),
    )
}

/// Everything the inventory view shows about carried weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encumbrance {
    pub items_weight: f64,
    pub coins_weight: f64,
    pub total_weight: f64,
    pub capacity: i32,
    /// Clamped to `[0, 100]`.
    pub percentage: f64,
    pub state: LoadState,
}

impl Encumbrance {
    pub fn compute(
        items: &[InventoryItem],
        coins: &Coins,
        strength: u8,
        config: &SheetConfig,
    ) -> Self {
        let items_weight = items_weight(items);
        let coins_weight = coins_weight_with(coins, config);
        let total_weight = items_weight + coins_weight;
        let capacity = carrying_capacity_with(i32::from(strength), config);
        let ratio = load_ratio(total_weight, capacity);
        Self {
            items_weight,
            coins_weight,
            total_weight,
            capacity,
            percentage: ratio.clamp(0.0, 100.0),
            state: LoadState::classify(ratio, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_coins_weight_ignores_denomination() {
        let coins = Coins {
            platinum: 10,
            gold: 20,
            electrum: 5,
            silver: 15,
            copper: 50,
        };
        assert_eq!(coins.count(), 100);
        assert!(approx(coins_weight(&coins), 2.0));
    }

    #[test]
    fn test_coin_set_clamps() {
        let config = SheetConfig::default();
        let mut coins = Coins::default();
        coins.set(Denomination::Gold, -5, &config);
        assert_eq!(coins.gold, 0);
        coins.set(Denomination::Gold, 50_000_000, &config);
        assert_eq!(coins.gold, 9_999_999);
        coins.set(Denomination::Copper, 42, &config);
        assert_eq!(coins.get(Denomination::Copper), 42);
    }

    #[test]
    fn test_items_weight() {
        let items = vec![
            InventoryItem::new("Rope").with_quantity(2).with_weight(10.0),
            InventoryItem::new("Torch").with_quantity(5).with_weight(1.0),
            InventoryItem::new("Map").with_quantity(0).with_weight(3.0),
        ];
        assert!(approx(items_weight(&items), 25.0));
        assert!(approx(items_weight(&[]), 0.0));

        let coins = Coins {
            gold: 50,
            ..Coins::default()
        };
        assert!(approx(total_weight(&items, &coins), 26.0));
    }

    #[test]
    fn test_carrying_capacity() {
        assert_eq!(carrying_capacity(10), 150);
        assert_eq!(carrying_capacity(18), 270);
        assert_eq!(carrying_capacity(0), 0);
    }

    #[test]
    fn test_load_bands() {
        assert_eq!(load_state(100.0, 150), LoadState::Normal);
        assert!((load_percentage(100.0, 150) - 66.666).abs() < 0.01);

        assert_eq!(load_state(130.0, 150), LoadState::EncumberedWarning);
        assert!((load_percentage(130.0, 150) - 86.666).abs() < 0.01);

        assert_eq!(load_state(200.0, 150), LoadState::Overloaded);
        assert!(approx(load_percentage(200.0, 150), 100.0));
        assert!(load_ratio(200.0, 150) > 133.0);
    }

    #[test]
    fn test_load_band_edges() {
        assert_eq!(load_state(120.0, 150), LoadState::Normal);
        assert_eq!(load_state(150.0, 150), LoadState::EncumberedWarning);
        assert_eq!(load_state(150.5, 150), LoadState::Overloaded);
    }

    #[test]
    fn test_zero_capacity() {
        assert_eq!(load_state(0.0, 0), LoadState::Normal);
        assert!(approx(load_percentage(0.0, 0), 0.0));
        assert_eq!(load_state(1.0, 0), LoadState::Overloaded);
        assert!(approx(load_percentage(1.0, 0), 100.0));
    }

    #[test]
    fn test_encumbrance_summary() {
        let items = vec![InventoryItem::new("Chain mail").with_weight(55.0)];
        let coins = Coins {
            gold: 250,
            ..Coins::default()
        };
        let summary = Encumbrance::compute(&items, &coins, 8, &SheetConfig::default());
        assert_eq!(summary.capacity, 120);
        assert!(approx(summary.total_weight, 60.0));
        assert!(approx(summary.percentage, 50.0));
        assert_eq!(summary.state, LoadState::Normal);
        assert_eq!(summary.state.to_string(), "normal");
    }

    #[test]
    fn test_item_json_shape() {
        let item: InventoryItem =
            serde_json::from_str(r#"{"id":"1","name":"Lamp","quantity":2,"weight":1.5}"#).unwrap();
        assert_eq!(item.description, "");
        assert!(approx(item.line_weight(), 3.0));
    }
}
