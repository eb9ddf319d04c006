//! Dice notation and rolling.
//!
//! Supports the plain `NdM` notation used for weapon damage and hit dice
//! (`2d6`, `d8`). All rolling goes through a [`RandomSource`] supplied by the
//! caller so results can be reproduced in tests.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice expression: {0:?}")]
    InvalidDiceExpression(String),
}

/// A source of uniformly distributed die faces.
///
/// Every `rand::Rng` is a `RandomSource`, so `rand::thread_rng()` or a seeded
/// `StdRng` can be passed wherever one is expected. Deterministic doubles live
/// in [`crate::testing`].
pub trait RandomSource {
    /// Return a value in `[1, sides]`. `sides` is always at least 1.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng> RandomSource for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Roll a single d20.
pub fn roll_d20<R: RandomSource + ?Sized>(rng: &mut R) -> u32 {
    rng.roll_die(20)
}

/// Most dice a single expression may roll.
pub const MAX_DICE_COUNT: u32 = 1000;
/// Most faces a single die may have.
pub const MAX_DICE_SIDES: u32 = 1000;

/// A parsed `NdM` dice expression.
///
/// Count is at most [`MAX_DICE_COUNT`] and sides are in
/// `[1, MAX_DICE_SIDES]`, so a roll always fits in a `u32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dice {
    count: u32,
    sides: u32,
}

impl Dice {
    pub fn new(count: u32, sides: u32) -> Result<Self, DiceError> {
        if count > MAX_DICE_COUNT || sides == 0 || sides > MAX_DICE_SIDES {
            return Err(DiceError::InvalidDiceExpression(format!("{count}d{sides}")));
        }
        Ok(Self { count, sides })
    }

    /// One die with `sides` faces, for built-in tables.
    pub(crate) const fn single(sides: u32) -> Self {
        Self { count: 1, sides }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Parse `NdM` or `dM` notation. `N` defaults to 1 when omitted.
    pub fn parse(expr: &str) -> Result<Self, DiceError> {
        let invalid = || DiceError::InvalidDiceExpression(expr.to_string());
        let notation = expr.trim().to_lowercase();

        let (count_str, sides_str) = notation.split_once('d').ok_or_else(invalid)?;
        if !count_str.chars().all(|c| c.is_ascii_digit())
            || sides_str.is_empty()
            || !sides_str.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| invalid())?
        };
        let sides: u32 = sides_str.parse().map_err(|_| invalid())?;

        Dice::new(count, sides).map_err(|_| invalid())
    }

    /// The same dice with the count doubled (`1d8` -> `2d8`).
    ///
    /// Fails when the doubled count exceeds [`MAX_DICE_COUNT`].
    pub fn doubled(&self) -> Result<Dice, DiceError> {
        Dice::new(self.count * 2, self.sides)
    }

    /// Roll every die and keep the individual faces for display.
    pub fn roll<R: RandomSource + ?Sized>(&self, rng: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count).map(|_| rng.roll_die(self.sides)).collect();
        let total = rolls.iter().fold(0u32, |sum, face| sum.saturating_add(*face));
        DiceRoll {
            dice: *self,
            rolls,
            total,
        }
    }
}

impl TryFrom<String> for Dice {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Dice::parse(&value)
    }
}

impl From<Dice> for String {
    fn from(dice: Dice) -> Self {
        dice.to_string()
    }
}

impl FromStr for Dice {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dice::parse(s)
    }
}

impl fmt::Display for Dice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// Result of rolling a [`Dice`] expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub dice: Dice,
    pub rolls: Vec<u32>,
    pub total: u32,
}

impl DiceRoll {
    /// Individual faces, e.g. `[3, 5]`.
    pub fn faces_display(&self) -> String {
        let faces: Vec<String> = self.rolls.iter().map(|r| r.to_string()).collect();
        format!("[{}]", faces.join(", "))
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} = {}", self.dice, self.faces_display(), self.total)
    }
}

/// Parse a dice expression into its count and sides.
pub fn parse_dice(expr: &str) -> Result<Dice, DiceError> {
    Dice::parse(expr)
}

/// Roll a dice expression and return the summed faces.
pub fn roll_dice<R: RandomSource + ?Sized>(expr: &str, rng: &mut R) -> Result<u32, DiceError> {
    Ok(Dice::parse(expr)?.roll(rng).total)
}

/// Return `expr` with its dice count doubled, in canonical `NdM` form.
pub fn doubled_dice(expr: &str) -> Result<String, DiceError> {
    Ok(Dice::parse(expr)?.doubled()?.to_string())
}
