//! Dice sources.
//!
//! Each game owns its dice. Production games use [`RandomDice`]; tests and
//! replays inject [`ScriptedDice`] to force specific rolls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// A six-sided die.
pub trait Dice: Send + std::fmt::Debug {
    /// Returns a value in `1..=6`.
    fn roll(&mut self) -> u8;
}

/// Uniform die backed by a per-game seeded RNG.
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    /// Seeds from the operating system.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Seeds deterministically.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice for RandomDice {
    fn roll(&mut self) -> u8 {
        self.rng.gen_range(1..=6)
    }
}

/// Die that replays a fixed sequence of values.
///
/// Values are clamped into `1..=6`. Once the script runs out the sequence
/// starts over; an empty script always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: Vec<u8>,
    pending: VecDeque<u8>,
}

impl ScriptedDice {
    /// Creates a die that yields `rolls` in order, then repeats them.
    pub fn new(rolls: impl IntoIterator<Item = u8>) -> Self {
        let script: Vec<u8> = rolls.into_iter().map(|r| r.clamp(1, 6)).collect();
        Self {
            pending: script.iter().copied().collect(),
            script,
        }
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> u8 {
        if self.pending.is_empty() {
            self.pending.extend(self.script.iter().copied());
        }
        self.pending.pop_front().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_dice_stay_in_range() {
        let mut dice = RandomDice::seeded(7);
        for _ in 0..1000 {
            let value = dice.roll();
            assert!((1..=6).contains(&value));
        }
    }

    #[test]
    fn test_seeded_dice_are_reproducible() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);
        let left: Vec<u8> = (0..20).map(|_| a.roll()).collect();
        let right: Vec<u8> = (0..20).map(|_| b.roll()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_scripted_dice_cycle_and_clamp() {
        let mut dice = ScriptedDice::new([6, 9, 0]);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 1);
        assert_eq!(dice.roll(), 6);
    }

    #[test]
    fn test_empty_script_rolls_one() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.roll(), 1);
    }
}
