//! Dice used to drive roll resolution.
//!
//! Resolution never reaches for a global RNG. Every roll is drawn from a
//! [`RollSource`] handed in by the caller, so a game can be replayed from a
//! seed or scripted in tests.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lowest face on a die.
pub const MIN_FACE: u8 = 1;
/// Highest face on a die.
pub const MAX_FACE: u8 = 6;

/// Anything that can roll a six-sided die.
pub trait RollSource {
    /// Roll one die, returning a face in `1..=6`.
    fn roll_die(&mut self) -> u8;
}

impl<T: RollSource + ?Sized> RollSource for &mut T {
    fn roll_die(&mut self) -> u8 {
        (**self).roll_die()
    }
}

/// Seeded ChaCha8 dice. Same seed, same rolls.
#[derive(Clone, Debug)]
pub struct SeededDice {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SeededDice {
    /// Dice that replay the sequence for `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Dice with a fresh random seed. Read it back with [`SeededDice::seed`].
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Seed this sequence started from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RollSource for SeededDice {
    fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(MIN_FACE..=MAX_FACE)
    }
}

/// Replays a fixed list of faces, wrapping around when it runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    /// Script the given faces. Values outside `1..=6` are clamped.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces
                .into_iter()
                .map(|face| face.clamp(MIN_FACE, MAX_FACE))
                .collect(),
            cursor: 0,
        }
    }

    /// Number of dice rolled so far.
    pub fn rolled(&self) -> usize {
        self.cursor
    }
}

impl RollSource for ScriptedDice {
    fn roll_die(&mut self) -> u8 {
        if self.faces.is_empty() {
            return MIN_FACE;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_are_deterministic() {
        let mut first = SeededDice::new(42);
        let mut second = SeededDice::new(42);
        for _ in 0..100 {
            assert_eq!(first.roll_die(), second.roll_die());
        }
    }

    #[test]
    fn seeded_dice_stay_on_the_die() {
        let mut dice = SeededDice::new(7);
        let faces: Vec<u8> = (0..600).map(|_| dice.roll_die()).collect();
        assert!(faces.iter().all(|face| (MIN_FACE..=MAX_FACE).contains(face)));
        for face in MIN_FACE..=MAX_FACE {
            assert!(faces.contains(&face), "face {face} never rolled");
        }
    }

    #[test]
    fn entropy_dice_report_their_seed() {
        let mut dice = SeededDice::from_entropy();
        let mut replay = SeededDice::new(dice.seed());
        for _ in 0..10 {
            assert_eq!(dice.roll_die(), replay.roll_die());
        }
    }

    #[test]
    fn scripted_dice_clamp_and_wrap() {
        let mut dice = ScriptedDice::new([0, 9, 3]);
        let faces: Vec<u8> = (0..5).map(|_| dice.roll_die()).collect();
        assert_eq!(faces, vec![1, 6, 3, 1, 6]);
        assert_eq!(dice.rolled(), 5);

        let mut empty = ScriptedDice::default();
        assert_eq!(empty.roll_die(), MIN_FACE);
    }
}
