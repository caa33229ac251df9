//! Game state and turn resolution.

pub mod dice;
mod resolve;

use serde::{Deserialize, Serialize};

use crate::models::{PerPlayer, PlayerId, Space};

pub use dice::{RollSource, ScriptedDice, SeededDice};
pub use resolve::{resolve_roll, RollOutcome, Rolls};

/// Everything that changes over the course of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Where each player stands.
    pub positions: PerPlayer<Space>,
    /// Player whose turn it is, `None` once the game has been won.
    pub turn: Option<PlayerId>,
    /// Pending Hotel penalties.
    pub skip_turns: PerPlayer<bool>,
    /// Human-readable history, oldest first.
    #[serde(default)]
    pub log: Vec<String>,
}

impl GameState {
    /// Fresh game with both players on the start space.
    pub fn new(initial_turn: PlayerId) -> Self {
        Self {
            positions: PerPlayer::splat(Space::START),
            turn: Some(initial_turn),
            skip_turns: PerPlayer::splat(false),
            log: Vec::new(),
        }
    }

    /// Player standing on the finish, if any.
    pub fn winner(&self) -> Option<PlayerId> {
        self.positions
            .iter()
            .find(|(_, space)| space.is_finish())
            .map(|(player, _)| player)
    }

    /// Whether no further rolls are accepted.
    pub fn is_over(&self) -> bool {
        self.turn.is_none()
    }

    /// Players standing on `space`.
    pub fn players_on(&self, space: Space) -> impl Iterator<Item = PlayerId> + '_ {
        self.positions
            .iter()
            .filter(move |(_, position)| **position == space)
            .map(|(player, _)| player)
    }
}
