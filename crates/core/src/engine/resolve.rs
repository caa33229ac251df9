use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{dice::RollSource, GameState};
use crate::{
    board::{BoardConfig, EventTag},
    models::{PlayerId, Space},
};

/// Faces rolled by both players in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rolls {
    /// Player 1's die.
    pub player_one: u8,
    /// Player 2's die.
    pub player_two: u8,
}

impl Rolls {
    /// The player who rolled higher, `None` on a tie.
    pub fn leader(&self) -> Option<PlayerId> {
        match self.player_one.cmp(&self.player_two) {
            Ordering::Greater => Some(PlayerId::One),
            Ordering::Less => Some(PlayerId::Two),
            Ordering::Equal => None,
        }
    }

    /// Higher of the two faces.
    pub fn high(&self) -> u8 {
        self.player_one.max(self.player_two)
    }
}

/// What a roll request did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollOutcome {
    /// The game was already over; nothing changed.
    GameOver,
    /// The turn holder served a Hotel penalty. No dice were rolled.
    Skipped {
        /// Player who lost the turn.
        player: PlayerId,
    },
    /// Equal faces; nobody moved.
    Tie {
        /// Faces rolled.
        rolls: Rolls,
    },
    /// The higher roller moved and the game goes on.
    Moved {
        /// Player who moved.
        mover: PlayerId,
        /// Faces rolled.
        rolls: Rolls,
        /// Where the mover ended up after board events.
        position: Space,
    },
    /// The higher roller reached the finish.
    Won {
        /// Player on the finish.
        winner: PlayerId,
        /// Faces rolled.
        rolls: Rolls,
    },
}

/// Resolve one roll request, returning the next state.
///
/// Same as [`GameState::apply_roll`] but consumes and returns the state.
pub fn resolve_roll<D: RollSource>(
    mut state: GameState,
    board: &BoardConfig,
    dice: &mut D,
) -> (GameState, RollOutcome) {
    let outcome = state.apply_roll(board, dice);
    (state, outcome)
}

impl GameState {
    /// Resolve one roll request in place.
    ///
    /// Both players roll every cycle and the higher face moves, whoever holds
    /// the turn. The turn only decides who may serve a Hotel penalty and who
    /// holds the next turn. Calling this on a finished game is a no-op.
    pub fn apply_roll<D: RollSource>(&mut self, board: &BoardConfig, dice: &mut D) -> RollOutcome {
        let Some(turn) = self.turn else {
            return RollOutcome::GameOver;
        };

        if self.skip_turns[turn] {
            self.log
                .push(format!("{turn} skips this turn due to Hotel event."));
            self.skip_turns[turn] = false;
            self.turn = Some(turn.other());
            debug!(player = %turn, "Turn skipped");
            return RollOutcome::Skipped { player: turn };
        }

        let rolls = Rolls {
            player_one: dice.roll_die(),
            player_two: dice.roll_die(),
        };
        self.log.push(format!(
            "Player 1 rolls {}, Player 2 rolls {}.",
            rolls.player_one, rolls.player_two
        ));

        let Some(mover) = rolls.leader() else {
            self.log.push("It's a tie! No one moves.".to_string());
            self.turn = Some(turn.other());
            debug!(face = rolls.player_one, "Tie");
            return RollOutcome::Tie { rolls };
        };

        let landed = self.positions[mover].advance(rolls.high());
        self.positions[mover] = landed;
        self.log.push(format!("{mover} moves to space {landed}."));

        let position = self.apply_events(mover, board.events_at(landed));

        if position.is_finish() {
            self.log.push(format!("🎉 {mover} wins the game! 🎉"));
            self.turn = None;
            info!(winner = %mover, "Game won");
            return RollOutcome::Won {
                winner: mover,
                rolls,
            };
        }

        self.turn = Some(turn.other());
        debug!(player = %mover, position = position.get(), "Moved");
        RollOutcome::Moved {
            mover,
            rolls,
            position,
        }
    }

    // Each event sees the position left by the one before it.
    fn apply_events(&mut self, mover: PlayerId, events: &[EventTag]) -> Space {
        let mut position = self.positions[mover];
        for event in events {
            match event {
                EventTag::Troll => {
                    position = position.retreat(EventTag::TROLL_SETBACK);
                    self.positions[mover] = position;
                    self.log.push(format!(
                        "{mover} encountered a Troll and moves back to {position}."
                    ));
                }
                EventTag::Hotel => {
                    self.skip_turns[mover] = true;
                    self.log.push(format!(
                        "{mover} landed on a Hotel and will skip their next turn."
                    ));
                }
                EventTag::Shortcut => {
                    position = position.advance(EventTag::SHORTCUT_BONUS);
                    self.positions[mover] = position;
                    self.log.push(format!(
                        "{mover} found a Shortcut and advances to {position}."
                    ));
                }
                EventTag::Other(_) => {}
            }
        }
        position
    }
}
