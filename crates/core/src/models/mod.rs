//! Shared domain models.

use std::{
    fmt,
    ops::{Index, IndexMut},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// First seat.
    #[serde(rename = "Player 1")]
    One,
    /// Second seat.
    #[serde(rename = "Player 2")]
    Two,
}

impl PlayerId {
    /// The opponent of this player.
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Display label, as used in the game log.
    pub fn label(self) -> &'static str {
        match self {
            PlayerId::One => "Player 1",
            PlayerId::Two => "Player 2",
        }
    }

    /// Parse a display label back into a player.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Player 1" => Some(PlayerId::One),
            "Player 2" => Some(PlayerId::Two),
            _ => None,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a raw value does not name a space on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("space {0} is outside the track (1..=20)")]
pub struct SpaceOutOfRange(pub u8);

/// A position on the track. Always within `1..=20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Space(u8);

impl Space {
    /// Where both players begin.
    pub const START: Space = Space(1);
    /// Reaching this space wins the game.
    pub const FINISH: Space = Space(20);

    /// Build a space, rejecting values off the track.
    pub fn new(value: u8) -> Result<Self, SpaceOutOfRange> {
        if (Self::START.0..=Self::FINISH.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SpaceOutOfRange(value))
        }
    }

    /// Raw space number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Move forward, stopping at the finish.
    pub fn advance(self, steps: u8) -> Self {
        Self(self.0.saturating_add(steps).min(Self::FINISH.0))
    }

    /// Move backward, stopping at the start.
    pub fn retreat(self, steps: u8) -> Self {
        Self(self.0.saturating_sub(steps).max(Self::START.0))
    }

    /// Whether this is the winning space.
    pub fn is_finish(self) -> bool {
        self == Self::FINISH
    }

    /// Every space on the track in order.
    pub fn all() -> impl Iterator<Item = Space> {
        (Self::START.0..=Self::FINISH.0).map(Space)
    }
}

impl Default for Space {
    fn default() -> Self {
        Self::START
    }
}

impl TryFrom<u8> for Space {
    type Error = SpaceOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Space::new(value)
    }
}

impl From<Space> for u8 {
    fn from(space: Space) -> Self {
        space.0
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One value per player, addressable by [`PlayerId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    /// Value held for [`PlayerId::One`].
    #[serde(rename = "Player 1")]
    pub player_one: T,
    /// Value held for [`PlayerId::Two`].
    #[serde(rename = "Player 2")]
    pub player_two: T,
}

impl<T> PerPlayer<T> {
    /// Pair up the values for both seats.
    pub fn new(player_one: T, player_two: T) -> Self {
        Self {
            player_one,
            player_two,
        }
    }

    /// Iterate `(player, value)` in seating order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        [
            (PlayerId::One, &self.player_one),
            (PlayerId::Two, &self.player_two),
        ]
        .into_iter()
    }
}

impl<T: Clone> PerPlayer<T> {
    /// Same value for both seats.
    pub fn splat(value: T) -> Self {
        Self::new(value.clone(), value)
    }
}

impl<T> Index<PlayerId> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        match player {
            PlayerId::One => &self.player_one,
            PlayerId::Two => &self.player_two,
        }
    }
}

impl<T> IndexMut<PlayerId> for PerPlayer<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        match player {
            PlayerId::One => &mut self.player_one,
            PlayerId::Two => &mut self.player_two,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_arithmetic_saturates_on_the_track() {
        let space = Space::new(18).unwrap();
        assert_eq!(space.advance(6), Space::FINISH);
        assert_eq!(Space::new(2).unwrap().retreat(3), Space::START);
        assert_eq!(Space::new(10).unwrap().retreat(3).get(), 7);
        assert!(Space::new(0).is_err());
        assert!(Space::new(21).is_err());
        assert_eq!(Space::all().count(), 20);
    }

    #[test]
    fn players_serialize_with_display_labels() {
        let json = serde_json::to_string(&PlayerId::Two).unwrap();
        assert_eq!(json, "\"Player 2\"");
        assert_eq!(PlayerId::One.other(), PlayerId::Two);
        assert_eq!(PlayerId::from_label(" Player 1 "), Some(PlayerId::One));
        assert_eq!(PlayerId::from_label("Player 3"), None);
    }

    #[test]
    fn per_player_round_trips_through_json() {
        let mut positions = PerPlayer::splat(Space::START);
        positions[PlayerId::Two] = Space::new(7).unwrap();
        let json = serde_json::to_value(positions).unwrap();
        assert_eq!(json["Player 1"], 1);
        assert_eq!(json["Player 2"], 7);

        let bad = serde_json::json!({ "Player 1": 1, "Player 2": 25 });
        assert!(serde_json::from_value::<PerPlayer<Space>>(bad).is_err());
    }
}
