//! Board layout: which events sit on which spaces.

/// Line-oriented board file parsing.
pub mod loader;

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::models::{PlayerId, Space};

pub use loader::BoardLoader;

/// Rule attached to a space, fired when a move lands there.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTag {
    /// Knocks the mover back three spaces.
    Troll,
    /// The mover loses their next turn.
    Hotel,
    /// Carries the mover two spaces forward.
    Shortcut,
    /// Unrecognised tag. Shown on the board but has no effect.
    Other(String),
}

impl EventTag {
    /// Setback applied by a Troll.
    pub const TROLL_SETBACK: u8 = 3;
    /// Bonus applied by a Shortcut.
    pub const SHORTCUT_BONUS: u8 = 2;

    /// Interpret a single trimmed token from the board file.
    pub fn parse(token: &str) -> Self {
        match token {
            "Troll" => EventTag::Troll,
            "Hotel" => EventTag::Hotel,
            "Shortcut" => EventTag::Shortcut,
            other => EventTag::Other(other.to_string()),
        }
    }

    /// Label shown to players.
    pub fn label(&self) -> &str {
        match self {
            EventTag::Troll => "Troll",
            EventTag::Hotel => "Hotel",
            EventTag::Shortcut => "Shortcut",
            EventTag::Other(name) => name,
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable board setup produced once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Who holds the first turn of every new game.
    pub initial_turn: PlayerId,
    /// Events per space, in the order they fire.
    pub events: BTreeMap<Space, Vec<EventTag>>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            initial_turn: PlayerId::One,
            events: BTreeMap::new(),
        }
    }
}

impl BoardConfig {
    /// Events attached to `space`, empty when there are none.
    pub fn events_at(&self, space: Space) -> &[EventTag] {
        self.events.get(&space).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every space on the track alongside its events.
    pub fn spaces(&self) -> impl Iterator<Item = (Space, &[EventTag])> + '_ {
        Space::all().map(move |space| (space, self.events_at(space)))
    }

    /// Builder-style helper to attach events to a space.
    pub fn with_events(mut self, space: Space, events: Vec<EventTag>) -> Self {
        self.events.insert(space, events);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tags_are_preserved_for_display() {
        assert_eq!(EventTag::parse("Hotel"), EventTag::Hotel);
        assert_eq!(EventTag::parse("troll"), EventTag::Other("troll".into()));
        assert_eq!(EventTag::parse("Dragon").label(), "Dragon");
    }

    #[test]
    fn events_at_defaults_to_empty() {
        let space = Space::new(4).unwrap();
        let board = BoardConfig::default().with_events(space, vec![EventTag::Troll]);
        assert_eq!(board.events_at(space), &[EventTag::Troll]);
        assert!(board.events_at(Space::FINISH).is_empty());
        assert_eq!(board.spaces().count(), 20);
    }
}
