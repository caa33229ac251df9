use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info};

use super::{BoardConfig, EventTag};
use crate::models::{PlayerId, Space};

static TURN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Turn:([^:]*)").expect("invalid turn regex"));

static SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:]*):(.*)$").expect("invalid space regex"));

/// Reads the board file that places events on spaces.
pub struct BoardLoader;

impl BoardLoader {
    /// Load a board file. A missing file yields the default board.
    pub fn load(path: impl AsRef<Path>) -> Result<BoardConfig> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No board file found; using an empty board");
                return Ok(BoardConfig::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        let board = Self::parse(&content);
        info!(
            path = %path.display(),
            spaces = board.events.len(),
            initial_turn = %board.initial_turn,
            "Board loaded"
        );
        Ok(board)
    }

    /// Parse board text. Lines that match neither form are skipped.
    pub fn parse(content: &str) -> BoardConfig {
        let mut board = BoardConfig::default();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(caps) = TURN_RE.captures(line) {
                let designator = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                match PlayerId::from_label(designator) {
                    Some(player) => board.initial_turn = player,
                    None => debug!(line = index + 1, designator, "Ignoring unknown turn owner"),
                }
                continue;
            }

            let Some(caps) = SPACE_RE.captures(line) else {
                continue;
            };
            let Some(space) = parse_space(&caps[1]) else {
                debug!(line = index + 1, "Ignoring malformed board line");
                continue;
            };
            let events = caps[2]
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(EventTag::parse)
                .collect();
            board.events.insert(space, events);
        }

        board
    }
}

fn parse_space(raw: &str) -> Option<Space> {
    let value: u8 = raw.trim().parse().ok()?;
    Space::new(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn space(value: u8) -> Space {
        Space::new(value).unwrap()
    }

    #[test]
    fn parses_turn_and_event_lines() {
        let board = BoardLoader::parse(
            "Turn: Player 2\n\
             5: Troll , Hotel,,\n\
             12:Shortcut\n\
             this line means nothing\n\
             7:\n",
        );

        assert_eq!(board.initial_turn, PlayerId::Two);
        assert_eq!(board.events_at(space(5)), &[EventTag::Troll, EventTag::Hotel]);
        assert_eq!(board.events_at(space(12)), &[EventTag::Shortcut]);
        assert!(board.events.contains_key(&space(7)));
        assert!(board.events_at(space(7)).is_empty());
        assert_eq!(board.events.len(), 3);
    }

    #[test]
    fn last_turn_line_and_last_space_line_win() {
        let board = BoardLoader::parse(
            "Turn: Player 2\n\
             Turn: Player 1\n\
             Turn: nobody\n\
             3: Troll\n\
             3: Hotel, Dragon\n",
        );

        assert_eq!(board.initial_turn, PlayerId::One);
        assert_eq!(
            board.events_at(space(3)),
            &[EventTag::Hotel, EventTag::Other("Dragon".into())]
        );
    }

    #[test]
    fn malformed_space_lines_are_skipped() {
        let board = BoardLoader::parse("x: Troll\n0: Troll\n21: Hotel\n-4: Shortcut\n 9 : Troll\n");
        assert_eq!(board.events.len(), 1);
        assert_eq!(board.events_at(space(9)), &[EventTag::Troll]);
    }

    #[test]
    fn missing_file_uses_default_board() -> Result<()> {
        let dir = tempdir()?;
        let board = BoardLoader::load(dir.path().join("events.txt"))?;
        assert_eq!(board, BoardConfig::default());
        Ok(())
    }

    #[test]
    fn loads_board_from_disk() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("events.txt");
        fs::write(&path, "Turn: Player 2\n10: Troll, Shortcut\n")?;

        let board = BoardLoader::load(&path)?;
        assert_eq!(board.initial_turn, PlayerId::Two);
        assert_eq!(
            board.events_at(space(10)),
            &[EventTag::Troll, EventTag::Shortcut]
        );
        Ok(())
    }

    #[test]
    fn unreadable_path_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert!(BoardLoader::load(dir.path()).is_err());
        Ok(())
    }
}
