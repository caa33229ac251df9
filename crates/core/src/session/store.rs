use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    board::BoardConfig,
    engine::{GameState, RollOutcome, RollSource},
};

/// Failures surfaced by the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A roll was requested for a session that was never displayed.
    #[error("no game in progress for session '{0}'")]
    UnknownSession(String),
}

/// One client's game plus bookkeeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub state: GameState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Roll requests resolved, skips included.
    pub rolls: u32,
}

impl GameSession {
    fn fresh(board: &BoardConfig) -> Self {
        let now = Utc::now();
        Self {
            state: GameState::new(board.initial_turn),
            created_at: now,
            updated_at: now,
            rolls: 0,
        }
    }
}

/// Sessions keyed by client id, all sharing one board.
///
/// The lock is held for the whole of a roll, so the engine always has
/// exclusive access to the state it mutates.
pub struct SessionStore {
    board: Arc<BoardConfig>,
    sessions: Mutex<HashMap<String, GameSession>>,
}

impl SessionStore {
    pub fn new(board: impl Into<Arc<BoardConfig>>) -> Self {
        Self {
            board: board.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Snapshot of the session, starting a new game if there is none yet.
    pub fn view(&self, id: &str) -> GameSession {
        let mut sessions = self.sessions.lock();
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(session = id, "Starting new game");
                GameSession::fresh(&self.board)
            })
            .clone()
    }

    /// Resolve a roll request for an existing session.
    pub fn roll<D: RollSource>(&self, id: &str, dice: &mut D) -> Result<RollOutcome, SessionError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))?;

        let outcome = session.state.apply_roll(&self.board, dice);
        if outcome != RollOutcome::GameOver {
            session.rolls += 1;
            session.updated_at = Utc::now();
        }
        debug!(session = id, ?outcome, "Roll resolved");
        Ok(outcome)
    }

    /// Throw away the current game and start a new one.
    pub fn reset(&self, id: &str) -> GameSession {
        let session = GameSession::fresh(&self.board);
        self.sessions.lock().insert(id.to_string(), session.clone());
        info!(session = id, "Game reset");
        session
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.lock().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
