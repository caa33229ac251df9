#![warn(clippy::all, missing_docs)]

//! Core domain logic for Race to 20.
//!
//! This crate hosts the board configuration loader, the turn resolution
//! engine, the in-memory session store and configuration handling used by
//! the terminal client and any future frontends.

pub mod board;
pub mod config;
pub mod engine;
pub mod models;
pub mod session;

pub use board::{BoardConfig, BoardLoader, EventTag};
pub use crate::config::AppConfig;
pub use engine::{resolve_roll, GameState, RollOutcome, RollSource, Rolls, ScriptedDice, SeededDice};
pub use models::{PerPlayer, PlayerId, Space};
pub use session::{GameSession, SessionError, SessionStore};
