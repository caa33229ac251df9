#![allow(missing_docs)]

//! In-memory per-client game sessions.

mod store;

pub use store::{GameSession, SessionError, SessionStore};
