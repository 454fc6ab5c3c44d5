//! Farm Navigator backend.
//!
//! Serves per-round environmental samples, NASA facts and a leaderboard over
//! HTTP, plus the static front-end. Game rules live in `farmnav-logic`; this
//! crate only exposes them.

pub mod config;
mod routes;

pub use routes::{create_router, AppState};
