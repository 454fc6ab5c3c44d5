//! Pure game logic for Farm Navigator.
//!
//! Everything here is independent of the network, the async runtime and the
//! terminal. Functions take plain data and return results, so the same rules
//! run in the HTTP backend, the terminal client and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`api`] | HTTP paths and request/response bodies |
//! | [`constants`] | Round count, timer length, thresholds, leaderboard caps |
//! | [`decision`] | Irrigation actions, the correctness rule, explanations |
//! | [`facts`] | Catalogue of NASA Earth-science facts |
//! | [`leaderboard`] | Score entries, ordering and capping |
//! | [`persistence`] | JSON file storage for a record list, with an in-memory fallback |
//! | [`presentation`] | Callbacks the round engine drives at each transition |
//! | [`round`] | Round engine state machine: timer, scoring, game over |
//! | [`sample`] | Environmental samples (soil moisture, rainfall) |

pub mod api;
pub mod constants;
pub mod decision;
pub mod facts;
pub mod leaderboard;
pub mod persistence;
pub mod presentation;
pub mod round;
pub mod sample;
