//! Farm Navigator terminal client.
//!
//! Plays the irrigation game against the HTTP backend and keeps working when
//! the backend is slow or gone: samples and facts fall back to local
//! generation, scores to a local record list.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`backend`] | `Backend` seam, HTTP `ApiClient`, `OfflineBackend` |
//! | [`config`] | Flags and `FARMNAV_*` environment variables |
//! | [`data_provider`] | Per-round samples and facts with fallback |
//! | [`error`] | `ClientError` |
//! | [`leaderboard`] | Score submit / top-n with a local record list |
//! | [`session`] | Real-time session loop around the round engine |
//! | [`terminal`] | Text presenter and stdin command reader |

pub mod backend;
pub mod config;
pub mod data_provider;
pub mod error;
pub mod leaderboard;
pub mod session;
pub mod terminal;

pub use backend::{ApiClient, Backend, OfflineBackend};
pub use error::ClientError;
pub use session::{GameSession, SessionCommand, SessionOptions};
