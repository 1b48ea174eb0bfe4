//! Playback-synchronised live commentary
//!
//! Resolves a video URL to a subject, polls a commentary backend while the
//! video plays and keeps a bounded, most-recent-first history of accepted
//! commentary.

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod services;
pub mod sources;
pub mod utils;

pub use config::{BackendConfig, Config, EngineConfig};
pub use engine::{EngineSnapshot, LiveCommentaryEngine};
pub use errors::{AppError, AppResult, CommentaryError};
