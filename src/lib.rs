//! # Swiss Tournament
//!
//! A Swiss-system tournament engine: players register into games, report
//! match outcomes, and the engine ranks them and pairs the next round.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (players, matches, standings, pairings)
//! - **storage**: The store trait plus in-memory and JSONL implementations
//! - **recorder**: Canonicalizes and records reported outcomes
//! - **standings**: Ranks players by wins, byes and draws
//! - **pairing**: Plans the next round with adjacent pairing and byes
//! - **engine**: Async facade serializing per-game work
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod engine;
pub mod models;
pub mod pairing;
pub mod recorder;
pub mod standings;
pub mod storage;

pub use models::*;
