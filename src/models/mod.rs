//! Core data models for the tournament engine.

mod ids;
mod match_record;
mod pairing;
mod player;
mod standings;

pub use ids::*;
pub use match_record::*;
pub use pairing::*;
pub use player::*;
pub use standings::*;
