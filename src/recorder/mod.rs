//! Match recording.
//!
//! A reported outcome names one player, their status, and their opponent.
//! It is turned into a [`CanonicalMatch`] that does not depend on which side
//! reported it, then appended to the store exactly once.

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{CanonicalMatch, GameId, MatchRecord, MatchStatus, RivalId};
use crate::storage::{AppendOutcome, ConstraintViolation, StorageError, TournamentStore};

/// Errors from reporting an outcome.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Invalid status {0:?}: expected one of won, lost, draw")]
    InvalidStatus(String),

    /// The store refused the record; nothing was written.
    #[error("Duplicate match: {0}")]
    DuplicateMatch(ConstraintViolation),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn is_bye_status(status: Option<&str>) -> bool {
    status.map_or(true, |s| s == "bye")
}

/// Build the canonical record for a reported outcome.
///
/// Without an opponent, or with no status or `bye`, the report is a bye for
/// `player`. Otherwise the status must be won, lost or draw; the opponent's
/// status is its complement and the two rivals are stored lower id first.
pub fn canonicalize(
    game: &GameId,
    player: RivalId,
    status: Option<&str>,
    opponent: Option<RivalId>,
) -> Result<CanonicalMatch, RecordError> {
    let opponent = match opponent {
        Some(opponent) if !is_bye_status(status) => opponent,
        _ => return Ok(CanonicalMatch::bye(game.clone(), player)),
    };

    let raw = status.unwrap_or_default();
    let player_status =
        MatchStatus::parse(raw).ok_or_else(|| RecordError::InvalidStatus(raw.to_string()))?;
    let opponent_status = player_status.complement();

    let (rival_lo, lo_status, rival_hi, hi_status) = if player <= opponent {
        (player, player_status, opponent, opponent_status)
    } else {
        (opponent, opponent_status, player, player_status)
    };

    Ok(CanonicalMatch {
        game: game.clone(),
        rival_lo,
        rival_hi: Some(rival_hi),
        lo_status: Some(lo_status),
        hi_status: Some(hi_status),
        is_bye: false,
    })
}

/// Record one reported outcome.
pub fn report_outcome<S>(
    store: &S,
    game: &GameId,
    player: RivalId,
    status: Option<&str>,
    opponent: Option<RivalId>,
) -> Result<MatchRecord, RecordError>
where
    S: TournamentStore + ?Sized,
{
    let outcome = canonicalize(game, player, status, opponent)?;
    let fingerprint = outcome.fingerprint();

    match store.append_match(outcome)? {
        AppendOutcome::Appended(record) => {
            info!(
                game = %game,
                match_id = record.match_id,
                round = record.round,
                fingerprint = %fingerprint,
                "Recorded match"
            );
            Ok(record)
        }
        AppendOutcome::Rejected(violation) => {
            warn!(game = %game, fingerprint = %fingerprint, "Rejected match: {}", violation);
            Err(RecordError::DuplicateMatch(violation))
        }
    }
}
