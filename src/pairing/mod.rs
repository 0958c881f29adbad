//! Swiss pairing engine.
//!
//! Given a game's ranked standings, pairs each player with the neighbour
//! below them, so players meet opponents with an equal or nearly equal
//! record. With an odd player count the last player gets a bye.
//!
//! A game with `n` players lasts `floor(log2(n))` rounds. Once more rounds
//! than that have been played the engine stops pairing and hands back the
//! final standings instead.

mod seeding;

pub use seeding::*;

use rand::Rng;
use tracing::{info, warn};

use crate::models::{GameId, Pairing, RoundPlan, Seat, StandingsRow};
use crate::standings::{get_standings, StandingsError};
use crate::storage::TournamentStore;

/// `floor(log2(n))`, the number of rounds a game of `n` players runs.
pub fn max_rounds(players: usize) -> u32 {
    if players == 0 {
        0
    } else {
        players.ilog2()
    }
}

/// Rounds played so far: the most matches any player has played.
///
/// Players normally have equal counts; late registrations or missing
/// reports break that, which is logged.
pub fn played_rounds(rows: &[StandingsRow]) -> u32 {
    let most = rows.iter().map(|r| r.matches_played).max().unwrap_or(0);
    let fewest = rows.iter().map(|r| r.matches_played).min().unwrap_or(0);
    if most != fewest {
        warn!(
            "Uneven match counts ({} to {}); using {} as rounds played",
            fewest, most, most
        );
    }
    most
}

/// Pair adjacent players in the given order; a leftover player gets a bye.
pub fn pair_adjacent(order: &[StandingsRow]) -> Vec<Pairing> {
    order
        .chunks(2)
        .map(|chunk| match chunk {
            [a, b] => Pairing::Match {
                a: Seat::from(a),
                b: Seat::from(b),
            },
            [player] => Pairing::Bye {
                player: Seat::from(player),
            },
            _ => unreachable!("chunks(2) yields one or two rows"),
        })
        .collect()
}

/// Plan the next round from ranked standings.
pub fn plan_round<R>(
    game: &GameId,
    mut ranked: Vec<StandingsRow>,
    policy: &dyn SeedingPolicy,
    rng: &mut R,
) -> Result<RoundPlan, StandingsError>
where
    R: Rng + ?Sized,
{
    if ranked.is_empty() {
        return Err(StandingsError::EmptyStandings {
            game: Some(game.clone()),
        });
    }

    let limit = max_rounds(ranked.len());
    let played = played_rounds(&ranked);

    if played > limit {
        info!(
            game = %game,
            played,
            limit,
            "Tournament complete, winner is {}",
            ranked[0].name
        );
        return Ok(RoundPlan::Complete { standings: ranked });
    }

    policy.seeding_for(played).apply(&mut ranked, rng);
    let pairings = pair_adjacent(&ranked);

    info!(
        game = %game,
        round = played + 1,
        players = ranked.len(),
        "Paired {} slots",
        pairings.len()
    );
    Ok(RoundPlan::Pairings {
        round: played + 1,
        pairings,
    })
}

/// Read a game's standings and plan its next round.
///
/// A game nobody is registered in has empty standings.
pub fn get_next_pairings<S, R>(
    store: &S,
    game: &GameId,
    policy: &dyn SeedingPolicy,
    rng: &mut R,
) -> Result<RoundPlan, StandingsError>
where
    S: TournamentStore + ?Sized,
    R: Rng + ?Sized,
{
    if !store.list_registered_games()?.contains(game) {
        return Err(StandingsError::EmptyStandings {
            game: Some(game.clone()),
        });
    }

    let ranked = get_standings(store, Some(game))?;
    plan_round(game, ranked, policy, rng)
}
