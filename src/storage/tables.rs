//! In-memory relational core shared by the stores.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Utc;

use super::{AppendOutcome, ConstraintViolation, Enrollment, Removed, StorageError};
use crate::models::{
    CanonicalMatch, GameId, MatchRecord, Person, PersonId, Registration, RivalId, StandingsRow,
};

/// Persons, registrations and matches, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub persons: Vec<Person>,
    pub registrations: Vec<Registration>,
    pub matches: Vec<MatchRecord>,
}

/// Rows created by [`Tables::register`], for stores that persist them.
#[derive(Debug, Clone)]
pub struct RosterChange {
    pub enrollment: Enrollment,
    pub new_person: Option<Person>,
    pub new_registration: Option<Registration>,
}

fn in_game(filter: Option<&GameId>, game: &GameId) -> bool {
    filter.map_or(true, |g| g == game)
}

impl Tables {
    fn next_person_id(&self) -> PersonId {
        PersonId(self.persons.iter().map(|p| p.id.0).max().unwrap_or(0) + 1)
    }

    fn next_rival_id(&self) -> RivalId {
        RivalId(
            self.registrations
                .iter()
                .map(|r| r.rival_id.0)
                .max()
                .unwrap_or(0)
                + 1,
        )
    }

    fn next_match_id(&self) -> u64 {
        self.matches.iter().map(|m| m.match_id).max().unwrap_or(0) + 1
    }

    /// Create a person if needed and register them in `game`.
    pub fn register(
        &mut self,
        name: &str,
        person_id: Option<PersonId>,
        game: Option<&GameId>,
    ) -> Result<RosterChange, StorageError> {
        if let (Some(id), Some(game)) = (person_id, game) {
            if self
                .registrations
                .iter()
                .any(|r| r.person_id == id && &r.game == game)
            {
                return Err(StorageError::AlreadyRegistered {
                    person: id,
                    game: game.clone(),
                });
            }
        }

        let (person_id, new_person) = match person_id {
            Some(id) => {
                if !self.persons.iter().any(|p| p.id == id) {
                    return Err(StorageError::UnknownPerson(id));
                }
                (id, None)
            }
            None => {
                let person = Person::new(self.next_person_id(), name);
                self.persons.push(person.clone());
                (person.id, Some(person))
            }
        };

        let new_registration = game.map(|game| {
            let registration = Registration::new(self.next_rival_id(), game.clone(), person_id);
            self.registrations.push(registration.clone());
            registration
        });

        Ok(RosterChange {
            enrollment: Enrollment {
                person_id,
                rival_id: new_registration.as_ref().map(|r| r.rival_id),
            },
            new_person,
            new_registration,
        })
    }

    /// The round a new match in `game` belongs to: one past the fewest
    /// matches any registered rival has played.
    pub fn active_round(&self, game: &GameId) -> u32 {
        self.standings(Some(game))
            .iter()
            .map(|row| row.matches_played)
            .min()
            .unwrap_or(0)
            + 1
    }

    fn round_started(&self, game: &GameId, round: u32) -> bool {
        self.matches
            .iter()
            .any(|m| m.round == round && &m.outcome.game == game)
    }

    /// Check every constraint a new match must satisfy, returning its round.
    pub fn check_match(&self, outcome: &CanonicalMatch) -> Result<u32, ConstraintViolation> {
        if outcome.is_bye {
            if outcome.rival_hi.is_some()
                || outcome.lo_status.is_some()
                || outcome.hi_status.is_some()
            {
                return Err(ConstraintViolation::Malformed(
                    "a bye has no opponent or statuses".to_string(),
                ));
            }
        } else {
            let hi = outcome.rival_hi.ok_or_else(|| {
                ConstraintViolation::Malformed("a paired match needs two rivals".to_string())
            })?;
            if hi == outcome.rival_lo {
                return Err(ConstraintViolation::SelfPairing { rival: hi });
            }
            if hi < outcome.rival_lo {
                return Err(ConstraintViolation::Malformed(
                    "rivals are not in canonical order".to_string(),
                ));
            }
            match (outcome.lo_status, outcome.hi_status) {
                (Some(lo), Some(hi)) if lo.complement() == hi => {}
                _ => {
                    return Err(ConstraintViolation::Malformed(
                        "statuses are not complementary".to_string(),
                    ))
                }
            }
        }

        for rival in outcome.rivals() {
            if !self
                .registrations
                .iter()
                .any(|r| r.rival_id == rival && r.game == outcome.game)
            {
                return Err(ConstraintViolation::NotRegistered {
                    rival,
                    game: outcome.game.clone(),
                });
            }
        }

        let round = self.active_round(&outcome.game);
        for rival in outcome.rivals() {
            if self.matches.iter().any(|m| {
                m.round == round && m.outcome.game == outcome.game && m.outcome.involves(rival)
            }) {
                return Err(ConstraintViolation::AlreadyReported { rival, round });
            }
        }

        // Recording the last match of a round opens the next one, so a second
        // report of that match would otherwise land there. Until the new round
        // has a record, an identical match from the previous round is a repeat.
        if round > 1 && !self.round_started(&outcome.game, round) {
            if let Some(previous) = self
                .matches
                .iter()
                .find(|m| m.round == round - 1 && m.outcome == *outcome)
            {
                return Err(ConstraintViolation::AlreadyReported {
                    rival: outcome.rival_lo,
                    round: previous.round,
                });
            }
        }

        Ok(round)
    }

    /// Append a match if it passes [`Tables::check_match`].
    pub fn append_match(&mut self, outcome: CanonicalMatch) -> AppendOutcome {
        match self.check_match(&outcome) {
            Ok(round) => {
                let record = MatchRecord {
                    match_id: self.next_match_id(),
                    round,
                    outcome,
                    recorded_at: Utc::now(),
                };
                self.matches.push(record.clone());
                AppendOutcome::Appended(record)
            }
            Err(violation) => AppendOutcome::Rejected(violation),
        }
    }

    /// Standings per registration, in registration order.
    pub fn standings(&self, game: Option<&GameId>) -> Vec<StandingsRow> {
        let names: HashMap<PersonId, &str> = self
            .persons
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();

        let mut rows: Vec<StandingsRow> = self
            .registrations
            .iter()
            .filter(|r| in_game(game, &r.game))
            .map(|r| {
                let name = names.get(&r.person_id).copied().unwrap_or_default();
                StandingsRow::new(r.rival_id, r.game.clone(), name)
            })
            .collect();

        let index: HashMap<RivalId, usize> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.rival_id, i))
            .collect();

        for record in self.matches.iter().filter(|m| in_game(game, &m.outcome.game)) {
            for rival in record.outcome.rivals() {
                let tally = record.outcome.tally_for(rival);
                if let (Some(&i), Some(tally)) = (index.get(&rival), tally) {
                    rows[i].add(tally);
                }
            }
        }

        rows
    }

    pub fn count_registered(&self, game: Option<&GameId>) -> usize {
        self.registrations
            .iter()
            .filter(|r| in_game(game, &r.game))
            .count()
    }

    pub fn games(&self) -> BTreeSet<GameId> {
        self.registrations.iter().map(|r| r.game.clone()).collect()
    }

    pub fn matches_in(&self, game: Option<&GameId>) -> Vec<MatchRecord> {
        self.matches
            .iter()
            .filter(|m| in_game(game, &m.outcome.game))
            .cloned()
            .collect()
    }

    pub fn delete_matches(&mut self, game: Option<&GameId>) -> usize {
        let before = self.matches.len();
        self.matches.retain(|m| !in_game(game, &m.outcome.game));
        before - self.matches.len()
    }

    /// Remove persons with their registrations and any match naming them.
    pub fn delete_players(&mut self, person: Option<PersonId>) -> Removed {
        let doomed = |id: PersonId| person.map_or(true, |p| p == id);

        let rivals: HashSet<RivalId> = self
            .registrations
            .iter()
            .filter(|r| doomed(r.person_id))
            .map(|r| r.rival_id)
            .collect();

        let persons_before = self.persons.len();
        self.persons.retain(|p| !doomed(p.id));

        let registrations_before = self.registrations.len();
        self.registrations.retain(|r| !rivals.contains(&r.rival_id));

        let matches_before = self.matches.len();
        self.matches
            .retain(|m| !m.outcome.rivals().any(|r| rivals.contains(&r)));

        Removed {
            persons: persons_before - self.persons.len(),
            registrations: registrations_before - self.registrations.len(),
            matches: matches_before - self.matches.len(),
        }
    }
}
