//! Roster models: persons and their per-game registrations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameId, PersonId, RivalId};

/// A person on the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,

    /// Display name, sanitized on registration
    pub name: String,

    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn new(id: PersonId, name: &str) -> Self {
        Self {
            id,
            name: sanitize_name(name),
            created_at: Utc::now(),
        }
    }
}

/// A person entered into one game under a game-scoped rival id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub rival_id: RivalId,
    pub game: GameId,
    pub person_id: PersonId,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(rival_id: RivalId, game: GameId, person_id: PersonId) -> Self {
        Self {
            rival_id,
            game,
            person_id,
            registered_at: Utc::now(),
        }
    }
}

/// Escape markup in a display name so it can be rendered verbatim.
pub fn sanitize_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.trim().chars() {
        match c {
            '&' => cleaned.push_str("&amp;"),
            '<' => cleaned.push_str("&lt;"),
            '>' => cleaned.push_str("&gt;"),
            _ => cleaned.push(c),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name_plain() {
        assert_eq!(sanitize_name("Boots O'Neal"), "Boots O'Neal");
    }

    #[test]
    fn test_sanitize_name_escapes_markup() {
        assert_eq!(
            sanitize_name("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
        assert_eq!(sanitize_name("Tom & Jerry"), "Tom &amp; Jerry");
    }

    #[test]
    fn test_sanitize_name_trims() {
        assert_eq!(sanitize_name("  Goofy \n"), "Goofy");
    }

    #[test]
    fn test_person_new_sanitizes() {
        let person = Person::new(PersonId(1), " <b>Pluto</b> ");
        assert_eq!(person.name, "&lt;b&gt;Pluto&lt;/b&gt;");
    }
}
