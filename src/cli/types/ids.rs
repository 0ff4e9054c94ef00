//! ID types for records in the league store.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Declares a type-safe wrapper around a SQLite row id.
///
/// Keeps player ids, gameweek ids and squad ids from being mixed up even
/// though they share the same storage type.
macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> Self {
                Self(id)
            }

            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

record_id!(
    /// Type-safe wrapper for player ids.
    ///
    /// ```rust
    /// use fantasy_fives::PlayerId;
    ///
    /// let id: PlayerId = "42".parse().unwrap();
    /// assert_eq!(id.as_i64(), 42);
    /// assert_eq!(id.to_string(), "42");
    /// ```
    PlayerId
);
record_id!(
    /// Type-safe wrapper for gameweek ids (not the gameweek number).
    GameweekId
);
record_id!(
    /// Type-safe wrapper for fantasy squad ids.
    SquadId
);
record_id!(
    /// Opaque identity of a user, as handed over by the authentication layer.
    UserId
);
record_id!(MiniLeagueId);
