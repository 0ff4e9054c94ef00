//! Type-safe wrappers and enums shared by the CLI and the library.

pub mod ids;
pub mod position;

pub use ids::{GameweekId, MiniLeagueId, PlayerId, SquadId, UserId};
pub use position::Position;
