//! Points engine: rules table, calculator, MVP selection and badges.
//!
//! Everything in this module is pure. Persistence and the settlement
//! workflow live in [`crate::storage`] and [`crate::commands`].

pub mod badges;
pub mod compute;
pub mod rating;
pub mod rules;
pub mod stat;

pub use badges::{derive_badges, Badge};
pub use compute::{compute_breakdown, compute_points, PointsBreakdown};
pub use rating::{Ballot, MvpCandidate, MvpSelector, MvpStrategy, RatingWeights};
pub use rules::{PositionRules, ScoringRules};
pub use stat::{MvpAward, MvpRank, StatLine};
