//! Storage layer for the league
//!
//! This module provides a thin abstraction over the SQLite database,
//! organized into logical components:
//! - `models`: Data structures
//! - `schema`: Database connection, transactions and schema management
//! - `queries`: Record access through the [`LeagueStore`] trait

pub mod models;
pub mod queries;
pub mod schema;


// Re-export the main types and database struct for easy access
pub use models::*;
pub use queries::LeagueStore;
pub use schema::LeagueDatabase;
