//! # Storage Module
//!
//! SQLite persistence for kids, chores and their assignments, behind the
//! traits in [`traits`].

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use traits::{AssignmentStorage, ChoreStorage, Connection, KidStorage};
