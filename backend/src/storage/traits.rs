//! # Storage Traits
//!
//! Storage abstraction used by the domain services. Repositories speak domain
//! models; SQL rows never leave the storage layer.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::assignment::{Assignment, KidChore, NewAssignment};
use crate::domain::models::chore::{Chore, NewChore};
use crate::domain::models::kid::{Kid, NewKid};

#[async_trait]
pub trait KidStorage: Send + Sync {
    /// Store a new kid with zero points, returning it with its id
    async fn insert_kid(&self, kid: &NewKid) -> Result<Kid>;

    async fn get_kid(&self, kid_id: i64) -> Result<Option<Kid>>;

    /// All kids in creation order
    async fn list_kids(&self) -> Result<Vec<Kid>>;

    async fn count_kids(&self) -> Result<i64>;

    /// Set or clear the avatar; false if the kid does not exist
    async fn update_avatar(&self, kid_id: i64, avatar_url: Option<&str>) -> Result<bool>;

    /// Add `points` to the kid's total, returning the updated kid
    async fn add_points(&self, kid_id: i64, points: i64) -> Result<Option<Kid>>;
}

#[async_trait]
pub trait ChoreStorage: Send + Sync {
    async fn insert_chore(&self, chore: &NewChore) -> Result<Chore>;

    async fn get_chore(&self, chore_id: i64) -> Result<Option<Chore>>;

    /// Chores ordered by created_at descending (most recent first)
    async fn list_chores(&self, limit: Option<u32>) -> Result<Vec<Chore>>;

    /// Overwrite description and frequency; false if the chore does not exist
    async fn update_chore(&self, chore: &Chore) -> Result<bool>;

    /// Delete a chore and, by cascade, its assignments
    async fn delete_chore(&self, chore_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait AssignmentStorage: Send + Sync {
    /// Insert all rows in one transaction.
    ///
    /// Fails with `AssignmentError::KidNotFound`/`ChoreNotFound` for dangling
    /// references and `AssignmentError::AlreadyAssigned` if any (kid, chore,
    /// date) already exists; nothing is written in either case.
    async fn insert_assignments(&self, assignments: &[NewAssignment]) -> Result<Vec<Assignment>>;

    async fn get_assignment(&self, assignment_id: i64) -> Result<Option<Assignment>>;

    /// Assignments dated within `start..=end`, ordered by date then id
    async fn list_assignments_between(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Assignment>>;

    /// One kid's assignments joined with their chore, newest date first
    async fn list_kid_chores(&self, kid_id: i64) -> Result<Vec<KidChore>>;

    async fn set_completion(
        &self,
        assignment_id: i64,
        completed: bool,
        last_completed: Option<DateTime<Utc>>,
    ) -> Result<Option<Assignment>>;

    /// Point an assignment at a different kid and/or chore
    async fn update_assignment_refs(&self, assignment_id: i64, kid_id: i64, chore_id: i64) -> Result<Option<Assignment>>;

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for repositories so the domain layer can work
/// with any backend without knowing its implementation details.
pub trait Connection: Send + Sync + Clone + 'static {
    type KidRepository: KidStorage + Clone + 'static;
    type ChoreRepository: ChoreStorage + Clone + 'static;
    type AssignmentRepository: AssignmentStorage + Clone + 'static;

    fn create_kid_repository(&self) -> Self::KidRepository;
    fn create_chore_repository(&self) -> Self::ChoreRepository;
    fn create_assignment_repository(&self) -> Self::AssignmentRepository;
}
