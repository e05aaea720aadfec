//! Store abstractions for timesheet records
//!
//! The store is row-level and enforces nothing about how many rows a user
//! owns; lookups return every match so the service can check multiplicity.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use timesheet_common::RepositoryError;

use crate::domain::entities::{EntryDraft, NewTimesheet, Timesheet, TimesheetEntry};

pub use memory::{MemoryEntryStore, MemoryTimesheetStore};
pub use postgres::{PgEntryStore, PgTimesheetStore};

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait TimesheetStore: Send + Sync {
    /// Insert a row; never checks for an existing one
    async fn create(&self, timesheet: &NewTimesheet) -> StoreResult<Timesheet>;

    /// Every row owned by `user_key`
    async fn find_by_user(&self, user_key: &str) -> StoreResult<Vec<Timesheet>>;

    /// Every row with `id`
    async fn find_by_id(&self, id: i32) -> StoreResult<Vec<Timesheet>>;

    /// Persist all fields of an existing row
    async fn save(&self, timesheet: &Timesheet) -> StoreResult<Timesheet>;

    /// All rows, unordered
    async fn all(&self) -> StoreResult<Vec<Timesheet>>;
}

/// Entries booked on timesheets.
///
/// Listings are ordered newest first by begin date, ties broken by id.
#[async_trait]
pub trait EntryStore: Send + Sync {
    async fn create(&self, timesheet_id: i32, draft: &EntryDraft) -> StoreResult<TimesheetEntry>;

    async fn find(&self, id: i32) -> StoreResult<Option<TimesheetEntry>>;

    async fn for_timesheet(&self, timesheet_id: i32) -> StoreResult<Vec<TimesheetEntry>>;

    /// Entries booked on any of `team_ids`, across timesheets
    async fn for_teams(&self, team_ids: &[i32]) -> StoreResult<Vec<TimesheetEntry>>;

    /// Persist all fields of an existing entry
    async fn update(&self, entry: &TimesheetEntry) -> StoreResult<TimesheetEntry>;

    /// `false` when no entry had `id`
    async fn delete(&self, id: i32) -> StoreResult<bool>;
}
