//! Store abstractions for the configuration domain
//!
//! Two implementations exist: [`PgConfigStore`] on PostgreSQL and
//! [`MemoryConfigStore`] for local runs and tests. Both also serve as the
//! permission gate's `ApprovalSource`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use timesheet_common::RepositoryError;

use crate::domain::entities::{
    ApprovedGroup, ApprovedUser, Category, Configuration, MailSettings, Team, TeamGroups,
};

pub use memory::MemoryConfigStore;
pub use postgres::PgConfigStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, RepositoryError>;

/// Accessor for the configuration singleton.
///
/// These methods are the only write path to the configuration record.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Full snapshot, teams included
    async fn get_configuration(&self) -> StoreResult<Configuration>;

    /// Overwrite all four mail fields
    async fn edit_mail(&self, mail: &MailSettings) -> StoreResult<()>;

    async fn set_user_directory_id(&self, directory_id: i64) -> StoreResult<()>;

    async fn clear_approved_groups(&self) -> StoreResult<()>;

    async fn add_approved_group(&self, group_name: &str) -> StoreResult<ApprovedGroup>;

    async fn clear_approved_users(&self) -> StoreResult<()>;

    async fn add_approved_user(&self, user_key: &str) -> StoreResult<ApprovedUser>;

    /// Create a team with its permission groups.
    ///
    /// `None` when the name is blank or already taken.
    async fn add_team(&self, name: &str, groups: &TeamGroups) -> StoreResult<Option<Team>>;

    /// Rename a team. `None` when `old_name` is unknown or `new_name` is taken.
    async fn edit_team(&self, old_name: &str, new_name: &str) -> StoreResult<Option<Team>>;

    /// Delete a team by name; `false` when no such team exists
    async fn remove_team(&self, name: &str) -> StoreResult<bool>;
}

/// Team directory
#[async_trait]
pub trait TeamStore: Send + Sync {
    /// All teams with their category ids, ordered by id
    async fn all_teams(&self) -> StoreResult<Vec<Team>>;

    /// Create a team without permission groups; `None` on blank or duplicate name
    async fn create_team(&self, name: &str) -> StoreResult<Option<Team>>;

    /// Delete a team by name; `false` when no such team exists
    async fn delete_team(&self, name: &str) -> StoreResult<bool>;

    /// Link a category to a team; `false` when either is unknown
    async fn assign_category(&self, team_name: &str, category_name: &str) -> StoreResult<bool>;
}

/// Category directory
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by id
    async fn all_categories(&self) -> StoreResult<Vec<Category>>;

    /// Create a category; `None` on blank or duplicate name
    async fn create_category(&self, name: &str) -> StoreResult<Option<Category>>;

    /// Delete a category and its team links; `false` when no such category exists
    async fn delete_category(&self, name: &str) -> StoreResult<bool>;
}
