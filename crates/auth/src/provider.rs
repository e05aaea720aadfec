//! Collaborators consumed by the permission gate
//!
//! The gate never looks identities up on its own: it is handed an
//! [`IdentityProvider`] for users, groups and directories, an
//! [`ApprovalSource`] for the configured allowlists and a
//! [`TeamRosterSource`] for team roles when it is built.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AuthError;
use crate::types::{Directory, TeamRoster, UserProfile};

/// Identity/directory provider: users, their groups, and the known directories
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a profile by user key
    async fn find_user(&self, user_key: &str) -> Result<Option<UserProfile>, AuthError>;

    /// Resolve a profile by login name
    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<UserProfile>, AuthError>;

    /// Names of all groups the user belongs to
    async fn groups_for_user(&self, user_key: &str) -> Result<Vec<String>, AuthError>;

    /// All user directories
    async fn find_all_directories(&self) -> Result<Vec<Directory>, AuthError>;
}

/// Allowlists granting administrative access outside the admin group
#[async_trait]
pub trait ApprovalSource: Send + Sync {
    async fn approved_user_keys(&self) -> Result<Vec<String>, AuthError>;

    async fn approved_group_names(&self) -> Result<Vec<String>, AuthError>;
}

/// Team role lists used for team-scoped access
#[async_trait]
pub trait TeamRosterSource: Send + Sync {
    async fn team_rosters(&self) -> Result<Vec<TeamRoster>, AuthError>;
}

/// Identity provider backed by the directory tables in PostgreSQL.
///
/// Uses runtime `sqlx::query_as` against `users`, `group_memberships`
/// and `directories`.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn find_user(&self, user_key: &str) -> Result<Option<UserProfile>, AuthError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_key, user_name, full_name, email
            FROM users
            WHERE user_key = $1
            "#,
        )
        .bind(user_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_key = %user_key, "Failed to load user");
            AuthError::UserLoadError
        })
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<UserProfile>, AuthError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT user_key, user_name, full_name, email
            FROM users
            WHERE user_name = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_name = %user_name, "Failed to load user by name");
            AuthError::UserLoadError
        })
    }

    async fn groups_for_user(&self, user_key: &str) -> Result<Vec<String>, AuthError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT group_name
            FROM group_memberships
            WHERE user_key = $1
            ORDER BY group_name ASC
            "#,
        )
        .bind(user_key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_key = %user_key, "Failed to load groups");
            AuthError::GroupsLoadError
        })
    }

    async fn find_all_directories(&self) -> Result<Vec<Directory>, AuthError> {
        sqlx::query_as::<_, Directory>(
            r#"
            SELECT id, name, active
            FROM directories
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load directories");
            AuthError::DirectoryLoadError
        })
    }
}

/// Fixed in-memory identity provider for local runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    users: HashMap<String, UserProfile>,
    groups: HashMap<String, Vec<String>>,
    directories: Vec<Directory>,
}

impl StaticIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user together with its group memberships
    pub fn with_user(mut self, user: UserProfile, groups: &[&str]) -> Self {
        self.groups.insert(
            user.user_key.clone(),
            groups.iter().map(|g| g.to_string()).collect(),
        );
        self.users.insert(user.user_key.clone(), user);
        self
    }

    pub fn with_directory(mut self, id: i64, name: &str) -> Self {
        self.directories.push(Directory {
            id,
            name: name.to_string(),
            active: true,
        });
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn find_user(&self, user_key: &str) -> Result<Option<UserProfile>, AuthError> {
        Ok(self.users.get(user_key).cloned())
    }

    async fn find_user_by_name(&self, user_name: &str) -> Result<Option<UserProfile>, AuthError> {
        Ok(self
            .users
            .values()
            .find(|u| u.user_name == user_name)
            .cloned())
    }

    async fn groups_for_user(&self, user_key: &str) -> Result<Vec<String>, AuthError> {
        Ok(self.groups.get(user_key).cloned().unwrap_or_default())
    }

    async fn find_all_directories(&self) -> Result<Vec<Directory>, AuthError> {
        Ok(self.directories.clone())
    }
}
