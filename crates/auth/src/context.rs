//! Authorization context for authenticated users

use crate::types::UserProfile;

/// Represents an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: UserProfile,
    pub groups: Vec<String>,
}

impl AuthContext {
    /// Create new auth context for a user
    pub fn new(user: UserProfile, groups: Vec<String>) -> Self {
        Self { user, groups }
    }

    pub fn user_key(&self) -> &str {
        &self.user.user_key
    }

    pub fn user_name(&self) -> &str {
        &self.user.user_name
    }

    /// Check group membership by exact name
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Check if the caller belongs to any of `groups`
    pub fn in_any_group<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        groups.iter().any(|g| self.in_group(g.as_ref()))
    }

    /// Check if the caller owns the record with `user_key`
    pub fn is_owner_of(&self, user_key: &str) -> bool {
        self.user.user_key == user_key
    }
}
