//! Identity read-model types
//!
//! Views of the rows owned by the identity/directory provider. These carry
//! only what the permission gate and the handlers need.

use serde::Serialize;

/// Profile of a directory user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct UserProfile {
    pub user_key: String,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfile {
    pub fn new(user_key: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_key: user_key.into(),
            user_name: user_name.into(),
            full_name: None,
            email: None,
        }
    }
}

/// User directory known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Directory {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// A team's role lists as seen by the permission gate.
///
/// Each entry names either a directory group or a single user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamRoster {
    pub team_id: i32,
    pub team_name: String,
    pub coordinators: Vec<String>,
    pub seniors: Vec<String>,
    pub developers: Vec<String>,
}

impl TeamRoster {
    pub fn is_coordinator(&self, user_name: &str, groups: &[String]) -> bool {
        names_member(&self.coordinators, user_name, groups)
    }

    pub fn is_developer(&self, user_name: &str, groups: &[String]) -> bool {
        names_member(&self.developers, user_name, groups)
    }

    /// Listed in any role
    pub fn is_member(&self, user_name: &str, groups: &[String]) -> bool {
        self.is_coordinator(user_name, groups)
            || names_member(&self.seniors, user_name, groups)
            || self.is_developer(user_name, groups)
    }
}

fn names_member(entries: &[String], user_name: &str, groups: &[String]) -> bool {
    entries
        .iter()
        .any(|entry| entry == user_name || groups.iter().any(|g| g == entry))
}
