//! Domain entities for the configuration domain
//!
//! The configuration is a single record owning the mail templates, the
//! approved user and group allowlists and the team roster. Teams and
//! categories carry store-generated integer identifiers.

use serde::{Deserialize, Serialize};
use timesheet_auth::TeamRoster;

/// Role a directory group plays inside a team
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "team_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TeamRole {
    Coordinator,
    Senior,
    Developer,
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamRole::Coordinator => write!(f, "coordinator"),
            TeamRole::Senior => write!(f, "senior"),
            TeamRole::Developer => write!(f, "developer"),
        }
    }
}

/// Permission groups attached to a team, one list per role
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TeamGroups {
    pub coordinator: Vec<String>,
    pub senior: Vec<String>,
    pub developer: Vec<String>,
}

impl TeamGroups {
    pub fn new(coordinator: Vec<String>, senior: Vec<String>, developer: Vec<String>) -> Self {
        Self {
            coordinator,
            senior,
            developer,
        }
    }

    /// Flatten into `(role, group)` pairs in role order
    pub fn entries(&self) -> impl Iterator<Item = (TeamRole, &str)> {
        self.coordinator
            .iter()
            .map(|g| (TeamRole::Coordinator, g.as_str()))
            .chain(self.senior.iter().map(|g| (TeamRole::Senior, g.as_str())))
            .chain(
                self.developer
                    .iter()
                    .map(|g| (TeamRole::Developer, g.as_str())),
            )
    }

    pub fn push(&mut self, role: TeamRole, group: String) {
        match role {
            TeamRole::Coordinator => self.coordinator.push(group),
            TeamRole::Senior => self.senior.push(group),
            TeamRole::Developer => self.developer.push(group),
        }
    }

    pub fn for_role(&self, role: TeamRole) -> &[String] {
        match role {
            TeamRole::Coordinator => &self.coordinator,
            TeamRole::Senior => &self.senior,
            TeamRole::Developer => &self.developer,
        }
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i32,
    pub name: String,
    /// Associated category ids, resolved when the team is loaded
    pub category_ids: Vec<i32>,
    pub groups: TeamGroups,
}

impl Team {
    /// Role lists as consumed by the permission gate
    pub fn roster(&self) -> TeamRoster {
        TeamRoster {
            team_id: self.id,
            team_name: self.name.clone(),
            coordinators: self.groups.coordinator.clone(),
            seniors: self.groups.senior.clone(),
            developers: self.groups.developer.clone(),
        }
    }
}

/// Category entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// Allowlisted user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ApprovedUser {
    pub id: i32,
    pub user_key: String,
}

/// Allowlisted group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ApprovedGroup {
    pub id: i32,
    pub group_name: String,
}

/// Mail templates used for timesheet notifications
#[derive(Debug, Clone, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct MailSettings {
    pub mail_from_name: Option<String>,
    pub mail_from: Option<String>,
    pub mail_subject: Option<String>,
    pub mail_body: Option<String>,
}

/// Directory id stored before any directory has been chosen
pub const NO_USER_DIRECTORY: i64 = -1;

/// Snapshot of the configuration singleton
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub mail: MailSettings,
    pub user_directory_id: i64,
    pub approved_groups: Vec<ApprovedGroup>,
    pub approved_users: Vec<ApprovedUser>,
    pub teams: Vec<Team>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            mail: MailSettings::default(),
            user_directory_id: NO_USER_DIRECTORY,
            approved_groups: Vec::new(),
            approved_users: Vec::new(),
            teams: Vec::new(),
        }
    }
}

impl Configuration {
    /// Team names in roster order
    pub fn team_names(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.name.clone()).collect()
    }

    pub fn approved_user_keys(&self) -> Vec<String> {
        self.approved_users
            .iter()
            .map(|u| u.user_key.clone())
            .collect()
    }

    pub fn approved_group_names(&self) -> Vec<String> {
        self.approved_groups
            .iter()
            .map(|g| g.group_name.clone())
            .collect()
    }
}
