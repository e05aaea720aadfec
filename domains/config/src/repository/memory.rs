//! In-memory configuration store for local runs and tests.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use timesheet_auth::{ApprovalSource, AuthError, TeamRoster, TeamRosterSource};
use tokio::sync::RwLock;

use super::{CategoryStore, ConfigStore, StoreResult, TeamStore};
use crate::domain::entities::{
    ApprovedGroup, ApprovedUser, Category, Configuration, MailSettings, Team, TeamGroups,
    NO_USER_DIRECTORY,
};
use crate::domain::validation::normalize_name;

#[derive(Debug)]
struct TeamRow {
    name: String,
    groups: TeamGroups,
}

#[derive(Debug)]
struct MemoryState {
    mail: MailSettings,
    user_directory_id: i64,
    approved_users: Vec<ApprovedUser>,
    approved_groups: Vec<ApprovedGroup>,
    teams: BTreeMap<i32, TeamRow>,
    categories: BTreeMap<i32, String>,
    /// `(team_id, category_id)` links
    team_categories: BTreeSet<(i32, i32)>,
    next_id: i32,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            mail: MailSettings::default(),
            user_directory_id: NO_USER_DIRECTORY,
            approved_users: Vec::new(),
            approved_groups: Vec::new(),
            teams: BTreeMap::new(),
            categories: BTreeMap::new(),
            team_categories: BTreeSet::new(),
            next_id: 1,
        }
    }
}

impl MemoryState {
    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Names are stored trimmed, so lookups trim too
    fn team_id(&self, name: &str) -> Option<i32> {
        let name = name.trim();
        self.teams
            .iter()
            .find(|(_, row)| row.name == name)
            .map(|(id, _)| *id)
    }

    fn category_id(&self, name: &str) -> Option<i32> {
        let name = name.trim();
        self.categories
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(id, _)| *id)
    }

    fn all_teams(&self) -> Vec<Team> {
        self.teams.keys().filter_map(|id| self.team(*id)).collect()
    }

    fn team(&self, id: i32) -> Option<Team> {
        let row = self.teams.get(&id)?;
        let category_ids = self
            .team_categories
            .iter()
            .filter(|(team_id, _)| *team_id == id)
            .map(|(_, category_id)| *category_id)
            .collect();

        Some(Team {
            id,
            name: row.name.clone(),
            category_ids,
            groups: row.groups.clone(),
        })
    }

    fn insert_team(&mut self, name: &str, groups: &TeamGroups) -> Option<Team> {
        let name = normalize_name(name)?;
        if self.team_id(&name).is_some() {
            return None;
        }

        let id = self.allocate_id();
        self.teams.insert(
            id,
            TeamRow {
                name,
                groups: groups.clone(),
            },
        );
        self.team(id)
    }

    fn delete_team(&mut self, name: &str) -> bool {
        match self.team_id(name) {
            Some(id) => {
                self.teams.remove(&id);
                self.team_categories.retain(|(team_id, _)| *team_id != id);
                true
            }
            None => false,
        }
    }
}

/// In-memory configuration store.
///
/// Every operation holds the state lock for its whole duration, matching the
/// per-call guarantees of the database store and nothing more.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    state: RwLock<MemoryState>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryConfigStore {
    async fn get_configuration(&self) -> StoreResult<Configuration> {
        let state = self.state.read().await;
        let teams = state.all_teams();

        Ok(Configuration {
            mail: state.mail.clone(),
            user_directory_id: state.user_directory_id,
            approved_groups: state.approved_groups.clone(),
            approved_users: state.approved_users.clone(),
            teams,
        })
    }

    async fn edit_mail(&self, mail: &MailSettings) -> StoreResult<()> {
        self.state.write().await.mail = mail.clone();
        Ok(())
    }

    async fn set_user_directory_id(&self, directory_id: i64) -> StoreResult<()> {
        self.state.write().await.user_directory_id = directory_id;
        Ok(())
    }

    async fn clear_approved_groups(&self) -> StoreResult<()> {
        self.state.write().await.approved_groups.clear();
        Ok(())
    }

    async fn add_approved_group(&self, group_name: &str) -> StoreResult<ApprovedGroup> {
        let mut state = self.state.write().await;
        let group = ApprovedGroup {
            id: state.allocate_id(),
            group_name: group_name.to_string(),
        };
        state.approved_groups.push(group.clone());
        Ok(group)
    }

    async fn clear_approved_users(&self) -> StoreResult<()> {
        self.state.write().await.approved_users.clear();
        Ok(())
    }

    async fn add_approved_user(&self, user_key: &str) -> StoreResult<ApprovedUser> {
        let mut state = self.state.write().await;
        let user = ApprovedUser {
            id: state.allocate_id(),
            user_key: user_key.to_string(),
        };
        state.approved_users.push(user.clone());
        Ok(user)
    }

    async fn add_team(&self, name: &str, groups: &TeamGroups) -> StoreResult<Option<Team>> {
        Ok(self.state.write().await.insert_team(name, groups))
    }

    async fn edit_team(&self, old_name: &str, new_name: &str) -> StoreResult<Option<Team>> {
        let mut state = self.state.write().await;
        let Some(new_name) = normalize_name(new_name) else {
            return Ok(None);
        };
        let Some(id) = state.team_id(old_name) else {
            return Ok(None);
        };
        // Taken includes the team's own name
        if state.team_id(&new_name).is_some() {
            return Ok(None);
        }

        if let Some(row) = state.teams.get_mut(&id) {
            row.name = new_name;
        }
        Ok(state.team(id))
    }

    async fn remove_team(&self, name: &str) -> StoreResult<bool> {
        Ok(self.state.write().await.delete_team(name))
    }
}

#[async_trait]
impl TeamStore for MemoryConfigStore {
    async fn all_teams(&self) -> StoreResult<Vec<Team>> {
        Ok(self.state.read().await.all_teams())
    }

    async fn create_team(&self, name: &str) -> StoreResult<Option<Team>> {
        Ok(self
            .state
            .write()
            .await
            .insert_team(name, &TeamGroups::default()))
    }

    async fn delete_team(&self, name: &str) -> StoreResult<bool> {
        Ok(self.state.write().await.delete_team(name))
    }

    async fn assign_category(&self, team_name: &str, category_name: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match (state.team_id(team_name), state.category_id(category_name)) {
            (Some(team_id), Some(category_id)) => {
                state.team_categories.insert((team_id, category_id));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl CategoryStore for MemoryConfigStore {
    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let state = self.state.read().await;
        Ok(state
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
            })
            .collect())
    }

    async fn create_category(&self, name: &str) -> StoreResult<Option<Category>> {
        let mut state = self.state.write().await;
        let Some(name) = normalize_name(name) else {
            return Ok(None);
        };
        if state.category_id(&name).is_some() {
            return Ok(None);
        }

        let id = state.allocate_id();
        state.categories.insert(id, name.clone());
        Ok(Some(Category { id, name }))
    }

    async fn delete_category(&self, name: &str) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        match state.category_id(name) {
            Some(id) => {
                state.categories.remove(&id);
                state
                    .team_categories
                    .retain(|(_, category_id)| *category_id != id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ApprovalSource for MemoryConfigStore {
    async fn approved_user_keys(&self) -> Result<Vec<String>, AuthError> {
        let state = self.state.read().await;
        Ok(state
            .approved_users
            .iter()
            .map(|u| u.user_key.clone())
            .collect())
    }

    async fn approved_group_names(&self) -> Result<Vec<String>, AuthError> {
        let state = self.state.read().await;
        Ok(state
            .approved_groups
            .iter()
            .map(|g| g.group_name.clone())
            .collect())
    }
}

#[async_trait]
impl TeamRosterSource for MemoryConfigStore {
    async fn team_rosters(&self) -> Result<Vec<TeamRoster>, AuthError> {
        let state = self.state.read().await;
        Ok(state.all_teams().iter().map(Team::roster).collect())
    }
}
