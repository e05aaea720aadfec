//! PostgreSQL configuration store

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use timesheet_auth::{ApprovalSource, AuthError, TeamRoster, TeamRosterSource};
use timesheet_common::RepositoryError;

use super::{CategoryStore, ConfigStore, StoreResult, TeamStore};
use crate::domain::entities::{
    ApprovedGroup, ApprovedUser, Category, Configuration, MailSettings, Team, TeamGroups, TeamRole,
};
use crate::domain::validation::normalize_name;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i32,
    team_name: String,
}

#[derive(sqlx::FromRow)]
struct TeamGroupRow {
    team_id: i32,
    role: TeamRole,
    group_name: String,
}

#[derive(sqlx::FromRow)]
struct TeamCategoryRow {
    team_id: i32,
    category_id: i32,
}

#[derive(sqlx::FromRow)]
struct ConfigurationRow {
    mail_from_name: Option<String>,
    mail_from: Option<String>,
    mail_subject: Option<String>,
    mail_body: Option<String>,
    user_directory_id: i64,
}

#[derive(Clone)]
pub struct PgConfigStore {
    pool: PgPool,
}

impl PgConfigStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load teams with their groups and category links
    async fn load_teams(&self) -> StoreResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, team_name
            FROM teams
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let group_rows = sqlx::query_as::<_, TeamGroupRow>(
            r#"
            SELECT team_id, role, group_name
            FROM team_groups
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let link_rows = sqlx::query_as::<_, TeamCategoryRow>(
            r#"
            SELECT team_id, category_id
            FROM team_categories
            ORDER BY category_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut groups: HashMap<i32, TeamGroups> = HashMap::new();
        for row in group_rows {
            groups
                .entry(row.team_id)
                .or_default()
                .push(row.role, row.group_name);
        }

        let mut categories: HashMap<i32, Vec<i32>> = HashMap::new();
        for row in link_rows {
            categories.entry(row.team_id).or_default().push(row.category_id);
        }

        Ok(rows
            .into_iter()
            .map(|row| Team {
                id: row.id,
                name: row.team_name,
                category_ids: categories.remove(&row.id).unwrap_or_default(),
                groups: groups.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn insert_team(&self, name: &str, groups: &TeamGroups) -> StoreResult<Option<Team>> {
        let Some(name) = normalize_name(name) else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (team_name)
            VALUES ($1)
            ON CONFLICT (team_name) DO NOTHING
            RETURNING id, team_name
            "#,
        )
        .bind(&name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        for (role, group_name) in groups.entries() {
            sqlx::query(
                r#"
                INSERT INTO team_groups (team_id, role, group_name)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(row.id)
            .bind(role)
            .bind(group_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Some(Team {
            id: row.id,
            name: row.team_name,
            category_ids: Vec::new(),
            groups: groups.clone(),
        }))
    }

    async fn delete_team_by_name(&self, name: &str) -> StoreResult<bool> {
        // team_groups and team_categories cascade
        let result = sqlx::query("DELETE FROM teams WHERE team_name = $1")
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_team(&self, id: i32) -> StoreResult<Option<Team>> {
        Ok(self.load_teams().await?.into_iter().find(|t| t.id == id))
    }
}

#[async_trait]
impl ConfigStore for PgConfigStore {
    async fn get_configuration(&self) -> StoreResult<Configuration> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r#"
            SELECT mail_from_name, mail_from, mail_subject, mail_body, user_directory_id
            FROM configuration
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::InvalidData("Configuration row is missing".to_string()))?;

        let approved_users = sqlx::query_as::<_, ApprovedUser>(
            "SELECT id, user_key FROM approved_users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let approved_groups = sqlx::query_as::<_, ApprovedGroup>(
            "SELECT id, group_name FROM approved_groups ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let teams = self.load_teams().await?;

        Ok(Configuration {
            mail: MailSettings {
                mail_from_name: row.mail_from_name,
                mail_from: row.mail_from,
                mail_subject: row.mail_subject,
                mail_body: row.mail_body,
            },
            user_directory_id: row.user_directory_id,
            approved_groups,
            approved_users,
            teams,
        })
    }

    async fn edit_mail(&self, mail: &MailSettings) -> StoreResult<()> {
        sqlx::query(
            r#"
            UPDATE configuration
            SET mail_from_name = $1, mail_from = $2, mail_subject = $3, mail_body = $4
            WHERE id = 1
            "#,
        )
        .bind(&mail.mail_from_name)
        .bind(&mail.mail_from)
        .bind(&mail.mail_subject)
        .bind(&mail.mail_body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_user_directory_id(&self, directory_id: i64) -> StoreResult<()> {
        sqlx::query("UPDATE configuration SET user_directory_id = $1 WHERE id = 1")
            .bind(directory_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear_approved_groups(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM approved_groups")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_approved_group(&self, group_name: &str) -> StoreResult<ApprovedGroup> {
        let group = sqlx::query_as::<_, ApprovedGroup>(
            r#"
            INSERT INTO approved_groups (group_name)
            VALUES ($1)
            RETURNING id, group_name
            "#,
        )
        .bind(group_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(group)
    }

    async fn clear_approved_users(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM approved_users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn add_approved_user(&self, user_key: &str) -> StoreResult<ApprovedUser> {
        let user = sqlx::query_as::<_, ApprovedUser>(
            r#"
            INSERT INTO approved_users (user_key)
            VALUES ($1)
            RETURNING id, user_key
            "#,
        )
        .bind(user_key)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn add_team(&self, name: &str, groups: &TeamGroups) -> StoreResult<Option<Team>> {
        self.insert_team(name, groups).await
    }

    async fn edit_team(&self, old_name: &str, new_name: &str) -> StoreResult<Option<Team>> {
        let Some(new_name) = normalize_name(new_name) else {
            return Ok(None);
        };
        let old_name = old_name.trim();
        if new_name == old_name {
            return Ok(None);
        }

        let renamed = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE teams
            SET team_name = $2
            WHERE team_name = $1
            RETURNING id
            "#,
        )
        .bind(old_name)
        .bind(&new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(RepositoryError::from);

        match renamed {
            Ok(Some(id)) => self.find_team(id).await,
            Ok(None) => Ok(None),
            Err(e) if e.is_unique_violation() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn remove_team(&self, name: &str) -> StoreResult<bool> {
        self.delete_team_by_name(name).await
    }
}

#[async_trait]
impl TeamStore for PgConfigStore {
    async fn all_teams(&self) -> StoreResult<Vec<Team>> {
        self.load_teams().await
    }

    async fn create_team(&self, name: &str) -> StoreResult<Option<Team>> {
        self.insert_team(name, &TeamGroups::default()).await
    }

    async fn delete_team(&self, name: &str) -> StoreResult<bool> {
        self.delete_team_by_name(name).await
    }

    async fn assign_category(&self, team_name: &str, category_name: &str) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO team_categories (team_id, category_id)
            SELECT t.id, c.id
            FROM teams t, categories c
            WHERE t.team_name = $1 AND c.name = $2
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(team_name.trim())
        .bind(category_name.trim())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Already linked counts as success
        let linked = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM teams t, categories c
                WHERE t.team_name = $1 AND c.name = $2
            )
            "#,
        )
        .bind(team_name.trim())
        .bind(category_name.trim())
        .fetch_one(&self.pool)
        .await?;

        Ok(linked)
    }
}

#[async_trait]
impl CategoryStore for PgConfigStore {
    async fn all_categories(&self) -> StoreResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(categories)
    }

    async fn create_category(&self, name: &str) -> StoreResult<Option<Category>> {
        let Some(name) = normalize_name(name) else {
            return Ok(None);
        };

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            ON CONFLICT (name) DO NOTHING
            RETURNING id, name
            "#,
        )
        .bind(&name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete_category(&self, name: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE name = $1")
            .bind(name.trim())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ApprovalSource for PgConfigStore {
    async fn approved_user_keys(&self) -> Result<Vec<String>, AuthError> {
        sqlx::query_scalar::<_, String>("SELECT user_key FROM approved_users ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to load approved users");
                AuthError::ApprovalsLoadError
            })
    }

    async fn approved_group_names(&self) -> Result<Vec<String>, AuthError> {
        sqlx::query_scalar::<_, String>("SELECT group_name FROM approved_groups ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to load approved groups");
                AuthError::ApprovalsLoadError
            })
    }
}

#[async_trait]
impl TeamRosterSource for PgConfigStore {
    async fn team_rosters(&self) -> Result<Vec<TeamRoster>, AuthError> {
        let teams = self.load_teams().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to load team rosters");
            AuthError::TeamsLoadError
        })?;

        Ok(teams.iter().map(Team::roster).collect())
    }
}
