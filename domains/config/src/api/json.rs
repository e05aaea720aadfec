//! Wire types for the `/config` endpoints
//!
//! Field names follow the JSON the timesheet front-end already speaks.

use axum::extract::{FromRequest, Request};
use serde::{Deserialize, Serialize};
use timesheet_common::Error;

use crate::domain::entities::{Category, Configuration, MailSettings, Team, TeamGroups};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCategory {
    #[serde(rename = "categoryID")]
    pub category_id: i32,
    #[serde(rename = "categoryName")]
    pub category_name: String,
}

impl From<Category> for JsonCategory {
    fn from(category: Category) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name,
        }
    }
}

/// Team as sent and received by the front-end.
///
/// Listing endpoints fill only id, name and categories; the configuration
/// snapshot carries the group lists as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTeam {
    #[serde(rename = "teamID", default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<i32>,
    pub team_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_categories: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinator_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senior_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_groups: Option<Vec<String>>,
}

impl JsonTeam {
    /// Id, name and category ids only
    pub fn summary(team: Team) -> Self {
        Self {
            team_id: Some(team.id),
            team_name: team.name,
            team_categories: Some(team.category_ids),
            ..Self::default()
        }
    }

    /// Everything, group lists included
    pub fn detailed(team: Team) -> Self {
        let TeamGroups {
            coordinator,
            senior,
            developer,
        } = team.groups;

        Self {
            team_id: Some(team.id),
            team_name: team.name,
            team_categories: Some(team.category_ids),
            coordinator_groups: Some(coordinator),
            senior_groups: Some(senior),
            developer_groups: Some(developer),
        }
    }

    /// Group lists of an incoming entry; missing lists are empty
    pub fn groups(&self) -> TeamGroups {
        TeamGroups::new(
            self.coordinator_groups.clone().unwrap_or_default(),
            self.senior_groups.clone().unwrap_or_default(),
            self.developer_groups.clone().unwrap_or_default(),
        )
    }
}

/// Configuration snapshot and update payload.
///
/// In an update, `None` lists leave the stored sets untouched while the mail
/// fields are always overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<JsonTeam>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_users: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_directory_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_from_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail_body: Option<String>,
}

impl JsonConfig {
    /// Full snapshot with teams sorted by name
    pub fn from_configuration(config: Configuration) -> Self {
        let approved_users = config.approved_user_keys();
        let approved_groups = config.approved_group_names();

        let mut teams = config.teams;
        teams.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            teams: Some(teams.into_iter().map(JsonTeam::detailed).collect()),
            approved_groups: Some(approved_groups),
            approved_users: Some(approved_users),
            user_directory_id: Some(config.user_directory_id),
            mail_from_name: config.mail.mail_from_name,
            mail_from: config.mail.mail_from,
            mail_subject: config.mail.mail_subject,
            mail_body: config.mail.mail_body,
        }
    }

    /// Entry of the directory listing
    pub fn directory(id: i64) -> Self {
        Self {
            user_directory_id: Some(id),
            ..Self::default()
        }
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            mail_from_name: self.mail_from_name.clone(),
            mail_from: self.mail_from.clone(),
            mail_subject: self.mail_subject.clone(),
            mail_body: self.mail_body.clone(),
        }
    }
}

/// Team or category name sent as the request body.
///
/// Accepts a JSON string literal as well as bare text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameBody(pub String);

impl<S> FromRequest<S> for NameBody
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let raw = String::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(e.body_text()))?;

        Ok(NameBody(parse_name(&raw)))
    }
}

fn parse_name(raw: &str) -> String {
    match serde_json::from_str::<String>(raw) {
        Ok(name) => name,
        Err(_) => raw.trim().to_string(),
    }
}
