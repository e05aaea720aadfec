//! Configuration snapshot, directories, and team permission handlers
//!
//! Every handler here takes `PermittedUser` first, so a denied caller is
//! turned away before any store is touched.

use axum::{extract::State, http::StatusCode, Json};
use timesheet_auth::PermittedUser;
use timesheet_common::{Error, Result};

use crate::api::json::{JsonConfig, NameBody};
use crate::api::middleware::ConfigState;
use crate::domain::entities::TeamGroups;
use crate::domain::validation::validate_team_rename;

/// Configuration snapshot
///
/// **GET /config/getConfig**
pub async fn get_config(
    PermittedUser(_caller): PermittedUser,
    State(state): State<ConfigState>,
) -> Result<Json<JsonConfig>> {
    let config = state
        .config
        .get_configuration()
        .await
        .map_err(|e| Error::Internal(format!("Failed to load configuration: {}", e)))?;

    Ok(Json(JsonConfig::from_configuration(config)))
}

/// One entry per directory known to the identity provider
///
/// **GET /config/getDirectories**
pub async fn get_directories(
    PermittedUser(_caller): PermittedUser,
    State(state): State<ConfigState>,
) -> Result<Json<Vec<JsonConfig>>> {
    let directories = state
        .auth
        .identity()
        .find_all_directories()
        .await
        .map_err(|e| Error::Internal(format!("Failed to list directories: {:?}", e)))?;

    Ok(Json(
        directories
            .into_iter()
            .map(|d| JsonConfig::directory(d.id))
            .collect(),
    ))
}

/// Team names of the configuration
///
/// **GET /config/getTeamList**
pub async fn get_team_list(
    PermittedUser(_caller): PermittedUser,
    State(state): State<ConfigState>,
) -> Result<Json<Vec<String>>> {
    let config = state
        .config
        .get_configuration()
        .await
        .map_err(|e| Error::Internal(format!("Failed to load configuration: {}", e)))?;

    Ok(Json(config.team_names()))
}

/// Apply a configuration update
///
/// **PUT /config/saveConfig**
///
/// Mail fields are always overwritten. Each list that is present replaces
/// the stored set wholesale; an absent list leaves it alone. Teams are
/// replaced entry by entry: any team of the same name is removed first.
pub async fn save_config(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    Json(update): Json<JsonConfig>,
) -> Result<StatusCode> {
    let store = &state.config;

    store
        .edit_mail(&update.mail_settings())
        .await
        .map_err(|e| Error::Internal(format!("Failed to update mail settings: {}", e)))?;

    if let Some(directory_id) = update.user_directory_id {
        store
            .set_user_directory_id(directory_id)
            .await
            .map_err(|e| Error::Internal(format!("Failed to update user directory: {}", e)))?;
    }

    if let Some(groups) = &update.approved_groups {
        store
            .clear_approved_groups()
            .await
            .map_err(|e| Error::Internal(format!("Failed to clear approved groups: {}", e)))?;

        for group_name in groups {
            store
                .add_approved_group(group_name)
                .await
                .map_err(|e| Error::Internal(format!("Failed to add approved group: {}", e)))?;
        }
    }

    if let Some(user_names) = &update.approved_users {
        store
            .clear_approved_users()
            .await
            .map_err(|e| Error::Internal(format!("Failed to clear approved users: {}", e)))?;

        for user_name in user_names {
            let profile = state
                .auth
                .identity()
                .find_user_by_name(user_name)
                .await
                .map_err(|e| Error::Internal(format!("Failed to resolve user: {:?}", e)))?;

            // TODO: store profile.user_key once existing clients stop relying on
            // the caller's own key being recorded here.
            if profile.is_some() {
                store
                    .add_approved_user(caller.user_key())
                    .await
                    .map_err(|e| Error::Internal(format!("Failed to add approved user: {}", e)))?;
            }
        }
    }

    if let Some(teams) = &update.teams {
        for team in teams {
            store
                .remove_team(&team.team_name)
                .await
                .map_err(|e| Error::Internal(format!("Failed to remove team: {}", e)))?;
            store
                .add_team(&team.team_name, &team.groups())
                .await
                .map_err(|e| Error::Internal(format!("Failed to add team: {}", e)))?;
        }
    }

    tracing::info!(user_key = %caller.user_key(), "Configuration saved");

    Ok(StatusCode::NO_CONTENT)
}

/// Add a team without permission groups
///
/// **PUT /config/addTeamPermission**
pub async fn add_team_permission(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(team_name): NameBody,
) -> Result<StatusCode> {
    let team = state
        .config
        .add_team(&team_name, &TeamGroups::default())
        .await
        .map_err(|e| Error::Internal(format!("Failed to add team: {}", e)))?
        .ok_or_else(Error::failed)?;

    tracing::info!(
        user_key = %caller.user_key(),
        team_id = team.id,
        team_name = %team.name,
        "Team added"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Rename a team
///
/// **PUT /config/editTeamPermission**
///
/// Body is `[oldName, newName]`. Rejected renames report their reason as
/// the response body.
pub async fn edit_team_permission(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    Json(names): Json<Option<Vec<String>>>,
) -> Result<StatusCode> {
    let (old_name, new_name) = match names.as_deref() {
        Some([old_name, new_name]) => (old_name, new_name),
        _ => return Err(Error::failed()),
    };

    validate_team_rename(old_name, new_name)?;

    let team = state
        .config
        .edit_team(old_name, new_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to rename team: {}", e)))?
        .ok_or_else(Error::failed)?;

    tracing::info!(
        user_key = %caller.user_key(),
        team_id = team.id,
        old_name = %old_name,
        new_name = %team.name,
        "Team renamed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Remove a team and its permission groups
///
/// **PUT /config/removeTeamPermission**
pub async fn remove_team_permission(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(team_name): NameBody,
) -> Result<StatusCode> {
    let removed = state
        .config
        .remove_team(&team_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to remove team: {}", e)))?;

    if !removed {
        return Err(Error::failed());
    }

    tracing::info!(user_key = %caller.user_key(), team_name = %team_name, "Team removed");

    Ok(StatusCode::NO_CONTENT)
}
