//! Team and category directory handlers

use axum::{extract::State, http::StatusCode, Json};
use timesheet_auth::{AuthError, AuthUser, KnownUser, PermittedUser};
use timesheet_common::{Error, Result};

use crate::api::json::{JsonCategory, JsonTeam, NameBody};
use crate::api::middleware::ConfigState;

/// All categories
///
/// **GET /config/getCategories**
///
/// Open to anonymous callers.
pub async fn get_categories(State(state): State<ConfigState>) -> Result<Json<Vec<JsonCategory>>> {
    let categories = state
        .categories
        .all_categories()
        .await
        .map_err(|e| Error::Internal(format!("Failed to list categories: {}", e)))?;

    Ok(Json(categories.into_iter().map(JsonCategory::from).collect()))
}

/// All teams with their category ids
///
/// **GET /config/getTeams**
pub async fn get_teams(
    KnownUser(_caller): KnownUser,
    State(state): State<ConfigState>,
) -> Result<Json<Vec<JsonTeam>>> {
    let teams = state
        .teams
        .all_teams()
        .await
        .map_err(|e| Error::Internal(format!("Failed to list teams: {}", e)))?;

    Ok(Json(teams.into_iter().map(JsonTeam::summary).collect()))
}

/// Categories offered by the entry form
///
/// **GET /categories**
pub async fn list_categories(
    AuthUser(_caller): AuthUser,
    State(state): State<ConfigState>,
) -> Result<Json<Vec<JsonCategory>>> {
    let categories = state
        .categories
        .all_categories()
        .await
        .map_err(|e| Error::Internal(format!("Failed to list categories: {}", e)))?;

    Ok(Json(categories.into_iter().map(JsonCategory::from).collect()))
}

/// Teams the caller may book entries for
///
/// **GET /teams**
///
/// Callers passing the permission gate see every team; everyone else sees
/// the teams that list them in any role.
pub async fn list_teams(
    AuthUser(caller): AuthUser,
    State(state): State<ConfigState>,
) -> Result<Json<Vec<JsonTeam>>> {
    let teams = state
        .teams
        .all_teams()
        .await
        .map_err(|e| Error::Internal(format!("Failed to list teams: {}", e)))?;

    let permitted = match state.auth.check_permission(&caller).await {
        Ok(()) => true,
        Err(AuthError::Forbidden) => false,
        Err(e) => return Err(Error::Internal(format!("Permission check failed: {:?}", e))),
    };
    if permitted {
        return Ok(Json(teams.into_iter().map(JsonTeam::summary).collect()));
    }

    let member_of: Vec<i32> = state
        .auth
        .teams_of(&caller.user)
        .await
        .map_err(|e| Error::Internal(format!("Failed to resolve teams: {:?}", e)))?
        .into_iter()
        .map(|roster| roster.team_id)
        .collect();

    Ok(Json(
        teams
            .into_iter()
            .filter(|team| member_of.contains(&team.id))
            .map(JsonTeam::summary)
            .collect(),
    ))
}

/// **PUT /config/addTeam**
pub async fn add_team(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(team_name): NameBody,
) -> Result<StatusCode> {
    let team = state
        .teams
        .create_team(&team_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to create team: {}", e)))?
        .ok_or_else(Error::failed)?;

    tracing::info!(
        user_key = %caller.user_key(),
        team_id = team.id,
        team_name = %team.name,
        "Team created"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// **PUT /config/removeTeam**
pub async fn remove_team(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(team_name): NameBody,
) -> Result<StatusCode> {
    let deleted = state
        .teams
        .delete_team(&team_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to delete team: {}", e)))?;

    if !deleted {
        return Err(Error::failed());
    }

    tracing::info!(user_key = %caller.user_key(), team_name = %team_name, "Team deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// **PUT /config/addCategory**
pub async fn add_category(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(category_name): NameBody,
) -> Result<StatusCode> {
    let category = state
        .categories
        .create_category(&category_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to create category: {}", e)))?
        .ok_or_else(Error::failed)?;

    tracing::info!(
        user_key = %caller.user_key(),
        category_id = category.id,
        category_name = %category.name,
        "Category created"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// **PUT /config/removeCategory**
pub async fn remove_category(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    NameBody(category_name): NameBody,
) -> Result<StatusCode> {
    let deleted = state
        .categories
        .delete_category(&category_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to delete category: {}", e)))?;

    if !deleted {
        return Err(Error::failed());
    }

    tracing::info!(
        user_key = %caller.user_key(),
        category_name = %category_name,
        "Category deleted"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Link a category to a team
///
/// **PUT /config/assignCategory**
///
/// Body is `[teamName, categoryName]`.
pub async fn assign_category(
    PermittedUser(caller): PermittedUser,
    State(state): State<ConfigState>,
    Json(names): Json<Option<Vec<String>>>,
) -> Result<StatusCode> {
    let (team_name, category_name) = match names.as_deref() {
        Some([team_name, category_name]) => (team_name, category_name),
        _ => return Err(Error::failed()),
    };

    let assigned = state
        .teams
        .assign_category(team_name, category_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to assign category: {}", e)))?;

    if !assigned {
        return Err(Error::failed());
    }

    tracing::info!(
        user_key = %caller.user_key(),
        team_name = %team_name,
        category_name = %category_name,
        "Category assigned"
    );

    Ok(StatusCode::NO_CONTENT)
}
