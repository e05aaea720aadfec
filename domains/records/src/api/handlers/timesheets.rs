//! Timesheet handlers
//!
//! Owners may read and adjust their own timesheet. Callers passing the
//! permission gate may do the same for anyone's. Coordinators of a team may
//! read the timesheets of its developers.

use axum::{
    extract::{Path, State},
    Json,
};
use timesheet_auth::{AuthContext, AuthError, AuthUser, PermittedUser};
use timesheet_common::{Error, Result, ValidatedJson};

use crate::api::json::{ChangeHoursRequest, JsonTimesheet, JsonUser};
use crate::api::middleware::RecordsState;
use crate::domain::entities::{Timesheet, TimesheetTargets};

/// Load a timesheet or fail with 404
pub(crate) async fn load_timesheet(state: &RecordsState, id: i32) -> Result<Timesheet> {
    state
        .timesheets
        .get_timesheet_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Timesheet {} not found", id)))
}

fn access_denied(e: AuthError) -> Error {
    match e {
        AuthError::Forbidden => {
            Error::Authorization("User is not allowed to access this timesheet".to_string())
        }
        other => Error::Internal(format!("Permission check failed: {:?}", other)),
    }
}

/// Owner, a caller that passes the permission gate, or a coordinator of the
/// owner's team
pub(crate) async fn authorize_read(
    state: &RecordsState,
    caller: &AuthContext,
    timesheet: &Timesheet,
) -> Result<()> {
    state
        .auth
        .check_record_access(caller, &timesheet.user_key)
        .await
        .map_err(access_denied)
}

/// Owner, or a caller that passes the permission gate
pub(crate) async fn authorize_write(
    state: &RecordsState,
    caller: &AuthContext,
    timesheet: &Timesheet,
) -> Result<()> {
    if caller.is_owner_of(&timesheet.user_key) {
        return Ok(());
    }

    state.auth.check_permission(caller).await.map_err(access_denied)
}

/// All timesheets
///
/// **GET /timesheets**
pub async fn list_timesheets(
    PermittedUser(_caller): PermittedUser,
    State(state): State<RecordsState>,
) -> Result<Json<Vec<JsonTimesheet>>> {
    let timesheets = state.timesheets.all().await?;

    Ok(Json(
        timesheets.into_iter().map(JsonTimesheet::from).collect(),
    ))
}

/// The caller's own timesheet, created on first access
///
/// **GET /timesheets/my**
pub async fn my_timesheet(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
) -> Result<Json<JsonTimesheet>> {
    let existing = state
        .timesheets
        .get_timesheet_by_user(caller.user_key())
        .await?;

    let timesheet = match existing {
        Some(timesheet) => timesheet,
        None => {
            state
                .timesheets
                .add(caller.user_key(), TimesheetTargets::default())
                .await?
        }
    };

    Ok(Json(JsonTimesheet::from(timesheet)))
}

/// **GET /timesheets/{id}**
pub async fn get_timesheet(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
) -> Result<Json<JsonTimesheet>> {
    let timesheet = load_timesheet(&state, id).await?;
    authorize_read(&state, &caller, &timesheet).await?;

    Ok(Json(JsonTimesheet::from(timesheet)))
}

/// Profile of the timesheet's owner
///
/// **GET /timesheets/owner/{id}**
pub async fn get_owner(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
) -> Result<Json<JsonUser>> {
    let timesheet = load_timesheet(&state, id).await?;
    authorize_read(&state, &caller, &timesheet).await?;

    let owner = state
        .auth
        .identity()
        .find_user(&timesheet.user_key)
        .await
        .map_err(|e| Error::Internal(format!("Failed to load owner: {:?}", e)))?
        .ok_or_else(|| Error::NotFound("Timesheet owner not found".to_string()))?;

    Ok(Json(JsonUser::from(owner)))
}

/// Id of a user's timesheet
///
/// **GET /timesheetID/fromUser/{user_name}**
///
/// Unknown users are reported as 404 only to callers passing the
/// permission gate.
pub async fn timesheet_id_for_user(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(user_name): Path<String>,
) -> Result<Json<i32>> {
    let user = state
        .auth
        .identity()
        .find_user_by_name(&user_name)
        .await
        .map_err(|e| Error::Internal(format!("Failed to resolve user: {:?}", e)))?;

    let Some(user) = user else {
        state
            .auth
            .check_permission(&caller)
            .await
            .map_err(access_denied)?;
        return Err(Error::NotFound(format!("User {} not found", user_name)));
    };

    state
        .auth
        .check_record_access(&caller, &user.user_key)
        .await
        .map_err(access_denied)?;

    let timesheet = state
        .timesheets
        .get_timesheet_by_user(&user.user_key)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} has no timesheet", user_name)))?;

    Ok(Json(timesheet.id))
}

/// Adjust target hours
///
/// **POST /timesheets/{id}/changeHours**
pub async fn change_hours(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ChangeHoursRequest>,
) -> Result<Json<JsonTimesheet>> {
    if request.timesheet_id.is_some_and(|body_id| body_id != id) {
        return Err(Error::Validation(
            "timesheetID does not match the request path".to_string(),
        ));
    }

    let timesheet = load_timesheet(&state, id).await?;
    authorize_write(&state, &caller, &timesheet).await?;

    let update = request.into_update(&timesheet);
    let updated = state
        .timesheets
        .edit_timesheet(&timesheet.user_key, update)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Timesheet {} not found", id)))?;

    tracing::info!(
        user_key = %caller.user_key(),
        timesheet_id = updated.id,
        target_hours_practice = updated.target_hours_practice,
        "Timesheet hours changed"
    );

    Ok(Json(JsonTimesheet::from(updated)))
}
