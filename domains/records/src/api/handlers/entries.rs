//! Timesheet entry handlers
//!
//! Reading follows the timesheet read rule, coordinators included. Booking,
//! editing and deleting entries is limited to the owner and callers passing
//! the permission gate.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use timesheet_auth::AuthUser;
use timesheet_common::{Error, Result, ValidatedJson};
use validator::Validate;

use super::timesheets::{authorize_read, authorize_write, load_timesheet};
use crate::api::json::{JsonEntry, JsonEntryImport};
use crate::api::middleware::RecordsState;
use crate::domain::entities::{Timesheet, TimesheetEntry};

/// Load an entry together with its timesheet
async fn load_entry(state: &RecordsState, id: i32) -> Result<(TimesheetEntry, Timesheet)> {
    let entry = state
        .entries
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Entry {} not found", id)))?;
    let timesheet = load_timesheet(state, entry.timesheet_id).await?;

    Ok((entry, timesheet))
}

/// Entries of a timesheet, newest first
///
/// **GET /timesheets/{id}/entries**, **GET /coordinator/{id}/entries**
pub async fn list_entries(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<JsonEntry>>> {
    let timesheet = load_timesheet(&state, id).await?;
    authorize_read(&state, &caller, &timesheet).await?;

    let entries = state.entries.entries_of(&timesheet).await?;

    Ok(Json(entries.into_iter().map(JsonEntry::from).collect()))
}

/// **POST /timesheets/{id}/entry**
pub async fn create_entry(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<JsonEntry>,
) -> Result<(StatusCode, Json<JsonEntry>)> {
    let timesheet = load_timesheet(&state, id).await?;
    authorize_write(&state, &caller, &timesheet).await?;

    let entry = state.entries.add(&timesheet, request.into_draft()).await?;

    tracing::info!(
        user_key = %caller.user_key(),
        timesheet_id = timesheet.id,
        entry_id = entry.id,
        "Entry booked"
    );

    Ok((StatusCode::CREATED, Json(JsonEntry::from(entry))))
}

/// Bulk import, typically pasted from a spreadsheet
///
/// **POST /timesheets/{id}/entries**
///
/// Rows failing validation are skipped and reported in `errorMessages`.
pub async fn import_entries(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
    body: std::result::Result<Json<Vec<JsonEntry>>, JsonRejection>,
) -> Result<Json<JsonEntryImport>> {
    let Json(rows) = body.map_err(|e| Error::Validation(e.body_text()))?;

    let timesheet = load_timesheet(&state, id).await?;
    authorize_write(&state, &caller, &timesheet).await?;

    let drafts = rows
        .into_iter()
        .map(|row| match row.validate() {
            Ok(()) => Ok(row.into_draft()),
            Err(e) => Err(e.to_string()),
        })
        .collect();
    let outcome = state.entries.import(&timesheet, drafts).await?;

    tracing::info!(
        user_key = %caller.user_key(),
        timesheet_id = timesheet.id,
        imported = outcome.entries.len(),
        "Entry import finished"
    );

    Ok(Json(JsonEntryImport::from(outcome)))
}

/// **PUT /entries/{id}**
pub async fn update_entry(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<JsonEntry>,
) -> Result<Json<JsonEntry>> {
    if request.entry_id.is_some_and(|body_id| body_id != id) {
        return Err(Error::Validation(
            "entryID does not match the request path".to_string(),
        ));
    }

    let (entry, timesheet) = load_entry(&state, id).await?;
    authorize_write(&state, &caller, &timesheet).await?;

    let updated = state
        .entries
        .edit(&timesheet, entry, request.into_draft())
        .await?;

    Ok(Json(JsonEntry::from(updated)))
}

/// **DELETE /entries/{id}**
pub async fn delete_entry(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let (entry, timesheet) = load_entry(&state, id).await?;
    authorize_write(&state, &caller, &timesheet).await?;

    state.entries.delete(&timesheet, &entry).await?;

    tracing::info!(
        user_key = %caller.user_key(),
        timesheet_id = timesheet.id,
        entry_id = entry.id,
        "Entry removed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Entries booked on the teams of the timesheet's owner
///
/// **GET /timesheet/{id}/teamEntries**
pub async fn team_entries(
    AuthUser(caller): AuthUser,
    State(state): State<RecordsState>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<JsonEntry>>> {
    let timesheet = load_timesheet(&state, id).await?;
    authorize_read(&state, &caller, &timesheet).await?;

    let owner = state
        .auth
        .identity()
        .find_user(&timesheet.user_key)
        .await
        .map_err(|e| Error::Internal(format!("Failed to load owner: {:?}", e)))?;

    let team_ids: Vec<i32> = match owner {
        Some(owner) => state
            .auth
            .teams_of(&owner)
            .await
            .map_err(|e| Error::Internal(format!("Failed to resolve teams: {:?}", e)))?
            .into_iter()
            .map(|roster| roster.team_id)
            .collect(),
        None => Vec::new(),
    };

    let entries = state.entries.team_entries(&team_ids).await?;

    Ok(Json(entries.into_iter().map(JsonEntry::from).collect()))
}
