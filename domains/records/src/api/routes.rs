//! Route definitions for the timesheet records API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{entries, timesheets};
use super::middleware::RecordsState;

/// Timesheet routes
fn timesheet_routes() -> Router<RecordsState> {
    Router::new()
        .route("/timesheets", get(timesheets::list_timesheets))
        .route("/timesheets/my", get(timesheets::my_timesheet))
        .route("/timesheets/{id}", get(timesheets::get_timesheet))
        .route("/timesheets/owner/{id}", get(timesheets::get_owner))
        .route(
            "/timesheets/{id}/changeHours",
            post(timesheets::change_hours),
        )
        .route(
            "/timesheetID/fromUser/{user_name}",
            get(timesheets::timesheet_id_for_user),
        )
        .route("/coordinator/{id}", get(timesheets::get_timesheet))
}

/// Entry routes
fn entry_routes() -> Router<RecordsState> {
    Router::new()
        .route(
            "/timesheets/{id}/entries",
            get(entries::list_entries).post(entries::import_entries),
        )
        .route("/timesheets/{id}/entry", post(entries::create_entry))
        .route("/timesheets/{id}/entry/", post(entries::create_entry))
        .route(
            "/entries/{id}",
            put(entries::update_entry).delete(entries::delete_entry),
        )
        .route("/coordinator/{id}/entries", get(entries::list_entries))
        .route("/timesheet/{id}/teamEntries", get(entries::team_entries))
}

/// Create all records domain routes
pub fn routes() -> Router<RecordsState> {
    Router::new()
        .merge(timesheet_routes())
        .merge(entry_routes())
}
