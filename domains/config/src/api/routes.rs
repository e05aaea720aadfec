//! Route definitions for the configuration API

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{config, directory};
use super::middleware::ConfigState;

/// Configuration snapshot and team permission routes
fn config_routes() -> Router<ConfigState> {
    Router::new()
        .route("/config/getConfig", get(config::get_config))
        .route("/config/getDirectories", get(config::get_directories))
        .route("/config/getTeamList", get(config::get_team_list))
        .route("/config/saveConfig", put(config::save_config))
        .route(
            "/config/addTeamPermission",
            put(config::add_team_permission),
        )
        .route(
            "/config/editTeamPermission",
            put(config::edit_team_permission),
        )
        .route(
            "/config/removeTeamPermission",
            put(config::remove_team_permission),
        )
}

/// Team and category directory routes
fn directory_routes() -> Router<ConfigState> {
    Router::new()
        .route("/config/getCategories", get(directory::get_categories))
        .route("/config/getTeams", get(directory::get_teams))
        .route("/config/addTeam", put(directory::add_team))
        .route("/config/removeTeam", put(directory::remove_team))
        .route("/config/addCategory", put(directory::add_category))
        .route("/config/removeCategory", put(directory::remove_category))
        .route("/config/assignCategory", put(directory::assign_category))
}

/// Read-only listings used by the timesheet entry form
fn form_routes() -> Router<ConfigState> {
    Router::new()
        .route("/categories", get(directory::list_categories))
        .route("/teams", get(directory::list_teams))
}

/// Create all configuration domain routes
pub fn routes() -> Router<ConfigState> {
    Router::new()
        .merge(config_routes())
        .merge(directory_routes())
        .merge(form_routes())
}
