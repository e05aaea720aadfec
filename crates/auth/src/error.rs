//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidToken,
    UserNotFound,
    UserLoadError,
    GroupsLoadError,
    ApprovalsLoadError,
    TeamsLoadError,
    DirectoryLoadError,
    TokenIssueFailed,
    /// Caller is authenticated but lacks administrative privilege
    Forbidden,
    /// Identity could not be resolved on an endpoint that reports it as 403
    NotAuthorized,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingAuthorization => (
                StatusCode::UNAUTHORIZED,
                "MISSING_AUTHORIZATION",
                "Authorization header required",
            ),
            AuthError::InvalidAuthorizationFormat => (
                StatusCode::UNAUTHORIZED,
                "INVALID_AUTHORIZATION",
                "Invalid authorization header format",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token",
            ),
            AuthError::UserNotFound => (
                StatusCode::UNAUTHORIZED,
                "USER_NOT_FOUND",
                "User does not have a valid profile",
            ),
            AuthError::UserLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "USER_LOAD_ERROR",
                "Failed to load user",
            ),
            AuthError::GroupsLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "GROUPS_LOAD_ERROR",
                "Failed to load user groups",
            ),
            AuthError::ApprovalsLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "APPROVALS_LOAD_ERROR",
                "Failed to load approved users and groups",
            ),
            AuthError::TeamsLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "TEAMS_LOAD_ERROR",
                "Failed to load team rosters",
            ),
            AuthError::DirectoryLoadError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DIRECTORY_LOAD_ERROR",
                "Failed to load user directories",
            ),
            AuthError::TokenIssueFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_ERROR",
                "Failed to issue token",
            ),
            AuthError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "User is not allowed to change the timesheet configuration",
            ),
            AuthError::NotAuthorized => (
                StatusCode::FORBIDDEN,
                "NOT_AUTHORIZED",
                "User does not exist",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
