//! Axum extractors for authentication
//!
//! Generic over any state `S` where `AuthBackend: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::backend::AuthBackend;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::extract_bearer_token;

/// Authenticated caller with a resolvable profile.
///
/// Rejects with 401 when the header is missing, the token is invalid or the
/// subject has no profile.
#[derive(Debug)]
pub struct AuthUser(pub AuthContext);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let backend = AuthBackend::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let token = extract_bearer_token(auth_header)?;
        let auth_context = backend.authenticate_jwt(&token).await?;

        Ok(AuthUser(auth_context))
    }
}

/// Caller that passed the permission gate.
///
/// Like `AuthUser` but additionally rejects callers that are neither admins
/// nor approved with 403 FORBIDDEN. Every configuration mutation takes this
/// extractor, so nothing touches a store for a denied caller.
#[derive(Debug)]
pub struct PermittedUser(pub AuthContext);

impl<S> FromRequestParts<S> for PermittedUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let AuthUser(auth_context) = AuthUser::from_request_parts(parts, state).await?;

        AuthBackend::from_ref(state)
            .check_permission(&auth_context)
            .await?;

        Ok(PermittedUser(auth_context))
    }
}

/// Caller whose identity must exist; any resolution failure is a 403.
#[derive(Debug)]
pub struct KnownUser(pub AuthContext);

impl<S> FromRequestParts<S> for KnownUser
where
    AuthBackend: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(auth_context)) => Ok(KnownUser(auth_context)),
            // Backend failures keep their 500
            Err(
                e @ (AuthError::UserLoadError
                | AuthError::GroupsLoadError
                | AuthError::ApprovalsLoadError
                | AuthError::TeamsLoadError
                | AuthError::DirectoryLoadError
                | AuthError::TokenIssueFailed),
            ) => Err(e),
            Err(_) => Err(AuthError::NotAuthorized),
        }
    }
}
