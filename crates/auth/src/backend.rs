//! Concrete authentication backend
//!
//! Wraps the identity provider, the approval allowlists, the team rosters and
//! `AuthConfig`. All collaborators are supplied at construction.

use std::sync::Arc;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::provider::{ApprovalSource, IdentityProvider, TeamRosterSource};
use crate::types::{TeamRoster, UserProfile};

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    identity: Arc<dyn IdentityProvider>,
    approvals: Arc<dyn ApprovalSource>,
    rosters: Arc<dyn TeamRosterSource>,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        approvals: Arc<dyn ApprovalSource>,
        rosters: Arc<dyn TeamRosterSource>,
        config: AuthConfig,
    ) -> Self {
        Self {
            identity,
            approvals,
            rosters,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Identity provider, for handlers that resolve other users or directories
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Resolve the caller behind a bearer token.
    pub(crate) async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_jwt_token(token, &self.config)?;

        let user = self
            .identity
            .find_user(&claims.sub)
            .await?
            .ok_or_else(|| {
                tracing::debug!(user_key = %claims.sub, "Token subject has no profile");
                AuthError::UserNotFound
            })?;

        let groups = self.identity.groups_for_user(&user.user_key).await?;

        Ok(AuthContext::new(user, groups))
    }

    /// Decide whether the caller may change the timesheet configuration.
    ///
    /// Allowed for members of the admin group, approved users and members of
    /// approved groups.
    pub async fn check_permission(&self, ctx: &AuthContext) -> Result<(), AuthError> {
        if ctx.in_group(&self.config.admin_group) {
            return Ok(());
        }

        let approved_users = self.approvals.approved_user_keys().await?;
        if approved_users.iter().any(|key| ctx.is_owner_of(key)) {
            return Ok(());
        }

        let approved_groups = self.approvals.approved_group_names().await?;
        if ctx.in_any_group(&approved_groups) {
            return Ok(());
        }

        tracing::info!(user_key = %ctx.user_key(), "Permission denied");
        Err(AuthError::Forbidden)
    }

    /// Teams listing `user` in any role, by name or through a group
    pub async fn teams_of(&self, user: &UserProfile) -> Result<Vec<TeamRoster>, AuthError> {
        let groups = self.identity.groups_for_user(&user.user_key).await?;
        let rosters = self.rosters.team_rosters().await?;

        Ok(rosters
            .into_iter()
            .filter(|team| team.is_member(&user.user_name, &groups))
            .collect())
    }

    /// Allow a team coordinator to read the records of the team's developers.
    pub async fn check_team_coordinator(
        &self,
        ctx: &AuthContext,
        member: &UserProfile,
    ) -> Result<(), AuthError> {
        let rosters = self.rosters.team_rosters().await?;
        let coordinated: Vec<&TeamRoster> = rosters
            .iter()
            .filter(|team| team.is_coordinator(ctx.user_name(), &ctx.groups))
            .collect();

        if !coordinated.is_empty() {
            let member_groups = self.identity.groups_for_user(&member.user_key).await?;
            if let Some(team) = coordinated
                .iter()
                .find(|team| team.is_developer(&member.user_name, &member_groups))
            {
                tracing::debug!(
                    user_key = %ctx.user_key(),
                    member = %member.user_key,
                    team = %team.team_name,
                    "Coordinator access granted"
                );
                return Ok(());
            }
        }

        Err(AuthError::Forbidden)
    }

    /// Read access to records owned by `owner_key`.
    ///
    /// Granted to the owner, to callers passing [`check_permission`], and to
    /// coordinators of a team the owner develops for.
    ///
    /// [`check_permission`]: AuthBackend::check_permission
    pub async fn check_record_access(
        &self,
        ctx: &AuthContext,
        owner_key: &str,
    ) -> Result<(), AuthError> {
        if ctx.is_owner_of(owner_key) {
            return Ok(());
        }

        match self.check_permission(ctx).await {
            Err(AuthError::Forbidden) => {}
            other => return other,
        }

        match self.identity.find_user(owner_key).await? {
            Some(owner) => self.check_team_coordinator(ctx, &owner).await,
            None => Err(AuthError::Forbidden),
        }
    }
}
