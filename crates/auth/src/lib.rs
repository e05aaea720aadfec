//! Permission gate for the timesheet API
//!
//! Resolves the caller from a bearer token, looks the profile up through an
//! [`IdentityProvider`], and decides whether the caller may administer the
//! timesheet configuration or read a team member's records. The extractors
//! work with any domain state implementing `FromRef<S>` for `AuthBackend`.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod provider;
mod types;

pub use backend::AuthBackend;
pub use claims::TokenClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AuthUser, KnownUser, PermittedUser};
pub use jwt::issue_token;
pub use provider::{
    ApprovalSource, IdentityProvider, PgIdentityProvider, StaticIdentityProvider, TeamRosterSource,
};
pub use types::{Directory, TeamRoster, UserProfile};
