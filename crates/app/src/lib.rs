//! Timesheet application composition root
//!
//! Composes the configuration and records routers into a single application,
//! backed either by PostgreSQL or by in-memory stores.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use timesheet_auth::{
    issue_token, ApprovalSource, AuthBackend, AuthConfig, IdentityProvider, PgIdentityProvider,
    StaticIdentityProvider, TeamRosterSource, UserProfile,
};
use timesheet_common::config::Config;
use timesheet_config::{
    CategoryStore, ConfigState, ConfigStore, MemoryConfigStore, PgConfigStore, TeamStore,
};
use timesheet_records::{
    EntryStore, MemoryEntryStore, MemoryTimesheetStore, PgEntryStore, PgTimesheetStore,
    RecordsState, TimesheetStore,
};

/// User seeded into the in-memory identity provider
pub const LOCAL_ADMIN_KEY: &str = "local-admin";
pub const LOCAL_ADMIN_NAME: &str = "admin";

/// Lifetime of the development token logged at startup
const LOCAL_TOKEN_TTL_SECONDS: u64 = 8 * 60 * 60;

/// Create the main application router from configuration
pub async fn create_app(config: &Config) -> Result<Router, anyhow::Error> {
    let auth_config = AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
        admin_group: config.admin_group.clone(),
    };

    match &config.database_url {
        Some(database_url) => {
            let pool = PgPool::connect(database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;

            tracing::info!("Database connection established");

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Database migration failed: {}", e))?;

            tracing::info!("Database migrations applied");

            Ok(compose(
                Arc::new(PgConfigStore::new(pool.clone())),
                Arc::new(PgTimesheetStore::new(pool.clone())),
                Arc::new(PgEntryStore::new(pool.clone())),
                Arc::new(PgIdentityProvider::new(pool)),
                auth_config,
            ))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");

            let identity = StaticIdentityProvider::new()
                .with_user(
                    UserProfile::new(LOCAL_ADMIN_KEY, LOCAL_ADMIN_NAME),
                    &[config.admin_group.as_str()],
                )
                .with_directory(1, "Internal Directory");

            let token = issue_token(LOCAL_ADMIN_KEY, &auth_config, LOCAL_TOKEN_TTL_SECONDS)
                .map_err(|e| anyhow::anyhow!("Failed to issue local token: {:?}", e))?;

            tracing::info!(
                user_key = LOCAL_ADMIN_KEY,
                token = %token,
                "Local administrator token issued"
            );

            Ok(compose(
                Arc::new(MemoryConfigStore::new()),
                Arc::new(MemoryTimesheetStore::new()),
                Arc::new(MemoryEntryStore::new()),
                Arc::new(identity),
                auth_config,
            ))
        }
    }
}

/// Wire stores into domain states and merge the domain routers.
///
/// `store` serves the configuration, the team and category directories, the
/// permission gate's allowlists and the team rosters.
pub fn compose<S>(
    store: Arc<S>,
    timesheets: Arc<dyn TimesheetStore>,
    entries: Arc<dyn EntryStore>,
    identity: Arc<dyn IdentityProvider>,
    auth_config: AuthConfig,
) -> Router
where
    S: ConfigStore + TeamStore + CategoryStore + ApprovalSource + TeamRosterSource + 'static,
{
    let approvals: Arc<dyn ApprovalSource> = store.clone();
    let rosters: Arc<dyn TeamRosterSource> = store.clone();
    let auth = AuthBackend::new(identity, approvals, rosters, auth_config);

    let teams: Arc<dyn TeamStore> = store.clone();
    let config_state = ConfigState::from_store(store, auth.clone());
    let records_state = RecordsState::new(timesheets, entries, teams, auth);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(timesheet_config::routes().with_state(config_state))
        .merge(timesheet_records::routes().with_state(records_state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
