//! Configuration domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use timesheet_auth::AuthBackend;

use crate::repository::{CategoryStore, ConfigStore, TeamStore};

/// Application state for the configuration domain
#[derive(Clone)]
pub struct ConfigState {
    pub config: Arc<dyn ConfigStore>,
    pub teams: Arc<dyn TeamStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub auth: AuthBackend,
}

impl ConfigState {
    /// Build the state from one store serving all three roles
    pub fn from_store<T>(store: Arc<T>, auth: AuthBackend) -> Self
    where
        T: ConfigStore + TeamStore + CategoryStore + 'static,
    {
        Self {
            config: store.clone(),
            teams: store.clone(),
            categories: store,
            auth,
        }
    }
}

impl FromRef<ConfigState> for AuthBackend {
    fn from_ref(state: &ConfigState) -> Self {
        state.auth.clone()
    }
}
