//! Records domain state and auth backend integration

use std::sync::Arc;

use axum::extract::FromRef;
use timesheet_auth::AuthBackend;
use timesheet_config::TeamStore;

use crate::domain::entries::EntryService;
use crate::domain::service::TimesheetService;
use crate::repository::{EntryStore, TimesheetStore};

/// Application state for the records domain
#[derive(Clone)]
pub struct RecordsState {
    pub timesheets: TimesheetService,
    pub entries: EntryService,
    pub auth: AuthBackend,
}

impl RecordsState {
    pub fn new(
        store: Arc<dyn TimesheetStore>,
        entries: Arc<dyn EntryStore>,
        teams: Arc<dyn TeamStore>,
        auth: AuthBackend,
    ) -> Self {
        Self {
            timesheets: TimesheetService::new(store),
            entries: EntryService::new(entries, teams),
            auth,
        }
    }
}

impl FromRef<RecordsState> for AuthBackend {
    fn from_ref(state: &RecordsState) -> Self {
        state.auth.clone()
    }
}
