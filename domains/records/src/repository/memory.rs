//! In-memory timesheet and entry stores for local runs and tests

use async_trait::async_trait;
use timesheet_common::RepositoryError;
use tokio::sync::RwLock;

use super::{EntryStore, StoreResult, TimesheetStore};
use crate::domain::entities::{EntryDraft, NewTimesheet, Timesheet, TimesheetEntry};

#[derive(Debug)]
struct MemoryState {
    rows: Vec<Timesheet>,
    next_id: i32,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryTimesheetStore {
    state: RwLock<MemoryState>,
}

impl MemoryTimesheetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimesheetStore for MemoryTimesheetStore {
    async fn create(&self, timesheet: &NewTimesheet) -> StoreResult<Timesheet> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let row = timesheet.clone().into_timesheet(id);
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_user(&self, user_key: &str) -> StoreResult<Vec<Timesheet>> {
        let state = self.state.read().await;
        Ok(state
            .rows
            .iter()
            .filter(|t| t.user_key == user_key)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Vec<Timesheet>> {
        let state = self.state.read().await;
        Ok(state.rows.iter().filter(|t| t.id == id).cloned().collect())
    }

    async fn save(&self, timesheet: &Timesheet) -> StoreResult<Timesheet> {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .iter_mut()
            .find(|t| t.id == timesheet.id)
            .ok_or(RepositoryError::NotFound)?;

        *row = timesheet.clone();
        Ok(row.clone())
    }

    async fn all(&self) -> StoreResult<Vec<Timesheet>> {
        Ok(self.state.read().await.rows.clone())
    }
}

#[derive(Debug)]
struct EntryState {
    rows: Vec<TimesheetEntry>,
    next_id: i32,
}

impl Default for EntryState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl EntryState {
    fn select(&self, keep: impl Fn(&TimesheetEntry) -> bool) -> Vec<TimesheetEntry> {
        let mut rows: Vec<TimesheetEntry> = self.rows.iter().filter(|e| keep(e)).cloned().collect();
        rows.sort_by(|a, b| b.begin_date.cmp(&a.begin_date).then(b.id.cmp(&a.id)));
        rows
    }
}

#[derive(Debug, Default)]
pub struct MemoryEntryStore {
    state: RwLock<EntryState>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn create(&self, timesheet_id: i32, draft: &EntryDraft) -> StoreResult<TimesheetEntry> {
        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let row = draft.clone().into_entry(id, timesheet_id);
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<TimesheetEntry>> {
        let state = self.state.read().await;
        Ok(state.rows.iter().find(|e| e.id == id).cloned())
    }

    async fn for_timesheet(&self, timesheet_id: i32) -> StoreResult<Vec<TimesheetEntry>> {
        Ok(self
            .state
            .read()
            .await
            .select(|e| e.timesheet_id == timesheet_id))
    }

    async fn for_teams(&self, team_ids: &[i32]) -> StoreResult<Vec<TimesheetEntry>> {
        Ok(self
            .state
            .read()
            .await
            .select(|e| team_ids.contains(&e.team_id)))
    }

    async fn update(&self, entry: &TimesheetEntry) -> StoreResult<TimesheetEntry> {
        let mut state = self.state.write().await;
        let row = state
            .rows
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or(RepositoryError::NotFound)?;

        *row = entry.clone();
        Ok(row.clone())
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.rows.len();
        state.rows.retain(|e| e.id != id);
        Ok(state.rows.len() < before)
    }
}
