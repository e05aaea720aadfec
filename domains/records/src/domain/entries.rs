//! Entry service: booking, editing and importing timesheet entries
//!
//! Every write checks the entry's times and that its category is assigned to
//! its team. Disabled timesheets accept no writes.

use std::sync::Arc;

use timesheet_common::{Error, Result};
use timesheet_config::TeamStore;

use crate::domain::entities::{EntryDraft, Timesheet, TimesheetEntry};
use crate::repository::EntryStore;

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryImport {
    pub entries: Vec<TimesheetEntry>,
    pub error_messages: Vec<String>,
}

#[derive(Clone)]
pub struct EntryService {
    entries: Arc<dyn EntryStore>,
    teams: Arc<dyn TeamStore>,
}

impl EntryService {
    pub fn new(entries: Arc<dyn EntryStore>, teams: Arc<dyn TeamStore>) -> Self {
        Self { entries, teams }
    }

    pub async fn entries_of(&self, timesheet: &Timesheet) -> Result<Vec<TimesheetEntry>> {
        Ok(self.entries.for_timesheet(timesheet.id).await?)
    }

    pub async fn find(&self, id: i32) -> Result<Option<TimesheetEntry>> {
        Ok(self.entries.find(id).await?)
    }

    /// Entries booked on any of `team_ids`
    pub async fn team_entries(&self, team_ids: &[i32]) -> Result<Vec<TimesheetEntry>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.entries.for_teams(team_ids).await?)
    }

    pub async fn add(&self, timesheet: &Timesheet, draft: EntryDraft) -> Result<TimesheetEntry> {
        ensure_writable(timesheet)?;
        self.check(&draft).await?;

        let entry = self.entries.create(timesheet.id, &draft).await?;

        tracing::info!(
            entry_id = entry.id,
            timesheet_id = timesheet.id,
            team_id = entry.team_id,
            "Entry created"
        );

        Ok(entry)
    }

    /// Replace the booked values of `entry`
    pub async fn edit(
        &self,
        timesheet: &Timesheet,
        mut entry: TimesheetEntry,
        draft: EntryDraft,
    ) -> Result<TimesheetEntry> {
        ensure_writable(timesheet)?;
        self.check(&draft).await?;

        entry.apply(draft);
        let saved = self.entries.update(&entry).await?;

        tracing::info!(
            entry_id = saved.id,
            timesheet_id = timesheet.id,
            "Entry updated"
        );

        Ok(saved)
    }

    pub async fn delete(&self, timesheet: &Timesheet, entry: &TimesheetEntry) -> Result<()> {
        ensure_writable(timesheet)?;

        if !self.entries.delete(entry.id).await? {
            return Err(Error::NotFound(format!("Entry {} not found", entry.id)));
        }

        tracing::info!(
            entry_id = entry.id,
            timesheet_id = timesheet.id,
            "Entry deleted"
        );

        Ok(())
    }

    /// Book every valid row.
    ///
    /// Rows arrive either as drafts or as the reason they were rejected
    /// while parsing. Failures are reported by position, 1-based.
    pub async fn import(
        &self,
        timesheet: &Timesheet,
        rows: Vec<std::result::Result<EntryDraft, String>>,
    ) -> Result<EntryImport> {
        ensure_writable(timesheet)?;

        let mut outcome = EntryImport::default();
        for (index, row) in rows.into_iter().enumerate() {
            let checked = match row {
                Ok(draft) => self.check(&draft).await.map(|()| draft),
                Err(message) => Err(Error::Validation(message)),
            };

            match checked {
                Ok(draft) => {
                    let entry = self.entries.create(timesheet.id, &draft).await?;
                    outcome.entries.push(entry);
                }
                Err(Error::Validation(message)) => {
                    outcome
                        .error_messages
                        .push(format!("Entry {}: {}", index + 1, message));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            timesheet_id = timesheet.id,
            imported = outcome.entries.len(),
            rejected = outcome.error_messages.len(),
            "Entries imported"
        );

        Ok(outcome)
    }

    async fn check(&self, draft: &EntryDraft) -> Result<()> {
        draft.check_times().map_err(Error::Validation)?;

        let teams = self.teams.all_teams().await?;
        let team = teams
            .iter()
            .find(|team| team.id == draft.team_id)
            .ok_or_else(|| Error::Validation(format!("Team {} does not exist", draft.team_id)))?;

        if !team.category_ids.contains(&draft.category_id) {
            return Err(Error::Validation(format!(
                "Category {} is not assigned to team {}",
                draft.category_id, team.name
            )));
        }

        Ok(())
    }
}

fn ensure_writable(timesheet: &Timesheet) -> Result<()> {
    if timesheet.is_enabled {
        Ok(())
    } else {
        Err(Error::Authorization(format!(
            "Timesheet {} is disabled",
            timesheet.id
        )))
    }
}
