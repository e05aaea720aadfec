//! Timesheet record service
//!
//! Wraps a [`TimesheetStore`] and owns the one-timesheet-per-user rule. The
//! rule is checked on read, not enforced on write: `add` never looks for an
//! existing row, so concurrent adds for one user leave two rows behind and
//! every later lookup for that user fails with [`Error::Integrity`].

use std::sync::Arc;

use timesheet_common::{Error, Result};

use crate::domain::entities::{NewTimesheet, Timesheet, TimesheetTargets, TimesheetUpdate};
use crate::repository::TimesheetStore;

#[derive(Clone)]
pub struct TimesheetService {
    store: Arc<dyn TimesheetStore>,
}

impl TimesheetService {
    pub fn new(store: Arc<dyn TimesheetStore>) -> Self {
        Self { store }
    }

    /// Create a timesheet for `user_key`.
    ///
    /// Always inserts. New sheets start inactive and enabled, stamped with
    /// the current time.
    pub async fn add(&self, user_key: &str, targets: TimesheetTargets) -> Result<Timesheet> {
        let new_sheet = NewTimesheet {
            user_key: user_key.to_string(),
            target_hours_practice: targets.practice,
            target_hours_theory: targets.theory,
            target_hours: targets.total,
            target_hours_completed: targets.completed,
            lectures: targets.lectures,
            ects: targets.ects,
            latest_entry_date: chrono::Utc::now().to_rfc3339(),
            is_active: false,
            is_enabled: true,
        };

        let timesheet = self.store.create(&new_sheet).await?;

        tracing::info!(
            timesheet_id = timesheet.id,
            user_key = %timesheet.user_key,
            "Timesheet created"
        );

        Ok(timesheet)
    }

    /// Overwrite every field of the user's timesheet.
    ///
    /// `None` when the user has no timesheet.
    pub async fn edit_timesheet(
        &self,
        user_key: &str,
        update: TimesheetUpdate,
    ) -> Result<Option<Timesheet>> {
        let found = self.store.find_by_user(user_key).await?;
        let Some(mut timesheet) = single(found, "Multiple Timesheets with the same User.")? else {
            return Ok(None);
        };

        timesheet.apply(update);
        let saved = self.store.save(&timesheet).await?;

        tracing::info!(
            timesheet_id = saved.id,
            user_key = %saved.user_key,
            "Timesheet updated"
        );

        Ok(Some(saved))
    }

    pub async fn get_timesheet_by_user(&self, user_key: &str) -> Result<Option<Timesheet>> {
        let found = self.store.find_by_user(user_key).await?;
        single(found, "Multiple Timesheets with the same User.")
    }

    pub async fn get_timesheet_by_id(&self, id: i32) -> Result<Option<Timesheet>> {
        let found = self.store.find_by_id(id).await?;
        single(found, "Multiple Timesheets with the same ID.")
    }

    /// Every timesheet, in no particular order
    pub async fn all(&self) -> Result<Vec<Timesheet>> {
        Ok(self.store.all().await?)
    }
}

/// Zero rows is `None`, one is `Some`, more is an integrity fault
fn single(mut found: Vec<Timesheet>, fault: &str) -> Result<Option<Timesheet>> {
    if found.len() > 1 {
        tracing::error!(
            rows = found.len(),
            user_key = %found[0].user_key,
            "{}",
            fault
        );
        return Err(Error::Integrity(fault.to_string()));
    }

    Ok(found.pop())
}
