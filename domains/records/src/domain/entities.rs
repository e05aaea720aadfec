//! Domain entities for timesheet records

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-user timesheet.
///
/// At most one row may exist per `user_key`; the service reports a second
/// one as a data integrity fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Timesheet {
    pub id: i32,
    pub user_key: String,
    pub target_hours_practice: i32,
    pub target_hours_theory: i32,
    pub target_hours: i32,
    pub target_hours_completed: i32,
    pub lectures: String,
    pub ects: i32,
    /// RFC 3339 text, not parsed
    pub latest_entry_date: String,
    pub is_active: bool,
    pub is_enabled: bool,
}

impl Timesheet {
    /// Current field values as an update
    pub fn to_update(&self) -> TimesheetUpdate {
        TimesheetUpdate {
            target_hours_practice: self.target_hours_practice,
            target_hours_theory: self.target_hours_theory,
            target_hours: self.target_hours,
            target_hours_completed: self.target_hours_completed,
            lectures: self.lectures.clone(),
            ects: self.ects,
            latest_entry_date: self.latest_entry_date.clone(),
            is_active: self.is_active,
            is_enabled: self.is_enabled,
        }
    }

    /// Overwrite every mutable field
    pub fn apply(&mut self, update: TimesheetUpdate) {
        self.target_hours_practice = update.target_hours_practice;
        self.target_hours_theory = update.target_hours_theory;
        self.target_hours = update.target_hours;
        self.target_hours_completed = update.target_hours_completed;
        self.lectures = update.lectures;
        self.ects = update.ects;
        self.latest_entry_date = update.latest_entry_date;
        self.is_active = update.is_active;
        self.is_enabled = update.is_enabled;
    }
}

/// Targets a new timesheet starts with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimesheetTargets {
    pub practice: i32,
    pub theory: i32,
    pub total: i32,
    pub completed: i32,
    pub lectures: String,
    pub ects: i32,
}

/// Row to insert; the id is assigned by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimesheet {
    pub user_key: String,
    pub target_hours_practice: i32,
    pub target_hours_theory: i32,
    pub target_hours: i32,
    pub target_hours_completed: i32,
    pub lectures: String,
    pub ects: i32,
    pub latest_entry_date: String,
    pub is_active: bool,
    pub is_enabled: bool,
}

impl NewTimesheet {
    /// Assign the store id
    pub fn into_timesheet(self, id: i32) -> Timesheet {
        Timesheet {
            id,
            user_key: self.user_key,
            target_hours_practice: self.target_hours_practice,
            target_hours_theory: self.target_hours_theory,
            target_hours: self.target_hours,
            target_hours_completed: self.target_hours_completed,
            lectures: self.lectures,
            ects: self.ects,
            latest_entry_date: self.latest_entry_date,
            is_active: self.is_active,
            is_enabled: self.is_enabled,
        }
    }
}

/// Full replacement of a timesheet's fields, owner excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetUpdate {
    pub target_hours_practice: i32,
    pub target_hours_theory: i32,
    pub target_hours: i32,
    pub target_hours_completed: i32,
    pub lectures: String,
    pub ects: i32,
    pub latest_entry_date: String,
    pub is_active: bool,
    pub is_enabled: bool,
}

/// One booked block of work on a timesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TimesheetEntry {
    pub id: i32,
    pub timesheet_id: i32,
    pub begin_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pause_minutes: i32,
    pub description: String,
    pub team_id: i32,
    pub category_id: i32,
    pub is_google_doc_import: bool,
}

impl TimesheetEntry {
    /// Worked time, pause excluded
    pub fn duration(&self) -> Duration {
        self.end_date - self.begin_date - Duration::minutes(i64::from(self.pause_minutes))
    }

    /// Replace the booked values, keeping id and timesheet
    pub fn apply(&mut self, draft: EntryDraft) {
        self.begin_date = draft.begin_date;
        self.end_date = draft.end_date;
        self.pause_minutes = draft.pause_minutes;
        self.description = draft.description;
        self.team_id = draft.team_id;
        self.category_id = draft.category_id;
        self.is_google_doc_import = draft.is_google_doc_import;
    }
}

/// Entry values as submitted, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub begin_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub pause_minutes: i32,
    pub description: String,
    pub team_id: i32,
    pub category_id: i32,
    pub is_google_doc_import: bool,
}

impl EntryDraft {
    pub fn into_entry(self, id: i32, timesheet_id: i32) -> TimesheetEntry {
        TimesheetEntry {
            id,
            timesheet_id,
            begin_date: self.begin_date,
            end_date: self.end_date,
            pause_minutes: self.pause_minutes,
            description: self.description,
            team_id: self.team_id,
            category_id: self.category_id,
            is_google_doc_import: self.is_google_doc_import,
        }
    }

    /// Time-range checks that need no store
    pub fn check_times(&self) -> Result<(), String> {
        if self.end_date <= self.begin_date {
            return Err("Entry end must be after its begin".to_string());
        }
        if self.pause_minutes < 0 {
            return Err("Pause must not be negative".to_string());
        }
        let span = self.end_date - self.begin_date;
        if Duration::minutes(i64::from(self.pause_minutes)) >= span {
            return Err("Pause must be shorter than the entry".to_string());
        }
        Ok(())
    }
}
