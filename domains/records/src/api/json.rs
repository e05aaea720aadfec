//! Wire types for the timesheet endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use timesheet_auth::UserProfile;
use validator::Validate;

use crate::domain::entries::EntryImport;
use crate::domain::entities::{EntryDraft, Timesheet, TimesheetEntry, TimesheetUpdate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonTimesheet {
    #[serde(rename = "timesheetID")]
    pub timesheet_id: i32,
    pub user_key: String,
    pub target_hour_practice: i32,
    pub target_hour_theory: i32,
    pub target_hours: i32,
    pub target_hours_completed: i32,
    pub lectures: String,
    pub ects: i32,
    pub latest_entry_date: String,
    pub is_active: bool,
    pub is_enabled: bool,
}

impl From<Timesheet> for JsonTimesheet {
    fn from(sheet: Timesheet) -> Self {
        Self {
            timesheet_id: sheet.id,
            user_key: sheet.user_key,
            target_hour_practice: sheet.target_hours_practice,
            target_hour_theory: sheet.target_hours_theory,
            target_hours: sheet.target_hours,
            target_hours_completed: sheet.target_hours_completed,
            lectures: sheet.lectures,
            ects: sheet.ects,
            latest_entry_date: sheet.latest_entry_date,
            is_active: sheet.is_active,
            is_enabled: sheet.is_enabled,
        }
    }
}

/// Owner of a timesheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonUser {
    pub user_key: String,
    pub user_name: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl From<UserProfile> for JsonUser {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_key: profile.user_key,
            user_name: profile.user_name,
            full_name: profile.full_name,
            email: profile.email,
        }
    }
}

/// Body of `POST /timesheets/{id}/changeHours`.
///
/// The hours form posts `targetHourPractice` as text, so both numbers and
/// numeric strings are accepted. Absent optional fields keep their value.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangeHoursRequest {
    #[serde(rename = "timesheetID", default)]
    pub timesheet_id: Option<i32>,

    #[serde(deserialize_with = "int_from_number_or_text")]
    #[validate(range(min = 0, max = 10000))]
    pub target_hour_practice: i32,

    #[serde(default)]
    #[validate(range(min = 0, max = 10000))]
    pub target_hour_theory: Option<i32>,

    #[serde(default)]
    #[validate(length(max = 1000))]
    pub lectures: Option<String>,

    #[serde(default)]
    pub is_active: Option<bool>,
}

impl ChangeHoursRequest {
    /// Merge onto the stored values
    pub fn into_update(self, current: &Timesheet) -> TimesheetUpdate {
        let mut update = current.to_update();
        update.target_hours_practice = self.target_hour_practice;
        if let Some(theory) = self.target_hour_theory {
            update.target_hours_theory = theory;
        }
        if let Some(lectures) = self.lectures {
            update.lectures = lectures;
        }
        if let Some(is_active) = self.is_active {
            update.is_active = is_active;
        }
        update
    }
}

/// A timesheet entry as the entry form and the import send it.
///
/// Team and category ids come from select boxes, so numeric text is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JsonEntry {
    #[serde(
        rename = "entryID",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "optional_int_from_number_or_text"
    )]
    pub entry_id: Option<i32>,
    pub begin_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    #[validate(range(min = 0, max = 1440))]
    pub pause_minutes: i32,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub description: String,
    #[serde(rename = "teamID", deserialize_with = "int_from_number_or_text")]
    pub team_id: i32,
    #[serde(rename = "categoryID", deserialize_with = "int_from_number_or_text")]
    pub category_id: i32,
    #[serde(default)]
    pub is_google_doc_import: bool,
}

impl JsonEntry {
    pub fn into_draft(self) -> EntryDraft {
        EntryDraft {
            begin_date: self.begin_date,
            end_date: self.end_date,
            pause_minutes: self.pause_minutes,
            description: self.description,
            team_id: self.team_id,
            category_id: self.category_id,
            is_google_doc_import: self.is_google_doc_import,
        }
    }
}

impl From<TimesheetEntry> for JsonEntry {
    fn from(entry: TimesheetEntry) -> Self {
        Self {
            entry_id: Some(entry.id),
            begin_date: entry.begin_date,
            end_date: entry.end_date,
            pause_minutes: entry.pause_minutes,
            description: entry.description,
            team_id: entry.team_id,
            category_id: entry.category_id,
            is_google_doc_import: entry.is_google_doc_import,
        }
    }
}

/// Response of the bulk import
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEntryImport {
    pub entries: Vec<JsonEntry>,
    pub error_messages: Vec<String>,
}

impl From<EntryImport> for JsonEntryImport {
    fn from(outcome: EntryImport) -> Self {
        Self {
            entries: outcome.entries.into_iter().map(JsonEntry::from).collect(),
            error_messages: outcome.error_messages,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(i32),
    Text(String),
}

impl NumberOrText {
    fn into_int<E: serde::de::Error>(self) -> Result<i32, E> {
        match self {
            NumberOrText::Number(value) => Ok(value),
            NumberOrText::Text(text) => text.trim().parse().map_err(E::custom),
        }
    }
}

fn int_from_number_or_text<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrText::deserialize(deserializer)?.into_int()
}

fn optional_int_from_number_or_text<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrText>::deserialize(deserializer)?
        .map(NumberOrText::into_int)
        .transpose()
}
