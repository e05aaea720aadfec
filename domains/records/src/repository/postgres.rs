//! PostgreSQL timesheet and entry stores

use async_trait::async_trait;
use sqlx::PgPool;
use timesheet_common::RepositoryError;

use super::{EntryStore, StoreResult, TimesheetStore};
use crate::domain::entities::{EntryDraft, NewTimesheet, Timesheet, TimesheetEntry};

#[derive(Clone)]
pub struct PgTimesheetStore {
    pool: PgPool,
}

impl PgTimesheetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TimesheetStore for PgTimesheetStore {
    async fn create(&self, timesheet: &NewTimesheet) -> StoreResult<Timesheet> {
        let row = sqlx::query_as::<_, Timesheet>(
            r#"
            INSERT INTO timesheets (
                user_key, target_hours_practice, target_hours_theory, target_hours,
                target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_key, target_hours_practice, target_hours_theory, target_hours,
                      target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            "#,
        )
        .bind(&timesheet.user_key)
        .bind(timesheet.target_hours_practice)
        .bind(timesheet.target_hours_theory)
        .bind(timesheet.target_hours)
        .bind(timesheet.target_hours_completed)
        .bind(&timesheet.lectures)
        .bind(timesheet.ects)
        .bind(&timesheet.latest_entry_date)
        .bind(timesheet.is_active)
        .bind(timesheet.is_enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_user(&self, user_key: &str) -> StoreResult<Vec<Timesheet>> {
        let rows = sqlx::query_as::<_, Timesheet>(
            r#"
            SELECT id, user_key, target_hours_practice, target_hours_theory, target_hours,
                   target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            FROM timesheets
            WHERE user_key = $1
            "#,
        )
        .bind(user_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> StoreResult<Vec<Timesheet>> {
        let rows = sqlx::query_as::<_, Timesheet>(
            r#"
            SELECT id, user_key, target_hours_practice, target_hours_theory, target_hours,
                   target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            FROM timesheets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn save(&self, timesheet: &Timesheet) -> StoreResult<Timesheet> {
        let row = sqlx::query_as::<_, Timesheet>(
            r#"
            UPDATE timesheets
            SET user_key = $2,
                target_hours_practice = $3,
                target_hours_theory = $4,
                target_hours = $5,
                target_hours_completed = $6,
                lectures = $7,
                ects = $8,
                latest_entry_date = $9,
                is_active = $10,
                is_enabled = $11
            WHERE id = $1
            RETURNING id, user_key, target_hours_practice, target_hours_theory, target_hours,
                      target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            "#,
        )
        .bind(timesheet.id)
        .bind(&timesheet.user_key)
        .bind(timesheet.target_hours_practice)
        .bind(timesheet.target_hours_theory)
        .bind(timesheet.target_hours)
        .bind(timesheet.target_hours_completed)
        .bind(&timesheet.lectures)
        .bind(timesheet.ects)
        .bind(&timesheet.latest_entry_date)
        .bind(timesheet.is_active)
        .bind(timesheet.is_enabled)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row)
    }

    async fn all(&self) -> StoreResult<Vec<Timesheet>> {
        let rows = sqlx::query_as::<_, Timesheet>(
            r#"
            SELECT id, user_key, target_hours_practice, target_hours_theory, target_hours,
                   target_hours_completed, lectures, ects, latest_entry_date, is_active, is_enabled
            FROM timesheets
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[derive(Clone)]
pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn create(&self, timesheet_id: i32, draft: &EntryDraft) -> StoreResult<TimesheetEntry> {
        let row = sqlx::query_as::<_, TimesheetEntry>(
            r#"
            INSERT INTO timesheet_entries (
                timesheet_id, begin_date, end_date, pause_minutes, description,
                team_id, category_id, is_google_doc_import
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, timesheet_id, begin_date, end_date, pause_minutes, description,
                      team_id, category_id, is_google_doc_import
            "#,
        )
        .bind(timesheet_id)
        .bind(draft.begin_date)
        .bind(draft.end_date)
        .bind(draft.pause_minutes)
        .bind(&draft.description)
        .bind(draft.team_id)
        .bind(draft.category_id)
        .bind(draft.is_google_doc_import)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find(&self, id: i32) -> StoreResult<Option<TimesheetEntry>> {
        let row = sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT id, timesheet_id, begin_date, end_date, pause_minutes, description,
                   team_id, category_id, is_google_doc_import
            FROM timesheet_entries
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn for_timesheet(&self, timesheet_id: i32) -> StoreResult<Vec<TimesheetEntry>> {
        let rows = sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT id, timesheet_id, begin_date, end_date, pause_minutes, description,
                   team_id, category_id, is_google_doc_import
            FROM timesheet_entries
            WHERE timesheet_id = $1
            ORDER BY begin_date DESC, id DESC
            "#,
        )
        .bind(timesheet_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn for_teams(&self, team_ids: &[i32]) -> StoreResult<Vec<TimesheetEntry>> {
        let rows = sqlx::query_as::<_, TimesheetEntry>(
            r#"
            SELECT id, timesheet_id, begin_date, end_date, pause_minutes, description,
                   team_id, category_id, is_google_doc_import
            FROM timesheet_entries
            WHERE team_id = ANY($1)
            ORDER BY begin_date DESC, id DESC
            "#,
        )
        .bind(team_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn update(&self, entry: &TimesheetEntry) -> StoreResult<TimesheetEntry> {
        let row = sqlx::query_as::<_, TimesheetEntry>(
            r#"
            UPDATE timesheet_entries
            SET begin_date = $2,
                end_date = $3,
                pause_minutes = $4,
                description = $5,
                team_id = $6,
                category_id = $7,
                is_google_doc_import = $8
            WHERE id = $1
            RETURNING id, timesheet_id, begin_date, end_date, pause_minutes, description,
                      team_id, category_id, is_google_doc_import
            "#,
        )
        .bind(entry.id)
        .bind(entry.begin_date)
        .bind(entry.end_date)
        .bind(entry.pause_minutes)
        .bind(&entry.description)
        .bind(entry.team_id)
        .bind(entry.category_id)
        .bind(entry.is_google_doc_import)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row)
    }

    async fn delete(&self, id: i32) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM timesheet_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
