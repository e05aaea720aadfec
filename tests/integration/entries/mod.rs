//! Timesheet entry endpoint integration tests
//!
//! - GET/POST /timesheets/{id}/entries, POST /timesheets/{id}/entry
//! - PUT/DELETE /entries/{id}
//! - GET /coordinator/{id}/entries, GET /timesheet/{id}/teamEntries

use axum::http::StatusCode;
use serde_json::{json, Value};
use timesheet_records::{EntryStore, TimesheetStore};

use crate::common::{assertions, TestApp, UserFixture, TUTOR_GROUP};

/// Ids of the team and category entries are booked on
struct Booking {
    timesheet_id: i64,
    team_id: i64,
    category_id: i64,
}

/// Team Alpha with category Programming; `student` develops, tutors coordinate
async fn setup(app: &TestApp) -> Booking {
    let response = app
        .put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({
                "teams": [{
                    "teamName": "Alpha",
                    "coordinatorGroups": [TUTOR_GROUP],
                    "developerGroups": [UserFixture::STUDENT.user_name]
                }]
            }),
        )
        .await;
    assertions::assert_no_content(&response);

    app.put("/config/addCategory", &UserFixture::ADMIN, json!("Programming"))
        .await;
    let assigned = app
        .put(
            "/config/assignCategory",
            &UserFixture::ADMIN,
            json!(["Alpha", "Programming"]),
        )
        .await;
    assertions::assert_no_content(&assigned);

    let teams = app.get_json("/teams", &UserFixture::STUDENT).await;
    let sheet = app.get_json("/timesheets/my", &UserFixture::STUDENT).await;

    Booking {
        timesheet_id: sheet["timesheetID"].as_i64().unwrap(),
        team_id: teams[0]["teamID"].as_i64().unwrap(),
        category_id: teams[0]["teamCategories"][0].as_i64().unwrap(),
    }
}

/// Entry body the way the entry form posts it, ids as select-box text
fn entry_body(booking: &Booking, begin: &str, end: &str) -> Value {
    json!({
        "beginDate": begin,
        "endDate": end,
        "description": "Implemented the brick parser",
        "pauseMinutes": 15,
        "teamID": booking.team_id.to_string(),
        "categoryID": booking.category_id.to_string(),
        "isGoogleDocImport": false
    })
}

async fn book(app: &TestApp, booking: &Booking, begin: &str, end: &str) -> Value {
    let (status, body) = app
        .post(
            &format!("/timesheets/{}/entry/", booking.timesheet_id),
            &UserFixture::STUDENT,
            entry_body(booking, begin, end),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {}", body);
    serde_json::from_str(&body).unwrap()
}

mod test_booking {
    use super::*;

    #[tokio::test]
    async fn test_owner_books_and_lists_entries() {
        let app = TestApp::new();
        let booking = setup(&app).await;

        let first = book(
            &app,
            &booking,
            "2026-03-02T09:00:00.000Z",
            "2026-03-02T12:00:00.000Z",
        )
        .await;
        assert!(first["entryID"].is_i64());
        assert_eq!(first["teamID"], booking.team_id);
        assert_eq!(first["pauseMinutes"], 15);

        let second = book(
            &app,
            &booking,
            "2026-03-03T09:00:00.000Z",
            "2026-03-03T10:00:00.000Z",
        )
        .await;

        let entries = app
            .get_json(
                &format!("/timesheets/{}/entries", booking.timesheet_id),
                &UserFixture::STUDENT,
            )
            .await;
        assert_eq!(entries, json!([second, first]));
    }

    #[tokio::test]
    async fn test_invalid_entries_are_rejected() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let uri = format!("/timesheets/{}/entry", booking.timesheet_id);

        // End before begin
        let (status, body) = app
            .post(
                &uri,
                &UserFixture::STUDENT,
                entry_body(&booking, "2026-03-02T12:00:00Z", "2026-03-02T09:00:00Z"),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assertions::assert_error_code(&body, "VALIDATION_ERROR");

        // Category not assigned to the team
        let mut body = entry_body(&booking, "2026-03-02T09:00:00Z", "2026-03-02T12:00:00Z");
        body["categoryID"] = json!(booking.category_id + 100);
        let (status, _) = app.post(&uri, &UserFixture::STUDENT, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stored = app
            .entry_store
            .for_timesheet(booking.timesheet_id as i32)
            .await
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_timesheet_refuses_entries() {
        let app = TestApp::new();
        let booking = setup(&app).await;

        let mut sheet = app
            .timesheet_store
            .find_by_id(booking.timesheet_id as i32)
            .await
            .unwrap()
            .remove(0);
        sheet.is_enabled = false;
        app.timesheet_store.save(&sheet).await.unwrap();

        let (status, _) = app
            .post(
                &format!("/timesheets/{}/entry", booking.timesheet_id),
                &UserFixture::STUDENT,
                entry_body(&booking, "2026-03-02T09:00:00Z", "2026-03-02T12:00:00Z"),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

mod test_entry_changes {
    use super::*;

    #[tokio::test]
    async fn test_owner_edits_and_deletes_entry() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let entry = book(
            &app,
            &booking,
            "2026-03-02T09:00:00Z",
            "2026-03-02T12:00:00Z",
        )
        .await;
        let uri = format!("/entries/{}", entry["entryID"]);

        let mut changed = entry_body(&booking, "2026-03-02T10:00:00Z", "2026-03-02T14:00:00Z");
        changed["entryID"] = entry["entryID"].clone();
        changed["description"] = json!("Reviewed pull requests");
        let (status, body) = app.put(&uri, &UserFixture::STUDENT, changed).await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);

        let updated: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(updated["entryID"], entry["entryID"]);
        assert_eq!(updated["description"], "Reviewed pull requests");
        assert_eq!(updated["beginDate"], "2026-03-02T10:00:00Z");

        let response = app.delete(&uri, &UserFixture::STUDENT).await;
        assertions::assert_no_content(&response);

        let (status, _) = app.delete(&uri, &UserFixture::STUDENT).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_mismatched_entry_id_is_rejected() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let entry = book(
            &app,
            &booking,
            "2026-03-02T09:00:00Z",
            "2026-03-02T12:00:00Z",
        )
        .await;

        let mut changed = entry_body(&booking, "2026-03-02T10:00:00Z", "2026-03-02T14:00:00Z");
        changed["entryID"] = json!(entry["entryID"].as_i64().unwrap() + 1);
        let (status, _) = app
            .put(
                &format!("/entries/{}", entry["entryID"]),
                &UserFixture::STUDENT,
                changed,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_others_cannot_change_entries() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let entry = book(
            &app,
            &booking,
            "2026-03-02T09:00:00Z",
            "2026-03-02T12:00:00Z",
        )
        .await;
        let uri = format!("/entries/{}", entry["entryID"]);

        for user in [&UserFixture::OTHER_STUDENT, &UserFixture::TUTOR] {
            let (status, _) = app.delete(&uri, user).await;
            assert_eq!(status, StatusCode::FORBIDDEN);

            let (status, _) = app
                .put(
                    &uri,
                    user,
                    entry_body(&booking, "2026-03-02T10:00:00Z", "2026-03-02T11:00:00Z"),
                )
                .await;
            assert_eq!(status, StatusCode::FORBIDDEN);
        }

        let response = app.delete(&uri, &UserFixture::ADMIN).await;
        assertions::assert_no_content(&response);
    }
}

mod test_import {
    use super::*;

    #[tokio::test]
    async fn test_import_books_valid_rows_and_reports_the_rest() {
        let app = TestApp::new();
        let booking = setup(&app).await;

        let mut negative_pause =
            entry_body(&booking, "2026-03-04T09:00:00Z", "2026-03-04T10:00:00Z");
        negative_pause["pauseMinutes"] = json!(-5);

        let mut rows = vec![
            entry_body(&booking, "2026-03-02T09:00:00Z", "2026-03-02T12:00:00Z"),
            entry_body(&booking, "2026-03-03T12:00:00Z", "2026-03-03T09:00:00Z"),
            negative_pause,
            entry_body(&booking, "2026-03-05T09:00:00Z", "2026-03-05T12:00:00Z"),
        ];
        for row in rows.iter_mut() {
            row["isGoogleDocImport"] = json!(true);
        }

        let (status, body) = app
            .post(
                &format!("/timesheets/{}/entries", booking.timesheet_id),
                &UserFixture::STUDENT,
                json!(rows),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);

        let outcome: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(outcome["entries"].as_array().unwrap().len(), 2);
        assert_eq!(outcome["entries"][0]["isGoogleDocImport"], true);

        let messages: Vec<&str> = outcome["errorMessages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m.as_str().unwrap())
            .collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Entry 2: "));
        assert!(messages[1].starts_with("Entry 3: "));
    }

    #[tokio::test]
    async fn test_malformed_import_is_a_bad_request() {
        let app = TestApp::new();
        let booking = setup(&app).await;

        let (status, body) = app
            .post(
                &format!("/timesheets/{}/entries", booking.timesheet_id),
                &UserFixture::STUDENT,
                json!({ "not": "a list" }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assertions::assert_error_code(&body, "VALIDATION_ERROR");
    }
}

mod test_entry_visibility {
    use super::*;

    #[tokio::test]
    async fn test_coordinator_reads_developer_entries() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let entry = book(
            &app,
            &booking,
            "2026-03-02T09:00:00Z",
            "2026-03-02T12:00:00Z",
        )
        .await;

        let entries = app
            .get_json(
                &format!("/coordinator/{}/entries", booking.timesheet_id),
                &UserFixture::TUTOR,
            )
            .await;
        assert_eq!(entries, json!([entry]));

        let (status, _) = app
            .get(
                &format!("/timesheets/{}/entries", booking.timesheet_id),
                Some(&UserFixture::OTHER_STUDENT),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_team_entries_cover_the_owners_teams() {
        let app = TestApp::new();
        let booking = setup(&app).await;
        let entry = book(
            &app,
            &booking,
            "2026-03-02T09:00:00Z",
            "2026-03-02T12:00:00Z",
        )
        .await;

        // The admin books on the same team from a separate timesheet
        let admin_sheet = app.get_json("/timesheets/my", &UserFixture::ADMIN).await;
        let (status, body) = app
            .post(
                &format!("/timesheets/{}/entry", admin_sheet["timesheetID"]),
                &UserFixture::ADMIN,
                entry_body(&booking, "2026-03-03T09:00:00Z", "2026-03-03T12:00:00Z"),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "body: {}", body);
        let admin_entry: Value = serde_json::from_str(&body).unwrap();

        let team_entries = app
            .get_json(
                &format!("/timesheet/{}/teamEntries", booking.timesheet_id),
                &UserFixture::STUDENT,
            )
            .await;
        assert_eq!(team_entries, json!([admin_entry, entry]));

        // The admin is in no team, so their own sheet shows no team entries
        let none = app
            .get_json(
                &format!("/timesheet/{}/teamEntries", admin_sheet["timesheetID"]),
                &UserFixture::ADMIN,
            )
            .await;
        assert_eq!(none, json!([]));
    }
}
