//! Timesheet endpoint integration tests
//!
//! - GET /timesheets, /timesheets/my, /timesheets/{id}, /timesheets/owner/{id}
//! - GET /timesheetID/fromUser/{userName}, GET /coordinator/{id}
//! - POST /timesheets/{id}/changeHours

use axum::http::StatusCode;
use serde_json::{json, Value};
use timesheet_records::{TimesheetService, TimesheetTargets};

use crate::common::{assertions, TestApp, UserFixture};

/// Create the user's timesheet through `/timesheets/my` and return its id
async fn my_timesheet_id(app: &TestApp, user: &UserFixture) -> i64 {
    let sheet = app.get_json("/timesheets/my", user).await;
    sheet["timesheetID"].as_i64().unwrap()
}

fn service(app: &TestApp) -> TimesheetService {
    TimesheetService::new(app.timesheet_store.clone())
}

mod test_my_timesheet {
    use super::*;

    #[tokio::test]
    async fn test_first_access_creates_timesheet() {
        let app = TestApp::new();

        let sheet: Value = app.get_json("/timesheets/my", &UserFixture::STUDENT).await;
        assert_eq!(sheet["userKey"], UserFixture::STUDENT.user_key);
        assert_eq!(sheet["isActive"], false);
        assert_eq!(sheet["isEnabled"], true);
        assert_eq!(sheet["targetHourPractice"], 0);
        assert!(chrono::DateTime::parse_from_rfc3339(sheet["latestEntryDate"].as_str().unwrap())
            .is_ok());

        let again = app.get_json("/timesheets/my", &UserFixture::STUDENT).await;
        assert_eq!(again["timesheetID"], sheet["timesheetID"]);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let app = TestApp::new();

        let (status, _) = app.get("/timesheets/my", None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_concurrent_adds_surface_integrity_fault() {
        let app = TestApp::new();
        let service = service(&app);

        let (first, second) = tokio::join!(
            service.add(UserFixture::STUDENT.user_key, TimesheetTargets::default()),
            service.add(UserFixture::STUDENT.user_key, TimesheetTargets::default())
        );
        first.unwrap();
        second.unwrap();

        let (status, body) = app
            .get("/timesheets/my", Some(&UserFixture::STUDENT))
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assertions::assert_error_code(&body, "DATA_INTEGRITY_FAULT");
    }
}

mod test_timesheet_access {
    use super::*;

    #[tokio::test]
    async fn test_owner_and_admin_can_read() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;
        let uri = format!("/timesheets/{}", id);

        let own = app.get_json(&uri, &UserFixture::STUDENT).await;
        assert_eq!(own["timesheetID"], id);

        let admin = app.get_json(&uri, &UserFixture::ADMIN).await;
        assert_eq!(admin, own);

        let (status, body) = app.get(&uri, Some(&UserFixture::OTHER_STUDENT)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assertions::assert_error_code(&body, "AUTHORIZATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_timesheet_is_not_found() {
        let app = TestApp::new();

        let (status, body) = app.get("/timesheets/4711", Some(&UserFixture::ADMIN)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assertions::assert_error_code(&body, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_owner_profile() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;

        let owner = app
            .get_json(&format!("/timesheets/owner/{}", id), &UserFixture::ADMIN)
            .await;
        assert_eq!(
            owner,
            json!({
                "userKey": UserFixture::STUDENT.user_key,
                "userName": UserFixture::STUDENT.user_name,
                "fullName": null,
                "email": "student@example.org"
            })
        );
    }

    #[tokio::test]
    async fn test_list_requires_permission() {
        let app = TestApp::new();
        my_timesheet_id(&app, &UserFixture::STUDENT).await;
        my_timesheet_id(&app, &UserFixture::OTHER_STUDENT).await;

        let all = app.get_json("/timesheets", &UserFixture::ADMIN).await;
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, _) = app.get("/timesheets", Some(&UserFixture::STUDENT)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_timesheet_id_from_user_name() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;

        let found = app
            .get_json("/timesheetID/fromUser/student", &UserFixture::ADMIN)
            .await;
        assert_eq!(found, json!(id));

        let (status, _) = app
            .get("/timesheetID/fromUser/nobody", Some(&UserFixture::ADMIN))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .get("/timesheetID/fromUser/student2", Some(&UserFixture::ADMIN))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Owners may look up their own id, nobody else's
        let own = app
            .get_json("/timesheetID/fromUser/student", &UserFixture::STUDENT)
            .await;
        assert_eq!(own, json!(id));

        let (status, _) = app
            .get("/timesheetID/fromUser/student2", Some(&UserFixture::STUDENT))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .get("/timesheetID/fromUser/nobody", Some(&UserFixture::STUDENT))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

mod test_team_coordinator_access {
    use super::*;

    /// Team Alpha: tutors coordinate, `student` develops
    async fn save_alpha_team(app: &TestApp) {
        let response = app
            .put(
                "/config/saveConfig",
                &UserFixture::ADMIN,
                json!({
                    "teams": [{
                        "teamName": "Alpha",
                        "coordinatorGroups": [crate::common::TUTOR_GROUP],
                        "seniorGroups": [],
                        "developerGroups": [UserFixture::STUDENT.user_name]
                    }]
                }),
            )
            .await;
        assertions::assert_no_content(&response);
    }

    #[tokio::test]
    async fn test_coordinator_reads_developer_timesheet() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;

        let (status, _) = app
            .get("/timesheetID/fromUser/student", Some(&UserFixture::TUTOR))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        save_alpha_team(&app).await;

        let found = app
            .get_json("/timesheetID/fromUser/student", &UserFixture::TUTOR)
            .await;
        assert_eq!(found, json!(id));

        let sheet = app
            .get_json(&format!("/timesheets/{}", id), &UserFixture::TUTOR)
            .await;
        assert_eq!(sheet["userKey"], UserFixture::STUDENT.user_key);

        let coordinator_view = app
            .get_json(&format!("/coordinator/{}", id), &UserFixture::TUTOR)
            .await;
        assert_eq!(coordinator_view, sheet);

        let owner = app
            .get_json(&format!("/timesheets/owner/{}", id), &UserFixture::TUTOR)
            .await;
        assert_eq!(owner["userName"], UserFixture::STUDENT.user_name);
    }

    #[tokio::test]
    async fn test_coordinator_access_is_limited_to_team_developers() {
        let app = TestApp::new();
        let other = my_timesheet_id(&app, &UserFixture::OTHER_STUDENT).await;
        save_alpha_team(&app).await;

        let (status, _) = app
            .get("/timesheetID/fromUser/student2", Some(&UserFixture::TUTOR))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .get(&format!("/timesheets/{}", other), Some(&UserFixture::TUTOR))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Developers cannot read their coordinators' timesheets
        let tutor = my_timesheet_id(&app, &UserFixture::TUTOR).await;
        let (status, _) = app
            .get(&format!("/timesheets/{}", tutor), Some(&UserFixture::STUDENT))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_coordinator_cannot_change_hours() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;
        save_alpha_team(&app).await;

        let (status, _) = app
            .post(
                &format!("/timesheets/{}/changeHours", id),
                &UserFixture::TUTOR,
                json!({ "targetHourPractice": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

mod test_change_hours {
    use super::*;

    #[tokio::test]
    async fn test_owner_changes_hours_from_form_text() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;

        let (status, body) = app
            .post(
                &format!("/timesheets/{}/changeHours", id),
                &UserFixture::STUDENT,
                json!({
                    "timesheetID": id,
                    "lectures": "Software Engineering",
                    "targetHourPractice": "150",
                    "targetHourTheory": 0,
                    "isActive": true
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "body: {}", body);

        let updated: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(updated["targetHourPractice"], 150);
        assert_eq!(updated["lectures"], "Software Engineering");
        assert_eq!(updated["isActive"], true);
        assert_eq!(updated["isEnabled"], true);

        let stored = service(&app)
            .get_timesheet_by_user(UserFixture::STUDENT.user_key)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.target_hours_practice, 150);
    }

    #[tokio::test]
    async fn test_invalid_hours_are_rejected() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;
        let uri = format!("/timesheets/{}/changeHours", id);

        let (status, body) = app
            .post(&uri, &UserFixture::STUDENT, json!({ "targetHourPractice": -1 }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assertions::assert_error_code(&body, "VALIDATION_ERROR");

        let (status, _) = app
            .post(
                &uri,
                &UserFixture::STUDENT,
                json!({ "timesheetID": id + 1, "targetHourPractice": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_other_users_cannot_change_hours() {
        let app = TestApp::new();
        let id = my_timesheet_id(&app, &UserFixture::STUDENT).await;

        let (status, _) = app
            .post(
                &format!("/timesheets/{}/changeHours", id),
                &UserFixture::OTHER_STUDENT,
                json!({ "targetHourPractice": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = app
            .post(
                &format!("/timesheets/{}/changeHours", id),
                &UserFixture::ADMIN,
                json!({ "targetHourPractice": 10 }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }
}
