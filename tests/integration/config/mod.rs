//! Configuration endpoint integration tests
//!
//! - GET /config/getConfig
//! - GET /config/getDirectories
//! - GET /config/getTeamList
//! - PUT /config/saveConfig
//! - PUT /config/addTeamPermission, editTeamPermission, removeTeamPermission

use axum::http::StatusCode;
use serde_json::json;
use timesheet_config::ConfigStore;

use crate::common::{assertions, TestApp, UserFixture};

mod test_team_permissions {
    use super::*;

    #[tokio::test]
    async fn test_added_team_is_listed_once() {
        let app = TestApp::new();

        let response = app
            .put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Catroid"))
            .await;
        assertions::assert_no_content(&response);

        assert_eq!(app.team_list().await, vec!["Catroid"]);
    }

    #[tokio::test]
    async fn test_duplicate_team_fails_without_body() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Catroid"))
            .await;

        let response = app
            .put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Catroid"))
            .await;
        assertions::assert_failed(&response, "");

        assert_eq!(app.team_list().await, vec!["Catroid"]);
    }

    #[tokio::test]
    async fn test_rename_scenario() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Alpha"))
            .await;

        let response = app
            .put(
                "/config/editTeamPermission",
                &UserFixture::ADMIN,
                json!(["Alpha", "Beta"]),
            )
            .await;
        assertions::assert_no_content(&response);

        assert_eq!(app.team_list().await, vec!["Beta"]);
    }

    #[tokio::test]
    async fn test_rename_to_same_name_is_rejected_before_store() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Alpha"))
            .await;

        let response = app
            .put(
                "/config/editTeamPermission",
                &UserFixture::ADMIN,
                json!(["Alpha", "Alpha"]),
            )
            .await;
        assertions::assert_failed(&response, "New Team name must be different");

        assert_eq!(app.team_list().await, vec!["Alpha"]);
    }

    #[tokio::test]
    async fn test_rename_to_empty_is_rejected_before_store() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Alpha"))
            .await;

        for new_name in ["", "   "] {
            let response = app
                .put(
                    "/config/editTeamPermission",
                    &UserFixture::ADMIN,
                    json!(["Alpha", new_name]),
                )
                .await;
            assertions::assert_failed(&response, "Team name must not be empty");
        }

        assert_eq!(app.team_list().await, vec!["Alpha"]);
    }

    #[tokio::test]
    async fn test_rename_to_padded_same_name_fails_without_body() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Alpha"))
            .await;

        let response = app
            .put(
                "/config/editTeamPermission",
                &UserFixture::ADMIN,
                json!(["Alpha", " Alpha"]),
            )
            .await;
        assertions::assert_failed(&response, "");

        assert_eq!(app.team_list().await, vec!["Alpha"]);
    }

    #[tokio::test]
    async fn test_padded_names_find_stored_team() {
        let app = TestApp::new();
        let added = app
            .put("/config/addTeamPermission", &UserFixture::ADMIN, json!(" Alpha "))
            .await;
        assertions::assert_no_content(&added);

        let renamed = app
            .put(
                "/config/editTeamPermission",
                &UserFixture::ADMIN,
                json!([" Alpha ", "Beta"]),
            )
            .await;
        assertions::assert_no_content(&renamed);

        let removed = app
            .put("/config/removeTeamPermission", &UserFixture::ADMIN, json!("Beta "))
            .await;
        assertions::assert_no_content(&removed);
        assert!(app.team_list().await.is_empty());
    }

    #[tokio::test]
    async fn test_rename_with_wrong_arity_fails_without_body() {
        let app = TestApp::new();

        for body in [json!(["Alpha"]), json!(["Alpha", "Beta", "Gamma"]), json!(null)] {
            let response = app
                .put("/config/editTeamPermission", &UserFixture::ADMIN, body)
                .await;
            assertions::assert_failed(&response, "");
        }
    }

    #[tokio::test]
    async fn test_rename_of_unknown_team_fails() {
        let app = TestApp::new();

        let response = app
            .put(
                "/config/editTeamPermission",
                &UserFixture::ADMIN,
                json!(["Nobody", "Beta"]),
            )
            .await;
        assertions::assert_failed(&response, "");
        assert!(app.team_list().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_team_fails() {
        let app = TestApp::new();

        let response = app
            .put(
                "/config/removeTeamPermission",
                &UserFixture::ADMIN,
                json!("Nobody"),
            )
            .await;
        assertions::assert_failed(&response, "");
    }

    #[tokio::test]
    async fn test_remove_team() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Alpha"))
            .await;

        let response = app
            .put(
                "/config/removeTeamPermission",
                &UserFixture::ADMIN,
                json!("Alpha"),
            )
            .await;
        assertions::assert_no_content(&response);
        assert!(app.team_list().await.is_empty());
    }
}

mod test_save_config {
    use super::*;

    #[tokio::test]
    async fn test_mail_fields_are_always_overwritten() {
        let app = TestApp::new();

        let response = app
            .put(
                "/config/saveConfig",
                &UserFixture::ADMIN,
                json!({
                    "mailFromName": "Timesheet",
                    "mailFrom": "noreply@example.org",
                    "mailSubject": "Reminder",
                    "mailBody": "Please fill in your timesheet."
                }),
            )
            .await;
        assertions::assert_no_content(&response);

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["mailFrom"], "noreply@example.org");
        assert_eq!(config["mailBody"], "Please fill in your timesheet.");

        // Omitted mail fields are cleared
        app.put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({ "mailSubject": "Second reminder" }),
        )
        .await;

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["mailSubject"], "Second reminder");
        assert!(config.get("mailFrom").is_none());
    }

    #[tokio::test]
    async fn test_absent_approved_users_are_left_untouched() {
        let app = TestApp::new();
        app.config_store.add_approved_user("key-existing").await.unwrap();

        app.put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({ "mailFrom": "noreply@example.org" }),
        )
        .await;

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["approvedUsers"], json!(["key-existing"]));
    }

    #[tokio::test]
    async fn test_present_approved_users_replace_the_set() {
        let app = TestApp::new();
        app.config_store.add_approved_user("key-existing").await.unwrap();

        let response = app
            .put(
                "/config/saveConfig",
                &UserFixture::ADMIN,
                json!({ "approvedUsers": ["student", "nobody"] }),
            )
            .await;
        assertions::assert_no_content(&response);

        // Each resolvable name records the caller's own key
        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["approvedUsers"], json!([UserFixture::ADMIN.user_key]));
    }

    #[tokio::test]
    async fn test_empty_approved_users_clear_the_set() {
        let app = TestApp::new();
        app.config_store.add_approved_user("key-existing").await.unwrap();

        app.put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({ "approvedUsers": [] }),
        )
        .await;

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["approvedUsers"], json!([]));
    }

    #[tokio::test]
    async fn test_approved_groups_replace_the_set() {
        let app = TestApp::new();
        app.config_store.add_approved_group("old-group").await.unwrap();

        app.put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({ "approvedGroups": ["tutors", "lecturers"] }),
        )
        .await;

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["approvedGroups"], json!(["tutors", "lecturers"]));
    }

    #[tokio::test]
    async fn test_teams_are_replaced_with_their_groups() {
        let app = TestApp::new();
        app.put("/config/addTeamPermission", &UserFixture::ADMIN, json!("Zeta"))
            .await;

        let response = app
            .put(
                "/config/saveConfig",
                &UserFixture::ADMIN,
                json!({
                    "teams": [
                        {
                            "teamName": "Zeta",
                            "coordinatorGroups": ["zeta-coordinators"],
                            "seniorGroups": [],
                            "developerGroups": ["zeta-developers"]
                        },
                        { "teamName": "Alpha", "seniorGroups": ["alpha-seniors"] }
                    ]
                }),
            )
            .await;
        assertions::assert_no_content(&response);

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        let teams = config["teams"].as_array().unwrap();
        assert_eq!(teams.len(), 2);

        // Sorted by name
        assert_eq!(teams[0]["teamName"], "Alpha");
        assert_eq!(teams[0]["seniorGroups"], json!(["alpha-seniors"]));
        assert_eq!(teams[0]["coordinatorGroups"], json!([]));
        assert_eq!(teams[1]["teamName"], "Zeta");
        assert_eq!(teams[1]["coordinatorGroups"], json!(["zeta-coordinators"]));
        assert_eq!(teams[1]["developerGroups"], json!(["zeta-developers"]));
    }

    #[tokio::test]
    async fn test_user_directory_is_stored() {
        let app = TestApp::new();

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["userDirectoryId"], -1);

        app.put(
            "/config/saveConfig",
            &UserFixture::ADMIN,
            json!({ "userDirectoryId": 32769 }),
        )
        .await;

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["userDirectoryId"], 32769);
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let app = TestApp::new();

        let (status, _) = app
            .put(
                "/config/saveConfig",
                &UserFixture::ADMIN,
                json!({ "approvedUsers": "student" }),
            )
            .await;
        assert!(status.is_client_error());
    }
}

mod test_listings {
    use super::*;

    #[tokio::test]
    async fn test_directories_one_entry_per_directory() {
        let app = TestApp::new();

        let directories = app
            .get_json("/config/getDirectories", &UserFixture::ADMIN)
            .await;
        assert_eq!(
            directories,
            json!([{ "userDirectoryId": 1 }, { "userDirectoryId": 32769 }])
        );
    }

    #[tokio::test]
    async fn test_get_config_snapshot_shape() {
        let app = TestApp::new();

        let config = app.get_json("/config/getConfig", &UserFixture::ADMIN).await;
        assert_eq!(config["teams"], json!([]));
        assert_eq!(config["approvedUsers"], json!([]));
        assert_eq!(config["approvedGroups"], json!([]));
    }

    #[tokio::test]
    async fn test_listings_require_permission() {
        let app = TestApp::new();

        for uri in [
            "/config/getConfig",
            "/config/getDirectories",
            "/config/getTeamList",
        ] {
            let (status, body) = app.get(uri, Some(&UserFixture::STUDENT)).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{} allowed a student", uri);
            assertions::assert_error_code(&body, "FORBIDDEN");
        }
    }
}
