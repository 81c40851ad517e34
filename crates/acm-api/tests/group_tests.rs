mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, str_field, unique};

async fn create_device(app: &TestApp, name: &str) -> String {
    let (status, body) = app
        .post(
            "/api/access-control-devices",
            json!({
                "name": name,
                "deviceType": "door-reader",
                "hostAddress": unique("10.0.0.1"),
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "device create failed: {body}");
    str_field(&body, "id").to_string()
}

/// Omitting the schedule list entirely applies the 24/7 default: seven rows,
/// Monday through Sunday, each spanning the full day.
#[tokio::test]
async fn test_absent_schedules_default_to_seven_full_days() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": unique("default-sched") }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let schedules = body["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 7);
    for (i, schedule) in schedules.iter().enumerate() {
        assert_eq!(schedule["dayOfWeek"], i as i64 + 1);
        assert_eq!(schedule["startTime"], "00:00:00");
        assert_eq!(schedule["endTime"], "23:59:59");
        assert!(schedule["date"].is_null());
    }
}

/// An explicitly empty schedule list means "no schedules" and must not
/// trigger the default.
#[tokio::test]
async fn test_explicit_empty_schedules_stay_empty() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": unique("empty-sched"), "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedules"].as_array().map(Vec::len), Some(0));
}

/// Full update replaces the device membership set exactly.
#[tokio::test]
async fn test_update_replaces_device_memberships() {
    let app = TestApp::spawn().await;
    let name = unique("membership-group");
    let d1 = create_device(&app, &unique("reader-1")).await;
    let d2 = create_device(&app, &unique("reader-2")).await;
    let d3 = create_device(&app, &unique("reader-3")).await;

    let (status, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": name, "deviceIds": [d1, d2], "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let group_id = str_field(&body, "id").to_string();

    // Replace {d1, d2} with {d2, d3}
    let (status, _) = app
        .put(
            &format!("/api/access-control-groups/{group_id}"),
            json!({ "name": name, "deviceIds": [d2, d3], "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/access-control-groups/{group_id}"))
        .await;
    let mut got: Vec<String> = body["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| str_field(d, "id").to_string())
        .collect();
    got.sort();
    let mut expected = vec![d2, d3];
    expected.sort();
    assert_eq!(got, expected);
}

/// A bad weekday is rejected before anything is written.
#[tokio::test]
async fn test_invalid_day_of_week_is_a_validation_error() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/api/access-control-groups",
            json!({
                "name": unique("bad-day"),
                "schedules": [{
                    "dayOfWeek": 9,
                    "startTime": "08:00:00",
                    "endTime": "17:00:00"
                }]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// A nonexistent device reference aborts the create and leaves no group row.
#[tokio::test]
async fn test_invalid_device_reference_aborts_create() {
    let app = TestApp::spawn().await;
    let name = unique("ghost-device-group");

    let (status, _) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": name, "deviceIds": [uuid::Uuid::new_v4()], "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The rolled-back group must not be creatable-conflicting: same name
    // succeeds afterwards.
    let (status, _) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": name, "deviceIds": [], "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

/// Deleting a group removes its rows from both child tables.
#[tokio::test]
async fn test_delete_cascades_to_both_child_tables() {
    let app = TestApp::spawn().await;
    let d1 = create_device(&app, &unique("cascade-reader")).await;

    let (_, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": unique("cascade-group"), "deviceIds": [d1] }),
        )
        .await;
    let group_id = str_field(&body, "id").to_string();

    // Default schedules were applied, so both child tables are populated
    assert_eq!(
        app.count_child_rows("access_control_group_schedules", "group_id", &group_id)
            .await,
        7
    );
    assert_eq!(
        app.count_child_rows("access_control_group_devices", "group_id", &group_id)
            .await,
        1
    );

    let (status, _) = app
        .delete(&format!("/api/access-control-groups/{group_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.count_child_rows("access_control_group_schedules", "group_id", &group_id)
            .await,
        0
    );
    assert_eq!(
        app.count_child_rows("access_control_group_devices", "group_id", &group_id)
            .await,
        0
    );
}

/// A deleted device is silently dropped from the group view rather than
/// failing the read.
#[tokio::test]
async fn test_dangling_device_reference_is_skipped_in_view() {
    let app = TestApp::spawn().await;
    let d1 = create_device(&app, &unique("doomed-reader")).await;

    let (_, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": unique("dangling-group"), "deviceIds": [d1], "schedules": [] }),
        )
        .await;
    let group_id = str_field(&body, "id").to_string();

    let (status, _) = app
        .delete(&format!("/api/access-control-devices/{d1}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .get(&format!("/api/access-control-groups/{group_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["devices"].as_array().map(Vec::len), Some(0));

    // The link row itself is still there; only the view skips it
    assert_eq!(
        app.count_child_rows("access_control_group_devices", "group_id", &group_id)
            .await,
        1
    );
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .post_unauthenticated(
            "/api/access-control-groups",
            json!({ "name": unique("unauthorized") }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
