mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, str_field, unique};

/// Absent schedule list expands to seven full-day rows with every grace
/// offset at zero; an explicit empty list yields zero rows.
#[tokio::test]
async fn test_default_expansion_determinism() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post("/api/attendances", json!({ "name": unique("defaulted") }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let schedules = body["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 7);
    for (i, schedule) in schedules.iter().enumerate() {
        assert_eq!(schedule["dayOfWeek"], i as i64 + 1);
        assert_eq!(schedule["startTime"], "00:00:00");
        assert_eq!(schedule["endTime"], "23:59:59");
        assert_eq!(schedule["earlyInMinutes"], 0);
        assert_eq!(schedule["lateInMinutes"], 0);
        assert_eq!(schedule["earlyOutMinutes"], 0);
        assert_eq!(schedule["lateOutMinutes"], 0);
    }

    let (status, body) = app
        .post(
            "/api/attendances",
            json!({ "name": unique("no-schedules"), "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["schedules"].as_array().map(Vec::len), Some(0));
}

/// Full update discards the previous schedule set entirely.
#[tokio::test]
async fn test_update_replaces_schedule_set() {
    let app = TestApp::spawn().await;
    let name = unique("weekday-shift");

    let (_, body) = app
        .post("/api/attendances", json!({ "name": name }))
        .await;
    let attendance_id = str_field(&body, "id").to_string();

    // Replace the 7 default rows with a two-day schedule
    let (status, _) = app
        .put(
            &format!("/api/attendances/{attendance_id}"),
            json!({
                "name": name,
                "schedules": [
                    {
                        "dayOfWeek": 1,
                        "startTime": "09:00:00",
                        "endTime": "17:30:00",
                        "lateInMinutes": 15
                    },
                    {
                        "dayOfWeek": 2,
                        "startTime": "09:00:00",
                        "endTime": "17:30:00"
                    }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/attendances/{attendance_id}"))
        .await;
    let schedules = body["schedules"].as_array().unwrap();
    assert_eq!(schedules.len(), 2);
    assert_eq!(schedules[0]["dayOfWeek"], 1);
    assert_eq!(schedules[0]["lateInMinutes"], 15);
    assert_eq!(schedules[0]["earlyInMinutes"], 0); // omitted grace defaults to 0
    assert_eq!(schedules[1]["dayOfWeek"], 2);
}

/// Patch without the schedule field must not touch the rows; a rename is not
/// an implicit schedule reset.
#[tokio::test]
async fn test_partial_update_keeps_schedules_when_omitted() {
    let app = TestApp::spawn().await;

    let (_, body) = app
        .post("/api/attendances", json!({ "name": unique("patch-att") }))
        .await;
    let attendance_id = str_field(&body, "id").to_string();

    let (status, _) = app
        .patch(
            &format!("/api/attendances/{attendance_id}"),
            json!({ "name": unique("patch-att-renamed") }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        app.count_child_rows("attendance_schedules", "attendance_id", &attendance_id)
            .await,
        7
    );
}

#[tokio::test]
async fn test_duplicate_name_rejected_and_self_excluded() {
    let app = TestApp::spawn().await;
    let name = unique("dup-att");

    let (_, body) = app.post("/api/attendances", json!({ "name": name })).await;
    let attendance_id = str_field(&body, "id").to_string();

    let (status, _) = app.post("/api/attendances", json!({ "name": name })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Re-submitting its own name on update is allowed
    let (status, _) = app
        .put(
            &format!("/api/attendances/{attendance_id}"),
            json!({ "name": name, "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_cascades_schedules() {
    let app = TestApp::spawn().await;

    let (_, body) = app
        .post("/api/attendances", json!({ "name": unique("cascade-att") }))
        .await;
    let attendance_id = str_field(&body, "id").to_string();

    let (status, _) = app
        .delete(&format!("/api/attendances/{attendance_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.count_child_rows("attendance_schedules", "attendance_id", &attendance_id)
            .await,
        0
    );

    let (status, _) = app
        .get(&format!("/api/attendances/{attendance_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
