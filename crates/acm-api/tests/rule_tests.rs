mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, str_field, unique};

async fn create_group(app: &TestApp, name: &str) -> String {
    let (status, body) = app
        .post(
            "/api/access-control-groups",
            json!({ "name": name, "deviceIds": [], "schedules": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "group create failed: {body}");
    str_field(&body, "id").to_string()
}

/// The full lifecycle scenario: create with no groups, duplicate-name
/// rejection, replace with two groups, then shrink to one.
#[tokio::test]
async fn test_rule_lifecycle_replaces_group_set_exactly() {
    let app = TestApp::spawn().await;
    let rule_name = unique("R1");

    // Create with no group IDs -> associated groups is empty
    let (status, body) = app
        .post("/api/access-control-rules", json!({ "name": rule_name }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let rule_id = str_field(&body, "id").to_string();

    let (status, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(0));

    // A second rule with the same name is rejected and nothing is written
    let (status, _) = app
        .post("/api/access-control-rules", json!({ "name": rule_name }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Update with [g1, g2] -> exactly g1 and g2
    let g1 = create_group(&app, &unique("rule-g1")).await;
    let g2 = create_group(&app, &unique("rule-g2")).await;

    let (status, _) = app
        .put(
            &format!("/api/access-control-rules/{rule_id}"),
            json!({ "name": rule_name, "groupIds": [g1, g2] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    let mut got: Vec<String> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| str_field(g, "id").to_string())
        .collect();
    got.sort();
    let mut expected = vec![g1.clone(), g2.clone()];
    expected.sort();
    assert_eq!(got, expected);

    // Update again with [g2] -> g1 removed, not merely added-to
    let (status, _) = app
        .put(
            &format!("/api/access-control-rules/{rule_id}"),
            json!({ "name": rule_name, "groupIds": [g2] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    let got: Vec<String> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| str_field(g, "id").to_string())
        .collect();
    assert_eq!(got, vec![g2]);
}

/// An invalid group reference aborts the whole update: the rule's name and
/// its group set stay exactly as they were.
#[tokio::test]
async fn test_invalid_group_reference_rolls_back_everything() {
    let app = TestApp::spawn().await;
    let rule_name = unique("atomic-rule");
    let g1 = create_group(&app, &unique("atomic-g1")).await;

    let (status, body) = app
        .post(
            "/api/access-control-rules",
            json!({ "name": rule_name, "groupIds": [g1] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let rule_id = str_field(&body, "id").to_string();

    // Nonexistent group reference -> 404, and nothing changes
    let (status, _) = app
        .put(
            &format!("/api/access-control-rules/{rule_id}"),
            json!({
                "name": unique("renamed"),
                "groupIds": [uuid::Uuid::new_v4()]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(str_field(&body, "name"), rule_name);
    let got: Vec<String> = body["groups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| str_field(g, "id").to_string())
        .collect();
    assert_eq!(got, vec![g1]);
}

/// Updating a rule to keep its own name is not a duplicate; stealing another
/// live rule's name is.
#[tokio::test]
async fn test_self_exclusion_in_duplicate_check() {
    let app = TestApp::spawn().await;
    let name_a = unique("self-excl-a");
    let name_b = unique("self-excl-b");

    let (_, body) = app
        .post("/api/access-control-rules", json!({ "name": name_a }))
        .await;
    let rule_a = str_field(&body, "id").to_string();
    let (status, _) = app
        .post("/api/access-control-rules", json!({ "name": name_b }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Keeping its own name is fine
    let (status, _) = app
        .put(
            &format!("/api/access-control-rules/{rule_a}"),
            json!({ "name": name_a }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Taking rule B's name is a conflict
    let (status, _) = app
        .put(
            &format!("/api/access-control-rules/{rule_a}"),
            json!({ "name": name_b }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

/// Partial update without `groupIds` leaves the association set untouched;
/// with `groupIds: []` it clears it.
#[tokio::test]
async fn test_partial_update_only_replaces_present_collections() {
    let app = TestApp::spawn().await;
    let g1 = create_group(&app, &unique("patch-g1")).await;

    let (_, body) = app
        .post(
            "/api/access-control-rules",
            json!({ "name": unique("patch-rule"), "groupIds": [g1] }),
        )
        .await;
    let rule_id = str_field(&body, "id").to_string();

    // Rename only: groups stay
    let (status, _) = app
        .patch(
            &format!("/api/access-control-rules/{rule_id}"),
            json!({ "name": unique("patch-rule-renamed") }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(1));

    // Explicit empty list: groups cleared
    let (status, _) = app
        .patch(
            &format!("/api/access-control-rules/{rule_id}"),
            json!({ "groupIds": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(body["groups"].as_array().map(Vec::len), Some(0));
}

/// Deleting a rule removes its link rows as well as the rule itself.
#[tokio::test]
async fn test_delete_cascades_to_link_rows() {
    let app = TestApp::spawn().await;
    let g1 = create_group(&app, &unique("cascade-g1")).await;
    let g2 = create_group(&app, &unique("cascade-g2")).await;

    let (_, body) = app
        .post(
            "/api/access-control-rules",
            json!({ "name": unique("cascade-rule"), "groupIds": [g1, g2] }),
        )
        .await;
    let rule_id = str_field(&body, "id").to_string();

    let (status, _) = app
        .delete(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .get(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = app
        .count_child_rows("access_control_rule_groups", "rule_id", &rule_id)
        .await;
    assert_eq!(remaining, 0);

    // Deleting again reports not found
    let (status, _) = app
        .delete(&format!("/api/access-control-rules/{rule_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
