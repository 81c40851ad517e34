mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, str_field, unique};

/// Create requires a permission bundle; omitted flags default to false.
#[tokio::test]
async fn test_create_user_with_permission_defaults() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/users",
            json!({
                "username": unique("operator"),
                "password": "longenough1",
                "permission": { "devicePermission": true }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "user create failed: {body}");
    assert_eq!(body["status"], "active");
    assert_eq!(body["permission"]["devicePermission"], true);
    assert_eq!(body["permission"]["peoplePermission"], false);
    assert_eq!(body["permission"]["systemLogPermission"], false);
}

#[tokio::test]
async fn test_create_user_without_permission_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .post(
            "/api/users",
            json!({ "username": unique("nopers"), "password": "longenough1" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Full update rewrites the permission row wholesale: flags granted before
/// but omitted now are revoked.
#[tokio::test]
async fn test_full_update_replaces_permission_wholesale() {
    let app = TestApp::spawn().await;
    let username = unique("rotated");

    let (_, body) = app
        .post(
            "/api/users",
            json!({
                "username": username,
                "password": "longenough1",
                "permission": { "devicePermission": true, "reportPermission": true }
            }),
        )
        .await;
    let user_id = str_field(&body, "id").to_string();

    let (status, body) = app
        .put(
            &format!("/api/users/{user_id}"),
            json!({
                "username": username,
                "permission": { "peoplePermission": true }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permission"]["peoplePermission"], true);
    assert_eq!(body["permission"]["devicePermission"], false); // revoked
    assert_eq!(body["permission"]["reportPermission"], false); // revoked
}

/// Partial update merges onto the current flags instead of resetting them.
#[tokio::test]
async fn test_partial_update_merges_permission() {
    let app = TestApp::spawn().await;

    let (_, body) = app
        .post(
            "/api/users",
            json!({
                "username": unique("merged"),
                "password": "longenough1",
                "permission": { "devicePermission": true }
            }),
        )
        .await;
    let user_id = str_field(&body, "id").to_string();

    let (status, body) = app
        .patch(
            &format!("/api/users/{user_id}"),
            json!({ "permission": { "reportPermission": true } }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["permission"]["devicePermission"], true); // kept
    assert_eq!(body["permission"]["reportPermission"], true); // added
}

#[tokio::test]
async fn test_username_uniqueness_with_self_exclusion() {
    let app = TestApp::spawn().await;
    let username = unique("uniq");

    let (_, body) = app
        .post(
            "/api/users",
            json!({
                "username": username,
                "password": "longenough1",
                "permission": {}
            }),
        )
        .await;
    let user_id = str_field(&body, "id").to_string();

    let (status, _) = app
        .post(
            "/api/users",
            json!({
                "username": username,
                "password": "longenough1",
                "permission": {}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Keeping its own username on full update is fine
    let (status, _) = app
        .put(
            &format!("/api/users/{user_id}"),
            json!({ "username": username, "permission": {} }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

/// Deleting a user removes the permission row with it.
#[tokio::test]
async fn test_delete_cascades_permission_row() {
    let app = TestApp::spawn().await;

    let (_, body) = app
        .post(
            "/api/users",
            json!({
                "username": unique("goner"),
                "password": "longenough1",
                "permission": {}
            }),
        )
        .await;
    let user_id = str_field(&body, "id").to_string();

    let (status, _) = app.delete(&format!("/api/users/{user_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.count_child_rows("user_permissions", "user_id", &user_id)
            .await,
        0
    );

    let (status, _) = app.get(&format!("/api/users/{user_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Created users can log in through the public endpoint; a bad password is
/// rejected with the same opaque message as an unknown user.
#[tokio::test]
async fn test_created_user_can_login() {
    let app = TestApp::spawn().await;
    let username = unique("login-user");

    let (status, _) = app
        .post(
            "/api/users",
            json!({
                "username": username,
                "password": "longenough1",
                "permission": {}
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post_unauthenticated(
            "/login",
            json!({ "username": username, "password": "longenough1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!str_field(&body, "token").is_empty());

    let (status, _) = app
        .post_unauthenticated(
            "/login",
            json!({ "username": username, "password": "wrongpassword1" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
