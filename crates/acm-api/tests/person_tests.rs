mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{TestApp, str_field, unique};

fn minimal_person(first: &str) -> serde_json::Value {
    json!({
        "firstName": first,
        "lastName": "Tester",
        "personType": "employee",
    })
}

/// Card and plate sets are replaced exactly on full update.
#[tokio::test]
async fn test_update_replaces_cards_and_plates() {
    let app = TestApp::spawn().await;
    let card_a = unique("card-a");
    let card_b = unique("card-b");
    let plate = unique("plate");

    let mut request = minimal_person("Replace");
    request["cards"] = json!([{ "cardNumber": card_a }]);
    request["licensePlates"] = json!([plate]);

    let (status, body) = app.post("/api/people", request).await;
    assert_eq!(status, StatusCode::CREATED, "person create failed: {body}");
    let person_id = str_field(&body, "id").to_string();
    assert_eq!(body["cards"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["licensePlates"].as_array().map(Vec::len), Some(1));

    // Full update with a different card and no plates
    let mut update = minimal_person("Replace");
    update["cards"] = json!([{ "cardNumber": card_b }]);
    update["licensePlates"] = json!([]);
    let (status, body) = app.put(&format!("/api/people/{person_id}"), update).await;
    assert_eq!(status, StatusCode::OK);

    let cards: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| str_field(c, "cardNumber"))
        .collect();
    assert_eq!(cards, vec![card_b.as_str()]);
    assert_eq!(body["licensePlates"].as_array().map(Vec::len), Some(0));
}

/// Re-submitting a person's own card number must not be flagged as a
/// duplicate; the old rows are deleted before the insert.
#[tokio::test]
async fn test_own_card_number_can_be_resubmitted() {
    let app = TestApp::spawn().await;
    let card = unique("own-card");

    let mut request = minimal_person("Resubmit");
    request["cards"] = json!([{ "cardNumber": card }]);
    let (_, body) = app.post("/api/people", request.clone()).await;
    let person_id = str_field(&body, "id").to_string();

    let (status, body) = app.put(&format!("/api/people/{person_id}"), request).await;
    assert_eq!(status, StatusCode::OK, "resubmit failed: {body}");
    assert_eq!(body["cards"].as_array().map(Vec::len), Some(1));
}

/// A card number held by a different person is a conflict, and the failed
/// write leaves the second person's previous cards untouched.
#[tokio::test]
async fn test_card_number_taken_by_another_person_conflicts() {
    let app = TestApp::spawn().await;
    let shared_card = unique("shared-card");
    let own_card = unique("own-card");

    let mut first = minimal_person("Holder");
    first["cards"] = json!([{ "cardNumber": shared_card }]);
    let (status, _) = app.post("/api/people", first).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut second = minimal_person("Intruder");
    second["cards"] = json!([{ "cardNumber": own_card }]);
    let (_, body) = app.post("/api/people", second).await;
    let second_id = str_field(&body, "id").to_string();

    let mut steal = minimal_person("Intruder");
    steal["cards"] = json!([{ "cardNumber": shared_card }]);
    let (status, _) = app.put(&format!("/api/people/{second_id}"), steal).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Atomicity: the second person still holds exactly their original card
    let (_, body) = app.get(&format!("/api/people/{second_id}")).await;
    let cards: Vec<&str> = body["cards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| str_field(c, "cardNumber"))
        .collect();
    assert_eq!(cards, vec![own_card.as_str()]);
}

/// The external person code is unique among live people, excluding self.
#[tokio::test]
async fn test_person_code_uniqueness() {
    let app = TestApp::spawn().await;
    let code = unique("EMP");

    let mut first = minimal_person("Coded");
    first["personCode"] = json!(code);
    let (status, body) = app.post("/api/people", first).await;
    assert_eq!(status, StatusCode::CREATED);
    let person_id = str_field(&body, "id").to_string();

    let mut second = minimal_person("Copycat");
    second["personCode"] = json!(code);
    let (status, _) = app.post("/api/people", second).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Keeping its own code on update is fine
    let mut keep = minimal_person("Coded");
    keep["personCode"] = json!(code);
    let (status, _) = app.put(&format!("/api/people/{person_id}"), keep).await;
    assert_eq!(status, StatusCode::OK);
}

/// An invalid rule assignment is rejected before any write.
#[tokio::test]
async fn test_unknown_rule_reference_is_not_found() {
    let app = TestApp::spawn().await;

    let mut request = minimal_person("Ruleless");
    request["ruleId"] = json!(uuid::Uuid::new_v4());
    let (status, _) = app.post("/api/people", request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_person_type_rejected() {
    let app = TestApp::spawn().await;

    let mut request = minimal_person("Android");
    request["personType"] = json!("robot");
    let (status, _) = app.post("/api/people", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Delete hard-removes cards and plates; the person row is soft-deleted and
/// disappears from reads.
#[tokio::test]
async fn test_delete_cascades_cards_and_plates() {
    let app = TestApp::spawn().await;

    let mut request = minimal_person("Leaver");
    request["cards"] = json!([{ "cardNumber": unique("leaver-card") }]);
    request["licensePlates"] = json!([unique("leaver-plate")]);
    let (_, body) = app.post("/api/people", request).await;
    let person_id = str_field(&body, "id").to_string();

    let (status, _) = app.delete(&format!("/api/people/{person_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(
        app.count_child_rows("person_cards", "person_id", &person_id)
            .await,
        0
    );
    assert_eq!(
        app.count_child_rows("person_license_plates", "person_id", &person_id)
            .await,
        0
    );

    let (status, _) = app.get(&format!("/api/people/{person_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Partial update without the card field leaves cards alone.
#[tokio::test]
async fn test_partial_update_preserves_omitted_collections() {
    let app = TestApp::spawn().await;

    let mut request = minimal_person("Patchy");
    request["cards"] = json!([{ "cardNumber": unique("patchy-card") }]);
    let (_, body) = app.post("/api/people", request).await;
    let person_id = str_field(&body, "id").to_string();

    let (status, body) = app
        .patch(
            &format!("/api/people/{person_id}"),
            json!({ "company": "Initech" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["company"], "Initech");
    assert_eq!(body["cards"].as_array().map(Vec::len), Some(1));
}
