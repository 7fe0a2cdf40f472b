mod common;

use axum::http::StatusCode;
use common::{parse_body, request_payload, seed_venue, TestApp};
use serde_json::json;
use venue_backend::domain::ports::GuestRepository;

#[tokio::test]
async fn test_guest_deduplicated_by_document() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-400");
    payload["client"]["phone"] = json!("555-0400");
    app.post("/api/v1/requests", payload).await;

    // Same person at another table: empty phone must not clobber the stored
    // one, the new email is picked up.
    let mut payload = request_payload(&venue, &venue.table2_id, "DOC-400");
    payload["client"]["name"] = json!("Carlos A. Mendez");
    payload["client"]["phone"] = json!("");
    payload["client"]["email"] = json!("carlos@example.com");
    let res = app.post("/api/v1/requests", payload).await;
    assert_eq!(res.status(), StatusCode::OK);

    let guest = app
        .state
        .guest_repo
        .find_by_document("DOC-400")
        .await
        .unwrap()
        .expect("guest should exist");
    assert_eq!(guest.name, "Carlos A. Mendez");
    assert_eq!(guest.phone.as_deref(), Some("555-0400"));
    assert_eq!(guest.email.as_deref(), Some("carlos@example.com"));

    // Both requests point at the one record.
    let first = parse_body(app.get("/api/v1/requests").await).await;
    let requests = first.as_array().unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0]["client_guest_id"], requests[1]["client_guest_id"]);
}

#[tokio::test]
async fn test_blank_client_identity_is_rejected() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "   ");
    let res = app.post("/api/v1/requests", payload.clone()).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    payload["client"]["document_number"] = json!("DOC-401");
    payload["client"]["name"] = json!("");
    let res = app.post("/api/v1/requests", payload).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_approval_records_attendance_for_named_guests() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, true, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-402");
    payload["guests"] = json!([
        {"name": "Ana Torres", "document_number": "DOC-403"}
    ]);
    let created = parse_body(app.post("/api/v1/requests", payload).await).await;
    let id = created["id"].as_str().unwrap();

    // Creation alone grants nothing.
    let client = app.state.guest_repo.find_by_document("DOC-402").await.unwrap().unwrap();
    assert_eq!(client.attendance_count, 0);
    assert_eq!(client.loyalty_points, 0);

    app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await;

    for document in ["DOC-402", "DOC-403"] {
        let guest = app.state.guest_repo.find_by_document(document).await.unwrap().unwrap();
        assert_eq!(guest.attendance_count, 1, "attendance for {}", document);
        assert_eq!(guest.loyalty_points, 10, "points for {}", document);
    }
}

#[tokio::test]
async fn test_anonymous_approval_credits_client_only() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-404");
    payload["extra_guests"] = json!(2);
    let created = parse_body(app.post("/api/v1/requests", payload).await).await;
    let id = created["id"].as_str().unwrap();

    app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await;

    let client = app.state.guest_repo.find_by_document("DOC-404").await.unwrap().unwrap();
    assert_eq!(client.attendance_count, 1);
    assert_eq!(client.loyalty_points, 10);

    // The placeholder owns 6 tickets but never accrues anything.
    let placeholder = app
        .state
        .guest_repo
        .find_by_document(&format!("ANON-{}", venue.event_id))
        .await
        .unwrap()
        .expect("placeholder should exist after anonymous issuance");
    assert_eq!(placeholder.attendance_count, 0);
    assert_eq!(placeholder.loyalty_points, 0);
}
