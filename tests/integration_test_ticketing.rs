mod common;

use axum::http::StatusCode;
use common::{parse_body, request_payload, seed_venue, TestApp};
use serde_json::json;
use std::collections::HashSet;

#[tokio::test]
async fn test_guest_list_sector_issues_named_tickets() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, true, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-300");
    payload["guests"] = json!([
        {"name": "Ana Torres", "document_number": "DOC-301"},
        {"name": "Luis Rojas", "document_number": "DOC-302"},
        {"name": "Maria Paz", "document_number": "DOC-303"}
    ]);

    let created = parse_body(app.post("/api/v1/requests", payload).await).await;
    let id = created["id"].as_str().unwrap();

    let body = parse_body(
        app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await,
    )
    .await;
    let tickets = body["tickets"]["tickets"].as_array().unwrap();

    // Client plus three listed guests, each ticket naming its holder.
    assert_eq!(tickets.len(), 4);
    assert_eq!(tickets[0]["holder"], "Carlos Mendez");
    assert_eq!(tickets[0]["document_number"], "DOC-300");
    assert_eq!(tickets[1]["holder"], "Ana Torres");
    assert_eq!(tickets[1]["document_number"], "DOC-301");
    assert_eq!(tickets[3]["total"], 4);
    for ticket in tickets {
        assert_eq!(ticket["is_complimentary"], false);
        assert_eq!(ticket["code"].as_str().unwrap().len(), 32);
    }
}

#[tokio::test]
async fn test_open_sector_issues_anonymous_tickets_by_headcount() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-304");
    payload["extra_guests"] = json!(3);
    // Guest identities are ignored in open sectors; sizing drives the count.
    payload["guests"] = json!([
        {"name": "Ignored Person", "document_number": "DOC-305"}
    ]);

    let created = parse_body(app.post("/api/v1/requests", payload).await).await;
    let id = created["id"].as_str().unwrap();

    let body = parse_body(
        app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await,
    )
    .await;
    let tickets = body["tickets"]["tickets"].as_array().unwrap();

    // 4 included in the package plus 3 extra guests.
    assert_eq!(tickets.len(), 7);
    assert_eq!(tickets[0]["holder"], "Anonymous #1 of 7");
    assert_eq!(tickets[6]["holder"], "Anonymous #7 of 7");
    for ticket in tickets {
        assert!(ticket["document_number"].is_null());
    }
}

#[tokio::test]
async fn test_complimentary_batch_follows_event_quota() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 2).await;

    let created = parse_body(
        app.post("/api/v1/requests", request_payload(&venue, &venue.table1_id, "DOC-306"))
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let body = parse_body(
        app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await,
    )
    .await;

    assert_eq!(body["tickets"]["tickets"].as_array().unwrap().len(), 4);
    let complimentary = body["complimentary"]["tickets"].as_array().unwrap();
    assert_eq!(complimentary.len(), 2);
    for ticket in complimentary {
        assert_eq!(ticket["is_complimentary"], true);
    }
}

#[tokio::test]
async fn test_download_rereads_issued_codes() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 1).await;

    let created = parse_body(
        app.post("/api/v1/requests", request_payload(&venue, &venue.table1_id, "DOC-307"))
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    // Not downloadable before approval.
    let res = app.get(&format!("/api/v1/requests/{}/tickets", id)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let approved = parse_body(
        app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await,
    )
    .await;
    let issued_codes: HashSet<String> = approved["tickets"]["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["code"].as_str().unwrap().to_string())
        .collect();

    // Two downloads return the same codes; nothing new is minted.
    for _ in 0..2 {
        let body = parse_body(app.get(&format!("/api/v1/requests/{}/tickets", id)).await).await;
        let codes: HashSet<String> = body["tickets"]["tickets"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["code"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(codes, issued_codes);
        assert_eq!(body["complimentary"]["tickets"].as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_failed_issuance_rolls_back_approval() {
    use venue_backend::domain::ports::GuestRepository;

    let app = TestApp::new().await;
    let venue = seed_venue(&app, true, 0).await;

    let mut payload = request_payload(&venue, &venue.table1_id, "DOC-310");
    payload["guests"] = json!([
        {"name": "Ana Torres", "document_number": "DOC-311"}
    ]);
    let created = parse_body(app.post("/api/v1/requests", payload).await).await;
    let id = created["id"].as_str().unwrap();

    let ana = app.state.guest_repo.find_by_document("DOC-311").await.unwrap().unwrap();

    // Simulate a guest row missing at issuance time.
    let mut conn = app.pool.acquire().await.unwrap();
    sqlx::query("PRAGMA foreign_keys = OFF").execute(&mut *conn).await.unwrap();
    sqlx::query("DELETE FROM guests WHERE id = ?")
        .bind(&ana.id)
        .execute(&mut *conn)
        .await
        .unwrap();

    let res = app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The request is back in its reviewable state, nothing half-issued.
    let current = parse_body(app.get(&format!("/api/v1/requests/{}", id)).await).await;
    assert_eq!(current["status"], "PENDING");
    assert!(current["approved_at"].is_null());

    // Restore the guest; the retry issues one complete batch.
    sqlx::query(
        "INSERT INTO guests (id, name, document_number, attendance_count, loyalty_points, created_at) VALUES (?, ?, ?, 0, 0, ?)"
    )
        .bind(&ana.id).bind("Ana Torres").bind("DOC-311").bind(ana.created_at)
        .execute(&mut *conn)
        .await
        .unwrap();
    drop(conn);

    let res = app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["tickets"]["tickets"].as_array().unwrap().len(), 2);

    let download = parse_body(app.get(&format!("/api/v1/requests/{}/tickets", id)).await).await;
    assert_eq!(download["tickets"]["tickets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_real_document_with_anon_prefix_renders_named() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, true, 0).await;

    // A real document that happens to share the placeholder prefix.
    let created = parse_body(
        app.post("/api/v1/requests", request_payload(&venue, &venue.table1_id, "ANON-1234"))
            .await,
    )
    .await;
    let id = created["id"].as_str().unwrap();

    app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await;

    let body = parse_body(app.get(&format!("/api/v1/requests/{}/tickets", id)).await).await;
    let tickets = body["tickets"]["tickets"].as_array().unwrap();
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["holder"], "Carlos Mendez");
    assert_eq!(tickets[0]["document_number"], "ANON-1234");
}

#[tokio::test]
async fn test_codes_unique_across_requests() {
    let app = TestApp::new().await;
    let venue = seed_venue(&app, false, 0).await;

    let mut all_codes = HashSet::new();
    for (table_id, document) in [(&venue.table1_id, "DOC-308"), (&venue.table2_id, "DOC-309")] {
        let created = parse_body(
            app.post("/api/v1/requests", request_payload(&venue, table_id, document))
                .await,
        )
        .await;
        let id = created["id"].as_str().unwrap();

        let body = parse_body(
            app.post(&format!("/api/v1/requests/{}/approve", id), json!({})).await,
        )
        .await;
        for ticket in body["tickets"]["tickets"].as_array().unwrap() {
            assert!(all_codes.insert(ticket["code"].as_str().unwrap().to_string()));
        }
    }
    assert_eq!(all_codes.len(), 8);
}
