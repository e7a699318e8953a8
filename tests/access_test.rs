//! Ownership rules and the payment, complaint and notice flows over HTTP.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{id_of, property_body, Session, TestApp};

struct Portfolio {
    owner: Session,
    resident: Session,
    property_id: Uuid,
    room_id: Uuid,
    tenant_id: Uuid,
}

async fn portfolio(app: &TestApp) -> Portfolio {
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;
    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "101", 2).await;
    let (status, body) = app.place(&owner, &resident, room_id, "active").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    Portfolio {
        owner,
        resident,
        property_id,
        room_id,
        tenant_id: id_of(&body),
    }
}

async fn record_rent(app: &TestApp, p: &Portfolio, month: &str) -> (StatusCode, serde_json::Value) {
    app.post(
        "/payments",
        &p.owner,
        json!({
            "tenant_id": p.tenant_id,
            "month": month,
            "amount": 10000,
            "late_fee": 500,
            "due_date": "2024-01-05"
        }),
    )
    .await
}

#[tokio::test]
async fn test_other_owner_is_forbidden() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let rival = app.register("owner", "rival@example.com").await;

    let (status, _) = app.get(&format!("/properties/{}", p.property_id), &rival).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .put(
            &format!("/rooms/{}", p.room_id),
            &rival,
            json!({ "rent": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .post(
            "/rooms",
            &rival,
            json!({
                "property_id": p.property_id,
                "room_number": "999",
                "room_type": "single",
                "capacity": 1,
                "rent": 5000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&format!("/tenants/{}", p.tenant_id), &rival).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Owners only list their own properties
    let (status, body) = app.get("/properties", &rival).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_admin_manages_everything() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let admin = app.admin().await;

    let (status, _) = app.get(&format!("/properties/{}", p.property_id), &admin).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/users", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let (status, body) = app.get(&format!("/users/{}", p.owner.user_id), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], "owner");

    let (status, _) = app.get(&format!("/users/{}", p.owner.user_id), &p.owner).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/users", &p.owner).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tenant_sees_only_own_records() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let neighbour = app.register("tenant", "neighbour@example.com").await;
    let (_, body) = app.place(&p.owner, &neighbour, p.room_id, "active").await;
    let neighbour_tenant = id_of(&body);

    let (status, body) = app.get(&format!("/tenants/{}", p.tenant_id), &p.resident).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], p.resident.user_id.to_string());

    let (status, _) = app
        .get(&format!("/tenants/{}", neighbour_tenant), &p.resident)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/tenants", &p.resident).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    // Rooms are managed by owners only
    let (status, _) = app.get(&format!("/rooms/{}", p.room_id), &p.resident).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.post("/properties", &p.resident, property_body("Mine")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_tenant_cannot_change_own_placement() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;

    let (status, _) = app
        .put(
            &format!("/tenants/{}", p.tenant_id),
            &p.resident,
            json!({ "status": "inactive" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/tenants/{}", p.tenant_id),
            &p.resident,
            json!({ "alternate_phone": "9000000001" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_payment_total_and_overdue_status() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;

    let (status, body) = record_rent(&app, &p, "2024-01").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["total_amount"], 10500);
    assert_eq!(body["data"]["status"], "overdue");
    assert_eq!(body["data"]["property_id"], p.property_id.to_string());

    let (status, _) = record_rent(&app, &p, "2024-01").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = record_rent(&app, &p, "2024-13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let payment_id = id_of(&body);
    let (status, body) = app
        .put(
            &format!("/payments/{}", payment_id),
            &p.owner,
            json!({ "status": "paid", "discount": 500 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["total_amount"], 10000);
    assert_eq!(body["data"]["status"], "paid");
    assert!(body["data"]["payment_date"].is_string());
}

#[tokio::test]
async fn test_tenant_may_only_report_remittance() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let (_, body) = record_rent(&app, &p, "2024-02").await;
    let payment_id = id_of(&body);

    let (status, _) = app
        .put(
            &format!("/payments/{}", payment_id),
            &p.resident,
            json!({ "amount": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .put(
            &format!("/payments/{}", payment_id),
            &p.resident,
            json!({ "payment_method": "upi", "transaction_id": "UPI-1234" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["transaction_id"], "UPI-1234");

    let (status, _) = app
        .post(
            "/payments",
            &p.resident,
            json!({
                "tenant_id": p.tenant_id,
                "month": "2024-03",
                "amount": 1,
                "due_date": "2024-03-05"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.get("/payments", &p.resident).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_tenant_cannot_delete_own_records() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let (_, body) = record_rent(&app, &p, "2024-04").await;
    let payment_id = id_of(&body);
    let (status, body) = app
        .post(
            "/complaints",
            &p.resident,
            json!({
                "title": "Noisy fan",
                "description": "The ceiling fan rattles",
                "category": "electrical"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let complaint_id = id_of(&body);

    // Reads stay open to the tenant
    let (status, _) = app.get(&format!("/tenants/{}", p.tenant_id), &p.resident).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/payments/{}", payment_id), &p.resident).await;
    assert_eq!(status, StatusCode::OK);

    for uri in [
        format!("/tenants/{}", p.tenant_id),
        format!("/payments/{}", payment_id),
        format!("/complaints/{}", complaint_id),
    ] {
        let (status, body) = app.delete(&uri, &p.resident).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}: {}", uri, body);
    }

    // The bed is still taken and the records survive
    assert_eq!(app.room(&p.owner, p.room_id).await["current_occupancy"], 1);
    let (status, _) = app.get(&format!("/payments/{}", payment_id), &p.owner).await;
    assert_eq!(status, StatusCode::OK);

    // A tenant may still close its own complaint
    let (status, body) = app
        .put(
            &format!("/complaints/{}", complaint_id),
            &p.resident,
            json!({ "status": "closed" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "closed");
}

#[tokio::test]
async fn test_complaint_timeline_follows_status_changes() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;

    let (status, body) = app
        .post(
            "/complaints",
            &p.resident,
            json!({
                "title": "Leaking tap",
                "description": "The bathroom tap leaks all night",
                "category": "plumbing"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["status"], "open");
    assert_eq!(body["data"]["tenant_id"], p.tenant_id.to_string());
    assert_eq!(body["data"]["timeline"].as_array().map(Vec::len), Some(1));
    let complaint_id = id_of(&body);

    // Only the owner progresses a complaint
    let (status, _) = app
        .put(
            &format!("/complaints/{}", complaint_id),
            &p.resident,
            json!({ "status": "resolved" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app
        .put(
            &format!("/complaints/{}", complaint_id),
            &p.owner,
            json!({ "status": "in-progress", "comment": "Plumber booked" }),
        )
        .await;
    assert_eq!(body["data"]["timeline"].as_array().map(Vec::len), Some(2));

    let (status, body) = app
        .put(
            &format!("/complaints/{}", complaint_id),
            &p.owner,
            json!({ "status": "resolved", "comment": "Washer replaced" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let timeline = body["data"]["timeline"].as_array().cloned().unwrap_or_default();
    assert_eq!(timeline.len(), 3);
    assert_eq!(timeline[2]["status"], "resolved");
    assert_eq!(timeline[2]["comment"], "Washer replaced");
    assert!(body["data"]["resolved_at"].is_string());
    assert!(body["data"]["resolution_time_hours"].is_number());

    // A repeated status adds nothing
    let (_, body) = app
        .put(
            &format!("/complaints/{}", complaint_id),
            &p.owner,
            json!({ "status": "resolved" }),
        )
        .await;
    assert_eq!(body["data"]["timeline"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn test_tenant_without_residence_cannot_file_complaint() {
    let app = TestApp::new().await;
    let drifter = app.register("tenant", "drifter@example.com").await;

    let (status, _) = app
        .post(
            "/complaints",
            &drifter,
            json!({
                "title": "No wifi",
                "description": "Nothing works",
                "category": "wifi"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_notices_are_scoped_and_tracked_per_reader() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    let outsider = app.register("tenant", "outsider@example.com").await;

    let (status, body) = app
        .post(
            "/notices",
            &p.owner,
            json!({
                "property_id": p.property_id,
                "title": "Water supply interruption",
                "content": "No water between 10am and 2pm on Sunday",
                "priority": "high"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let notice_id = id_of(&body);

    app.post(
        "/notices",
        &p.owner,
        json!({
            "property_id": p.property_id,
            "title": "Upcoming renovation",
            "content": "Details to follow",
            "status": "draft"
        }),
    )
    .await;

    // Drafts stay hidden from residents
    let (_, body) = app.get("/notices", &p.resident).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], notice_id.to_string());

    let (status, _) = app.get(&format!("/notices/{}", notice_id), &outsider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let uri = format!("/notices/{}/read", notice_id);
    let (status, body) = app.post(&uri, &p.resident, json!({})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["read_by"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.post(&uri, &p.resident, json!({})).await;
    assert_eq!(body["data"]["read_by"].as_array().map(Vec::len), Some(1));

    // Tenants cannot publish
    let (status, _) = app
        .post(
            "/notices",
            &p.resident,
            json!({ "title": "Party", "content": "Tonight" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_global_notice_reaches_every_tenant() {
    let app = TestApp::new().await;
    let admin = app.admin().await;
    let drifter = app.register("tenant", "drifter@example.com").await;

    let (status, body) = app
        .post(
            "/notices",
            &admin,
            json!({ "title": "Holiday", "content": "Office closed on Monday" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (_, body) = app.get("/notices", &drifter).await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn test_tenant_dashboard_shows_own_stay() {
    let app = TestApp::new().await;
    let p = portfolio(&app).await;
    record_rent(&app, &p, "2024-01").await;

    let (status, body) = app.get("/dashboard/stats", &p.resident).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tenant"]["id"], p.tenant_id.to_string());
    assert_eq!(body["data"]["room"]["room_number"], "101");
    assert_eq!(body["data"]["payments"]["overdue"], 1);
}
