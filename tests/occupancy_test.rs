//! Room occupancy and property counters driven through the HTTP API.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{id_of, TestApp};

#[tokio::test]
async fn test_tenant_lifecycle_drives_room_and_property_counters() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let first = app.register("tenant", "first@example.com").await;
    let second = app.register("tenant", "second@example.com").await;

    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "101", 2).await;

    let property = app.property(&owner, property_id).await;
    assert_eq!(property["total_rooms"], 1);
    assert_eq!(property["occupied_rooms"], 0);

    let (status, body) = app.place(&owner, &first, room_id, "active").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let first_tenant = id_of(&body);

    let room = app.room(&owner, room_id).await;
    assert_eq!(room["current_occupancy"], 1);
    assert_eq!(room["status"], "occupied");
    assert_eq!(room["is_available"], false);
    assert_eq!(app.property(&owner, property_id).await["occupied_rooms"], 1);

    let (status, body) = app.place(&owner, &second, room_id, "active").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let second_tenant = id_of(&body);

    assert_eq!(app.room(&owner, room_id).await["current_occupancy"], 2);

    let (status, _) = app
        .put(
            &format!("/tenants/{}", first_tenant),
            &owner,
            json!({ "status": "inactive" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let room = app.room(&owner, room_id).await;
    assert_eq!(room["current_occupancy"], 1);
    assert_eq!(room["status"], "occupied");

    let (status, _) = app
        .put(
            &format!("/tenants/{}", second_tenant),
            &owner,
            json!({ "status": "inactive" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let room = app.room(&owner, room_id).await;
    assert_eq!(room["current_occupancy"], 0);
    assert_eq!(room["status"], "available");
    assert_eq!(room["is_available"], true);

    let property = app.property(&owner, property_id).await;
    assert_eq!(property["occupied_rooms"], 0);
    assert_eq!(property["total_rooms"], 1);
}

#[tokio::test]
async fn test_full_room_refuses_another_active_tenant() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;
    let late = app.register("tenant", "late@example.com").await;

    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "A1", 1).await;

    let (status, _) = app.place(&owner, &resident, room_id, "active").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.place(&owner, &late, room_id, "active").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    // An inactive record does not take a bed
    let (status, _) = app.place(&owner, &late, room_id, "inactive").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(app.room(&owner, room_id).await["current_occupancy"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_placements_never_overfill_a_room() {
    let app = Arc::new(TestApp::new().await);
    let owner = app.register("owner", "owner@example.com").await;
    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "201", 2).await;

    let mut residents = Vec::new();
    for i in 0..6 {
        residents.push(app.register("tenant", &format!("rush{}@example.com", i)).await);
    }

    let handles: Vec<_> = residents
        .into_iter()
        .map(|resident| {
            let app = Arc::clone(&app);
            let owner = owner.clone();
            tokio::spawn(async move { app.place(&owner, &resident, room_id, "active").await.0 })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::CREATED => created += 1,
            StatusCode::CONFLICT => {}
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!(created, 2);

    let room = app.room(&owner, room_id).await;
    assert_eq!(room["current_occupancy"], 2);
    assert_eq!(room["status"], "occupied");
    assert_eq!(app.property(&owner, property_id).await["occupied_rooms"], 1);

    let (_, body) = app
        .get(&format!("/tenants?room={}&status=active", room_id), &owner)
        .await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_moving_a_tenant_updates_both_rooms() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;

    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let from = app.create_room(&owner, property_id, "101", 2).await;
    let to = app.create_room(&owner, property_id, "102", 2).await;

    let (_, body) = app.place(&owner, &resident, from, "active").await;
    let tenant_id = id_of(&body);

    let (status, body) = app
        .put(
            &format!("/tenants/{}", tenant_id),
            &owner,
            json!({ "room_id": to }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["room_id"], to.to_string());

    assert_eq!(app.room(&owner, from).await["current_occupancy"], 0);
    assert_eq!(app.room(&owner, from).await["status"], "available");
    assert_eq!(app.room(&owner, to).await["current_occupancy"], 1);
    assert_eq!(app.property(&owner, property_id).await["occupied_rooms"], 1);
}

#[tokio::test]
async fn test_duplicate_room_number_in_property_conflicts() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let property_id = app.create_property(&owner, "Sunrise PG").await;
    app.create_room(&owner, property_id, "101", 2).await;

    let (status, _) = app
        .post(
            "/rooms",
            &owner,
            json!({
                "property_id": property_id,
                "room_number": "101",
                "room_type": "single",
                "capacity": 1,
                "rent": 6000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The same number is free in another property
    let other = app.create_property(&owner, "Moonlight PG").await;
    app.create_room(&owner, other, "101", 2).await;
}

#[tokio::test]
async fn test_room_cannot_be_created_occupied() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let property_id = app.create_property(&owner, "Sunrise PG").await;

    let (status, _) = app
        .post(
            "/rooms",
            &owner,
            json!({
                "property_id": property_id,
                "room_number": "101",
                "room_type": "single",
                "capacity": 1,
                "rent": 6000,
                "status": "occupied"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleting_a_tenant_frees_the_bed() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;

    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "101", 1).await;
    let (_, body) = app.place(&owner, &resident, room_id, "active").await;
    let tenant_id = id_of(&body);

    let (status, _) = app.delete(&format!("/tenants/{}", tenant_id), &owner).await;
    assert_eq!(status, StatusCode::OK);

    let room = app.room(&owner, room_id).await;
    assert_eq!(room["current_occupancy"], 0);
    assert_eq!(room["status"], "available");
}

#[tokio::test]
async fn test_property_delete_refused_while_occupied_then_cascades() {
    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;

    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "101", 2).await;
    let (_, body) = app.place(&owner, &resident, room_id, "active").await;
    let tenant_id = id_of(&body);

    let (status, _) = app
        .delete(&format!("/properties/{}", property_id), &owner)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.put(
        &format!("/tenants/{}", tenant_id),
        &owner,
        json!({ "status": "inactive" }),
    )
    .await;

    let (status, _) = app
        .delete(&format!("/properties/{}", property_id), &owner)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.get(&format!("/rooms/{}", room_id), &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/tenants/{}", tenant_id), &owner).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_owner_dashboard_counts_occupied_rooms() {
    use pg_nexus::services::ServiceContainer;

    let app = TestApp::new().await;
    let owner = app.register("owner", "owner@example.com").await;
    let resident = app.register("tenant", "resident@example.com").await;
    let property_id = app.create_property(&owner, "Sunrise PG").await;
    let room_id = app.create_room(&owner, property_id, "101", 2).await;
    app.place(&owner, &resident, room_id, "active").await;

    // Another owner's portfolio stays out of the counters
    let rival = app.register("owner", "rival@example.com").await;
    let lodger = app.register("tenant", "lodger@example.com").await;
    let rival_property = app.create_property(&rival, "Moonlight PG").await;
    let rival_room = app.create_room(&rival, rival_property, "1", 1).await;
    app.place(&rival, &lodger, rival_room, "active").await;

    let (status, body) = app.get("/dashboard/stats", &owner).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_properties"], 1);
    assert_eq!(body["data"]["total_rooms"], 1);
    assert_eq!(body["data"]["occupied_rooms"], 1);
    assert_eq!(body["data"]["active_tenants"], 1);

    let admin = app.admin().await;
    let (_, body) = app.get("/dashboard/stats", &admin).await;
    assert_eq!(body["data"]["total_properties"], 2);
    assert_eq!(body["data"]["active_tenants"], 2);

    // The container is usable next to the router
    let users = app.services.users();
    assert!(users.get_user(owner.user_id).await.is_ok());
}
