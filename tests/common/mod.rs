//! Shared harness: the full router over the in-memory store.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pg_nexus::api::{create_router, AppState};
use pg_nexus::config::Config;
use pg_nexus::infra::{LocalStorage, LogMailer, LogNotifier};
use pg_nexus::services::{Collaborators, ServiceContainer, Services};

pub const PASSWORD: &str = "secret123";
pub const ADMIN_EMAIL: &str = "admin@pgnexus.test";

pub struct TestApp {
    pub router: Router,
    pub services: Services,
}

/// A signed-in account
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut config = Config::for_tests();
        config.upload_dir = std::env::temp_dir().join(format!("pg-nexus-it-{}", Uuid::new_v4()));

        let collaborators = Collaborators {
            mailer: Arc::new(LogMailer::new(config.email_from.clone())),
            notifier: Arc::new(LogNotifier),
            storage: Arc::new(LocalStorage::new(
                config.upload_dir.clone(),
                config.public_base_url.clone(),
            )),
        };
        let services = Services::in_memory(config.clone(), collaborators);
        services
            .users()
            .ensure_admin("Admin".to_string(), ADMIN_EMAIL.to_string(), PASSWORD.to_string())
            .await
            .unwrap();

        let state = AppState::new(Arc::new(services.clone()), config);
        Self {
            router: create_router(state),
            services,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str, session: &Session) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&session.token), None).await
    }

    pub async fn post(&self, uri: &str, session: &Session, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&session.token), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, session: &Session, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&session.token), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, session: &Session) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(&session.token), None)
            .await
    }

    /// Register an owner or tenant and return its session.
    pub async fn register(&self, role: &str, email: &str) -> Session {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/register",
                None,
                Some(json!({
                    "name": "Test User",
                    "email": email,
                    "password": PASSWORD,
                    "role": role
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        session_from(&body)
    }

    pub async fn admin(&self) -> Session {
        let (status, body) = self
            .request(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": ADMIN_EMAIL, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
        session_from(&body)
    }

    pub async fn create_property(&self, owner: &Session, name: &str) -> Uuid {
        let (status, body) = self.post("/properties", owner, property_body(name)).await;
        assert_eq!(status, StatusCode::CREATED, "create property failed: {}", body);
        id_of(&body)
    }

    pub async fn create_room(&self, owner: &Session, property_id: Uuid, number: &str, capacity: u32) -> Uuid {
        let (status, body) = self
            .post(
                "/rooms",
                owner,
                json!({
                    "property_id": property_id,
                    "room_number": number,
                    "room_type": "double",
                    "capacity": capacity,
                    "rent": 8000
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create room failed: {}", body);
        id_of(&body)
    }

    /// Place `resident` in `room_id`; returns the raw response.
    pub async fn place(&self, owner: &Session, resident: &Session, room_id: Uuid, status: &str) -> (StatusCode, Value) {
        self.post("/tenants", owner, tenant_body(resident.user_id, room_id, status))
            .await
    }

    pub async fn room(&self, session: &Session, room_id: Uuid) -> Value {
        let (status, body) = self.get(&format!("/rooms/{}", room_id), session).await;
        assert_eq!(status, StatusCode::OK, "get room failed: {}", body);
        body["data"].clone()
    }

    pub async fn property(&self, session: &Session, property_id: Uuid) -> Value {
        let (status, body) = self
            .get(&format!("/properties/{}", property_id), session)
            .await;
        assert_eq!(status, StatusCode::OK, "get property failed: {}", body);
        body["data"].clone()
    }
}

pub fn session_from(body: &Value) -> Session {
    Session {
        user_id: body["data"]["user"]["id"]
            .as_str()
            .and_then(|id| id.parse().ok())
            .expect("session carries the user id"),
        token: body["data"]["access_token"]
            .as_str()
            .expect("session carries an access token")
            .to_string(),
    }
}

pub fn id_of(body: &Value) -> Uuid {
    body["data"]["id"]
        .as_str()
        .and_then(|id| id.parse().ok())
        .expect("response carries an id")
}

pub fn property_body(name: &str) -> Value {
    json!({
        "name": name,
        "property_type": "co-living",
        "address": {
            "street": "12 MG Road",
            "city": "Bengaluru",
            "state": "Karnataka",
            "pincode": "560001"
        },
        "contact": {
            "person_name": "Ravi",
            "phone": "9876543210"
        }
    })
}

pub fn tenant_body(user_id: Uuid, room_id: Uuid, status: &str) -> Value {
    json!({
        "user_id": user_id,
        "room_id": room_id,
        "full_name": "Resident",
        "email": "resident@example.com",
        "phone": "9123456780",
        "move_in_date": "2024-01-01",
        "rent_amount": 8000,
        "status": status
    })
}
