//! Application route configuration.

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    auth_routes, complaint_routes, dashboard_routes, notice_routes, payment_routes,
    property_routes, room_routes, tenant_routes, user_routes,
};
use super::middleware::{auth_middleware, rate_limit_auth_middleware, rate_limit_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::APP_DISPLAY_NAME;
use crate::errors::AppError;
use crate::types::ApiResponse;

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        // Health check endpoints (no rate limiting)
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Locally stored uploads
        .nest_service("/uploads", ServeDir::new(upload_dir))
        // Authentication routes (stricter rate limiting)
        .nest(
            "/auth",
            auth_routes(state.clone()).route_layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit_auth_middleware,
            )),
        )
        // Protected resource routes (require JWT + general rate limiting)
        .nest("/users", protected(user_routes(), &state))
        .nest("/properties", protected(property_routes(max_upload_bytes), &state))
        .nest("/rooms", protected(room_routes(), &state))
        .nest("/tenants", protected(tenant_routes(), &state))
        .nest("/payments", protected(payment_routes(), &state))
        .nest("/complaints", protected(complaint_routes(), &state))
        .nest("/notices", protected(notice_routes(), &state))
        .nest("/dashboard", protected(dashboard_routes(), &state))
        .fallback(not_found)
        // Global middleware
        .layer(cors_layer(&state.config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn protected(routes: Router<AppState>, state: &AppState) -> Router<AppState> {
    routes
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
}

/// Credentialed CORS for the configured frontend origin.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    match HeaderValue::from_str(frontend_url.trim_end_matches('/')) {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, cross-origin requests disabled");
            cors
        }
    }
}

/// Root endpoint
async fn root() -> Json<ApiResponse<()>> {
    Json(ApiResponse::message(format!("{} API", APP_DISPLAY_NAME)))
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    success: bool,
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
    redis: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ServiceStatus {
    fn healthy() -> Self {
        Self {
            status: "healthy",
            error: None,
        }
    }

    fn unhealthy(error: impl ToString) -> Self {
        Self {
            status: "unhealthy",
            error: Some(error.to_string()),
        }
    }

    /// Backend not configured for this process
    fn disabled() -> Self {
        Self {
            status: "disabled",
            error: None,
        }
    }

    fn is_unhealthy(&self) -> bool {
        self.status == "unhealthy"
    }
}

/// Health check endpoint with database and Redis connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.database.as_ref() {
        Some(database) => match database.ping().await {
            Ok(_) => ServiceStatus::healthy(),
            Err(e) => ServiceStatus::unhealthy(e),
        },
        None => ServiceStatus::disabled(),
    };

    let redis_status = match state.cache.as_ref() {
        Some(cache) => match cache.ping().await {
            Ok(_) => ServiceStatus::healthy(),
            Err(e) => ServiceStatus::unhealthy(e),
        },
        None => ServiceStatus::disabled(),
    };

    let all_healthy = !db_status.is_unhealthy() && !redis_status.is_unhealthy();

    let response = HealthResponse {
        success: all_healthy,
        status: if all_healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: db_status,
            redis: redis_status,
        },
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
