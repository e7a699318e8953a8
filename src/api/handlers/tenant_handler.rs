//! Tenant handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use domain::{NewTenant, Requester, TenantChanges, TenantView};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, TenantFilter};

/// Create tenant routes
pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tenants).post(create_tenant))
        .route(
            "/:id",
            get(get_tenant).put(update_tenant).delete(delete_tenant),
        )
}

/// List tenants (tenants only see their own records)
#[utoipa::path(
    get,
    path = "/tenants",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    params(TenantFilter),
    responses(
        (status = 200, description = "Matching tenants", body = Vec<TenantView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_tenants(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<TenantFilter>,
) -> AppResult<Json<ApiResponse<Vec<TenantView>>>> {
    let tenants = state.services.tenants().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(tenants)))
}

#[utoipa::path(
    get,
    path = "/tenants/{id}",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant", body = TenantView),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn get_tenant(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TenantView>>> {
    let tenant = state.services.tenants().get(requester, id).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

/// Place a registered user in a room
#[utoipa::path(
    post,
    path = "/tenants",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    request_body = NewTenant,
    responses(
        (status = 201, description = "Tenant created", body = TenantView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Room or user not found"),
        (status = 409, description = "Room is full")
    )
)]
pub async fn create_tenant(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewTenant>,
) -> AppResult<Created<TenantView>> {
    let tenant = state.services.tenants().create(requester, input).await?;
    Ok(Created::with_message(tenant, "Tenant created successfully"))
}

/// Update a tenant; a new `room_id` moves the tenant
#[utoipa::path(
    put,
    path = "/tenants/{id}",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tenant ID")),
    request_body = TenantChanges,
    responses(
        (status = 200, description = "Tenant updated", body = TenantView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant or room not found"),
        (status = 409, description = "Target room is full")
    )
)]
pub async fn update_tenant(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<TenantChanges>,
) -> AppResult<Json<ApiResponse<TenantView>>> {
    let tenant = state.services.tenants().update(requester, id, changes).await?;
    Ok(Json(ApiResponse::success(tenant)))
}

#[utoipa::path(
    delete,
    path = "/tenants/{id}",
    tag = "Tenants",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Tenant ID")),
    responses(
        (status = 200, description = "Tenant deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant not found")
    )
)]
pub async fn delete_tenant(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.tenants().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Tenant deleted successfully")))
}
