//! Dashboard handler.

use axum::{
    extract::{Extension, State},
    response::Json,
    routing::get,
    Router,
};

use domain::Requester;

use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::DashboardStats;
use crate::types::ApiResponse;

/// Create dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/stats", get(stats))
}

/// Role-dependent snapshot: portfolio counters for admins and owners, the
/// tenant's own stay for tenants
#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "Dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn stats(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<DashboardStats>>> {
    let stats = state.services.dashboard().stats(requester).await?;
    Ok(Json(ApiResponse::success(stats)))
}
