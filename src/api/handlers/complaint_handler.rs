//! Complaint handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use domain::{ComplaintChanges, ComplaintView, NewComplaint, Requester};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, ComplaintFilter, Created};

/// Create complaint routes
pub fn complaint_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_complaints).post(create_complaint))
        .route(
            "/:id",
            get(get_complaint)
                .put(update_complaint)
                .delete(delete_complaint),
        )
}

#[utoipa::path(
    get,
    path = "/complaints",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(ComplaintFilter),
    responses(
        (status = 200, description = "Matching complaints", body = Vec<ComplaintView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_complaints(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<ComplaintFilter>,
) -> AppResult<Json<ApiResponse<Vec<ComplaintView>>>> {
    let complaints = state.services.complaints().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(complaints)))
}

#[utoipa::path(
    get,
    path = "/complaints/{id}",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint", body = ComplaintView),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn get_complaint(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ComplaintView>>> {
    let complaint = state.services.complaints().get(requester, id).await?;
    Ok(Json(ApiResponse::success(complaint)))
}

/// File a complaint (tenants for themselves, managers for a named tenant)
#[utoipa::path(
    post,
    path = "/complaints",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    request_body = NewComplaint,
    responses(
        (status = 201, description = "Complaint filed", body = ComplaintView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant profile not found")
    )
)]
pub async fn create_complaint(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewComplaint>,
) -> AppResult<Created<ComplaintView>> {
    let complaint = state.services.complaints().create(requester, input).await?;
    Ok(Created::with_message(complaint, "Complaint submitted successfully"))
}

#[utoipa::path(
    put,
    path = "/complaints/{id}",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Complaint ID")),
    request_body = ComplaintChanges,
    responses(
        (status = 200, description = "Complaint updated", body = ComplaintView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn update_complaint(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<ComplaintChanges>,
) -> AppResult<Json<ApiResponse<ComplaintView>>> {
    let complaint = state
        .services
        .complaints()
        .update(requester, id, changes)
        .await?;
    Ok(Json(ApiResponse::success(complaint)))
}

#[utoipa::path(
    delete,
    path = "/complaints/{id}",
    tag = "Complaints",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Complaint ID")),
    responses(
        (status = 200, description = "Complaint deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Complaint not found")
    )
)]
pub async fn delete_complaint(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.complaints().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Complaint deleted successfully")))
}
