//! Notice handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use uuid::Uuid;

use domain::{NewNotice, Notice, NoticeChanges, Requester};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, NoticeFilter};

/// Create notice routes
pub fn notice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notices).post(create_notice))
        .route(
            "/:id",
            get(get_notice).put(update_notice).delete(delete_notice),
        )
        .route("/:id/read", post(mark_notice_read))
}

/// Currently valid notices, highest priority first
#[utoipa::path(
    get,
    path = "/notices",
    tag = "Notices",
    security(("bearer_auth" = [])),
    params(NoticeFilter),
    responses(
        (status = 200, description = "Visible notices", body = Vec<Notice>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_notices(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<NoticeFilter>,
) -> AppResult<Json<ApiResponse<Vec<Notice>>>> {
    let notices = state.services.notices().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(notices)))
}

#[utoipa::path(
    get,
    path = "/notices/{id}",
    tag = "Notices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice", body = Notice),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notice not found")
    )
)]
pub async fn get_notice(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notice>>> {
    let notice = state.services.notices().get(requester, id).await?;
    Ok(Json(ApiResponse::success(notice)))
}

/// Publish a global or property notice (owners and admins)
#[utoipa::path(
    post,
    path = "/notices",
    tag = "Notices",
    security(("bearer_auth" = [])),
    request_body = NewNotice,
    responses(
        (status = 201, description = "Notice created", body = Notice),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_notice(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewNotice>,
) -> AppResult<Created<Notice>> {
    let notice = state.services.notices().create(requester, input).await?;
    Ok(Created::with_message(notice, "Notice created successfully"))
}

#[utoipa::path(
    put,
    path = "/notices/{id}",
    tag = "Notices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notice ID")),
    request_body = NoticeChanges,
    responses(
        (status = 200, description = "Notice updated", body = Notice),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notice not found")
    )
)]
pub async fn update_notice(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<NoticeChanges>,
) -> AppResult<Json<ApiResponse<Notice>>> {
    let notice = state.services.notices().update(requester, id, changes).await?;
    Ok(Json(ApiResponse::success(notice)))
}

#[utoipa::path(
    delete,
    path = "/notices/{id}",
    tag = "Notices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notice not found")
    )
)]
pub async fn delete_notice(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.notices().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Notice deleted successfully")))
}

/// Mark a notice as read by the requester
#[utoipa::path(
    post,
    path = "/notices/{id}/read",
    tag = "Notices",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Notice ID")),
    responses(
        (status = 200, description = "Notice marked as read", body = Notice),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notice not found")
    )
)]
pub async fn mark_notice_read(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Notice>>> {
    let notice = state.services.notices().mark_read(requester, id).await?;
    Ok(Json(ApiResponse::with_message(notice, "Notice marked as read")))
}
