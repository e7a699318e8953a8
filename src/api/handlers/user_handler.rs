//! Account administration.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use domain::UserResponse;

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::ApiResponse;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:id", get(get_user))
}

/// Every account (admin only)
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    require_admin(&current_user)?;
    let users = state.services.users().list_users().await?;

    Ok(Json(ApiResponse::list(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "The account", body = UserResponse),
        (status = 403, description = "Admin only"),
        (status = 404, description = "No such user")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    require_admin(&current_user)?;
    let user = state.services.users().get_user(id).await?;
    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}
