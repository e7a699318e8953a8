//! Room handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use domain::{NewRoom, Requester, RoomChanges, RoomView};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, RoomFilter};

/// Create room routes
pub fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/:id", get(get_room).put(update_room).delete(delete_room))
}

#[utoipa::path(
    get,
    path = "/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(RoomFilter),
    responses(
        (status = 200, description = "Matching rooms", body = Vec<RoomView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_rooms(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<RoomFilter>,
) -> AppResult<Json<ApiResponse<Vec<RoomView>>>> {
    let rooms = state.services.rooms().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(rooms)))
}

#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room", body = RoomView),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RoomView>>> {
    let room = state.services.rooms().get(requester, id).await?;
    Ok(Json(ApiResponse::success(room)))
}

/// Add a room to a property the requester manages
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    request_body = NewRoom,
    responses(
        (status = 201, description = "Room created", body = RoomView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Room number already used in the property")
    )
)]
pub async fn create_room(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewRoom>,
) -> AppResult<Created<RoomView>> {
    let room = state.services.rooms().create(requester, input).await?;
    Ok(Created::new(room))
}

#[utoipa::path(
    put,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    request_body = RoomChanges,
    responses(
        (status = 200, description = "Room updated", body = RoomView),
        (status = 400, description = "Validation error, including capacity below occupancy"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room number already used in the property")
    )
)]
pub async fn update_room(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<RoomChanges>,
) -> AppResult<Json<ApiResponse<RoomView>>> {
    let room = state.services.rooms().update(requester, id, changes).await?;
    Ok(Json(ApiResponse::success(room)))
}

#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "Rooms",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Room not found"),
        (status = 409, description = "Room still has residents")
    )
)]
pub async fn delete_room(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.rooms().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Room deleted successfully")))
}
