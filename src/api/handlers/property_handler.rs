//! Property handlers.

use axum::{
    extract::{DefaultBodyLimit, Extension, Multipart, Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{NewProperty, PropertyChanges, PropertyView, Requester};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::MAX_IMAGES_PER_UPLOAD;
use crate::errors::{AppError, AppResult};
use crate::infra::Upload;
use crate::types::{ApiResponse, Created, PropertyFilter};

/// Multipart body of an image upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImagesUpload {
    /// One or more image files
    #[schema(value_type = Vec<String>, format = Binary)]
    images: Vec<Vec<u8>>,
}

/// Create property routes. `max_upload_bytes` bounds a single image.
pub fn property_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(list_properties).post(create_property))
        .route(
            "/:id",
            get(get_property).put(update_property).delete(delete_property),
        )
        .route(
            "/:id/images",
            post(upload_images).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_mul(MAX_IMAGES_PER_UPLOAD),
            )),
        )
}

/// List properties (owners only see their own)
#[utoipa::path(
    get,
    path = "/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(PropertyFilter),
    responses(
        (status = 200, description = "Matching properties", body = Vec<PropertyView>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_properties(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<PropertyFilter>,
) -> AppResult<Json<ApiResponse<Vec<PropertyView>>>> {
    let properties = state.services.properties().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(properties)))
}

#[utoipa::path(
    get,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property", body = PropertyView),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn get_property(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PropertyView>>> {
    let property = state.services.properties().get(requester, id).await?;
    Ok(Json(ApiResponse::success(property)))
}

/// Create a property owned by the requester (owners and admins)
#[utoipa::path(
    post,
    path = "/properties",
    tag = "Properties",
    security(("bearer_auth" = [])),
    request_body = NewProperty,
    responses(
        (status = 201, description = "Property created", body = PropertyView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_property(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewProperty>,
) -> AppResult<Created<PropertyView>> {
    let property = state.services.properties().create(requester, input).await?;
    Ok(Created::new(property))
}

#[utoipa::path(
    put,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body = PropertyChanges,
    responses(
        (status = 200, description = "Property updated", body = PropertyView),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn update_property(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<PropertyChanges>,
) -> AppResult<Json<ApiResponse<PropertyView>>> {
    let property = state
        .services
        .properties()
        .update(requester, id, changes)
        .await?;
    Ok(Json(ApiResponse::success(property)))
}

/// Delete a property with its rooms, former tenants and their records
#[utoipa::path(
    delete,
    path = "/properties/{id}",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Property not found"),
        (status = 409, description = "Property still has residents")
    )
)]
pub async fn delete_property(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.properties().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Property deleted successfully")))
}

/// Upload images (multipart field `images`)
#[utoipa::path(
    post,
    path = "/properties/{id}/images",
    tag = "Properties",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Property ID")),
    request_body(
        content = ImagesUpload,
        content_type = "multipart/form-data",
        description = "One or more `images` files"
    ),
    responses(
        (status = 200, description = "Images added", body = PropertyView),
        (status = 400, description = "Missing, oversized or non-image files"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Property not found")
    )
)]
pub async fn upload_images(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<PropertyView>>> {
    let uploads = read_uploads(multipart).await?;
    let property = state
        .services
        .properties()
        .add_images(requester, id, uploads)
        .await?;
    Ok(Json(ApiResponse::with_message(property, "Images uploaded successfully")))
}

/// Collect every file part; parts without a file name are ignored.
async fn read_uploads(mut multipart: Multipart) -> AppResult<Vec<Upload>> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.body_text()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;
        uploads.push(Upload {
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Ok(uploads)
}
