//! Payment handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use domain::{NewPayment, Payment, PaymentChanges, Requester};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::types::{ApiResponse, Created, PaymentFilter};

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_payments).post(create_payment))
        .route(
            "/:id",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(PaymentFilter),
    responses(
        (status = 200, description = "Matching payments", body = Vec<Payment>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_payments(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Query(filter): Query<PaymentFilter>,
) -> AppResult<Json<ApiResponse<Vec<Payment>>>> {
    let payments = state.services.payments().list(requester, filter).await?;
    Ok(Json(ApiResponse::list(payments)))
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn get_payment(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let payment = state.services.payments().get(requester, id).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Record a monthly payment for a tenant
#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = NewPayment,
    responses(
        (status = 201, description = "Payment recorded", body = Payment),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Tenant not found"),
        (status = 409, description = "A payment for this month already exists")
    )
)]
pub async fn create_payment(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<NewPayment>,
) -> AppResult<Created<Payment>> {
    let payment = state.services.payments().create(requester, input).await?;
    Ok(Created::with_message(payment, "Payment recorded successfully"))
}

#[utoipa::path(
    put,
    path = "/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    request_body = PaymentChanges,
    responses(
        (status = 200, description = "Payment updated", body = Payment),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn update_payment(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(changes): ValidatedJson<PaymentChanges>,
) -> AppResult<Json<ApiResponse<Payment>>> {
    let payment = state
        .services
        .payments()
        .update(requester, id, changes)
        .await?;
    Ok(Json(ApiResponse::success(payment)))
}

#[utoipa::path(
    delete,
    path = "/payments/{id}",
    tag = "Payments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Payment ID")),
    responses(
        (status = 200, description = "Payment deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn delete_payment(
    Extension(requester): Extension<Requester>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.payments().delete(requester, id).await?;
    Ok(Json(ApiResponse::message("Payment deleted successfully")))
}
