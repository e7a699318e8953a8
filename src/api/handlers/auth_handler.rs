//! Authentication handlers.
//!
//! Successful logins also set the access token as an http-only `token`
//! cookie, which the auth middleware accepts in place of the header.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use domain::UserResponse;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{auth_middleware, CurrentUser};
use crate::api::AppState;
use crate::config::TOKEN_COOKIE_NAME;
use crate::errors::AppResult;
use crate::services::{AuthSession, LoginRequest, RegisterRequest};
use crate::types::ApiResponse;

/// Refresh token exchange request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Password reset link request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
}

/// New password for a reset link
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Create authentication routes
pub fn auth_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route(
            "/reset-password/:token",
            post(reset_password).put(reset_password),
        )
        .route("/verify-email/:token", get(verify_email).post(verify_email))
        .merge(protected)
}

fn session_cookie(state: &AppState, session: &AuthSession) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE_NAME, session.tokens.access_token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.is_production())
        .build()
}

/// Register a new owner or tenant
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin accounts cannot self-register"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state.services.auth().register(payload).await?;
    let jar = jar.add(session_cookie(&state, &session));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(ApiResponse::with_message(
            session,
            "Registration successful. Please check your email to verify your account.",
        )),
    ))
}

/// Login and get a token pair
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthSession),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials, locked or deactivated account")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state.services.auth().login(payload).await?;
    let jar = jar.add(session_cookie(&state, &session));

    Ok((jar, Json(ApiResponse::with_message(session, "Login successful"))))
}

/// Exchange a refresh token for a new token pair
#[utoipa::path(
    post,
    path = "/auth/refresh-token",
    tag = "Authentication",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthSession),
        (status = 401, description = "Invalid, expired or revoked refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state.services.auth().refresh(payload.refresh_token).await?;
    let jar = jar.add(session_cookie(&state, &session));

    Ok((jar, Json(ApiResponse::success(session))))
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "Authentication",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists"),
        (status = 400, description = "Validation error")
    )
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ForgotPasswordRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.services.auth().forgot_password(payload.email).await?;

    Ok(Json(ApiResponse::message(
        "If that email is registered, a password reset link has been sent",
    )))
}

/// Set a new password with a reset token
#[utoipa::path(
    post,
    path = "/auth/reset-password/{token}",
    tag = "Authentication",
    params(("token" = String, Path, description = "Password reset token")),
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset, signed in", body = AuthSession),
        (status = 400, description = "Invalid or expired reset token")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    jar: CookieJar,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<AuthSession>>)> {
    let session = state
        .services
        .auth()
        .reset_password(token, payload.password)
        .await?;
    let jar = jar.add(session_cookie(&state, &session));

    Ok((
        jar,
        Json(ApiResponse::with_message(session, "Password reset successful")),
    ))
}

/// Confirm an email address
#[utoipa::path(
    get,
    path = "/auth/verify-email/{token}",
    tag = "Authentication",
    params(("token" = String, Path, description = "Email verification token")),
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid or expired verification token")
    )
)]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.auth().verify_email(token).await?;

    Ok(Json(ApiResponse::with_message(
        UserResponse::from(user),
        "Email verified successfully",
    )))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    let user = state.services.users().get_user(current_user.id).await?;

    Ok(Json(ApiResponse::success(UserResponse::from(user))))
}

/// Revoke the refresh token and clear the cookie
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<()>>)> {
    state.services.auth().logout(current_user.id).await?;
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE_NAME).path("/"));

    Ok((jar, Json(ApiResponse::message("Logged out successfully"))))
}
