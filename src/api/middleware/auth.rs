//! JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use domain::{Requester, User, UserRole};

use crate::api::AppState;
use crate::config::{BEARER_TOKEN_PREFIX, TOKEN_COOKIE_NAME};
use crate::errors::AppError;

/// Authenticated user resolved from the access token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Identity passed to the services
    pub fn requester(&self) -> Requester {
        Requester::new(self.id, self.role)
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Access token from the `Authorization: Bearer` header, else the `token` cookie.
fn bearer_token(request: &Request) -> Option<String> {
    let from_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(request.headers())
            .get(TOKEN_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    })
}

/// JWT authentication middleware.
///
/// Validates the access token, loads the user (rejecting deactivated
/// accounts) and injects both the `CurrentUser` and its `Requester` into the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)
        .ok_or_else(|| AppError::unauthorized("Not authorized to access this route"))?;

    let user = state.services.auth().authenticate(token).await?;
    let current_user = CurrentUser::from(&user);

    request.extensions_mut().insert(current_user.requester());
    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header: Option<&str>, cookie: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(AUTHORIZATION, value);
        }
        if let Some(value) = cookie {
            builder = builder.header("cookie", value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_header_wins_over_cookie() {
        let request = request_with(Some("Bearer from-header"), Some("token=from-cookie"));
        assert_eq!(bearer_token(&request).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_cookie_fallback() {
        let request = request_with(None, Some("theme=dark; token=from-cookie"));
        assert_eq!(bearer_token(&request).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_missing_or_malformed_token() {
        assert!(bearer_token(&request_with(None, None)).is_none());
        assert!(bearer_token(&request_with(Some("Basic abc"), None)).is_none());
        assert!(bearer_token(&request_with(None, Some("token="))).is_none());
    }

    #[test]
    fn test_require_admin() {
        let mut user = CurrentUser {
            id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
            role: UserRole::Owner,
        };
        assert!(matches!(require_admin(&user), Err(AppError::Forbidden(_))));
        user.role = UserRole::Admin;
        assert!(require_admin(&user).is_ok());
    }
}
