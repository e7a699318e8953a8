//! Authentication service - Handles user authentication and authorization.
//!
//! DDD: Uses domain Password value object for hashing.
//! DDD: Uses Unit of Work for repository access.
//!
//! Access tokens are short HS256 JWTs. Refresh, password-reset and
//! email-verification tokens are signed with a separate secret and carry a
//! `purpose` plus a nonce that must match the one stored on the user, which
//! makes each of them single-use and revocable.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use domain::{
    Password, User, UserResponse, UserRole, EMAIL_VERIFICATION_TTL_HOURS,
    PASSWORD_RESET_TTL_MINUTES,
};

use crate::config::{
    Config, PURPOSE_EMAIL_VERIFICATION, PURPOSE_PASSWORD_RESET, SECONDS_PER_HOUR,
    TOKEN_TYPE_BEARER,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Mailer, UnitOfWork};
use crate::utils::EmailTemplates;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// `purpose` claim of a refresh token
const PURPOSE_REFRESH: &str = "refresh";

/// Verified against when the email is unknown, so both paths hash once.
static TIMING_HASH: Lazy<String> = Lazy::new(|| {
    Password::new("timing-equalizer")
        .map(Password::into_string)
        .unwrap_or_default()
});

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Claims of the single-use tokens (refresh, reset, verification)
#[derive(Debug, Serialize, Deserialize)]
struct LinkClaims {
    sub: Uuid,
    purpose: String,
    nonce: String,
    exp: i64,
    iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token for `POST /auth/refresh-token`
    pub refresh_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 604800)]
    pub expires_in: i64,
}

/// Authenticated user with a fresh token pair
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    pub user: UserResponse,
    #[serde(flatten)]
    pub tokens: TokenResponse,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Asha Rao")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "secret123")]
    pub password: String,
    /// `owner` or `tenant`; defaults to `tenant`
    pub role: Option<UserRole>,
    pub phone: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "asha@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Authentication service trait for dependency injection.
///
/// Password hashing is handled by domain::Password value object.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new owner or tenant and send the verification email
    async fn register(&self, request: RegisterRequest) -> AppResult<AuthSession>;

    /// Check credentials, applying the lockout policy
    async fn login(&self, request: LoginRequest) -> AppResult<AuthSession>;

    /// Exchange a refresh token for a new token pair
    async fn refresh(&self, refresh_token: String) -> AppResult<AuthSession>;

    /// Revoke the user's refresh token
    async fn logout(&self, user_id: Uuid) -> AppResult<()>;

    /// Email a reset link if the address belongs to a user
    async fn forgot_password(&self, email: String) -> AppResult<()>;

    async fn reset_password(&self, token: String, password: String) -> AppResult<AuthSession>;

    async fn verify_email(&self, token: String) -> AppResult<User>;

    /// Verify an access token and load its active user
    async fn authenticate(&self, token: String) -> AppResult<User>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
    mailer: Arc<dyn Mailer>,
    templates: EmailTemplates,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config, mailer: Arc<dyn Mailer>) -> Self {
        let templates = EmailTemplates::new(config.frontend_url.clone());
        Self {
            uow,
            config,
            mailer,
            templates,
        }
    }

    fn access_token(&self, user: &User, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role.to_string(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours)).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )?)
    }

    fn link_token(
        &self,
        user_id: Uuid,
        purpose: &str,
        nonce: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let claims = LinkClaims {
            sub: user_id,
            purpose: purpose.to_string(),
            nonce: nonce.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_refresh_secret_bytes()),
        )?)
    }

    fn read_link_token(&self, token: &str, purpose: &str) -> AppResult<LinkClaims> {
        let claims = decode::<LinkClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_refresh_secret_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::validation("Invalid or expired token"))?
        .claims;

        if claims.purpose != purpose {
            return Err(AppError::validation("Invalid or expired token"));
        }
        Ok(claims)
    }

    /// Rotate the refresh nonce, persist the user and issue a token pair.
    async fn open_session(&self, mut user: User, now: DateTime<Utc>) -> AppResult<AuthSession> {
        let nonce = new_nonce();
        user.refresh_token_nonce = Some(nonce.clone());
        user.updated_at = now;
        let user = self.uow.users().update(user).await?;

        let tokens = TokenResponse {
            access_token: self.access_token(&user, now)?,
            refresh_token: self.link_token(
                user.id,
                PURPOSE_REFRESH,
                &nonce,
                Duration::days(self.config.jwt_refresh_expiration_days),
                now,
            )?,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        };

        Ok(AuthSession {
            user: user.into(),
            tokens,
        })
    }

    /// Mail delivery never fails the calling flow.
    async fn deliver(&self, email: crate::infra::Email) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!(to = %to, error = %e, "Failed to send email");
        }
    }
}

fn new_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, request: RegisterRequest) -> AppResult<AuthSession> {
        let role = request.role.unwrap_or_default();
        if role.is_admin() {
            return Err(AppError::forbidden("Admin accounts cannot be self-registered"));
        }

        let email = normalize_email(&request.email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists with this email"));
        }

        // DDD: Use Password value object for hashing
        let password_hash = Password::new(&request.password)?.into_string();
        let now = Utc::now();
        let mut user = User::new(request.name.trim().to_string(), email, password_hash, role, now);
        user.phone = request.phone;

        let nonce = new_nonce();
        user.email_verification_nonce = Some(nonce.clone());
        let user = self.uow.users().insert(user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");

        let token = self.link_token(
            user.id,
            PURPOSE_EMAIL_VERIFICATION,
            &nonce,
            Duration::hours(EMAIL_VERIFICATION_TTL_HOURS),
            now,
        )?;
        self.deliver(self.templates.welcome(&user)).await;
        self.deliver(self.templates.verify_email(&user, &token)).await;

        self.open_session(user, now).await
    }

    async fn login(&self, request: LoginRequest) -> AppResult<AuthSession> {
        let email = normalize_email(&request.email);
        let now = Utc::now();

        let Some(mut user) = self.uow.users().find_by_email(&email).await? else {
            // Spend the same hashing time as a real check
            Password::from_hash(TIMING_HASH.clone()).verify(&request.password);
            return Err(AppError::InvalidCredentials);
        };

        if user.is_locked(now) {
            return Err(AppError::AccountLocked);
        }

        // DDD: Use Password value object for verification
        if !Password::from_hash(user.password_hash.clone()).verify(&request.password) {
            user.register_failed_login(now);
            let locked = user.is_locked(now);
            self.uow.users().update(user).await?;
            if locked {
                tracing::warn!(email = %email, "Account locked after repeated failed logins");
                return Err(AppError::AccountLocked);
            }
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        user.register_successful_login(now);
        tracing::info!(user_id = %user.id, "User logged in");
        self.open_session(user, now).await
    }

    async fn refresh(&self, refresh_token: String) -> AppResult<AuthSession> {
        let claims = self
            .read_link_token(&refresh_token, PURPOSE_REFRESH)
            .map_err(|_| AppError::unauthorized("Invalid refresh token"))?;

        let mut user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid refresh token"))?;

        if user.refresh_token_nonce.as_deref() != Some(claims.nonce.as_str()) {
            // A rotated token came back: revoke whatever is outstanding
            if user.refresh_token_nonce.take().is_some() {
                tracing::warn!(user_id = %user.id, "Refresh token reuse detected");
                self.uow.users().update(user).await?;
            }
            return Err(AppError::unauthorized("Invalid refresh token"));
        }
        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }

        self.open_session(user, Utc::now()).await
    }

    async fn logout(&self, user_id: Uuid) -> AppResult<()> {
        let mut user = self
            .uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_not_found("User")?;
        user.refresh_token_nonce = None;
        user.updated_at = Utc::now();
        self.uow.users().update(user).await?;
        Ok(())
    }

    async fn forgot_password(&self, email: String) -> AppResult<()> {
        let email = normalize_email(&email);
        let Some(mut user) = self.uow.users().find_by_email(&email).await? else {
            tracing::debug!(email = %email, "Password reset requested for unknown email");
            return Ok(());
        };

        let now = Utc::now();
        let ttl = Duration::minutes(PASSWORD_RESET_TTL_MINUTES);
        let nonce = new_nonce();
        user.reset_password_nonce = Some(nonce.clone());
        user.reset_password_expires_at = Some(now + ttl);
        user.updated_at = now;
        let user = self.uow.users().update(user).await?;

        let token = self.link_token(user.id, PURPOSE_PASSWORD_RESET, &nonce, ttl, now)?;
        self.deliver(self.templates.reset_password(&user, &token)).await;
        Ok(())
    }

    async fn reset_password(&self, token: String, password: String) -> AppResult<AuthSession> {
        let claims = self.read_link_token(&token, PURPOSE_PASSWORD_RESET)?;
        let now = Utc::now();

        let mut user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired token"))?;

        let live = user.reset_password_nonce.as_deref() == Some(claims.nonce.as_str())
            && user.reset_password_expires_at.map_or(false, |at| at > now);
        if !live {
            return Err(AppError::validation("Invalid or expired token"));
        }

        let password_hash = Password::new(&password)?.into_string();
        user.change_password(password_hash, now);
        tracing::info!(user_id = %user.id, "Password reset");

        self.open_session(user, now).await
    }

    async fn verify_email(&self, token: String) -> AppResult<User> {
        let claims = self.read_link_token(&token, PURPOSE_EMAIL_VERIFICATION)?;

        let mut user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::validation("Invalid or expired token"))?;

        if user.email_verification_nonce.as_deref() != Some(claims.nonce.as_str()) {
            return Err(AppError::validation("Invalid or expired token"));
        }

        user.is_email_verified = true;
        user.email_verification_nonce = None;
        user.updated_at = Utc::now();
        self.uow.users().update(user).await
    }

    async fn authenticate(&self, token: String) -> AppResult<User> {
        let claims = self
            .verify_token(&token)
            .map_err(|_| AppError::unauthorized("Not authorized to access this route"))?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("User no longer exists"))?;

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        Ok(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
