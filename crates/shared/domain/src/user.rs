//! User domain entity and related types.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{ACCOUNT_LOCK_HOURS, MAX_LOGIN_ATTEMPTS};

wire_enum! {
    /// User roles enumeration
    UserRole {
        Admin => "admin",
        Owner => "owner",
        Tenant => "tenant",
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Tenant
    }
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Owners and admins manage properties and everything beneath them.
    pub fn is_manager(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Owner)
    }
}

/// User domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub is_email_verified: bool,
    pub is_active: bool,
    /// Nonce embedded in the outstanding email verification link
    pub email_verification_nonce: Option<String>,
    /// Nonce embedded in the outstanding password reset link
    pub reset_password_nonce: Option<String>,
    pub reset_password_expires_at: Option<DateTime<Utc>>,
    /// Nonce bound to the currently valid refresh token
    pub refresh_token_nonce: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub login_attempts: i32,
    pub lock_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, active, unverified user.
    pub fn new(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email: email.trim().to_lowercase(),
            password_hash,
            role,
            phone: None,
            is_email_verified: false,
            is_active: true,
            email_verification_nonce: None,
            reset_password_nonce: None,
            reset_password_expires_at: None,
            refresh_token_nonce: None,
            last_login_at: None,
            login_attempts: 0,
            lock_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// An account is locked while `lock_until` lies in the future.
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.lock_until.map_or(false, |until| until > now)
    }

    /// Record a failed login.
    ///
    /// An expired lock restarts the count at one. Reaching
    /// [`MAX_LOGIN_ATTEMPTS`] locks the account for [`ACCOUNT_LOCK_HOURS`].
    pub fn register_failed_login(&mut self, now: DateTime<Utc>) {
        if matches!(self.lock_until, Some(until) if until <= now) {
            self.login_attempts = 1;
            self.lock_until = None;
        } else {
            self.login_attempts += 1;
            if self.login_attempts >= MAX_LOGIN_ATTEMPTS && !self.is_locked(now) {
                self.lock_until = Some(now + Duration::hours(ACCOUNT_LOCK_HOURS));
            }
        }
        self.updated_at = now;
    }

    /// Record a successful login.
    pub fn register_successful_login(&mut self, now: DateTime<Utc>) {
        self.login_attempts = 0;
        self.lock_until = None;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Replace the password and invalidate every outstanding credential.
    pub fn change_password(&mut self, password_hash: String, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.reset_password_nonce = None;
        self.reset_password_expires_at = None;
        self.refresh_token_nonce = None;
        self.login_attempts = 0;
        self.lock_until = None;
        self.updated_at = now;
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserResponse {
    /// Unique user identifier
    #[cfg_attr(feature = "openapi", schema(example = "550e8400-e29b-41d4-a716-446655440000"))]
    pub id: Uuid,
    #[cfg_attr(feature = "openapi", schema(example = "Asha Rao"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "asha@example.com"))]
    pub email: String,
    pub role: UserRole,
    pub phone: Option<String>,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            phone: user.phone,
            is_email_verified: user.is_email_verified,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}
