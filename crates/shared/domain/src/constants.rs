//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Indian mobile numbers are stored as exactly ten digits
pub const PHONE_PATTERN: &str = r"^[0-9]{10}$";

/// Postal index numbers are exactly six digits
pub const PINCODE_PATTERN: &str = r"^[0-9]{6}$";

// =============================================================================
// Account lockout
// =============================================================================

/// Consecutive failed logins before the account is locked
pub const MAX_LOGIN_ATTEMPTS: i32 = 5;

/// How long a locked account stays locked
pub const ACCOUNT_LOCK_HOURS: i64 = 2;

// =============================================================================
// Single-use tokens
// =============================================================================

/// Lifetime of a password reset link
pub const PASSWORD_RESET_TTL_MINUTES: i64 = 10;

/// Lifetime of an email verification link
pub const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

// =============================================================================
// Tenancy
// =============================================================================

/// Month length used when reporting how long a tenant has stayed
pub const DAYS_PER_MONTH: i64 = 30;
