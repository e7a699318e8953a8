//! User service - Handles user-related business logic.
//!
//! DDD: Orchestrates domain operations via Unit of Work.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use domain::{Password, User, UserRole};

use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of bootstrapping the admin account
#[derive(Debug, Clone, PartialEq)]
pub enum AdminSeed {
    Created(User),
    /// An account with the email existed and was promoted to admin
    Promoted(User),
    AlreadyAdmin(User),
}

/// User service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List all users, newest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Make sure an active admin with this email exists
    async fn ensure_admin(&self, name: String, email: String, password: String) -> AppResult<AdminSeed>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn ensure_admin(&self, name: String, email: String, password: String) -> AppResult<AdminSeed> {
        let email = email.trim().to_lowercase();
        let now = Utc::now();

        if let Some(mut user) = self.uow.users().find_by_email(&email).await? {
            if user.is_admin() && user.is_active {
                return Ok(AdminSeed::AlreadyAdmin(user));
            }
            user.role = UserRole::Admin;
            user.is_active = true;
            user.updated_at = now;
            let user = self.uow.users().update(user).await?;
            tracing::info!(user_id = %user.id, "Existing user promoted to admin");
            return Ok(AdminSeed::Promoted(user));
        }

        let password_hash = Password::new(&password)?.into_string();
        let mut user = User::new(name, email, password_hash, UserRole::Admin, now);
        user.is_email_verified = true;
        let user = self.uow.users().insert(user).await?;
        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(AdminSeed::Created(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::MockUnitOfWork;
    use mockall::predicate::eq;

    #[tokio::test]
    async fn test_get_missing_user_is_not_found() {
        let mut uow = MockUnitOfWork::new();
        let id = Uuid::new_v4();
        uow.users
            .expect_find_by_id()
            .with(eq(id))
            .returning(|_| Ok(None));

        let result = UserManager::new(Arc::new(uow)).get_user(id).await;
        assert!(matches!(result, Err(AppError::NotFound(entity)) if entity == "User"));
    }

    #[tokio::test]
    async fn test_ensure_admin_creates_verified_admin() {
        let mut uow = MockUnitOfWork::new();
        uow.users.expect_find_by_email().returning(|_| Ok(None));
        uow.users.expect_insert().times(1).returning(Ok);

        let seed = UserManager::new(Arc::new(uow))
            .ensure_admin(
                "Admin".to_string(),
                " Admin@PGNexus.com ".to_string(),
                "admin-pass".to_string(),
            )
            .await
            .unwrap();

        match seed {
            AdminSeed::Created(user) => {
                assert_eq!(user.email, "admin@pgnexus.com");
                assert_eq!(user.role, UserRole::Admin);
                assert!(user.is_email_verified);
            }
            other => panic!("unexpected seed outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_ensure_admin_promotes_existing_owner() {
        let existing = User::new(
            "Ravi".to_string(),
            "ravi@example.com".to_string(),
            "hash".to_string(),
            UserRole::Owner,
            Utc::now(),
        );

        let mut uow = MockUnitOfWork::new();
        uow.users
            .expect_find_by_email()
            .returning(move |_| Ok(Some(existing.clone())));
        uow.users.expect_update().times(1).returning(Ok);
        uow.users.expect_insert().never();

        let seed = UserManager::new(Arc::new(uow))
            .ensure_admin(
                "Ravi".to_string(),
                "ravi@example.com".to_string(),
                "ignored-pass".to_string(),
            )
            .await
            .unwrap();

        assert!(matches!(seed, AdminSeed::Promoted(user) if user.role == UserRole::Admin));
    }
}
