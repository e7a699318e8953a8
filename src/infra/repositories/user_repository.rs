//! User repository.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use super::sea_store::{into_domain, write_error, DbHandle, SeaStore};
use crate::errors::AppResult;
use domain::{User, UserRole};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

const EMAIL_TAKEN: &str = "User already exists with this email";

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find by the normalized (lower-cased) email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All users, newest first
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Insert a new user; a taken email is a conflict
    async fn insert(&self, user: User) -> AppResult<User>;

    /// Persist every field of an existing user
    async fn update(&self, user: User) -> AppResult<User>;

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
}

#[async_trait]
impl<H: DbHandle> UserRepository for SeaStore<H> {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        UserEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(self.conn())
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .order_by_desc(user::Column::CreatedAt)
            .all(self.conn())
            .await?;
        into_domain(models)
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user)
            .insert(self.conn())
            .await
            .map_err(|e| write_error(e, "User", EMAIL_TAKEN))?;
        User::try_from(model)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let model = ActiveModel::from(&user)
            .update(self.conn())
            .await
            .map_err(|e| write_error(e, "User", EMAIL_TAKEN))?;
        User::try_from(model)
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        Ok(UserEntity::find()
            .filter(user::Column::Role.eq(role.as_str()))
            .count(self.conn())
            .await?)
    }
}
