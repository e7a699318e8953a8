//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use super::parse_column;
use crate::errors::{AppError, AppResult};
use domain::User;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub phone: Option<String>,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub email_verification_nonce: Option<String>,
    pub reset_password_nonce: Option<String>,
    pub reset_password_expires_at: Option<DateTimeUtc>,
    pub refresh_token_nonce: Option<String>,
    pub last_login_at: Option<DateTimeUtc>,
    pub login_attempts: i32,
    pub lock_until: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = AppError;

    fn try_from(model: Model) -> AppResult<Self> {
        Ok(User {
            id: model.id,
            name: model.name,
            email: model.email,
            password_hash: model.password_hash,
            role: parse_column(&model.role, "users.role")?,
            phone: model.phone,
            is_email_verified: model.is_email_verified,
            is_active: model.is_active,
            email_verification_nonce: model.email_verification_nonce,
            reset_password_nonce: model.reset_password_nonce,
            reset_password_expires_at: model.reset_password_expires_at,
            refresh_token_nonce: model.refresh_token_nonce,
            last_login_at: model.last_login_at,
            login_attempts: model.login_attempts,
            lock_until: model.lock_until,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_string()),
            phone: Set(user.phone.clone()),
            is_email_verified: Set(user.is_email_verified),
            is_active: Set(user.is_active),
            email_verification_nonce: Set(user.email_verification_nonce.clone()),
            reset_password_nonce: Set(user.reset_password_nonce.clone()),
            reset_password_expires_at: Set(user.reset_password_expires_at),
            refresh_token_nonce: Set(user.refresh_token_nonce.clone()),
            last_login_at: Set(user.last_login_at),
            login_attempts: Set(user.login_attempts),
            lock_until: Set(user.lock_until),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
    }
}
