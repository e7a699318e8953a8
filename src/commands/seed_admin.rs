//! Seed-admin command - Creates or promotes the bootstrap admin account.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};
use crate::services::{AdminSeed, UserManager, UserService};

/// Execute the seed-admin command
pub async fn execute(config: Config) -> AppResult<()> {
    let password = config
        .admin_password()
        .map(str::to_string)
        .ok_or_else(|| AppError::validation("ADMIN_PASSWORD must be set to seed the admin"))?;

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let users = UserManager::new(Arc::new(Persistence::new(db.get_connection())));
    let outcome = users
        .ensure_admin(config.admin_name.clone(), config.admin_email.clone(), password)
        .await?;

    match outcome {
        AdminSeed::Created(user) => println!("Admin created: {}", user.email),
        AdminSeed::Promoted(user) => println!("Existing user promoted to admin: {}", user.email),
        AdminSeed::AlreadyAdmin(user) => println!("Admin already exists: {}", user.email),
    }
    Ok(())
}
