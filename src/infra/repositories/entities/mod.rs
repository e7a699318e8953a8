//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enumerations are stored as their wire strings and nested value objects
//! as JSON columns.

pub mod complaint;
pub mod notice;
pub mod payment;
pub mod property;
pub mod room;
pub mod tenant;
pub mod user;

use std::str::FromStr;

use sea_orm::prelude::Json;
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::{AppError, AppResult};
use domain::DomainError;

/// Parse a stored wire string back into its enum.
pub(crate) fn parse_column<T>(raw: &str, column: &str) -> AppResult<T>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse()
        .map_err(|e| AppError::internal(format!("corrupt value in column {}: {}", column, e)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> AppResult<Json> {
    serde_json::to_value(value).map_err(|e| AppError::internal(format!("json encode: {}", e)))
}

pub(crate) fn from_json<T: DeserializeOwned>(value: Json, column: &str) -> AppResult<T> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("corrupt json in column {}: {}", column, e)))
}

pub(crate) fn opt_to_json<T: Serialize>(value: &Option<T>) -> AppResult<Option<Json>> {
    value.as_ref().map(to_json).transpose()
}

pub(crate) fn opt_from_json<T: DeserializeOwned>(
    value: Option<Json>,
    column: &str,
) -> AppResult<Option<T>> {
    value.map(|v| from_json(v, column)).transpose()
}

pub(crate) fn count_to_db(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

pub(crate) fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
