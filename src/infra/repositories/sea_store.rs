//! SeaORM-backed implementation of every repository.
//!
//! `SeaStore` is generic over the connection handle so the same code runs
//! against the pooled connection and inside a transaction.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr};

use crate::errors::{AppError, AppResult};

/// Anything that can hand out a SeaORM connection.
pub trait DbHandle: Send + Sync {
    type Conn: ConnectionTrait + Send + Sync;

    fn conn(&self) -> &Self::Conn;
}

impl DbHandle for DatabaseConnection {
    type Conn = DatabaseConnection;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

impl<'t> DbHandle for &'t DatabaseTransaction {
    type Conn = DatabaseTransaction;

    fn conn(&self) -> &Self::Conn {
        self
    }
}

/// Repository implementations over a connection or transaction.
pub struct SeaStore<H> {
    handle: H,
}

impl<H: DbHandle> SeaStore<H> {
    pub fn new(handle: H) -> Self {
        Self { handle }
    }

    pub(crate) fn conn(&self) -> &H::Conn {
        self.handle.conn()
    }
}

/// Map a failed write: unique violations become conflicts, a missing row on
/// update becomes not-found.
pub(crate) fn write_error(err: DbErr, entity: &str, conflict: &str) -> AppError {
    if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
        return AppError::conflict(conflict);
    }
    match err {
        DbErr::RecordNotUpdated => AppError::not_found(entity),
        other => AppError::Database(other),
    }
}

/// Convert loaded models into domain entities.
pub(crate) fn into_domain<M, T>(models: Vec<M>) -> AppResult<Vec<T>>
where
    T: TryFrom<M, Error = AppError>,
{
    models.into_iter().map(T::try_from).collect()
}

/// Fail with not-found when a single-row delete touched nothing.
pub(crate) fn expect_deleted(rows_affected: u64, entity: &str) -> AppResult<()> {
    if rows_affected == 0 {
        return Err(AppError::not_found(entity));
    }
    Ok(())
}
