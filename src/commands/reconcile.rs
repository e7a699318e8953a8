//! Reconcile command - Rebuilds occupancy counters from the tenant records.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, KeyedLocks, Persistence};
use crate::services::OccupancyEngine;

/// Execute the reconcile command
pub async fn execute(config: Config) -> AppResult<()> {
    tracing::info!("Reconciling room occupancy and property counters...");

    let db = Database::connect(&config)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let engine = OccupancyEngine::new(
        Arc::new(Persistence::new(db.get_connection())),
        Arc::new(KeyedLocks::new()),
    );
    let report = engine.reconcile_all().await?;

    println!(
        "rooms: {}, properties: {}, failures: {}",
        report.rooms, report.properties, report.failures
    );

    if report.failures > 0 {
        return Err(AppError::internal(format!(
            "{} recomputes failed, see the log for details",
            report.failures
        )));
    }

    tracing::info!(
        rooms = report.rooms,
        properties = report.properties,
        "Reconciliation completed successfully"
    );
    Ok(())
}
