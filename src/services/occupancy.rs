//! Occupancy consistency engine.
//!
//! Room occupancy and property room counters are re-derived from the live
//! records after every tenant or room write. Services call the engine
//! explicitly once their own write has committed. Each recompute runs in one
//! transaction under the keyed locks of the room and its property, so
//! concurrent writers never interleave a read-count-write cycle. A recompute
//! is idempotent, which is what lets `reconcile` replay it over everything.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use domain::{PropertyCounts, RoomOccupancy, TenantStatus};

use super::container::parallel;
use crate::config::{OCCUPANCY_RECOMPUTE_ATTEMPTS, OCCUPANCY_RETRY_DELAY_MS, RECONCILE_CONCURRENCY};
use crate::errors::{AppError, AppResult};
use crate::infra::{KeyedLocks, TransactionContext, UnitOfWork};
use crate::types::{PropertyFilter, RoomFilter, TenantFilter};

/// Outcome of a full reconciliation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub rooms: usize,
    pub properties: usize,
    pub failures: usize,
}

pub struct OccupancyEngine<U: UnitOfWork> {
    uow: Arc<U>,
    locks: Arc<KeyedLocks>,
}

impl<U: UnitOfWork> OccupancyEngine<U> {
    pub fn new(uow: Arc<U>, locks: Arc<KeyedLocks>) -> Self {
        Self { uow, locks }
    }

    /// Registry shared with services that serialize capacity checks.
    pub fn locks(&self) -> &KeyedLocks {
        &self.locks
    }

    /// Bring the given rooms, and their properties, back in line after a
    /// tenant was created, updated, moved or deleted. Never fails.
    pub async fn after_tenant_write(&self, rooms: &[Uuid]) {
        let mut seen = Vec::with_capacity(rooms.len());
        for &room_id in rooms {
            if seen.contains(&room_id) {
                continue;
            }
            seen.push(room_id);
            self.retrying("room", room_id, || self.recompute_room(room_id))
                .await;
        }
    }

    /// Recount a room after a client edit. Its property is recounted in the
    /// same transaction.
    pub async fn after_room_write(&self, room_id: Uuid) {
        self.retrying("room", room_id, || self.recompute_room(room_id))
            .await;
    }

    /// Recount a property's rooms after a room was created or deleted.
    pub async fn after_room_set_change(&self, property_id: Uuid) {
        self.retrying("property", property_id, || {
            self.recompute_property(property_id)
        })
        .await;
    }

    /// Re-derive one room and its property. `None` when the room is gone.
    pub async fn recompute_room(&self, room_id: Uuid) -> AppResult<Option<RoomOccupancy>> {
        let Some(room) = self.uow.rooms().find_by_id(room_id).await? else {
            return Ok(None);
        };
        let property_id = room.property_id;
        let _guards = self
            .locks
            .lock_all(&[
                KeyedLocks::room_key(room_id),
                KeyedLocks::property_key(property_id),
            ])
            .await;

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let Some(room) = ctx.rooms().find_by_id(room_id).await? else {
                        return Ok(None);
                    };
                    let active = ctx
                        .tenants()
                        .count(TenantFilter::in_room(room_id, TenantStatus::Active))
                        .await?;

                    let occupancy = RoomOccupancy::settle(room.status, saturating_u32(active));
                    if occupancy.current_occupancy != room.current_occupancy
                        || occupancy.status != room.status
                    {
                        ctx.rooms().update_occupancy(room_id, occupancy).await?;
                        tracing::debug!(
                            room_id = %room_id,
                            occupancy = occupancy.current_occupancy,
                            status = %occupancy.status,
                            "Room occupancy updated"
                        );
                    }

                    tally_property(ctx, room.property_id).await?;
                    Ok(Some(occupancy))
                })
            })
            .await
    }

    /// Re-derive a property's room counters. `None` when the property is gone.
    pub async fn recompute_property(&self, property_id: Uuid) -> AppResult<Option<PropertyCounts>> {
        let _guard = self
            .locks
            .lock(&KeyedLocks::property_key(property_id))
            .await;

        self.uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if ctx.properties().find_by_id(property_id).await?.is_none() {
                        return Ok(None);
                    }
                    tally_property(ctx, property_id).await.map(Some)
                })
            })
            .await
    }

    /// Recompute every room, then every property.
    pub async fn reconcile_all(&self) -> AppResult<ReconcileReport> {
        let rooms = self.uow.rooms().list(RoomFilter::default()).await?;
        let properties = self.uow.properties().list(PropertyFilter::default()).await?;

        let room_outcomes = parallel::join_all_limited(
            rooms.iter().map(|room| settled(room.id, self.recompute_room(room.id))),
            RECONCILE_CONCURRENCY,
        )
        .await?;
        let property_outcomes = parallel::join_all_limited(
            properties
                .iter()
                .map(|property| settled(property.id, self.recompute_property(property.id))),
            RECONCILE_CONCURRENCY,
        )
        .await?;

        let failures = room_outcomes
            .iter()
            .chain(property_outcomes.iter())
            .filter(|ok| !**ok)
            .count();

        let report = ReconcileReport {
            rooms: rooms.len(),
            properties: properties.len(),
            failures,
        };
        tracing::info!(
            rooms = report.rooms,
            properties = report.properties,
            failures = report.failures,
            "Occupancy reconciled"
        );
        Ok(report)
    }

    async fn retrying<F, Fut, T>(&self, kind: &'static str, id: Uuid, recompute: F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        for attempt in 1..=OCCUPANCY_RECOMPUTE_ATTEMPTS {
            match recompute().await {
                Ok(_) => return,
                Err(e) if attempt < OCCUPANCY_RECOMPUTE_ATTEMPTS => {
                    tracing::warn!(
                        kind,
                        id = %id,
                        attempt,
                        error = %e,
                        "Occupancy recompute failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(
                        OCCUPANCY_RETRY_DELAY_MS * u64::from(attempt),
                    ))
                    .await;
                }
                Err(e) => {
                    tracing::error!(
                        kind,
                        id = %id,
                        error = %e,
                        "Occupancy recompute gave up; run `reconcile` to repair"
                    );
                }
            }
        }
    }
}

async fn tally_property(ctx: TransactionContext<'_>, property_id: Uuid) -> AppResult<PropertyCounts> {
    let statuses = ctx.rooms().statuses_in_property(property_id).await?;
    let counts = PropertyCounts::tally(statuses);
    ctx.properties().update_counts(property_id, counts).await?;
    Ok(counts)
}

/// Log a failed recompute and report whether it succeeded.
async fn settled<T>(id: Uuid, recompute: impl Future<Output = AppResult<T>>) -> Result<bool, AppError> {
    match recompute.await {
        Ok(_) => Ok(true),
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Reconcile step failed");
            Ok(false)
        }
    }
}

fn saturating_u32(count: u64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}
