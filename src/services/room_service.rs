//! Room service.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::{NewRoom, Requester, ResourceRef, Room, RoomChanges, RoomView};

use super::access::AccessResolver;
use super::occupancy::OccupancyEngine;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{KeyedLocks, UnitOfWork};
use crate::types::{RoomFilter, TenantFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoomService: Send + Sync {
    async fn list(&self, requester: Requester, filter: RoomFilter) -> AppResult<Vec<RoomView>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<RoomView>;

    async fn create(&self, requester: Requester, input: NewRoom) -> AppResult<RoomView>;

    async fn update(&self, requester: Requester, id: Uuid, changes: RoomChanges) -> AppResult<RoomView>;

    /// Delete an empty room along with its former tenants' records
    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;
}

pub struct RoomManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    engine: Arc<OccupancyEngine<U>>,
}

impl<U: UnitOfWork> RoomManager<U> {
    pub fn new(uow: Arc<U>, engine: Arc<OccupancyEngine<U>>) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            engine,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Room> {
        self.uow.rooms().find_by_id(id).await?.ok_or_not_found("Room")
    }
}

#[async_trait]
impl<U: UnitOfWork> RoomService for RoomManager<U> {
    async fn list(&self, _requester: Requester, filter: RoomFilter) -> AppResult<Vec<RoomView>> {
        let rooms = self.uow.rooms().list(filter).await?;
        Ok(rooms.into_iter().map(RoomView::from).collect())
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<RoomView> {
        self.access.authorize(&requester, ResourceRef::Room(id)).await?;
        Ok(self.load(id).await?.into())
    }

    async fn create(&self, requester: Requester, input: NewRoom) -> AppResult<RoomView> {
        let property_id = input.property_id;
        self.access
            .authorize(&requester, ResourceRef::Property(property_id))
            .await?;

        let room = Room::create(input, Utc::now())?;
        let room = self.uow.rooms().insert(room).await?;
        tracing::info!(
            room_id = %room.id,
            property_id = %property_id,
            room_number = %room.room_number,
            "Room created"
        );

        self.engine.after_room_set_change(property_id).await;
        Ok(room.into())
    }

    async fn update(&self, requester: Requester, id: Uuid, changes: RoomChanges) -> AppResult<RoomView> {
        self.access.authorize(&requester, ResourceRef::Room(id)).await?;

        {
            // Capacity is checked against the occupancy seen under the room lock
            let _guard = self.engine.locks().lock(&KeyedLocks::room_key(id)).await;
            self.uow
                .transaction(move |ctx| {
                    Box::pin(async move {
                        let mut room = ctx.rooms().find_by_id(id).await?.ok_or_not_found("Room")?;
                        room.apply(changes, Utc::now())?;
                        ctx.rooms().update(room).await
                    })
                })
                .await?;
        }

        self.engine.after_room_write(id).await;
        Ok(self.load(id).await?.into())
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        self.access.authorize(&requester, ResourceRef::Room(id)).await?;

        let property_id = {
            let _guard = self.engine.locks().lock(&KeyedLocks::room_key(id)).await;
            self.uow
                .transaction(move |ctx| {
                    Box::pin(async move {
                        let room = ctx.rooms().find_by_id(id).await?.ok_or_not_found("Room")?;

                        let residents = ctx.tenants().count_residents_in_room(id).await?;
                        if residents > 0 {
                            return Err(AppError::conflict(format!(
                                "Cannot delete room {} with {} tenant(s) still living in it",
                                room.room_number, residents
                            )));
                        }

                        let former = ctx
                            .tenants()
                            .list(TenantFilter {
                                room: Some(id),
                                ..Default::default()
                            })
                            .await?;
                        for tenant in &former {
                            ctx.payments().delete_by_tenant(tenant.id).await?;
                            ctx.complaints().delete_by_tenant(tenant.id).await?;
                        }
                        ctx.tenants().delete_by_room(id).await?;
                        ctx.rooms().delete(id).await?;

                        tracing::info!(
                            room_id = %id,
                            former_tenants = former.len(),
                            "Room deleted"
                        );
                        Ok(room.property_id)
                    })
                })
                .await?
        };

        self.engine.after_room_set_change(property_id).await;
        Ok(())
    }
}
