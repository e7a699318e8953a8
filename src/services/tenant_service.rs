//! Tenant service.
//!
//! Every write that can change who occupies a room runs under the keyed lock
//! of the affected rooms, so the vacancy check and the insert or update it
//! guards cannot interleave with another writer. Occupancy is re-derived by
//! the engine once the write has committed and the locks are released.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use domain::{
    ensure_vacancy, NewTenant, Requester, ResourceRef, Room, Tenant, TenantChanges, TenantStatus,
    TenantView,
};

use super::access::{manages, AccessResolver};
use super::occupancy::OccupancyEngine;
use crate::errors::{AppError, AppResult, OptionExt, FORBIDDEN_MESSAGE};
use crate::infra::{KeyedLocks, Notifications, TransactionContext, UnitOfWork};
use crate::types::TenantFilter;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TenantService: Send + Sync {
    /// Tenants only ever see their own records
    async fn list(&self, requester: Requester, filter: TenantFilter) -> AppResult<Vec<TenantView>>;

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<TenantView>;

    /// Place a tenant in a room; an active tenant needs a free bed
    async fn create(&self, requester: Requester, input: NewTenant) -> AppResult<TenantView>;

    async fn update(&self, requester: Requester, id: Uuid, changes: TenantChanges) -> AppResult<TenantView>;

    /// Delete a tenant with its payments and complaints
    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()>;
}

pub struct TenantManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
    engine: Arc<OccupancyEngine<U>>,
    notifications: Notifications,
}

impl<U: UnitOfWork> TenantManager<U> {
    pub fn new(uow: Arc<U>, engine: Arc<OccupancyEngine<U>>, notifications: Notifications) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
            engine,
            notifications,
        }
    }
}

/// Fail when `room` has no bed left for one more active tenant. Callers only
/// check tenants whose stored record does not yet count toward `room`.
async fn check_vacancy(ctx: TransactionContext<'_>, room: &Room) -> AppResult<()> {
    let active = ctx
        .tenants()
        .count(TenantFilter::in_room(room.id, TenantStatus::Active))
        .await?;
    ensure_vacancy(
        &room.room_number,
        room.capacity,
        u32::try_from(active).unwrap_or(u32::MAX),
    )?;
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> TenantService for TenantManager<U> {
    async fn list(&self, requester: Requester, mut filter: TenantFilter) -> AppResult<Vec<TenantView>> {
        if requester.is_tenant() {
            filter.user = Some(requester.id);
        }
        let today = Utc::now().date_naive();
        let tenants = self.uow.tenants().list(filter).await?;
        Ok(tenants
            .into_iter()
            .map(|tenant| TenantView::new(tenant, today))
            .collect())
    }

    async fn get(&self, requester: Requester, id: Uuid) -> AppResult<TenantView> {
        self.access.authorize(&requester, ResourceRef::Tenant(id)).await?;
        let tenant = self
            .uow
            .tenants()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Tenant")?;
        Ok(TenantView::new(tenant, Utc::now().date_naive()))
    }

    async fn create(&self, requester: Requester, input: NewTenant) -> AppResult<TenantView> {
        let room_id = input.room_id;
        self.access
            .authorize(&requester, ResourceRef::Room(room_id))
            .await?;
        self.uow
            .users()
            .find_by_id(input.user_id)
            .await?
            .ok_or_not_found("User")?;

        let (tenant, room) = {
            let _guard = self
                .engine
                .locks()
                .lock(&KeyedLocks::room_key(room_id))
                .await;
            self.uow
                .transaction(move |ctx| {
                    Box::pin(async move {
                        let room = ctx
                            .rooms()
                            .find_by_id(room_id)
                            .await?
                            .ok_or_not_found("Room")?;
                        let tenant = Tenant::create(input, &room, Utc::now())?;
                        if tenant.status.occupies_room() {
                            check_vacancy(ctx, &room).await?;
                        }
                        let tenant = ctx.tenants().insert(tenant).await?;
                        Ok((tenant, room))
                    })
                })
                .await?
        };

        tracing::info!(
            tenant_id = %tenant.id,
            room_id = %room.id,
            property_id = %tenant.property_id,
            "Tenant created"
        );

        self.engine.after_tenant_write(&[room_id]).await;
        self.notifications.room_assigned(&tenant, &room).await;

        Ok(TenantView::new(tenant, Utc::now().date_naive()))
    }

    async fn update(&self, requester: Requester, id: Uuid, mut changes: TenantChanges) -> AppResult<TenantView> {
        let chain = self.access.authorize(&requester, ResourceRef::Tenant(id)).await?;
        if changes.touches_terms() && !manages(&requester, &chain) {
            return Err(AppError::forbidden(
                "Only the property owner can change placement, rent or tenancy status",
            ));
        }

        let current = self
            .uow
            .tenants()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Tenant")?;
        let from_room = current.room_id;
        let target = changes.room_id.take().filter(|room_id| *room_id != from_room);

        if let Some(to_room) = target {
            // Moving into a room the requester does not manage is refused
            self.access
                .authorize(&requester, ResourceRef::Room(to_room))
                .await?;
        }
        let to_room = target.unwrap_or(from_room);

        let (tenant, moved_into) = {
            let _guards = self
                .engine
                .locks()
                .lock_all(&[KeyedLocks::room_key(from_room), KeyedLocks::room_key(to_room)])
                .await;
            self.uow
                .transaction(move |ctx| {
                    Box::pin(async move {
                        let mut tenant = ctx
                            .tenants()
                            .find_by_id(id)
                            .await?
                            .ok_or_not_found("Tenant")?;
                        let was_active = tenant.status.occupies_room();
                        tenant.apply(changes, Utc::now().date_naive(), Utc::now())?;

                        let mut moved_into = None;
                        if let Some(to_room) = target {
                            let room = ctx
                                .rooms()
                                .find_by_id(to_room)
                                .await?
                                .ok_or_not_found("Room")?;
                            tenant.room_id = room.id;
                            tenant.property_id = room.property_id;
                            moved_into = Some(room);
                        }

                        let joins_room = tenant.status.occupies_room()
                            && (moved_into.is_some() || !was_active);
                        if joins_room {
                            let room = match &moved_into {
                                Some(room) => room.clone(),
                                None => ctx
                                    .rooms()
                                    .find_by_id(tenant.room_id)
                                    .await?
                                    .ok_or_not_found("Room")?,
                            };
                            check_vacancy(ctx, &room).await?;
                        }

                        let tenant = ctx.tenants().update(tenant).await?;
                        Ok((tenant, moved_into))
                    })
                })
                .await?
        };

        tracing::info!(
            tenant_id = %id,
            status = %tenant.status,
            moved = moved_into.is_some(),
            "Tenant updated"
        );

        self.engine.after_tenant_write(&[from_room, to_room]).await;
        if let Some(room) = &moved_into {
            self.notifications.room_assigned(&tenant, room).await;
        }

        Ok(TenantView::new(tenant, Utc::now().date_naive()))
    }

    async fn delete(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        let chain = self.access.authorize(&requester, ResourceRef::Tenant(id)).await?;
        if !manages(&requester, &chain) {
            return Err(AppError::forbidden(FORBIDDEN_MESSAGE));
        }

        let room_id = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let tenant = ctx
                        .tenants()
                        .find_by_id(id)
                        .await?
                        .ok_or_not_found("Tenant")?;
                    let payments = ctx.payments().delete_by_tenant(id).await?;
                    let complaints = ctx.complaints().delete_by_tenant(id).await?;
                    ctx.tenants().delete(id).await?;

                    tracing::info!(
                        tenant_id = %id,
                        payments,
                        complaints,
                        "Tenant deleted"
                    );
                    Ok(tenant.room_id)
                })
            })
            .await?;

        self.engine.after_tenant_write(&[room_id]).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockNotifier, MockUnitOfWork};
    use chrono::NaiveDate;
    use domain::{Address, Contact, NewRoom, Property, PropertyStatus, PropertyType, RoomType, UserRole};

    fn property(owner: Uuid) -> Property {
        let now = Utc::now();
        Property {
            id: Uuid::new_v4(),
            owner_id: owner,
            name: "Harmony Stay".to_string(),
            property_type: PropertyType::Boys,
            address: Address {
                street: "9 Ring Road".to_string(),
                city: "Jaipur".to_string(),
                state: "Rajasthan".to_string(),
                pincode: "302001".to_string(),
                landmark: None,
            },
            contact: Contact {
                person_name: "Vikram".to_string(),
                phone: "9414000000".to_string(),
                email: None,
            },
            amenities: Default::default(),
            description: None,
            rules: None,
            images: Vec::new(),
            total_rooms: 1,
            occupied_rooms: 0,
            status: PropertyStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn room(property_id: Uuid, capacity: u32) -> Room {
        Room::create(
            NewRoom {
                property_id,
                room_number: "B2".to_string(),
                floor: 0,
                room_type: RoomType::Single,
                capacity,
                rent: 9000,
                security_deposit: 9000,
                area: None,
                furnishing: Default::default(),
                amenities: Default::default(),
                status: None,
                images: Vec::new(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    fn new_tenant(room_id: Uuid) -> NewTenant {
        NewTenant {
            user_id: Uuid::new_v4(),
            room_id,
            full_name: "Arjun Mehta".to_string(),
            email: "arjun@example.com".to_string(),
            phone: "9876501234".to_string(),
            alternate_phone: None,
            emergency_contact: None,
            id_proof: None,
            occupation: None,
            permanent_address: None,
            move_in_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            move_out_date: None,
            rent_amount: None,
            security_deposit: None,
            security_deposit_paid: false,
            status: None,
            agreement: None,
        }
    }

    fn manager(uow: MockUnitOfWork, notifier: MockNotifier) -> TenantManager<MockUnitOfWork> {
        let uow = Arc::new(uow);
        let engine = Arc::new(OccupancyEngine::new(uow.clone(), Arc::new(KeyedLocks::new())));
        TenantManager::new(uow, engine, Notifications::new(Arc::new(notifier)))
    }

    #[tokio::test]
    async fn test_full_room_rejects_active_tenant() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let p = property(owner.id);
        let r = room(p.id, 1);
        let room_id = r.id;

        let mut uow = MockUnitOfWork::new();
        uow.rooms
            .expect_find_by_id()
            .returning(move |_| Ok(Some(r.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.users.expect_find_by_id().returning(|id| {
            let mut user = domain::User::new(
                "Arjun".to_string(),
                "arjun@example.com".to_string(),
                "hash".to_string(),
                UserRole::Tenant,
                Utc::now(),
            );
            user.id = id;
            Ok(Some(user))
        });
        uow.tenants.expect_count().returning(|_| Ok(1));
        uow.tenants.expect_insert().never();

        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let result = manager(uow, notifier)
            .create(owner, new_tenant(room_id))
            .await;
        assert!(matches!(result, Err(AppError::Conflict(msg)) if msg.contains("B2")));
    }

    #[tokio::test]
    async fn test_tenant_cannot_change_own_rent() {
        let owner = Uuid::new_v4();
        let p = property(owner);
        let r = room(p.id, 2);
        let tenant = Tenant::create(new_tenant(r.id), &r, Utc::now()).unwrap();
        let (tenant_id, tenant_user) = (tenant.id, tenant.user_id);

        let mut uow = MockUnitOfWork::new();
        uow.tenants
            .expect_find_by_id()
            .returning(move |_| Ok(Some(tenant.clone())));
        uow.properties
            .expect_find_by_id()
            .returning(move |_| Ok(Some(p.clone())));
        uow.tenants.expect_update().never();

        let changes = TenantChanges {
            rent_amount: Some(1),
            ..Default::default()
        };
        let result = manager(uow, MockNotifier::new())
            .update(Requester::new(tenant_user, UserRole::Tenant), tenant_id, changes)
            .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_tenant_listing_is_scoped_to_self() {
        let me = Requester::new(Uuid::new_v4(), UserRole::Tenant);
        let mut uow = MockUnitOfWork::new();
        uow.tenants
            .expect_list()
            .withf(move |filter| filter.user == Some(me.id))
            .returning(|_| Ok(Vec::new()));

        let listed = manager(uow, MockNotifier::new())
            .list(me, TenantFilter::default())
            .await
            .unwrap();
        assert!(listed.is_empty());
    }
}
