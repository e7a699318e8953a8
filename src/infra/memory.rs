//! In-memory backend implementing every repository and the unit of work.
//!
//! Backs `serve --in-memory` and the integration tests. Uniqueness rules
//! match the database indexes. Writes and transactions are serialized by a
//! single gate; a transaction runs against a scratch copy of the state that
//! replaces the live state only when the body succeeds.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::repositories::{
    ComplaintRepository, NoticeRepository, PaymentRepository, PropertyRepository, RoomRepository,
    TenantRepository, UserRepository, DUPLICATE_MONTH,
};
use super::unit_of_work::{Repositories, TransactionContext, TxFuture, UnitOfWork};
use crate::errors::{AppError, AppResult};
use crate::types::{
    ComplaintFilter, NoticeFilter, NoticeScope, PaymentFilter, PropertyFilter, RoomFilter,
    TenantFilter,
};
use domain::{
    Complaint, Notice, Payment, Property, PropertyCounts, Room, RoomOccupancy, RoomStatus, Tenant,
    User, UserRole,
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    rooms: HashMap<Uuid, Room>,
    tenants: HashMap<Uuid, Tenant>,
    payments: HashMap<Uuid, Payment>,
    complaints: HashMap<Uuid, Complaint>,
    notices: HashMap<Uuid, Notice>,
}

/// Thread-safe in-memory store
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
    gate: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_state(state: MemoryState) -> Self {
        Self {
            state: RwLock::new(state),
            gate: Mutex::new(()),
        }
    }

    /// Run a mutation against the live state under the write gate.
    async fn write<R>(&self, f: impl FnOnce(&mut MemoryState) -> AppResult<R>) -> AppResult<R> {
        let _gate = self.gate.lock().await;
        let mut state = self.state.write().await;
        f(&mut state)
    }

    async fn read<R>(&self, f: impl FnOnce(&MemoryState) -> R) -> R {
        let state = self.state.read().await;
        f(&state)
    }
}

fn newest_first<T>(mut items: Vec<T>, created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) -> Vec<T> {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    items
}

fn replace<T>(map: &mut HashMap<Uuid, T>, id: Uuid, value: T, entity: &str) -> AppResult<()> {
    match map.get_mut(&id) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(AppError::not_found(entity)),
    }
}

fn remove<T>(map: &mut HashMap<Uuid, T>, id: Uuid, entity: &str) -> AppResult<()> {
    map.remove(&id)
        .map(|_| ())
        .ok_or_else(|| AppError::not_found(entity))
}

fn remove_where<T>(map: &mut HashMap<Uuid, T>, pred: impl Fn(&T) -> bool) -> u64 {
    let before = map.len();
    map.retain(|_, value| !pred(value));
    (before - map.len()) as u64
}

impl MemoryState {
    fn email_taken(&self, email: &str, except: Uuid) -> bool {
        self.users
            .values()
            .any(|u| u.id != except && u.email == email)
    }

    fn room_number_taken(&self, room: &Room) -> bool {
        self.rooms.values().any(|r| {
            r.id != room.id && r.property_id == room.property_id && r.room_number == room.room_number
        })
    }

    fn month_taken(&self, payment: &Payment) -> bool {
        self.payments.values().any(|p| {
            p.id != payment.id && p.tenant_id == payment.tenant_id && p.month == payment.month
        })
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.read(|s| s.users.get(&id).cloned()).await)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .read(|s| s.users.values().find(|u| u.email == email).cloned())
            .await)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let users = self.read(|s| s.users.values().cloned().collect()).await;
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        self.write(|s| {
            if s.email_taken(&user.email, user.id) {
                return Err(AppError::conflict("User already exists with this email"));
            }
            s.users.insert(user.id, user.clone());
            Ok(user)
        })
        .await
    }

    async fn update(&self, user: User) -> AppResult<User> {
        self.write(|s| {
            if s.email_taken(&user.email, user.id) {
                return Err(AppError::conflict("User already exists with this email"));
            }
            replace(&mut s.users, user.id, user.clone(), "User")?;
            Ok(user)
        })
        .await
    }

    async fn count_by_role(&self, role: UserRole) -> AppResult<u64> {
        Ok(self
            .read(|s| s.users.values().filter(|u| u.role == role).count() as u64)
            .await)
    }
}

#[async_trait]
impl PropertyRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        Ok(self.read(|s| s.properties.get(&id).cloned()).await)
    }

    async fn list(&self, filter: PropertyFilter) -> AppResult<Vec<Property>> {
        let properties = self
            .read(|s| {
                s.properties
                    .values()
                    .filter(|p| filter.matches(p))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(newest_first(properties, |p: &Property| p.created_at))
    }

    async fn insert(&self, property: Property) -> AppResult<Property> {
        self.write(|s| {
            s.properties.insert(property.id, property.clone());
            Ok(property)
        })
        .await
    }

    async fn update(&self, property: Property) -> AppResult<Property> {
        self.write(|s| {
            replace(&mut s.properties, property.id, property.clone(), "Property")?;
            Ok(property)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.properties, id, "Property")).await
    }

    async fn update_counts(&self, id: Uuid, counts: PropertyCounts) -> AppResult<()> {
        self.write(|s| {
            let property = s
                .properties
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found("Property"))?;
            property.total_rooms = counts.total_rooms;
            property.occupied_rooms = counts.occupied_rooms;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        Ok(self.read(|s| s.rooms.get(&id).cloned()).await)
    }

    async fn list(&self, filter: RoomFilter) -> AppResult<Vec<Room>> {
        let rooms = self
            .read(|s| s.rooms.values().filter(|r| filter.matches(r)).cloned().collect())
            .await;
        Ok(newest_first(rooms, |r: &Room| r.created_at))
    }

    async fn insert(&self, room: Room) -> AppResult<Room> {
        self.write(|s| {
            if s.room_number_taken(&room) {
                return Err(AppError::conflict(
                    "Room number already exists in this property",
                ));
            }
            s.rooms.insert(room.id, room.clone());
            Ok(room)
        })
        .await
    }

    async fn update(&self, room: Room) -> AppResult<Room> {
        self.write(|s| {
            if s.room_number_taken(&room) {
                return Err(AppError::conflict(
                    "Room number already exists in this property",
                ));
            }
            replace(&mut s.rooms, room.id, room.clone(), "Room")?;
            Ok(room)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.rooms, id, "Room")).await
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.rooms, |r| r.property_id == property_id)))
            .await
    }

    async fn update_occupancy(&self, id: Uuid, occupancy: RoomOccupancy) -> AppResult<()> {
        self.write(|s| {
            let room = s
                .rooms
                .get_mut(&id)
                .ok_or_else(|| AppError::not_found("Room"))?;
            room.current_occupancy = occupancy.current_occupancy;
            room.status = occupancy.status;
            Ok(())
        })
        .await
    }

    async fn statuses_in_property(&self, property_id: Uuid) -> AppResult<Vec<RoomStatus>> {
        Ok(self
            .read(|s| {
                s.rooms
                    .values()
                    .filter(|r| r.property_id == property_id)
                    .map(|r| r.status)
                    .collect()
            })
            .await)
    }
}

#[async_trait]
impl TenantRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Tenant>> {
        Ok(self.read(|s| s.tenants.get(&id).cloned()).await)
    }

    async fn list(&self, filter: TenantFilter) -> AppResult<Vec<Tenant>> {
        let tenants = self
            .read(|s| {
                s.tenants
                    .values()
                    .filter(|t| filter.matches(t))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(newest_first(tenants, |t: &Tenant| t.created_at))
    }

    async fn count(&self, filter: TenantFilter) -> AppResult<u64> {
        Ok(self
            .read(|s| s.tenants.values().filter(|t| filter.matches(t)).count() as u64)
            .await)
    }

    async fn insert(&self, tenant: Tenant) -> AppResult<Tenant> {
        self.write(|s| {
            s.tenants.insert(tenant.id, tenant.clone());
            Ok(tenant)
        })
        .await
    }

    async fn update(&self, tenant: Tenant) -> AppResult<Tenant> {
        self.write(|s| {
            replace(&mut s.tenants, tenant.id, tenant.clone(), "Tenant")?;
            Ok(tenant)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.tenants, id, "Tenant")).await
    }

    async fn count_residents_in_property(&self, property_id: Uuid) -> AppResult<u64> {
        Ok(self
            .read(|s| {
                s.tenants
                    .values()
                    .filter(|t| t.property_id == property_id && t.status.is_resident())
                    .count() as u64
            })
            .await)
    }

    async fn count_residents_in_room(&self, room_id: Uuid) -> AppResult<u64> {
        Ok(self
            .read(|s| {
                s.tenants
                    .values()
                    .filter(|t| t.room_id == room_id && t.status.is_resident())
                    .count() as u64
            })
            .await)
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.tenants, |t| t.property_id == property_id)))
            .await
    }

    async fn delete_by_room(&self, room_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.tenants, |t| t.room_id == room_id)))
            .await
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Payment>> {
        Ok(self.read(|s| s.payments.get(&id).cloned()).await)
    }

    async fn list(&self, filter: PaymentFilter) -> AppResult<Vec<Payment>> {
        let payments = self
            .read(|s| {
                s.payments
                    .values()
                    .filter(|p| filter.matches(p))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(newest_first(payments, |p: &Payment| p.created_at))
    }

    async fn insert(&self, payment: Payment) -> AppResult<Payment> {
        self.write(|s| {
            if s.month_taken(&payment) {
                return Err(AppError::conflict(DUPLICATE_MONTH));
            }
            s.payments.insert(payment.id, payment.clone());
            Ok(payment)
        })
        .await
    }

    async fn update(&self, payment: Payment) -> AppResult<Payment> {
        self.write(|s| {
            if s.month_taken(&payment) {
                return Err(AppError::conflict(DUPLICATE_MONTH));
            }
            replace(&mut s.payments, payment.id, payment.clone(), "Payment")?;
            Ok(payment)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.payments, id, "Payment")).await
    }

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.payments, |p| p.tenant_id == tenant_id)))
            .await
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.payments, |p| p.property_id == property_id)))
            .await
    }
}

#[async_trait]
impl ComplaintRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Complaint>> {
        Ok(self.read(|s| s.complaints.get(&id).cloned()).await)
    }

    async fn list(&self, filter: ComplaintFilter) -> AppResult<Vec<Complaint>> {
        let complaints = self
            .read(|s| {
                s.complaints
                    .values()
                    .filter(|c| filter.matches(c))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(newest_first(complaints, |c: &Complaint| c.created_at))
    }

    async fn count(&self, filter: ComplaintFilter) -> AppResult<u64> {
        Ok(self
            .read(|s| s.complaints.values().filter(|c| filter.matches(c)).count() as u64)
            .await)
    }

    async fn insert(&self, complaint: Complaint) -> AppResult<Complaint> {
        self.write(|s| {
            s.complaints.insert(complaint.id, complaint.clone());
            Ok(complaint)
        })
        .await
    }

    async fn update(&self, complaint: Complaint) -> AppResult<Complaint> {
        self.write(|s| {
            replace(&mut s.complaints, complaint.id, complaint.clone(), "Complaint")?;
            Ok(complaint)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.complaints, id, "Complaint")).await
    }

    async fn delete_by_tenant(&self, tenant_id: Uuid) -> AppResult<u64> {
        self.write(|s| Ok(remove_where(&mut s.complaints, |c| c.tenant_id == tenant_id)))
            .await
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        self.write(|s| {
            Ok(remove_where(&mut s.complaints, |c| {
                c.property_id == property_id
            }))
        })
        .await
    }
}

#[async_trait]
impl NoticeRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Notice>> {
        Ok(self.read(|s| s.notices.get(&id).cloned()).await)
    }

    async fn list(&self, filter: NoticeFilter, scope: NoticeScope) -> AppResult<Vec<Notice>> {
        let notices = self
            .read(|s| {
                s.notices
                    .values()
                    .filter(|n| filter.matches(n) && scope.admits(n))
                    .cloned()
                    .collect()
            })
            .await;
        Ok(newest_first(notices, |n: &Notice| n.created_at))
    }

    async fn insert(&self, notice: Notice) -> AppResult<Notice> {
        self.write(|s| {
            s.notices.insert(notice.id, notice.clone());
            Ok(notice)
        })
        .await
    }

    async fn update(&self, notice: Notice) -> AppResult<Notice> {
        self.write(|s| {
            replace(&mut s.notices, notice.id, notice.clone(), "Notice")?;
            Ok(notice)
        })
        .await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.write(|s| remove(&mut s.notices, id, "Notice")).await
    }

    async fn delete_by_property(&self, property_id: Uuid) -> AppResult<u64> {
        self.write(|s| {
            Ok(remove_where(&mut s.notices, |n| {
                n.property_id == Some(property_id)
            }))
        })
        .await
    }
}

impl Repositories for MemoryStore {
    fn users(&self) -> &dyn UserRepository {
        self
    }

    fn properties(&self) -> &dyn PropertyRepository {
        self
    }

    fn rooms(&self) -> &dyn RoomRepository {
        self
    }

    fn tenants(&self) -> &dyn TenantRepository {
        self
    }

    fn payments(&self) -> &dyn PaymentRepository {
        self
    }

    fn complaints(&self) -> &dyn ComplaintRepository {
        self
    }

    fn notices(&self) -> &dyn NoticeRepository {
        self
    }
}

#[async_trait]
impl UnitOfWork for MemoryStore {
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(TransactionContext<'a>) -> TxFuture<'a, T> + Send,
        T: Send,
    {
        let _gate = self.gate.lock().await;
        let scratch = MemoryStore::from_state(self.state.read().await.clone());

        let outcome = f(TransactionContext::new(&scratch)).await;

        if outcome.is_ok() {
            *self.state.write().await = scratch.state.into_inner();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::{
        Address, Contact, Furnishing, NewProperty, NewRoom, PropertyAmenities, PropertyType,
        RoomAmenities, RoomType,
    };

    fn property() -> Property {
        Property::create(
            Uuid::new_v4(),
            NewProperty {
                name: "Sunrise PG".to_string(),
                property_type: PropertyType::Boys,
                address: Address {
                    street: "12 MG Road".to_string(),
                    city: "Pune".to_string(),
                    state: "MH".to_string(),
                    pincode: "411001".to_string(),
                    landmark: None,
                },
                contact: Contact {
                    person_name: "Ravi".to_string(),
                    phone: "9876543210".to_string(),
                    email: None,
                },
                amenities: PropertyAmenities::default(),
                description: None,
                rules: None,
                status: None,
            },
            Utc::now(),
        )
    }

    fn room(property_id: Uuid, number: &str) -> Room {
        Room::create(
            NewRoom {
                property_id,
                room_number: number.to_string(),
                floor: 1,
                room_type: RoomType::Double,
                capacity: 2,
                rent: 8000,
                security_deposit: 0,
                area: None,
                furnishing: Furnishing::SemiFurnished,
                amenities: RoomAmenities::default(),
                status: None,
                images: Vec::new(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_room_number_conflicts() {
        let store = MemoryStore::new();
        let p = PropertyRepository::insert(&store, property()).await.unwrap();

        tokio_test::assert_ok!(RoomRepository::insert(&store, room(p.id, "101")).await);
        let err = tokio_test::assert_err!(RoomRepository::insert(&store, room(p.id, "101")).await);

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_failed_transaction_leaves_state_untouched() {
        let store = MemoryStore::new();
        let p = property();
        let id = p.id;

        let result: AppResult<()> = store
            .transaction(|ctx| {
                Box::pin(async move {
                    ctx.properties().insert(p).await?;
                    Err(AppError::internal("boom"))
                })
            })
            .await;

        tokio_test::assert_err!(result);
        assert!(PropertyRepository::find_by_id(&store, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible() {
        let store = MemoryStore::new();
        let p = property();
        let id = p.id;

        store
            .transaction(|ctx| {
                Box::pin(async move {
                    let p = ctx.properties().insert(p).await?;
                    ctx.rooms().insert(room(p.id, "G1")).await?;
                    Ok(())
                })
            })
            .await
            .unwrap();

        assert!(PropertyRepository::find_by_id(&store, id).await.unwrap().is_some());
        assert_eq!(store.statuses_in_property(id).await.unwrap().len(), 1);
    }
}
