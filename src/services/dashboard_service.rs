//! Dashboard statistics.
//!
//! Admins see the whole portfolio, owners the part they own, and tenants a
//! summary of their own tenancy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use domain::{
    Complaint, ComplaintStatus, Payment, PaymentStatus, Requester, Room, Tenant, TenantStatus,
    TenantView,
};

use super::access::AccessResolver;
use super::container::parallel;
use crate::config::DASHBOARD_CONCURRENCY;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;
use crate::types::{ComplaintFilter, PaymentFilter, PropertyFilter, RoomFilter, TenantFilter};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Counters over a set of properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct PortfolioStats {
    pub total_properties: usize,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    /// Percentage of rooms occupied, rounded
    pub occupancy_rate: u32,
    pub active_tenants: usize,
    /// Sum of paid payment totals
    pub total_revenue: i64,
    /// Payments still pending or overdue
    pub pending_payments: usize,
    pub open_complaints: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaymentSummary {
    pub paid: usize,
    pub pending: usize,
    pub overdue: usize,
    pub partial: usize,
    /// Outstanding total of pending, overdue and partial payments
    pub pending_amount: i64,
}

/// What a tenant sees about their own stay
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TenancyStats {
    pub tenant: Option<TenantView>,
    pub room: Option<Room>,
    pub payments: PaymentSummary,
    pub open_complaints: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardStats {
    Portfolio(PortfolioStats),
    Tenancy(TenancyStats),
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn stats(&self, requester: Requester) -> AppResult<DashboardStats>;
}

#[derive(Default)]
struct Holdings {
    rooms: Vec<Room>,
    tenants: Vec<Tenant>,
    payments: Vec<Payment>,
    complaints: Vec<Complaint>,
}

impl Holdings {
    fn merge(mut self, other: Holdings) -> Holdings {
        self.rooms.extend(other.rooms);
        self.tenants.extend(other.tenants);
        self.payments.extend(other.payments);
        self.complaints.extend(other.complaints);
        self
    }
}

pub struct DashboardManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: AccessResolver<U>,
}

impl<U: UnitOfWork> DashboardManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self {
            access: AccessResolver::new(uow.clone()),
            uow,
        }
    }

    /// `owner` restricts every counter to that owner's properties.
    async fn portfolio(&self, owner: Option<Uuid>) -> AppResult<PortfolioStats> {
        let property_filter = PropertyFilter {
            owner,
            ..Default::default()
        };
        let properties = self.uow.properties().list(property_filter).await?;

        let Holdings {
            rooms,
            tenants,
            payments,
            complaints,
        } = match owner {
            None => self.holdings(None).await?,
            Some(_) => parallel::join_all_limited(
                properties.iter().map(|property| self.holdings(Some(property.id))),
                DASHBOARD_CONCURRENCY,
            )
            .await?
            .into_iter()
            .fold(Holdings::default(), Holdings::merge),
        };

        let occupied_rooms = rooms
            .iter()
            .filter(|room| room.status == domain::RoomStatus::Occupied)
            .count();
        let available_rooms = rooms.iter().filter(|room| room.is_available()).count();
        let occupancy_rate = if rooms.is_empty() {
            0
        } else {
            ((occupied_rooms as f64 / rooms.len() as f64) * 100.0).round() as u32
        };

        Ok(PortfolioStats {
            total_properties: properties.len(),
            total_rooms: rooms.len(),
            occupied_rooms,
            available_rooms,
            occupancy_rate,
            active_tenants: tenants.len(),
            total_revenue: payments
                .iter()
                .filter(|payment| payment.status == PaymentStatus::Paid)
                .map(|payment| payment.total_amount)
                .sum(),
            pending_payments: payments
                .iter()
                .filter(|payment| {
                    matches!(payment.status, PaymentStatus::Pending | PaymentStatus::Overdue)
                })
                .count(),
            open_complaints: complaints.len(),
        })
    }

    /// Rooms, active tenants, payments and open complaints, of one property
    /// or of every property.
    async fn holdings(&self, property: Option<Uuid>) -> AppResult<Holdings> {
        let (rooms, tenants, payments, complaints) = parallel::join4(
            self.uow.rooms().list(RoomFilter {
                property,
                ..Default::default()
            }),
            self.uow.tenants().list(TenantFilter {
                property,
                status: Some(TenantStatus::Active),
                ..Default::default()
            }),
            self.uow.payments().list(PaymentFilter {
                property,
                ..Default::default()
            }),
            self.uow.complaints().list(ComplaintFilter {
                property,
                status: Some(ComplaintStatus::Open),
                ..Default::default()
            }),
        )
        .await?;
        Ok(Holdings {
            rooms,
            tenants,
            payments,
            complaints,
        })
    }

    async fn tenancy(&self, user_id: Uuid) -> AppResult<TenancyStats> {
        let tenancies = self.access.tenancies_of(user_id).await?;
        let current = tenancies
            .iter()
            .find(|tenant| tenant.status.is_resident())
            .or_else(|| tenancies.first())
            .cloned();

        let Some(tenant) = current else {
            return Ok(TenancyStats {
                tenant: None,
                room: None,
                payments: PaymentSummary::default(),
                open_complaints: 0,
            });
        };

        let (room, payments, complaints) = parallel::join3(
            self.uow.rooms().find_by_id(tenant.room_id),
            self.uow.payments().list(PaymentFilter {
                tenant: Some(tenant.id),
                ..Default::default()
            }),
            self.uow.complaints().count(ComplaintFilter {
                tenant: Some(tenant.id),
                status: Some(ComplaintStatus::Open),
                ..Default::default()
            }),
        )
        .await?;

        let mut summary = PaymentSummary::default();
        for payment in &payments {
            match payment.status {
                PaymentStatus::Paid => summary.paid += 1,
                PaymentStatus::Pending => summary.pending += 1,
                PaymentStatus::Overdue => summary.overdue += 1,
                PaymentStatus::Partial => summary.partial += 1,
            }
            if payment.status != PaymentStatus::Paid {
                summary.pending_amount += payment.total_amount;
            }
        }

        Ok(TenancyStats {
            tenant: Some(TenantView::new(tenant, Utc::now().date_naive())),
            room,
            payments: summary,
            open_complaints: usize::try_from(complaints).unwrap_or(usize::MAX),
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> DashboardService for DashboardManager<U> {
    async fn stats(&self, requester: Requester) -> AppResult<DashboardStats> {
        if requester.is_tenant() {
            return self.tenancy(requester.id).await.map(DashboardStats::Tenancy);
        }
        let owner = (!requester.is_admin()).then_some(requester.id);
        self.portfolio(owner).await.map(DashboardStats::Portfolio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockUnitOfWork;
    use domain::{
        Address, Contact, NewProperty, NewRoom, Property, PropertyType, RoomStatus, RoomType,
        UserRole,
    };

    #[tokio::test]
    async fn test_tenant_without_record_gets_empty_summary() {
        let mut uow = MockUnitOfWork::new();
        uow.tenants.expect_list().returning(|_| Ok(Vec::new()));

        let stats = DashboardManager::new(Arc::new(uow))
            .stats(Requester::new(Uuid::new_v4(), UserRole::Tenant))
            .await
            .unwrap();

        match stats {
            DashboardStats::Tenancy(stats) => {
                assert!(stats.tenant.is_none());
                assert_eq!(stats.payments, PaymentSummary::default());
            }
            other => panic!("expected tenancy stats, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_portfolio_has_zero_occupancy() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_list()
            .withf(move |filter| filter.owner == Some(owner.id))
            .returning(|_| Ok(Vec::new()));
        uow.rooms.expect_list().never();
        uow.tenants.expect_list().never();
        uow.payments.expect_list().never();
        uow.complaints.expect_list().never();

        let stats = DashboardManager::new(Arc::new(uow)).stats(owner).await.unwrap();
        match stats {
            DashboardStats::Portfolio(stats) => assert_eq!(stats, PortfolioStats::default()),
            other => panic!("expected portfolio stats, got {:?}", other),
        }
    }

    fn property(owner: Uuid) -> Property {
        Property::create(
            owner,
            NewProperty {
                name: "Hilltop PG".to_string(),
                property_type: PropertyType::CoLiving,
                address: Address {
                    street: "9 Ridge Road".to_string(),
                    city: "Shimla".to_string(),
                    state: "HP".to_string(),
                    pincode: "171001".to_string(),
                    landmark: None,
                },
                contact: Contact {
                    person_name: "Kiran".to_string(),
                    phone: "9876512345".to_string(),
                    email: None,
                },
                amenities: Default::default(),
                description: None,
                rules: None,
                status: None,
            },
            Utc::now(),
        )
    }

    fn occupied_room(property_id: Uuid) -> Room {
        let mut room = Room::create(
            NewRoom {
                property_id,
                room_number: "7".to_string(),
                floor: 0,
                room_type: RoomType::Single,
                capacity: 1,
                rent: 5000,
                security_deposit: 0,
                area: None,
                furnishing: Default::default(),
                amenities: Default::default(),
                status: None,
                images: Vec::new(),
                description: None,
            },
            Utc::now(),
        )
        .unwrap();
        room.status = RoomStatus::Occupied;
        room.current_occupancy = 1;
        room
    }

    #[tokio::test]
    async fn test_owner_queries_are_scoped_to_owned_properties() {
        let owner = Requester::new(Uuid::new_v4(), UserRole::Owner);
        let hilltop = property(owner.id);
        let pid = hilltop.id;

        let mut uow = MockUnitOfWork::new();
        uow.properties
            .expect_list()
            .returning(move |_| Ok(vec![hilltop.clone()]));
        uow.rooms
            .expect_list()
            .withf(move |filter| filter.property == Some(pid))
            .times(1)
            .returning(move |_| Ok(vec![occupied_room(pid)]));
        uow.tenants
            .expect_list()
            .withf(move |filter| filter.property == Some(pid))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        uow.payments
            .expect_list()
            .withf(move |filter| filter.property == Some(pid))
            .times(1)
            .returning(|_| Ok(Vec::new()));
        uow.complaints
            .expect_list()
            .withf(move |filter| filter.property == Some(pid))
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let stats = DashboardManager::new(Arc::new(uow)).stats(owner).await.unwrap();
        match stats {
            DashboardStats::Portfolio(stats) => {
                assert_eq!(stats.total_properties, 1);
                assert_eq!(stats.total_rooms, 1);
                assert_eq!(stats.occupied_rooms, 1);
                assert_eq!(stats.occupancy_rate, 100);
            }
            other => panic!("expected portfolio stats, got {:?}", other),
        }
    }
}
