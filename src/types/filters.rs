//! List filters accepted as query parameters.
//!
//! Each filter also knows how to match a single record, which the in-memory
//! store uses directly and the SeaORM store mirrors as SQL conditions.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use domain::{
    BillingMonth, Complaint, ComplaintCategory, ComplaintStatus, Notice, NoticeCategory, Payment,
    PaymentStatus, Priority, Property, PropertyStatus, PropertyType, Room, RoomStatus, RoomType,
    Tenant, TenantStatus,
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PropertyFilter {
    /// Owning user; forced to the requester for owners
    pub owner: Option<Uuid>,
    pub status: Option<PropertyStatus>,
    /// Case-insensitive substring of the city
    pub city: Option<String>,
    pub property_type: Option<PropertyType>,
}

impl PropertyFilter {
    pub fn owned_by(owner: Uuid) -> Self {
        Self {
            owner: Some(owner),
            ..Default::default()
        }
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.owner.map_or(true, |owner| property.owner_id == owner)
            && self.status.map_or(true, |status| property.status == status)
            && self.property_type.map_or(true, |kind| property.property_type == kind)
            && self.city.as_deref().map_or(true, |city| {
                property
                    .address
                    .city
                    .to_lowercase()
                    .contains(&city.trim().to_lowercase())
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    pub property: Option<Uuid>,
    pub status: Option<RoomStatus>,
    pub room_type: Option<RoomType>,
    pub floor: Option<i32>,
}

impl RoomFilter {
    pub fn matches(&self, room: &Room) -> bool {
        self.property.map_or(true, |id| room.property_id == id)
            && self.status.map_or(true, |status| room.status == status)
            && self.room_type.map_or(true, |kind| room.room_type == kind)
            && self.floor.map_or(true, |floor| room.floor == floor)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TenantFilter {
    pub property: Option<Uuid>,
    pub room: Option<Uuid>,
    pub status: Option<TenantStatus>,
    /// Linked user account; forced to the requester for tenants
    pub user: Option<Uuid>,
}

impl TenantFilter {
    pub fn in_room(room_id: Uuid, status: TenantStatus) -> Self {
        Self {
            room: Some(room_id),
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn matches(&self, tenant: &Tenant) -> bool {
        self.property.map_or(true, |id| tenant.property_id == id)
            && self.room.map_or(true, |id| tenant.room_id == id)
            && self.status.map_or(true, |status| tenant.status == status)
            && self.user.map_or(true, |id| tenant.user_id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentFilter {
    pub tenant: Option<Uuid>,
    pub property: Option<Uuid>,
    pub room: Option<Uuid>,
    pub status: Option<PaymentStatus>,
    /// Billing month as `YYYY-MM`
    #[param(value_type = Option<String>, example = "2024-01")]
    pub month: Option<BillingMonth>,
}

impl PaymentFilter {
    pub fn matches(&self, payment: &Payment) -> bool {
        self.tenant.map_or(true, |id| payment.tenant_id == id)
            && self.property.map_or(true, |id| payment.property_id == id)
            && self.room.map_or(true, |id| payment.room_id == id)
            && self.status.map_or(true, |status| payment.status == status)
            && self.month.map_or(true, |month| payment.month == month)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintFilter {
    pub tenant: Option<Uuid>,
    pub property: Option<Uuid>,
    pub room: Option<Uuid>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<ComplaintCategory>,
    pub priority: Option<Priority>,
}

impl ComplaintFilter {
    pub fn matches(&self, complaint: &Complaint) -> bool {
        self.tenant.map_or(true, |id| complaint.tenant_id == id)
            && self.property.map_or(true, |id| complaint.property_id == id)
            && self.room.map_or(true, |id| complaint.room_id == id)
            && self.status.map_or(true, |status| complaint.status == status)
            && self.category.map_or(true, |category| complaint.category == category)
            && self.priority.map_or(true, |priority| complaint.priority == priority)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NoticeFilter {
    pub property: Option<Uuid>,
    pub category: Option<NoticeCategory>,
    pub priority: Option<Priority>,
    /// Also list drafts, archived and out-of-window notices
    #[serde(default)]
    pub include_inactive: bool,
}

impl NoticeFilter {
    /// Matches the stored attributes; the validity window is applied by the
    /// caller against the current time.
    pub fn matches(&self, notice: &Notice) -> bool {
        self.property
            .map_or(true, |id| notice.property_id == Some(id))
            && self.category.map_or(true, |category| notice.category == category)
            && self.priority.map_or(true, |priority| notice.priority == priority)
    }
}

/// Which notices a requester may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeScope {
    Everything,
    /// Global notices plus those of the listed properties
    GlobalAnd(Vec<Uuid>),
}

impl NoticeScope {
    pub fn admits(&self, notice: &Notice) -> bool {
        match (self, notice.property_id) {
            (NoticeScope::Everything, _) | (_, None) => true,
            (NoticeScope::GlobalAnd(ids), Some(id)) => ids.contains(&id),
        }
    }
}
