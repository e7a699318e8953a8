//! Tenant records linking a user to a room.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::{Address, PHONE_REGEX};
use crate::constants::DAYS_PER_MONTH;
use crate::error::{DomainError, DomainResult};
use crate::room::Room;

wire_enum! {
    TenantStatus {
        Active => "active",
        Inactive => "inactive",
        NoticePeriod => "notice_period",
    }
}

impl Default for TenantStatus {
    fn default() -> Self {
        TenantStatus::Active
    }
}

impl TenantStatus {
    /// Only active tenants count toward a room's occupancy.
    pub fn occupies_room(&self) -> bool {
        matches!(self, TenantStatus::Active)
    }

    /// Anyone not yet moved out still lives in the property.
    pub fn is_resident(&self) -> bool {
        !matches!(self, TenantStatus::Inactive)
    }
}

wire_enum! {
    IdProofKind {
        Aadhar => "aadhar",
        Passport => "passport",
        DrivingLicense => "driving_license",
        VoterId => "voter_id",
        Other => "other",
    }
}

wire_enum! {
    OccupationKind {
        Student => "student",
        WorkingProfessional => "working_professional",
        SelfEmployed => "self_employed",
        Other => "other",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EmergencyContact {
    #[validate(length(min = 1, max = 100, message = "Emergency contact name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "Relation is required"))]
    pub relation: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Emergency phone must be 10 digits"))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct IdProof {
    pub kind: IdProofKind,
    #[validate(length(min = 1, max = 50, message = "ID number is required"))]
    pub number: String,
    /// URL of the uploaded scan
    #[serde(default)]
    pub document: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Occupation {
    pub kind: OccupationKind,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub company_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub designation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NoticePeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Agreement {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub document: Option<String>,
}

/// A person staying in a room. `property_id` always mirrors the room's
/// property and is never taken from the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Tenant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub room_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub alternate_phone: Option<String>,
    pub emergency_contact: Option<EmergencyContact>,
    pub id_proof: Option<IdProof>,
    pub occupation: Option<Occupation>,
    pub permanent_address: Option<Address>,
    pub move_in_date: NaiveDate,
    pub move_out_date: Option<NaiveDate>,
    pub rent_amount: i64,
    pub security_deposit: i64,
    pub security_deposit_paid: bool,
    pub status: TenantStatus,
    pub notice_period: Option<NoticePeriod>,
    pub agreement: Option<Agreement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Build a tenant in `room`. Rent and deposit default to the room's.
    pub fn create(input: NewTenant, room: &Room, now: DateTime<Utc>) -> DomainResult<Self> {
        if let Some(move_out) = input.move_out_date {
            if move_out < input.move_in_date {
                return Err(DomainError::validation(
                    "Move-out date cannot be before move-in date",
                ));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            property_id: room.property_id,
            room_id: room.id,
            full_name: input.full_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone,
            alternate_phone: input.alternate_phone,
            emergency_contact: input.emergency_contact,
            id_proof: input.id_proof,
            occupation: input.occupation,
            permanent_address: input.permanent_address,
            move_in_date: input.move_in_date,
            move_out_date: input.move_out_date,
            rent_amount: input.rent_amount.unwrap_or(room.rent),
            security_deposit: input.security_deposit.unwrap_or(room.security_deposit),
            security_deposit_paid: input.security_deposit_paid,
            status: input.status.unwrap_or_default(),
            notice_period: None,
            agreement: input.agreement,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whole days stayed up to the move-out date, or up to `today`.
    pub fn days_stayed(&self, today: NaiveDate) -> i64 {
        let end = self.move_out_date.unwrap_or(today);
        (end - self.move_in_date).num_days().max(0)
    }

    pub fn months_stayed(&self, today: NaiveDate) -> i64 {
        self.days_stayed(today) / DAYS_PER_MONTH
    }

    /// Apply client changes except the room move, which the caller resolves
    /// (it also changes `property_id`).
    pub fn apply(&mut self, changes: TenantChanges, today: NaiveDate, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name.trim().to_string();
        }
        if let Some(email) = changes.email {
            self.email = email.trim().to_lowercase();
        }
        if let Some(phone) = changes.phone {
            self.phone = phone;
        }
        if let Some(alternate_phone) = changes.alternate_phone {
            self.alternate_phone = Some(alternate_phone);
        }
        if let Some(contact) = changes.emergency_contact {
            self.emergency_contact = Some(contact);
        }
        if let Some(id_proof) = changes.id_proof {
            self.id_proof = Some(id_proof);
        }
        if let Some(occupation) = changes.occupation {
            self.occupation = Some(occupation);
        }
        if let Some(address) = changes.permanent_address {
            self.permanent_address = Some(address);
        }
        if let Some(move_in) = changes.move_in_date {
            self.move_in_date = move_in;
        }
        if let Some(move_out) = changes.move_out_date {
            self.move_out_date = Some(move_out);
        }
        if let Some(rent) = changes.rent_amount {
            self.rent_amount = rent;
        }
        if let Some(deposit) = changes.security_deposit {
            self.security_deposit = deposit;
        }
        if let Some(paid) = changes.security_deposit_paid {
            self.security_deposit_paid = paid;
        }
        if let Some(notice) = changes.notice_period {
            if notice.end_date < notice.start_date {
                return Err(DomainError::validation(
                    "Notice period cannot end before it starts",
                ));
            }
            self.notice_period = Some(notice);
        }
        if let Some(agreement) = changes.agreement {
            self.agreement = Some(agreement);
        }
        if let Some(status) = changes.status {
            if status == TenantStatus::Inactive && self.move_out_date.is_none() {
                self.move_out_date = Some(today);
            }
            self.status = status;
        }
        if let Some(move_out) = self.move_out_date {
            if move_out < self.move_in_date {
                return Err(DomainError::validation(
                    "Move-out date cannot be before move-in date",
                ));
            }
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Tenant plus its derived read-time fields.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TenantView {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub days_stayed: i64,
    pub months_stayed: i64,
}

impl TenantView {
    pub fn new(tenant: Tenant, today: NaiveDate) -> Self {
        Self {
            days_stayed: tenant.days_stayed(today),
            months_stayed: tenant.months_stayed(today),
            tenant,
        }
    }
}

/// Tenant creation request. The property is taken from the room.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct NewTenant {
    pub user_id: Uuid,
    pub room_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 10 digits"))]
    pub phone: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Alternate phone must be 10 digits"))]
    pub alternate_phone: Option<String>,
    #[validate(nested)]
    pub emergency_contact: Option<EmergencyContact>,
    #[validate(nested)]
    pub id_proof: Option<IdProof>,
    #[validate(nested)]
    pub occupation: Option<Occupation>,
    #[validate(nested)]
    pub permanent_address: Option<Address>,
    pub move_in_date: NaiveDate,
    pub move_out_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_amount: Option<i64>,
    #[validate(range(min = 0, message = "Security deposit cannot be negative"))]
    pub security_deposit: Option<i64>,
    #[serde(default)]
    pub security_deposit_paid: bool,
    pub status: Option<TenantStatus>,
    pub agreement: Option<Agreement>,
}

/// Tenant update request.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct TenantChanges {
    /// Move the tenant to another room
    pub room_id: Option<Uuid>,
    #[validate(length(min = 1, max = 100, message = "Full name is required"))]
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Phone must be 10 digits"))]
    pub phone: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Alternate phone must be 10 digits"))]
    pub alternate_phone: Option<String>,
    #[validate(nested)]
    pub emergency_contact: Option<EmergencyContact>,
    #[validate(nested)]
    pub id_proof: Option<IdProof>,
    #[validate(nested)]
    pub occupation: Option<Occupation>,
    #[validate(nested)]
    pub permanent_address: Option<Address>,
    pub move_in_date: Option<NaiveDate>,
    pub move_out_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Rent cannot be negative"))]
    pub rent_amount: Option<i64>,
    #[validate(range(min = 0, message = "Security deposit cannot be negative"))]
    pub security_deposit: Option<i64>,
    pub security_deposit_paid: Option<bool>,
    pub status: Option<TenantStatus>,
    #[validate(nested)]
    pub notice_period: Option<NoticePeriod>,
    pub agreement: Option<Agreement>,
}

impl TenantChanges {
    /// Fields only the managing owner may change: placement, money and
    /// tenancy lifecycle.
    pub fn touches_terms(&self) -> bool {
        self.room_id.is_some()
            || self.status.is_some()
            || self.rent_amount.is_some()
            || self.security_deposit.is_some()
            || self.security_deposit_paid.is_some()
            || self.move_in_date.is_some()
            || self.move_out_date.is_some()
            || self.notice_period.is_some()
            || self.agreement.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::{NewRoom, RoomType};

    fn room() -> Room {
        Room::create(
            NewRoom {
                property_id: Uuid::new_v4(),
                room_number: "A1".to_string(),
                floor: 0,
                room_type: RoomType::Single,
                capacity: 1,
                rent: 7500,
                security_deposit: 15000,
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
            full_name: "Meera Iyer".to_string(),
            email: "Meera@Example.com".to_string(),
            phone: "9123456780".to_string(),
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

    #[test]
    fn test_create_copies_room_placement_and_terms() {
        let room = room();
        let tenant = Tenant::create(new_tenant(room.id), &room, Utc::now()).unwrap();

        assert_eq!(tenant.property_id, room.property_id);
        assert_eq!(tenant.rent_amount, 7500);
        assert_eq!(tenant.security_deposit, 15000);
        assert_eq!(tenant.email, "meera@example.com");
        assert_eq!(tenant.status, TenantStatus::Active);
    }

    #[test]
    fn test_days_and_months_stayed() {
        let room = room();
        let tenant = Tenant::create(new_tenant(room.id), &room, Utc::now()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert_eq!(tenant.days_stayed(today), 60);
        assert_eq!(tenant.months_stayed(today), 2);
    }

    #[test]
    fn test_move_out_date_caps_stay() {
        let room = room();
        let mut input = new_tenant(room.id);
        input.move_out_date = Some(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        let tenant = Tenant::create(input, &room, Utc::now()).unwrap();

        assert_eq!(tenant.days_stayed(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()), 15);
        assert_eq!(tenant.months_stayed(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()), 0);
    }

    #[test]
    fn test_deactivation_stamps_move_out() {
        let room = room();
        let mut tenant = Tenant::create(new_tenant(room.id), &room, Utc::now()).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        let changes = TenantChanges {
            status: Some(TenantStatus::Inactive),
            ..Default::default()
        };
        tenant.apply(changes, today, Utc::now()).unwrap();

        assert_eq!(tenant.status, TenantStatus::Inactive);
        assert_eq!(tenant.move_out_date, Some(today));
    }

    #[test]
    fn test_status_semantics() {
        assert!(TenantStatus::Active.occupies_room());
        assert!(!TenantStatus::NoticePeriod.occupies_room());
        assert!(TenantStatus::NoticePeriod.is_resident());
        assert!(!TenantStatus::Inactive.is_resident());
        assert_eq!(
            "notice_period".parse::<TenantStatus>().unwrap(),
            TenantStatus::NoticePeriod
        );
    }

    #[test]
    fn test_contact_only_changes_do_not_touch_terms() {
        let changes = TenantChanges {
            phone: Some("9000000000".to_string()),
            ..Default::default()
        };
        assert!(!changes.touches_terms());

        let changes = TenantChanges {
            status: Some(TenantStatus::Inactive),
            ..Default::default()
        };
        assert!(changes.touches_terms());
    }
}
